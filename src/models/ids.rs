use std::fmt;
use std::str::FromStr;

use uuid::{self, Uuid};

macro_rules! uuid_id {
    ($($(#[$attr:meta])* $name:ident),* $(,)*) => {
        $(
            $(#[$attr])*
            #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
            pub struct $name(pub Uuid);

            impl $name {
                pub fn new() -> Self {
                    $name(Uuid::new_v4())
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                    write!(f, "{}", self.0.hyphenated())
                }
            }

            impl FromStr for $name {
                type Err = uuid::ParseError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    Uuid::parse_str(s).map($name)
                }
            }
        )*
    };
}

uuid_id!(ProductId, SampleId, EventId, CampaignId);
