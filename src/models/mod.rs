#[macro_use]
mod text_enum;

pub mod campaign;
pub mod dashboard;
pub mod date_format;
pub mod event;
pub mod ids;
pub mod links;
pub mod product;
pub mod sample;
pub mod sample_status;
pub mod sku;
pub mod upload;

pub use self::campaign::*;
pub use self::dashboard::*;
pub use self::event::*;
pub use self::ids::*;
pub use self::links::*;
pub use self::product::*;
pub use self::sample::*;
pub use self::sample_status::*;
pub use self::upload::*;

use serde::de::{Deserialize, Deserializer};

/// Lets `Option<Option<T>>` tell an absent field (`None`) from an explicit `null` (`Some(None)`).
/// Use together with `#[serde(default)]`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Answer of delete endpoints
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Deleted {
    pub success: bool,
}
