use std::fmt;
use std::str::FromStr;

/// Outcome of the prototype review of a product.
///
/// `Pending` is where every product starts. A review moves it to `Validated` or
/// `NotValidated`; a rejected sample can be reworked and validated later. Writing a status
/// simply overwrites the previous one, nothing stored alongside it is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SampleStatus {
    Pending,
    Validated,
    NotValidated,
}

impl SampleStatus {
    pub fn as_str(&self) -> &'static str {
        match *self {
            SampleStatus::Pending => "PENDING",
            SampleStatus::Validated => "VALIDATED",
            SampleStatus::NotValidated => "NOT_VALIDATED",
        }
    }

    /// Packshots, definitive colors/materials, the planned launch date and the launch view
    /// are only open to validated samples.
    pub fn unlocks_final_product(&self) -> bool {
        *self == SampleStatus::Validated
    }

    /// The supplier report documents a rejection, so it needs one.
    pub fn allows_supplier_report(&self) -> bool {
        *self == SampleStatus::NotValidated
    }
}

impl Default for SampleStatus {
    fn default() -> Self {
        SampleStatus::Pending
    }
}

impl FromStr for SampleStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(SampleStatus::Pending),
            "VALIDATED" => Ok(SampleStatus::Validated),
            "NOT_VALIDATED" => Ok(SampleStatus::NotValidated),
            _ => Err(()),
        }
    }
}

impl fmt::Display for SampleStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
