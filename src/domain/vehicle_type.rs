use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Vehicle classes with different testing schedules
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    #[default]
    Mot,
    Hgv,
    Psv,
    Trailer,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mot => "MOT",
            Self::Hgv => "HGV",
            Self::Psv => "PSV",
            Self::Trailer => "TRAILER",
        }
    }

    /// Heavy goods vehicles, buses and trailers take an annual test instead of an MOT
    pub fn is_annual_test(&self) -> bool {
        !matches!(self, Self::Mot)
    }
}

impl FromStr for VehicleType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_uppercase().as_str() {
            "MOT" => Ok(Self::Mot),
            "HGV" => Ok(Self::Hgv),
            "PSV" => Ok(Self::Psv),
            "TRAILER" => Ok(Self::Trailer),
            other => Err(format!("{} is not a vehicle type", other)),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
