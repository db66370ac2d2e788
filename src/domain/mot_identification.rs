use serde::{Deserialize, Serialize};

/// How the vehicle is identified to the MOT history service
///
/// Vehicles that have been tested carry an MOT test number. Vehicles that have not had their
/// first test yet are only known by their DVLA id. When both are known the test number wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotIdentification {
    MotTestNumber(String),
    DvlaId(String),
}

impl MotIdentification {
    /// Build from optional values, ignoring blank strings
    pub fn from_parts(mot_test_number: Option<&str>, dvla_id: Option<&str>) -> Option<Self> {
        let present = |value: Option<&str>| value.filter(|v| !v.trim().is_empty()).map(String::from);

        present(mot_test_number)
            .map(Self::MotTestNumber)
            .or_else(|| present(dvla_id).map(Self::DvlaId))
    }

    pub fn mot_test_number(&self) -> Option<&str> {
        match self {
            Self::MotTestNumber(number) => Some(number),
            Self::DvlaId(_) => None,
        }
    }

    pub fn dvla_id(&self) -> Option<&str> {
        match self {
            Self::DvlaId(id) => Some(id),
            Self::MotTestNumber(_) => None,
        }
    }

    pub fn has_mot_test_number(&self) -> bool {
        matches!(self, Self::MotTestNumber(_))
    }
}
