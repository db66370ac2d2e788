use chrono::NaiveDate;

use serde::{Deserialize, Serialize};
use serde_aux::prelude::*;

use crate::domain::{MotIdentification, VehicleType};

/// Vehicle record returned by the MOT history API
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDetails {
    pub make: Option<String>,
    pub model: Option<String>,
    pub make_in_full: Option<String>,
    pub primary_colour: Option<String>,
    pub secondary_colour: Option<String>,
    pub registration: Option<String>,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub vehicle_type: VehicleType,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub manufacture_year: Option<i32>,
    #[serde(rename = "motTestExpiryDate")]
    pub mot_expiry_date: Option<NaiveDate>,
    pub mot_test_number: Option<String>,
    pub dvla_id: Option<String>,
}

impl VehicleDetails {
    pub fn mot_identification(&self) -> Option<MotIdentification> {
        MotIdentification::from_parts(self.mot_test_number.as_deref(), self.dvla_id.as_deref())
    }

    /// Upper-cased make and model followed by the registration, e.g. `FORD FOCUS, AB12CDE`
    pub fn display_name(&self, vrm: &str) -> String {
        let make_model = [self.make.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_uppercase)
            .collect::<Vec<_>>()
            .join(" ");

        if make_model.is_empty() {
            vrm.to_string()
        } else {
            format!("{}, {}", make_model, vrm)
        }
    }
}
