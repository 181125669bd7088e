use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::Result;

/// Descriptive metadata of one sequence: which pollutant, measured where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ReferenceAttributes {
    pub sequence_id: i64,

    pub station_id: i64,

    pub pollutant_id: i64,

    #[validate(length(min = 1))]
    pub station_name: Option<String>,

    #[validate(length(min = 1))]
    pub pollutant_name: Option<String>,

    pub unit_of_measure: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl ReferenceAttributes {
    pub fn new(sequence_id: i64, station_id: i64, pollutant_id: i64) -> Self {
        Self {
            sequence_id,
            station_id,
            pollutant_id,
            station_name: None,
            pollutant_name: None,
            unit_of_measure: None,
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_station_name(mut self, name: impl Into<String>) -> Self {
        self.station_name = Some(name.into());
        self
    }

    pub fn with_pollutant_name(mut self, name: impl Into<String>) -> Self {
        self.pollutant_name = Some(name.into());
        self
    }

    pub fn with_unit_of_measure(mut self, unit: impl Into<String>) -> Self {
        self.unit_of_measure = Some(unit.into());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// The record as a field name to value mapping.
    pub fn to_mapping(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(crate::error::ProcessingError::InvalidFormat(format!(
                "Reference attributes serialized to a non-object value: {}",
                other
            ))),
        }
    }

    /// Stem of the persisted document name, e.g. `pollutant_6_station_1017`.
    pub fn document_stem(&self) -> String {
        format!(
            "pollutant_{}_station_{}",
            self.pollutant_id, self.station_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_validation() {
        let reference = ReferenceAttributes::new(1, 1017, 6)
            .with_station_name("Dublin Port")
            .with_coordinates(53.3478, -6.2597);
        assert!(reference.validate().is_ok());

        let reference = ReferenceAttributes::new(1, 1017, 6).with_coordinates(95.0, -6.2597);
        assert!(reference.validate().is_err());

        let reference = ReferenceAttributes::new(1, 1017, 6).with_station_name("");
        assert!(reference.validate().is_err());
    }

    #[test]
    fn test_mapping_and_document_stem() {
        let reference = ReferenceAttributes::new(12, 1017, 6).with_unit_of_measure("µg/m³");
        let mapping = reference.to_mapping().unwrap();

        assert_eq!(mapping["sequence_id"], 12);
        assert_eq!(mapping["station_id"], 1017);
        assert_eq!(mapping["pollutant_id"], 6);
        assert_eq!(mapping["unit_of_measure"], "µg/m³");
        assert!(mapping["latitude"].is_null());
        assert_eq!(mapping.len(), 8);
        assert_eq!(reference.document_stem(), "pollutant_6_station_1017");
    }
}
