use serde::{Deserialize, Serialize};

use crate::{Error, PROXIMITY_TOLERANCE_M, algo::DistanceUnit};

/// Boundary marker colors, cycled per chain boundary
pub const DEFAULT_PALETTE: [&str; 4] = ["#80c32a", "#ffc300", "#ff9700", "#ff6a00"];

/// Settings of one route builder instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteBuilderConfig {
    /// Endpoints closer than this are connected, in meters
    pub proximity_tolerance_m: f64,
    /// Unit of the reported route length
    pub distance_unit: DistanceUnit,
    pub palette: Vec<String>,
    /// How far a clicked coordinate may be from a street to select it, in meters
    pub snap_radius_m: f64,
}

impl Default for RouteBuilderConfig {
    fn default() -> Self {
        Self {
            proximity_tolerance_m: PROXIMITY_TOLERANCE_M,
            distance_unit: DistanceUnit::default(),
            palette: DEFAULT_PALETTE.iter().map(ToString::to_string).collect(),
            snap_radius_m: 25.0,
        }
    }
}

impl RouteBuilderConfig {
    /// Parses a JSON configuration, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values are out of range
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !self.proximity_tolerance_m.is_finite() || self.proximity_tolerance_m <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "proximity tolerance must be a positive number of meters, got {}",
                self.proximity_tolerance_m
            )));
        }

        if !self.snap_radius_m.is_finite() || self.snap_radius_m < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "snap radius must be a non-negative number of meters, got {}",
                self.snap_radius_m
            )));
        }

        if self.palette.is_empty() {
            return Err(Error::InvalidConfig(
                "boundary marker palette is empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RouteBuilderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.proximity_tolerance_m, 10.0);
        assert_eq!(config.palette.len(), 4);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RouteBuilderConfig::from_json_str(r#"{"distance_unit": "miles"}"#).unwrap();
        assert_eq!(config.distance_unit, DistanceUnit::Miles);
        assert_eq!(config.proximity_tolerance_m, PROXIMITY_TOLERANCE_M);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            RouteBuilderConfig::from_json_str(r#"{"proximity_tolerance_m": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            RouteBuilderConfig::from_json_str(r#"{"palette": []}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            RouteBuilderConfig::from_json_str(r#"{"distance_unit": "leagues"}"#),
            Err(Error::Json(_))
        ));
    }
}
