//! Parameters of a single analysis run

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::poi::Category;
use crate::{Error, Meters};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    #[default]
    #[serde(alias = "walk")]
    Walking,
    #[serde(alias = "drive")]
    Driving,
}

impl TransportMode {
    /// Assumed average speed in km/h
    pub fn speed_kmh(self) -> f64 {
        match self {
            TransportMode::Walking => 5.0,
            TransportMode::Driving => 40.0,
        }
    }

    pub fn speed_mps(self) -> f64 {
        self.speed_kmh() * 1000.0 / 3600.0
    }

    /// Name of the street network variant this mode travels on
    pub fn network_type(self) -> &'static str {
        match self {
            TransportMode::Walking => "walk",
            TransportMode::Driving => "drive",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportMode::Walking => f.write_str("walking"),
            TransportMode::Driving => f.write_str("driving"),
        }
    }
}

impl FromStr for TransportMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" => Ok(TransportMode::Walking),
            "driving" | "drive" => Ok(TransportMode::Driving),
            other => Err(Error::InvalidParameters(format!(
                "Unknown transport mode: {other}"
            ))),
        }
    }
}

/// Immutable inputs of one analysis run
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParameters {
    categories: BTreeSet<Category>,
    mode: TransportMode,
    max_time: Duration,
}

impl AnalysisParameters {
    /// # Errors
    ///
    /// Returns an error if `max_time` is zero
    pub fn new(
        categories: impl IntoIterator<Item = Category>,
        mode: TransportMode,
        max_time: Duration,
    ) -> Result<Self, Error> {
        if max_time.is_zero() {
            return Err(Error::InvalidParameters(
                "Maximum travel time must be positive".to_string(),
            ));
        }

        Ok(Self {
            categories: categories.into_iter().collect(),
            mode,
            max_time,
        })
    }

    pub fn categories(&self) -> &BTreeSet<Category> {
        &self.categories
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn max_time(&self) -> Duration {
        self.max_time
    }

    /// Distance covered at the mode's speed within the time budget
    pub fn max_distance(&self) -> Meters {
        self.mode.speed_mps() * self.max_time.as_secs_f64()
    }
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            categories: BTreeSet::from([Category::Supermarket, Category::Pharmacy]),
            mode: TransportMode::Walking,
            max_time: Duration::from_secs(15 * 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn max_distance_follows_mode_speed() {
        let walking =
            AnalysisParameters::new([Category::Gym], TransportMode::Walking, Duration::from_secs(900))
                .unwrap();
        assert_relative_eq!(walking.max_distance(), 1250.0, epsilon = 1e-9);

        let driving = AnalysisParameters::new(
            [Category::Gym],
            TransportMode::Driving,
            Duration::from_secs(600),
        )
        .unwrap();
        assert_relative_eq!(driving.max_distance(), 40_000.0 / 6.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_time_is_rejected() {
        let result = AnalysisParameters::new([Category::Gym], TransportMode::Walking, Duration::ZERO);
        assert!(matches!(result, Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("walk".parse::<TransportMode>().unwrap(), TransportMode::Walking);
        assert_eq!("Driving".parse::<TransportMode>().unwrap(), TransportMode::Driving);
        assert!("bike".parse::<TransportMode>().is_err());
        assert_eq!(TransportMode::Driving.network_type(), "drive");
    }
}
