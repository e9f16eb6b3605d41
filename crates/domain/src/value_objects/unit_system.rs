//! Unit system requested from the forecast provider

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement units the forecast provider reports temperatures in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Imperial units, temperatures in Fahrenheit
    #[default]
    Us,
    /// SI units, temperatures in Celsius
    Si,
    /// Same as SI, wind speed in km/h
    Ca,
    /// Same as SI, distances in miles
    Uk2,
}

impl UnitSystem {
    /// Identifier used in the provider's `units` query parameter
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Si => "si",
            Self::Ca => "ca",
            Self::Uk2 => "uk2",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UnitSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "us" => Ok(Self::Us),
            "si" => Ok(Self::Si),
            "ca" => Ok(Self::Ca),
            "uk2" => Ok(Self::Uk2),
            _ => Err(format!("Invalid unit system: {s}. Use us, si, ca or uk2")),
        }
    }
}
