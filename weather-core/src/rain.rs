//! Rain intensity bands for Tomorrow.io `rainIntensity` readings (mm/h).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RainBand {
    NoRain,
    Weak,
    Moderate,
    Heavy,
    VeryHeavy,
    Shower,
    Cloudburst,
}

impl RainBand {
    /// Lower bound (inclusive) of each band above `NoRain`.
    const THRESHOLDS: [(f64, RainBand); 6] = [
        (30.0, RainBand::Cloudburst),
        (18.0, RainBand::Shower),
        (10.0, RainBand::VeryHeavy),
        (6.0, RainBand::Heavy),
        (2.0, RainBand::Moderate),
        (0.5, RainBand::Weak),
    ];

    /// Band for a reading in mm/h. Negative and NaN readings count as no rain.
    pub fn from_mm_per_hour(value: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(low, _)| value >= *low)
            .map(|(_, band)| *band)
            .unwrap_or(RainBand::NoRain)
    }

    /// Display label.
    ///
    /// `Weak` renders as "Week rain". Consumers match on this exact string, so
    /// the spelling stays until the product owner decides otherwise.
    pub fn label(&self) -> &'static str {
        match self {
            RainBand::NoRain => "No rain",
            RainBand::Weak => "Week rain",
            RainBand::Moderate => "Moderate rain",
            RainBand::Heavy => "Heavy rain",
            RainBand::VeryHeavy => "Very heavy rain",
            RainBand::Shower => "Shower",
            RainBand::Cloudburst => "Cloudburst",
        }
    }
}

impl std::fmt::Display for RainBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A reading together with its band, rendered as `"<value> mm/h <label>"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainIntensity {
    pub band: RainBand,
    pub mm_per_hour: f64,
}

impl RainIntensity {
    pub fn value_text(&self) -> String {
        format!("{} mm/h", self.mm_per_hour)
    }
}

impl std::fmt::Display for RainIntensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} mm/h {}", self.mm_per_hour, self.band)
    }
}

pub fn classify_rain_intensity(mm_per_hour: f64) -> RainIntensity {
    RainIntensity {
        band: RainBand::from_mm_per_hour(mm_per_hour),
        mm_per_hour,
    }
}
