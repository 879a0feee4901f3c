//! WMO weather interpretation codes as reported by Open-Meteo.

/// Description used for codes missing from [`WEATHER_DESCRIPTIONS`].
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

pub const WEATHER_DESCRIPTIONS: &[(u8, &str)] = &[
    (0, "Clear sky"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Foggy"),
    (48, "Depositing rime fog"),
    (51, "Light drizzle"),
    (53, "Moderate drizzle"),
    (55, "Dense drizzle"),
    (61, "Slight rain"),
    (63, "Moderate rain"),
    (65, "Heavy rain"),
    (71, "Slight snow fall"),
    (73, "Moderate snow fall"),
    (75, "Heavy snow fall"),
    (77, "Snow grains"),
    (80, "Slight rain showers"),
    (81, "Moderate rain showers"),
    (82, "Violent rain showers"),
    (85, "Slight snow showers"),
    (86, "Heavy snow showers"),
    (95, "Thunderstorm"),
    (96, "Thunderstorm with slight hail"),
    (99, "Thunderstorm with heavy hail"),
];

/// Looks up a code, returning `None` when it is not in the table.
pub fn lookup(code: u8) -> Option<&'static str> {
    WEATHER_DESCRIPTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, description)| *description)
}

/// Human-readable description of `code`, or [`UNKNOWN_DESCRIPTION`].
pub fn describe(code: u8) -> &'static str {
    lookup(code).unwrap_or(UNKNOWN_DESCRIPTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(describe(0), "Clear sky");
        assert_eq!(describe(3), "Overcast");
        assert_eq!(describe(48), "Depositing rime fog");
        assert_eq!(describe(95), "Thunderstorm");
        assert_eq!(describe(99), "Thunderstorm with heavy hail");
    }

    #[test]
    fn unmapped_codes_fall_back() {
        for code in [4, 56, 66, 100, 255] {
            assert_eq!(lookup(code), None);
            assert_eq!(describe(code), UNKNOWN_DESCRIPTION);
        }
    }

    #[test]
    fn every_entry_is_non_empty_and_unique() {
        for (i, (code, description)) in WEATHER_DESCRIPTIONS.iter().enumerate() {
            assert!(!description.is_empty());
            assert!(
                WEATHER_DESCRIPTIONS[i + 1..].iter().all(|(c, _)| c != code),
                "duplicate code {code}"
            );
        }
        assert_eq!(WEATHER_DESCRIPTIONS.len(), 24);
    }
}
