//! Predefined locations offered by the Tomorrow.io front end.

use crate::model::{Coordinates, Location};

pub const LOCATIONS: [Location; 6] = [
    Location {
        id: 1,
        city: "Hamburg",
        country: "Germany",
        coordinates: Coordinates::from_static(53.5488, 9.9872),
    },
    Location {
        id: 2,
        city: "Dubai",
        country: "United Arab Emirates",
        coordinates: Coordinates::from_static(25.0757595, 54.9475536),
    },
    Location {
        id: 3,
        city: "Tehran",
        country: "Iran",
        coordinates: Coordinates::from_static(35.7219, 51.3347),
    },
    Location {
        id: 4,
        city: "Erlangen",
        country: "Germany",
        coordinates: Coordinates::from_static(49.5897, 11.0120),
    },
    Location {
        id: 5,
        city: "New York, New York",
        country: "United States",
        coordinates: Coordinates::from_static(40.6971494, -74.2598666),
    },
    Location {
        id: 6,
        city: "London",
        country: "United Kingdom",
        coordinates: Coordinates::from_static(51.5285582, -0.2416813),
    },
];

pub fn all_locations() -> &'static [Location] {
    &LOCATIONS
}

/// Look up a location by its 1-based id.
pub fn location_by_id(id: u32) -> Option<&'static Location> {
    LOCATIONS.iter().find(|location| location.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_one_based_and_sequential() {
        let ids: Vec<u32> = all_locations().iter().map(|l| l.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn lookup_by_id() {
        let hamburg = location_by_id(1).expect("Hamburg is location 1");
        assert_eq!(hamburg.city, "Hamburg");
        assert_eq!(hamburg.coordinates.latitude(), 53.5488);

        assert_eq!(location_by_id(6).map(|l| l.city), Some("London"));
        assert!(location_by_id(0).is_none());
        assert!(location_by_id(7).is_none());
    }

    #[test]
    fn static_coordinates_are_in_range() {
        for location in all_locations() {
            let c = location.coordinates;
            assert!(
                Coordinates::new(c.latitude(), c.longitude()).is_ok(),
                "{} has out-of-range coordinates",
                location.city
            );
        }
    }
}
