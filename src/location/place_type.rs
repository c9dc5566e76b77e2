//! Mapping OpenStreetMap `type`/`class`/`amenity` tags onto [`PlaceType`].

use crate::models::PlaceType;
use std::collections::HashMap;

/// Provider address components keyed by OSM address field name.
pub type RawAddressComponents = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceClassification {
    pub place_type: PlaceType,
    pub place_name: String,
    pub osm_type: String,
    pub osm_class: String,
}

fn category_for(tag: &str) -> Option<PlaceType> {
    match tag {
        "restaurant" | "cafe" | "fast_food" => Some(PlaceType::Restaurant),
        "hotel" | "motel" | "hostel" => Some(PlaceType::Hotel),
        "shop" | "supermarket" | "mall" => Some(PlaceType::Magasin),
        "tourism" | "attraction" | "museum" => Some(PlaceType::Attraction),
        "hospital" | "school" | "university" => Some(PlaceType::Service),
        _ => None,
    }
}

/// Narrower table; a hit here overrides the type/class lookup.
fn amenity_category_for(amenity: &str) -> Option<PlaceType> {
    match amenity {
        "restaurant" | "cafe" | "fast_food" => Some(PlaceType::Restaurant),
        "hotel" | "motel" => Some(PlaceType::Hotel),
        "shop" | "supermarket" => Some(PlaceType::Magasin),
        _ => None,
    }
}

/// Classify a reverse-geocoding hit.
///
/// `type` is looked up first, then `class`; a recognised `amenity` address
/// component wins over both. The place name is the first comma-separated
/// segment of the display name.
pub fn classify(
    address: &RawAddressComponents,
    osm_type: &str,
    osm_class: &str,
    display_name: Option<&str>,
) -> PlaceClassification {
    let mut place_type = category_for(osm_type)
        .or_else(|| category_for(osm_class))
        .unwrap_or_default();

    if let Some(amenity_type) = address
        .get("amenity")
        .and_then(|amenity| amenity_category_for(amenity))
    {
        place_type = amenity_type;
    }

    let place_name = display_name
        .and_then(|name| name.split(',').next())
        .map(|segment| segment.trim().to_string())
        .unwrap_or_default();

    PlaceClassification {
        place_type,
        place_name,
        osm_type: osm_type.to_string(),
        osm_class: osm_class.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(pairs: &[(&str, &str)]) -> RawAddressComponents {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_type_lookup() {
        let result = classify(&components(&[]), "restaurant", "amenity", None);
        assert_eq!(result.place_type, PlaceType::Restaurant);
        assert_eq!(result.osm_type, "restaurant");
        assert_eq!(result.osm_class, "amenity");
    }

    #[test]
    fn test_class_used_when_type_misses() {
        let result = classify(&components(&[]), "yes", "tourism", None);
        assert_eq!(result.place_type, PlaceType::Attraction);

        let result = classify(&components(&[]), "residential", "shop", None);
        assert_eq!(result.place_type, PlaceType::Magasin);
    }

    #[test]
    fn test_amenity_overrides_type_table() {
        let address = components(&[("amenity", "hotel")]);
        let result = classify(&address, "", "", None);
        assert_eq!(result.place_type, PlaceType::Hotel);

        let address = components(&[("amenity", "cafe")]);
        let result = classify(&address, "museum", "tourism", None);
        assert_eq!(result.place_type, PlaceType::Restaurant);
    }

    #[test]
    fn test_unmapped_amenity_keeps_base_type() {
        let address = components(&[("amenity", "hostel")]);
        let result = classify(&address, "university", "amenity", None);
        assert_eq!(result.place_type, PlaceType::Service);
    }

    #[test]
    fn test_unknown_when_nothing_matches() {
        let result = classify(&components(&[]), "house", "building", None);
        assert_eq!(result.place_type, PlaceType::Unknown);

        let result = classify(&components(&[]), "", "", None);
        assert_eq!(result.place_type, PlaceType::Unknown);
    }

    #[test]
    fn test_place_name_is_first_display_segment() {
        let result = classify(
            &components(&[]),
            "",
            "",
            Some("  Le Procope , 13, Rue de l'Ancienne Comédie, Paris, France"),
        );
        assert_eq!(result.place_name, "Le Procope");

        let result = classify(&components(&[]), "", "", None);
        assert_eq!(result.place_name, "");
    }
}
