//! Geocoder placemarks and postal address formatting.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A geocoding result: a resolved location plus its address components.
///
/// Every component is optional; geocoders fill in whatever they know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Placemark {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    /// Neighbourhood / district
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Resolved location, if the geocoder produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
}

impl Placemark {
    /// Display name: placemark name, then country, then "Desconhecido".
    pub fn display_name(&self) -> String {
        self.name
            .as_ref()
            .or(self.country.as_ref())
            .cloned()
            .unwrap_or_else(|| "Desconhecido".to_string())
    }
}

/// Assemble the multi-line postal address of a placemark.
///
/// Components are appended in a fixed order with their own separator and
/// skipped when absent. Separators of the remaining components are kept as-is,
/// so a missing street still leaves the leading space before the number.
pub fn format_address(placemark: &Placemark) -> String {
    let mut address = String::new();

    if let Some(street) = &placemark.street {
        address.push_str(street);
    }
    if let Some(number) = &placemark.house_number {
        address.push(' ');
        address.push_str(number);
    }
    if let Some(sub_locality) = &placemark.sub_locality {
        address.push_str(", ");
        address.push_str(sub_locality);
    }
    if let Some(city) = &placemark.city {
        address.push('\n');
        address.push_str(city);
    }
    if let Some(state) = &placemark.state {
        address.push_str(" - ");
        address.push_str(state);
    }
    if let Some(postal_code) = &placemark.postal_code {
        address.push_str("\nCEP: ");
        address.push_str(postal_code);
    }
    if let Some(country) = &placemark.country {
        address.push('\n');
        address.push_str(country);
    }

    address
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> Placemark {
        Placemark {
            name: Some("MASP".to_string()),
            street: Some("Av. Paulista".to_string()),
            house_number: Some("1000".to_string()),
            sub_locality: Some("Bela Vista".to_string()),
            city: Some("São Paulo".to_string()),
            state: Some("SP".to_string()),
            postal_code: Some("01310-100".to_string()),
            country: Some("Brazil".to_string()),
            location: Some(Coordinate::new(-23.5614, -46.6559)),
        }
    }

    #[test]
    fn test_full_address() {
        assert_eq!(
            format_address(&paulista()),
            "Av. Paulista 1000, Bela Vista\nSão Paulo - SP\nCEP: 01310-100\nBrazil"
        );
    }

    #[test]
    fn test_missing_street_keeps_number_separator() {
        let placemark = Placemark {
            street: None,
            ..paulista()
        };
        assert_eq!(
            format_address(&placemark),
            " 1000, Bela Vista\nSão Paulo - SP\nCEP: 01310-100\nBrazil"
        );
    }

    #[test]
    fn test_missing_city_keeps_state_separator() {
        let placemark = Placemark {
            city: None,
            ..paulista()
        };
        assert_eq!(
            format_address(&placemark),
            "Av. Paulista 1000, Bela Vista - SP\nCEP: 01310-100\nBrazil"
        );
    }

    #[test]
    fn test_missing_middle_components() {
        let placemark = Placemark {
            sub_locality: None,
            postal_code: None,
            ..paulista()
        };
        assert_eq!(
            format_address(&placemark),
            "Av. Paulista 1000\nSão Paulo - SP\nBrazil"
        );
    }

    #[test]
    fn test_country_only() {
        let placemark = Placemark {
            country: Some("Brazil".to_string()),
            ..Default::default()
        };
        assert_eq!(format_address(&placemark), "\nBrazil");
    }

    #[test]
    fn test_empty_placemark() {
        assert_eq!(format_address(&Placemark::default()), "");
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(paulista().display_name(), "MASP");

        let no_name = Placemark {
            name: None,
            ..paulista()
        };
        assert_eq!(no_name.display_name(), "Brazil");

        assert_eq!(Placemark::default().display_name(), "Desconhecido");
    }
}
