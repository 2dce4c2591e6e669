//! Cities the address form can deliver to.

use serde::{Deserialize, Serialize};

use super::status::ParseEnumError;

/// A city from the fixed delivery list.
///
/// The address form only offers these entries, so an address created through
/// checkout always carries one of them. Addresses loaded from the API keep
/// their city as free text; see [`City::from_name`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum City {
    NewYork,
    LosAngeles,
    Chicago,
    Houston,
    Phoenix,
    Philadelphia,
    SanAntonio,
    SanDiego,
    Dallas,
    Miami,
}

impl City {
    /// Every supported city, in form order.
    pub const ALL: [Self; 10] = [
        Self::NewYork,
        Self::LosAngeles,
        Self::Chicago,
        Self::Houston,
        Self::Phoenix,
        Self::Philadelphia,
        Self::SanAntonio,
        Self::SanDiego,
        Self::Dallas,
        Self::Miami,
    ];

    /// Display name, also the value stored on the address.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NewYork => "New York",
            Self::LosAngeles => "Los Angeles",
            Self::Chicago => "Chicago",
            Self::Houston => "Houston",
            Self::Phoenix => "Phoenix",
            Self::Philadelphia => "Philadelphia",
            Self::SanAntonio => "San Antonio",
            Self::SanDiego => "San Diego",
            Self::Dallas => "Dallas",
            Self::Miami => "Miami",
        }
    }

    /// Look up a city by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|city| city.name().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for City {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for City {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ParseEnumError {
            kind: "city",
            value: s.to_owned(),
        })
    }
}

impl From<City> for &'static str {
    fn from(city: City) -> Self {
        city.name()
    }
}

impl TryFrom<String> for City {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(City::from_name(" new york "), Some(City::NewYork));
        assert_eq!(City::from_name("SAN DIEGO"), Some(City::SanDiego));
        assert_eq!(City::from_name("Atlantis"), None);
    }

    #[test]
    fn test_serde_uses_display_name() {
        assert_eq!(
            serde_json::to_string(&City::LosAngeles).unwrap(),
            "\"Los Angeles\""
        );
        let city: City = serde_json::from_str("\"Miami\"").unwrap();
        assert_eq!(city, City::Miami);
        assert!(serde_json::from_str::<City>("\"Gotham\"").is_err());
    }
}
