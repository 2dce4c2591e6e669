//! Saved shipping address types.

use facet_core::{AddressId, AddressType, City};
use serde::{Deserialize, Serialize};

/// Country pre-filled by the address form.
///
/// Kept byte-for-byte as the backend has always received it; order payloads
/// do not read it (see `checkout::payload`).
pub const DEFAULT_COUNTRY: &str = "United State";

/// A saved shipping address, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Server-assigned identifier.
    pub id: AddressId,
    /// Recipient full name.
    #[serde(default)]
    pub name: String,
    /// Recipient phone number (may be blank).
    #[serde(default)]
    pub phone: String,
    /// Street line.
    #[serde(default, alias = "address_line1")]
    pub line1: String,
    /// City name.
    #[serde(default)]
    pub city: String,
    /// Country as stored by the backend.
    #[serde(default)]
    pub country: String,
    /// Home or other.
    #[serde(rename = "type", default)]
    pub address_type: AddressType,
    /// Whether this is the user's default address.
    #[serde(default, alias = "isDefault")]
    pub is_default: bool,
}

/// Body of a create-address request: an [`Address`] without its ID.
///
/// Construct through `checkout::AddressForm::validate`, which enforces the
/// form constraints before anything reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressInput {
    /// Recipient full name.
    pub name: String,
    /// Recipient phone number.
    pub phone: String,
    /// Street line.
    pub line1: String,
    /// City from the fixed delivery list.
    pub city: City,
    /// Country text.
    pub country: String,
    /// Home or other.
    #[serde(rename = "type")]
    pub address_type: AddressType,
    /// Request that the new address become the default.
    pub is_default: bool,
}

/// List endpoint response: a bare array, or an array wrapped in an envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AddressList {
    Bare(Vec<Address>),
    Data { data: Vec<Address> },
    Named { addresses: Vec<Address> },
}

impl From<AddressList> for Vec<Address> {
    fn from(list: AddressList) -> Self {
        match list {
            AddressList::Bare(addresses)
            | AddressList::Data { data: addresses }
            | AddressList::Named { addresses } => addresses,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_address_normalizes_loose_fields() {
        let address: Address = serde_json::from_value(json!({
            "id": "12",
            "name": "Jane Doe",
            "address_line1": "1 Gem St",
            "city": "Chicago",
            "type": "OTHER",
            "isDefault": true
        }))
        .unwrap();

        assert_eq!(address.id, AddressId::from(12));
        assert_eq!(address.line1, "1 Gem St");
        assert_eq!(address.phone, "");
        assert_eq!(address.address_type, AddressType::Other);
        assert!(address.is_default);
    }

    #[test]
    fn test_address_list_envelopes() {
        let item = json!({ "id": 1, "name": "A" });
        for body in [
            json!([item.clone()]),
            json!({ "data": [item.clone()] }),
            json!({ "addresses": [item] }),
        ] {
            let list: AddressList = serde_json::from_value(body).unwrap();
            let addresses: Vec<Address> = list.into();
            assert_eq!(addresses.len(), 1);
        }
    }

    #[test]
    fn test_address_list_mixes_numeric_and_key_ids() {
        let list: AddressList = serde_json::from_value(json!([
            { "id": 1, "name": "A" },
            { "id": "65f1c0ab2e", "name": "B" }
        ]))
        .unwrap();
        let addresses: Vec<Address> = list.into();

        let ids: Vec<&str> = addresses.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["1", "65f1c0ab2e"]);
    }

    #[test]
    fn test_address_input_wire_format() {
        let input = AddressInput {
            name: "Jane Doe".to_string(),
            phone: "555-0100".to_string(),
            line1: "1 Gem St".to_string(),
            city: City::NewYork,
            country: DEFAULT_COUNTRY.to_string(),
            address_type: AddressType::Home,
            is_default: false,
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["city"], "New York");
        assert_eq!(value["type"], "HOME");
        assert_eq!(value["country"], "United State");
        assert!(value.get("id").is_none());
    }
}
