//! New-address form validation.

use facet_core::{AddressType, City};

use super::error::ValidationError;
use crate::api::AddressInput;
use crate::api::addresses::DEFAULT_COUNTRY;

/// Raw values of the "add address" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressForm {
    pub name: String,
    pub phone: String,
    pub line1: String,
    /// City as picked from the delivery list.
    pub city: String,
    /// Country text; blank means the form's pre-filled default.
    pub country: String,
    pub address_type: AddressType,
    pub is_default: bool,
}

impl AddressForm {
    /// Check the form constraints and build the create-address body.
    ///
    /// Name, phone and street line must be non-blank, and the city must be
    /// one of the supported delivery cities. Text fields are trimmed.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, in form order.
    pub fn validate(&self) -> Result<AddressInput, ValidationError> {
        let name = required(&self.name, "name")?;
        let phone = required(&self.phone, "phone number")?;
        let line1 = required(&self.line1, "street address")?;

        let city = City::from_name(&self.city)
            .ok_or_else(|| ValidationError::UnsupportedCity(self.city.trim().to_owned()))?;

        let country = match self.country.trim() {
            "" => DEFAULT_COUNTRY.to_owned(),
            country => country.to_owned(),
        };

        Ok(AddressInput {
            name,
            phone,
            line1,
            city,
            country,
            address_type: self.address_type,
            is_default: self.is_default,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_owned())
    }
}
