//! Saved address management.
//!
//! # Usage
//!
//! ```bash
//! facet addresses list
//! facet addresses add -n "Jane Doe" -p 555-0100 -l "1 Gem St" -c Chicago --default
//! facet addresses delete 12 --yes
//! ```

use clap::{Args, Subcommand};
use facet_core::{AddressId, AddressType};
use facet_storefront::api::{Address, AddressApi, MarketplaceClient};
use facet_storefront::checkout::AddressForm;
use facet_storefront::config::StorefrontConfig;
use facet_storefront::services::CheckoutView;
use tracing::info;

use super::CommandError;
use crate::terminal::TerminalView;

#[derive(Subcommand)]
pub enum AddressAction {
    /// List saved addresses
    List,
    /// Save a new address
    Add(AddArgs),
    /// Delete a saved address
    Delete {
        /// Address ID
        id: AddressId,

        /// Delete without asking
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct AddArgs {
    /// Recipient full name
    #[arg(short, long)]
    name: String,

    /// Recipient phone number
    #[arg(short, long)]
    phone: String,

    /// Street line
    #[arg(short, long)]
    line1: String,

    /// Delivery city
    #[arg(short, long)]
    city: String,

    /// Country (defaults to the form's pre-filled country)
    #[arg(long, default_value = "")]
    country: String,

    /// Address type (`home` or `other`)
    #[arg(long, default_value = "home")]
    address_type: AddressType,

    /// Make this the default address
    #[arg(long)]
    default: bool,
}

impl From<AddArgs> for AddressForm {
    fn from(args: AddArgs) -> Self {
        Self {
            name: args.name,
            phone: args.phone,
            line1: args.line1,
            city: args.city,
            country: args.country,
            address_type: args.address_type,
            is_default: args.default,
        }
    }
}

/// Run an address subcommand.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the API request fails.
pub async fn run(config: &StorefrontConfig, action: AddressAction) -> Result<(), CommandError> {
    let client = MarketplaceClient::new(&config.api)?;

    match action {
        AddressAction::List => {
            let addresses = client.list_addresses().await?;
            if addresses.is_empty() {
                info!("No saved addresses");
            }
            for address in &addresses {
                info!("{}", describe(address));
            }
        }
        AddressAction::Add(args) => {
            let input = AddressForm::from(args).validate()?;
            let address = client.create_address(&input).await?;
            info!("Saved {}", describe(&address));
        }
        AddressAction::Delete { id, yes } => {
            if !TerminalView::new(yes).confirm("Are you sure you want to delete this address?") {
                info!("Address {id} kept");
                return Ok(());
            }
            client.delete_address(&id).await?;
            info!("Address {id} deleted");
        }
    }

    Ok(())
}

fn describe(address: &Address) -> String {
    let marker = if address.is_default { " (default)" } else { "" };
    format!(
        "[{}] {} - {}, {}, {} - {}{marker}",
        address.id, address.name, address.line1, address.city, address.country, address.address_type
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_marks_default() {
        let address = Address {
            id: AddressId::from(12),
            name: "Jane Doe".to_string(),
            phone: String::new(),
            line1: "1 Gem St".to_string(),
            city: "Chicago".to_string(),
            country: "United State".to_string(),
            address_type: AddressType::Home,
            is_default: true,
        };
        let line = describe(&address);
        assert!(line.starts_with("[12] Jane Doe - 1 Gem St, Chicago"));
        assert!(line.ends_with("(default)"));
    }
}
