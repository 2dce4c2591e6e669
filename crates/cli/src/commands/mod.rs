//! CLI subcommands.

pub mod addresses;
pub mod checkout;
pub mod totals;

use std::path::{Path, PathBuf};

use facet_storefront::api::ApiError;
use facet_storefront::checkout::{CheckoutError, ValidationError};
use facet_storefront::config::ConfigError;
use facet_storefront::services::CartLine;
use thiserror::Error;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A marketplace API request failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Checkout stopped with an error.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// Address arguments were rejected before sending.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The cart file could not be read.
    #[error("Failed to read cart file {}: {source}", .path.display())]
    CartRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The cart file is not a JSON array of cart lines.
    #[error("Invalid cart file {}: {source}", .path.display())]
    CartFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The cart file has no lines.
    #[error("Cart is empty, nothing to check out")]
    EmptyCart,
}

/// Load cart lines from a JSON file.
async fn load_cart(path: &Path) -> Result<Vec<CartLine>, CommandError> {
    let content =
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CommandError::CartRead {
                path: path.to_path_buf(),
                source,
            })?;

    let lines: Vec<CartLine> =
        serde_json::from_str(&content).map_err(|source| CommandError::CartFormat {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), lines = lines.len(), "Loaded cart file");
    Ok(lines)
}
