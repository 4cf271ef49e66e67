//! # OpenPlantbook HTTP Client
//!
//! This module provides the HTTP client for the OpenPlantbook API, handling
//! token management, plant search and detail lookups, plant instance
//! registration, and sensor data upload.
//!
//! ## Modules
//!
//! - [`auth`] - OAuth2 client-credentials token handling
//! - [`client`] - Main HTTP client implementation with all API methods
//! - [`types`] - Type definitions for API requests and responses
//!
//! ## Quick Start
//!
//! ```no_run
//! use openplantbook_sdk::client::PlantbookClient;
//!
//! # async fn example() -> openplantbook_sdk::Result<()> {
//! let client = PlantbookClient::new("client-id", "client-secret");
//!
//! // Search for plants; the token is obtained on first use
//! let page = client.search_plants("abelia chinensis", None).await?;
//! println!("Found {} plants", page.count);
//! # Ok(())
//! # }
//! ```

pub mod auth;
#[allow(clippy::module_inception)]
pub mod client;
pub mod types;

pub use client::{PlantbookClient, DEFAULT_BASE_URL};
pub use types::*;
