//! # OpenPlantbook SDK
//!
//! Asynchronous client library for the [OpenPlantbook](https://open.plantbook.io)
//! plant database API. It consists of two main components:
//!
//! ## Client Module
//!
//! The [`client`] module provides the HTTP client for the OpenPlantbook API,
//! handling OAuth2 token management, plant search and detail lookups, plant
//! instance registration, and sensor telemetry upload.
//!
//! ## Error Module
//!
//! The [`error`] module defines the typed failure taxonomy shared by every
//! operation: missing or rejected credentials, structured validation errors,
//! API status errors, and transport failures.
//!
//! ## Quick Start
//!
//! ```no_run
//! use openplantbook_sdk::PlantbookClient;
//!
//! # async fn example() -> openplantbook_sdk::Result<()> {
//! let client = PlantbookClient::new("client-id", "client-secret");
//!
//! let page = client.search_plants("abelia", None).await?;
//! for plant in &page.results {
//!     println!("{} ({})", plant.display_pid, plant.alias);
//! }
//!
//! let detail = client.get_plant_detail("abelia chinensis", Some("en")).await?;
//! println!("Keep between {}°C and {}°C", detail.min_temp, detail.max_temp);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;

pub use client::{
    JtsDocument, PaginatedResponse, PlantDetail, PlantInstance, PlantLocation, PlantSearchResult,
    PlantbookClient, TimeSeries, TsRecord, DEFAULT_BASE_URL,
};
pub use error::{Error, FieldError, Result};
