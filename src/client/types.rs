//! Type definitions for the OpenPlantbook API.
//!
//! This module contains the data structures used for communicating with the
//! OpenPlantbook API: token exchange, plant search and detail responses,
//! plant instance registration, and the JSON Time Series (JTS) document
//! format used for sensor data upload.
//!
//! ## Key Types
//!
//! - [`PlantSearchResult`] - A single row from the plant search endpoint
//! - [`PlantDetail`] - Full species record with care thresholds
//! - [`PlantInstance`] - A registered plant instance (sensor binding)
//! - [`PaginatedResponse`] - Standard API response wrapper for lists
//! - [`JtsDocument`] - Sensor telemetry payload for upload
//!
//! ## API Compatibility
//!
//! Several fields are optional to handle varying API response formats:
//! older plant records may lack the mmol light thresholds, and instance
//! registration responses omit location fields that were not supplied.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Form payload for the OAuth client-credentials token exchange.
#[derive(Debug, Serialize)]
pub(crate) struct TokenRequest<'a> {
    pub grant_type: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Token exchange response from `POST /token/`.
///
/// `access_token` is optional because the endpoint answers 200 with a
/// token-less body when the client id/secret pair is rejected.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    /// Token lifetime in seconds from now
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

/// Standard paginated response wrapper used by OpenPlantbook list endpoints.
///
/// This follows Django REST framework pagination format.
#[derive(Debug, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Total number of items across all pages
    pub count: i32,
    /// URL for the next page of results
    pub next: Option<String>,
    /// URL for the previous page of results
    pub previous: Option<String>,
    /// Items for the current page
    pub results: Vec<T>,
}

/// A single plant returned by the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSearchResult {
    /// Plant ID, the species key accepted by the detail endpoint
    pub pid: String,
    /// Capitalized display form of the PID
    pub display_pid: String,
    /// Common name the plant is also known under
    pub alias: String,
    /// Botanical family and genus
    #[serde(default)]
    pub category: Option<String>,
}

/// Full species record from the plant detail endpoint.
///
/// The min/max pairs are the recommended care thresholds for the species:
/// light (in mmol and lux), air temperature, environment humidity, soil
/// moisture, and soil conductivity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantDetail {
    /// Plant ID (species key)
    pub pid: String,
    /// Capitalized display form of the PID
    pub display_pid: String,
    /// Common name the plant is also known under
    pub alias: String,
    /// Botanical family and genus
    #[serde(default)]
    pub category: Option<String>,
    /// Daily light integral ceiling, mmol/m²/day (absent on older records)
    #[serde(default)]
    pub max_light_mmol: Option<f64>,
    /// Daily light integral floor, mmol/m²/day (absent on older records)
    #[serde(default)]
    pub min_light_mmol: Option<f64>,
    /// Instantaneous light ceiling, lux
    pub max_light_lux: f64,
    /// Instantaneous light floor, lux
    pub min_light_lux: f64,
    /// Air temperature ceiling, °C
    pub max_temp: f64,
    /// Air temperature floor, °C
    pub min_temp: f64,
    /// Environment humidity ceiling, percent
    pub max_env_humid: f64,
    /// Environment humidity floor, percent
    pub min_env_humid: f64,
    /// Soil moisture ceiling, percent
    pub max_soil_moist: f64,
    /// Soil moisture floor, percent
    pub min_soil_moist: f64,
    /// Soil conductivity ceiling, µS/cm
    pub max_soil_ec: f64,
    /// Soil conductivity floor, µS/cm
    pub min_soil_ec: f64,
    /// Species image
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Optional location metadata attached to a plant instance registration.
///
/// Fields left as `None` are omitted from the request payload entirely,
/// matching what the API expects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PlantLocation {
    /// Let the API derive the location from the caller's IP address
    #[serde(rename = "location_by_IP", skip_serializing_if = "Option::is_none")]
    pub by_ip: Option<bool>,
    /// ISO 3166-1 alpha-2 country code
    #[serde(rename = "location_country", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Longitude of the plant
    #[serde(rename = "location_lon", skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    /// Latitude of the plant
    #[serde(rename = "location_lat", skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
}

/// Request payload for registering one plant instance.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterInstanceRequest<'a> {
    pub custom_id: &'a str,
    pub pid: &'a str,
    #[serde(flatten)]
    pub location: &'a PlantLocation,
}

/// A registered plant instance as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantInstance {
    /// Server-assigned instance id, used as the series identifier for upload
    pub id: String,
    /// Caller-chosen identifier passed at registration
    pub custom_id: String,
    /// Species key the instance is bound to
    pub pid: String,
    #[serde(default)]
    pub location_country: Option<String>,
    #[serde(default)]
    pub location_lon: Option<f64>,
    #[serde(default)]
    pub location_lat: Option<f64>,
}

/// Error body returned by the API for rejected payloads.
///
/// Only bodies with `type == "validation_error"` carry field errors; other
/// 4xx bodies do not parse into this shape.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

/// A single timestamped measurement within a [`TimeSeries`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsRecord {
    /// Moment the measurement was taken
    pub timestamp: DateTime<Utc>,
    /// Measured value
    pub value: f64,
}

impl TsRecord {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// One measurement stream for one registered plant instance.
///
/// `identifier` is the server-assigned [`PlantInstance::id`]; `name` is the
/// measurement kind (`temp`, `soil_moist`, `soil_ec`, `light_lux`, ...).
#[derive(Debug, Clone)]
pub struct TimeSeries {
    identifier: String,
    name: String,
    records: Vec<TsRecord>,
}

impl TimeSeries {
    pub fn new(identifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            records: Vec::new(),
        }
    }

    /// Append a measurement to the series.
    pub fn insert(&mut self, record: TsRecord) {
        self.records.push(record);
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[TsRecord] {
        &self.records
    }
}

/// Sensor telemetry payload in JSON Time Series (JTS) document format.
///
/// The document serializes to the wire shape the upload endpoint expects:
/// a `header` describing each series as an index-keyed column, and `data`
/// rows keyed by timestamp with one value slot per column:
///
/// ```json
/// {
///   "docType": "jts",
///   "version": "1.0",
///   "header": {
///     "startTime": "...", "endTime": "...", "recordCount": 2,
///     "columns": { "0": { "id": "<instance id>", "name": "temp", "dataType": "NUMBER" } }
///   },
///   "data": [ { "ts": "...", "f": { "0": { "v": 21.5 } } } ]
/// }
/// ```
///
/// Rows are merged across series by timestamp and sorted chronologically.
#[derive(Debug, Clone, Default)]
pub struct JtsDocument {
    series: Vec<TimeSeries>,
}

impl JtsDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_series(series: Vec<TimeSeries>) -> Self {
        Self { series }
    }

    /// Add a series to the document. Column indices follow insertion order.
    pub fn add_series(&mut self, series: TimeSeries) {
        self.series.push(series);
    }

    pub fn series(&self) -> &[TimeSeries] {
        &self.series
    }

    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.records.is_empty())
    }

    /// Build the JTS wire representation.
    pub fn to_value(&self) -> serde_json::Value {
        let mut columns = serde_json::Map::new();
        for (index, series) in self.series.iter().enumerate() {
            columns.insert(
                index.to_string(),
                serde_json::json!({
                    "id": series.identifier,
                    "name": series.name,
                    "dataType": "NUMBER",
                }),
            );
        }

        // Merge all series into one row per timestamp, column-indexed.
        let mut rows: BTreeMap<DateTime<Utc>, BTreeMap<usize, f64>> = BTreeMap::new();
        for (index, series) in self.series.iter().enumerate() {
            for record in &series.records {
                rows.entry(record.timestamp)
                    .or_default()
                    .insert(index, record.value);
            }
        }

        let mut header = serde_json::Map::new();
        if let (Some(start), Some(end)) = (rows.keys().next(), rows.keys().next_back()) {
            header.insert("startTime".to_string(), serde_json::json!(format_ts(start)));
            header.insert("endTime".to_string(), serde_json::json!(format_ts(end)));
        }
        header.insert("recordCount".to_string(), serde_json::json!(rows.len()));
        header.insert("columns".to_string(), serde_json::Value::Object(columns));

        let data: Vec<serde_json::Value> = rows
            .iter()
            .map(|(ts, fields)| {
                let f: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|(index, value)| (index.to_string(), serde_json::json!({ "v": value })))
                    .collect();
                serde_json::json!({ "ts": format_ts(ts), "f": f })
            })
            .collect();

        serde_json::json!({
            "docType": "jts",
            "version": "1.0",
            "header": header,
            "data": data,
        })
    }
}

impl Serialize for JtsDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

fn format_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
