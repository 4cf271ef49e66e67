use chrono::{DateTime, Utc};
use reqwest::Client;

use crate::client::{auth::PlantbookAuth, types::*};
use crate::error::{Error, Result};

/// Default OpenPlantbook API base URL.
pub const DEFAULT_BASE_URL: &str = "https://open.plantbook.io/api/v1";

/// Asynchronous client for the OpenPlantbook API.
///
/// Operations obtain a bearer token lazily on first use and transparently
/// refresh it when it nears expiry. The client is cheap to share: all
/// methods take `&self` and may be called from multiple tasks concurrently.
pub struct PlantbookClient {
    base_url: String,
    client: Client,
    auth: PlantbookAuth,
}

impl PlantbookClient {
    /// Create a client against the public OpenPlantbook API.
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::with_base_url(client_id, secret, DEFAULT_BASE_URL)
    }

    /// Create a client against a different base URL (testing, staging).
    pub fn with_base_url(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            auth: PlantbookAuth::new(base_url.clone(), client_id.into(), secret.into()),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a cached token with enough remaining validity is present.
    pub async fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated().await
    }

    /// Seed the token cache with a token obtained out-of-band, e.g. one
    /// persisted from a previous process.
    pub async fn set_token(&self, access_token: impl Into<String>, expires_at: DateTime<Utc>) {
        self.auth.set_token(access_token.into(), expires_at).await;
    }

    async fn auth_header(&self) -> Result<String> {
        let token = self.auth.access_token().await?;
        Ok(format!("Bearer {}", token))
    }

    // Plant operations

    /// Search plants by alias.
    ///
    /// Returns a paginated page with the total result count.
    pub async fn search_plants(
        &self,
        alias: &str,
        lang: Option<&str>,
    ) -> Result<PaginatedResponse<PlantSearchResult>> {
        let auth_header = self.auth_header().await?;
        let mut url = format!(
            "{}/plant/search?alias={}",
            self.base_url,
            urlencoding::encode(alias)
        );
        if let Some(lang) = lang {
            url.push_str(&format!("&lang={}", urlencoding::encode(lang)));
        }

        tracing::debug!("Searching plants: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth_header)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_response(response).await?;

        let page: PaginatedResponse<PlantSearchResult> = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse plant search response: {}", e);
            Error::Http(e)
        })?;

        tracing::debug!("Plant search returned {} results", page.count);
        Ok(page)
    }

    /// Retrieve the full species record for a Plant ID (PID).
    ///
    /// `lang` is an ISO 639-1 language code forwarded as the `lang` query
    /// parameter; the API localizes the alias and display fields.
    pub async fn get_plant_detail(&self, pid: &str, lang: Option<&str>) -> Result<PlantDetail> {
        let auth_header = self.auth_header().await?;
        let mut url = format!(
            "{}/plant/detail/{}",
            self.base_url,
            urlencoding::encode(pid)
        );
        if let Some(lang) = lang {
            url.push_str(&format!("?lang={}", urlencoding::encode(lang)));
        }

        tracing::debug!("Fetching plant detail: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", auth_header)
            .send()
            .await
            .map_err(transport_error)?;
        let response = error_for_response(response).await?;

        let detail = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse plant detail response: {}", e);
            Error::Http(e)
        })?;

        Ok(detail)
    }

    // Sensor data operations

    /// Register plant instances, binding caller-chosen sensor ids to PIDs.
    ///
    /// Entries are registered one at a time in the given order. A rejected
    /// entry aborts the call with [`Error::Validation`]; instances registered
    /// before it remain registered server-side.
    pub async fn register_plant_instances(
        &self,
        sensor_pid_map: &[(&str, &str)],
        location: &PlantLocation,
    ) -> Result<Vec<PlantInstance>> {
        let auth_header = self.auth_header().await?;
        let url = format!("{}/sensor-data/instance", self.base_url);

        let mut instances = Vec::with_capacity(sensor_pid_map.len());
        for (custom_id, pid) in sensor_pid_map.iter().copied() {
            let request = RegisterInstanceRequest {
                custom_id,
                pid,
                location,
            };

            let response = self
                .client
                .post(&url)
                .header("Authorization", auth_header.clone())
                .json(&request)
                .send()
                .await
                .map_err(transport_error)?;
            let response = error_for_response(response).await?;

            let instance: PlantInstance = response.json().await.map_err(|e| {
                tracing::error!("Failed to parse instance registration response: {}", e);
                Error::Http(e)
            })?;

            tracing::debug!("Registered plant instance: {} -> {}", custom_id, pid);
            instances.push(instance);
        }

        Ok(instances)
    }

    /// Upload sensor telemetry as a JTS document.
    ///
    /// With `dry_run` set, the API validates the payload without persisting
    /// any values.
    pub async fn upload_sensor_data(&self, document: &JtsDocument, dry_run: bool) -> Result<()> {
        let auth_header = self.auth_header().await?;
        let url = format!("{}/sensor-data/upload?dry_run={}", self.base_url, dry_run);

        tracing::debug!(
            "Uploading sensor data: {} series, dry_run={}",
            document.series().len(),
            dry_run
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", auth_header)
            .json(document)
            .send()
            .await
            .map_err(transport_error)?;
        error_for_response(response).await?;

        Ok(())
    }
}

fn transport_error(e: reqwest::Error) -> Error {
    tracing::error!("Network error calling OpenPlantbook API: {}", e);
    Error::Http(e)
}

/// Map a non-2xx response to a typed error, reading the body for triage.
///
/// A 400 whose body is a `validation_error` document becomes
/// [`Error::Validation`] with the field errors preserved; everything else
/// becomes [`Error::Api`].
async fn error_for_response(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    tracing::error!("API request failed with status {}: {}", status, error_body);

    if status.as_u16() == 400 {
        if let Ok(body) = serde_json::from_str::<ApiErrorBody>(&error_body) {
            if body.kind == "validation_error" {
                return Err(Error::validation(body.errors));
            }
        }
    }

    Err(Error::api(status.as_u16(), error_body))
}
