//! HTTP client for a PocketBase-style records API.
//!
//! Talks to `/api/collections/{collection}/records`; errors come back as
//! `{"code": ..., "message": ..., "data": {...}}`.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::RecordStore;
use crate::config::DashboardConfig;
use crate::domain::{Product, ProductCreate, ProductPatch};
use crate::error::StoreError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListPage {
    items: Vec<Product>,
    /// Page size the service actually applied, which may be capped below the request.
    #[serde(default)]
    per_page: Option<u32>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct PocketBaseStore {
    client: Client,
    records_url: Url,
    page_size: u32,
    sort: Option<String>,
    auth_token: Option<String>,
}

impl PocketBaseStore {
    pub fn new(config: &DashboardConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let mut records_url = config.base_url.clone();
        records_url
            .path_segments_mut()
            .map_err(|_| StoreError::Network(format!("cannot build URLs on {}", config.base_url)))?
            .pop_if_empty()
            .extend(["api", "collections", config.collection.as_str(), "records"]);

        Ok(Self {
            client,
            records_url,
            page_size: config.page_size,
            sort: config.sort.clone(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn record_url(&self, id: &str) -> Url {
        let mut url = self.records_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.header(AUTHORIZATION, token),
            None => request,
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<ListPage, StoreError> {
        let mut query = vec![
            ("page", page.to_string()),
            ("perPage", self.page_size.to_string()),
            ("skipTotal", "1".to_string()),
        ];
        if let Some(sort) = &self.sort {
            query.push(("sort", sort.clone()));
        }

        let request = self.client.get(self.records_url.clone()).query(&query);
        let response = self.authorize(request).send().await.map_err(transport)?;
        decode(check(response, None).await?).await
    }
}

#[async_trait]
impl RecordStore for PocketBaseStore {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>, StoreError> {
        let mut records = Vec::new();
        let mut page = 1;
        loop {
            debug!(page, "Fetching page");
            let listing = self.fetch_page(page).await?;
            let per_page = listing
                .per_page
                .filter(|&n| n > 0)
                .unwrap_or(self.page_size)
                .min(self.page_size);
            let fetched = listing.items.len();
            records.extend(listing.items);
            if fetched == 0 || fetched < per_page as usize {
                break;
            }
            page += 1;
        }
        debug!(count = records.len(), "Fetched full list");
        Ok(records)
    }

    #[instrument(skip_all)]
    async fn create(&self, payload: ProductCreate) -> Result<Product, StoreError> {
        debug!(name = %payload.name, "Sending request");
        let request = self.client.post(self.records_url.clone()).json(&payload);
        let response = self.authorize(request).send().await.map_err(transport)?;
        decode(check(response, None).await?).await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: ProductPatch) -> Result<Product, StoreError> {
        debug!("Sending request");
        let request = self.client.patch(self.record_url(id)).json(&patch);
        let response = self.authorize(request).send().await.map_err(transport)?;
        decode(check(response, Some(id)).await?).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!("Sending request");
        let request = self.client.delete(self.record_url(id));
        let response = self.authorize(request).send().await.map_err(transport)?;
        check(response, Some(id)).await?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Network(format!("request timed out: {err}"))
    } else {
        StoreError::Network(err.to_string())
    }
}

async fn check(response: Response, id: Option<&str>) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(StoreError::NotFound(id.to_string()));
        }
    }
    let body = response.text().await.unwrap_or_default();
    let err = api_error(status, &body);
    warn!(status = status.as_u16(), error = %err, "Record service returned an error");
    Err(err)
}

fn api_error(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|body| body.message)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
    StoreError::Api {
        status: status.as_u16(),
        message,
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
    response
        .json()
        .await
        .map_err(|e| StoreError::Decode(e.to_string()))
}
