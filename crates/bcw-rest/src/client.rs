//! HTTP client for the hosted backend's REST gateway.
//!
//! Wraps `reqwest` with the gateway's auth headers, filter syntax and error
//! envelope. Every call targets one table under `/rest/v1/`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::RestError;
use crate::filter::Filter;

const REST_PATH: &str = "rest/v1/";

/// Client for the REST gateway.
///
/// Use [`RestClient::new`] with the project URL in production or
/// [`RestClient::with_base_url`] to point at a mock server in tests.
#[derive(Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl RestClient {
    /// Creates a client for a project URL such as `https://xyz.supabase.co`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidUrl`] if the URL or key cannot be used, or
    /// [`RestError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn new(project_url: &str, service_key: &str, timeout_secs: u64) -> Result<Self, RestError> {
        let base = format!("{}/{REST_PATH}", project_url.trim_end_matches('/'));
        Self::with_base_url(&base, service_key, timeout_secs)
    }

    /// Creates a client whose table paths hang directly off `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidUrl`] if the URL or key cannot be used, or
    /// [`RestError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        service_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, RestError> {
        let invalid = |reason: String| RestError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut headers = HeaderMap::new();
        let mut api_key =
            HeaderValue::from_str(service_key).map_err(|e| invalid(format!("service key: {e}")))?;
        api_key.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|e| invalid(format!("service key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bcw-worker/0.1")
            .default_headers(headers)
            .build()?;

        // Ensure exactly one trailing slash so `join(table)` appends a segment
        // instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Returns every row of `table` matching all `filters`.
    ///
    /// # Errors
    ///
    /// - [`RestError::Status`] if the gateway rejects the request.
    /// - [`RestError::Http`] on network failure.
    /// - [`RestError::Deserialize`] if rows do not match `T`.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
    ) -> Result<Vec<T>, RestError> {
        let url = self.build_url(table, filters, &[("select", "*")])?;
        let response = Self::send(Method::GET, table, self.client.get(url)).await?;
        Self::decode(table, response).await
    }

    /// Returns the newest row of `table` by `order_column`, or `None`.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::select`].
    pub async fn select_latest<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[Filter],
        order_column: &str,
    ) -> Result<Option<T>, RestError> {
        let order = format!("{order_column}.desc");
        let url = self.build_url(
            table,
            filters,
            &[("select", "*"), ("order", &order), ("limit", "1")],
        )?;
        let response = Self::send(Method::GET, table, self.client.get(url)).await?;
        let mut rows: Vec<T> = Self::decode(table, response).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Applies `body` as a partial update to matching rows.
    ///
    /// Returns the number of rows the gateway reports as changed.
    ///
    /// # Errors
    ///
    /// - [`RestError::Status`] if the gateway rejects the update.
    /// - [`RestError::Http`] on network failure.
    /// - [`RestError::Deserialize`] if the echoed rows are not a JSON array.
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        table: &str,
        filters: &[Filter],
        body: &B,
    ) -> Result<usize, RestError> {
        let url = self.build_url(table, filters, &[("select", "id")])?;
        let request = self
            .client
            .patch(url)
            .header("Prefer", "return=representation")
            .json(body);
        let response = Self::send(Method::PATCH, table, request).await?;
        let rows: Vec<serde_json::Value> = Self::decode(table, response).await?;
        Ok(rows.len())
    }

    /// Updates the row whose `id` column equals `id`.
    ///
    /// # Errors
    ///
    /// Same as [`RestClient::update`].
    pub async fn update_by_id<B: Serialize + ?Sized>(
        &self,
        table: &str,
        id: &str,
        body: &B,
    ) -> Result<usize, RestError> {
        self.update(table, &[Filter::eq("id", id)], body).await
    }

    /// Inserts one row (or an array of rows) into `table`.
    ///
    /// # Errors
    ///
    /// - [`RestError::Status`] if the gateway rejects the insert.
    /// - [`RestError::Http`] on network failure.
    pub async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> Result<(), RestError> {
        let url = self.build_url(table, &[], &[])?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(body);
        Self::send(Method::POST, table, request).await?;
        Ok(())
    }

    /// Counts rows of `table` matching all `filters` without fetching them.
    ///
    /// # Errors
    ///
    /// - [`RestError::Status`] if the gateway rejects the request.
    /// - [`RestError::Http`] on network failure.
    /// - [`RestError::MissingCount`] if no total is reported.
    pub async fn count(&self, table: &str, filters: &[Filter]) -> Result<u64, RestError> {
        let url = self.build_url(table, filters, &[("select", "*")])?;
        let request = self.client.head(url).header("Prefer", "count=exact");
        let response = Self::send(Method::HEAD, table, request).await?;

        let raw = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        raw.as_deref()
            .and_then(parse_content_range_total)
            .ok_or_else(|| RestError::MissingCount {
                table: table.to_string(),
                value: raw.clone(),
            })
    }

    /// Builds `{base}/{table}?{filters}&{extra}` with every value percent-encoded.
    pub(crate) fn build_url(
        &self,
        table: &str,
        filters: &[Filter],
        extra: &[(&str, &str)],
    ) -> Result<Url, RestError> {
        let mut url = self
            .base_url
            .join(table)
            .map_err(|e| RestError::InvalidUrl {
                url: format!("{}{table}", self.base_url),
                reason: e.to_string(),
            })?;
        if !filters.is_empty() || !extra.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in extra {
                pairs.append_pair(key, value);
            }
            for filter in filters {
                pairs.append_pair(filter.column(), &filter.expression());
            }
        }
        Ok(url)
    }

    /// Sends the request and turns a non-2xx answer into [`RestError::Status`].
    async fn send(
        method: Method,
        table: &str,
        request: RequestBuilder,
    ) -> Result<Response, RestError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%method, table, status = status.as_u16(), "rest: request rejected");
        Err(RestError::Status {
            method: method.to_string(),
            table: table.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn decode<T: DeserializeOwned>(table: &str, response: Response) -> Result<T, RestError> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RestError::Deserialize {
            context: table.to_string(),
            source: e,
        })
    }
}

/// Extracts the total from `Content-Range` values like `0-9/42` or `*/42`.
pub(crate) fn parse_content_range_total(value: &str) -> Option<u64> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
