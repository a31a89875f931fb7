//! [`SheetsService`] over HTTPS with a blocking `reqwest` client.

use std::time::Duration;

use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::Url;
use serde::de::DeserializeOwned;
use sheetwire_protocol::{
    BatchUpdateRequest, BatchUpdateResponse, BatchUpdateValuesRequest, BatchUpdateValuesResponse,
    ErrorEnvelope, SpreadsheetDetails, UpdateValuesResponse, ValueInputOption, ValueRange,
};

use crate::service::{ServiceError, SheetsService};

/// Configuration for [`HttpService`].
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Root of the REST API. Must end with `/`.
    pub base_url: String,

    /// OAuth2 access token sent as `Authorization: Bearer`. Obtaining and
    /// refreshing it is up to the caller.
    pub access_token: Option<String>,

    /// Timeout for a whole request, connect included.
    pub timeout: Duration,

    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "https://sheets.googleapis.com/v4/".to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
            user_agent: concat!("sheetwire/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Talks to the remote service over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpService {
    http: HttpClient,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpService {
    pub fn new(config: HttpConfig) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ServiceError::transport(format!("invalid base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::transport(format!(
                "invalid base url: {}",
                config.base_url
            )));
        }

        let http = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ServiceError::transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            access_token: config.access_token,
        })
    }

    /// `base_url` followed by percent-encoded `segments`.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ServiceError> {
        let request = match &self.access_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .map_err(|e| ServiceError::transport(e.to_string()))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => body,
            };
            tracing::debug!(status = status.as_u16(), %message, "request failed");
            return Err(ServiceError::new(status.as_u16(), message));
        }

        response
            .json()
            .map_err(|e| ServiceError::transport(format!("malformed response: {e}")))
    }
}

impl SheetsService for HttpService {
    fn get_spreadsheet(&self, spreadsheet_id: &str) -> Result<SpreadsheetDetails, ServiceError> {
        let url = self.url(&["spreadsheets", spreadsheet_id]);
        tracing::debug!(%url, "GET");
        self.send(self.http.get(url))
    }

    fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateRequest,
    ) -> Result<BatchUpdateResponse, ServiceError> {
        let url = self.url(&["spreadsheets", &format!("{spreadsheet_id}:batchUpdate")]);
        tracing::debug!(%url, requests = body.requests.len(), "POST");
        self.send(self.http.post(url).json(body))
    }

    fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        value_input_option: ValueInputOption,
        body: &ValueRange,
    ) -> Result<UpdateValuesResponse, ServiceError> {
        let url = self.url(&["spreadsheets", spreadsheet_id, "values", range]);
        tracing::debug!(%url, "PUT");
        self.send(
            self.http
                .put(url)
                .query(&[("valueInputOption", value_input_option.as_str())])
                .json(body),
        )
    }

    fn values_batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateValuesRequest,
    ) -> Result<BatchUpdateValuesResponse, ServiceError> {
        let url = self.url(&["spreadsheets", spreadsheet_id, "values:batchUpdate"]);
        tracing::debug!(%url, ranges = body.data.len(), "POST");
        self.send(self.http.post(url).json(body))
    }
}
