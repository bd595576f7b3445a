//! HTTP implementation of [`SheetsApi`].
//!
//! Requests go straight to the Sheets v4 REST endpoints with a bearer token
//! from the ambient Google credentials. Token caching and refresh are left
//! to `gcp_auth`.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use gcp_auth::TokenProvider;
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::SheetsConfig;
use crate::error::{ToolError, ToolResult};
use crate::sheets::api::SheetsApi;
use crate::sheets::model::{
    AppendValuesResponse, BatchUpdateRequest, BatchUpdateResponse, Spreadsheet,
    UpdateValuesResponse, ValueInputOption, ValueRange, ValueRenderOption,
};

/// The single OAuth scope requested: read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Authenticated client for the Sheets REST API.
pub struct HttpSheetsClient {
    http: reqwest::Client,
    auth: Arc<dyn TokenProvider>,
    base_url: Url,
}

impl HttpSheetsClient {
    /// Resolves ambient credentials and builds a client.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::Auth`] if no credentials can be found,
    /// [`ToolError::InvalidBaseUrl`] if the configured base URL is unusable,
    /// or [`ToolError::Http`] if the HTTP client cannot be built.
    pub async fn connect(settings: &SheetsConfig) -> ToolResult<Self> {
        let auth = gcp_auth::provider().await.map_err(|e| ToolError::Auth {
            message: e.to_string(),
        })?;

        let client = Self::with_token_provider(settings, auth)?;
        tracing::info!(base_url = %client.base_url, "Sheets client ready");
        Ok(client)
    }

    /// Builds a client around an existing token provider.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::InvalidBaseUrl`] if the base URL cannot carry
    /// path segments, or [`ToolError::Http`] if the HTTP client cannot be built.
    pub fn with_token_provider(
        settings: &SheetsConfig,
        auth: Arc<dyn TokenProvider>,
    ) -> ToolResult<Self> {
        let base_url = Url::parse(&settings.api_base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| ToolError::InvalidBaseUrl {
                url: settings.api_base_url.clone(),
            })?;

        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("google-sheets-mcp/", env!("CARGO_PKG_VERSION")));
        // Local emulators and proxies are reached directly
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            auth,
            base_url,
        })
    }

    /// Builds `{base}/v4/spreadsheets/{segments...}` with each segment
    /// percent-encoded on its own.
    fn endpoint(&self, segments: &[&str]) -> ToolResult<Url> {
        build_endpoint(&self.base_url, segments)
    }

    /// Attaches a bearer token, sends the request and decodes the reply.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ToolResult<T> {
        let token = self
            .auth
            .token(&[SPREADSHEETS_SCOPE])
            .await
            .map_err(|e| ToolError::Auth {
                message: e.to_string(),
            })?;

        let response = request.bearer_auth(token.as_str()).send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "Sheets API reply");

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!(error = %e, "Failed to read error body");
                    String::new()
                }
            };
            return Err(remote_error(status, &body));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl SheetsApi for HttpSheetsClient {
    async fn get_spreadsheet(&self, spreadsheet_id: &str, fields: &str) -> ToolResult<Spreadsheet> {
        let url = self.endpoint(&[spreadsheet_id])?;
        self.send(self.http.get(url).query(&[("fields", fields)]))
            .await
    }

    async fn get_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        render: ValueRenderOption,
    ) -> ToolResult<ValueRange> {
        let url = self.endpoint(&[spreadsheet_id, "values", range])?;
        self.send(
            self.http
                .get(url)
                .query(&[("valueRenderOption", render.as_str())]),
        )
        .await
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        input: ValueInputOption,
        body: &ValueRange,
    ) -> ToolResult<AppendValuesResponse> {
        let target = format!("{range}:append");
        let url = self.endpoint(&[spreadsheet_id, "values", &target])?;
        self.send(
            self.http
                .post(url)
                .query(&[("valueInputOption", input.as_str())])
                .json(body),
        )
        .await
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        input: ValueInputOption,
        body: &ValueRange,
    ) -> ToolResult<UpdateValuesResponse> {
        let url = self.endpoint(&[spreadsheet_id, "values", range])?;
        self.send(
            self.http
                .put(url)
                .query(&[("valueInputOption", input.as_str())])
                .json(body),
        )
        .await
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        body: &BatchUpdateRequest,
    ) -> ToolResult<BatchUpdateResponse> {
        let target = format!("{spreadsheet_id}:batchUpdate");
        let url = self.endpoint(&[&target])?;
        self.send(self.http.post(url).json(body)).await
    }
}

fn build_endpoint(base: &Url, segments: &[&str]) -> ToolResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ToolError::InvalidBaseUrl {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .extend(["v4", "spreadsheets"])
        .extend(segments);
    Ok(url)
}

fn is_loopback(url: &Url) -> bool {
    url.host_str().is_some_and(|host| {
        host.eq_ignore_ascii_case("localhost")
            || host
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<IpAddr>()
                .is_ok_and(|ip| ip.is_loopback())
    })
}

/// Google API error body: `{"error": {"code": 403, "message": "...", "status": "PERMISSION_DENIED"}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Turns a non-success reply into [`ToolError::RemoteApi`].
///
/// Prefers the `error.message` of a Google error body, then the raw body
/// text, then the HTTP reason phrase.
fn remote_error(status: StatusCode, body: &str) -> ToolError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let remote_status = parsed.as_ref().and_then(|e| e.error.status.clone());

    let message = parsed
        .and_then(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });

    ToolError::RemoteApi {
        code: status.as_u16(),
        status: remote_status,
        message,
    }
}
