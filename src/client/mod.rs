//! REST transport shared by every entity context.
//!
//! Resource paths are resolved against `api.base_url`; absolute `http(s)://`
//! paths are used as-is. Non-2xx responses are converted into
//! [`ApiError::Status`] with the message pulled out by [`extract_message`].

mod error;

pub use error::{
    extract_message, ApiError, DECODE_MESSAGE, FALLBACK_MESSAGE, TRANSPORT_MESSAGE,
};

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ApiConfig;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Thin JSON client over `reqwest`.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct RestClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
}

impl RestClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds.into()))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url,
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a resource path plus extra path segments into a full URL.
    ///
    /// Segments are percent-encoded, so string ids containing `/` stay one segment.
    pub fn url(&self, path: &str, segments: &[&str]) -> Result<Url, ApiError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.as_str().trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl {
                    url: raw.clone(),
                    reason: "URL cannot have path segments".to_string(),
                })?
                .pop_if_empty()
                .extend(segments);
        }

        Ok(url)
    }

    /// `GET url?query` decoded as JSON.
    pub async fn get<R, Q>(&self, url: Url, query: Option<&Q>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let mut builder = self.request(Method::GET, url.clone());
        if let Some(query) = query {
            builder = builder.query(query);
        }
        let response = self.send(builder, &url).await?;
        decode(response, &url).await
    }

    /// `POST`/`PUT` with a JSON body, decoded as JSON.
    pub async fn send_json<R, B>(&self, method: Method, url: Url, body: &B) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(method, url.clone()).json(body);
        let response = self.send(builder, &url).await?;
        decode(response, &url).await
    }

    /// `DELETE url`; any response body is ignored.
    pub async fn delete(&self, url: Url) -> Result<(), ApiError> {
        let builder = self.request(Method::DELETE, url.clone());
        self.send(builder, &url).await?;
        Ok(())
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        debug!(%url, "sending request");

        let response = builder.send().await.map_err(|e| {
            warn!(%url, error = %e, "request failed before a response arrived");
            ApiError::Transport {
                url: url.to_string(),
                source: e,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // A body that cannot be read is treated like one without a message.
        let body = response.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        let message = extract_message(&body);
        warn!(%url, status = status.as_u16(), %message, "request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

async fn decode<R: DeserializeOwned>(response: Response, url: &Url) -> Result<R, ApiError> {
    let body = response.bytes().await.map_err(|e| ApiError::Transport {
        url: url.to_string(),
        source: e,
    })?;
    serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
        url: url.to_string(),
        source: e,
    })
}
