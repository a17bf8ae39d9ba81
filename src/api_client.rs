//! api_client.rs
//!
//! Uniform request/response wrapper for the ticketing REST API. Attaches the
//! bearer credential when one is present, serializes JSON bodies, and maps
//! transport and HTTP failures onto the `ClientError` taxonomy. A 401 from
//! any endpoint invalidates the local session before the error is returned,
//! so callers can route straight to re-authentication without firing further
//! requests.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::session::SessionStore;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    session: Arc<SessionStore>,
}

// Structured error body the server sends on rejections
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        session: Arc<SessionStore>,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Transport(format!("invalid base url: {e}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            http,
            session,
        })
    }

    /// Builds an absolute URL from path segments, percent-encoding each one
    /// (showtime timestamps travel inside the path). A trailing empty
    /// segment produces the trailing slash the collection endpoints expect.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .expect("API base url must be an http(s) url");
            parts.pop_if_empty();
            for segment in segments {
                parts.push(segment);
            }
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(%url, "GET");
        let response = self.execute(self.http.get(url)).await?;
        Self::decode(response).await
    }

    pub async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, "POST");
        let response = self.execute(self.http.post(url).json(body)).await?;
        Self::decode(response).await
    }

    pub async fn put<B, T>(&self, url: Url, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, "PUT");
        let response = self.execute(self.http.put(url).json(body)).await?;
        Self::decode(response).await
    }

    /// Keyed deletes on this API carry a JSON body identifying the target;
    /// plain deletes pass `None`. Success is a 2xx with no useful body.
    pub async fn delete<B: Serialize>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        debug!(%url, "DELETE");
        let mut request = self.http.delete(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request).await?;
        Ok(())
    }

    /// DELETE whose success response carries a JSON body worth decoding,
    /// e.g. the bulk seat wipe which answers with a summary message.
    pub async fn delete_with_body<T: DeserializeOwned>(&self, url: Url) -> Result<T, ClientError> {
        debug!(%url, "DELETE");
        let response = self.execute(self.http.delete(url)).await?;
        Self::decode(response).await
    }

    /// Form-encoded POST, used by the token endpoint which does not speak
    /// JSON on the request side.
    pub async fn post_form<F, T>(&self, url: Url, form: &F) -> Result<T, ClientError>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(%url, "POST (form)");
        let body = serde_urlencoded::to_string(form)
            .map_err(|e| ClientError::Validation(format!("unencodable form: {e}")))?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);
        let response = self.execute(request).await?;
        Self::decode(response).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Response, ClientError> {
        let request = match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        let response = request.send().await?;
        self.check_status(response).await
    }

    async fn check_status(&self, response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!("server reported the session as expired, dropping credentials");
            self.session.clear();
            return Err(ClientError::SessionExpired);
        }
        if !status.is_success() {
            let message = Self::server_message(status, response).await;
            return Err(ClientError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    // Prefers the structured {"detail": ...} body, falls back to status text
    async fn server_message(status: StatusCode, response: Response) -> String {
        let fallback = || {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        };
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody {
                detail: Some(serde_json::Value::String(message)),
            }) => message,
            Ok(ErrorBody {
                detail: Some(other),
            }) => other.to_string(),
            _ => fallback(),
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Transport(format!("malformed response body: {e}")))
    }
}
