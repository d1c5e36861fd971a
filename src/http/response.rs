//! HTTP response snapshot

use crate::error::{Result, RequestsError};
use crate::utils::Params;
use serde::de::DeserializeOwned;

/// Immutable view of a completed response, body fully read
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    protocol: String,
    headers: Params,
    body: Vec<u8>,
    content_length: u64,
}

impl Response {
    pub(crate) fn new(status: u16, protocol: String, headers: Params, body: Vec<u8>) -> Self {
        let content_length = body.len() as u64;
        Self {
            status,
            protocol,
            headers,
            body,
            content_length,
        }
    }

    pub(crate) fn from_reqwest(response: reqwest::blocking::Response) -> Result<Self> {
        let status = response.status().as_u16();
        let protocol = format!("{:?}", response.version());

        let mut headers = Params::new();
        for (name, value) in response.headers() {
            headers
                .entry(name.as_str().to_string())
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        let body = response.bytes().map_err(RequestsError::Transport)?.to_vec();
        log::debug!("{} {} ({} bytes)", protocol, status, body.len());

        Ok(Self::new(status, protocol, headers, body))
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    /// Response headers keyed by lower-case name
    pub fn headers(&self) -> Params {
        self.headers.clone()
    }

    /// First value of a header, looked up case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Protocol version, e.g. `HTTP/1.1`
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Number of body bytes read
    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    /// Body decoded as UTF-8, invalid sequences replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
