//! HTTP request building

use super::body;
use super::headers::normalize_headers;
use super::response::Response;
use super::Session;
use crate::config::HttpMethod;
use crate::error::{Result, RequestsError};
use crate::utils::{ParamUtils, Params, ResolvedUrl};
use std::collections::BTreeMap;
use url::Url;

/// File attachment for a multipart upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormFile {
    pub(crate) filename: String,
    pub(crate) data: Vec<u8>,
}

/// Fluent request builder bound to a [`Session`]
///
/// Setters consume and return the builder so calls can be chained.
/// Accessors hand out copies; mutating them never affects the builder.
#[derive(Debug, Clone)]
pub struct Request {
    session: Session,
    pub(crate) method: HttpMethod,
    url: String,
    headers: Params,
    url_params: Params,
    pub(crate) body_params: Params,
    pub(crate) body: Vec<u8>,
    pub(crate) is_json: bool,
    pub(crate) files: BTreeMap<String, FormFile>,
}

fn set_values<K, I, V>(map: &mut Params, key: K, values: I)
where
    K: Into<String>,
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    let key = key.into();
    let values: Vec<String> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        map.remove(&key);
    } else {
        map.insert(key, values);
    }
}

impl Request {
    pub(crate) fn new(session: Session, method: HttpMethod, resolved: ResolvedUrl) -> Self {
        Self {
            session,
            method,
            url: resolved.base,
            headers: Params::new(),
            url_params: resolved.params,
            body_params: Params::new(),
            body: Vec::new(),
            is_json: false,
            files: BTreeMap::new(),
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Base URL without query string
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Replace the values of a header; an empty list removes it
    pub fn set_header<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        set_values(&mut self.headers, key, values);
        self
    }

    pub fn headers(&self) -> Params {
        self.headers.clone()
    }

    /// Replace the values of a query parameter; an empty list removes it
    pub fn set_url_param<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        set_values(&mut self.url_params, key, values);
        self
    }

    pub fn url_params(&self) -> Params {
        self.url_params.clone()
    }

    /// Full URL with the encoded query parameters.
    ///
    /// The `?` separator is always present, even without parameters.
    pub fn url_path(&self) -> String {
        format!("{}?{}", self.url, ParamUtils::encode(&self.url_params))
    }

    /// Use `json` as the body and send it as `application/json`
    pub fn set_json(mut self, json: impl Into<String>) -> Self {
        self.is_json = true;
        self.body = json.into().into_bytes();
        self
    }

    /// Use raw bytes as the body without touching `Content-Type`
    pub fn set_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.is_json = false;
        self.body = body.into();
        self
    }

    /// Replace the values of a form field; an empty list removes it
    pub fn set_body_param<K, I, V>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        set_values(&mut self.body_params, key, values);
        self
    }

    pub fn body_params(&self) -> Params {
        self.body_params.clone()
    }

    /// Attach a file under `field_name`. Ignored when any argument is empty.
    pub fn add_file(
        mut self,
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        data: impl Into<Vec<u8>>,
    ) -> Self {
        let field_name = field_name.into();
        let filename = file_name.into();
        let data = data.into();
        if !field_name.is_empty() && !filename.is_empty() && !data.is_empty() {
            self.files.insert(field_name, FormFile { filename, data });
        }
        self
    }

    /// Send the request and read the whole response
    pub fn send(&self) -> Result<Response> {
        let url_path = self.url_path();
        let target = Url::parse(&url_path)
            .map_err(|e| RequestsError::InvalidUrl(format!("Invalid URL '{}': {}", url_path, e)))?;

        let body = body::resolve_body(self)?;
        self.session.prepare_cookies(&target);
        let headers = normalize_headers(&self.headers, self.session.user_agent())?;

        log::debug!("{} {}", self.method, target);

        let mut builder = self
            .session
            .client()
            .request(self.method.to_reqwest(), target);
        if let Some(timeout) = self.session.timeout() {
            builder = builder.timeout(timeout);
        }
        let builder = body.apply(builder, headers);

        let response = builder.send().map_err(RequestsError::Transport)?;
        Response::from_reqwest(response)
    }
}
