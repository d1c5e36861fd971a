//! Message body resolution
//!
//! Picks one encoding from the builder state, first match wins:
//! GET/TRACE without raw body or files send nothing, a raw body is sent
//! verbatim, files produce `multipart/form-data`, anything else is sent
//! as `application/x-www-form-urlencoded`.

use super::request::Request;
use crate::error::{Result, RequestsError};
use crate::utils::ParamUtils;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::RequestBuilder;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// Encoded payload ready to be attached to an outgoing request
pub enum ResolvedBody {
    /// No body at all
    Empty,
    Raw {
        bytes: Vec<u8>,
        content_type: Option<&'static str>,
    },
    Multipart(Form),
    Form(String),
}

impl ResolvedBody {
    /// Attach headers and payload. Body content types replace caller values.
    pub fn apply(self, builder: RequestBuilder, mut headers: HeaderMap) -> RequestBuilder {
        match self {
            ResolvedBody::Empty => builder.headers(headers),
            ResolvedBody::Raw {
                bytes,
                content_type,
            } => {
                if let Some(content_type) = content_type {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                }
                builder.headers(headers).body(bytes)
            }
            ResolvedBody::Multipart(form) => {
                // reqwest sets the boundary content type itself
                headers.remove(CONTENT_TYPE);
                builder.headers(headers).multipart(form)
            }
            ResolvedBody::Form(encoded) => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                builder.headers(headers).body(encoded)
            }
        }
    }
}

impl std::fmt::Debug for ResolvedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedBody::Empty => f.write_str("Empty"),
            ResolvedBody::Raw {
                bytes,
                content_type,
            } => f
                .debug_struct("Raw")
                .field("len", &bytes.len())
                .field("content_type", content_type)
                .finish(),
            ResolvedBody::Multipart(form) => f
                .debug_tuple("Multipart")
                .field(&form.boundary())
                .finish(),
            ResolvedBody::Form(encoded) => f.debug_tuple("Form").field(encoded).finish(),
        }
    }
}

/// Build the body for `request`.
///
/// Body params on a GET or TRACE request without raw body or files are
/// dropped without being encoded.
///
/// File parts are tagged `application/octet-stream`, which always parses,
/// so `MultipartEncoding` is only returned if reqwest rejects a part.
/// With the current part construction that cannot happen.
pub fn resolve_body(request: &Request) -> Result<ResolvedBody> {
    if request.method.is_bodyless() && request.body.is_empty() && request.files.is_empty() {
        log::trace!("{} request sent without body", request.method);
        return Ok(ResolvedBody::Empty);
    }

    if !request.body.is_empty() {
        let content_type = request.is_json.then_some(JSON_CONTENT_TYPE);
        log::trace!("raw body of {} bytes", request.body.len());
        return Ok(ResolvedBody::Raw {
            bytes: request.body.clone(),
            content_type,
        });
    }

    if !request.files.is_empty() {
        let mut form = Form::new();
        for (field_name, file) in &request.files {
            let part = Part::bytes(file.data.clone())
                .file_name(file.filename.clone())
                .mime_str(FILE_CONTENT_TYPE)
                .map_err(|e| {
                    RequestsError::MultipartEncoding(format!(
                        "Cannot encode file field '{}': {}",
                        field_name, e
                    ))
                })?;
            form = form.part(field_name.clone(), part);
        }
        for (key, values) in &request.body_params {
            form = form.text(key.clone(), ParamUtils::encode_pair(key, values));
        }
        log::trace!(
            "multipart body with {} file(s) and {} field(s)",
            request.files.len(),
            request.body_params.len()
        );
        return Ok(ResolvedBody::Multipart(form));
    }

    Ok(ResolvedBody::Form(ParamUtils::encode(&request.body_params)))
}
