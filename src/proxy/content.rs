//! Content-type classification.
//!
//! Every body decision in the forwarder goes through [`ContentClass::classify`]
//! so the inbound read and the outbound write always agree.

use axum::http::{header::CONTENT_TYPE, HeaderMap};

/// The closed set of payload shapes the forwarder distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentClass {
    /// `multipart/form-data`: fields and file parts.
    Multipart,
    /// `application/json`.
    Json,
    /// Any `text` type.
    Text,
    /// Anything else, including a missing content type.
    Binary,
}

impl ContentClass {
    /// Classify a `Content-Type` value. Matching is case-insensitive and by
    /// substring, so parameters such as `charset` or `boundary` are ignored.
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(value) = content_type else {
            return Self::Binary;
        };
        let value = value.to_ascii_lowercase();

        if value.contains("multipart/form-data") {
            Self::Multipart
        } else if value.contains("application/json") {
            Self::Json
        } else if value.contains("text") {
            Self::Text
        } else {
            Self::Binary
        }
    }

    /// Classify the `Content-Type` header of a header map.
    pub fn of_headers(headers: &HeaderMap) -> Self {
        Self::classify(headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()))
    }

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Multipart => "multipart",
            Self::Json => "json",
            Self::Text => "text",
            Self::Binary => "binary",
        }
    }
}

/// How an inbound request body is read and re-encoded.
///
/// Requests have no text branch: text bodies travel as opaque bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestEncoding {
    Multipart,
    Json,
    Binary,
}

impl From<ContentClass> for RequestEncoding {
    fn from(class: ContentClass) -> Self {
        match class {
            ContentClass::Multipart => Self::Multipart,
            ContentClass::Json => Self::Json,
            ContentClass::Text | ContentClass::Binary => Self::Binary,
        }
    }
}

impl RequestEncoding {
    /// Decide the encoding for an inbound request from its headers.
    pub fn of_headers(headers: &HeaderMap) -> Self {
        ContentClass::of_headers(headers).into()
    }
}
