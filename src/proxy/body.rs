//! Inbound body translation.
//!
//! The body is read according to the request's [`RequestEncoding`] and handed
//! to the outbound request in the same shape: multipart forms are decoded and
//! rebuilt part by part, everything else travels as the exact inbound bytes.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{FromRequest, Multipart},
    http::{Method, Request},
};
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder,
};

use crate::proxy::content::RequestEncoding;
use crate::proxy::error::ForwardError;

/// Whether requests with this method forward a body at all.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// A body ready to be attached to the outbound request.
#[derive(Debug)]
pub enum OutboundBody {
    /// Nothing is sent.
    Empty,
    /// A rebuilt form; the transport sets a fresh boundary and length.
    Multipart { form: Form, parts: usize },
    /// JSON text, forwarded byte for byte without parsing.
    Json(Bytes),
    /// Opaque bytes.
    Binary(Bytes),
}

impl OutboundBody {
    /// Read the inbound body of `request` as `encoding` dictates.
    ///
    /// `limit` bounds non-multipart bodies; multipart bodies are bounded by
    /// the router's `DefaultBodyLimit`.
    pub async fn read(
        request: Request<Body>,
        encoding: RequestEncoding,
        limit: usize,
    ) -> Result<Self, ForwardError> {
        match encoding {
            RequestEncoding::Multipart => {
                let multipart = Multipart::from_request(request, &()).await?;
                rebuild_form(multipart).await
            }
            RequestEncoding::Json => Ok(Self::Json(to_bytes(request.into_body(), limit).await?)),
            RequestEncoding::Binary => {
                Ok(Self::Binary(to_bytes(request.into_body(), limit).await?))
            }
        }
    }

    /// Attach this body to an outbound request.
    pub fn attach(self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Empty => builder,
            Self::Multipart { form, .. } => builder.multipart(form),
            Self::Json(bytes) | Self::Binary(bytes) => builder.body(bytes),
        }
    }

    /// Size hint for logs: byte length, or part count for forms.
    pub fn describe(&self) -> String {
        match self {
            Self::Empty => "empty".to_string(),
            Self::Multipart { parts, .. } => format!("multipart ({} parts)", parts),
            Self::Json(bytes) => format!("json ({} bytes)", bytes.len()),
            Self::Binary(bytes) => format!("binary ({} bytes)", bytes.len()),
        }
    }
}

/// Decode every field of `multipart` in order and rebuild it as an outbound
/// form. Field names, file names and per-part content types are kept.
async fn rebuild_form(mut multipart: Multipart) -> Result<OutboundBody, ForwardError> {
    // Browsers send names raw; reqwest's default would rewrite them as `name*=`.
    let mut form = Form::new().percent_encode_noop();
    let mut parts = 0;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        let mut part = Part::bytes(data.to_vec());
        if let Some(file_name) = file_name {
            part = part.file_name(file_name);
        }
        if let Some(content_type) = content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| ForwardError::Build(format!("part `{}`: {}", name, e)))?;
        }

        form = form.part(name, part);
        parts += 1;
    }

    Ok(OutboundBody::Multipart { form, parts })
}
