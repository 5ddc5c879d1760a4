//! Error envelope detection.
//!
//! Failed calls answer with a `<SIMPLE_RETURN>` document whose
//! `RESPONSE/CODE` element carries the error code. Successful responses have
//! no `CODE`, so its presence alone marks the call as failed.

use serde::Deserialize;

use crate::client::ApiError;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "RESPONSE")]
    response: Option<EnvelopeResponse>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeResponse {
    #[serde(rename = "CODE")]
    code: Option<String>,
    #[serde(rename = "TEXT")]
    text: Option<String>,
}

/// Extract the remote error from a response body, if it carries one.
///
/// Bodies that are not XML, or not shaped like an envelope, yield `None`.
pub fn remote_error(body: &[u8]) -> Option<ApiError> {
    let envelope: Envelope = quick_xml::de::from_reader(body).ok()?;
    let response = envelope.response?;
    let code = response.code?;

    Some(ApiError::Remote {
        code,
        text: response.text.unwrap_or_default(),
    })
}
