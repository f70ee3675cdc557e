//! Outbound HTTP plumbing shared by the connector calls.

use error_stack::ResultExt;
use once_cell::sync::OnceCell;
use serde::de::DeserializeOwned;

use crate::{
    core::errors::{ConnectorError, CustomResult},
    logger,
};

static DEFAULT_CLIENT: OnceCell<reqwest::Client> = OnceCell::new();

/// The shared HTTP client used for all connector calls.
pub fn http_client() -> CustomResult<&'static reqwest::Client, ConnectorError> {
    DEFAULT_CLIENT
        .get_or_try_init(|| {
            reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
        })
        .change_context(ConnectorError::ProcessingStepFailed)
        .attach_printable("Failed to construct the HTTP client")
}

/// Execute a single JSON POST against a connector endpoint and decode the
/// response body. Blocking from the caller's point of view: no timeout,
/// cancellation, or retry.
pub async fn call_connector_api<Req, Res>(url: &str, request: &Req) -> CustomResult<Res, ConnectorError>
where
    Req: serde::Serialize + ?Sized,
    Res: DeserializeOwned,
{
    let body = serde_json::to_vec(request).change_context(ConnectorError::RequestEncodingFailed)?;

    let response = http_client()?
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .change_context(ConnectorError::ProcessingStepFailed)
        .attach_printable("Failed to send the connector request")?;

    let status = response.status();
    let body = response
        .bytes()
        .await
        .change_context(ConnectorError::ProcessingStepFailed)
        .attach_printable("Failed to read the connector response body")?;
    logger::debug!(%url, status = %status, "connector call completed");

    parse_response(&body)
}

/// Decode a connector response body, tolerating the UTF-8 byte order mark the
/// Authorize.Net endpoint prefixes its JSON with.
pub fn parse_response<Res: DeserializeOwned>(body: &[u8]) -> CustomResult<Res, ConnectorError> {
    let body = body.strip_prefix("\u{feff}".as_bytes()).unwrap_or(body);
    serde_json::from_slice(body).change_context(ConnectorError::ResponseDeserializationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Probe {
        ok: bool,
    }

    #[test]
    fn byte_order_mark_is_stripped_before_decoding() {
        let body = b"\xef\xbb\xbf{\"ok\":true}";
        let probe: Probe = parse_response(body).unwrap();
        assert_eq!(probe, Probe { ok: true });
    }

    #[test]
    fn plain_bodies_decode_unchanged() {
        let probe: Probe = parse_response(b"{\"ok\":false}").unwrap();
        assert_eq!(probe, Probe { ok: false });
    }
}
