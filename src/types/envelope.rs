//! Response envelopes shared by every endpoint

use serde::Deserialize;

use crate::{LottoError, Result};

/// Standard `{success, message, data}` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// A missing field decodes as `None`; no `T: Default` bound
    pub data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, surfacing `success: false` as a server error.
    pub fn into_data(self, endpoint: &str) -> Result<T> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("{} request was rejected", endpoint));
            return Err(LottoError::server_error(message));
        }

        self.data
            .ok_or_else(|| LottoError::malformed_response(format!("{}: missing field `data`", endpoint)))
    }
}

/// Body of a non-success response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub message: Option<String>,
    /// Some frameworks report errors under `detail` instead
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    /// The most specific human-readable message available.
    pub fn into_message(self) -> Option<String> {
        self.message.filter(|m| !m.is_empty()).or_else(|| match self.detail {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => Some(detail),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_envelope_yields_data() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": true, "message": null, "data": 7}"#).unwrap();
        assert_eq!(envelope.into_data("test").unwrap(), 7);
    }

    #[test]
    fn rejected_envelope_is_server_error() {
        let envelope: ApiEnvelope<u32> =
            serde_json::from_str(r#"{"success": false, "message": "no draws yet"}"#).unwrap();
        match envelope.into_data("latest-combinations") {
            Err(LottoError::ServerError { message }) => assert_eq!(message, "no draws yet"),
            other => panic!("expected server error, got {:?}", other),
        }
    }

    #[test]
    fn missing_data_is_malformed() {
        let envelope: ApiEnvelope<u32> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        let err = envelope.into_data("number-frequencies").unwrap_err();
        assert!(matches!(err, LottoError::MalformedResponse { .. }));
        assert!(err.to_string().contains("number-frequencies"));
    }

    #[test]
    fn payload_without_default_decodes() {
        use crate::types::LatestResultsPage;

        let envelope: ApiEnvelope<LatestResultsPage> =
            serde_json::from_str(r#"{"success": true, "data": {"latest_numbers": [], "has_more": false}}"#).unwrap();
        let page = envelope.into_data("latest-combinations").unwrap();
        assert!(page.results.is_empty());
        assert!(!page.has_more);

        let empty: ApiEnvelope<LatestResultsPage> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        let err = empty.into_data("latest-combinations").unwrap_err();
        assert!(matches!(err, LottoError::MalformedResponse { .. }));
    }

    #[test]
    fn error_envelope_prefers_message_then_detail() {
        let both: ErrorEnvelope =
            serde_json::from_str(r#"{"success": false, "message": "bad numbers", "detail": "x"}"#).unwrap();
        assert_eq!(both.into_message().as_deref(), Some("bad numbers"));

        let detail: ErrorEnvelope = serde_json::from_str(r#"{"detail": "Not Found"}"#).unwrap();
        assert_eq!(detail.into_message().as_deref(), Some("Not Found"));

        let structured: ErrorEnvelope = serde_json::from_str(r#"{"detail": [{"loc": ["body"]}]}"#).unwrap();
        assert_eq!(structured.into_message(), None);
    }
}
