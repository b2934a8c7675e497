use reqwest::StatusCode;
use thiserror::Error;

/// Failure to recover a translation from a response body.
///
/// These are swallowed by [`crate::client::TranslationClient::translate`] and
/// turned into the sentinel translation.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("response body does not contain a \"[[\" payload")]
    MissingPayload,
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected an embedded JSON string at {path}")]
    NotAString { path: &'static str },
    #[error("unexpected response shape at hop {depth}: expected {expected}")]
    Shape { depth: usize, expected: &'static str },
}

/// Failure to complete the HTTP round trip.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a server error status.
    #[error("endpoint answered with status {status}: {body_preview}")]
    Status {
        status: StatusCode,
        body_preview: String,
    },
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Http(err) if err.is_timeout())
    }

    pub fn is_connect(&self) -> bool {
        matches!(self, TransportError::Http(err) if err.is_connect())
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TransportError::Http(err) => err.status(),
            TransportError::Status { status, .. } => Some(*status),
        }
    }
}

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
    #[error("decode failure: {0}")]
    Decode(#[from] DecodeError),
}

impl TranslateError {
    pub fn is_decode(&self) -> bool {
        matches!(self, TranslateError::Decode(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, TranslateError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_messages() {
        assert_eq!(
            format!("{}", DecodeError::MissingPayload),
            "response body does not contain a \"[[\" payload"
        );

        let shape = DecodeError::Shape {
            depth: 3,
            expected: "array",
        };
        assert_eq!(
            format!("{shape}"),
            "unexpected response shape at hop 3: expected array"
        );
    }

    #[test]
    fn test_translate_error_classes() {
        let decode: TranslateError = DecodeError::MissingPayload.into();
        assert!(decode.is_decode());
        assert!(!decode.is_transport());

        let transport: TranslateError = TransportError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body_preview: String::new(),
        }
        .into();
        assert!(transport.is_transport());
        assert!(!transport.is_decode());
    }

    #[test]
    fn test_status_transport_error() {
        let err = TransportError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body_preview: "oops".to_string(),
        };

        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!err.is_timeout());
        assert!(!err.is_connect());
    }
}
