use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use tracing::{debug, instrument, warn};

use crate::error::{TranslateError, TransportError};
use crate::request::{encode_form_body, TranslationRequest};
use crate::response::{decode, decode_or_sentinel, Translation};

pub const DEFAULT_ENDPOINT: &str =
    "https://translate.google.com/_/TranslateWebserverUi/data/batchexecute?rpcids=MkEWBc";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:84.0) Gecko/20100101 Firefox/84.0";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=utf-8";

const BODY_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub user_agent: String,
    /// `None` waits for the endpoint indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout_millis(mut self, millis: u64) -> Self {
        self.timeout = Some(Duration::from_millis(millis));
        self
    }
}

/**
 * Blocking client for the batchexecute translate procedure.
 *
 * Owns one HTTP session: a connection pool plus a cookie jar filled in by the
 * endpoint across calls. The client is `Send + Sync`, and clones share the same
 * session, so one instance can serve several threads at once.
 *
 * It must be created and dropped outside of an async runtime. Async callers
 * should hand calls to a blocking worker.
 */
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: Client,
    endpoint: String,
}

impl TranslationClient {
    pub fn new(config: ClientConfig) -> Result<TranslationClient, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(FORM_CONTENT_TYPE),
        );

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent)
            .cookie_store(true)
            .timeout(config.timeout)
            .build()?;

        Ok(TranslationClient {
            http,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Translates `text`, collapsing decode failures into the sentinel translation.
    ///
    /// Transport failures (connection, timeout, server error status) are still
    /// returned as errors. A rate-limit or other client error page decodes to
    /// the sentinel like any other unexpected body.
    pub fn translate(
        &self,
        text: &str,
        dest_lang: &str,
        src_lang: &str,
    ) -> Result<Translation, TransportError> {
        self.translate_request(&TranslationRequest::new(text, dest_lang, src_lang))
    }

    /// Translates `text`, reporting decode and transport failures separately.
    pub fn try_translate(
        &self,
        text: &str,
        dest_lang: &str,
        src_lang: &str,
    ) -> Result<Translation, TranslateError> {
        self.try_translate_request(&TranslationRequest::new(text, dest_lang, src_lang))
    }

    pub fn translate_request(
        &self,
        request: &TranslationRequest,
    ) -> Result<Translation, TransportError> {
        let body = self.round_trip(request)?;

        Ok(decode_or_sentinel(&body))
    }

    pub fn try_translate_request(
        &self,
        request: &TranslationRequest,
    ) -> Result<Translation, TranslateError> {
        let body = self.round_trip(request)?;

        Ok(decode(&body)?)
    }

    // Posts the encoded request and returns the raw response body
    #[instrument(
        name = "round_trip",
        skip(self, request),
        fields(src = %request.src_lang(), dest = %request.dest_lang())
    )]
    fn round_trip(&self, request: &TranslationRequest) -> Result<String, TransportError> {
        let body = encode_form_body(request);
        debug!(bytes = body.len(), "Posting translation request");

        let response = self.http.post(&self.endpoint).body(body).send()?;

        let status = response.status();
        if status.is_server_error() {
            let text = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status,
                body_preview: text.chars().take(BODY_PREVIEW_CHARS).collect(),
            });
        }

        // Client error pages (rate limiting, captcha) are handed to the decoder
        if !status.is_success() {
            warn!(%status, "Endpoint answered with an error page");
        }

        let text = response.text()?;
        debug!(bytes = text.len(), %status, "Received translation response");

        Ok(text)
    }
}
