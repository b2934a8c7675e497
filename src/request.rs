use serde_json::{json, Value};

/// Opaque identifier of the translate procedure on the batchexecute endpoint.
pub const RPC_ID: &str = "MkEWBc";
/// Fixed call tag closing every envelope.
pub const CALL_TAG: &str = "generic";
/// Name of the only form field the endpoint reads.
pub const FORM_FIELD: &str = "f.req";

pub const DEFAULT_DEST_LANG: &str = "en";
pub const AUTO_LANG: &str = "auto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    text: String,
    src_lang: String,
    dest_lang: String,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, dest_lang: &str, src_lang: &str) -> TranslationRequest {
        TranslationRequest {
            text: text.into(),
            src_lang: src_lang.to_string(),
            dest_lang: dest_lang.to_string(),
        }
    }

    // English destination, source detected by the endpoint
    pub fn with_defaults(text: impl Into<String>) -> TranslationRequest {
        Self::new(text, DEFAULT_DEST_LANG, AUTO_LANG)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn src_lang(&self) -> &str {
        &self.src_lang
    }

    pub fn dest_lang(&self) -> &str {
        &self.dest_lang
    }
}

// Serializes a string as a quoted, escaped JSON string literal
fn json_string(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

/// Builds the instruction array that travels as a string inside the envelope.
///
/// The literal around the strings is formatted by hand; `true` and `[null]`
/// are constants the endpoint expects and carry no meaning on this side.
pub fn encode_inner(request: &TranslationRequest) -> String {
    format!(
        "[[{}, {}, {}, true], [null]]",
        json_string(&request.text),
        json_string(&request.src_lang),
        json_string(&request.dest_lang)
    )
}

/// The value of the `f.req` field: the envelope holding the embedded
/// instruction string. Escaping happens a second time here.
pub fn encode_freq(request: &TranslationRequest) -> String {
    json!([[[RPC_ID, encode_inner(request), Value::Null, CALL_TAG]]]).to_string()
}

// The HTTP client's form helper would replace the fixed Content-Type, so the body is built here
pub fn encode_form_body(request: &TranslationRequest) -> String {
    format!("{FORM_FIELD}={}", urlencoding::encode(&encode_freq(request)))
}
