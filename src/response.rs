use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::error::DecodeError;

/// Text returned in place of a translation when the response cannot be decoded.
pub const SENTINEL: &str = "<TRANSLATION ERROR>";

// Where the embedded result string sits in the envelope
const ENVELOPE_PATH: [usize; 2] = [0, 2];
// Result section -> first segment -> text payload -> first alternative -> text
const TRANSLATED_TEXT_PATH: [usize; 6] = [1, 0, 0, 5, 0, 0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub text: String,
}

impl Translation {
    pub fn new(text: impl Into<String>) -> Translation {
        Translation { text: text.into() }
    }

    pub fn is_sentinel(&self) -> bool {
        self.text == SENTINEL
    }
}

impl Default for Translation {
    fn default() -> Self {
        Translation::new(SENTINEL)
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

// Step into `value[index]`, checking that `value` is an array long enough
fn hop(value: &Value, index: usize, depth: usize) -> Result<&Value, DecodeError> {
    let array = value.as_array().ok_or(DecodeError::Shape {
        depth,
        expected: "an array",
    })?;

    array.get(index).ok_or(DecodeError::Shape {
        depth,
        expected: "an index within the array",
    })
}

fn follow<'a>(root: &'a Value, path: &[usize]) -> Result<&'a Value, DecodeError> {
    path.iter()
        .enumerate()
        .try_fold(root, |value, (depth, index)| hop(value, *index, depth))
}

/// Reads the translated text out of the decoded result structure.
///
/// This is the only place that knows the positional layout of the result; a
/// change on the endpoint side should only need an edit here.
pub fn translated_text(inner: &Value) -> Result<&str, DecodeError> {
    follow(inner, &TRANSLATED_TEXT_PATH)?
        .as_str()
        .ok_or(DecodeError::Shape {
            depth: TRANSLATED_TEXT_PATH.len(),
            expected: "a string",
        })
}

// Locates the first "[[" and parses the JSON value starting there. Framing after
// that value (chunk lengths, trailing chunks) is left unread.
fn parse_envelope(body: &str) -> Result<Value, DecodeError> {
    let start = body.find("[[").ok_or(DecodeError::MissingPayload)?;

    serde_json::Deserializer::from_str(&body[start..])
        .into_iter::<Value>()
        .next()
        .ok_or(DecodeError::MissingPayload)?
        .map_err(DecodeError::from)
}

/// Decodes a batchexecute response body into a translation.
pub fn decode(body: &str) -> Result<Translation, DecodeError> {
    let outer = parse_envelope(body)?;

    let embedded = follow(&outer, &ENVELOPE_PATH)?
        .as_str()
        .ok_or(DecodeError::NotAString { path: "outer[0][2]" })?;
    let inner: Value = serde_json::from_str(embedded)?;

    Ok(Translation::new(translated_text(&inner)?))
}

/// Like [`decode`], but logs the failure and returns the sentinel translation.
pub fn decode_or_sentinel(body: &str) -> Translation {
    match decode(body) {
        Ok(translation) => translation,
        Err(e) => {
            error!(body, "Could not decode translation response: {e}");
            Translation::default()
        }
    }
}
