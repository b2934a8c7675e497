pub mod client;
pub mod config;
pub mod error;
pub mod languages;
pub mod request;
pub mod response;
pub mod transcript;
pub mod utils;
pub mod web;

pub use client::{ClientConfig, TranslationClient};
pub use error::{DecodeError, TranslateError, TransportError};
pub use request::TranslationRequest;
pub use response::{Translation, SENTINEL};
