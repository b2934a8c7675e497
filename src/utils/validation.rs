use anyhow::{bail, ensure, Result};
use reqwest::Url;
use std::path::Path;

use crate::languages::is_supported;
use crate::request::AUTO_LANG;

// Validate that the settings file is an INI file
pub fn validate_settings(settings: &Path) -> Result<()> {
    if let Some(extension) = settings.extension() {
        match extension.to_str() {
            Some("ini") => Ok(()),
            Some(_) => {
                bail!("Settings file must be an INI file.");
            }
            None => {
                let bad_path = settings.display();
                bail!("{bad_path} needs to have a UTF-8 compatible name.");
            }
        }
    } else {
        bail!("Settings file must be an INI file.");
    }
}

pub fn validate_dest_lang(code: &str) -> Result<()> {
    ensure!(
        code != AUTO_LANG,
        "Destination language cannot be detected automatically."
    );

    if !is_supported(code) {
        bail!("Destination language '{code}' is not supported.");
    }

    Ok(())
}

pub fn validate_src_lang(code: &str) -> Result<()> {
    if code != AUTO_LANG && !is_supported(code) {
        bail!("Source language '{code}' is not supported.");
    }

    Ok(())
}

pub fn validate_timeout(millis: u64) -> Result<()> {
    ensure!(millis > 0, "Timeout must be greater than zero milliseconds.");

    Ok(())
}

// Endpoint must be an absolute http(s) URL
pub fn validate_endpoint(endpoint: &str) -> Result<()> {
    let url = match Url::parse(endpoint) {
        Ok(url) => url,
        Err(e) => bail!("Endpoint '{endpoint}' is not a valid URL: {e}"),
    };

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => bail!("Endpoint scheme must be http or https, got '{scheme}'."),
    }
}
