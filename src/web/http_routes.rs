use std::sync::Arc;

use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};

use crate::error::TranslateError;
use crate::languages::languages;
use crate::response::Translation;
use crate::utils::validation;
use crate::web::error::ServiceError;
use crate::web::state::ServiceState;

/// Request format for HTTP translate requests
#[derive(Deserialize)]
pub struct HttpTranslateRequest {
    text: String,
    /// Falls back to the service's default destination
    dest: Option<String>,
    src: Option<String>,
}

#[derive(Serialize)]
pub struct HttpLanguage {
    code: &'static str,
    name: &'static str,
}

pub async fn http_translate(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<HttpTranslateRequest>,
) -> Result<Json<Translation>, ServiceError> {
    let dest = request.dest.unwrap_or_else(|| state.default_dest.clone());
    let src = request.src.unwrap_or_else(|| state.default_src.clone());

    validation::validate_dest_lang(&dest)?;
    validation::validate_src_lang(&src)?;

    let (send, recv) = tokio::sync::oneshot::channel::<Result<Translation, TranslateError>>();

    // The client blocks, so the round trip runs on the rayon pool
    rayon::spawn(move || {
        let _ = send.send(state.client.try_translate(&request.text, &dest, &src));
    });

    match recv.await {
        Ok(translation_result) => translation_result
            .map(Json)
            .map_err(|error| error.into()),
        Err(e) => Err(e.into()),
    }
}

pub async fn http_languages() -> Json<Vec<HttpLanguage>> {
    Json(
        languages()
            .map(|(code, name)| HttpLanguage { code, name })
            .collect(),
    )
}
