use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect},
};
use serde::Deserialize;
use url::Url;

use crate::{
    controller::page,
    error::{verification::VerificationError, AppError},
    service::callback::CallbackService,
    state::AppState,
};

/// Greeting for anyone opening the server root.
pub const INDEX_GREETING: &str = "Hei du! Her skal ikke du drive å luske!";

/// Query parameters Galtinn appends to the redirect URI.
///
/// Both are optional so a hand-edited URL renders the invalid-link page
/// instead of a bare extractor rejection.
#[derive(Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
}

pub async fn index() -> &'static str {
    INDEX_GREETING
}

pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(code), Some(csrf_state)) = (params.code, params.state) else {
        return Err(VerificationError::ExpiredOrInvalidLink.into());
    };

    let service = CallbackService::new(
        &state.db,
        &state.http_client,
        &state.oauth_client,
        &state.galtinn_api_url,
        state.publisher.as_ref(),
    );

    let userinfo = service.callback(code, &csrf_state).await?;

    Ok(Redirect::to(&success_path(&userinfo.preferred_username)?))
}

pub async fn success(Path(name): Path<String>) -> impl IntoResponse {
    page::success_page(&name)
}

/// Builds `/success/{name}` with `name` percent-encoded as one path segment.
fn success_path(name: &str) -> Result<String, AppError> {
    let mut url = Url::parse("http://localhost/success")
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| AppError::InternalError("success URL cannot be a base".to_string()))?
        .push(name);

    Ok(url.path().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_path_encodes_name() -> Result<(), AppError> {
        assert_eq!(success_path("ola")?, "/success/ola");
        assert_eq!(success_path("ola nordmann")?, "/success/ola%20nordmann");
        assert_eq!(success_path("a/b")?, "/success/a%2Fb");

        Ok(())
    }
}
