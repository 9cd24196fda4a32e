use axum::{routing::get, Router};

use crate::{
    controller::callback::{callback, index, success},
    state::AppState,
};

/// Routes of the verification callback server.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/callback", get(callback))
        .route("/success/{name}", get(success))
}
