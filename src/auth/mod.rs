mod clients;
mod lockin;
mod login;
mod logout;

use axum::{Router, routing::get};

use crate::AppState;

pub use clients::Clients;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/{provider}", get(login::login))
        .route("/lockin/{provider}", get(lockin::lockin))
        .route("/logout", get(logout::logout))
}
