//! Address lookup interception
//!
//! Runs in front of the router for every request. Address lookups are
//! answered here; anything the classifier does not recognize continues to
//! the regular routes untouched.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::classify::RequestShape;
use crate::state::AppState;

pub async fn intercept(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let shape = RequestShape::from_parts(request.method(), request.uri());
    let accept = request
        .headers()
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    match state.gateway().handle(&shape, accept.as_deref()).await {
        Ok(Some(envelope)) => envelope.into_response(),
        Ok(None) => next.run(request).await,
        Err(e) => e.into_response(),
    }
}
