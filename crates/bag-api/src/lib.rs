//! bag-api - REST layer of the BAG address gateway
//!
//! Answers address lookups (`/addresses`, `/addresses/{id}` and their Dutch
//! aliases `/adressen`) from the registry provider chosen at startup, in
//! JSON, JSON-LD or HAL depending on the `Accept` header.
//!
//! # Usage
//!
//! ```ignore
//! use bag_api::{create_router, AppState, Gateway};
//!
//! let config = bag_proxy::connect(&settings)?;
//! let state = AppState::new(Gateway::new(config));
//! let router = create_router(state);
//! ```

pub mod classify;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod render;
pub mod state;

pub use classify::{classify, ClassifyError, RequestShape};
pub use error::ApiError;
pub use gateway::Gateway;
pub use render::{Format, ResponseEnvelope};
pub use state::AppState;

use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the gateway router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .fallback(handlers::not_found)
        // Address lookups are answered before routing
        .layer(middleware::from_fn_with_state(
            state.clone(),
            handlers::addresses::intercept,
        ))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bag_core::{
        Address, AddressProvider, Postcode, ProviderConfiguration, ProviderKind, ProviderResult,
    };
    use tower::ServiceExt;

    struct EchoProvider;

    #[async_trait]
    impl AddressProvider for EchoProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Kadaster
        }

        async fn get_by_id(&self, id: &str) -> ProviderResult<Address> {
            Ok(Address::new(id, 1))
        }

        async fn get_by_tuple(
            &self,
            house_number: u32,
            postcode: &Postcode,
        ) -> ProviderResult<Vec<Address>> {
            Ok(vec![
                Address::new("E1", house_number).with_postcode(postcode.clone())
            ])
        }
    }

    fn router() -> Router {
        let config = ProviderConfiguration::new("https://example.test/", Arc::new(EchoProvider));
        create_router(AppState::from_config(config))
    }

    async fn send(method: &str, uri: &str) -> axum::response::Response {
        router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn health_is_not_intercepted() {
        let response = send("GET", "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn address_routes_are_answered_by_the_gateway() {
        let response = send("GET", "/adressen/0363200000123456").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/hal+json"
        );
    }

    #[tokio::test]
    async fn non_get_falls_through_to_not_found() {
        let response = send("DELETE", "/addresses/X1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
