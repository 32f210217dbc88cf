//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (database)
//!
//! # Auth
//! POST   /auth/register        - Store a credential record
//! POST   /auth/login           - Exchange credentials for a bearer token
//!
//! # Products
//! GET    /products             - Product listing
//! POST   /products             - Create product (auth)
//! GET    /products/dashboard   - Dashboard figures (auth)
//! POST   /products/checkout    - Record a sale
//! GET    /products/{id}        - Product detail (auth)
//! PUT    /products/{id}        - Replace product (auth)
//! DELETE /products/{id}        - Delete product (auth)
//! ```

pub mod auth;
pub mod health;
pub mod products;

use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsOrigins;
use crate::middleware::{request_id_middleware, request_span};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/dashboard", get(products::dashboard))
        .route("/checkout", post(products::checkout))
        .route(
            "/{id}",
            get(products::show)
                .put(products::replace)
                .delete(products::destroy),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
}

/// Build the CORS layer from the configured allow-list.
///
/// Origins that are not valid header values are skipped with a warning.
#[must_use]
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let allow_origin = match origins {
        CorsOrigins::Any => AllowOrigin::any(),
        CorsOrigins::List(list) => AllowOrigin::list(list.iter().filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|e| tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin"))
                .ok()
        })),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application with middleware, bound to `state`.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors_origins);

    routes()
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::ApiConfig;

    /// State over a lazy pool that never connects: only routes that reject
    /// before touching the database can be exercised here.
    fn test_state() -> AppState {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://store@localhost:1/store"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5083,
            jwt_secret: SecretString::from("k3Y!q9Zr#Lm2Vx8@Pw5$Tn7&Hb4*Jc6^"),
            cors_origins: CorsOrigins::Any,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://store@localhost:1/store")
            .unwrap();
        AppState::new(config, pool)
    }

    fn bearer(state: &AppState) -> String {
        let issued = state.tokens().issue("a@x.com", Utc::now()).unwrap();
        format!("Bearer {}", issued.token)
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = app(test_state())
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let response = app(test_state())
            .oneshot(
                Request::get("/health")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_dashboard_requires_token() {
        let response = app(test_state())
            .oneshot(
                Request::get("/products/dashboard")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_forged_token_is_rejected() {
        let response = app(test_state())
            .oneshot(
                Request::get("/products/1")
                    .header(header::AUTHORIZATION, "Bearer e30.e30.AAAA")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_writes_require_token() {
        let app = app(test_state());
        let body = r#"{"name":"Shirt","costPrice":20,"salePrice":50}"#;

        for (method, uri) in [("POST", "/products"), ("PUT", "/products/1"), ("DELETE", "/products/1")] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_replace_with_mismatched_id_is_bad_request() {
        let state = test_state();
        let token = bearer(&state);

        let response = app(state)
            .oneshot(
                Request::put("/products/1")
                    .header(header::AUTHORIZATION, token)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"id":2,"name":"Shirt","costPrice":20,"salePrice":50}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_invalid_payload_is_bad_request() {
        let state = test_state();
        let token = bearer(&state);

        let response = app(state)
            .oneshot(
                Request::post("/products")
                    .header(header::AUTHORIZATION, token)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":" ","costPrice":20,"salePrice":50}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_with_price_beyond_column_is_bad_request() {
        let state = test_state();
        let token = bearer(&state);

        let response = app(state)
            .oneshot(
                Request::post("/products")
                    .header(header::AUTHORIZATION, token)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"name":"Shirt","costPrice":20,"salePrice":"100000000000000000.00"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_cart_is_bad_request() {
        let response = app(test_state())
            .oneshot(
                Request::post("/products/checkout")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("[]"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let response = app(test_state())
            .oneshot(
                Request::post("/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"not-an-email","secret":"s1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
