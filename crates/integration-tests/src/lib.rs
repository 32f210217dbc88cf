//! Integration tests for the store manager API.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the API
//! cargo run -p store-manager-cli -- migrate
//! cargo run -p store-manager-api
//!
//! # Run the ignored integration tests against it
//! cargo test -p store-manager-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STORE_API_URL` - Base URL of the running API (default: `http://localhost:5083`)
//! - `STORE_DATABASE_URL` - Same database the API uses (falls back to `DATABASE_URL`)

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

/// Shared handles for one test: an HTTP client, the API base URL and a
/// direct database connection for arranging and inspecting state.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
}

impl TestContext {
    /// Connect to the database and build an HTTP client.
    ///
    /// # Panics
    ///
    /// Panics if no database URL is configured or the database is unreachable.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let base_url =
            std::env::var("STORE_API_URL").unwrap_or_else(|_| "http://localhost:5083".to_string());
        let database_url = std::env::var("STORE_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("STORE_DATABASE_URL must be set for integration tests");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            pool,
        }
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register a fresh credential and return `(email, secret)`.
    ///
    /// # Panics
    ///
    /// Panics if registration does not return 200.
    pub async fn register_user(&self) -> (String, String) {
        let email = format!("it-{}@example.com", Uuid::new_v4().simple());
        let secret = format!("s-{}", Uuid::new_v4().simple());

        let resp = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "secret": secret }))
            .send()
            .await
            .expect("Failed to register user");
        assert_eq!(resp.status(), StatusCode::OK);

        (email, secret)
    }

    /// Register a fresh credential and log in with it.
    ///
    /// # Panics
    ///
    /// Panics if registration or login fails.
    pub async fn token(&self) -> String {
        let (email, secret) = self.register_user().await;

        let resp = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "secret": secret }))
            .send()
            .await
            .expect("Failed to log in");
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("Invalid login response");
        body["token"]
            .as_str()
            .expect("login response has no token")
            .to_string()
    }

    /// A request builder with the bearer token attached.
    #[must_use]
    pub fn authed(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.bearer_auth(token)
    }

    /// Create a product through the API and return its JSON.
    ///
    /// # Panics
    ///
    /// Panics if the API does not answer 201.
    pub async fn create_product(&self, token: &str, payload: &Value) -> Value {
        let resp = self
            .authed(self.client.post(self.url("/products")), token)
            .json(payload)
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), StatusCode::CREATED);

        resp.json().await.expect("Invalid product response")
    }

    /// Number of rows in `store.sale`.
    ///
    /// # Panics
    ///
    /// Panics if the query fails.
    pub async fn sale_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM store.sale")
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count sales")
    }
}

/// Product payload with a unique name and the given variants.
#[must_use]
pub fn product_payload(sale_price: &str, variants: &Value) -> Value {
    json!({
        "name": format!("Shirt {}", Uuid::new_v4().simple()),
        "category": "Tops",
        "costPrice": "20.00",
        "salePrice": sale_price,
        "photoUrl": "https://cdn.example.com/shirt.jpg",
        "variants": variants,
    })
}
