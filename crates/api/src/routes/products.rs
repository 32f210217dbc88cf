//! Product catalog, dashboard and checkout handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Serialize;
use tracing::instrument;

use store_manager_core::ProductId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{DashboardStats, Product, ProductInput};
use crate::services::{CatalogService, CheckoutService, DashboardService};
use crate::state::AppState;

/// Plain acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List all products with their variants.
///
/// GET /products
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogService::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Summary figures for the admin dashboard.
///
/// GET /products/dashboard
#[instrument(skip(state, _user))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<DashboardStats>> {
    let stats = DashboardService::new(state.pool()).stats(Utc::now()).await?;
    Ok(Json(stats))
}

/// One product with its variants.
///
/// GET /products/{id}
#[instrument(skip(state, _user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.pool()).get(id).await?;
    Ok(Json(product))
}

/// Create a product and its variants.
///
/// POST /products
#[instrument(skip(state, user, input), fields(user = %user.email))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<ProductInput>,
) -> Result<impl IntoResponse> {
    let product = CatalogService::new(state.pool()).create(input).await?;
    let location = format!("/products/{}", product.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

/// Replace a product and its whole variant set.
///
/// PUT /products/{id}
#[instrument(skip(state, user, input), fields(user = %user.email))]
pub async fn replace(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<StatusCode> {
    CatalogService::new(state.pool()).replace(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product and its variants.
///
/// DELETE /products/{id}
#[instrument(skip(state, user), fields(user = %user.email))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<StatusCode> {
    CatalogService::new(state.pool()).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Record a sale for a cart of product ids.
///
/// POST /products/checkout
#[instrument(skip(state, ids), fields(items = ids.len()))]
pub async fn checkout(
    State(state): State<AppState>,
    Json(ids): Json<Vec<ProductId>>,
) -> Result<Json<MessageResponse>> {
    CheckoutService::new(state.pool())
        .checkout(&ids, Utc::now())
        .await?;

    Ok(Json(MessageResponse {
        message: "Sale recorded",
    }))
}
