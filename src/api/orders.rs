// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Order CRUD endpoints.
//!
//! All routes require a bearer token; the [`Auth`] extractor supplies the
//! identity that scopes every repository call. The request body cannot
//! carry `id`, `total_amount`, or an owner — those fields do not exist on
//! [`OrderRequest`], so they are server-computed by construction.

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, StatusCode},
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    auth::Auth,
    error::ApiError,
    state::AppState,
    storage::{OrderRepository, StoredOrder},
};

/// Maximum product name length in characters.
const PRODUCT_NAME_MAX_LEN: usize = 100;

/// Client input for creating or updating an order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderRequest {
    /// Product name, 1-100 characters.
    pub product_name: String,
    /// Ordered quantity, at least 1.
    pub quantity: u32,
    /// Price per unit, greater than zero.
    pub unit_price: Decimal,
}

impl OrderRequest {
    /// Structural validation, reporting every violated constraint.
    fn validate(&self) -> Result<(), ApiError> {
        let mut violations = Vec::new();

        if self.product_name.trim().is_empty() {
            violations.push("product_name is required.".to_string());
        } else if self.product_name.chars().count() > PRODUCT_NAME_MAX_LEN {
            violations.push(format!(
                "product_name must be at most {PRODUCT_NAME_MAX_LEN} characters."
            ));
        }
        if self.quantity < 1 {
            violations.push("quantity must be at least 1.".to_string());
        }
        if self.unit_price <= Decimal::ZERO {
            violations.push("unit_price must be greater than zero.".to_string());
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation(violations))
        }
    }
}

/// Place a new order for the authenticated user.
#[utoipa::path(
    post,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created; Location points at the new resource", body = StoredOrder),
        (status = 400, description = "Validation failed; body lists every violated constraint"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn place_order(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<StoredOrder>), ApiError> {
    request.validate()?;

    let repo = OrderRepository::new(&state.db);
    let order = repo.create(
        &user.username,
        &request.product_name,
        request.quantity,
        request.unit_price,
    )?;

    tracing::info!(order_id = order.id, owner = %order.owner_username, "order placed");

    let location = format!("/orders/{}", order.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(order),
    ))
}

/// List the authenticated user's orders, newest first.
#[utoipa::path(
    get,
    path = "/orders",
    tag = "Orders",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's orders", body = [StoredOrder]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_orders(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredOrder>>, ApiError> {
    let repo = OrderRepository::new(&state.db);
    Ok(Json(repo.list(&user.username)?))
}

/// Get one of the authenticated user's orders by id.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Order id")
    ),
    responses(
        (status = 200, description = "The order", body = StoredOrder),
        (status = 404, description = "No such order for this user"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_order(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<StoredOrder>, ApiError> {
    let repo = OrderRepository::new(&state.db);

    let order = repo
        .get(&user.username, id)?
        .ok_or_else(|| ApiError::not_found(format!("Order {id} not found")))?;

    Ok(Json(order))
}

/// Update one of the authenticated user's orders.
#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Order id")
    ),
    request_body = OrderRequest,
    responses(
        (status = 204, description = "Order updated"),
        (status = 400, description = "Validation failed; body lists every violated constraint"),
        (status = 404, description = "No such order for this user"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn update_order(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<OrderRequest>,
) -> Result<StatusCode, ApiError> {
    request.validate()?;

    let repo = OrderRepository::new(&state.db);
    repo.update(
        &user.username,
        id,
        &request.product_name,
        request.quantity,
        request.unit_price,
    )?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of the authenticated user's orders.
#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "Orders",
    security(("bearer_auth" = [])),
    params(
        ("id" = u64, Path, description = "Order id")
    ),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "No such order for this user"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn delete_order(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    let repo = OrderRepository::new(&state.db);
    repo.delete(&user.username, id)?;

    Ok(StatusCode::NO_CONTENT)
}
