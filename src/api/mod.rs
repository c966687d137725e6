// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub mod auth;
pub mod health;
pub mod orders;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/orders",
            get(orders::list_orders).post(orders::place_order),
        )
        .route(
            "/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/health", get(health::health))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        orders::place_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order,
        orders::delete_order,
        health::health
    ),
    components(
        schemas(
            auth::CredentialsRequest,
            auth::RegisterResponse,
            auth::LoginResponse,
            orders::OrderRequest,
            crate::storage::StoredOrder,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Orders", description = "Order management, scoped to the authenticated user"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
