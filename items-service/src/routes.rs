//! Route registration table.
//!
//! Every HTTP route the service exposes is declared here with its method,
//! path and auth level. `startup::build_router` turns the table into an axum
//! router at process start.

use crate::config::{AuthLevel, ItemsConfig};
use crate::handlers;
use crate::startup::AppState;
use axum::{
    http::Method,
    routing::{get, post, MethodRouter},
};

pub const ITEMS_PATH: &str = "/api/items";

pub struct Route {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub auth: AuthLevel,
    pub handler: MethodRouter<AppState>,
}

pub fn route_table(config: &ItemsConfig) -> Vec<Route> {
    vec![
        Route {
            name: "create_item",
            method: Method::POST,
            path: ITEMS_PATH,
            auth: config.auth.create_level,
            handler: post(handlers::create_item),
        },
        Route {
            name: "list_items",
            method: Method::GET,
            path: ITEMS_PATH,
            auth: config.auth.list_level,
            handler: get(handlers::list_items),
        },
        Route {
            name: "health",
            method: Method::GET,
            path: "/health",
            auth: AuthLevel::Anonymous,
            handler: get(handlers::health_check),
        },
        Route {
            name: "ready",
            method: Method::GET,
            path: "/ready",
            auth: AuthLevel::Anonymous,
            handler: get(handlers::readiness_check),
        },
        Route {
            name: "metrics",
            method: Method::GET,
            path: "/metrics",
            auth: AuthLevel::Anonymous,
            handler: get(handlers::metrics_endpoint),
        },
    ]
}
