//! In-memory order resource used by the demo binary and integration tests.

use std::sync::atomic::{AtomicU64, Ordering};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use dashmap::DashMap;

use routemeter_core::{MethodDecl, MetricAnnotation, ResourceType};

use crate::app_state::AppState;

pub const RESOURCE: &str = "com.example.OrderService";
pub const NO_PARAMS: [&str; 0] = [];

/// Built-in declaration: placing is timed and metered, lookups are timed.
pub fn resource_type() -> ResourceType {
    ResourceType::new(RESOURCE)
        .method(
            MethodDecl::new("placeOrder")
                .param("String")
                .timed(MetricAnnotation::default())
                .metered(MetricAnnotation::absolute("orders.rate")),
        )
        .method(MethodDecl::new("getOrder").param("u64").timed(MetricAnnotation::default()))
        .method(MethodDecl::new("listOrders"))
}

#[derive(Default)]
pub struct OrderStore {
    next_id: AtomicU64,
    orders: DashMap<u64, String>,
}

impl OrderStore {
    pub fn place(&self, item: String) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.orders.insert(id, item);
        id
    }

    pub fn get(&self, id: u64) -> Option<String> {
        self.orders.get(&id).map(|r| r.value().clone())
    }

    pub fn list(&self) -> Vec<(u64, String)> {
        let mut all: Vec<_> = self.orders.iter().map(|e| (*e.key(), e.value().clone())).collect();
        all.sort_by_key(|(id, _)| *id);
        all
    }
}

pub async fn place_order(State(state): State<AppState>, body: String) -> impl IntoResponse {
    let item = body.trim();
    if item.is_empty() {
        return (StatusCode::BAD_REQUEST, "order body must not be empty".to_string());
    }
    let id = state.orders().place(item.to_string());
    (StatusCode::CREATED, id.to_string())
}

pub async fn get_order(State(state): State<AppState>, Path(id): Path<u64>) -> impl IntoResponse {
    match state.orders().get(id) {
        Some(item) => (StatusCode::OK, item),
        None => (StatusCode::NOT_FOUND, format!("order {id} not found")),
    }
}

pub async fn list_orders(State(state): State<AppState>) -> impl IntoResponse {
    state
        .orders()
        .list()
        .into_iter()
        .map(|(id, item)| format!("{id}\t{item}\n"))
        .collect::<String>()
}
