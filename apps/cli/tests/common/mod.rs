//! Minimal billing backend for command-level tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use nethra_api::{ApiClient, ClientConfig};
use nethra_cli::state::{Toast, ToastChannel};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Mutex};

#[derive(Default)]
struct Store {
    products: Vec<Value>,
    bills: Vec<Value>,
    fail_updates: bool,
    created: Vec<Value>,
}

type Shared = Arc<Mutex<Store>>;

pub struct Backend {
    pub addr: SocketAddr,
    store: Shared,
}

impl Backend {
    /// Serves Murukku (₹50), Adhirasam (₹30) and one stored bill with id 1.
    pub async fn start() -> Self {
        let store: Shared = Arc::new(Mutex::new(Store {
            products: vec![
                json!({ "id": 1, "name": "முறுக்கு", "name_english": "Murukku", "weight": "500g", "price": 50 }),
                json!({ "id": 2, "name": "அதிரசம்", "name_english": "Adhirasam", "weight": "250g", "price": 30 }),
            ],
            bills: vec![json!({
                "id": 1,
                "invoice_number": "INV-0001",
                "invoice_date": "2025-01-15T00:00:00.000Z",
                "subtotal": "130.00",
                "total": "130.00",
                "buyer": { "buyer_name": "Meena", "phone": "9876543210", "address": "Salem" },
                "items": [
                    { "item_id": 1, "qty": 2, "price": 50, "amount": 100,
                      "item_name": "முறுக்கு", "name_english": "Murukku" },
                    { "item_id": 2, "qty": 1, "price": 30, "amount": 30,
                      "item_name": "அதிரசம்", "name_english": "Adhirasam" }
                ]
            })],
            ..Default::default()
        }));

        let app = Router::new()
            .route("/api/get_items", get(list_items))
            .route("/api/bills/all", get(list_bills))
            .route("/api/bills/next-invoice", get(next_invoice))
            .route("/api/bills/create", post(create_bill))
            .route("/api/bills/update/{id}", patch(update_bill))
            .route("/api/bills/generate-pdf", post(generate_pdf))
            .route("/api/bills/{id}", get(get_bill))
            .route("/uploads/{name}", get(serve_pdf))
            .with_state(store.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self { addr, store }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(ClientConfig::new(format!("http://{}/", self.addr))).unwrap()
    }

    pub async fn fail_updates(&self) {
        self.store.lock().await.fail_updates = true;
    }

    /// Bodies received on `POST /api/bills/create`.
    pub async fn created(&self) -> Vec<Value> {
        self.store.lock().await.created.clone()
    }
}

/// Toast channel plus a receiver that sees everything sent on it.
pub fn toasts() -> (ToastChannel, broadcast::Receiver<Toast>) {
    let channel = ToastChannel::new();
    let rx = channel.subscribe();
    (channel, rx)
}

/// Everything received so far, rendered.
pub fn drain(rx: &mut broadcast::Receiver<Toast>) -> Vec<String> {
    let mut out = Vec::new();
    while let Ok(toast) = rx.try_recv() {
        out.push(toast.render());
    }
    out
}

async fn list_items(State(store): State<Shared>) -> Response {
    Json(json!({ "data": store.lock().await.products })).into_response()
}

async fn list_bills(State(store): State<Shared>) -> Response {
    Json(json!({ "data": store.lock().await.bills })).into_response()
}

async fn get_bill(State(store): State<Shared>, Path(id): Path<i64>) -> Response {
    let store = store.lock().await;
    match store.bills.iter().find(|b| b["id"] == json!(id)) {
        Some(bill) => Json(json!({ "data": bill })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

async fn next_invoice(State(store): State<Shared>) -> Response {
    let next = store.lock().await.bills.len() + 1;
    Json(json!({ "invoice_number": format!("INV-{:04}", next) })).into_response()
}

async fn create_bill(State(store): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut store = store.lock().await;
    store.created.push(body.clone());
    let id = store.bills.len() as i64 + 1;
    store.bills.push(json!({ "id": id }));
    Json(json!({
        "success": true,
        "data": { "bill_id": id, "invoice_number": body["invoice_number"] }
    }))
    .into_response()
}

async fn update_bill(State(store): State<Shared>, Path(_id): Path<i64>) -> Response {
    if store.lock().await.fail_updates {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "internal error" })),
        )
            .into_response();
    }
    Json(json!({ "success": true })).into_response()
}

async fn generate_pdf(Json(body): Json<Value>) -> Response {
    let file = format!(
        "Invoice_{}.pdf",
        body["invoice_number"].as_str().unwrap_or("unknown")
    );
    Json(json!({ "success": true, "pdf_url": format!("uploads/{}", file) })).into_response()
}

async fn serve_pdf(Path(_name): Path<String>) -> Response {
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        &b"%PDF-1.4\n%%EOF\n"[..],
    )
        .into_response()
}
