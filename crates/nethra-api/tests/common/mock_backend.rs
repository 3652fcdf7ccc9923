//! In-process billing backend for integration tests.
//!
//! Serves the same routes as the real server from an in-memory store and
//! records every request for assertions.

#![allow(dead_code)]

use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// Bytes served for every PDF file.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n% nethra test invoice\n%%EOF\n";

/// A captured request for assertions.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// How `generate-pdf` reports its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfLinkStyle {
    /// `"pdf_url": "uploads/Invoice_X.pdf"`
    RelativeString,
    /// `"pdf_url": { "url": "/uploads/Invoice_X.pdf" }`
    Object,
}

struct Store {
    products: Vec<Value>,
    bills: Vec<Value>,
    next_product_id: i64,
    next_bill_id: i64,
    requests: Vec<CapturedRequest>,
    bodies: Vec<(String, Value)>,
    failing_paths: Vec<String>,
    single_bill_endpoint: bool,
    reject_updates: bool,
    pdf_link_style: PdfLinkStyle,
}

impl Store {
    fn record_body(&mut self, path: &str, body: &Value) {
        self.bodies.push((path.to_string(), body.clone()));
    }
}

#[derive(Clone)]
struct MockState {
    store: Arc<Mutex<Store>>,
}

/// Mock billing backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    state: MockState,
    shutdown: tokio::sync::watch::Sender<bool>,
}

impl MockBackend {
    /// Start a new mock backend on an ephemeral port.
    pub async fn start() -> Self {
        let state = MockState {
            store: Arc::new(Mutex::new(Store {
                products: Vec::new(),
                bills: Vec::new(),
                next_product_id: 1,
                next_bill_id: 1,
                requests: Vec::new(),
                bodies: Vec::new(),
                failing_paths: Vec::new(),
                single_bill_endpoint: true,
                reject_updates: false,
                pdf_link_style: PdfLinkStyle::Object,
            })),
        };

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);

        let app = Router::new()
            .route("/api/get_items", get(list_items))
            .route("/api/items/addItem", post(add_item))
            .route("/api/item/update/{id}", patch(update_item))
            .route("/api/item/delete/{id}", patch(delete_item))
            .route("/api/bills/all", get(list_bills))
            .route("/api/bills/create", post(create_bill))
            .route("/api/bills/next-invoice", get(next_invoice))
            .route("/api/bills/generate-pdf", post(generate_pdf))
            .route("/api/bills/update/{id}", patch(update_bill))
            .route("/api/bills/{id}", get(get_bill))
            .route("/api/bills/{id}/pdf", get(stored_pdf))
            .route("/uploads/{name}", get(serve_pdf))
            .layer(middleware::from_fn_with_state(state.clone(), record_and_gate))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.changed().await;
                })
                .await
                .ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

        Self {
            addr,
            state,
            shutdown: shutdown_tx,
        }
    }

    /// Get the base URL for this mock server.
    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Adds a product directly to the store and returns its id.
    pub async fn seed_product(&self, name: &str, name_english: &str, weight: &str, price: i64) -> i64 {
        let mut store = self.state.store.lock().await;
        let id = store.next_product_id;
        store.next_product_id += 1;
        store.products.push(json!({
            "id": id,
            "name": name,
            "name_english": name_english,
            "weight": weight,
            "price": price,
        }));
        id
    }

    /// Adds a bill with two lines (2 × ₹50, 1 × ₹30) and returns its id.
    pub async fn seed_bill(&self, invoice_number: &str, buyer_name: &str) -> i64 {
        let mut store = self.state.store.lock().await;
        let id = store.next_bill_id;
        store.next_bill_id += 1;
        store.bills.push(json!({
            "id": id,
            "invoice_number": invoice_number,
            "invoice_date": "2025-01-15T00:00:00.000Z",
            "subtotal": "130.00",
            "total": "130.00",
            "buyer": { "buyer_name": buyer_name, "phone": "9876543210", "address": "Salem" },
            "items": [
                { "item_id": 1, "qty": 2, "price": 50, "amount": 100,
                  "item_name": "முறுக்கு", "name_english": "Murukku" },
                { "item_id": 2, "qty": 1, "price": 30, "amount": 30,
                  "item_name": "அதிரசம்", "name_english": "Adhirasam" }
            ]
        }));
        id
    }

    /// Makes every request to `path` answer 500.
    pub async fn fail(&self, path: &str) {
        self.state.store.lock().await.failing_paths.push(path.to_string());
    }

    /// Turns `GET /api/bills/:id` into a 404 for every id.
    pub async fn disable_single_bill_endpoint(&self) {
        self.state.store.lock().await.single_bill_endpoint = false;
    }

    /// Makes `PATCH /api/bills/update/:id` answer `{"success": false}`.
    pub async fn reject_updates(&self) {
        self.state.store.lock().await.reject_updates = true;
    }

    pub async fn set_pdf_link_style(&self, style: PdfLinkStyle) {
        self.state.store.lock().await.pdf_link_style = style;
    }

    /// Get all captured requests.
    pub async fn captured_requests(&self) -> Vec<CapturedRequest> {
        self.state.store.lock().await.requests.clone()
    }

    /// Count of requests that hit `path`.
    pub async fn hits(&self, path: &str) -> usize {
        self.captured_requests()
            .await
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    /// JSON bodies received on `path`, oldest first.
    pub async fn bodies(&self, path: &str) -> Vec<Value> {
        self.state
            .store
            .lock()
            .await
            .bodies
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, b)| b.clone())
            .collect()
    }

    /// Current stored bill by id.
    pub async fn stored_bill(&self, id: i64) -> Option<Value> {
        self.state
            .store
            .lock()
            .await
            .bills
            .iter()
            .find(|b| b["id"] == json!(id))
            .cloned()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

// =============================================================================
// Middleware
// =============================================================================

async fn record_and_gate(State(state): State<MockState>, req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    {
        let mut store = state.store.lock().await;
        store.requests.push(CapturedRequest {
            method: req.method().to_string(),
            path: path.clone(),
            authorization: req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        });
        if store.failing_paths.iter().any(|p| p == &path) {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "internal error" })),
            )
                .into_response();
        }
    }
    next.run(req).await
}

// =============================================================================
// Products
// =============================================================================

async fn list_items(State(state): State<MockState>) -> Response {
    let store = state.store.lock().await;
    Json(json!({ "data": store.products })).into_response()
}

async fn add_item(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut store = state.store.lock().await;
    store.record_body("/api/items/addItem", &body);

    let id = store.next_product_id;
    store.next_product_id += 1;
    let mut product = body;
    product["id"] = json!(id);
    store.products.push(product.clone());

    Json(json!({ "success": true, "data": product })).into_response()
}

async fn update_item(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.lock().await;
    store.record_body(&format!("/api/item/update/{}", id), &body);

    match store.products.iter_mut().find(|p| p["id"] == json!(id)) {
        Some(product) => {
            let mut updated = body;
            updated["id"] = json!(id);
            *product = updated;
            Json(json!({ "success": true })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

async fn delete_item(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    let mut store = state.store.lock().await;
    let before = store.products.len();
    store.products.retain(|p| p["id"] != json!(id));
    if store.products.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response();
    }
    Json(json!({ "success": true, "message": "Item deleted" })).into_response()
}

// =============================================================================
// Bills
// =============================================================================

async fn list_bills(State(state): State<MockState>) -> Response {
    let store = state.store.lock().await;
    Json(json!({ "data": store.bills })).into_response()
}

async fn get_bill(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    let store = state.store.lock().await;
    if !store.single_bill_endpoint {
        return (StatusCode::NOT_FOUND, "Cannot GET").into_response();
    }
    match store.bills.iter().find(|b| b["id"] == json!(id)) {
        Some(bill) => Json(json!({ "data": bill })).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

async fn create_bill(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut store = state.store.lock().await;
    store.record_body("/api/bills/create", &body);

    let id = store.next_bill_id;
    store.next_bill_id += 1;

    let buyer = &body["buyer"];
    store.bills.push(json!({
        "id": id,
        "invoice_number": body["invoice_number"],
        "invoice_date": body["invoice_date"],
        "subtotal": body["subtotal"],
        "total": body["total"],
        "buyer": {
            "buyer_name": buyer["buyer_name"],
            "phone": buyer.get("phone").cloned().unwrap_or(Value::Null),
            "address": buyer.get("address").cloned().unwrap_or(Value::Null),
        },
        "items": body["bill_items"],
    }));

    Json(json!({
        "success": true,
        "message": "Bill created successfully",
        "data": {
            "bill_id": id,
            "invoice_number": body["invoice_number"],
            "buyer_id": 1,
            "pdf_url": null,
            "created_at": "2025-01-15T10:00:00.000Z"
        }
    }))
    .into_response()
}

async fn next_invoice(State(state): State<MockState>) -> Response {
    let store = state.store.lock().await;
    Json(json!({ "invoice_number": format!("INV-{:04}", store.next_bill_id) })).into_response()
}

async fn update_bill(
    State(state): State<MockState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = state.store.lock().await;
    store.record_body(&format!("/api/bills/update/{}", id), &body);

    if store.reject_updates {
        return Json(json!({ "success": false, "message": "Bill is locked" })).into_response();
    }
    match store.bills.iter_mut().find(|b| b["id"] == json!(id)) {
        Some(bill) => {
            *bill = body;
            Json(json!({ "success": true })).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

async fn generate_pdf(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    let mut store = state.store.lock().await;
    store.record_body("/api/bills/generate-pdf", &body);

    let file = format!(
        "Invoice_{}.pdf",
        body["invoice_number"].as_str().unwrap_or("unknown")
    );
    let pdf_url = match store.pdf_link_style {
        PdfLinkStyle::RelativeString => json!(format!("uploads/{}", file)),
        PdfLinkStyle::Object => json!({ "url": format!("/uploads/{}", file) }),
    };
    Json(json!({ "success": true, "pdf_url": pdf_url })).into_response()
}

async fn stored_pdf(State(state): State<MockState>, Path(id): Path<i64>) -> Response {
    let store = state.store.lock().await;
    match store.bills.iter().find(|b| b["id"] == json!(id)) {
        Some(bill) => Json(json!({
            "pdf_url": format!("/uploads/Invoice_{}.pdf", bill["invoice_number"].as_str().unwrap_or(""))
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response(),
    }
}

async fn serve_pdf(Path(name): Path<String>) -> Response {
    if !name.ends_with(".pdf") || name.contains("missing") {
        return (StatusCode::NOT_FOUND, "no such file").into_response();
    }
    ([(header::CONTENT_TYPE, "application/pdf")], PDF_BYTES).into_response()
}
