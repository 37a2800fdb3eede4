//! In-process stand-in for the Iris storefront backend.
//!
//! Serves just enough of the HTTP surface for the service tests: bearer
//! auth with a cookie-borne refresh, an authoritative cart, checkout and
//! the QR payment endpoints with their push status feed. Tests seed state
//! through the [`StubApi`] handle and read back what the client sent.

#![expect(
    clippy::expect_used,
    reason = "fixtures fail loudly instead of propagating setup errors"
)]
#![expect(
    clippy::needless_pass_by_value,
    reason = "extractor arguments are consumed by value"
)]
#![expect(
    clippy::unused_async,
    reason = "handler signatures are dictated by the router"
)]

use std::{
    convert::Infallible,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::{
    Json, Router,
    extract::{Path, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{
        IntoResponse, Response,
        sse::{Event, Sse},
    },
    routing::{get, patch, post},
};
use futures::{Stream, StreamExt, stream};
use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::sync::broadcast;

/// Credentials the stub accepts.
pub(crate) const EMAIL: &str = "nida@example.com";
pub(crate) const PASSWORD: &str = "orchid-garden-7";

const REFRESH_COOKIE: &str = "iris_refresh=ok";

/// Handle to a running stub server.
#[derive(Debug)]
pub(crate) struct StubApi {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubApi {
    /// Starts the stub on an ephemeral port.
    pub(crate) async fn start() -> Self {
        let (events, _) = broadcast::channel(16);
        let state = Arc::new(StubState {
            inner: Mutex::new(StubInner::new()),
            events,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("the stub listener should bind to an ephemeral port");
        let addr = listener
            .local_addr()
            .expect("the bound listener should know its address");

        let router = router(Arc::clone(&state));

        tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router).await {
                tracing::error!(%error, "stub server stopped");
            }
        });

        Self { addr, state }
    }

    pub(crate) fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Seeds the listing returned by `GET /api/products`.
    pub(crate) fn set_products(&self, listing: Value) {
        self.state.lock().listing = listing;
    }

    pub(crate) fn set_product(&self, id: i64, body: Value) {
        self.state.lock().products.insert(id, body);
    }

    pub(crate) fn set_related(&self, id: i64, body: Value) {
        self.state.lock().related.insert(id, body);
    }

    pub(crate) fn set_categories(&self, body: Value) {
        self.state.lock().categories = body;
    }

    /// Registers a purchasable variant with a price and a stock level.
    pub(crate) fn stock_variant(&self, id: i64, stock: i64, price: &str) {
        let price = price
            .parse()
            .expect("variant prices in tests are valid decimals");

        self.state.lock().variants.insert(
            id,
            StubVariant {
                name: format!("Shade {id}"),
                price,
                stock,
            },
        );
    }

    /// Makes `POST /api/cart/clear` answer 404, the way older gateways do.
    pub(crate) fn disable_clear_endpoint(&self) {
        self.state.lock().clear_enabled = false;
    }

    /// Invalidates every issued access token; refresh keeps working.
    pub(crate) fn expire_access_tokens(&self) {
        self.state.lock().access_tokens.clear();
    }

    /// Makes the refresh endpoint reject from now on.
    pub(crate) fn revoke_refresh(&self) {
        self.state.lock().refresh_valid = false;
    }

    /// Counts recorded requests whose path starts with `path_prefix`.
    pub(crate) fn request_count(&self, method: &str, path_prefix: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|(recorded, path)| recorded == method && path.starts_with(path_prefix))
            .count()
    }
}

#[derive(Debug)]
struct StubState {
    inner: Mutex<StubInner>,
    events: broadcast::Sender<(i64, String)>,
}

impl StubState {
    fn lock(&self) -> MutexGuard<'_, StubInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue_token(&self) -> String {
        let mut inner = self.lock();
        inner.issued += 1;
        let token = format!("tok-{}", inner.issued);
        inner.access_tokens.insert(token.clone());

        token
    }
}

#[derive(Debug)]
struct StubInner {
    access_tokens: FxHashSet<String>,
    issued: u64,
    refresh_valid: bool,
    listing: Value,
    products: FxHashMap<i64, Value>,
    related: FxHashMap<i64, Value>,
    categories: Value,
    variants: FxHashMap<i64, StubVariant>,
    cart: Vec<StubLine>,
    next_line: i64,
    orders: Vec<StubOrder>,
    next_order: i64,
    next_order_line: i64,
    clear_enabled: bool,
    requests: Vec<(String, String)>,
}

impl StubInner {
    fn new() -> Self {
        Self {
            access_tokens: FxHashSet::default(),
            issued: 0,
            refresh_valid: false,
            listing: json!([]),
            products: FxHashMap::default(),
            related: FxHashMap::default(),
            categories: json!([]),
            variants: FxHashMap::default(),
            cart: Vec::new(),
            next_line: 1,
            orders: Vec::new(),
            next_order: 1,
            next_order_line: 1,
            clear_enabled: true,
            requests: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct StubVariant {
    name: String,
    price: Decimal,
    stock: i64,
}

#[derive(Debug)]
struct StubLine {
    id: i64,
    variant_id: i64,
    qty: i64,
}

#[derive(Debug)]
struct StubOrder {
    id: i64,
    status: String,
    created_at: String,
    lines: Vec<StubOrderLine>,
}

impl StubOrder {
    fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .map(|line| line.unit_price * Decimal::from(line.qty))
            .sum()
    }
}

#[derive(Debug)]
struct StubOrderLine {
    id: i64,
    product_id: i64,
    name: String,
    unit_price: Decimal,
    qty: i64,
}

fn router(state: Arc<StubState>) -> Router {
    let guarded = Router::new()
        .route("/auth/me", get(me))
        .route("/api/products", get(products_index))
        .route("/api/products/{id}", get(products_show))
        .route("/api/products/{id}/related", get(products_related))
        .route("/api/shop/categories", get(categories_index))
        .route("/api/cart/me", get(cart_me))
        .route("/api/cart/items", post(cart_add))
        .route(
            "/api/cart/items/{id}",
            patch(cart_set_qty).delete(cart_remove),
        )
        .route("/api/cart/clear", post(cart_clear))
        .route("/api/orders/checkout", post(orders_checkout))
        .route("/api/orders/me", get(orders_index))
        .route("/api/orders/{id}", get(orders_show))
        .route("/api/payment/me", get(payment_me))
        .route("/api/payment/scb/qr", post(payment_qr))
        .route("/api/payment/scb/status", get(payment_status))
        .route("/api/payment/scb/simulate-paid", post(payment_simulate))
        .route("/api/payment/events/{id}", get(payment_events))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_bearer,
        ));

    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .merge(guarded)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            record_request,
        ))
        .with_state(state)
}

async fn record_request(
    State(state): State<Arc<StubState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    state.lock().requests.push((method, path));

    next.run(request).await
}

async fn require_bearer(
    State(state): State<Arc<StubState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| state.lock().access_tokens.contains(token));

    if !authorized {
        return unauthorized();
    }

    next.run(request).await
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "unauthorized"})),
    )
        .into_response()
}

async fn login(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let email = body.get("email").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    if email != Some(EMAIL) || password != Some(PASSWORD) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "invalid credentials"})),
        )
            .into_response();
    }

    state.lock().refresh_valid = true;
    let token = state.issue_token();

    (
        [(header::SET_COOKIE, "iris_refresh=ok; HttpOnly; Path=/")],
        Json(json!({"accessToken": token, "user": user_body()})),
    )
        .into_response()
}

async fn refresh(State(state): State<Arc<StubState>>, headers: HeaderMap) -> Response {
    let cookie_present = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|cookies| cookies.contains(REFRESH_COOKIE));

    if !cookie_present || !state.lock().refresh_valid {
        return unauthorized();
    }

    let token = state.issue_token();

    Json(json!({"accessToken": token})).into_response()
}

async fn logout(State(state): State<Arc<StubState>>) -> StatusCode {
    let mut inner = state.lock();
    inner.access_tokens.clear();
    inner.refresh_valid = false;

    StatusCode::NO_CONTENT
}

async fn me() -> Json<Value> {
    Json(user_body())
}

fn user_body() -> Value {
    json!({"id": 1, "email": EMAIL, "name": "Nida", "role": "customer"})
}

async fn products_index(State(state): State<Arc<StubState>>) -> Json<Value> {
    Json(state.lock().listing.clone())
}

async fn products_show(State(state): State<Arc<StubState>>, Path(id): Path<i64>) -> Response {
    if let Some(body) = state.lock().products.get(&id) {
        return Json(body.clone()).into_response();
    }

    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "product not found"})),
    )
        .into_response()
}

async fn products_related(State(state): State<Arc<StubState>>, Path(id): Path<i64>) -> Json<Value> {
    Json(
        state
            .lock()
            .related
            .get(&id)
            .cloned()
            .unwrap_or_else(|| json!([])),
    )
}

async fn categories_index(State(state): State<Arc<StubState>>) -> Json<Value> {
    Json(state.lock().categories.clone())
}

fn cart_body(inner: &StubInner) -> Value {
    let items: Vec<Value> = inner
        .cart
        .iter()
        .map(|line| {
            let variant = inner.variants.get(&line.variant_id);

            json!({
                "id": line.id,
                "variant_id": line.variant_id,
                "qty": line.qty,
                "name": variant.map(|found| found.name.clone()),
                "price_now": variant.map(|found| money(found.price)),
                "stock_qty": variant.map(|found| found.stock),
            })
        })
        .collect();

    let total_qty: i64 = inner.cart.iter().map(|line| line.qty).sum();
    let subtotal: Decimal = inner
        .cart
        .iter()
        .map(|line| {
            inner
                .variants
                .get(&line.variant_id)
                .map_or(Decimal::ZERO, |found| {
                    found.price * Decimal::from(line.qty)
                })
        })
        .sum();

    json!({
        "items": items,
        "summary": {"total_qty": total_qty, "subtotal": money(subtotal)},
    })
}

async fn cart_me(State(state): State<Arc<StubState>>) -> Json<Value> {
    Json(cart_body(&state.lock()))
}

async fn cart_add(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let variant_id = body.get("variant_id").and_then(Value::as_i64).unwrap_or_default();
    let qty = body.get("qty").and_then(Value::as_i64).unwrap_or_default();

    let mut inner = state.lock();

    if !inner.variants.contains_key(&variant_id) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "unknown variant"})),
        )
            .into_response();
    }

    if let Some(line) = inner.cart.iter_mut().find(|line| line.variant_id == variant_id) {
        line.qty += qty;
    } else {
        let id = inner.next_line;
        inner.next_line += 1;
        inner.cart.push(StubLine {
            id,
            variant_id,
            qty,
        });
    }

    Json(cart_body(&inner)).into_response()
}

async fn cart_set_qty(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let qty = body.get("qty").and_then(Value::as_i64).unwrap_or_default();

    let mut inner = state.lock();

    let Some(line) = inner.cart.iter_mut().find(|line| line.id == id) else {
        return line_not_found();
    };

    line.qty = qty;

    Json(cart_body(&inner)).into_response()
}

async fn cart_remove(State(state): State<Arc<StubState>>, Path(id): Path<i64>) -> Response {
    let mut inner = state.lock();

    if !inner.cart.iter().any(|line| line.id == id) {
        return line_not_found();
    }

    inner.cart.retain(|line| line.id != id);

    Json(cart_body(&inner)).into_response()
}

fn line_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "cart line not found"})),
    )
        .into_response()
}

async fn cart_clear(State(state): State<Arc<StubState>>) -> Response {
    let mut inner = state.lock();

    if !inner.clear_enabled {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "no such endpoint"})),
        )
            .into_response();
    }

    inner.cart.clear();

    Json(cart_body(&inner)).into_response()
}

async fn orders_checkout(State(state): State<Arc<StubState>>) -> Response {
    let mut inner = state.lock();

    if inner.cart.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "cart is empty"})),
        )
            .into_response();
    }

    let mut lines = Vec::new();

    for line in &inner.cart {
        let variant = inner.variants.get(&line.variant_id);

        lines.push(StubOrderLine {
            id: 0,
            product_id: line.variant_id,
            name: variant.map_or_else(
                || format!("Shade {}", line.variant_id),
                |found| found.name.clone(),
            ),
            unit_price: variant.map_or(Decimal::ZERO, |found| found.price),
            qty: line.qty,
        });
    }

    for line in &mut lines {
        line.id = inner.next_order_line;
        inner.next_order_line += 1;
    }

    let id = inner.next_order;
    inner.next_order += 1;

    inner.orders.push(StubOrder {
        id,
        status: "PENDING".to_string(),
        created_at: Timestamp::now().to_string(),
        lines,
    });
    inner.cart.clear();

    Json(json!({"orderId": id})).into_response()
}

fn order_body(order: &StubOrder, with_items: bool) -> Value {
    let subtotal = order.subtotal();

    let mut body = json!({
        "id": order.id,
        "status": order.status,
        "created_at": order.created_at,
        "subtotal": money(subtotal),
        "shipping_fee": money(Decimal::ZERO),
        "discount_total": money(Decimal::ZERO),
        "grand_total": money(subtotal),
    });

    if with_items {
        let items: Vec<Value> = order
            .lines
            .iter()
            .map(|line| {
                json!({
                    "id": line.id,
                    "product_id": line.product_id,
                    "name": line.name,
                    "unit_price": money(line.unit_price),
                    "qty": line.qty,
                    "line_total": money(line.unit_price * Decimal::from(line.qty)),
                })
            })
            .collect();

        if let Some(map) = body.as_object_mut() {
            map.insert("items".to_string(), Value::Array(items));
        }
    }

    body
}

async fn orders_index(State(state): State<Arc<StubState>>) -> Json<Value> {
    let inner = state.lock();
    let orders: Vec<Value> = inner
        .orders
        .iter()
        .map(|order| order_body(order, false))
        .collect();

    Json(Value::Array(orders))
}

async fn orders_show(State(state): State<Arc<StubState>>, Path(id): Path<i64>) -> Response {
    let inner = state.lock();

    let Some(order) = inner.orders.iter().find(|order| order.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "order not found"})),
        )
            .into_response();
    };

    Json(order_body(order, true)).into_response()
}

fn pending_order(inner: &StubInner) -> Option<&StubOrder> {
    inner
        .orders
        .iter()
        .rev()
        .find(|order| order.status == "PENDING")
}

fn nothing_due() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "no payment due"})),
    )
        .into_response()
}

async fn payment_me(State(state): State<Arc<StubState>>) -> Response {
    let inner = state.lock();

    let Some(order) = pending_order(&inner) else {
        return nothing_due();
    };

    let items: Vec<Value> = order
        .lines
        .iter()
        .map(|line| {
            json!({
                "id": line.id,
                "name": line.name,
                "unitPrice": money(line.unit_price),
                "qty": line.qty,
                "lineTotal": money(line.unit_price * Decimal::from(line.qty)),
            })
        })
        .collect();

    let subtotal = order.subtotal();

    Json(json!({
        "orderId": order.id,
        "status": order.status,
        "items": items,
        "subtotal": money(subtotal),
        "shippingFee": money(Decimal::ZERO),
        "grandTotal": money(subtotal),
    }))
    .into_response()
}

async fn payment_qr(State(state): State<Arc<StubState>>) -> Response {
    let inner = state.lock();

    let Some(order) = pending_order(&inner) else {
        return nothing_due();
    };

    let expires = Timestamp::now() + SignedDuration::from_mins(15);

    Json(json!({
        "orderId": order.id,
        "amount": money(order.subtotal()),
        "qrRawData": format!("00020101021229370016A0000006770101120{:04}5303764", order.id),
        "transactionId": format!("txn-{}", order.id),
        "expiresAt": expires.to_string(),
    }))
    .into_response()
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    #[serde(rename = "orderId")]
    order_id: i64,
}

async fn payment_status(
    State(state): State<Arc<StubState>>,
    Query(query): Query<StatusQuery>,
) -> Response {
    let inner = state.lock();

    let Some(order) = inner.orders.iter().find(|order| order.id == query.order_id) else {
        return nothing_due();
    };

    Json(json!({"status": order.status})).into_response()
}

async fn payment_simulate(State(state): State<Arc<StubState>>, Json(body): Json<Value>) -> Response {
    let id = body.get("orderId").and_then(Value::as_i64).unwrap_or_default();

    let mut inner = state.lock();

    let Some(order) = inner.orders.iter_mut().find(|order| order.id == id) else {
        return nothing_due();
    };

    order.status = "PAID".to_string();
    drop(inner);

    // Nobody listening is fine; the poll channel still sees the state.
    drop(state.events.send((id, "PAID".to_string())));

    StatusCode::NO_CONTENT.into_response()
}

async fn payment_events(
    State(state): State<Arc<StubState>>,
    Path(id): Path<i64>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.events.subscribe();

    // A watcher arriving after the terminal transition would otherwise
    // wait for a broadcast that already happened.
    let settled = {
        let inner = state.lock();
        inner
            .orders
            .iter()
            .find(|order| order.id == id)
            .filter(|order| order.status != "PENDING")
            .map(|order| order.status.clone())
    };

    let initial = stream::iter(settled.map(|status| Ok::<_, Infallible>(status_event(&status))));

    let live = stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok((order, status)) if order == id => {
                    return Some((Ok::<_, Infallible>(status_event(&status)), receiver));
                }
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(initial.chain(live))
}

fn status_event(status: &str) -> Event {
    Event::default().data(json!({"status": status}).to_string())
}

fn money(amount: Decimal) -> String {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);

    rounded.to_string()
}
