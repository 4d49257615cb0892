use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use axum::{
    Json, Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Request, Response, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use web::{ApiClient, AppState};

const TOKEN: &str = "tok-123";

#[derive(Clone, Default)]
struct Backend {
    posted: Arc<Mutex<Vec<(&'static str, Value)>>>,
    malformed: Arc<AtomicBool>,
    revoked: Arc<AtomicBool>,
}

impl Backend {
    fn authorized(&self, headers: &HeaderMap) -> bool {
        !self.revoked.load(Ordering::SeqCst)
            && headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                == Some(TOKEN)
    }

    fn record(&self, path: &'static str, body: Value) {
        self.posted.lock().unwrap().push((path, body));
    }

    fn posted(&self) -> Vec<(&'static str, Value)> {
        self.posted.lock().unwrap().clone()
    }
}

fn wallets() -> Value {
    json!([
        {"id": 1, "walletName": "Cash", "walletType": "CASH", "balance": 150000},
        {"id": 2, "walletName": "Bank", "walletType": "BANK", "balance": 1000000}
    ])
}

fn transactions() -> Value {
    json!([
        {"id": 1, "amount": 50000, "transactionType": "EXPENSE",
         "transactionDate": "2024-01-05T10:00:00", "description": "Lunch",
         "category": {"id": 1, "name": "Food"},
         "wallet": {"id": 1, "walletName": "Cash"}},
        {"id": 2, "amount": 20000, "transactionType": "INCOME",
         "transactionDate": "2024-01-05T09:00:00", "description": "Salary bonus",
         "category": null,
         "wallet": {"id": 2, "walletName": "Bank"}},
        {"id": 3, "amount": 100000, "transactionType": "TRANSFER",
         "transactionDate": "2024-01-06T12:00:00",
         "wallet": {"id": 2, "walletName": "Bank"},
         "targetWallet": {"id": 1, "walletName": "Cash"}}
    ])
}

fn categories() -> Value {
    json!([
        {"id": 1, "name": "Food", "type": "EXPENSE", "parent": null},
        {"id": 3, "name": "Salary", "type": "INCOME", "parent": null},
        {"id": 2, "name": "Snacks", "type": "EXPENSE", "parent": {"id": 1}}
    ])
}

async fn login_endpoint(Json(body): Json<Value>) -> impl IntoResponse {
    if body["username"] == "budi" && body["password"] == "secret" {
        Json(json!({"accessToken": TOKEN})).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, "bad credentials").into_response()
    }
}

async fn wallets_endpoint(State(backend): State<Backend>, headers: HeaderMap) -> impl IntoResponse {
    if !backend.authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    Json(wallets()).into_response()
}

async fn transactions_endpoint(
    State(backend): State<Backend>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !backend.authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if backend.malformed.load(Ordering::SeqCst) {
        return Json(json!([{"id": 1, "amount": "lots"}])).into_response();
    }
    Json(transactions()).into_response()
}

async fn categories_endpoint(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !backend.authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    let all = categories();
    let filtered: Vec<Value> = all
        .as_array()
        .into_iter()
        .flatten()
        .filter(|c| query.get("type").is_none_or(|t| c["type"] == t.as_str()))
        .cloned()
        .collect();
    Json(filtered).into_response()
}

fn accept(backend: &Backend, headers: &HeaderMap, path: &'static str, body: Value) -> Response<Body> {
    if !backend.authorized(headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if body.get("walletName") == Some(&json!("Duplicate")) {
        return (StatusCode::BAD_REQUEST, "wallet name already used").into_response();
    }
    backend.record(path, body);
    StatusCode::OK.into_response()
}

async fn create_wallet(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response<Body> {
    accept(&backend, &headers, "wallets", body)
}

async fn create_transaction(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response<Body> {
    accept(&backend, &headers, "transactions", body)
}

async fn create_category(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response<Body> {
    accept(&backend, &headers, "categories", body)
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login_endpoint))
        .route("/api/wallets", get(wallets_endpoint).post(create_wallet))
        .route(
            "/api/transactions",
            get(transactions_endpoint).post(create_transaction),
        )
        .route(
            "/api/categories",
            get(categories_endpoint).post(create_category),
        )
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api")
}

async fn front_end() -> (Router, Backend) {
    let backend = Backend::default();
    let base_url = spawn_backend(backend.clone()).await;
    let state = AppState::new(ApiClient::new(reqwest::Client::new(), base_url), Key::generate());
    (web::router(state), backend)
}

/// Collects the `Set-Cookie` headers of a response into a `Cookie` header,
/// on top of the cookies already held.
fn cookies(previous: &str, res: &Response<Body>) -> String {
    let mut jar: Vec<(String, String)> = previous
        .split("; ")
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    for value in res.headers().get_all(header::SET_COOKIE) {
        let value = value.to_str().unwrap();
        let pair = value.split(';').next().unwrap();
        let (name, val) = pair.split_once('=').unwrap();
        jar.retain(|(k, _)| k != name);
        if !val.is_empty() {
            jar.push((name.to_string(), val.to_string()));
        }
    }

    jar.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

fn location(res: &Response<Body>) -> &str {
    res.headers()[header::LOCATION].to_str().unwrap()
}

async fn body_text(res: Response<Body>) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn get_page(app: &Router, uri: &str, cookie: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::get(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn post_form(app: &Router, uri: &str, cookie: &str, form: &str) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::post(uri)
                .header(header::COOKIE, cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn login(app: &Router) -> String {
    let res = post_form(app, "/login", "", "username=budi&password=secret").await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");
    cookies("", &res)
}

#[tokio::test]
async fn pages_require_a_session() {
    let (app, _) = front_end().await;

    for uri in ["/", "/calendar", "/statistics", "/transactions/new", "/transactions/export"] {
        let res = get_page(&app, uri, "").await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&res), "/login");
    }
}

#[tokio::test]
async fn wrong_password_shows_the_login_form_again() {
    let (app, _) = front_end().await;

    let res = post_form(&app, "/login", "", "username=budi&password=nope").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(res).await.contains("Login failed"));
}

#[tokio::test]
async fn dashboard_shows_wallets_transactions_and_expense_chart() {
    let (app, _) = front_end().await;
    let cookie = login(&app).await;

    let res = get_page(&app, "/", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);
    let page = body_text(res).await;
    assert!(page.contains("budi"));
    assert!(page.contains("1.150.000"));
    assert!(page.contains("Lunch"));
    assert!(page.contains("Salary bonus"));
    assert!(page.contains(r#"labels: ["Food"]"#));
    assert!(page.contains("[50000]"));
}

#[tokio::test]
async fn dashboard_search_filters_rows() {
    let (app, _) = front_end().await;
    let cookie = login(&app).await;

    let page = body_text(get_page(&app, "/?q=salary", &cookie).await).await;
    assert!(page.contains("Salary bonus"));
    assert!(!page.contains("Lunch"));
}

#[tokio::test]
async fn calendar_events_summarize_days() {
    let (app, _) = front_end().await;
    let cookie = login(&app).await;

    let res = get_page(&app, "/calendar/events", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);
    let events: Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(
        events,
        json!([
            {"title": "+ 20.000", "start": "2024-01-05", "color": "#198754", "textColor": "white"},
            {"title": "- 50.000", "start": "2024-01-05", "color": "#dc3545", "textColor": "white"}
        ])
    );

    let page = body_text(get_page(&app, "/calendar", &cookie).await).await;
    assert!(page.contains("+ 20.000"));
}

#[tokio::test]
async fn statistics_excludes_transfers() {
    let (app, _) = front_end().await;
    let cookie = login(&app).await;

    let page = body_text(get_page(&app, "/statistics", &cookie).await).await;
    assert!(page.contains("data: [20000,50000]"));
    assert!(page.contains(r#"["Cash","Bank"]"#));
    assert!(page.contains("Uncategorized"));
    assert!(page.contains("net <strong>-30.000</strong>"));
}

#[tokio::test]
async fn export_downloads_filtered_csv() {
    let (app, _) = front_end().await;
    let cookie = login(&app).await;

    let res = get_page(&app, "/transactions/export?q=lunch", &cookie).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let csv = body_text(res).await;
    assert_eq!(
        csv,
        "date,type,category,description,wallet,target_wallet,amount\n\
         2024-01-05T10:00:00,EXPENSE,Food,Lunch,Cash,,50000\n"
    );
}

#[tokio::test]
async fn transaction_form_lists_flattened_categories() {
    let (app, _) = front_end().await;
    let cookie = login(&app).await;

    let page = body_text(get_page(&app, "/transactions/new?mode=EXPENSE", &cookie).await).await;
    let food = page.find(">Food<").unwrap();
    let snacks = page.find(r#"<option value="2" class="ps-4">↳ Snacks</option>"#).unwrap();
    assert!(food < snacks);
    assert!(!page.contains("Salary"));
}

#[tokio::test]
async fn creating_a_transaction_posts_to_the_api_and_flashes() {
    let (app, backend) = front_end().await;
    let cookie = login(&app).await;

    let res = post_form(
        &app,
        "/transactions/new",
        &cookie,
        "type=EXPENSE&wallet_id=1&category_id=2&amount=1.500.000&description=Rent&transaction_date=2024-01-05T10%3A00",
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let posted = backend.posted();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].0, "transactions");
    assert_eq!(
        posted[0].1,
        json!({
            "walletId": 1,
            "categoryId": 2,
            "amount": 1500000,
            "description": "Rent",
            "type": "EXPENSE",
            "transactionDate": "2024-01-05T10:00:00"
        })
    );

    let cookie = cookies(&cookie, &res);
    let page = body_text(get_page(&app, "/", &cookie).await).await;
    assert!(page.contains("Transaction saved."));
}

#[tokio::test]
async fn invalid_transfer_goes_back_to_the_form() {
    let (app, backend) = front_end().await;
    let cookie = login(&app).await;

    let res = post_form(
        &app,
        "/transactions/new",
        &cookie,
        "type=TRANSFER&wallet_id=1&amount=10.000&transaction_date=2024-01-05T10%3A00",
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/transactions/new?mode=TRANSFER");
    assert!(backend.posted().is_empty());

    let cookie = cookies(&cookie, &res);
    let page = body_text(get_page(&app, "/transactions/new?mode=TRANSFER", &cookie).await).await;
    assert!(page.contains("A transfer needs a target wallet."));
}

#[tokio::test]
async fn api_rejection_is_flashed_on_the_form() {
    let (app, backend) = front_end().await;
    let cookie = login(&app).await;

    let res = post_form(
        &app,
        "/wallets/new",
        &cookie,
        "wallet_name=Duplicate&wallet_type=CASH&balance=0",
    )
    .await;
    assert_eq!(location(&res), "/wallets/new");
    assert!(backend.posted().is_empty());

    let cookie = cookies(&cookie, &res);
    let page = body_text(get_page(&app, "/wallets/new", &cookie).await).await;
    assert!(page.contains("Could not save: wallet name already used"));
}

#[tokio::test]
async fn creating_a_category_returns_to_the_transaction_form() {
    let (app, backend) = front_end().await;
    let cookie = login(&app).await;

    let res = post_form(
        &app,
        "/categories/new",
        &cookie,
        "name=Bonus&type=INCOME&parent_id=3",
    )
    .await;
    assert_eq!(location(&res), "/transactions/new?mode=INCOME");
    assert_eq!(
        backend.posted(),
        vec![("categories", json!({"name": "Bonus", "type": "INCOME", "parentId": 3}))]
    );
}

#[tokio::test]
async fn malformed_api_data_is_an_error_not_an_empty_page() {
    let (app, backend) = front_end().await;
    let cookie = login(&app).await;
    backend.malformed.store(true, Ordering::SeqCst);

    let res = get_page(&app, "/", &cookie).await;
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(body_text(res).await.contains("malformed data"));
}

#[tokio::test]
async fn revoked_token_ends_the_session() {
    let (app, backend) = front_end().await;
    let cookie = login(&app).await;
    backend.revoked.store(true, Ordering::SeqCst);

    let res = get_page(&app, "/statistics", &cookie).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/logout");

    let res = get_page(&app, "/logout", &cookie).await;
    assert_eq!(location(&res), "/login");
    let cookie = cookies(&cookie, &res);
    assert!(!cookie.contains("dompet_session"));
}

#[tokio::test]
async fn serves_over_tcp() {
    let backend = Backend::default();
    let base_url = spawn_backend(backend).await;
    let state = AppState::new(ApiClient::new(reqwest::Client::new(), base_url), Key::generate());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = web::spawn_with_listener(state, listener).unwrap();

    let res = reqwest::get(format!("http://{addr}/login")).await.unwrap();
    assert_eq!(res.status(), reqwest::StatusCode::OK);
    assert!(res.text().await.unwrap().contains("Username"));
}
