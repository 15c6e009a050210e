//! Dashboard commands against an in-process backend and an in-memory
//! snapshot database.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use medidash_api::{DashboardConfig, NotificationLevel, PageQuery};
use medidash_core::cart::CartItemInput;
use medidash_core::navigation::RouteDecision;
use medidash_core::register::{RegisterPhase, RegisterSession};
use medidash_core::{Account, Branch, Money, PaymentMethod};
use medidash_dashboard::commands::accounts::{self, WithdrawalInput};
use medidash_dashboard::commands::checkout::{self, CheckoutOutcome, CheckoutRequest};
use medidash_dashboard::commands::users::{self, NewUserInput};
use medidash_dashboard::commands::{cart, navigation, records, register};
use medidash_dashboard::error::ErrorCode;
use medidash_dashboard::Dashboard;
use medidash_db::{Database, DbConfig};

// =============================================================================
// Harness
// =============================================================================

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/")
}

async fn dashboard(app: Router) -> Dashboard {
    let mut config = DashboardConfig::default();
    config.api.base_url = serve(app).await;
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    Dashboard::with_database(config, db).await.unwrap()
}

fn select_main(dash: &Dashboard) {
    dash.branch.set_branches(vec![Branch {
        id: "store-main".into(),
        name: "Main Pharmacy".into(),
        address: None,
        is_main: true,
    }]);
    dash.branch.select("store-main").unwrap();
}

fn counted(hits: &Arc<AtomicUsize>, status: StatusCode, body: Value) -> axum::routing::MethodRouter {
    let hits = hits.clone();
    post(move || {
        let hits = hits.clone();
        let body = body.clone();
        async move {
            hits.fetch_add(1, Ordering::SeqCst);
            (status, Json(body))
        }
    })
}

fn open_session_json() -> Value {
    json!({
        "success": true,
        "data": {
            "id": "reg-1",
            "storeId": "store-main",
            "openingBalance": 100.00,
            "status": "open",
            "openedAt": "2024-03-05T08:00:00Z"
        }
    })
}

fn item(id: &str, name: &str, cents: i64) -> CartItemInput {
    CartItemInput::new(id, name, Money::from_cents(cents))
}

// =============================================================================
// Register workflow
// =============================================================================

#[tokio::test]
async fn test_register_open_sale_close_scenario() {
    let close_body: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
    let captured = close_body.clone();
    let sales = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/api/register/open", post(|| async { Json(open_session_json()) }))
        .route(
            "/api/sales",
            counted(&sales, StatusCode::OK, json!({ "success": true, "data": { "id": "sale-1" } })),
        )
        .route(
            "/api/register/{id}/close",
            post(move |Json(body): Json<Value>| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body);
                    Json(json!({ "success": true }))
                }
            }),
        );
    let dash = dashboard(app).await;
    select_main(&dash);
    assert!(register::register_status(&dash).must_open_register);

    let session = register::open_register(&dash, Money::from_cents(10_000)).await.unwrap();
    assert_eq!(session.id, "reg-1");
    let status = register::register_status(&dash);
    assert_eq!(status.phase, RegisterPhase::Open);
    assert!(!status.must_open_register);
    assert!(status.open_dialog_shown);

    cart::add_to_cart(&dash, item("INV-003", "Paracetamol", 4_550)).await.unwrap();
    let outcome = checkout::checkout(&dash, CheckoutRequest::default()).await.unwrap();
    assert!(matches!(outcome, CheckoutOutcome::Completed { .. }));
    assert_eq!(sales.load(Ordering::SeqCst), 1);

    let summary = register::close_register(&dash, Money::from_cents(14_000)).await.unwrap();
    assert_eq!(summary.expected_balance, Money::from_cents(14_550));
    assert_eq!(summary.variance, Money::from_cents(-550));

    let sent = close_body.lock().unwrap().clone().unwrap();
    assert_eq!(sent["expectedBalance"], 145.5);
    assert_eq!(sent["variance"], -5.5);

    assert_eq!(register::register_status(&dash).phase, RegisterPhase::Closed);

    // A closed session takes no further mutation.
    let err = register::record_expense(&dash, Money::from_cents(500)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    let err = register::close_register(&dash, Money::from_cents(14_000)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);

    cart::add_to_cart(&dash, item("INV-003", "Paracetamol", 4_550)).await.unwrap();
    let err = checkout::checkout(&dash, CheckoutRequest::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    assert_eq!(sales.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_open_register_failure_leaves_state_and_toasts() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/api/register/open",
        counted(
            &hits,
            StatusCode::CONFLICT,
            json!({ "success": false, "message": "Register already open on another device" }),
        ),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    let mut toasts = dash.notifier().subscribe();

    let err = register::open_register(&dash, Money::from_cents(10_000)).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ServerError);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(register::register_status(&dash).phase, RegisterPhase::NoSession);
    let toast = toasts.recv().await.unwrap();
    assert_eq!(toast.level, NotificationLevel::Error);
    assert!(toast.message.contains("Register already open on another device"));
}

#[tokio::test]
async fn test_open_register_rejects_negative_float_before_network() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/api/register/open",
        counted(&hits, StatusCode::OK, open_session_json()),
    );
    let dash = dashboard(app).await;

    let err = register::open_register(&dash, Money::from_cents(10_000)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::NoActiveBranch);

    select_main(&dash);
    let err = register::open_register(&dash, Money::from_cents(-1)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_stale_poll_cannot_reopen_closed_session() {
    let app = Router::new().route(
        "/api/register/{id}/close",
        post(|| async { Json(json!({ "success": true })) }),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    open_register_locally(&dash);
    let stale = dash.pos.with_pos(|pos| pos.active_session.clone()).unwrap();

    register::close_register(&dash, Money::from_cents(10_000)).await.unwrap();
    register::apply_active_session(&dash.pos, "store-main", Some(stale));

    assert_eq!(register::register_status(&dash).phase, RegisterPhase::Closed);
    let err = register::record_expense(&dash, Money::from_cents(500)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);

    // a different session from the server still replaces the closed one
    let next = RegisterSession::open("reg-2", "store-main", Money::zero()).unwrap();
    register::apply_active_session(&dash.pos, "store-main", Some(next));
    let current = dash.pos.with_pos(|pos| pos.active_session.as_ref().map(|s| s.id.clone()));
    assert_eq!(current.as_deref(), Some("reg-2"));
}

#[tokio::test]
async fn test_register_frozen_while_close_in_flight() {
    let arrived = Arc::new(Notify::new());
    let release = Arc::new(Notify::new());
    let (on_arrival, on_release) = (arrived.clone(), release.clone());
    let app = Router::new().route(
        "/api/register/{id}/close",
        post(move |Json(body): Json<Value>| {
            let (on_arrival, on_release) = (on_arrival.clone(), on_release.clone());
            async move {
                on_arrival.notify_one();
                on_release.notified().await;
                Json(json!({ "success": true, "data": body }))
            }
        }),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    open_register_locally(&dash);

    let closer = dash.clone();
    let close = tokio::spawn(async move {
        register::close_register(&closer, Money::from_cents(10_000)).await
    });
    arrived.notified().await;

    let err = register::record_expense(&dash, Money::from_cents(500)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
    cart::add_to_cart(&dash, item("INV-003", "Paracetamol", 450)).await.unwrap();
    let err = checkout::checkout(&dash, CheckoutRequest::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);

    let stale = RegisterSession::open("reg-1", "store-main", Money::from_cents(10_000)).unwrap();
    register::apply_active_session(&dash.pos, "store-main", Some(stale));
    register::apply_active_session(&dash.pos, "store-main", None);

    release.notify_one();
    let summary = close.await.unwrap().unwrap();

    assert_eq!(summary.expected_balance, Money::from_cents(10_000));
    assert_eq!(summary.variance, Money::zero());
    let session = dash.pos.with_pos(|pos| pos.active_session.clone()).unwrap();
    assert_eq!(session.expected_balance(), summary.expected_balance);
    assert_eq!(session.actual_balance, Some(Money::from_cents(10_000)));
    assert_eq!(register::register_status(&dash).phase, RegisterPhase::Closed);
}

#[tokio::test]
async fn test_failed_close_unfreezes_register() {
    let app = Router::new().route(
        "/api/register/{id}/close",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Ledger unavailable" })),
            )
        }),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    open_register_locally(&dash);

    let err = register::close_register(&dash, Money::from_cents(10_000)).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ServerError);

    assert_eq!(register::register_status(&dash).phase, RegisterPhase::Open);
    let session = register::record_expense(&dash, Money::from_cents(500)).await.unwrap();
    assert_eq!(session.expected_balance(), Money::from_cents(9_500));
}

// =============================================================================
// Checkout
// =============================================================================

fn open_register_locally(dash: &Dashboard) {
    dash.pos.with_pos_mut(|pos| {
        pos.active_session =
            Some(RegisterSession::open("reg-1", "store-main", Money::from_cents(10_000)).unwrap());
    });
}

#[tokio::test]
async fn test_checkout_asks_for_interaction_confirmation() {
    let sales = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/api/sales",
        counted(&sales, StatusCode::OK, json!({ "success": true, "data": { "id": "sale-9" } })),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    open_register_locally(&dash);

    cart::add_to_cart(&dash, item("INV-002", "Warfarin 5mg", 890)).await.unwrap();
    let view = cart::add_to_cart(&dash, item("d-2", "Aspirin 100mg", 300)).await.unwrap();
    assert_eq!(view.interactions.len(), 1);

    let outcome = checkout::checkout(&dash, CheckoutRequest::default()).await.unwrap();
    match outcome {
        CheckoutOutcome::NeedsConfirmation { interactions } => assert_eq!(interactions.len(), 1),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(cart::get_cart(&dash).lines.len(), 2);
    assert!(checkout::recent_transactions(&dash, 10).is_empty());
    assert_eq!(sales.load(Ordering::SeqCst), 0);

    let outcome = checkout::checkout(
        &dash,
        CheckoutRequest {
            payment_method: PaymentMethod::Card,
            interactions_acknowledged: true,
            ..CheckoutRequest::default()
        },
    )
    .await
    .unwrap();
    match outcome {
        CheckoutOutcome::Completed { transaction, receipt } => {
            assert_eq!(transaction.total, Money::from_cents(1_190));
            assert_eq!(receipt.id, "sale-9");
        }
        other => panic!("unexpected: {other:?}"),
    }
    assert!(cart::get_cart(&dash).lines.is_empty());
}

#[tokio::test]
async fn test_checkout_server_failure_keeps_local_sale() {
    let app = Router::new().route(
        "/api/sales",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "message": "Ledger unavailable" })),
            )
        }),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    open_register_locally(&dash);
    let mut toasts = dash.notifier().subscribe();

    cart::add_to_cart(&dash, item("INV-003", "Paracetamol", 450)).await.unwrap();
    let err = checkout::checkout(&dash, CheckoutRequest::default()).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::ServerError);
    assert!(cart::get_cart(&dash).lines.is_empty());
    assert_eq!(checkout::recent_transactions(&dash, 10).len(), 1);
    let sales = dash
        .pos
        .with_pos(|pos| pos.active_session.as_ref().map(|s| s.sales_amount));
    assert_eq!(sales, Some(Money::from_cents(450)));
    assert!(toasts.recv().await.unwrap().message.contains("Ledger unavailable"));
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let dash = dashboard(Router::new()).await;
    select_main(&dash);
    open_register_locally(&dash);

    let err = checkout::checkout(&dash, CheckoutRequest::default()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::BusinessLogic);
}

// =============================================================================
// Accounts & users
// =============================================================================

#[tokio::test]
async fn test_withdrawal_over_balance_never_hits_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/api/accounts/{id}/withdrawals",
        counted(
            &hits,
            StatusCode::OK,
            json!({ "success": true, "data": { "id": "acc-1", "name": "Main drawer", "currentBalance": 0 } }),
        ),
    );
    let dash = dashboard(app).await;
    let account = Account {
        id: "acc-1".into(),
        name: "Main drawer".into(),
        current_balance: Money::from_cents(20_000),
    };

    let err = accounts::withdraw(
        &dash,
        &account,
        WithdrawalInput {
            amount: Money::from_cents(25_000),
            reason: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientBalance);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    let updated = accounts::withdraw(
        &dash,
        &account,
        WithdrawalInput {
            amount: Money::from_cents(20_000),
            reason: Some("  bank deposit ".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.current_balance, Money::zero());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_password_mismatch_never_hits_server() {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new().route(
        "/api/users",
        counted(
            &hits,
            StatusCode::OK,
            json!({ "success": true, "data": { "id": "u-2", "name": "Sami", "email": "sami@clinic.example" } }),
        ),
    );
    let dash = dashboard(app).await;

    let err = users::create_user(
        &dash,
        NewUserInput {
            name: "Sami".into(),
            email: "sami@clinic.example".into(),
            password: "hunter22".into(),
            password_confirmation: "hunter23".into(),
            role_id: None,
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::ValidationError);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_403_toasts_once() {
    let app = Router::new().route(
        "/api/users",
        get(|| async {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "success": false, "message": "Admins only" })),
            )
        }),
    );
    let dash = dashboard(app).await;
    let mut toasts = dash.notifier().subscribe();

    let err = users::list_users(&dash, PageQuery::default()).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::Forbidden);
    assert_eq!(toasts.recv().await.unwrap().message, "Admins only");
    assert!(toasts.try_recv().is_err());
}

// =============================================================================
// Session & navigation
// =============================================================================

#[tokio::test]
async fn test_401_clears_credentials_and_guard_redirects() {
    let app = Router::new().route(
        "/api/accounts",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "jwt expired" })),
            )
        }),
    );
    let dash = dashboard(app).await;
    select_main(&dash);
    dash.credentials().set_tokens("acc", "ref");
    assert_eq!(navigation::guard_navigation(&dash, "/en/dashboard"), RouteDecision::Proceed);

    let err = accounts::list_accounts(&dash).await.unwrap_err();

    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert!(!dash.credentials().has_access_token());
    assert_eq!(
        navigation::guard_navigation(&dash, "/en/dashboard"),
        RouteDecision::Redirect("/en/login".into())
    );
}

#[tokio::test]
async fn test_locale_preference_drives_redirects() {
    let dash = dashboard(Router::new()).await;

    navigation::set_locale(&dash, "ar").await.unwrap();
    assert_eq!(
        navigation::guard_navigation(&dash, "/en/pharmacy/inventory"),
        RouteDecision::Redirect("/ar/login".into())
    );

    let err = navigation::set_locale(&dash, "fr").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationError);
}

// =============================================================================
// Records
// =============================================================================

#[tokio::test]
async fn test_transfer_over_stock_rejected() {
    let dash = dashboard(Router::new()).await;
    select_main(&dash);

    let err = records::transfer_stock(&dash, "INV-002", "WRF-1187", "store-north", 36)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    records::transfer_stock(&dash, "INV-002", "WRF-1187", "store-north", 35)
        .await
        .unwrap();
    let left = dash.records.inventory.with(|store| {
        store.get("INV-002").map(|item| item.total_quantity(Some("store-main")))
    });
    assert_eq!(left, Some(0));
}

#[tokio::test]
async fn test_record_changes_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = DashboardConfig::default();
    config.storage.database_path = Some(dir.path().join("medidash.db"));

    {
        let dash = Dashboard::open(config.clone()).await.unwrap();
        records::delete_record::<medidash_core::records::Claim>(&dash, "CLM-1001")
            .await
            .unwrap();
        cart::add_to_cart(&dash, item("INV-001", "Amoxicillin", 1_250)).await.unwrap();
        dash.db.inner().close().await;
    }

    let dash = Dashboard::open(config).await.unwrap();
    assert!(dash.records.claims.with(|store| store.get("CLM-1001").is_none()));
    assert_eq!(cart::get_cart(&dash).lines.len(), 1);
}
