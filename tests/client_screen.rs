#![cfg(feature = "cli")]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde_json::{json, Value};
use stock_screener::client::{ClientConfig, ClientError, ScreenerClient};
use stock_screener::{FilterCriterion, FilterDictionary, Operator, SortField, SortState};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

type Captured = Arc<Mutex<Vec<Value>>>;

async fn screen_handler(State(captured): State<Captured>, Json(body): Json<Value>) -> Json<Value> {
    captured.lock().expect("capture lock").push(body);
    Json(json!({
        "stocks": [
            { "symbol": "aaa", "price": "12.5", "marketCap": 3e9 },
            { "symbol": "bbb", "price": null, "marketCap": 1e9 },
            { "symbol": "ccc", "price": 3, "extra": true }
        ]
    }))
}

async fn start_stub() -> (SocketAddr, Captured, JoinHandle<()>) {
    let captured = Captured::default();
    let app = Router::new()
        .route("/api/screener", post(screen_handler))
        .route(
            "/broken/screener",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .with_state(Arc::clone(&captured));

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    (addr, captured, handle)
}

fn client_for(addr: SocketAddr, prefix: &str) -> ScreenerClient {
    ScreenerClient::new(ClientConfig {
        base_url: format!("http://{addr}/{prefix}"),
        ..ClientConfig::default()
    })
    .expect("client")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn posts_dictionary_and_decodes_stocks() {
    let (addr, captured, handle) = start_stub().await;

    let mut filters = FilterDictionary::new();
    filters.add(FilterCriterion::numeric("eps", Operator::Gte, 5.0));
    filters.reconcile_categories("sector", ["Technology", "Energy"]);

    let stocks = client_for(addr, "api")
        .screen(&filters)
        .await
        .expect("screen request");

    let symbols: Vec<&str> = stocks.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "BBB", "CCC"]);
    assert_eq!(stocks[0].price, Some(12.5));

    let sorted = SortState::new(SortField::Price, stock_screener::SortDirection::Descending)
        .apply(&stocks);
    let symbols: Vec<&str> = sorted.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["AAA", "CCC", "BBB"]);

    let bodies = captured.lock().expect("capture lock").clone();
    assert_eq!(bodies.len(), 1);
    let body = bodies[0].as_object().expect("object body");
    let keys: Vec<&str> = body.keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(body["eps__gte"]["value"], 5.0);
    assert_eq!(body["sector.Technology"]["operator"], "eq");
    assert!(body.contains_key("sector.Energy"));

    handle.abort();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn non_success_status_is_reported() {
    let (addr, _, handle) = start_stub().await;

    let err = client_for(addr, "broken")
        .screen(&FilterDictionary::new())
        .await
        .expect_err("bad gateway");

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other}"),
    }

    handle.abort();
}
