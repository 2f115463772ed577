use restaurant_insights::csv_reader::load_restaurants;
use restaurant_insights::service::{AnalyticsService, DEFAULT_CACHE_TTL};
use restaurant_insights::{build_router, AppState};
use serde_json::Value;
use std::net::SocketAddr;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_server(state: AppState) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, build_router(state))
            .await
            .expect("serve");
    });
    addr
}

async fn loaded_server() -> SocketAddr {
    let table = load_restaurants(Path::new("test/restaurants.csv")).expect("load fixture");
    spawn_server(AppState::new(Some(AnalyticsService::new(table, DEFAULT_CACHE_TTL)))).await
}

async fn send_raw(addr: SocketAddr, path: &str, headers: &[(&str, &str)]) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (k, v) in headers {
        req.push_str(&format!("{k}: {v}\r\n"));
    }
    req.push_str("\r\n");
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, head.to_string(), body.to_string())
}

async fn get_json(addr: SocketAddr, path: &str) -> (u16, Value) {
    let (status, _, body) = send_raw(addr, path, &[]).await;
    let json = serde_json::from_str(&body).unwrap_or_else(|e| panic!("{} body not JSON ({}): {}", path, e, body));
    (status, json)
}

fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
    head.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

#[tokio::test]
async fn test_health_reports_loaded_data() {
    let addr = loaded_server().await;
    let (status, json) = get_json(addr, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "healthy");
    assert_eq!(json["data"]["data_loaded"], true);
    assert!(json["data"]["uptime_seconds"].is_u64());
    assert!(json["data"]["memory_usage_mb"].is_u64());
}

#[tokio::test]
async fn test_envelope_metadata_and_request_id() {
    let addr = loaded_server().await;
    let (status, head, body) = send_raw(addr, "/api/restaurant-types", &[("X-Request-ID", "req-123")]).await;
    assert_eq!(status, 200);
    assert_eq!(header(&head, "x-request-id"), Some("req-123"));
    assert!(header(&head, "x-processing-time-ms").is_some());

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["metadata"]["request_id"], "req-123");
    assert!(json["metadata"]["timestamp"].is_string());
    assert!(json["metadata"]["processing_time_ms"].is_u64());
    assert_eq!(json["data"]["total_types"], 4);

    // A fresh id is generated when the client sends none
    let (_, head, _) = send_raw(addr, "/api/health", &[]).await;
    let generated = header(&head, "x-request-id").expect("request id header");
    assert_eq!(generated.len(), 36);
}

#[tokio::test]
async fn test_top_restaurants_params() {
    let addr = loaded_server().await;
    let (status, json) = get_json(addr, "/api/top-restaurants?limit=2&sort_by=votes").await;
    assert_eq!(status, 200);
    let top = json["data"]["top_restaurants"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["name"], "Byg Brewski Brewing Company");
    assert_eq!(top[0]["rank"], 1);

    for bad in ["limit=0", "limit=11", "limit=abc", "sort_by=stars"] {
        let (status, json) = get_json(addr, &format!("/api/top-restaurants?{}", bad)).await;
        assert_eq!(status, 400, "{}", bad);
        assert_eq!(json["success"], false);
        assert!(json["error"].is_string());
        assert!(json["metadata"]["request_id"].is_string());
    }
}

#[tokio::test]
async fn test_foodie_areas_limits() {
    let addr = loaded_server().await;
    let (status, json) = get_json(addr, "/api/foodie-areas?limit=20").await;
    assert_eq!(status, 200);
    assert_eq!(json["data"]["total_areas"], 4);
    assert_eq!(json["data"]["foodie_areas"][0]["area"], "Indiranagar");

    for bad in ["0", "999"] {
        let (status, _) = get_json(addr, &format!("/api/foodie-areas?limit={}", bad)).await;
        assert_eq!(status, 400);
    }
}

#[tokio::test]
async fn test_search_validation_and_results() {
    let addr = loaded_server().await;

    let (status, json) = get_json(addr, "/api/search?q=toit&mode=name").await;
    assert_eq!(status, 200);
    assert_eq!(json["data"]["mode"], "name");
    assert_eq!(json["data"]["total_matches"], 2);

    let (status, json) = get_json(addr, "/api/search?q=cafe&mode=type").await;
    assert_eq!(status, 200);
    assert_eq!(json["data"]["results"][0]["restaurant_type"], "Cafe");
    assert_eq!(json["data"]["results"][0]["count"], 2);

    let (status, json) = get_json(addr, "/api/search?q=zzzznonexistent&mode=area").await;
    assert_eq!(status, 200);
    assert_eq!(json["data"]["total_matches"], 0);
    assert_eq!(json["data"]["results"], Value::Array(vec![]));

    let long = "a".repeat(201);
    let bad_paths = [
        "/api/search?mode=name".to_string(),
        "/api/search?q=toit".to_string(),
        "/api/search?q=toit&mode=cuisine".to_string(),
        "/api/search?q=&mode=name".to_string(),
        "/api/search?q=%20%20&mode=name".to_string(),
        format!("/api/search?q={}&mode=name", long),
    ];
    for path in &bad_paths {
        let (status, json) = get_json(addr, path).await;
        assert_eq!(status, 400, "{}", path);
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn test_charts() {
    let addr = loaded_server().await;

    let (status, json) = get_json(addr, "/api/charts/restaurant-types-pie?width=800&height=400").await;
    assert_eq!(status, 200);
    assert_eq!(json["data"]["chart_type"], "restaurant-types-pie");
    assert_eq!(json["data"]["width"], 800);
    assert!(!json["data"]["base64_image"].as_str().unwrap().is_empty());

    let (status, json) = get_json(addr, "/api/charts/unknown-chart").await;
    assert_eq!(status, 404);
    assert_eq!(json["success"], false);

    let (status, _) = get_json(addr, "/api/charts/foodie-areas-bar?width=100").await;
    assert_eq!(status, 400);
    let (status, _) = get_json(addr, "/api/charts/top-restaurants-bar?height=801").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_missing_data_returns_500() {
    let addr = spawn_server(AppState::new(None)).await;

    let (status, json) = get_json(addr, "/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(json["data"]["data_loaded"], false);

    for path in [
        "/api/restaurant-types",
        "/api/top-restaurants",
        "/api/foodie-areas",
        "/api/search?q=toit&mode=name",
        "/api/charts/restaurant-types-pie",
    ] {
        let (status, json) = get_json(addr, path).await;
        assert_eq!(status, 500, "{}", path);
        assert_eq!(json["error"], "Restaurant data not loaded");
    }
}

#[tokio::test]
async fn test_pages_render_html() {
    let addr = loaded_server().await;
    for path in ["/", "/top-restaurants", "/top-foodie-areas", "/top-restaurant-types"] {
        let (status, head, body) = send_raw(addr, path, &[]).await;
        assert_eq!(status, 200, "{}", path);
        assert!(header(&head, "content-type").unwrap_or("").starts_with("text/html"));
        assert!(body.contains("<!DOCTYPE html>"));
    }
}
