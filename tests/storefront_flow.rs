mod support;

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use eshop_storefront::routes::create_app;
use serde_json::{Value, json};
use support::{FakeApi, app_state};
use tower::ServiceExt;
use uuid::Uuid;

struct Client {
    app: Router,
    session: String,
}

impl Client {
    fn new(api: Arc<FakeApi>) -> Self {
        Self {
            app: create_app(app_state(api)),
            session: Uuid::new_v4().to_string(),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-session-id", &self.session);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

#[tokio::test]
async fn new_session_id_is_echoed_back() {
    let app = create_app(app_state(Arc::new(FakeApi::seeded())));
    let response = app
        .oneshot(Request::get("/api/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let session = response
        .headers()
        .get("x-session-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(Uuid::parse_str(session).is_ok());
}

#[tokio::test]
async fn malformed_session_id_is_rejected() {
    let app = create_app(app_state(Arc::new(FakeApi::seeded())));
    let response = app
        .oneshot(
            Request::get("/api/cart")
                .header("x-session-id", "nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_paging_and_filter_reset() {
    let api = Arc::new(FakeApi::seeded());
    let client = Client::new(api.clone());

    let (status, body) = client.send("GET", "/api/catalog/category", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filter"], json!({ "mode": "category", "value": 1 }));
    assert_eq!(body["data"]["page"]["page_number"], 1);
    assert_eq!(body["meta"]["total"], 12);

    let (_, body) = client
        .send("GET", "/api/catalog/category/1?page=3", None)
        .await;
    assert_eq!(body["data"]["page"]["page_number"], 3);
    assert_eq!(body["data"]["products"].as_array().unwrap().len(), 2);

    let (_, body) = client
        .send("GET", "/api/catalog/search/mug?page=2", None)
        .await;
    assert_eq!(body["data"]["page"]["page_number"], 1);
    assert_eq!(body["data"]["filter"]["mode"], "search");

    let (_, body) = client
        .send("PUT", "/api/catalog/page-size", Some(json!({ "size": 2 })))
        .await;
    assert_eq!(body["data"]["page"]["page_size"], 2);
    assert_eq!(body["data"]["page"]["page_number"], 1);

    assert_eq!(
        api.calls(),
        vec![
            "category:1:0:5",
            "category:1:2:5",
            "search:mug:0:5",
            "search:mug:0:2",
        ]
    );
}

#[tokio::test]
async fn invalid_category_id_is_bad_request() {
    let client = Client::new(Arc::new(FakeApi::seeded()));
    let (status, _) = client.send("GET", "/api/catalog/category/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_search_keyword_is_bad_request() {
    let api = Arc::new(FakeApi::seeded());
    let client = Client::new(api.clone());
    let (status, _) = client.send("GET", "/api/catalog/search/%20%20", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn anonymous_reads_do_not_create_sessions() {
    let state = app_state(Arc::new(FakeApi::seeded()));
    let app = create_app(state.clone());
    for uri in ["/api/cart", "/api/checkout", "/api/checkout/reference"] {
        for _ in 0..20 {
            let response = app
                .clone()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }
    assert!(state.sessions.is_empty());

    let session = Uuid::new_v4();
    let response = app
        .oneshot(
            Request::post("/api/cart")
                .header("x-session-id", session.to_string())
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "product_id": 1 }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.sessions.len(), 1);
    assert!(state.sessions.contains(session));
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let api = Arc::new(FakeApi::seeded());
    let client = Client::new(api.clone());
    api.fail(true);
    let (status, body) = client.send("GET", "/api/catalog/category/2", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["data"]["error"].as_str().unwrap().contains("503"));
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let client = Client::new(Arc::new(FakeApi::seeded()));
    let (status, _) = client.send("GET", "/api/products/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = client.send("GET", "/api/products/13", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Coffee Mug 13");
}

#[tokio::test]
async fn cart_add_decrement_remove() {
    let client = Client::new(Arc::new(FakeApi::seeded()));

    client
        .send("POST", "/api/cart", Some(json!({ "product_id": 1 })))
        .await;
    let (_, body) = client
        .send("POST", "/api/cart", Some(json!({ "product_id": 1 })))
        .await;
    assert_eq!(body["data"]["totals"]["total_quantity"], 2);
    assert_eq!(body["data"]["totals"]["total_price"], 39.98);

    let (_, body) = client.send("POST", "/api/cart/1/decrement", None).await;
    assert_eq!(body["data"]["totals"]["total_quantity"], 1);

    let (status, body) = client.send("DELETE", "/api/cart/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());

    let (status, _) = client.send("DELETE", "/api/cart/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn filled_form() -> Value {
    json!({
        "customer": { "firstName": "Ada", "lastName": "Lovelace", "email": "ada@example.com" },
        "shippingAddress": { "street": "1 Main", "city": "London", "zipCode": "00000" },
        "billingAddress": {},
        "creditCard": {
            "cardType": "Visa",
            "nameOnCard": "Ada Lovelace",
            "cardNumber": "4111111111111111",
            "securityCode": "123",
            "expirationMonth": 12,
            "expirationYear": 2030
        }
    })
}

#[tokio::test]
async fn invalid_purchase_marks_fields_touched() {
    let api = Arc::new(FakeApi::seeded());
    let client = Client::new(api.clone());
    client
        .send("POST", "/api/cart", Some(json!({ "product_id": 1 })))
        .await;

    let (status, body) = client.send("POST", "/api/checkout/purchase", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body["data"]["fields"].as_array().unwrap().is_empty());

    let (_, body) = client.send("GET", "/api/checkout", None).await;
    assert_eq!(body["data"]["touched"].as_array().unwrap().len(), 19);
    assert!(!api.calls().contains(&"purchase".to_string()));
}

#[tokio::test]
async fn full_checkout_flow() {
    let api = Arc::new(FakeApi::seeded());
    let client = Client::new(api.clone());

    client
        .send("POST", "/api/cart", Some(json!({ "product_id": 13 })))
        .await;
    client
        .send("POST", "/api/cart", Some(json!({ "product_id": 1 })))
        .await;

    let (_, body) = client.send("GET", "/api/checkout/reference", None).await;
    assert_eq!(body["data"]["countries"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["credit_card_years"].as_array().unwrap().len(), 11);

    client
        .send("PUT", "/api/checkout/form", Some(filled_form()))
        .await;

    let (status, body) = client
        .send(
            "POST",
            "/api/checkout/states",
            Some(json!({ "section": "shipping", "country_code": "BR" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["selected"]["name"], "Acre");

    let (_, body) = client
        .send("POST", "/api/checkout/billing-copy", Some(json!({ "enabled": true })))
        .await;
    assert_eq!(body["data"]["form"]["billingAddress"]["state"], "Acre");
    assert_eq!(body["data"]["billing_states"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["totals"]["total_quantity"], 2);

    let (status, body) = client.send("POST", "/api/checkout/purchase", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orderTrackingNumber"], "TRACK-0001");

    let orders = api.orders.lock().unwrap().clone();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.total_quantity, 2);
    assert_eq!(orders[0].billing_address.country, "BR");

    let (_, body) = client.send("GET", "/api/cart", None).await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn purchase_with_empty_cart_is_rejected() {
    let api = Arc::new(FakeApi::seeded());
    let client = Client::new(api.clone());
    let mut form = filled_form();
    form["shippingAddress"]["country"] = json!("BR");
    form["shippingAddress"]["state"] = json!("Acre");
    form["billingAddress"] = form["shippingAddress"].clone();
    client.send("PUT", "/api/checkout/form", Some(form)).await;

    let (status, _) = client.send("POST", "/api/checkout/purchase", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(api.orders.lock().unwrap().is_empty());
}
