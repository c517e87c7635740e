use std::sync::Arc;
use std::time::Duration;

use catalog::api::{HttpProductStore, ProductInput, ProductStore, StoreConfig, StoreError};
use catalog::core::App;
use catalog::core::draft::{ProductDraft, field};
use catalog::core::messages;
use catalog::core::resource::Resource;
use catalog::core::search::SearchState;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

fn store_for(server: &MockServer) -> HttpProductStore {
    HttpProductStore::new(&StoreConfig {
        base_url: format!("{}/api/", server.uri()),
        timeout: Duration::from_secs(2),
    })
    .unwrap()
}

fn mouse_json() -> serde_json::Value {
    json!({
        "id": 1,
        "nombre": "Mouse",
        "descripcion": "Wireless",
        "precio": 25000.0,
        "cantidadStock": 4
    })
}

fn draft(name: &str, price: &str, stock: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: String::new(),
        price: price.to_string(),
        stock_quantity: stock.to_string(),
    }
}

// ============================================================================
// HTTP Store Tests
// ============================================================================

#[tokio::test]
async fn test_list_products_decodes_wire_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            mouse_json(),
            {"id": 2, "nombre": "Pad", "precio": 10000, "cantidadStock": 0}
        ])))
        .mount(&server)
        .await;

    let products = assert_ok!(store_for(&server).list_products().await);
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Mouse");
    assert_eq!(products[0].description.as_deref(), Some("Wireless"));
    assert_eq!(products[0].inventory_value(), 100000.0);
    assert_eq!(products[1].description, None);
}

#[tokio::test]
async fn test_create_product_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/productos"))
        .and(body_json(json!({
            "nombre": "Mouse",
            "descripcion": "Wireless",
            "precio": 25000.0,
            "cantidadStock": 4
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(mouse_json()))
        .expect(1)
        .mount(&server)
        .await;

    let input = ProductInput {
        name: "Mouse".into(),
        description: Some("Wireless".into()),
        price: 25000.0,
        stock_quantity: 4,
    };
    let created = assert_ok!(store_for(&server).create_product(&input).await);
    assert_eq!(created.id, 1);
}

#[tokio::test]
async fn test_update_and_delete_paths() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/productos/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mouse_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/productos/1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    let input = ProductInput {
        name: "Mouse".into(),
        description: None,
        price: 25000.0,
        stock_quantity: 4,
    };
    assert_ok!(store.update_product(1, &input).await);
    assert_ok!(store.delete_product(1).await);
}

#[tokio::test]
async fn test_not_found_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos/99"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Producto no encontrado"})),
        )
        .mount(&server)
        .await;

    let err = assert_err!(store_for(&server).get_product(99).await);
    assert_eq!(err, StoreError::NotFound);
}

#[tokio::test]
async fn test_field_errors_map_to_validation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Datos inválidos",
            "errors": {"nombre": "El nombre ya existe"}
        })))
        .mount(&server)
        .await;

    let input = ProductInput {
        name: "Mouse".into(),
        description: None,
        price: 1.0,
        stock_quantity: 1,
    };
    match assert_err!(store_for(&server).create_product(&input).await) {
        StoreError::Validation { message, fields } => {
            assert_eq!(message, "Datos inválidos");
            assert_eq!(fields.get(field::NAME), Some("El nombre ya existe"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_keeps_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos/inventario/resumen"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>down</html>"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = assert_err!(store.inventory_summary().await);
    assert_eq!(
        err,
        StoreError::Server {
            status: 500,
            message: Some("boom".into())
        }
    );

    let err = assert_err!(store.list_products().await);
    assert_eq!(
        err,
        StoreError::Server {
            status: 503,
            message: None
        }
    );
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = assert_err!(store_for(&server).list_products().await);
    assert!(matches!(err, StoreError::Decode(_)));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let store = HttpProductStore::new(&StoreConfig {
        base_url: format!("{}/api", server.uri()),
        timeout: Duration::from_millis(50),
    })
    .unwrap();

    let err = assert_err!(store.list_products().await);
    assert!(matches!(err, StoreError::Network(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let store = HttpProductStore::new(&StoreConfig {
        base_url: "http://127.0.0.1:1/api".into(),
        timeout: Duration::from_secs(2),
    })
    .unwrap();

    let err = assert_err!(store.list_products().await);
    assert!(matches!(err, StoreError::Network(_)));
}

#[tokio::test]
async fn test_summary_with_null_total() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos/inventario/resumen"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valorTotalInventario": null,
            "productoMayorValor": null
        })))
        .mount(&server)
        .await;

    let summary = assert_ok!(store_for(&server).inventory_summary().await);
    assert_eq!(summary.total_inventory_value, 0.0);
    assert!(summary.highest_value_product.is_none());
}

#[tokio::test]
async fn test_combinations_decode_from_arrays() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos/combinaciones/50000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            ["Mouse", "Pad", 35000],
            ["Mouse", "Pad", "Cable", "45000.5"]
        ])))
        .mount(&server)
        .await;

    let combos = assert_ok!(store_for(&server).search_combinations(50000.0).await);
    assert_eq!(combos.len(), 2);
    assert_eq!(combos[0].products, vec!["Mouse", "Pad"]);
    assert_eq!(combos[0].total, 35000.0);
    assert_eq!(combos[1].products.len(), 3);
    assert_eq!(combos[1].total, 45000.5);
}

// ============================================================================
// Controllers Against the HTTP Store
// ============================================================================

#[tokio::test]
async fn test_invalid_draft_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(mouse_json()))
        .expect(0)
        .mount(&server)
        .await;

    let app = App::new(Arc::new(store_for(&server)));
    let outcome = app.create(&draft("", "abc", "2.5")).await;

    assert!(!outcome.is_success());
    let errors = outcome.field_errors().unwrap();
    assert_eq!(errors.get(field::NAME), Some(messages::REQUIRED_NAME));
    assert_eq!(errors.get(field::PRICE), Some(messages::INVALID_PRICE));
    assert_eq!(errors.get(field::STOCK_QUANTITY), Some(messages::INVALID_STOCK));
}

#[tokio::test]
async fn test_create_then_list_refetches() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(201).set_body_json(mouse_json()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([mouse_json()])))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::new(Arc::new(store_for(&server)));
    let outcome = app.create(&draft("Mouse", "25000", "4")).await;

    assert_eq!(outcome.data().map(|p| p.id), Some(1));
    assert_eq!(app.list.products().map(|p| p.len()), Some(1));
}

#[tokio::test]
async fn test_list_failure_uses_stable_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let app = App::new(Arc::new(store_for(&server)));
    app.list.refresh().await;
    assert_eq!(
        app.list.state(),
        Resource::Failed(messages::LOAD_PRODUCTS.to_string())
    );
}

#[tokio::test]
async fn test_search_with_no_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/productos/combinaciones/100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let app = App::new(Arc::new(store_for(&server)));
    let state = app.search.search("100").await;
    assert_eq!(
        state,
        SearchState::Found {
            budget: 100.0,
            combinations: vec![]
        }
    );
}
