use actix_web::{http::StatusCode, middleware::NormalizePath, test, web, App};
use serde_json::{json, Value};
use utoipa::OpenApi;

use repair_desk::api::{self, middleware::RequestId, ApiDoc};
use repair_desk::app_state::AppState;
use repair_desk::config::Config;
use repair_desk::database::Repositories;
use repair_desk::domain::readable_id::parse_readable_id;

macro_rules! test_app {
    () => {
        test::init_service(
            App::new()
                .wrap(NormalizePath::trim())
                .wrap(RequestId)
                .app_data(web::Data::new(AppState::new(
                    Config::local(),
                    Repositories::in_memory(),
                )))
                .app_data(api::json_config(1024 * 1024))
                .app_data(api::query_config())
                .app_data(api::path_config())
                .configure(api::configure),
        )
        .await
    };
}

fn client_payload() -> Value {
    json!({
        "client_type": "juridica",
        "company_name": "Hospital Santa Luzia",
        "contact_name": "Marcos Andrade",
        "cnpj": "12.345.678/0001-90",
        "phone": "(21) 3333-4444",
        "email": "compras@santaluzia.org",
        "address": "Rua das Flores, 12",
        "cep": "20040-002",
        "uf": "RJ",
        "city": "Rio de Janeiro"
    })
}

fn order_payload(client_id: &str, entry_date: &str) -> Value {
    json!({
        "entry_date": entry_date,
        "problem_description": "Canal de biópsia obstruído",
        "client_id": client_id,
        "new_equipment": {
            "brand": "Pentax",
            "model_name": "EG-2990i",
            "serial_number": "G110045",
            "owner_id": "",
            "equipment_type": "gastroscope"
        },
        "inspection_checklist": {
            "tubes": { "status": "Defeito" }
        },
        "budget": {
            "items": [
                { "description": "Troca do canal", "quantity": 1, "unit_price": 1500.0 },
                { "description": "Vedação", "quantity": 2, "unit_price": 75.5 }
            ]
        }
    })
}

#[actix_web::test]
async fn client_lifecycle() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .set_json(client_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let client: Value = test::read_body_json(resp).await;
    let id = client["id"].as_str().unwrap().to_string();
    assert_eq!(client["status"], "active");
    assert_eq!(
        client["address"],
        "Rua das Flores, 12, Rio de Janeiro, RJ, 20040-002"
    );

    let req = test::TestRequest::post()
        .uri(&format!("/api/clients/{}/archive", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/clients").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/clients?include_archived=true")
        .to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/clients/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/clients/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn client_validation_reports_fields() {
    let app = test_app!();
    let mut payload = client_payload();
    payload["client_type"] = json!("fisica");
    payload["phone"] = json!("21 3333 4444");

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["phone", "cpf"]);
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/clients")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[actix_web::test]
async fn order_creation_with_inline_equipment() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/clients")
        .set_json(client_payload())
        .to_request();
    let client: Value = test::call_and_read_body_json(&app, req).await;
    let client_id = client["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(order_payload(client_id, "2025-03-05"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let order: Value = test::read_body_json(resp).await;
    assert_eq!(order["readable_id"], "OS-202503-0001");
    assert_eq!(order["status"], "Aberta");
    assert_eq!(order["inspection_checklist"]["tubes"]["observation"], "");
    assert!(parse_readable_id(order["readable_id"].as_str().unwrap()).is_some());

    let req = test::TestRequest::get()
        .uri(&format!("/api/orders/{}", order["id"].as_str().unwrap()))
        .to_request();
    let view: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(view["budget_total"], 1651.0);
    assert_eq!(view["client_name"], "Hospital Santa Luzia");
    assert_eq!(view["equipment_label"], "Pentax EG-2990i (SN G110045)");

    let req = test::TestRequest::get()
        .uri(&format!("/api/equipment/{}/orders", view["equipment_id"].as_str().unwrap()))
        .to_request();
    let history: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 1);
}

#[actix_web::test]
async fn order_creation_rejects_zero_quantity() {
    let app = test_app!();
    let mut payload = order_payload("client-1", "2025-03-05");
    payload["budget"]["items"][0]["quantity"] = json!(0);

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"][0]["field"], "budget.items.0.quantity");
}

#[actix_web::test]
async fn markers_follow_the_drawing_rules() {
    let app = test_app!();

    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(order_payload("client-1", "2025-03-05"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let id = order["id"].as_str().unwrap().to_string();
    let markers_uri = format!("/api/orders/{}/inspection/markers", id);

    let req = test::TestRequest::post()
        .uri(&markers_uri)
        .set_json(json!({
            "canvas": "image",
            "start": { "x": 10.0, "y": 10.0 },
            "end": { "x": 13.0, "y": 13.0 },
            "severity": "critical",
            "note": "Fissura"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let marker: Value = test::read_body_json(resp).await;
    assert_eq!(marker["shape"], "rect");
    assert_eq!(marker["width"], 3.0);
    assert_eq!(marker["severity"], "critical");

    let req = test::TestRequest::post()
        .uri(&markers_uri)
        .set_json(json!({
            "canvas": "image",
            "start": { "x": 10.0, "y": 10.0 },
            "end": { "x": 11.0, "y": 11.0 }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri(&format!("/api/orders/{}/archive", id))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", markers_uri, marker["id"]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri(&format!("/api/orders/{}/restore", id))
        .to_request();
    let restored: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(restored["status"], "Aberta");

    let req = test::TestRequest::delete()
        .uri(&format!("{}/{}", markers_uri, marker["id"]))
        .to_request();
    let inspection: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(inspection["markers"], json!([]));
}

#[actix_web::test]
async fn archived_orders_leave_the_default_listing() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(order_payload("client-1", "2025-03-05"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/orders/{}/archive", order["id"].as_str().unwrap()))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/orders/").to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(listed.is_empty());

    let req = test::TestRequest::get()
        .uri("/api/orders?include_archived=true")
        .to_request();
    let listed: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["status"], "Arquivada");
}

#[actix_web::test]
async fn summary_needs_a_configured_summarizer() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(order_payload("client-1", "2025-03-05"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/orders/{}/summary", order["id"].as_str().unwrap()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn statuses_exclude_archived() {
    let app = test_app!();
    let req = test::TestRequest::get().uri("/api/orders/statuses").to_request();
    let statuses: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(statuses.len(), 6);
    assert!(statuses.iter().all(|s| s["value"] != "Arquivada"));
}

#[actix_web::test]
async fn dashboard_report_counts_orders() {
    let app = test_app!();
    for date in ["2025-03-05", "2025-03-06"] {
        let req = test::TestRequest::post()
            .uri("/api/orders")
            .set_json(order_payload("client-1", date))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get().uri("/api/reports/dashboard").to_request();
    let report: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(report["orders"]["open"], 2);
    assert_eq!(report["top_brands"][0]["brand"], "Pentax");
    assert_eq!(report["clients"]["with_open_orders"], 1);
}

#[actix_web::test]
async fn request_id_is_echoed() {
    let app = test_app!();
    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("x-request-id", "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "abc-123");
}

#[::core::prelude::v1::test]
fn openapi_lists_inspection_routes() {
    let doc = ApiDoc::openapi().to_json().unwrap();
    assert!(doc.contains("/api/orders/{id}/inspection/markers"));
    assert!(doc.contains("\"ServiceOrder\""));
}

#[actix_web::test]
async fn order_edits_apply_the_marker_rules() {
    let app = test_app!();
    let req = test::TestRequest::post()
        .uri("/api/orders")
        .set_json(order_payload("client-1", "2025-03-05"))
        .to_request();
    let order: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/orders/{}", order["id"].as_str().unwrap());

    let mut edit = json!({
        "entry_date": "2025-03-05",
        "problem_description": "Canal de biópsia obstruído",
        "client_id": "client-1",
        "equipment_id": order["equipment_id"],
        "visual_inspection": {
            "general_observations": "",
            "markers": [
                { "id": i64::MAX, "shape": "rect", "x": 10.0, "y": 10.0, "width": 1.0, "height": 1.0 }
            ]
        }
    });
    let req = test::TestRequest::put().uri(&uri).set_json(&edit).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"][0]["field"], "visual_inspection.markers.0.id");
    assert_eq!(body["fields"][1]["field"], "visual_inspection.markers.0.shape");

    let req = test::TestRequest::post()
        .uri(&format!("{}/archive", uri))
        .to_request();
    test::call_service(&app, req).await;

    edit["visual_inspection"]["markers"] = json!([
        { "id": 1, "shape": "rect", "x": 10.0, "y": 10.0, "width": 5.0, "height": 5.0 }
    ]);
    let req = test::TestRequest::put().uri(&uri).set_json(&edit).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
