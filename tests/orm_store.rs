use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database};
use serde_json::json;

use repair_desk::database::models::service_orders;
use repair_desk::database::repository::RecordFilter;
use repair_desk::database::{ping, schema, Repositories, DB};
use repair_desk::domain::checklist::{ChecklistKey, ChecklistStatus};
use repair_desk::domain::workflow::ServiceOrderStatus;
use repair_desk::errors::AppError;
use repair_desk::services::orders::{self, CreateOrderInput};

async fn sqlite() -> DB {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    schema::ensure_schema(&db).await.unwrap();
    db
}

fn order(entry_date: &str, equipment_id: &str) -> CreateOrderInput {
    serde_json::from_value(json!({
        "entry_date": entry_date,
        "problem_description": "Imagem escura",
        "client_id": "c1",
        "equipment_id": equipment_id,
        "technician_notes": "Fonte de luz queimada",
        "inspection_checklist": {
            "image": { "status": "Defeito" },
            "lighting": { "status": "Troca", "observation": "Lâmpada" }
        },
        "budget": {
            "items": [{ "description": "Lâmpada xenon", "quantity": 1, "unit_price": 980.0 }],
            "payment_method": "Boleto"
        }
    }))
    .unwrap()
}

#[actix_web::test]
async fn schema_creation_is_idempotent() {
    let db = sqlite().await;
    schema::ensure_schema(&db).await.unwrap();
    ping(&db).await.unwrap();
}

#[actix_web::test]
async fn orders_round_trip_through_json_columns() {
    let repos = Repositories::sea_orm(sqlite().await);
    let created = orders::create(&repos, order("2025-03-05", "e1")).await.unwrap();
    assert_eq!(created.readable_id, "OS-202503-0001");

    let loaded = repos.orders.get(&created.id).await.unwrap().unwrap();
    let checklist = loaded.inspection_checklist.as_ref().unwrap();
    let image = checklist.get(ChecklistKey::Image).unwrap();
    assert_eq!(image.status, ChecklistStatus::Defect);
    assert_eq!(image.observation, "");
    assert_eq!(checklist.get(ChecklistKey::Lighting).unwrap().observation, "Lâmpada");
    assert_eq!(loaded.budget_total(), 980.0);
    assert_eq!(loaded.budget.unwrap().payment_method.as_deref(), Some("Boleto"));
}

#[actix_web::test]
async fn readable_ids_count_per_entry_month() {
    let repos = Repositories::sea_orm(sqlite().await);
    for date in ["2025-03-01", "2025-03-31", "2025-04-01"] {
        orders::create(&repos, order(date, "e1")).await.unwrap();
    }
    let next = orders::create(&repos, order("2025-03-15", "e2")).await.unwrap();
    assert_eq!(next.readable_id, "OS-202503-0003");

    let march: Vec<service_orders::Model> = repos
        .orders
        .get_filtered(RecordFilter::EntryDateBetween {
            from: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            until: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(march.len(), 3);
}

#[actix_web::test]
async fn archive_filters_and_delete() {
    let repos = Repositories::sea_orm(sqlite().await);
    let first = orders::create(&repos, order("2025-05-02", "e1")).await.unwrap();
    let second = orders::create(&repos, order("2025-05-03", "e2")).await.unwrap();

    let archived = repos
        .orders
        .patch_status(&first.id, ServiceOrderStatus::Archived)
        .await
        .unwrap();
    assert!(archived.updated_at.is_some());

    let active = repos.orders.get_filtered(RecordFilter::Active).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, second.id);
    assert_eq!(repos.orders.get_all().await.unwrap().len(), 2);

    repos.orders.delete(&first.id).await.unwrap();
    assert!(matches!(
        repos.orders.delete(&first.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[actix_web::test]
async fn client_archive_and_restore() {
    let repos = Repositories::sea_orm(sqlite().await);
    let input = serde_json::from_value(json!({
        "client_type": "fisica",
        "company_name": "Clínica Ventura",
        "contact_name": "Ana Ventura",
        "cpf": "123.456.789-09",
        "phone": "(31) 99876-5432",
        "email": "ana@ventura.med.br",
        "address": "Av. Afonso Pena, 1500",
        "cep": "30130-005",
        "uf": "MG",
        "city": "Belo Horizonte"
    }))
    .unwrap();
    let client = repair_desk::services::clients::create(&repos, input).await.unwrap();
    assert!(client.cnpj.is_none());

    repair_desk::services::clients::archive(&repos, &client.id).await.unwrap();
    assert!(repair_desk::services::clients::list(&repos, false).await.unwrap().is_empty());

    let restored = repair_desk::services::clients::restore(&repos, &client.id).await.unwrap();
    assert_eq!(restored.created_at, client.created_at);
    assert_eq!(repair_desk::services::clients::list(&repos, false).await.unwrap().len(), 1);
}
