use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::api::validation::{clean_opt, require};
use crate::database::models::service_orders::{self, Delivery, Execution};
use crate::database::models::{clients, equipment};
use crate::database::repository::RecordFilter;
use crate::database::Repositories;
use crate::domain::budget::{Budget, QuantityRule};
use crate::domain::checklist::Checklist;
use crate::domain::inspection::VisualInspection;
use crate::domain::readable_id::{format_readable_id, month_window, next_sequence};
use crate::domain::workflow::ServiceOrderStatus;
use crate::errors::{AppError, FieldError};
use crate::services::equipment::{self as equipment_service, EquipmentInput};
use crate::services::summarizer::{SummarizeRequest, SummarizeResponse, SummarizerService};

/// Order form payload. A `readable_id` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderInput {
    pub entry_date: NaiveDate,
    pub exit_date: Option<NaiveDate>,
    pub problem_description: String,
    pub status: Option<ServiceOrderStatus>,
    pub client_id: String,
    #[serde(default)]
    pub equipment_id: String,
    pub technician_notes: Option<String>,
    pub inspection_checklist: Option<Checklist>,
    pub visual_inspection: Option<VisualInspection>,
    pub budget: Option<Budget>,
    pub execution: Option<Execution>,
    pub delivery: Option<Delivery>,
}

/// Creation payload: the order plus, optionally, equipment registered on the spot.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderInput {
    #[serde(flatten)]
    pub order: OrderInput,
    pub new_equipment: Option<EquipmentInput>,
}

/// An order with its derived budget total and resolved references.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: service_orders::Model,
    pub budget_total: f64,
    /// Blank when the client reference dangles.
    pub client_name: String,
    /// Blank when the equipment reference dangles.
    pub equipment_label: String,
}

impl OrderInput {
    /// `current` is the stored status on edits, `Aberta` for new orders.
    pub fn validate(
        &self,
        current: ServiceOrderStatus,
        rule: QuantityRule,
        equipment_inline: bool,
    ) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require(&mut errors, "client_id", &self.client_id, "Selecione um cliente.");
        if !equipment_inline {
            require(&mut errors, "equipment_id", &self.equipment_id, "Selecione um equipamento.");
        }
        require(
            &mut errors,
            "problem_description",
            &self.problem_description,
            "Descrição do problema é obrigatória.",
        );
        if self.status.is_some_and(|next| !current.can_edit_to(next)) {
            errors.push(FieldError::new(
                "status",
                "Ordens só podem ser arquivadas pela ação de arquivar.",
            ));
        }
        if let Some(budget) = &self.budget {
            errors.extend(budget.validate(rule));
        }
        if let Some(inspection) = &self.visual_inspection {
            errors.extend(inspection.validate());
        }
        errors
    }

    fn into_model(self, id: String, readable_id: String, status: ServiceOrderStatus) -> service_orders::Model {
        service_orders::Model {
            id,
            readable_id,
            entry_date: self.entry_date,
            exit_date: self.exit_date,
            problem_description: self.problem_description.trim().to_string(),
            status,
            client_id: self.client_id.trim().to_string(),
            equipment_id: self.equipment_id.trim().to_string(),
            technician_notes: clean_opt(self.technician_notes),
            inspection_checklist: self.inspection_checklist.filter(|c| !c.is_empty()),
            visual_inspection: self.visual_inspection,
            budget: self.budget,
            execution: self.execution,
            delivery: self.delivery,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }
}

/// Next `OS-YYYYMM-NNNN` for the month of `entry_date`.
///
/// Backdated orders are numbered in their entry month. Earlier versions
/// used the month of the save date instead.
///
/// Counts then inserts without a lock: two orders created concurrently in
/// the same month can end up with the same number.
pub async fn next_readable_id(repos: &Repositories, entry_date: NaiveDate) -> Result<String, AppError> {
    let (from, until) = month_window(entry_date);
    let in_month = repos
        .orders
        .get_filtered(RecordFilter::EntryDateBetween { from, until })
        .await?
        .len();
    Ok(format_readable_id(entry_date, next_sequence(in_month)))
}

pub async fn list(repos: &Repositories, include_archived: bool) -> Result<Vec<service_orders::Model>, AppError> {
    let mut orders = if include_archived {
        repos.orders.get_all().await?
    } else {
        repos.orders.get_filtered(RecordFilter::Active).await?
    };
    orders.sort_by(|a, b| {
        b.entry_date
            .cmp(&a.entry_date)
            .then_with(|| b.readable_id.cmp(&a.readable_id))
    });
    Ok(orders)
}

pub async fn get(repos: &Repositories, id: &str) -> Result<service_orders::Model, AppError> {
    repos
        .orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Service order {} not found", id)))
}

pub async fn create(repos: &Repositories, input: CreateOrderInput) -> Result<service_orders::Model, AppError> {
    let CreateOrderInput {
        mut order,
        new_equipment,
    } = input;

    let new_equipment = new_equipment.map(|mut e| {
        if e.owner_id.trim().is_empty() {
            e.owner_id = order.client_id.clone();
        }
        e
    });

    let mut errors = order.validate(
        ServiceOrderStatus::Open,
        QuantityRule::Create,
        new_equipment.is_some(),
    );
    if let Some(e) = &new_equipment {
        errors.extend(e.validate("new_equipment."));
    }
    AppError::check(errors)?;

    if let Some(e) = new_equipment {
        let created = equipment_service::create(repos, e).await?;
        order.equipment_id = created.id;
    }

    let readable_id = next_readable_id(repos, order.entry_date).await?;
    let status = order.status.unwrap_or(ServiceOrderStatus::Open);
    let saved = repos
        .orders
        .put(order.into_model(String::new(), readable_id, status))
        .await?;
    log::info!("Opened service order {} ({})", saved.readable_id, saved.id);
    Ok(saved)
}

/// Full overwrite of an existing order; `readable_id` and `created_at` are kept.
/// The visual inspection of an archived order cannot be changed.
pub async fn update(repos: &Repositories, id: &str, mut input: OrderInput) -> Result<service_orders::Model, AppError> {
    let existing = get(repos, id).await?;
    AppError::check(input.validate(existing.status, QuantityRule::Edit, false))?;

    if existing.status.is_archived() {
        let stored = existing.visual_inspection.clone().unwrap_or_default();
        if input.visual_inspection.as_ref().is_some_and(|sent| *sent != stored) {
            return Err(AppError::Forbidden("Archived orders are read-only".to_string()));
        }
        input.visual_inspection = existing.visual_inspection.clone();
    }

    let status = input.status.unwrap_or(existing.status);
    let mut order = input.into_model(existing.id, existing.readable_id, status);
    order.created_at = existing.created_at;
    order.updated_at = Some(chrono::Utc::now());
    Ok(repos.orders.put(order).await?)
}

pub async fn archive(repos: &Repositories, id: &str) -> Result<service_orders::Model, AppError> {
    let order = repos.orders.patch_status(id, ServiceOrderStatus::Archived).await?;
    log::info!("Archived service order {}", order.readable_id);
    Ok(order)
}

pub async fn restore(repos: &Repositories, id: &str) -> Result<service_orders::Model, AppError> {
    Ok(repos.orders.patch_status(id, ServiceOrderStatus::RESTORED).await?)
}

pub async fn delete(repos: &Repositories, id: &str) -> Result<(), AppError> {
    repos.orders.delete(id).await?;
    log::warn!("Permanently deleted service order {}", id);
    Ok(())
}

/// Lookup tables for resolving order references.
pub struct Directory {
    clients: HashMap<String, clients::Model>,
    equipment: HashMap<String, equipment::Model>,
}

impl Directory {
    pub async fn load(repos: &Repositories) -> Result<Self, AppError> {
        let clients = repos
            .clients
            .get_all()
            .await?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let equipment = repos
            .equipment
            .get_all()
            .await?
            .into_iter()
            .map(|e| (e.id.clone(), e))
            .collect();
        Ok(Self { clients, equipment })
    }

    pub fn view(&self, order: service_orders::Model) -> OrderView {
        let client_name = self
            .clients
            .get(&order.client_id)
            .map(|c| c.display_name().to_string())
            .unwrap_or_default();
        let equipment_label = self
            .equipment
            .get(&order.equipment_id)
            .map(equipment::Model::label)
            .unwrap_or_default();
        OrderView {
            budget_total: order.budget_total(),
            order,
            client_name,
            equipment_label,
        }
    }
}

pub async fn list_views(repos: &Repositories, include_archived: bool) -> Result<Vec<OrderView>, AppError> {
    let orders = list(repos, include_archived).await?;
    let directory = Directory::load(repos).await?;
    Ok(orders.into_iter().map(|o| directory.view(o)).collect())
}

pub async fn get_view(repos: &Repositories, id: &str) -> Result<OrderView, AppError> {
    let order = get(repos, id).await?;
    let directory = Directory::load(repos).await?;
    Ok(directory.view(order))
}

/// Asks the summarizer for a short report from the technician notes and
/// the checklist rendered as text.
pub async fn summarize(
    repos: &Repositories,
    summarizer: &SummarizerService,
    id: &str,
) -> Result<SummarizeResponse, AppError> {
    let order = get(repos, id).await?;
    let request = SummarizeRequest {
        technician_notes: order.technician_notes.unwrap_or_default(),
        inspection_checklist: order
            .inspection_checklist
            .map(|c| c.to_text())
            .unwrap_or_default(),
    };
    summarizer.summarize(&request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::budget::BudgetItem;
    use crate::domain::inspection::{Marker, Severity, Shape};
    use crate::services::equipment::tests::sample_input as equipment_input;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order_input(entry_date: NaiveDate) -> OrderInput {
        OrderInput {
            entry_date,
            exit_date: None,
            problem_description: "Imagem escura".into(),
            status: None,
            client_id: "client-1".into(),
            equipment_id: "equipment-1".into(),
            technician_notes: None,
            inspection_checklist: None,
            visual_inspection: None,
            budget: None,
            execution: None,
            delivery: None,
        }
    }

    fn create_input(entry_date: NaiveDate) -> CreateOrderInput {
        CreateOrderInput {
            order: order_input(entry_date),
            new_equipment: None,
        }
    }

    #[actix_web::test]
    async fn readable_id_counts_orders_in_the_entry_month() {
        let repos = Repositories::in_memory();
        for day in [1, 2, 3] {
            create(&repos, create_input(date(2025, 3, day))).await.unwrap();
        }
        create(&repos, create_input(date(2025, 2, 28))).await.unwrap();

        let order = create(&repos, create_input(date(2025, 3, 5))).await.unwrap();
        assert_eq!(order.readable_id, "OS-202503-0004");

        let april = create(&repos, create_input(date(2025, 4, 1))).await.unwrap();
        assert_eq!(april.readable_id, "OS-202504-0001");
    }

    #[actix_web::test]
    async fn update_keeps_readable_id() {
        let repos = Repositories::in_memory();
        let created = create(&repos, create_input(date(2025, 3, 5))).await.unwrap();

        let mut input = order_input(date(2025, 6, 1));
        input.status = Some(ServiceOrderStatus::Delivered);
        let updated = update(&repos, &created.id, input).await.unwrap();

        assert_eq!(updated.readable_id, created.readable_id);
        assert_eq!(updated.status, ServiceOrderStatus::Delivered);
        assert_eq!(updated.entry_date, date(2025, 6, 1));
    }

    #[actix_web::test]
    async fn edit_rejects_archived_status() {
        let repos = Repositories::in_memory();
        let created = create(&repos, create_input(date(2025, 3, 5))).await.unwrap();

        let mut input = order_input(date(2025, 3, 5));
        input.status = Some(ServiceOrderStatus::Archived);
        let err = update(&repos, &created.id, input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref f) if f[0].field == "status"));
    }

    fn rect_marker(id: i64, width: f64) -> Marker {
        Marker {
            id,
            severity: Severity::Attention,
            note: String::new(),
            shape: Shape::Rect { x: 10.0, y: 10.0, width, height: width },
        }
    }

    #[actix_web::test]
    async fn submitted_markers_are_checked() {
        let repos = Repositories::in_memory();
        let mut input = create_input(date(2025, 3, 5));
        input.order.visual_inspection = Some(VisualInspection {
            general_observations: String::new(),
            markers: vec![rect_marker(1, 5.0), rect_marker(1, 1.0)],
        });

        let err = create(&repos, input).await.unwrap_err();
        let fields: Vec<String> = match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(
            fields,
            vec!["visual_inspection.markers.1.id", "visual_inspection.markers.1.shape"]
        );
    }

    #[actix_web::test]
    async fn archived_order_keeps_its_inspection() {
        let repos = Repositories::in_memory();
        let mut input = create_input(date(2025, 3, 5));
        input.order.visual_inspection = Some(VisualInspection {
            general_observations: "Riscos leves".into(),
            markers: vec![rect_marker(1, 5.0)],
        });
        let created = create(&repos, input).await.unwrap();
        archive(&repos, &created.id).await.unwrap();

        let mut edit = order_input(date(2025, 3, 5));
        edit.visual_inspection = Some(VisualInspection {
            general_observations: "edited".into(),
            markers: vec![rect_marker(1, 5.0)],
        });
        assert!(matches!(
            update(&repos, &created.id, edit).await,
            Err(AppError::Forbidden(_))
        ));

        let mut edit = order_input(date(2025, 3, 5));
        edit.problem_description = "Imagem escura e cabo solto".into();
        let updated = update(&repos, &created.id, edit).await.unwrap();
        assert_eq!(updated.status, ServiceOrderStatus::Archived);
        assert_eq!(updated.visual_inspection, created.visual_inspection);
    }

    #[actix_web::test]
    async fn marker_ids_at_the_limit_are_rejected() {
        let repos = Repositories::in_memory();
        let created = create(&repos, create_input(date(2025, 3, 5))).await.unwrap();

        let mut edit = order_input(date(2025, 3, 5));
        edit.visual_inspection = Some(VisualInspection {
            general_observations: String::new(),
            markers: vec![rect_marker(i64::MAX, 10.0)],
        });
        let err = update(&repos, &created.id, edit).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref f) if f[0].field == "visual_inspection.markers.0.id"));
    }

    #[actix_web::test]
    async fn zero_quantity_only_allowed_on_edit() {
        let repos = Repositories::in_memory();
        let budget = Budget {
            items: vec![BudgetItem::new("Revisão", 0.0, 100.0)],
            ..Budget::default()
        };

        let mut input = create_input(date(2025, 3, 5));
        input.order.budget = Some(budget.clone());
        assert!(matches!(create(&repos, input).await, Err(AppError::Validation(_))));

        let created = create(&repos, create_input(date(2025, 3, 5))).await.unwrap();
        let mut edit = order_input(date(2025, 3, 5));
        edit.budget = Some(budget);
        assert!(update(&repos, &created.id, edit).await.is_ok());
    }

    #[actix_web::test]
    async fn archive_hides_and_restore_reopens() {
        let repos = Repositories::in_memory();
        let created = create(&repos, create_input(date(2025, 3, 5))).await.unwrap();

        archive(&repos, &created.id).await.unwrap();
        assert!(list(&repos, false).await.unwrap().is_empty());
        assert_eq!(list(&repos, true).await.unwrap().len(), 1);

        let restored = restore(&repos, &created.id).await.unwrap();
        assert_eq!(restored.status, ServiceOrderStatus::Open);
    }

    #[actix_web::test]
    async fn listing_is_newest_first() {
        let repos = Repositories::in_memory();
        create(&repos, create_input(date(2025, 1, 10))).await.unwrap();
        create(&repos, create_input(date(2025, 3, 10))).await.unwrap();
        create(&repos, create_input(date(2025, 2, 10))).await.unwrap();

        let dates: Vec<_> = list(&repos, false)
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.entry_date)
            .collect();
        assert_eq!(dates, vec![date(2025, 3, 10), date(2025, 2, 10), date(2025, 1, 10)]);
    }

    #[actix_web::test]
    async fn inline_equipment_is_created_for_the_client() {
        let repos = Repositories::in_memory();
        let mut input = create_input(date(2025, 3, 5));
        input.order.equipment_id = String::new();
        input.new_equipment = Some(equipment_input(""));

        let order = create(&repos, input).await.unwrap();
        let created = repos.equipment.get(&order.equipment_id).await.unwrap().unwrap();
        assert_eq!(created.owner_id, "client-1");
    }

    #[actix_web::test]
    async fn views_tolerate_dangling_references() {
        let repos = Repositories::in_memory();
        let mut input = create_input(date(2025, 3, 5));
        input.order.budget = Some(Budget {
            items: vec![BudgetItem::new("Fibra", 2.0, 120.5)],
            ..Budget::default()
        });
        let created = create(&repos, input).await.unwrap();

        let view = get_view(&repos, &created.id).await.unwrap();
        assert_eq!(view.client_name, "");
        assert_eq!(view.equipment_label, "");
        assert_eq!(view.budget_total, 241.0);
    }
}
