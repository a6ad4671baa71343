//! Marker edits on an order's visual inspection. Each request replays one
//! drag gesture through an [`Annotator`] loaded from the stored order and
//! writes the resulting inspection back.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::database::models::service_orders;
use crate::database::Repositories;
use crate::domain::inspection::{Annotator, Canvas, Marker, Point, PointerUp, Severity, VisualInspection};
use crate::errors::{AppError, FieldError};
use crate::services::orders;

/// One pointer-down → pointer-up drag on a canvas.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MarkerGesture {
    pub canvas: Canvas,
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ObservationsInput {
    pub general_observations: String,
}

fn annotator_for(order: &service_orders::Model) -> Annotator {
    Annotator::new(
        order.visual_inspection.clone().unwrap_or_default(),
        order.status.is_archived(),
    )
}

async fn save(
    repos: &Repositories,
    mut order: service_orders::Model,
    inspection: VisualInspection,
) -> Result<service_orders::Model, AppError> {
    order.visual_inspection = Some(inspection);
    order.updated_at = Some(chrono::Utc::now());
    repos.orders.put(order).await
}

pub async fn add_marker(repos: &Repositories, order_id: &str, gesture: MarkerGesture) -> Result<Marker, AppError> {
    let order = orders::get(repos, order_id).await?;
    let mut annotator = annotator_for(&order);
    if annotator.is_read_only() {
        return Err(AppError::Forbidden("Archived orders are read-only".to_string()));
    }

    if !annotator.pointer_down(gesture.canvas, gesture.start) {
        return Err(AppError::Validation(vec![FieldError::new(
            "start",
            "O ponto inicial está fora da área de desenho.",
        )]));
    }
    annotator.pointer_move(gesture.end);

    match annotator.pointer_up() {
        PointerUp::Pending(_) => {}
        PointerUp::Discarded | PointerUp::Ignored => {
            return Err(AppError::Validation(vec![FieldError::new(
                "end",
                "A marcação é menor que o tamanho mínimo.",
            )]));
        }
    }

    let marker = annotator.commit(gesture.severity, gesture.note)?;
    save(repos, order, annotator.into_inspection()).await?;
    log::info!("Added marker {} to order {}", marker.id, order_id);
    Ok(marker)
}

pub async fn remove_marker(
    repos: &Repositories,
    order_id: &str,
    marker_id: i64,
) -> Result<VisualInspection, AppError> {
    let order = orders::get(repos, order_id).await?;
    let mut annotator = annotator_for(&order);
    annotator.remove(marker_id)?;
    let saved = save(repos, order, annotator.into_inspection()).await?;
    Ok(saved.visual_inspection.unwrap_or_default())
}

pub async fn set_observations(
    repos: &Repositories,
    order_id: &str,
    input: ObservationsInput,
) -> Result<VisualInspection, AppError> {
    let order = orders::get(repos, order_id).await?;
    let mut annotator = annotator_for(&order);
    annotator.set_general_observations(input.general_observations)?;
    let saved = save(repos, order, annotator.into_inspection()).await?;
    Ok(saved.visual_inspection.unwrap_or_default())
}
