//! Service order status.
//!
//! The status is an open enum: edits may move an order from any status to any
//! other selectable status. `Arquivada` is only reachable through the archive
//! operation and left through restore.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum ServiceOrderStatus {
    #[sea_orm(string_value = "Aberta")]
    #[serde(rename = "Aberta")]
    Open,
    #[sea_orm(string_value = "Em Diagnóstico")]
    #[serde(rename = "Em Diagnóstico")]
    Diagnosis,
    #[sea_orm(string_value = "Aguardando Aprovação")]
    #[serde(rename = "Aguardando Aprovação")]
    AwaitingApproval,
    #[sea_orm(string_value = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    InProgress,
    #[sea_orm(string_value = "Finalizada")]
    #[serde(rename = "Finalizada")]
    Finished,
    #[sea_orm(string_value = "Entregue")]
    #[serde(rename = "Entregue")]
    Delivered,
    #[sea_orm(string_value = "Arquivada")]
    #[serde(rename = "Arquivada")]
    Archived,
}

impl ServiceOrderStatus {
    /// Statuses offered by the edit form.
    pub const SELECTABLE: [ServiceOrderStatus; 6] = [
        ServiceOrderStatus::Open,
        ServiceOrderStatus::Diagnosis,
        ServiceOrderStatus::AwaitingApproval,
        ServiceOrderStatus::InProgress,
        ServiceOrderStatus::Finished,
        ServiceOrderStatus::Delivered,
    ];

    /// Status applied when an archived order is restored.
    pub const RESTORED: ServiceOrderStatus = ServiceOrderStatus::Open;

    pub fn label(&self) -> &'static str {
        match self {
            ServiceOrderStatus::Open => "Aberta",
            ServiceOrderStatus::Diagnosis => "Em Diagnóstico",
            ServiceOrderStatus::AwaitingApproval => "Aguardando Aprovação",
            ServiceOrderStatus::InProgress => "Em Andamento",
            ServiceOrderStatus::Finished => "Finalizada",
            ServiceOrderStatus::Delivered => "Entregue",
            ServiceOrderStatus::Archived => "Arquivada",
        }
    }

    pub fn is_selectable(&self) -> bool {
        *self != ServiceOrderStatus::Archived
    }

    pub fn is_archived(&self) -> bool {
        *self == ServiceOrderStatus::Archived
    }

    /// Work is finished on the bench (whether or not it was handed back).
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            ServiceOrderStatus::Finished | ServiceOrderStatus::Delivered
        )
    }

    /// Orders that still occupy the client's attention.
    pub fn is_open_work(&self) -> bool {
        matches!(
            self,
            ServiceOrderStatus::Open | ServiceOrderStatus::Diagnosis | ServiceOrderStatus::InProgress
        )
    }

    /// Whether the edit form may move an order to `next`. Any-to-any.
    pub fn can_edit_to(&self, next: ServiceOrderStatus) -> bool {
        next.is_selectable()
    }
}

impl std::fmt::Display for ServiceOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
