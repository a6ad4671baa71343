//! Dashboard statistics derived from the three collections.

use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use utoipa::ToSchema;

use crate::database::models::{clients, equipment, service_orders};
use crate::database::repository::{Record, RecordFilter};
use crate::database::Repositories;
use crate::domain::workflow::ServiceOrderStatus;
use crate::errors::AppError;

pub const UNASSIGNED_TECHNICIAN: &str = "Não atribuído";
const TOP_BRANDS: usize = 5;
const REPAIR_TIME_MONTHS: usize = 6;
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct OrderStatusCounts {
    pub open: usize,
    pub diagnosis: usize,
    pub awaiting_approval: usize,
    pub in_progress: usize,
    pub finished: usize,
    pub delivered: usize,
    pub total: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClientStats {
    pub active_clients: usize,
    /// Distinct clients with an order that entered in the last 12 months.
    pub with_orders_last_12_months: usize,
    pub with_open_orders: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct EquipmentStats {
    pub in_maintenance: usize,
    pub awaiting_approval: usize,
    pub ready_for_delivery: usize,
    pub total: usize,
}

#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct RepairTimePoint {
    /// `YYYY-MM` of the entry date.
    pub month: String,
    /// Short label, e.g. `Mar/25`.
    pub label: String,
    pub average_days: f64,
    pub orders: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct BrandCount {
    pub brand: String,
    pub orders: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct TechnicianCount {
    pub technician: String,
    pub completed: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardReport {
    pub orders: OrderStatusCounts,
    pub clients: ClientStats,
    pub equipment: EquipmentStats,
    pub repair_time: Vec<RepairTimePoint>,
    pub top_brands: Vec<BrandCount>,
    pub technicians: Vec<TechnicianCount>,
}

pub fn order_status_counts(orders: &[service_orders::Model]) -> OrderStatusCounts {
    let mut counts = OrderStatusCounts::default();
    for order in orders {
        match order.status {
            ServiceOrderStatus::Open => counts.open += 1,
            ServiceOrderStatus::Diagnosis => counts.diagnosis += 1,
            ServiceOrderStatus::AwaitingApproval => counts.awaiting_approval += 1,
            ServiceOrderStatus::InProgress => counts.in_progress += 1,
            ServiceOrderStatus::Finished => counts.finished += 1,
            ServiceOrderStatus::Delivered => counts.delivered += 1,
            ServiceOrderStatus::Archived => continue,
        }
        counts.total += 1;
    }
    counts
}

fn distinct<'a>(
    orders: &'a [service_orders::Model],
    key: impl Fn(&'a service_orders::Model) -> &'a str,
    keep: impl Fn(&service_orders::Model) -> bool,
) -> usize {
    orders
        .iter()
        .filter(|o| keep(*o))
        .map(key)
        .filter(|k| !k.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

pub fn client_stats(
    clients: &[clients::Model],
    orders: &[service_orders::Model],
    today: NaiveDate,
) -> ClientStats {
    let year_ago = today
        .checked_sub_months(Months::new(12))
        .unwrap_or(NaiveDate::MIN);
    ClientStats {
        active_clients: clients.iter().filter(|c| !c.is_archived()).count(),
        with_orders_last_12_months: distinct(orders, |o| o.client_id.as_str(), |o| o.entry_date > year_ago),
        with_open_orders: distinct(orders, |o| o.client_id.as_str(), |o| o.status.is_open_work()),
    }
}

pub fn equipment_stats(
    equipment: &[equipment::Model],
    orders: &[service_orders::Model],
) -> EquipmentStats {
    use ServiceOrderStatus::*;
    EquipmentStats {
        in_maintenance: distinct(orders, |o| o.equipment_id.as_str(), |o| {
            matches!(o.status, InProgress | Diagnosis)
        }),
        awaiting_approval: distinct(orders, |o| o.equipment_id.as_str(), |o| o.status == AwaitingApproval),
        ready_for_delivery: distinct(orders, |o| o.equipment_id.as_str(), |o| o.status == Finished),
        total: equipment.iter().filter(|e| !e.is_archived()).count(),
    }
}

/// Average days from entry to exit for completed orders, bucketed by entry
/// month. Orders exiting before they entered are ignored. Only the most
/// recent months with data are returned, oldest first.
pub fn repair_time_by_month(orders: &[service_orders::Model]) -> Vec<RepairTimePoint> {
    let mut months: BTreeMap<(i32, u32), (i64, usize)> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_completed()) {
        let Some(exit) = order.exit_date else {
            continue;
        };
        let days = (exit - order.entry_date).num_days();
        if days < 0 {
            continue;
        }
        let bucket = months
            .entry((order.entry_date.year(), order.entry_date.month()))
            .or_insert((0, 0));
        bucket.0 += days;
        bucket.1 += 1;
    }

    let skip = months.len().saturating_sub(REPAIR_TIME_MONTHS);
    months
        .into_iter()
        .skip(skip)
        .map(|((year, month), (total_days, count))| RepairTimePoint {
            month: format!("{:04}-{:02}", year, month),
            label: format!(
                "{}/{:02}",
                MONTH_ABBREVIATIONS[(month as usize).saturating_sub(1) % 12],
                year.rem_euclid(100)
            ),
            average_days: total_days as f64 / count as f64,
            orders: count,
        })
        .collect()
}

/// Brands ranked by how many orders reference their equipment.
pub fn top_brands(equipment: &[equipment::Model], orders: &[service_orders::Model]) -> Vec<BrandCount> {
    let brand_of: HashMap<&str, &str> = equipment
        .iter()
        .map(|e| (e.id.as_str(), e.brand.as_str()))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for order in orders {
        if let Some(brand) = brand_of.get(order.equipment_id.as_str()) {
            *counts.entry(*brand).or_default() += 1;
        }
    }

    let mut ranked: Vec<BrandCount> = counts
        .into_iter()
        .map(|(brand, orders)| BrandCount {
            brand: brand.to_string(),
            orders,
        })
        .collect();
    ranked.sort_by(|a, b| b.orders.cmp(&a.orders).then_with(|| a.brand.cmp(&b.brand)));
    ranked.truncate(TOP_BRANDS);
    ranked
}

pub fn technician_performance(orders: &[service_orders::Model]) -> Vec<TechnicianCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for order in orders.iter().filter(|o| o.status.is_completed()) {
        let technician = order.technician().unwrap_or(UNASSIGNED_TECHNICIAN);
        *counts.entry(technician).or_default() += 1;
    }

    let mut ranked: Vec<TechnicianCount> = counts
        .into_iter()
        .map(|(technician, completed)| TechnicianCount {
            technician: technician.to_string(),
            completed,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.completed
            .cmp(&a.completed)
            .then_with(|| a.technician.cmp(&b.technician))
    });
    ranked
}

/// Everything the dashboard shows, computed over non-archived records.
pub async fn dashboard(repos: &Repositories, today: NaiveDate) -> Result<DashboardReport, AppError> {
    let clients = repos.clients.get_filtered(RecordFilter::Active).await?;
    let equipment = repos.equipment.get_filtered(RecordFilter::Active).await?;
    let orders = repos.orders.get_filtered(RecordFilter::Active).await?;
    log::debug!(
        "Building dashboard from {} clients, {} equipment, {} orders",
        clients.len(),
        equipment.len(),
        orders.len()
    );

    Ok(DashboardReport {
        orders: order_status_counts(&orders),
        clients: client_stats(&clients, &orders, today),
        equipment: equipment_stats(&equipment, &orders),
        repair_time: repair_time_by_month(&orders),
        top_brands: top_brands(&equipment, &orders),
        technicians: technician_performance(&orders),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::service_orders::Execution;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(
        client: &str,
        equipment: &str,
        status: ServiceOrderStatus,
        entry: NaiveDate,
        exit: Option<NaiveDate>,
    ) -> service_orders::Model {
        service_orders::Model {
            id: format!("{}-{}-{}", client, equipment, entry),
            readable_id: String::new(),
            entry_date: entry,
            exit_date: exit,
            problem_description: "x".into(),
            status,
            client_id: client.into(),
            equipment_id: equipment.into(),
            technician_notes: None,
            inspection_checklist: None,
            visual_inspection: None,
            budget: None,
            execution: None,
            delivery: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn with_technician(mut o: service_orders::Model, name: &str) -> service_orders::Model {
        o.execution = Some(Execution {
            technician: Some(name.into()),
            ..Execution::default()
        });
        o
    }

    #[test]
    fn counts_by_status() {
        use ServiceOrderStatus::*;
        let d = date(2025, 3, 1);
        let orders = vec![
            order("a", "1", Open, d, None),
            order("a", "1", Open, d, None),
            order("b", "2", InProgress, d, None),
            order("b", "2", Finished, d, None),
        ];
        let counts = order_status_counts(&orders);
        assert_eq!(counts.open, 2);
        assert_eq!(counts.in_progress, 1);
        assert_eq!(counts.finished, 1);
        assert_eq!(counts.total, 4);
    }

    #[test]
    fn client_stats_use_distinct_clients() {
        use ServiceOrderStatus::*;
        let today = date(2025, 6, 1);
        let orders = vec![
            order("a", "1", Open, date(2025, 5, 1), None),
            order("a", "2", Diagnosis, date(2025, 4, 1), None),
            order("b", "3", Delivered, date(2023, 1, 1), None),
        ];
        let stats = client_stats(&[], &orders, today);
        assert_eq!(stats.with_orders_last_12_months, 1);
        assert_eq!(stats.with_open_orders, 1);
    }

    #[test]
    fn repair_time_averages_completed_orders() {
        use ServiceOrderStatus::*;
        let orders = vec![
            order("a", "1", Finished, date(2025, 3, 1), Some(date(2025, 3, 5))),
            order("a", "1", Delivered, date(2025, 3, 10), Some(date(2025, 3, 12))),
            order("a", "1", Finished, date(2025, 4, 10), Some(date(2025, 4, 1))),
            order("a", "1", InProgress, date(2025, 4, 1), Some(date(2025, 4, 20))),
        ];
        let points = repair_time_by_month(&orders);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].month, "2025-03");
        assert_eq!(points[0].label, "Mar/25");
        assert_eq!(points[0].average_days, 3.0);
        assert_eq!(points[0].orders, 2);
    }

    #[test]
    fn repair_time_keeps_last_six_months() {
        let orders: Vec<_> = (1..=8)
            .map(|m| {
                order(
                    "a",
                    "1",
                    ServiceOrderStatus::Finished,
                    date(2025, m, 1),
                    Some(date(2025, m, 2)),
                )
            })
            .collect();
        let points = repair_time_by_month(&orders);
        assert_eq!(points.len(), 6);
        assert_eq!(points[0].month, "2025-03");
        assert_eq!(points[5].month, "2025-08");
    }

    #[test]
    fn unassigned_technician_bucket() {
        use ServiceOrderStatus::*;
        let d = date(2025, 3, 1);
        let orders = vec![
            with_technician(order("a", "1", Finished, d, None), "Carlos"),
            with_technician(order("a", "1", Delivered, d, None), "Carlos"),
            with_technician(order("a", "1", Finished, d, None), "  "),
            with_technician(order("a", "1", Open, d, None), "Ana"),
        ];
        let ranked = technician_performance(&orders);
        assert_eq!(
            ranked,
            vec![
                TechnicianCount { technician: "Carlos".into(), completed: 2 },
                TechnicianCount { technician: UNASSIGNED_TECHNICIAN.into(), completed: 1 },
            ]
        );
    }
}
