use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::FieldError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BudgetStatus {
    #[default]
    #[serde(rename = "Pendente")]
    Pending,
    #[serde(rename = "Aprovado")]
    Approved,
    #[serde(rename = "Reprovado")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BudgetItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl BudgetItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            id: None,
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Which form the budget is being submitted from. Creation requires a positive
/// quantity, edits accept zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantityRule {
    Create,
    Edit,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct Budget {
    #[serde(default)]
    pub items: Vec<BudgetItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
    #[serde(default)]
    pub status: BudgetStatus,
}

impl Budget {
    /// Σ quantity × unit_price, derived from the rows on every call.
    pub fn total(&self) -> f64 {
        self.items.iter().map(BudgetItem::line_total).sum()
    }

    pub fn add_item(&mut self, item: BudgetItem) {
        self.items.push(item);
    }

    pub fn replace_item(&mut self, index: usize, item: BudgetItem) -> Option<BudgetItem> {
        self.items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    pub fn remove_item(&mut self, index: usize) -> Option<BudgetItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn validate(&self, rule: QuantityRule) -> Vec<FieldError> {
        let mut errors = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.description.trim().is_empty() {
                errors.push(FieldError::new(
                    format!("budget.items.{}.description", index),
                    "Descrição é obrigatória.",
                ));
            }
            let quantity_ok = match rule {
                QuantityRule::Create => item.quantity > 0.0,
                QuantityRule::Edit => item.quantity >= 0.0,
            };
            if !quantity_ok || !item.quantity.is_finite() {
                let message = match rule {
                    QuantityRule::Create => "Qtd. deve ser > 0.",
                    QuantityRule::Edit => "Qtd. deve ser >= 0.",
                };
                errors.push(FieldError::new(
                    format!("budget.items.{}.quantity", index),
                    message,
                ));
            }
            if !item.unit_price.is_finite() || item.unit_price < 0.0 {
                errors.push(FieldError::new(
                    format!("budget.items.{}.unit_price", index),
                    "Preço deve ser >= 0.",
                ));
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Budget {
        Budget {
            items: vec![
                BudgetItem::new("Troca de borracha de angulação", 1.0, 850.0),
                BudgetItem::new("Fibra de luz", 2.0, 120.5),
                BudgetItem::new("Limpeza", 3.0, 40.0),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn total_sums_every_row() {
        assert_eq!(sample().total(), 850.0 + 241.0 + 120.0);
        assert_eq!(Budget::default().total(), 0.0);
    }

    #[test]
    fn removing_a_row_rederives_total() {
        let mut budget = sample();
        let removed = budget.remove_item(1).unwrap();
        assert_eq!(removed.description, "Fibra de luz");
        assert_eq!(budget.total(), 850.0 + 120.0);

        budget.remove_item(0);
        budget.remove_item(0);
        assert_eq!(budget.total(), 0.0);
        assert!(budget.remove_item(0).is_none());
    }

    #[test]
    fn replacing_a_row_updates_total() {
        let mut budget = sample();
        budget.replace_item(2, BudgetItem::new("Limpeza", 1.0, 40.0));
        assert_eq!(budget.total(), 850.0 + 241.0 + 40.0);
        assert!(budget.replace_item(9, BudgetItem::new("x", 1.0, 1.0)).is_none());
    }

    #[test]
    fn zero_quantity_only_allowed_on_edit() {
        let mut budget = Budget::default();
        budget.add_item(BudgetItem::new("Revisão", 0.0, 100.0));

        let on_create = budget.validate(QuantityRule::Create);
        assert_eq!(on_create.len(), 1);
        assert_eq!(on_create[0].field, "budget.items.0.quantity");

        assert!(budget.validate(QuantityRule::Edit).is_empty());
    }

    #[test]
    fn rejects_blank_description_and_negative_price() {
        let mut budget = Budget::default();
        budget.add_item(BudgetItem::new("  ", 1.0, -5.0));
        let fields: Vec<_> = budget
            .validate(QuantityRule::Edit)
            .into_iter()
            .map(|e| e.field)
            .collect();
        assert_eq!(
            fields,
            vec!["budget.items.0.description", "budget.items.0.unit_price"]
        );
    }

    #[test]
    fn status_defaults_to_pending() {
        let budget: Budget = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert_eq!(budget.status, BudgetStatus::Pending);
    }
}
