use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Fixed inspection items, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistKey {
    Command,
    Tubes,
    Buttons,
    Image,
    Setup,
    Lighting,
    Accessories,
}

impl ChecklistKey {
    pub const ALL: [ChecklistKey; 7] = [
        ChecklistKey::Command,
        ChecklistKey::Tubes,
        ChecklistKey::Buttons,
        ChecklistKey::Image,
        ChecklistKey::Setup,
        ChecklistKey::Lighting,
        ChecklistKey::Accessories,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChecklistKey::Command => "Comando/Mecânica",
            ChecklistKey::Tubes => "Tubos e Canais",
            ChecklistKey::Buttons => "Botões e Lentes",
            ChecklistKey::Image => "Imagem",
            ChecklistKey::Setup => "Setup/Conexões",
            ChecklistKey::Lighting => "Iluminação",
            ChecklistKey::Accessories => "Acessórios",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ChecklistStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Defeito")]
    Defect,
    #[serde(rename = "Troca")]
    Replace,
}

impl ChecklistStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ChecklistStatus::Ok => "OK",
            ChecklistStatus::Defect => "Defeito",
            ChecklistStatus::Replace => "Troca",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChecklistItem {
    pub status: ChecklistStatus,
    /// Missing observations are stored as an empty string.
    #[serde(default)]
    pub observation: String,
}

/// Scored inspection items. Items never scored are simply absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct Checklist(pub BTreeMap<ChecklistKey, ChecklistItem>);

impl Checklist {
    pub fn get(&self, key: ChecklistKey) -> Option<&ChecklistItem> {
        self.0.get(&key)
    }

    pub fn set(&mut self, key: ChecklistKey, status: ChecklistStatus, observation: Option<String>) {
        self.0.insert(
            key,
            ChecklistItem {
                status,
                observation: observation.unwrap_or_default(),
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Plain-text rendering, one line per scored item.
    pub fn to_text(&self) -> String {
        ChecklistKey::ALL
            .iter()
            .filter_map(|key| {
                self.get(*key).map(|item| {
                    let observation = item.observation.trim();
                    if observation.is_empty() {
                        format!("{}: {}", key.label(), item.status.label())
                    } else {
                        format!("{}: {} - {}", key.label(), item.status.label(), observation)
                    }
                })
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
