use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::validation::{self, check_format, clean_opt, max_len, require, require_opt};
use crate::database::models::clients::ClientType;
use crate::database::models::{clients, equipment, service_orders, RecordStatus};
use crate::database::repository::RecordFilter;
use crate::database::Repositories;
use crate::errors::{AppError, FieldError};

/// Client form payload. `cep`, `uf` and `city` are only read on creation,
/// where they are folded into the stored address.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClientInput {
    pub client_type: ClientType,
    pub company_name: String,
    pub contact_name: String,
    pub cpf: Option<String>,
    pub cnpj: Option<String>,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub cep: Option<String>,
    pub uf: Option<String>,
    pub city: Option<String>,
    pub observations: Option<String>,
    pub status: Option<RecordStatus>,
}

impl ClientInput {
    pub fn validate(&self, creating: bool) -> Vec<FieldError> {
        let mut errors = Vec::new();
        require(&mut errors, "company_name", &self.company_name, "O nome da empresa é obrigatório.");
        require(&mut errors, "contact_name", &self.contact_name, "O nome do contato é obrigatório.");
        require(&mut errors, "address", &self.address, "O endereço é obrigatório.");
        max_len(&mut errors, "company_name", &self.company_name, 200);
        max_len(&mut errors, "contact_name", &self.contact_name, 200);

        if !validation::is_phone(self.phone.trim()) {
            errors.push(FieldError::new("phone", "Telefone inválido."));
        }
        if !validation::is_email(self.email.trim()) {
            errors.push(FieldError::new("email", "Por favor, insira um email válido."));
        }

        match self.client_type {
            ClientType::Fisica => {
                if !self.cpf.as_deref().map(str::trim).is_some_and(validation::is_cpf) {
                    errors.push(FieldError::new("cpf", "O CPF é obrigatório e deve ser válido."));
                }
            }
            ClientType::Juridica => {
                if !self.cnpj.as_deref().map(str::trim).is_some_and(validation::is_cnpj) {
                    errors.push(FieldError::new("cnpj", "O CNPJ é obrigatório e deve ser válido."));
                }
            }
        }

        if creating {
            let cep = self.cep.as_deref().unwrap_or_default();
            if !validation::is_cep(cep.trim()) {
                errors.push(FieldError::new("cep", "CEP inválido."));
            }
            require_opt(&mut errors, "uf", self.uf.as_deref(), "Selecione um UF.");
            check_format(&mut errors, "uf", self.uf.as_deref().unwrap_or_default(), validation::is_uf, "Selecione um UF.");
            require_opt(&mut errors, "city", self.city.as_deref(), "Selecione uma cidade.");
        }
        errors
    }

    /// `"{address}, {city}, {uf}, {cep}"`.
    fn composed_address(&self) -> String {
        let parts = [
            Some(self.address.trim()),
            self.city.as_deref().map(str::trim),
            self.uf.as_deref().map(str::trim),
            self.cep.as_deref().map(str::trim),
        ];
        parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn into_model(self, id: String, address: String, status: RecordStatus) -> clients::Model {
        // Only the identifier matching the client type is kept.
        let (cpf, cnpj) = match self.client_type {
            ClientType::Fisica => (clean_opt(self.cpf), None),
            ClientType::Juridica => (None, clean_opt(self.cnpj)),
        };
        clients::Model {
            id,
            client_type: self.client_type,
            company_name: self.company_name.trim().to_string(),
            contact_name: self.contact_name.trim().to_string(),
            cpf,
            cnpj,
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address,
            observations: clean_opt(self.observations),
            status,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientOverview {
    pub client: clients::Model,
    pub equipment: Vec<equipment::Model>,
    pub orders: Vec<service_orders::Model>,
}

pub async fn list(repos: &Repositories, include_archived: bool) -> Result<Vec<clients::Model>, AppError> {
    let mut clients = if include_archived {
        repos.clients.get_all().await?
    } else {
        repos.clients.get_filtered(RecordFilter::Active).await?
    };
    clients.sort_by_key(|c| c.display_name().to_lowercase());
    Ok(clients)
}

pub async fn get(repos: &Repositories, id: &str) -> Result<clients::Model, AppError> {
    repos
        .clients
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
}

pub async fn create(repos: &Repositories, input: ClientInput) -> Result<clients::Model, AppError> {
    AppError::check(input.validate(true))?;
    let address = input.composed_address();
    let status = input.status.unwrap_or_default();
    let client = repos
        .clients
        .put(input.into_model(String::new(), address, status))
        .await?;
    log::info!("Created client {} ({})", client.id, client.display_name());
    Ok(client)
}

/// Full overwrite. Status and creation time carry over unless the payload sets a status.
pub async fn update(repos: &Repositories, id: &str, input: ClientInput) -> Result<clients::Model, AppError> {
    let existing = get(repos, id).await?;
    AppError::check(input.validate(false))?;

    let address = input.address.trim().to_string();
    let status = input.status.unwrap_or(existing.status);
    let mut client = input.into_model(existing.id, address, status);
    client.created_at = existing.created_at;
    client.updated_at = Some(chrono::Utc::now());
    Ok(repos.clients.put(client).await?)
}

pub async fn archive(repos: &Repositories, id: &str) -> Result<clients::Model, AppError> {
    let client = repos.clients.patch_status(id, RecordStatus::Archived).await?;
    log::info!("Archived client {}", id);
    Ok(client)
}

pub async fn restore(repos: &Repositories, id: &str) -> Result<clients::Model, AppError> {
    Ok(repos.clients.patch_status(id, RecordStatus::Active).await?)
}

pub async fn delete(repos: &Repositories, id: &str) -> Result<(), AppError> {
    repos.clients.delete(id).await?;
    log::warn!("Permanently deleted client {}", id);
    Ok(())
}

/// The client with its equipment and every order placed for it.
pub async fn overview(repos: &Repositories, id: &str) -> Result<ClientOverview, AppError> {
    let client = get(repos, id).await?;

    let equipment = repos
        .equipment
        .get_all()
        .await?
        .into_iter()
        .filter(|e| e.owner_id == client.id)
        .collect::<Vec<_>>();

    let mut orders = repos
        .orders
        .get_all()
        .await?
        .into_iter()
        .filter(|o| o.client_id == client.id)
        .collect::<Vec<_>>();
    orders.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));

    Ok(ClientOverview {
        client,
        equipment,
        orders,
    })
}
