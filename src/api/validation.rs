//! Field validators for incoming DTOs. Each helper pushes a [`FieldError`]
//! instead of failing fast so a form gets every problem back at once.

use regex::Regex;

use crate::errors::FieldError;

lazy_static::lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref PHONE_RE: Regex = Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").unwrap();
    static ref CPF_RE: Regex = Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").unwrap();
    static ref CNPJ_RE: Regex = Regex::new(r"^\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2}$").unwrap();
    static ref CEP_RE: Regex = Regex::new(r"^\d{5}-\d{3}$").unwrap();
    static ref UF_RE: Regex = Regex::new(r"^[A-Z]{2}$").unwrap();
}

pub fn is_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// `(NN) NNNN-NNNN` or `(NN) NNNNN-NNNN`.
pub fn is_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_cpf(cpf: &str) -> bool {
    CPF_RE.is_match(cpf)
}

pub fn is_cnpj(cnpj: &str) -> bool {
    CNPJ_RE.is_match(cnpj)
}

pub fn is_cep(cep: &str) -> bool {
    CEP_RE.is_match(cep)
}

pub fn is_uf(uf: &str) -> bool {
    UF_RE.is_match(uf)
}

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

pub fn require(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

pub fn require_opt(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>, message: &str) {
    require(errors, field, value.unwrap_or_default(), message);
}

/// Runs `check` only when the value is present and non-blank.
pub fn check_format(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    check: fn(&str) -> bool,
    message: &str,
) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !check(trimmed) {
        errors.push(FieldError::new(field, message));
    }
}

pub fn max_len(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if !ensure_max_len(value, max) {
        errors.push(FieldError::new(
            field,
            format!("Deve ter no máximo {} caracteres.", max),
        ));
    }
}

pub fn non_negative(errors: &mut Vec<FieldError>, field: &str, value: Option<f64>) {
    if let Some(v) = value {
        if !v.is_finite() || v < 0.0 {
            errors.push(FieldError::new(field, "Valor deve ser >= 0."));
        }
    }
}

/// Blank strings become `None`, everything else is trimmed.
pub fn clean_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
