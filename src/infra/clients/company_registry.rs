//! Company registry (CNPJ) lookup against ReceitaWS.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use super::{ensure_success, non_empty};
use crate::domain::{normalize_cnpj, AddressDraft, StoreDraft};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CompanyRegistry: Send + Sync {
    /// Registry data for a CNPJ, shaped as store form defaults.
    async fn lookup(&self, cnpj: &str) -> AppResult<StoreDraft>;
}

#[derive(Clone)]
pub struct ReceitaWsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReceitaWsClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Activity {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryPayload {
    status: Option<String>,
    message: Option<String>,
    cnpj: Option<String>,
    nome: Option<String>,
    fantasia: Option<String>,
    telefone: Option<String>,
    email: Option<String>,
    abertura: Option<String>,
    porte: Option<String>,
    natureza_juridica: Option<String>,
    #[serde(default)]
    atividade_principal: Vec<Activity>,
    tipo: Option<String>,
    logradouro: Option<String>,
    numero: Option<String>,
    complemento: Option<String>,
    bairro: Option<String>,
    municipio: Option<String>,
    uf: Option<String>,
    cep: Option<String>,
}

fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

impl RegistryPayload {
    fn into_draft(self, requested: &str) -> AppResult<StoreDraft> {
        if self.status.as_deref() == Some("ERROR") {
            let message = self
                .message
                .unwrap_or_else(|| "Unknown registry error".to_string());
            tracing::error!(cnpj = requested, message = %message, "Company registry rejected lookup");
            return Err(AppError::external(message));
        }

        // registry format is dd/mm/YYYY
        let opening_date = non_empty(self.abertura)
            .and_then(|raw| NaiveDate::parse_from_str(&raw, "%d/%m/%Y").ok());

        let legal_name = self.nome.unwrap_or_default();
        let trade_name = non_empty(self.fantasia).unwrap_or_else(|| legal_name.clone());

        Ok(StoreDraft {
            cnpj: self
                .cnpj
                .map(|c| digits(&c))
                .unwrap_or_else(|| requested.to_string()),
            trade_name,
            legal_name,
            legal_phone_contact: non_empty(self.telefone),
            legal_email_contact: non_empty(self.email),
            opening_date,
            size: non_empty(self.porte),
            legal_nature: non_empty(self.natureza_juridica),
            cnae_code: self
                .atividade_principal
                .into_iter()
                .next()
                .and_then(|activity| non_empty(activity.code)),
            branch_classification: non_empty(self.tipo),
            address: AddressDraft {
                zip_code: self.cep.map(|c| digits(&c)).unwrap_or_default(),
                street_address: self.logradouro.unwrap_or_default(),
                neighbourhood: self.bairro.unwrap_or_default(),
                city: self.municipio.unwrap_or_default(),
                province: self.uf.unwrap_or_default(),
                number: self.numero.unwrap_or_default(),
                additional_info: non_empty(self.complemento).unwrap_or_default(),
            },
        })
    }
}

#[async_trait]
impl CompanyRegistry for ReceitaWsClient {
    async fn lookup(&self, cnpj: &str) -> AppResult<StoreDraft> {
        let cnpj = normalize_cnpj(cnpj)?;
        tracing::info!(cnpj = %cnpj, "Requesting company registry");

        let response = self
            .http
            .get(format!("{}/cnpj/{}", self.base_url, cnpj))
            .send()
            .await?;
        let payload: RegistryPayload = ensure_success(response, "Company registry")
            .await?
            .json()
            .await?;

        payload.into_draft(&cnpj)
    }
}
