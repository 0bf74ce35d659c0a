//! Postal code (CEP) lookup against ViaCEP.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ensure_success, non_empty};
use crate::domain::{normalize_zip_code, AddressDraft};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PostalCodeLookup: Send + Sync {
    /// Resolve a CEP into a partially filled address.
    ///
    /// Unknown CEPs are NotFound, provider failures ExternalService.
    async fn lookup(&self, zip_code: &str) -> AppResult<AddressDraft>;
}

#[derive(Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    base_url: String,
}

impl ViaCepClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    erro: Option<Value>,
    cep: Option<String>,
    logradouro: Option<String>,
    complemento: Option<String>,
    bairro: Option<String>,
    localidade: Option<String>,
    uf: Option<String>,
}

impl ViaCepPayload {
    /// ViaCEP answers unknown codes with 200 and `"erro": true` (or `"true"`)
    fn is_error(&self) -> bool {
        match &self.erro {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => text.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    fn into_draft(self, requested: &str) -> AddressDraft {
        let zip_code = self
            .cep
            .map(|cep| cep.chars().filter(char::is_ascii_digit).collect())
            .unwrap_or_else(|| requested.to_string());

        AddressDraft {
            zip_code,
            street_address: self.logradouro.unwrap_or_default(),
            neighbourhood: self.bairro.unwrap_or_default(),
            city: self.localidade.unwrap_or_default(),
            province: self.uf.unwrap_or_default(),
            number: String::new(),
            additional_info: non_empty(self.complemento).unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PostalCodeLookup for ViaCepClient {
    async fn lookup(&self, zip_code: &str) -> AppResult<AddressDraft> {
        let cep = normalize_zip_code(zip_code)?;
        tracing::info!(cep = %cep, "Requesting postal code");

        let response = self
            .http
            .get(format!("{}/{}/json/", self.base_url, cep))
            .send()
            .await?;
        let payload: ViaCepPayload = ensure_success(response, "Postal code")
            .await?
            .json()
            .await?;

        if payload.is_error() {
            tracing::info!(cep = %cep, "Postal code not found");
            return Err(AppError::not_found(format!("Zip code {}", cep)));
        }

        Ok(payload.into_draft(&cep))
    }
}
