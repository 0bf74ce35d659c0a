//! Store entity: a registered business owned by a user.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::address::AddressDraft;
use crate::errors::{AppError, AppResult};

text_enum! {
    /// Suppliers browse nearby demands, retailers publish them.
    pub enum StoreType {
        Supplier => "SUPPLIER",
        Retailer => "RETAILER",
    }
}

const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

/// Strip punctuation from a CNPJ and verify both check digits.
pub fn normalize_cnpj(raw: &str) -> AppResult<String> {
    let invalid = || AppError::validation("Invalid CNPJ");

    if !raw
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '/' | '-' | ' '))
    {
        return Err(invalid());
    }
    let digits: Vec<u32> = raw.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 14 || digits.iter().all(|d| *d == digits[0]) {
        return Err(invalid());
    }
    if cnpj_check_digit(&digits[..12], &CNPJ_FIRST_WEIGHTS) != digits[12]
        || cnpj_check_digit(&digits[..13], &CNPJ_SECOND_WEIGHTS) != digits[13]
    {
        return Err(invalid());
    }

    Ok(digits.iter().map(|d| char::from_digit(*d, 10).unwrap_or('0')).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: Uuid,
    pub cnpj: String,
    pub trade_name: String,
    pub legal_name: String,
    pub legal_phone_contact: Option<String>,
    pub preferred_phone_contact: Option<String>,
    pub legal_email_contact: Option<String>,
    pub preferred_email_contact: Option<String>,
    /// Blob names inside the store images bucket
    pub images: Vec<String>,
    pub reputation: f64,
    pub store_type: StoreType,
    pub opening_date: Option<NaiveDate>,
    pub size: Option<String>,
    pub legal_nature: Option<String>,
    pub cnae_code: Option<String>,
    pub branch_classification: Option<String>,
    pub owner_id: Uuid,
    pub address_id: Uuid,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn new(input: CreateStore, owner_id: Uuid) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            cnpj: normalize_cnpj(&input.cnpj)?,
            trade_name: input.trade_name,
            legal_name: input.legal_name,
            legal_phone_contact: input.legal_phone_contact,
            preferred_phone_contact: input.preferred_phone_contact,
            legal_email_contact: input.legal_email_contact,
            preferred_email_contact: input.preferred_email_contact,
            images: Vec::new(),
            reputation: input.reputation.unwrap_or(0.0),
            store_type: input.store_type,
            opening_date: input.opening_date,
            size: input.size,
            legal_nature: input.legal_nature,
            cnae_code: input.cnae_code,
            branch_classification: input.branch_classification,
            owner_id,
            address_id: input.address_id,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    pub fn apply(&mut self, changes: UpdateStore) {
        if let Some(trade_name) = changes.trade_name {
            self.trade_name = trade_name;
        }
        if let Some(legal_name) = changes.legal_name {
            self.legal_name = legal_name;
        }
        if changes.legal_phone_contact.is_some() {
            self.legal_phone_contact = changes.legal_phone_contact;
        }
        if changes.preferred_phone_contact.is_some() {
            self.preferred_phone_contact = changes.preferred_phone_contact;
        }
        if changes.legal_email_contact.is_some() {
            self.legal_email_contact = changes.legal_email_contact;
        }
        if changes.preferred_email_contact.is_some() {
            self.preferred_email_contact = changes.preferred_email_contact;
        }
        if let Some(reputation) = changes.reputation {
            self.reputation = reputation;
        }
        if let Some(store_type) = changes.store_type {
            self.store_type = store_type;
        }
        if let Some(address_id) = changes.address_id {
            self.address_id = address_id;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateStore {
    #[schema(example = "11.222.333/0001-81")]
    pub cnpj: String,
    #[validate(length(min = 1, max = 256, message = "Trade name is required"))]
    #[schema(example = "Hortifruti Bela Vista")]
    pub trade_name: String,
    #[validate(length(min = 1, max = 256, message = "Legal name is required"))]
    pub legal_name: String,
    #[validate(length(max = 32))]
    pub legal_phone_contact: Option<String>,
    #[validate(length(max = 32))]
    pub preferred_phone_contact: Option<String>,
    #[validate(email(message = "Invalid legal email"))]
    pub legal_email_contact: Option<String>,
    #[validate(email(message = "Invalid preferred email"))]
    pub preferred_email_contact: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Reputation must be between 0 and 5"))]
    pub reputation: Option<f64>,
    pub store_type: StoreType,
    pub opening_date: Option<NaiveDate>,
    pub size: Option<String>,
    pub legal_nature: Option<String>,
    pub cnae_code: Option<String>,
    pub branch_classification: Option<String>,
    /// Defaults to the requesting user
    pub owner_id: Option<Uuid>,
    pub address_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStore {
    #[validate(length(min = 1, max = 256))]
    pub trade_name: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub legal_name: Option<String>,
    #[validate(length(max = 32))]
    pub legal_phone_contact: Option<String>,
    #[validate(length(max = 32))]
    pub preferred_phone_contact: Option<String>,
    #[validate(email(message = "Invalid legal email"))]
    pub legal_email_contact: Option<String>,
    #[validate(email(message = "Invalid preferred email"))]
    pub preferred_email_contact: Option<String>,
    #[validate(range(min = 0.0, max = 5.0, message = "Reputation must be between 0 and 5"))]
    pub reputation: Option<f64>,
    pub store_type: Option<StoreType>,
    pub address_id: Option<Uuid>,
}

/// Store fields resolved from the company registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct StoreDraft {
    pub cnpj: String,
    pub trade_name: String,
    pub legal_name: String,
    pub legal_phone_contact: Option<String>,
    pub legal_email_contact: Option<String>,
    pub opening_date: Option<NaiveDate>,
    pub size: Option<String>,
    pub legal_nature: Option<String>,
    pub cnae_code: Option<String>,
    pub branch_classification: Option<String>,
    pub address: AddressDraft,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreResponse {
    pub id: Uuid,
    pub cnpj: String,
    pub trade_name: String,
    pub legal_name: String,
    pub legal_phone_contact: Option<String>,
    pub preferred_phone_contact: Option<String>,
    pub legal_email_contact: Option<String>,
    pub preferred_email_contact: Option<String>,
    pub images: Vec<String>,
    pub reputation: f64,
    pub store_type: StoreType,
    pub opening_date: Option<NaiveDate>,
    pub size: Option<String>,
    pub legal_nature: Option<String>,
    pub cnae_code: Option<String>,
    pub branch_classification: Option<String>,
    pub owner_id: Uuid,
    pub address_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<Store> for StoreResponse {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            cnpj: store.cnpj,
            trade_name: store.trade_name,
            legal_name: store.legal_name,
            legal_phone_contact: store.legal_phone_contact,
            preferred_phone_contact: store.preferred_phone_contact,
            legal_email_contact: store.legal_email_contact,
            preferred_email_contact: store.preferred_email_contact,
            images: store.images,
            reputation: store.reputation,
            store_type: store.store_type,
            opening_date: store.opening_date,
            size: store.size,
            legal_nature: store.legal_nature,
            cnae_code: store.cnae_code,
            branch_classification: store.branch_classification,
            owner_id: store.owner_id,
            address_id: store.address_id,
            created_at: store.created_at,
        }
    }
}

/// Compact store view embedded in demand listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoreSummary {
    pub id: Uuid,
    pub trade_name: String,
    pub store_type: StoreType,
    pub reputation: f64,
}

impl From<&Store> for StoreSummary {
    fn from(store: &Store) -> Self {
        Self {
            id: store.id,
            trade_name: store.trade_name.clone(),
            store_type: store.store_type,
            reputation: store.reputation,
        }
    }
}
