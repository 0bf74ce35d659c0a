//! Demand entity: a store asking for a quantity of a product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::product::{Product, ProductResponse, ProductType};
use super::store::{Store, StoreSummary};
use super::user::{User, UserResponse};
use crate::errors::{AppError, AppResult};

text_enum! {
    pub enum DemandStatus {
        Opened => "OPENED",
        Closed => "CLOSED",
        Canceled => "CANCELED",
    }
}

fn validate_counts(needed_count: i32, minimum_count: i32) -> AppResult<()> {
    if needed_count < 1 {
        return Err(AppError::validation("Needed count must be at least 1"));
    }
    if minimum_count < 1 {
        return Err(AppError::validation("Minimum count must be at least 1"));
    }
    if minimum_count > needed_count {
        return Err(AppError::validation(
            "Minimum count cannot exceed the needed count",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demand {
    pub id: Uuid,
    pub store_id: Uuid,
    pub product_id: Uuid,
    pub responsible_id: Uuid,
    pub needed_count: i32,
    pub minimum_count: i32,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub status: DemandStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Demand {
    /// New demands always start OPENED.
    pub fn new(input: CreateDemand, responsible_id: Uuid) -> AppResult<Self> {
        let minimum_count = input.minimum_count.unwrap_or(1);
        validate_counts(input.needed_count, minimum_count)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            store_id: input.store_id,
            product_id: input.product_id,
            responsible_id,
            needed_count: input.needed_count,
            minimum_count,
            description: input.description.unwrap_or_default(),
            deadline: input.deadline,
            status: DemandStatus::Opened,
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(&mut self, changes: UpdateDemand) -> AppResult<()> {
        let needed_count = changes.needed_count.unwrap_or(self.needed_count);
        let minimum_count = changes.minimum_count.unwrap_or(self.minimum_count);
        validate_counts(needed_count, minimum_count)?;

        self.needed_count = needed_count;
        self.minimum_count = minimum_count;
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(deadline) = changes.deadline {
            self.deadline = deadline;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(responsible_id) = changes.responsible_id {
            self.responsible_id = responsible_id;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDemand {
    pub store_id: Uuid,
    pub product_id: Uuid,
    /// Defaults to the requesting user
    pub responsible_id: Option<Uuid>,
    #[validate(range(min = 1, message = "Needed count must be at least 1"))]
    #[schema(example = 50)]
    pub needed_count: i32,
    #[validate(range(min = 1, message = "Minimum count must be at least 1"))]
    #[schema(example = 10)]
    pub minimum_count: Option<i32>,
    #[validate(length(max = 512, message = "Description must be shorter than 512 characters"))]
    pub description: Option<String>,
    pub deadline: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateDemand {
    pub responsible_id: Option<Uuid>,
    #[validate(range(min = 1, message = "Needed count must be at least 1"))]
    pub needed_count: Option<i32>,
    #[validate(range(min = 1, message = "Minimum count must be at least 1"))]
    pub minimum_count: Option<i32>,
    #[validate(length(max = 512, message = "Description must be shorter than 512 characters"))]
    pub description: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<DemandStatus>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DemandResponse {
    pub id: Uuid,
    pub store: StoreSummary,
    pub product: ProductResponse,
    pub responsible: UserResponse,
    pub needed_count: i32,
    pub minimum_count: i32,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub status: DemandStatus,
    /// Distance from the requesting store, only for nearby listings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl DemandResponse {
    pub fn assemble(
        demand: Demand,
        store: &Store,
        product: Product,
        responsible: User,
        distance_meters: Option<f64>,
    ) -> Self {
        Self {
            id: demand.id,
            store: StoreSummary::from(store),
            product: ProductResponse::from(product),
            responsible: UserResponse::from(responsible),
            needed_count: demand.needed_count,
            minimum_count: demand.minimum_count,
            description: demand.description,
            deadline: demand.deadline,
            status: demand.status,
            distance_meters,
            created_at: demand.created_at,
        }
    }
}

/// Flattened demand card shown in the reel feed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PostResponse {
    pub demand_id: Uuid,
    pub store_id: Uuid,
    pub store_name: String,
    pub product_name: String,
    pub product_type: ProductType,
    pub product_images: Vec<String>,
    pub needed_count: i32,
    pub minimum_count: i32,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub status: DemandStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
}

impl From<DemandResponse> for PostResponse {
    fn from(demand: DemandResponse) -> Self {
        Self {
            demand_id: demand.id,
            store_id: demand.store.id,
            store_name: demand.store.trade_name,
            product_name: demand.product.search_name,
            product_type: demand.product.product_type,
            product_images: demand.product.images,
            needed_count: demand.needed_count,
            minimum_count: demand.minimum_count,
            description: demand.description,
            deadline: demand.deadline,
            status: demand.status,
            distance_meters: demand.distance_meters,
        }
    }
}
