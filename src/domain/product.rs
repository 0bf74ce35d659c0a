//! Product catalog entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::MAX_PRODUCT_NAME_LENGTH;
use crate::errors::{AppError, AppResult};

text_enum! {
    /// Unit a product is traded in
    pub enum UnitType {
        Piece => "PIECE",
        Gram => "GRAM",
        Kilogram => "KILOGRAM",
        MetricTon => "METRIC_TON",
    }
}

text_enum! {
    pub enum ProductType {
        Grain => "GRAIN",
        Fruit => "FRUIT",
        Vegetable => "VEGETABLE",
        Dairy => "DAIRY",
        Meat => "MEAT",
        Poultry => "POULTRY",
        Seafood => "SEAFOOD",
        Bakery => "BAKERY",
        Beverage => "BEVERAGE",
        Spice => "SPICE",
        Other => "OTHER",
    }
}

impl UnitType {
    /// Short label appended to the searchable name.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            UnitType::MetricTon => "t",
            UnitType::Kilogram => "kg",
            UnitType::Gram => "g",
            UnitType::Piece => "uni.",
        }
    }
}

/// `"{name} ({unit})"`, e.g. `"Arroz (kg)"`.
pub fn search_name(name: &str, unit_type: UnitType) -> String {
    format!("{} ({})", name, unit_type.abbreviation())
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("Product name is required"));
    }
    if name.chars().count() > MAX_PRODUCT_NAME_LENGTH as usize {
        return Err(AppError::validation(format!(
            "Product name must be shorter than {} characters",
            MAX_PRODUCT_NAME_LENGTH
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit_type: UnitType,
    pub product_type: ProductType,
    /// Blob names inside the product images bucket
    pub images: Vec<String>,
    pub search_name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(input: CreateProduct) -> AppResult<Self> {
        let name = input.name.trim().to_string();
        validate_name(&name)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            search_name: search_name(&name, input.unit_type),
            name,
            unit_type: input.unit_type,
            product_type: input.product_type,
            images: Vec::new(),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply changes and keep `search_name` in sync.
    pub fn apply(&mut self, changes: UpdateProduct) -> AppResult<()> {
        if let Some(name) = changes.name {
            let name = name.trim().to_string();
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(unit_type) = changes.unit_type {
            self.unit_type = unit_type;
        }
        if let Some(product_type) = changes.product_type {
            self.product_type = product_type;
        }
        self.search_name = search_name(&self.name, self.unit_type);
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateProduct {
    #[validate(length(min = 1, max = 256, message = "Product name must have 1 to 256 characters"))]
    #[schema(example = "Arroz agulhinha")]
    pub name: String,
    pub unit_type: UnitType,
    pub product_type: ProductType,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProduct {
    #[validate(length(min = 1, max = 256, message = "Product name must have 1 to 256 characters"))]
    pub name: Option<String>,
    pub unit_type: Option<UnitType>,
    pub product_type: Option<ProductType>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    pub name: String,
    pub unit_type: UnitType,
    pub product_type: ProductType,
    pub images: Vec<String>,
    #[schema(example = "Arroz agulhinha (kg)")]
    pub search_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            unit_type: product.unit_type,
            product_type: product.product_type,
            images: product.images,
            search_name: product.search_name,
            created_at: product.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> Product {
        Product::new(CreateProduct {
            name: "Arroz".to_string(),
            unit_type: UnitType::Kilogram,
            product_type: ProductType::Grain,
        })
        .unwrap()
    }

    #[test]
    fn search_name_uses_unit_abbreviation() {
        assert_eq!(search_name("Arroz", UnitType::Kilogram), "Arroz (kg)");
        assert_eq!(search_name("Soja", UnitType::MetricTon), "Soja (t)");
        assert_eq!(search_name("Açafrão", UnitType::Gram), "Açafrão (g)");
        assert_eq!(search_name("Abacaxi", UnitType::Piece), "Abacaxi (uni.)");
    }

    #[test]
    fn search_name_follows_updates() {
        let mut product = rice();
        product
            .apply(UpdateProduct {
                unit_type: Some(UnitType::MetricTon),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(product.search_name, "Arroz (t)");
    }

    #[test]
    fn blank_and_oversized_names_are_rejected() {
        let blank = CreateProduct {
            name: "   ".to_string(),
            unit_type: UnitType::Piece,
            product_type: ProductType::Fruit,
        };
        assert!(Product::new(blank).is_err());

        let mut product = rice();
        let result = product.apply(UpdateProduct {
            name: Some("x".repeat(257)),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(product.name, "Arroz");
    }
}
