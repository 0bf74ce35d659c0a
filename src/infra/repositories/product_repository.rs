//! Product repository with name search.

use async_trait::async_trait;
use sea_orm::{
    sea_query::{Expr, Func},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};
use uuid::Uuid;

use super::base::{DeleteRepository, ReadRepository, WriteRepository};
use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Product, ProductType};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>>;

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Product>, u64)>;

    /// Case-insensitive substring match on `search_name`
    async fn search(
        &self,
        name: String,
        product_type: Option<ProductType>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn create(&self, product: Product) -> AppResult<Product>;

    async fn update(&self, product: Product) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<ProductEntity> for ProductStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<ProductEntity, ActiveModel> for ProductStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<ProductEntity> for ProductStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// `%term%` with LIKE wildcards in the user input escaped.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn into_products(models: Vec<product::Model>) -> AppResult<Vec<Product>> {
    models.into_iter().map(Product::try_from).collect()
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Product>> {
        self.find_active(id).await?.map(Product::try_from).transpose()
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Product>, u64)> {
        let (models, total) = self.find_active_page(params).await?;
        Ok((into_products(models)?, total))
    }

    async fn search(
        &self,
        name: String,
        product_type: Option<ProductType>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        let mut query = ProductEntity::find().filter(
            Expr::expr(Func::lower(Expr::col((
                ProductEntity,
                product::Column::SearchName,
            ))))
            .like(like_pattern(&name)),
        );
        if let Some(product_type) = product_type {
            query = query.filter(product::Column::ProductType.eq(product_type.as_str()));
        }

        let (models, total) = self.paginate_active(query, params).await?;
        Ok((into_products(models)?, total))
    }

    async fn create(&self, product: Product) -> AppResult<Product> {
        Product::try_from(self.insert_model(ActiveModel::from(product)).await?)
    }

    async fn update(&self, product: Product) -> AppResult<Product> {
        Product::try_from(self.update_model(ActiveModel::from(product)).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.deactivate(id).await
    }
}
