//! Base repository traits shared by every table.
//!
//! Rows are never removed: deleting flips `active` to false and every read
//! filters on `active = true`. The traits are split by concern so a store
//! can opt into only what it needs.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Select,
};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Columns every soft-deletable table carries.
pub trait SoftDeletable: EntityTrait {
    /// Human readable entity name used in not-found errors
    const LABEL: &'static str;

    fn id_column() -> Self::Column;
    fn active_column() -> Self::Column;
    fn created_at_column() -> Self::Column;
    fn updated_at_column() -> Self::Column;
}

/// Read operations over active rows
#[async_trait]
pub trait ReadRepository<E>: Send + Sync
where
    E: SoftDeletable,
    E::Model: FromQueryResult + Send + Sync,
{
    fn db(&self) -> &DatabaseConnection;

    /// Find an active row by id
    async fn find_active(&self, id: Uuid) -> AppResult<Option<E::Model>> {
        E::find()
            .filter(E::id_column().eq(id))
            .filter(E::active_column().eq(true))
            .one(self.db())
            .await
            .map_err(Into::into)
    }

    /// One page of active rows, newest first, plus the total count
    async fn find_active_page(&self, params: PaginationParams) -> AppResult<(Vec<E::Model>, u64)> {
        self.paginate_active(E::find(), params).await
    }

    /// Paginate an arbitrary query, restricted to active rows
    async fn paginate_active(
        &self,
        query: Select<E>,
        params: PaginationParams,
    ) -> AppResult<(Vec<E::Model>, u64)> {
        let paginator = query
            .filter(E::active_column().eq(true))
            .order_by_desc(E::created_at_column())
            .paginate(self.db(), params.limit());
        let total = paginator.num_items().await?;
        let data = paginator.fetch_page(params.page_index()).await?;
        Ok((data, total))
    }
}

/// Write operations
#[async_trait]
pub trait WriteRepository<E, A>: Send + Sync
where
    E: SoftDeletable,
    E::Model: IntoActiveModel<A> + Send + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
{
    fn db(&self) -> &DatabaseConnection;

    /// Insert a fully populated active model
    async fn insert_model(&self, model: A) -> AppResult<E::Model> {
        model.insert(self.db()).await.map_err(Into::into)
    }

    /// Persist every set column of an existing row
    async fn update_model(&self, model: A) -> AppResult<E::Model> {
        model.update(self.db()).await.map_err(|e| match e {
            sea_orm::DbErr::RecordNotUpdated => AppError::not_found(E::LABEL),
            other => other.into(),
        })
    }
}

/// Soft delete
#[async_trait]
pub trait DeleteRepository<E>: Send + Sync
where
    E: SoftDeletable,
{
    fn db(&self) -> &DatabaseConnection;

    /// Mark an active row inactive. Missing or already inactive rows are NotFound.
    async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = E::update_many()
            .col_expr(E::active_column(), Expr::value(false))
            .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
            .filter(E::id_column().eq(id))
            .filter(E::active_column().eq(true))
            .exec(self.db())
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found(E::LABEL));
        }
        Ok(())
    }
}
