//! Demand repository, including the radius search over store addresses.

use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use super::base::{DeleteRepository, ReadRepository, WriteRepository};
use super::entities::demand::{self, ActiveModel, Entity as DemandEntity};
use super::entities::{address, product, store, user};
use crate::config::EARTH_RADIUS_METERS;
use crate::domain::{Coordinates, Demand, DemandStatus, ProductType};
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Which demands a listing covers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DemandScope {
    /// Demands published by one store
    Store(Uuid),
    /// Demands of other stores whose address lies within `radius_meters` of `origin`
    Nearby {
        origin: Coordinates,
        radius_meters: f64,
        exclude_store: Uuid,
    },
}

/// Optional narrowing of a demand listing. `None` matches anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemandFilter {
    pub status: Option<DemandStatus>,
    pub product_type: Option<ProductType>,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DemandRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Demand>>;

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Demand>, u64)>;

    async fn list_by_scope(
        &self,
        scope: DemandScope,
        filter: DemandFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Demand>, u64)>;

    async fn create(&self, demand: Demand) -> AppResult<Demand>;

    async fn update(&self, demand: Demand) -> AppResult<Demand>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct DemandStore {
    db: DatabaseConnection,
}

impl DemandStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<DemandEntity> for DemandStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<DemandEntity, ActiveModel> for DemandStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<DemandEntity> for DemandStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Great-circle distance between the joined address and the bound origin,
/// compared against the bound radius. Binds: latitude, latitude, longitude, radius.
fn within_radius_sql() -> String {
    format!(
        "2 * {EARTH_RADIUS_METERS} * asin(least(1, sqrt(\
         power(sin(radians(\"addresses\".\"latitude\" - ?) / 2), 2) + \
         cos(radians(?)) * cos(radians(\"addresses\".\"latitude\")) * \
         power(sin(radians(\"addresses\".\"longitude\" - ?) / 2), 2)))) <= ?"
    )
}

/// Restrict to demands whose store, product and responsible user are all active.
fn with_live_relations(query: Select<DemandEntity>) -> Select<DemandEntity> {
    query
        .join(JoinType::InnerJoin, demand::Relation::Store.def())
        .join(JoinType::InnerJoin, demand::Relation::Product.def())
        .join(JoinType::InnerJoin, demand::Relation::Responsible.def())
        .filter(store::Column::Active.eq(true))
        .filter(product::Column::Active.eq(true))
        .filter(user::Column::Active.eq(true))
}

fn into_demands(models: Vec<demand::Model>) -> AppResult<Vec<Demand>> {
    models.into_iter().map(Demand::try_from).collect()
}

#[async_trait]
impl DemandRepository for DemandStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Demand>> {
        self.find_active(id).await?.map(Demand::try_from).transpose()
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Demand>, u64)> {
        let query = with_live_relations(DemandEntity::find());
        let (models, total) = self.paginate_active(query, params).await?;
        Ok((into_demands(models)?, total))
    }

    async fn list_by_scope(
        &self,
        scope: DemandScope,
        filter: DemandFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Demand>, u64)> {
        let mut query = with_live_relations(DemandEntity::find());

        query = match scope {
            DemandScope::Store(store_id) => query.filter(demand::Column::StoreId.eq(store_id)),
            DemandScope::Nearby {
                origin,
                radius_meters,
                exclude_store,
            } => query
                .join(JoinType::InnerJoin, store::Relation::Address.def())
                .filter(demand::Column::StoreId.ne(exclude_store))
                .filter(address::Column::Latitude.is_not_null())
                .filter(address::Column::Longitude.is_not_null())
                .filter(Expr::cust_with_values(
                    within_radius_sql(),
                    [
                        origin.latitude,
                        origin.latitude,
                        origin.longitude,
                        radius_meters,
                    ],
                )),
        };

        if let Some(status) = filter.status {
            query = query.filter(demand::Column::Status.eq(status.as_str()));
        }
        if let Some(product_type) = filter.product_type {
            query = query.filter(product::Column::ProductType.eq(product_type.as_str()));
        }

        let (models, total) = self.paginate_active(query, params).await?;
        Ok((into_demands(models)?, total))
    }

    async fn create(&self, demand: Demand) -> AppResult<Demand> {
        Demand::try_from(self.insert_model(ActiveModel::from(demand)).await?)
    }

    async fn update(&self, demand: Demand) -> AppResult<Demand> {
        Demand::try_from(self.update_model(ActiveModel::from(demand)).await?)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.deactivate(id).await
    }
}
