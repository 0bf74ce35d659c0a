//! Demand service - sourcing requests published by stores.
//!
//! Retailers see their own demands; suppliers see the demands of other
//! stores within a radius of their own address, with the distance attached.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::config::{BUCKET_PRODUCT_IMAGES, DEFAULT_DEMAND_RADIUS_METERS, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};
use crate::domain::{
    haversine_distance_meters, Coordinates, CreateDemand, CurrentUser, Demand, DemandResponse,
    DemandStatus, PostResponse, Product, ProductType, Store, StoreType, UpdateDemand, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{DemandFilter, DemandScope, ObjectStorage, UnitOfWork};
use crate::services::{ensure_store_access, parallel};
use crate::types::{Paginated, PaginationParams};

/// Query of the store-scoped demand listing and the reel feed
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DemandListQuery {
    /// Store the listing is computed for
    pub store_id: Uuid,
    pub status: Option<DemandStatus>,
    pub product_type: Option<ProductType>,
    /// Search radius for suppliers, defaults to 10 km
    pub radius_meters: Option<f64>,
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_per_page() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl DemandListQuery {
    pub fn new(store_id: Uuid) -> Self {
        Self {
            store_id,
            status: None,
            product_type: None,
            radius_meters: None,
            page: DEFAULT_PAGE_NUMBER,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    fn filter(&self) -> DemandFilter {
        DemandFilter {
            status: self.status,
            product_type: self.product_type,
        }
    }

    fn radius(&self) -> AppResult<f64> {
        let radius = self.radius_meters.unwrap_or(DEFAULT_DEMAND_RADIUS_METERS);
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AppError::validation("Radius must be a positive number of meters"));
        }
        Ok(radius)
    }
}

#[async_trait]
pub trait DemandService: Send + Sync {
    async fn create(
        &self,
        requester: &CurrentUser,
        input: CreateDemand,
    ) -> AppResult<DemandResponse>;

    async fn get(&self, requester: &CurrentUser, id: Uuid) -> AppResult<DemandResponse>;

    /// Every active demand (admin)
    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<DemandResponse>>;

    async fn update(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        changes: UpdateDemand,
    ) -> AppResult<DemandResponse>;

    async fn delete(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()>;

    /// Demands relevant to one of the requester's stores
    async fn list_by_store(
        &self,
        requester: &CurrentUser,
        query: DemandListQuery,
    ) -> AppResult<Paginated<DemandResponse>>;

    /// Store listing flattened into feed cards with signed image URLs
    async fn reel_posts(
        &self,
        requester: &CurrentUser,
        query: DemandListQuery,
    ) -> AppResult<Paginated<PostResponse>>;
}

pub struct DemandManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> DemandManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }

    async fn find_store(&self, id: Uuid) -> AppResult<Store> {
        self.uow.stores().find_by_id(id).await?.ok_or_not_found("Store")
    }

    async fn find_product(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn find_responsible(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Responsible user")
    }

    async fn find_demand(&self, id: Uuid) -> AppResult<Demand> {
        self.uow
            .demands()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Demand")
    }

    /// Load a demand together with its store, enforcing store access.
    async fn find_accessible(&self, requester: &CurrentUser, id: Uuid) -> AppResult<(Demand, Store)> {
        let demand = self.find_demand(id).await?;
        let store = self.find_store(demand.store_id).await?;
        ensure_store_access(requester, &store)?;
        Ok((demand, store))
    }

    /// Attach store, product and responsible user; with an origin, the
    /// distance to the demand's store address as well.
    async fn expand(&self, demand: Demand, origin: Option<Coordinates>) -> AppResult<DemandResponse> {
        let (store, product, responsible) = parallel::join3(
            self.find_store(demand.store_id),
            self.find_product(demand.product_id),
            self.find_responsible(demand.responsible_id),
        )
        .await?;

        let distance_meters = match origin {
            Some(origin) => self
                .uow
                .addresses()
                .find_by_id(store.address_id)
                .await?
                .and_then(|address| address.coordinates())
                .map(|target| haversine_distance_meters(origin, target)),
            None => None,
        };

        Ok(DemandResponse::assemble(
            demand,
            &store,
            product,
            responsible,
            distance_meters,
        ))
    }

    async fn expand_page(
        &self,
        demands: Vec<Demand>,
        params: PaginationParams,
        total: u64,
        origin: Option<Coordinates>,
    ) -> AppResult<Paginated<DemandResponse>> {
        let results = futures::future::join_all(demands.into_iter().map(|demand| async move {
            let id = demand.id;
            (id, self.expand(demand, origin).await)
        }))
        .await;

        // A relation deactivated after the listing query drops that row only
        let mut expanded = Vec::with_capacity(results.len());
        let mut skipped = 0u64;
        for (demand_id, result) in results {
            match result {
                Ok(response) => expanded.push(response),
                Err(AppError::NotFound(missing)) => {
                    tracing::warn!(%demand_id, %missing, "Skipping demand with a deactivated relation");
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(Paginated::new(expanded, params, total.saturating_sub(skipped)))
    }

    /// Where a supplier searches from.
    async fn origin_of(&self, store: &Store) -> AppResult<Coordinates> {
        let address = self
            .uow
            .addresses()
            .find_by_id(store.address_id)
            .await?
            .ok_or_not_found("Address")?;
        address.coordinates().ok_or_else(|| {
            AppError::validation("Store address has no coordinates; update the address first")
        })
    }

    async fn into_post(&self, demand: DemandResponse) -> AppResult<PostResponse> {
        let images = parallel::join_all(
            demand
                .product
                .images
                .iter()
                .map(|blob| self.storage.signed_url(BUCKET_PRODUCT_IMAGES, blob))
                .collect(),
        )
        .await?;

        let mut post = PostResponse::from(demand);
        post.product_images = images;
        Ok(post)
    }
}

#[async_trait]
impl<U: UnitOfWork> DemandService for DemandManager<U> {
    async fn create(
        &self,
        requester: &CurrentUser,
        input: CreateDemand,
    ) -> AppResult<DemandResponse> {
        let store = self.find_store(input.store_id).await?;
        ensure_store_access(requester, &store)?;

        let responsible_id = input.responsible_id.unwrap_or(requester.id);
        parallel::join2(
            self.find_product(input.product_id),
            self.find_responsible(responsible_id),
        )
        .await?;

        let demand = self
            .uow
            .demands()
            .create(Demand::new(input, responsible_id)?)
            .await?;
        tracing::info!(
            demand_id = %demand.id,
            store_id = %demand.store_id,
            product_id = %demand.product_id,
            "Demand created"
        );
        self.expand(demand, None).await
    }

    async fn get(&self, requester: &CurrentUser, id: Uuid) -> AppResult<DemandResponse> {
        let (demand, _) = self.find_accessible(requester, id).await?;
        self.expand(demand, None).await
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<DemandResponse>> {
        let (demands, total) = self.uow.demands().list(params).await?;
        self.expand_page(demands, params, total, None).await
    }

    async fn update(
        &self,
        requester: &CurrentUser,
        id: Uuid,
        changes: UpdateDemand,
    ) -> AppResult<DemandResponse> {
        let (mut demand, _) = self.find_accessible(requester, id).await?;
        if let Some(responsible_id) = changes.responsible_id {
            self.find_responsible(responsible_id).await?;
        }
        demand.apply(changes)?;
        let demand = self.uow.demands().update(demand).await?;
        self.expand(demand, None).await
    }

    async fn delete(&self, requester: &CurrentUser, id: Uuid) -> AppResult<()> {
        self.find_accessible(requester, id).await?;
        self.uow.demands().delete(id).await?;
        tracing::info!(demand_id = %id, user_id = %requester.id, "Demand deactivated");
        Ok(())
    }

    async fn list_by_store(
        &self,
        requester: &CurrentUser,
        query: DemandListQuery,
    ) -> AppResult<Paginated<DemandResponse>> {
        let store = self.find_store(query.store_id).await?;
        ensure_store_access(requester, &store)?;

        let params = query.pagination();
        let (scope, origin) = match store.store_type {
            StoreType::Retailer => (DemandScope::Store(store.id), None),
            StoreType::Supplier => {
                let radius_meters = query.radius()?;
                let origin = self.origin_of(&store).await?;
                let scope = DemandScope::Nearby {
                    origin,
                    radius_meters,
                    exclude_store: store.id,
                };
                (scope, Some(origin))
            }
        };

        tracing::debug!(store_id = %store.id, ?scope, "Listing demands");
        let (demands, total) = self
            .uow
            .demands()
            .list_by_scope(scope, query.filter(), params)
            .await?;
        self.expand_page(demands, params, total, origin).await
    }

    async fn reel_posts(
        &self,
        requester: &CurrentUser,
        query: DemandListQuery,
    ) -> AppResult<Paginated<PostResponse>> {
        let page = self.list_by_store(requester, query).await?;
        let posts = parallel::join_all(
            page.data
                .into_iter()
                .map(|demand| self.into_post(demand))
                .collect(),
        )
        .await?;
        Ok(Paginated {
            data: posts,
            meta: page.meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserAccess;
    use crate::infra::Persistence;
    use crate::services::test_support::{
        requester, sample_address, sample_demand, sample_product, sample_store, sample_user,
        MockClients, MockUow,
    };

    const SAO_PAULO: Coordinates = Coordinates {
        latitude: -23.5505,
        longitude: -46.6333,
    };
    const GUARULHOS: Coordinates = Coordinates {
        latitude: -23.4543,
        longitude: -46.5337,
    };

    fn manager(uow: MockUow, storage: crate::infra::MockObjectStorage) -> DemandManager<Persistence> {
        DemandManager::new(uow.build(), Arc::new(storage))
    }

    /// Repositories answering every relation lookup of `expand`.
    fn with_relations(uow: &mut MockUow, store: Store, owner: User, address_coordinates: Option<Coordinates>) {
        let product = sample_product();
        uow.stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(owner.clone())));
        uow.addresses
            .expect_find_by_id()
            .returning(move |_| Ok(Some(sample_address(address_coordinates))));
    }

    #[tokio::test]
    async fn create_defaults_responsible_to_requester() {
        let owner = sample_user(UserAccess::StoreOwner);
        let store = sample_store(owner.id, StoreType::Retailer, Uuid::new_v4());
        let store_id = store.id;
        let owner_id = owner.id;

        let mut uow = MockUow::default();
        with_relations(&mut uow, store, owner.clone(), None);
        uow.demands
            .expect_create()
            .withf(move |d| d.responsible_id == owner_id)
            .returning(|d| Ok(d));

        let response = manager(uow, Default::default())
            .create(
                &requester(&owner),
                CreateDemand {
                    store_id,
                    product_id: Uuid::new_v4(),
                    responsible_id: None,
                    needed_count: 10,
                    minimum_count: None,
                    description: None,
                    deadline: chrono::Utc::now(),
                },
            )
            .await
            .unwrap();
        assert_eq!(response.status, DemandStatus::Opened);
        assert_eq!(response.responsible.id, owner_id);
        assert!(response.distance_meters.is_none());
    }

    #[tokio::test]
    async fn create_on_foreign_store_is_forbidden() {
        let owner = sample_user(UserAccess::StoreOwner);
        let store = sample_store(owner.id, StoreType::Retailer, Uuid::new_v4());
        let store_id = store.id;

        let mut uow = MockUow::default();
        uow.stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        uow.demands.expect_create().never();

        let stranger = sample_user(UserAccess::StoreOwner);
        let err = manager(uow, Default::default())
            .create(
                &requester(&stranger),
                CreateDemand {
                    store_id,
                    product_id: Uuid::new_v4(),
                    responsible_id: None,
                    needed_count: 10,
                    minimum_count: None,
                    description: None,
                    deadline: chrono::Utc::now(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn retailer_lists_its_own_demands() {
        let owner = sample_user(UserAccess::StoreOwner);
        let store = sample_store(owner.id, StoreType::Retailer, Uuid::new_v4());
        let store_id = store.id;
        let demand = sample_demand(store_id, Uuid::new_v4(), owner.id);

        let mut uow = MockUow::default();
        with_relations(&mut uow, store, owner.clone(), None);
        uow.demands
            .expect_list_by_scope()
            .withf(move |scope, filter, _| {
                *scope == DemandScope::Store(store_id) && filter.status == Some(DemandStatus::Opened)
            })
            .returning(move |_, _, _| Ok((vec![demand.clone()], 1)));

        let mut query = DemandListQuery::new(store_id);
        query.status = Some(DemandStatus::Opened);
        let page = manager(uow, Default::default())
            .list_by_store(&requester(&owner), query)
            .await
            .unwrap();
        assert_eq!(page.meta.total, 1);
        assert!(page.data[0].distance_meters.is_none());
    }

    #[tokio::test]
    async fn deactivated_product_drops_only_its_demand() {
        let owner = sample_user(UserAccess::StoreOwner);
        let store = sample_store(owner.id, StoreType::Retailer, Uuid::new_v4());
        let store_id = store.id;
        let live_product = sample_product();
        let live_product_id = live_product.id;
        let live = sample_demand(store_id, live_product_id, owner.id);
        let orphaned = sample_demand(store_id, Uuid::new_v4(), owner.id);
        let live_id = live.id;

        let mut uow = MockUow::default();
        uow.stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        uow.products.expect_find_by_id().returning(move |id| {
            Ok((id == live_product_id).then(|| live_product.clone()))
        });
        let responsible = owner.clone();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(responsible.clone())));
        uow.demands
            .expect_list_by_scope()
            .returning(move |_, _, _| Ok((vec![live.clone(), orphaned.clone()], 2)));

        let page = manager(uow, Default::default())
            .list_by_store(&requester(&owner), DemandListQuery::new(store_id))
            .await
            .unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, live_id);
        assert_eq!(page.meta.total, 1);
    }

    #[tokio::test]
    async fn admin_listing_survives_deactivated_responsible() {
        let owner = sample_user(UserAccess::StoreOwner);
        let store = sample_store(owner.id, StoreType::Retailer, Uuid::new_v4());
        let product = sample_product();
        let demand = sample_demand(store.id, product.id, owner.id);

        let mut uow = MockUow::default();
        uow.stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        uow.users.expect_find_by_id().returning(|_| Ok(None));
        uow.demands
            .expect_list()
            .returning(move |_| Ok((vec![demand.clone()], 1)));

        let page = manager(uow, Default::default())
            .list(PaginationParams::default())
            .await
            .unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.meta.total, 0);
    }

    #[tokio::test]
    async fn supplier_lists_nearby_demands_with_distance() {
        let owner = sample_user(UserAccess::StoreOwner);
        let supplier = sample_store(owner.id, StoreType::Supplier, Uuid::new_v4());
        let supplier_id = supplier.id;
        let demand = sample_demand(Uuid::new_v4(), Uuid::new_v4(), owner.id);

        let mut uow = MockUow::default();
        let product = sample_product();
        uow.stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(supplier.clone())));
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        let responsible = owner.clone();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(responsible.clone())));
        // first call resolves the supplier origin, later ones the demand store
        let mut calls = 0;
        uow.addresses.expect_find_by_id().returning(move |_| {
            calls += 1;
            let at = if calls == 1 { SAO_PAULO } else { GUARULHOS };
            Ok(Some(sample_address(Some(at))))
        });
        uow.demands
            .expect_list_by_scope()
            .withf(move |scope, _, _| {
                matches!(
                    scope,
                    DemandScope::Nearby { radius_meters, exclude_store, .. }
                        if *radius_meters == 25_000.0 && *exclude_store == supplier_id
                )
            })
            .returning(move |_, _, _| Ok((vec![demand.clone()], 1)));

        let mut query = DemandListQuery::new(supplier_id);
        query.radius_meters = Some(25_000.0);
        let page = manager(uow, Default::default())
            .list_by_store(&requester(&owner), query)
            .await
            .unwrap();

        let distance = page.data[0].distance_meters.unwrap();
        let expected = haversine_distance_meters(SAO_PAULO, GUARULHOS);
        assert!((distance - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn supplier_without_coordinates_is_rejected() {
        let owner = sample_user(UserAccess::StoreOwner);
        let supplier = sample_store(owner.id, StoreType::Supplier, Uuid::new_v4());
        let supplier_id = supplier.id;

        let mut uow = MockUow::default();
        with_relations(&mut uow, supplier, owner.clone(), None);
        uow.demands.expect_list_by_scope().never();

        let err = manager(uow, Default::default())
            .list_by_store(&requester(&owner), DemandListQuery::new(supplier_id))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn non_positive_radius_is_rejected() {
        let owner = sample_user(UserAccess::StoreOwner);
        let supplier = sample_store(owner.id, StoreType::Supplier, Uuid::new_v4());
        let supplier_id = supplier.id;

        let mut uow = MockUow::default();
        with_relations(&mut uow, supplier, owner.clone(), Some(SAO_PAULO));
        uow.demands.expect_list_by_scope().never();

        let mut query = DemandListQuery::new(supplier_id);
        query.radius_meters = Some(0.0);
        let err = manager(uow, Default::default())
            .list_by_store(&requester(&owner), query)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_store_is_not_found() {
        let mut uow = MockUow::default();
        uow.stores.expect_find_by_id().returning(|_| Ok(None));

        let owner = sample_user(UserAccess::StoreOwner);
        let err = manager(uow, Default::default())
            .list_by_store(&requester(&owner), DemandListQuery::new(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "Store"));
    }

    #[tokio::test]
    async fn reel_posts_sign_product_images() {
        let owner = sample_user(UserAccess::StoreOwner);
        let store = sample_store(owner.id, StoreType::Retailer, Uuid::new_v4());
        let store_id = store.id;
        let demand = sample_demand(store_id, Uuid::new_v4(), owner.id);

        let mut uow = MockUow::default();
        let mut product = sample_product();
        product.images = vec!["images/1_a.png".into(), "images/2_b.png".into()];
        uow.stores
            .expect_find_by_id()
            .returning(move |_| Ok(Some(store.clone())));
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(product.clone())));
        let responsible = owner.clone();
        uow.users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(responsible.clone())));
        uow.demands
            .expect_list_by_scope()
            .returning(move |_, _, _| Ok((vec![demand.clone()], 1)));

        let mut clients = MockClients::default();
        clients
            .storage
            .expect_signed_url()
            .withf(|bucket, _| bucket == BUCKET_PRODUCT_IMAGES)
            .returning(|_, blob| Ok(format!("https://signed.example/{}", blob)));

        let page = manager(uow, clients.storage)
            .reel_posts(&requester(&owner), DemandListQuery::new(store_id))
            .await
            .unwrap();

        let post = &page.data[0];
        assert_eq!(post.store_id, store_id);
        assert_eq!(post.product_name, "Tomate (kg)");
        assert_eq!(
            post.product_images,
            vec![
                "https://signed.example/images/1_a.png".to_string(),
                "https://signed.example/images/2_b.png".to_string(),
            ]
        );
    }

    #[test]
    fn list_query_deserializes_with_defaults() {
        let store_id = Uuid::new_v4();
        let query: DemandListQuery =
            serde_json::from_value(serde_json::json!({ "store_id": store_id })).unwrap();
        assert_eq!(query.pagination(), PaginationParams::default());
        assert!(query.radius_meters.is_none());
        assert_eq!(query.radius().unwrap(), DEFAULT_DEMAND_RADIUS_METERS);
    }
}
