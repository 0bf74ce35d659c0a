//! Product service - the shared product catalog.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::BUCKET_PRODUCT_IMAGES;
use crate::domain::{CreateProduct, Product, ProductType, UpdateProduct};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ObjectStorage, UnitOfWork};
use crate::services::take_image;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create(&self, input: CreateProduct) -> AppResult<Product>;

    async fn get(&self, id: Uuid) -> AppResult<Product>;

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Product>>;

    /// Case-insensitive name search, optionally restricted to one type
    async fn search(
        &self,
        name: String,
        product_type: Option<ProductType>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Product>>;

    async fn update(&self, id: Uuid, changes: UpdateProduct) -> AppResult<Product>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn upload_image(&self, id: Uuid, file_name: String, bytes: Vec<u8>)
        -> AppResult<Product>;

    async fn delete_image(&self, id: Uuid, index: usize) -> AppResult<Product>;
}

pub struct ProductManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> ProductManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }
}

#[async_trait]
impl<U: UnitOfWork> ProductService for ProductManager<U> {
    async fn create(&self, input: CreateProduct) -> AppResult<Product> {
        let product = self.uow.products().create(Product::new(input)?).await?;
        tracing::info!(product_id = %product.id, search_name = %product.search_name, "Product created");
        Ok(product)
    }

    async fn get(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<Product>> {
        let (products, total) = self.uow.products().list(params).await?;
        Ok(Paginated::new(products, params, total))
    }

    async fn search(
        &self,
        name: String,
        product_type: Option<ProductType>,
        params: PaginationParams,
    ) -> AppResult<Paginated<Product>> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::validation("Search name is required"));
        }
        let (products, total) = self
            .uow
            .products()
            .search(name, product_type, params)
            .await?;
        Ok(Paginated::new(products, params, total))
    }

    async fn update(&self, id: Uuid, changes: UpdateProduct) -> AppResult<Product> {
        let mut product = self.get(id).await?;
        product.apply(changes)?;
        self.uow.products().update(product).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.uow.products().delete(id).await?;
        tracing::info!(product_id = %id, "Product deactivated");
        Ok(())
    }

    async fn upload_image(
        &self,
        id: Uuid,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<Product> {
        let mut product = self.get(id).await?;
        let blob_name = self
            .storage
            .upload(BUCKET_PRODUCT_IMAGES, &file_name, bytes)
            .await?;
        product.images.push(blob_name);
        self.uow.products().update(product).await
    }

    async fn delete_image(&self, id: Uuid, index: usize) -> AppResult<Product> {
        let mut product = self.get(id).await?;
        let blob_name = take_image(&mut product.images, index)?;
        let product = self.uow.products().update(product).await?;

        if let Err(e) = self.storage.delete(BUCKET_PRODUCT_IMAGES, &blob_name).await {
            tracing::warn!(product_id = %product.id, blob = %blob_name, error = %e, "Failed to delete product image");
        }
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitType;
    use crate::infra::{MockObjectStorage, MockProductRepository, Persistence};
    use crate::services::test_support::{sample_product, MockUow};

    fn manager(products: MockProductRepository, storage: MockObjectStorage) -> ProductManager<Persistence> {
        ProductManager::new(
            MockUow {
                products,
                ..Default::default()
            }
            .build(),
            Arc::new(storage),
        )
    }

    #[tokio::test]
    async fn create_builds_search_name() {
        let mut products = MockProductRepository::new();
        products.expect_create().returning(|p| Ok(p));

        let product = manager(products, MockObjectStorage::new())
            .create(CreateProduct {
                name: "  Arroz agulhinha ".into(),
                unit_type: UnitType::Kilogram,
                product_type: ProductType::Grain,
            })
            .await
            .unwrap();
        assert_eq!(product.name, "Arroz agulhinha");
        assert_eq!(product.search_name, "Arroz agulhinha (kg)");
    }

    #[tokio::test]
    async fn search_requires_a_name() {
        let mut products = MockProductRepository::new();
        products.expect_search().never();

        let err = manager(products, MockObjectStorage::new())
            .search("   ".into(), None, PaginationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn search_passes_filters_through() {
        let mut products = MockProductRepository::new();
        products
            .expect_search()
            .withf(|name, product_type, params| {
                name == "tom" && *product_type == Some(ProductType::Vegetable) && params.page == 2
            })
            .returning(|_, _, _| Ok((vec![sample_product()], 11)));

        let page = manager(products, MockObjectStorage::new())
            .search(
                " tom ".into(),
                Some(ProductType::Vegetable),
                PaginationParams::new(2, 10),
            )
            .await
            .unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.meta.total_pages, 2);
    }

    #[tokio::test]
    async fn update_keeps_search_name_in_sync() {
        let stored = sample_product();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        products.expect_update().returning(|p| Ok(p));

        let product = manager(products, MockObjectStorage::new())
            .update(
                Uuid::new_v4(),
                UpdateProduct {
                    unit_type: Some(UnitType::Piece),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(product.search_name, "Tomate (uni.)");
    }

    #[tokio::test]
    async fn upload_image_appends_blob() {
        let stored = sample_product();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        products.expect_update().returning(|p| Ok(p));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|bucket, _, _| bucket == BUCKET_PRODUCT_IMAGES)
            .returning(|_, _, _| Ok("images/1_tomate.jpg".into()));

        let product = manager(products, storage)
            .upload_image(Uuid::new_v4(), "tomate.jpg".into(), vec![0xff, 0xd8])
            .await
            .unwrap();
        assert_eq!(product.images, vec!["images/1_tomate.jpg".to_string()]);
    }

    #[tokio::test]
    async fn delete_image_out_of_range_is_not_found() {
        let stored = sample_product();
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        products.expect_update().never();

        let mut storage = MockObjectStorage::new();
        storage.expect_delete().never();

        let err = manager(products, storage)
            .delete_image(Uuid::new_v4(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_image_keeps_shortened_list_when_blob_delete_fails() {
        let mut stored = sample_product();
        stored.images = vec!["images/a.png".into(), "images/b.png".into()];
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        products
            .expect_update()
            .withf(|p| p.images == ["images/b.png"])
            .times(1)
            .returning(|p| Ok(p));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .withf(|bucket, blob| bucket == BUCKET_PRODUCT_IMAGES && blob == "images/a.png")
            .times(1)
            .returning(|_, _| Err(AppError::external("Object storage returned 503")));

        let product = manager(products, storage)
            .delete_image(Uuid::new_v4(), 0)
            .await
            .unwrap();
        assert_eq!(product.images, ["images/b.png"]);
    }

    #[tokio::test]
    async fn failed_persist_leaves_blob_in_place() {
        let mut stored = sample_product();
        stored.images = vec!["images/a.png".into()];
        let mut products = MockProductRepository::new();
        products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        products
            .expect_update()
            .returning(|_| Err(AppError::not_found("Product")));

        let mut storage = MockObjectStorage::new();
        storage.expect_delete().never();

        let err = manager(products, storage)
            .delete_image(Uuid::new_v4(), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
