//! Address repository.

use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::base::{DeleteRepository, ReadRepository, WriteRepository};
use super::entities::address::{ActiveModel, Entity as AddressEntity};
use crate::domain::Address;
use crate::errors::AppResult;
use crate::types::PaginationParams;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AddressRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>>;

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Address>, u64)>;

    async fn create(&self, address: Address) -> AppResult<Address>;

    async fn update(&self, address: Address) -> AppResult<Address>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

pub struct AddressStore {
    db: DatabaseConnection,
}

impl AddressStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReadRepository<AddressEntity> for AddressStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl WriteRepository<AddressEntity, ActiveModel> for AddressStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl DeleteRepository<AddressEntity> for AddressStore {
    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl AddressRepository for AddressStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Address>> {
        Ok(self.find_active(id).await?.map(Address::from))
    }

    async fn list(&self, params: PaginationParams) -> AppResult<(Vec<Address>, u64)> {
        let (models, total) = self.find_active_page(params).await?;
        Ok((models.into_iter().map(Address::from).collect(), total))
    }

    async fn create(&self, address: Address) -> AppResult<Address> {
        Ok(Address::from(
            self.insert_model(ActiveModel::from(address)).await?,
        ))
    }

    async fn update(&self, address: Address) -> AppResult<Address> {
        Ok(Address::from(
            self.update_model(ActiveModel::from(address)).await?,
        ))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.deactivate(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::infra::repositories::entities::address;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Statement, Value};
    use std::collections::BTreeMap;

    fn address_row(id: Uuid) -> address::Model {
        let now = Utc::now();
        address::Model {
            id,
            zip_code: "01310100".to_string(),
            street_address: "Avenida Paulista".to_string(),
            latitude: Some(-23.561),
            longitude: Some(-46.655),
            province: "SP".to_string(),
            city: "São Paulo".to_string(),
            neighbourhood: "Bela Vista".to_string(),
            number: "1000".to_string(),
            additional_info: String::new(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn statements(store: AddressStore) -> Vec<Statement> {
        store
            .db
            .into_transaction_log()
            .iter()
            .flat_map(|transaction| transaction.statements().to_vec())
            .collect()
    }

    #[tokio::test]
    async fn delete_flips_active_flag_instead_of_removing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let store = AddressStore::new(db);

        store.delete(Uuid::new_v4()).await.unwrap();

        let log = statements(store);
        assert_eq!(log.len(), 1);
        let sql = &log[0].sql;
        assert!(sql.starts_with(r#"UPDATE "addresses" SET "active" = $1, "updated_at" = $2"#));
        assert!(sql.contains(r#""addresses"."active" = $4"#));
        assert!(!sql.contains("DELETE"));

        let values = &log[0].values.as_ref().unwrap().0;
        assert_eq!(values[0], Value::Bool(Some(false)));
        assert_eq!(values[3], Value::Bool(Some(true)));
    }

    #[tokio::test]
    async fn deleting_missing_or_inactive_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let store = AddressStore::new(db);

        let err = store.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref label) if label == "Address"));
    }

    #[tokio::test]
    async fn find_by_id_reads_only_active_rows() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![address_row(id)]])
            .into_connection();
        let store = AddressStore::new(db);

        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, id);

        let log = statements(store);
        assert!(log[0]
            .sql
            .contains(r#"WHERE "addresses"."id" = $1 AND "addresses"."active" = $2"#));
        assert_eq!(
            log[0].values.as_ref().unwrap().0[1],
            Value::Bool(Some(true))
        );
    }

    #[tokio::test]
    async fn list_counts_and_pages_only_active_rows() {
        let count = BTreeMap::from([("num_items", Value::BigInt(Some(1)))]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count]])
            .append_query_results([vec![address_row(Uuid::new_v4())]])
            .into_connection();
        let store = AddressStore::new(db);

        let (rows, total) = store.list(PaginationParams::new(1, 10)).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(total, 1);

        let log = statements(store);
        assert_eq!(log.len(), 2);
        for statement in &log {
            assert!(statement.sql.contains(r#""addresses"."active" = $1"#));
        }
        assert!(log[1].sql.contains(r#"ORDER BY "addresses"."created_at" DESC"#));
    }

    #[tokio::test]
    async fn updating_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<address::Model>::new()])
            .into_connection();
        let store = AddressStore::new(db);

        let err = store
            .update(Address::from(address_row(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
