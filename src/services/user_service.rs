//! User service - Handles user-related business logic.
//!
//! Accounts are created by admins or through public sign-up; each user can
//! maintain their own profile and picture.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::BUCKET_USER_PROFILES;
use crate::domain::{CreateUser, CurrentUser, Password, SignUp, UpdateProfile, UpdateUser, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{ObjectStorage, UnitOfWork};
use crate::types::{Paginated, PaginationParams};

/// User service trait for dependency injection.
///
/// Operations only see active users.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Admin-side account creation
    async fn create(&self, input: CreateUser) -> AppResult<User>;

    /// Public registration; admin accounts cannot be self-assigned
    async fn sign_up(&self, input: SignUp) -> AppResult<User>;

    async fn get(&self, id: Uuid) -> AppResult<User>;

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<User>>;

    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<User>;

    /// Self-service update guarded by the current password
    async fn update_profile(
        &self,
        requester: &CurrentUser,
        changes: UpdateProfile,
    ) -> AppResult<User>;

    /// Soft delete
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Replace the requester's profile picture
    async fn upload_profile_picture(
        &self,
        requester: &CurrentUser,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<User>;

    /// Signed URL of the requester's picture; empty when none is set
    async fn profile_picture_url(&self, requester: &CurrentUser) -> AppResult<String>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }

    async fn ensure_email_available(&self, email: &str) -> AppResult<()> {
        if self.uow.users().email_taken(email).await? {
            return Err(AppError::validation(format!(
                "Email {} is already registered",
                email.to_lowercase()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn create(&self, input: CreateUser) -> AppResult<User> {
        tracing::info!(email = %input.email, access = %input.access, "Creating user");
        self.ensure_email_available(&input.email).await?;

        let password_hash = Password::new(&input.password)?.into_string();
        let user = self.uow.users().create(User::new(input, password_hash)).await?;

        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    async fn sign_up(&self, input: SignUp) -> AppResult<User> {
        if input.access.is_admin() {
            tracing::warn!(email = %input.email, "Sign-up attempted with admin access");
            return Err(AppError::validation("Cannot sign up as an administrator"));
        }
        self.create(input).await
    }

    async fn get(&self, id: Uuid) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn list(&self, params: PaginationParams) -> AppResult<Paginated<User>> {
        let (users, total) = self.uow.users().list(params).await?;
        Ok(Paginated::new(users, params, total))
    }

    async fn update(&self, id: Uuid, changes: UpdateUser) -> AppResult<User> {
        let mut user = self.get(id).await?;

        if let Some(email) = &changes.email {
            if !email.eq_ignore_ascii_case(&user.email) {
                self.ensure_email_available(email).await?;
            }
        }

        user.apply(changes);
        self.uow.users().update(user).await
    }

    async fn update_profile(
        &self,
        requester: &CurrentUser,
        changes: UpdateProfile,
    ) -> AppResult<User> {
        tracing::info!(user_id = %requester.id, "Updating profile");
        let mut user = self.get(requester.id).await?;

        if !Password::from_hash(user.password_hash.as_str()).verify(&changes.current_password) {
            tracing::warn!(user_id = %requester.id, "Profile update with wrong password");
            return Err(AppError::validation("Current password is incorrect"));
        }

        if let Some(new_password) = &changes.new_password {
            user.password_hash = Password::new(new_password)?.into_string();
        }

        user.apply(UpdateUser {
            name: changes.name,
            date_of_birth: changes.date_of_birth,
            gender: changes.gender,
            phone_number: changes.phone_number,
            ..Default::default()
        });
        self.uow.users().update(user).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await?;
        tracing::info!(user_id = %id, "User deactivated");
        Ok(())
    }

    async fn upload_profile_picture(
        &self,
        requester: &CurrentUser,
        file_name: String,
        bytes: Vec<u8>,
    ) -> AppResult<User> {
        let mut user = self.get(requester.id).await?;

        let blob_name = self
            .storage
            .upload(BUCKET_USER_PROFILES, &file_name, bytes)
            .await?;
        let previous = user.profile_picture.replace(blob_name);
        let user = self.uow.users().update(user).await?;

        if let Some(previous) = previous.filter(|p| !p.is_empty()) {
            if let Err(e) = self.storage.delete(BUCKET_USER_PROFILES, &previous).await {
                tracing::warn!(blob = %previous, error = %e, "Failed to delete old profile picture");
            }
        }

        Ok(user)
    }

    async fn profile_picture_url(&self, requester: &CurrentUser) -> AppResult<String> {
        let user = self.get(requester.id).await?;
        self.storage
            .signed_url(
                BUCKET_USER_PROFILES,
                user.profile_picture.as_deref().unwrap_or_default(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserAccess;
    use crate::infra::{MockObjectStorage, MockUserRepository, Persistence};
    use crate::services::test_support::{requester, sample_user, MockUow, TEST_PASSWORD};

    fn manager(users: MockUserRepository, storage: MockObjectStorage) -> UserManager<Persistence> {
        UserManager::new(
            MockUow {
                users,
                ..Default::default()
            }
            .build(),
            Arc::new(storage),
        )
    }

    fn create_input(access: UserAccess) -> CreateUser {
        CreateUser {
            name: "Joana".into(),
            email: "Joana@Example.com".into(),
            password: TEST_PASSWORD.into(),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            access,
        }
    }

    #[tokio::test]
    async fn create_hashes_password_and_lowercases_email() {
        let mut users = MockUserRepository::new();
        users.expect_email_taken().returning(|_| Ok(false));
        users.expect_create().returning(|user| Ok(user));

        let user = manager(users, MockObjectStorage::new())
            .create(create_input(UserAccess::Employee))
            .await
            .unwrap();

        assert_eq!(user.email, "joana@example.com");
        assert_ne!(user.password_hash, TEST_PASSWORD);
        assert!(Password::from_hash(user.password_hash.as_str()).verify(TEST_PASSWORD));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let mut users = MockUserRepository::new();
        users.expect_email_taken().returning(|_| Ok(true));
        users.expect_create().never();

        let err = manager(users, MockObjectStorage::new())
            .create(create_input(UserAccess::Employee))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn sign_up_refuses_admin_access() {
        let mut users = MockUserRepository::new();
        users.expect_email_taken().never();

        let err = manager(users, MockObjectStorage::new())
            .sign_up(create_input(UserAccess::Admin))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn get_missing_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = manager(users, MockObjectStorage::new())
            .get(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref e) if e == "User"));
    }

    #[tokio::test]
    async fn update_profile_requires_current_password() {
        let user = sample_user(UserAccess::StoreOwner);
        let current = requester(&user);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update().never();

        let err = manager(users, MockObjectStorage::new())
            .update_profile(
                &current,
                UpdateProfile {
                    current_password: "not-the-password".into(),
                    new_password: None,
                    name: Some("New".into()),
                    date_of_birth: None,
                    gender: None,
                    phone_number: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn update_profile_rehashes_new_password() {
        let user = sample_user(UserAccess::StoreOwner);
        let current = requester(&user);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update().returning(|user| Ok(user));

        let updated = manager(users, MockObjectStorage::new())
            .update_profile(
                &current,
                UpdateProfile {
                    current_password: TEST_PASSWORD.into(),
                    new_password: Some("a-brand-new-secret".into()),
                    name: Some("Maria S.".into()),
                    date_of_birth: None,
                    gender: None,
                    phone_number: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Maria S.");
        let stored = Password::from_hash(updated.password_hash.as_str());
        assert!(stored.verify("a-brand-new-secret"));
        assert!(!stored.verify(TEST_PASSWORD));
    }

    #[tokio::test]
    async fn upload_profile_picture_replaces_and_deletes_previous() {
        let mut user = sample_user(UserAccess::Employee);
        user.profile_picture = Some("images/old.png".into());
        let current = requester(&user);

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        users.expect_update().returning(|user| Ok(user));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_upload()
            .withf(|bucket, name, _| bucket == BUCKET_USER_PROFILES && name == "me.png")
            .returning(|_, _, _| Ok("images/new.png".into()));
        storage
            .expect_delete()
            .withf(|_, blob| blob == "images/old.png")
            .times(1)
            .returning(|_, _| Ok(()));

        let updated = manager(users, storage)
            .upload_profile_picture(&current, "me.png".into(), vec![1, 2, 3])
            .await
            .unwrap();
        assert_eq!(updated.profile_picture.as_deref(), Some("images/new.png"));
    }

    #[tokio::test]
    async fn profile_picture_url_without_picture_is_empty() {
        let user = sample_user(UserAccess::Employee);
        let current = requester(&user);
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_signed_url()
            .withf(|_, blob| blob.is_empty())
            .returning(|_, _| Ok(String::new()));

        let url = manager(users, storage)
            .profile_picture_url(&current)
            .await
            .unwrap();
        assert!(url.is_empty());
    }
}
