//! User domain entity and related types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

text_enum! {
    /// Access level granted to an account
    pub enum UserAccess {
        Admin => "ADMIN",
        StoreOwner => "STORE_OWNER",
        Employee => "EMPLOYEE",
        Guest => "GUEST",
    }
}

text_enum! {
    pub enum GenderType {
        Male => "MALE",
        Female => "FEMALE",
        NotApplicable => "NOT_APPLICABLE",
        NotKnown => "NOT_KNOWN",
    }
}

text_enum! {
    /// Which contact channels the user has confirmed
    pub enum VerificationStatus {
        Pending => "PENDING",
        Email => "EMAIL",
        Phone => "PHONE",
        EmailAndPhone => "EMAIL_AND_PHONE",
    }
}

impl UserAccess {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserAccess::Admin)
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: GenderType,
    pub phone_number: Option<String>,
    /// Blob name inside the profile pictures bucket
    pub profile_picture: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub access: UserAccess,
    pub verification_status: VerificationStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Build a fresh, unverified account from validated input.
    pub fn new(input: CreateUser, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email.to_lowercase(),
            date_of_birth: input.date_of_birth,
            gender: input.gender.unwrap_or(GenderType::NotKnown),
            phone_number: input.phone_number,
            profile_picture: None,
            password_hash,
            access: input.access,
            verification_status: VerificationStatus::Pending,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.access.is_admin()
    }

    /// Apply admin-side changes.
    pub fn apply(&mut self, changes: UpdateUser) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email.to_lowercase();
        }
        if changes.date_of_birth.is_some() {
            self.date_of_birth = changes.date_of_birth;
        }
        if let Some(gender) = changes.gender {
            self.gender = gender;
        }
        if changes.phone_number.is_some() {
            self.phone_number = changes.phone_number;
        }
        if let Some(access) = changes.access {
            self.access = access;
        }
        if let Some(status) = changes.verification_status {
            self.verification_status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Authenticated caller, resolved from the token subject on every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub access: UserAccess,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.access.is_admin()
    }
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            access: user.access,
        }
    }
}

/// Admin-side user creation payload
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 1, max = 256, message = "Name is required"))]
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<GenderType>,
    #[validate(length(min = 8, max = 20, message = "Invalid phone number"))]
    #[schema(example = "+5511999999999")]
    pub phone_number: Option<String>,
    pub access: UserAccess,
}

/// Public registration payload. Same fields as [`CreateUser`].
pub type SignUp = CreateUser;

/// Admin-side user update payload
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 256, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<GenderType>,
    #[validate(length(min = 8, max = 20, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
    pub access: Option<UserAccess>,
    pub verification_status: Option<VerificationStatus>,
}

/// Self-service profile update. Requires the current password.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[schema(example = "SecurePass123!")]
    pub current_password: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub new_password: Option<String>,
    #[validate(length(min = 1, max = 256, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<GenderType>,
    #[validate(length(min = 8, max = 20, message = "Invalid phone number"))]
    pub phone_number: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Maria Souza")]
    pub name: String,
    #[schema(example = "maria@example.com")]
    pub email: String,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: GenderType,
    pub phone_number: Option<String>,
    pub profile_picture: Option<String>,
    pub access: UserAccess,
    pub verification_status: VerificationStatus,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            phone_number: user.phone_number,
            profile_picture: user.profile_picture,
            access: user.access,
            verification_status: user.verification_status,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(access: UserAccess) -> CreateUser {
        CreateUser {
            name: "Maria".to_string(),
            email: "Maria@Example.com".to_string(),
            password: "SecurePass123!".to_string(),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            access,
        }
    }

    #[test]
    fn access_round_trips_through_text() {
        for access in UserAccess::ALL {
            assert_eq!(access.as_str().parse::<UserAccess>().unwrap(), *access);
        }
        assert!("ANY".parse::<UserAccess>().is_err());
    }

    #[test]
    fn access_serializes_upper_snake_case() {
        let json = serde_json::to_string(&UserAccess::StoreOwner).unwrap();
        assert_eq!(json, "\"STORE_OWNER\"");
    }

    #[test]
    fn new_user_is_pending_and_active() {
        let user = User::new(input(UserAccess::Guest), "hash".to_string());
        assert!(user.active);
        assert_eq!(user.verification_status, VerificationStatus::Pending);
        assert_eq!(user.gender, GenderType::NotKnown);
        assert_eq!(user.email, "maria@example.com");
    }

    #[test]
    fn apply_only_touches_given_fields() {
        let mut user = User::new(input(UserAccess::Guest), "hash".to_string());
        user.apply(UpdateUser {
            access: Some(UserAccess::StoreOwner),
            ..Default::default()
        });
        assert_eq!(user.access, UserAccess::StoreOwner);
        assert_eq!(user.name, "Maria");
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::new(input(UserAccess::Guest), "secret-hash".to_string());
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
