//! Validated JSON extractor - Combines deserialization with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::AppError;

/// JSON body extractor that runs `validator` rules before the handler.
///
/// ```rust,ignore
/// async fn create_product(
///     ValidatedJson(input): ValidatedJson<CreateProduct>,
/// ) -> AppResult<Created<ProductResponse>> { .. }
/// ```
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::validation(format_validation_errors(&e)))?;

        Ok(ValidatedJson(value))
    }
}

/// `field: message` pairs, sorted by field so the output is stable.
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{}: {}", field, message),
                None => format!("{}: invalid value", field),
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CreateProduct, CreateUser, ProductType, UnitType, UserAccess};

    #[test]
    fn messages_name_the_field() {
        let input = CreateUser {
            name: String::new(),
            email: "not-an-email".into(),
            password: "short".into(),
            date_of_birth: None,
            gender: None,
            phone_number: None,
            access: UserAccess::Guest,
        };
        let errors = input.validate().unwrap_err();
        let text = format_validation_errors(&errors);
        assert!(text.contains("email: Invalid email format"));
        assert!(text.contains("password: Password must be at least 8 characters"));
        assert!(text.contains("name: Name is required"));
    }

    #[test]
    fn valid_payload_has_no_errors() {
        let input = CreateProduct {
            name: "Feijão".into(),
            unit_type: UnitType::Kilogram,
            product_type: ProductType::Grain,
        };
        assert!(input.validate().is_ok());
    }
}
