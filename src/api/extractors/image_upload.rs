//! Multipart image extractor.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use utoipa::ToSchema;

use crate::errors::AppError;

/// Multipart body accepted by the image upload endpoints
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// First file part of a `multipart/form-data` body.
///
/// The file extension is checked later by the object storage client.
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(e.body_text()))?
        {
            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.body_text()))?;
            if bytes.is_empty() {
                return Err(AppError::validation("Uploaded file is empty"));
            }
            return Ok(ImageUpload {
                file_name,
                bytes: bytes.to_vec(),
            });
        }

        Err(AppError::validation("A file field is required"))
    }
}
