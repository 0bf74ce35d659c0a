//! Custom request extractors.

mod image_upload;
mod validated_json;

pub use image_upload::{ImageUpload, ImageUploadForm};
pub use validated_json::ValidatedJson;
