//! HTTP clients for third-party services.
//!
//! Every client sits behind a trait so services can be tested with mocks.
//! Transport failures and non-success statuses surface as
//! `AppError::ExternalService`.

mod company_registry;
mod geocoding;
mod object_storage;
mod postal_code;

use std::time::Duration;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

pub use company_registry::{CompanyRegistry, ReceitaWsClient};
pub use geocoding::{Geocoder, NominatimClient};
pub use object_storage::{blob_name_for, content_type_for, GcsClient, ObjectStorage, UrlSigner};
pub use postal_code::{PostalCodeLookup, ViaCepClient};

#[cfg(any(test, feature = "test-utils"))]
pub use company_registry::MockCompanyRegistry;
#[cfg(any(test, feature = "test-utils"))]
pub use geocoding::MockGeocoder;
#[cfg(any(test, feature = "test-utils"))]
pub use object_storage::MockObjectStorage;
#[cfg(any(test, feature = "test-utils"))]
pub use postal_code::MockPostalCodeLookup;

/// Shared reqwest client with the configured timeout.
pub fn http_client(config: &Config) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.external_http_timeout_seconds))
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))
}

/// Fail with ExternalService unless the response status is 2xx.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    service: &str,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::error!(service, %status, body = %body, "External service returned an error");
    Err(AppError::external(format!(
        "{} request failed with status {}",
        service,
        status.as_u16()
    )))
}

/// Treat blank provider strings as absent.
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
