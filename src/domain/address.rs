//! Address entity: postal fields plus optional coordinates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::geo::Coordinates;
use crate::config::GEOCODING_COUNTRY;
use crate::errors::{AppError, AppResult};

/// Reduce a CEP to its 8 digits (`01310-100` -> `01310100`).
pub fn normalize_zip_code(raw: &str) -> AppResult<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let only_digits_and_dash = raw
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c == '.' || c.is_whitespace());
    if digits.len() != 8 || !only_digits_and_dash {
        return Err(AppError::validation("Zip code must have 8 digits"));
    }
    Ok(digits)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub id: Uuid,
    pub zip_code: String,
    pub street_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub province: String,
    pub city: String,
    pub neighbourhood: String,
    pub number: String,
    pub additional_info: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Address {
    pub fn new(input: CreateAddress) -> AppResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            zip_code: normalize_zip_code(&input.zip_code)?,
            street_address: input.street_address,
            latitude: None,
            longitude: None,
            province: input.province,
            city: input.city,
            neighbourhood: input.neighbourhood,
            number: input.number,
            additional_info: input.additional_info.unwrap_or_default(),
            active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Both coordinates, or none when the address was never geocoded.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    pub fn set_coordinates(&mut self, coordinates: Option<Coordinates>) {
        self.latitude = coordinates.map(|c| c.latitude);
        self.longitude = coordinates.map(|c| c.longitude);
        self.updated_at = Utc::now();
    }

    /// Free-text query understood by the geocoder.
    pub fn geocoding_query(&self) -> String {
        format!(
            "{} {}, {}, {}, {}",
            self.street_address, self.number, self.city, self.province, GEOCODING_COUNTRY
        )
    }

    /// Apply changes. Returns true when a field that moves the address on
    /// the map changed, which invalidates the stored coordinates.
    pub fn apply(&mut self, changes: UpdateAddress) -> AppResult<bool> {
        let mut moved = false;
        if let Some(zip_code) = changes.zip_code {
            let zip_code = normalize_zip_code(&zip_code)?;
            moved |= zip_code != self.zip_code;
            self.zip_code = zip_code;
        }
        if let Some(street_address) = changes.street_address {
            moved |= street_address != self.street_address;
            self.street_address = street_address;
        }
        if let Some(number) = changes.number {
            moved |= number != self.number;
            self.number = number;
        }
        if let Some(city) = changes.city {
            moved |= city != self.city;
            self.city = city;
        }
        if let Some(province) = changes.province {
            moved |= province != self.province;
            self.province = province;
        }
        if let Some(neighbourhood) = changes.neighbourhood {
            self.neighbourhood = neighbourhood;
        }
        if let Some(additional_info) = changes.additional_info {
            self.additional_info = additional_info;
        }
        self.updated_at = Utc::now();
        Ok(moved)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAddress {
    #[schema(example = "01310-100")]
    pub zip_code: String,
    #[validate(length(min = 1, max = 256, message = "Street address is required"))]
    #[schema(example = "Avenida Paulista")]
    pub street_address: String,
    #[validate(length(min = 2, max = 64, message = "Province is required"))]
    #[schema(example = "SP")]
    pub province: String,
    #[validate(length(min = 1, max = 128, message = "City is required"))]
    #[schema(example = "São Paulo")]
    pub city: String,
    #[validate(length(min = 1, max = 128, message = "Neighbourhood is required"))]
    #[schema(example = "Bela Vista")]
    pub neighbourhood: String,
    #[validate(length(min = 1, max = 16, message = "Number is required"))]
    #[schema(example = "1578")]
    pub number: String,
    #[validate(length(max = 256))]
    pub additional_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAddress {
    pub zip_code: Option<String>,
    #[validate(length(min = 1, max = 256))]
    pub street_address: Option<String>,
    #[validate(length(min = 2, max = 64))]
    pub province: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 128))]
    pub neighbourhood: Option<String>,
    #[validate(length(min = 1, max = 16))]
    pub number: Option<String>,
    #[validate(length(max = 256))]
    pub additional_info: Option<String>,
}

/// Address fields resolved from a postal code, ready to prefill a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AddressDraft {
    pub zip_code: String,
    pub street_address: String,
    pub neighbourhood: String,
    pub city: String,
    pub province: String,
    pub number: String,
    pub additional_info: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddressResponse {
    pub id: Uuid,
    pub zip_code: String,
    pub street_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub province: String,
    pub city: String,
    pub neighbourhood: String,
    pub number: String,
    pub additional_info: String,
    pub created_at: DateTime<Utc>,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            zip_code: address.zip_code,
            street_address: address.street_address,
            latitude: address.latitude,
            longitude: address.longitude,
            province: address.province,
            city: address.city,
            neighbourhood: address.neighbourhood,
            number: address.number,
            additional_info: address.additional_info,
            created_at: address.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paulista() -> Address {
        Address::new(CreateAddress {
            zip_code: "01310-100".to_string(),
            street_address: "Avenida Paulista".to_string(),
            province: "SP".to_string(),
            city: "São Paulo".to_string(),
            neighbourhood: "Bela Vista".to_string(),
            number: "1578".to_string(),
            additional_info: None,
        })
        .unwrap()
    }

    #[test]
    fn zip_code_is_reduced_to_digits() {
        assert_eq!(normalize_zip_code("01310-100").unwrap(), "01310100");
        assert_eq!(normalize_zip_code("01310100").unwrap(), "01310100");
    }

    #[test]
    fn malformed_zip_codes_are_rejected() {
        assert!(normalize_zip_code("0131-010").is_err());
        assert!(normalize_zip_code("abc10100").is_err());
        assert!(normalize_zip_code("").is_err());
    }

    #[test]
    fn coordinates_need_both_halves() {
        let mut address = paulista();
        assert!(address.coordinates().is_none());
        address.latitude = Some(-23.56);
        assert!(address.coordinates().is_none());
        address.longitude = Some(-46.65);
        assert_eq!(address.coordinates(), Some(Coordinates::new(-23.56, -46.65)));
    }

    #[test]
    fn geocoding_query_ends_with_country() {
        assert_eq!(
            paulista().geocoding_query(),
            "Avenida Paulista 1578, São Paulo, SP, Brasil"
        );
    }

    #[test]
    fn moving_fields_are_detected() {
        let mut address = paulista();
        let moved = address
            .apply(UpdateAddress {
                additional_info: Some("Sala 2".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(!moved);

        let moved = address
            .apply(UpdateAddress {
                number: Some("1000".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert!(moved);
    }
}
