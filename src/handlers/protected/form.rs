//! Multipart room form: text fields plus optional image parts. Parsing is
//! lenient (unknown text fields are ignored); validation collects every
//! field problem into one response.

use std::collections::HashMap;

use axum::extract::Multipart;
use rust_decimal::Decimal;

use crate::database::models::{RoomDraft, RoomKind};
use crate::error::ApiError;
use crate::filter::coerce_bool;
use crate::services::UploadedImage;

#[derive(Debug, Default)]
pub struct RoomForm {
    pub fields: HashMap<String, String>,
    pub images: Vec<UploadedImage>,
    pub thumbnail: Option<UploadedImage>,
}

impl RoomForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(file_name) = field.file_name() {
                let file_name = file_name.to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {e}")))?;
                let upload = UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                };

                match name.as_str() {
                    "thumbnail" => form.thumbnail = Some(upload),
                    "images" | "images[]" => form.images.push(upload),
                    other => {
                        return Err(ApiError::bad_request(format!(
                            "Unexpected file field: {other}"
                        )))
                    }
                }
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read field: {e}")))?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    /// Validate the text fields into a draft. Empty strings count as absent,
    /// matching the usual HTML form behavior.
    pub fn to_draft(&self) -> Result<RoomDraft, ApiError> {
        let mut errors: HashMap<String, String> = HashMap::new();

        let name = self.require("name", "Room name is required", &mut errors);
        if let Some(name) = name {
            if name.chars().count() > 255 {
                errors.insert(
                    "name".to_string(),
                    "Room name must not exceed 255 characters".to_string(),
                );
            }
        }
        let address = self.require("address", "Room address is required", &mut errors);
        let bedrooms = self.non_negative_int("bedrooms", "Bedrooms", &mut errors);
        let bathrooms = self.non_negative_int("bathrooms", "Bathrooms", &mut errors);
        let price = self.non_negative_decimal("price", "Price", &mut errors);
        let area = self.non_negative_decimal("area", "Area", &mut errors);

        let kind = match self.value("type") {
            None => {
                errors.insert("type".to_string(), "Room type is required".to_string());
                None
            }
            Some(v) => match RoomKind::parse(v) {
                Some(kind) => Some(kind),
                None => {
                    errors.insert(
                        "type".to_string(),
                        "Room type must be rent or sale".to_string(),
                    );
                    None
                }
            },
        };

        let is_available = match self.value("is_available") {
            None => None,
            Some(v) => match coerce_bool(v) {
                Some(b) => Some(b),
                None => {
                    errors.insert(
                        "is_available".to_string(),
                        "Availability must be a boolean".to_string(),
                    );
                    None
                }
            },
        };

        match (name, address, bedrooms, bathrooms, price, area, kind) {
            (Some(name), Some(address), Some(bedrooms), Some(bathrooms), Some(price), Some(area), Some(kind))
                if errors.is_empty() =>
            {
                Ok(RoomDraft {
                    name: name.to_string(),
                    address: address.to_string(),
                    description: self.value("description").map(String::from),
                    bedrooms,
                    bathrooms,
                    price,
                    area,
                    kind,
                    is_available,
                })
            }
            _ => Err(ApiError::validation_error(
                "The given data was invalid",
                Some(errors),
            )),
        }
    }

    fn value(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(v) if !v.is_empty() => Some(v.as_str()),
            _ => None,
        }
    }

    fn require<'a>(
        &'a self,
        key: &str,
        message: &str,
        errors: &mut HashMap<String, String>,
    ) -> Option<&'a str> {
        let value = self.value(key);
        if value.is_none() {
            errors.insert(key.to_string(), message.to_string());
        }
        value
    }

    fn non_negative_int(
        &self,
        key: &str,
        label: &str,
        errors: &mut HashMap<String, String>,
    ) -> Option<i32> {
        let value = match self.value(key) {
            None => {
                errors.insert(key.to_string(), format!("{label} is required"));
                return None;
            }
            Some(v) => v,
        };
        match value.parse::<i32>() {
            Ok(n) if n >= 0 => Some(n),
            Ok(_) => {
                errors.insert(key.to_string(), format!("{label} must be at least 0"));
                None
            }
            Err(_) => {
                errors.insert(key.to_string(), format!("{label} must be an integer"));
                None
            }
        }
    }

    fn non_negative_decimal(
        &self,
        key: &str,
        label: &str,
        errors: &mut HashMap<String, String>,
    ) -> Option<Decimal> {
        let value = match self.value(key) {
            None => {
                errors.insert(key.to_string(), format!("{label} is required"));
                return None;
            }
            Some(v) => v,
        };
        match value.parse::<Decimal>() {
            Ok(n) if n >= Decimal::ZERO => Some(n),
            Ok(_) => {
                errors.insert(key.to_string(), format!("{label} must be at least 0"));
                None
            }
            Err(_) => {
                errors.insert(key.to_string(), format!("{label} must be a number"));
                None
            }
        }
    }
}
