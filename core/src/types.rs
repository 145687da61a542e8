//! Domain records exchanged with the cars API and the brand catalog.
//!
//! # Design
//! Field names follow the wire format through `serde` renames: the server
//! keys the identifier as `_id` and the fuel code as `gasType`, and the FIPE
//! catalog carries the display name under `fipe_name`. Unknown fields are
//! ignored so catalog additions do not break decoding.

use serde::{Deserialize, Serialize};

/// A vehicle listing.
///
/// `id` stays `None` until the server has persisted the car; it is omitted
/// from the encoded JSON while absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Car {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub brand: String,
    #[serde(rename = "gasType", default, skip_serializing_if = "Option::is_none")]
    pub gas_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl Car {
    /// A car that has not been saved yet.
    pub fn new(name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            brand: brand.into(),
            ..Self::default()
        }
    }

    /// The server-assigned identifier, if present and non-empty.
    pub fn persisted_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn fuel(&self) -> Option<FuelType> {
        self.gas_type.map(FuelType::from_code)
    }
}

/// Fuel kind decoded from the numeric `gasType` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelType {
    Flex,
    Alcohol,
    Gasoline,
}

impl FuelType {
    /// `0` is flex and `1` alcohol; every other code is gasoline.
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => FuelType::Flex,
            1 => FuelType::Alcohol,
            _ => FuelType::Gasoline,
        }
    }

    pub fn code(self) -> i32 {
        match self {
            FuelType::Flex => 0,
            FuelType::Alcohol => 1,
            FuelType::Gasoline => 2,
        }
    }
}

/// A manufacturer entry from the FIPE catalog. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Brand {
    pub id: u64,
    #[serde(rename = "fipe_name")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_decodes_server_field_names() {
        let car: Car = serde_json::from_str(
            r#"{"_id":"1","name":"Fusca","brand":"VW","gasType":1,"price":15000.5}"#,
        )
        .unwrap();
        assert_eq!(car.id.as_deref(), Some("1"));
        assert_eq!(car.name, "Fusca");
        assert_eq!(car.brand, "VW");
        assert_eq!(car.gas_type, Some(1));
        assert_eq!(car.price, Some(15000.5));
    }

    #[test]
    fn car_optional_fields_default_to_none() {
        let car: Car = serde_json::from_str(r#"{"name":"Gol","brand":"VW"}"#).unwrap();
        assert!(car.id.is_none());
        assert!(car.gas_type.is_none());
        assert!(car.price.is_none());
    }

    #[test]
    fn unsaved_car_omits_id_when_encoded() {
        let json = serde_json::to_value(Car::new("Gol", "VW")).unwrap();
        assert!(json.get("_id").is_none());
        assert!(json.get("gasType").is_none());
        assert_eq!(json["name"], "Gol");
        assert_eq!(json["brand"], "VW");
    }

    #[test]
    fn car_roundtrips_through_json() {
        let car = Car {
            id: Some("abc".to_string()),
            name: "Uno".to_string(),
            brand: "Fiat".to_string(),
            gas_type: Some(2),
            price: Some(9999.99),
        };
        let json = serde_json::to_string(&car).unwrap();
        let back: Car = serde_json::from_str(&json).unwrap();
        assert_eq!(back, car);
    }

    #[test]
    fn car_missing_name_is_rejected() {
        let result: Result<Car, _> = serde_json::from_str(r#"{"brand":"VW"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_id_is_not_persisted() {
        let mut car = Car::new("Gol", "VW");
        car.id = Some(String::new());
        assert!(car.persisted_id().is_none());
        car.id = Some("42".to_string());
        assert_eq!(car.persisted_id(), Some("42"));
    }

    #[test]
    fn fuel_codes_map_to_fuel_types() {
        assert_eq!(FuelType::from_code(0), FuelType::Flex);
        assert_eq!(FuelType::from_code(1), FuelType::Alcohol);
        assert_eq!(FuelType::from_code(2), FuelType::Gasoline);
        assert_eq!(FuelType::from_code(7), FuelType::Gasoline);
        assert_eq!(FuelType::Alcohol.code(), 1);

        let mut car = Car::new("Gol", "VW");
        assert!(car.fuel().is_none());
        car.gas_type = Some(0);
        assert_eq!(car.fuel(), Some(FuelType::Flex));
    }

    #[test]
    fn brand_decodes_fipe_payload() {
        let brands: Vec<Brand> = serde_json::from_str(
            r#"[{"name":"AUDI","fipe_name":"Audi","order":2,"key":"audi-6","id":6}]"#,
        )
        .unwrap();
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].id, 6);
        assert_eq!(brands[0].name, "Audi");
        assert_eq!(brands[0].key.as_deref(), Some("audi-6"));
        assert_eq!(brands[0].order, Some(2));
    }

    #[test]
    fn brand_requires_display_name() {
        let result: Result<Brand, _> = serde_json::from_str(r#"{"id":6,"name":"AUDI"}"#);
        assert!(result.is_err());
    }
}
