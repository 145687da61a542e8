use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Car {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub brand: String,
    #[serde(rename = "gasType", default)]
    pub gas_type: i32,
    #[serde(default)]
    pub price: f64,
}

/// Body accepted by create and update. Any `_id` in the payload is ignored;
/// the path decides which car is touched.
#[derive(Deserialize)]
pub struct CarInput {
    pub name: String,
    pub brand: String,
    #[serde(rename = "gasType", default)]
    pub gas_type: i32,
    #[serde(default)]
    pub price: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: u64,
    pub name: String,
    pub fipe_name: String,
    pub key: String,
    pub order: u32,
}

/// Cars in insertion order.
pub type Db = Arc<RwLock<Vec<Car>>>;

pub fn app() -> Router {
    app_with_cars(Vec::new())
}

/// Router whose store starts with `cars`.
pub fn app_with_cars(cars: Vec<Car>) -> Router {
    let db: Db = Arc::new(RwLock::new(cars));
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route("/cars/{id}", put(update_car).delete(delete_car))
        .route("/brands", get(list_brands))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Fixed FIPE-style catalog.
pub fn brands() -> Vec<Brand> {
    [(6, "AUDI", "Audi", 2), (21, "FIAT", "Fiat", 2), (59, "VW - VOLKSWAGEN", "VW - VolksWagen", 2)]
        .into_iter()
        .map(|(id, name, fipe_name, order)| Brand {
            id,
            name: name.to_string(),
            fipe_name: fipe_name.to_string(),
            key: format!("{}-{id}", fipe_name.to_lowercase().replace(' ', "")),
            order,
        })
        .collect()
}

async fn list_cars(State(db): State<Db>) -> Json<Vec<Car>> {
    Json(db.read().await.clone())
}

async fn create_car(State(db): State<Db>, Json(input): Json<CarInput>) -> Json<Car> {
    let car = Car {
        id: Uuid::new_v4().to_string(),
        name: input.name,
        brand: input.brand,
        gas_type: input.gas_type,
        price: input.price,
    };
    db.write().await.push(car.clone());
    tracing::info!(id = %car.id, "car created");
    Json(car)
}

async fn update_car(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<CarInput>,
) -> Result<Json<Car>, StatusCode> {
    let mut cars = db.write().await;
    let car = cars
        .iter_mut()
        .find(|car| car.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    car.name = input.name;
    car.brand = input.brand;
    car.gas_type = input.gas_type;
    car.price = input.price;
    Ok(Json(car.clone()))
}

async fn delete_car(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<Json<Car>, StatusCode> {
    let mut cars = db.write().await;
    let index = cars
        .iter()
        .position(|car| car.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    let removed = cars.remove(index);
    tracing::info!(id = %removed.id, "car deleted");
    Ok(Json(removed))
}

async fn list_brands() -> Json<Vec<Brand>> {
    Json(brands())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_serializes_with_server_field_names() {
        let car = Car {
            id: "1".to_string(),
            name: "Fusca".to_string(),
            brand: "VW".to_string(),
            gas_type: 2,
            price: 15000.0,
        };
        let json = serde_json::to_value(&car).unwrap();
        assert_eq!(json["_id"], "1");
        assert_eq!(json["name"], "Fusca");
        assert_eq!(json["gasType"], 2);
        assert_eq!(json["price"], 15000.0);
    }

    #[test]
    fn car_input_defaults_optional_fields() {
        let input: CarInput = serde_json::from_str(r#"{"name":"Gol","brand":"VW"}"#).unwrap();
        assert_eq!(input.name, "Gol");
        assert_eq!(input.gas_type, 0);
        assert_eq!(input.price, 0.0);
    }

    #[test]
    fn car_input_ignores_client_id() {
        let input: CarInput =
            serde_json::from_str(r#"{"_id":"x","name":"Gol","brand":"VW"}"#).unwrap();
        assert_eq!(input.brand, "VW");
    }

    #[test]
    fn car_input_rejects_missing_brand() {
        let result: Result<CarInput, _> = serde_json::from_str(r#"{"name":"Gol"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn brand_catalog_uses_fipe_keys() {
        let brands = brands();
        assert_eq!(brands.len(), 3);
        assert_eq!(brands[0].fipe_name, "Audi");
        assert_eq!(brands[0].key, "audi-6");
        assert_eq!(brands[2].key, "vw-volkswagen-59");
    }
}
