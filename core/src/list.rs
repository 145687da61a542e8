//! The list of cars a screen is showing.
//!
//! Holds the result of the last successful load. A failed load leaves it
//! untouched, and a car is removed only after the server confirmed the delete.

use crate::api::CarsApi;
use crate::error::CarError;
use crate::types::Car;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CarList {
    cars: Vec<Car>,
}

impl CarList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Car> {
        self.cars.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Car> {
        self.cars.iter()
    }

    pub fn as_slice(&self) -> &[Car] {
        &self.cars
    }

    /// Replace the contents with a successful load; keep them on failure.
    pub fn apply_load(&mut self, loaded: Result<Vec<Car>, CarError>) -> Result<(), CarError> {
        self.cars = loaded?;
        Ok(())
    }

    pub async fn reload(&mut self, api: &dyn CarsApi) -> Result<(), CarError> {
        let loaded = api.list_cars().await;
        self.apply_load(loaded)
    }

    /// Delete the car at `index` on the server, then locally.
    ///
    /// Returns `None` without issuing a request when `index` is out of range.
    /// On failure the list is unchanged.
    pub async fn delete_at(
        &mut self,
        api: &dyn CarsApi,
        index: usize,
    ) -> Option<Result<Car, CarError>> {
        let car = self.cars.get(index)?;
        let outcome = api.delete(car).await;
        Some(outcome.map(|()| self.cars.remove(index)))
    }
}

impl<'a> IntoIterator for &'a CarList {
    type Item = &'a Car;
    type IntoIter = std::slice::Iter<'a, Car>;

    fn into_iter(self) -> Self::IntoIter {
        self.cars.iter()
    }
}
