use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::KeyValueStore,
    dto::dishes::{CreateDishRequest, UpdateDishRequest},
    error::{AppError, AppResult},
    models::Dish,
    validation::{require_fields, validate_price},
};

use super::Dishes;

impl<S: KeyValueStore> Dishes<'_, S> {
    pub async fn find_by_restaurant(&self, restaurant_id: Uuid) -> AppResult<Vec<Dish>> {
        self.find_where(|d| d.restaurant_id == restaurant_id).await
    }

    pub async fn create(&self, restaurant_id: Uuid, payload: CreateDishRequest) -> AppResult<Dish> {
        validate_dish(&payload.name, &payload.description, payload.price, &payload.category)?;
        if !self.store().restaurants().exists(restaurant_id).await? {
            return Err(AppError::not_found("Restaurant"));
        }
        let dish = Dish {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            description: payload.description.trim().to_string(),
            price: payload.price,
            category: payload.category.trim().to_string(),
            restaurant_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        self.insert(dish).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateDishRequest) -> AppResult<Dish> {
        let mut dish = self.find_by_id(id).await?;
        if let Some(name) = payload.name {
            dish.name = name.trim().to_string();
        }
        if let Some(description) = payload.description {
            dish.description = description.trim().to_string();
        }
        if let Some(price) = payload.price {
            dish.price = price;
        }
        if let Some(category) = payload.category {
            dish.category = category.trim().to_string();
        }
        validate_dish(&dish.name, &dish.description, dish.price, &dish.category)?;
        if !self.store().restaurants().exists(dish.restaurant_id).await? {
            return Err(AppError::not_found("Restaurant"));
        }
        dish.updated_at = Some(Utc::now());
        self.replace(dish).await
    }
}

fn validate_dish(name: &str, description: &str, price: f64, category: &str) -> AppResult<()> {
    require_fields(&[("name", name), ("description", description), ("category", category)])?;
    validate_price(price)
}
