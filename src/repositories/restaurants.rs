use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::KeyValueStore,
    dto::restaurants::{CreateRestaurantRequest, UpdateRestaurantRequest},
    error::{AppError, AppResult},
    models::{Dish, Restaurant, Review},
    store::{Collection, WriteBatch},
    validation::{non_blank, require_fields},
};

use super::Restaurants;

/// What a cascading restaurant delete removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub restaurant_id: Uuid,
    pub dishes_removed: usize,
    pub reviews_removed: usize,
}

impl<S: KeyValueStore> Restaurants<'_, S> {
    pub async fn create(
        &self,
        created_by: Uuid,
        payload: CreateRestaurantRequest,
    ) -> AppResult<Restaurant> {
        validate_restaurant(
            &payload.name,
            &payload.description,
            &payload.category,
            &payload.location,
        )?;
        let restaurant = Restaurant {
            id: Uuid::new_v4(),
            name: payload.name.trim().to_string(),
            description: payload.description.trim().to_string(),
            category: payload.category.trim().to_string(),
            location: payload.location.trim().to_string(),
            image: non_blank(payload.image),
            created_at: Utc::now(),
            created_by,
            updated_at: None,
        };
        self.insert(restaurant).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        payload: UpdateRestaurantRequest,
    ) -> AppResult<Restaurant> {
        let mut restaurant = self.find_by_id(id).await?;
        if let Some(name) = payload.name {
            restaurant.name = name.trim().to_string();
        }
        if let Some(description) = payload.description {
            restaurant.description = description.trim().to_string();
        }
        if let Some(category) = payload.category {
            restaurant.category = category.trim().to_string();
        }
        if let Some(location) = payload.location {
            restaurant.location = location.trim().to_string();
        }
        if payload.image.is_some() {
            restaurant.image = non_blank(payload.image);
        }
        validate_restaurant(
            &restaurant.name,
            &restaurant.description,
            &restaurant.category,
            &restaurant.location,
        )?;
        restaurant.updated_at = Some(Utc::now());
        self.replace(restaurant).await
    }

    /// Removes the restaurant with its dishes and reviews in a single write.
    pub async fn delete_cascade(&self, id: Uuid) -> AppResult<CascadeReport> {
        let store = self.store();
        let mut restaurants = self.find_all().await?;
        let before = restaurants.len();
        restaurants.retain(|r| r.id != id);
        if restaurants.len() == before {
            return Err(AppError::not_found("Restaurant"));
        }

        let mut dishes: Vec<Dish> = store.load(Collection::Dishes).await?;
        let dish_count = dishes.len();
        dishes.retain(|d| d.restaurant_id != id);

        let mut reviews: Vec<Review> = store.load(Collection::Reviews).await?;
        let review_count = reviews.len();
        reviews.retain(|r| r.restaurant_id != id);

        let batch = WriteBatch::new()
            .put(Collection::Restaurants, &restaurants)?
            .put(Collection::Dishes, &dishes)?
            .put(Collection::Reviews, &reviews)?;
        store.save_many(batch).await?;

        Ok(CascadeReport {
            restaurant_id: id,
            dishes_removed: dish_count - dishes.len(),
            reviews_removed: review_count - reviews.len(),
        })
    }
}

fn validate_restaurant(
    name: &str,
    description: &str,
    category: &str,
    location: &str,
) -> AppResult<()> {
    require_fields(&[
        ("name", name),
        ("description", description),
        ("category", category),
        ("location", location),
    ])
}
