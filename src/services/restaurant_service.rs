use uuid::Uuid;

use crate::{
    auth::{AuthUser, ensure_admin},
    db::KeyValueStore,
    dto::restaurants::{CreateRestaurantRequest, UpdateRestaurantRequest},
    error::AppResult,
    models::{AverageRating, Restaurant},
    repositories::CascadeReport,
    response::ActionResponse,
    state::AppState,
};

pub async fn list_restaurants<S: KeyValueStore>(state: &AppState<S>) -> AppResult<Vec<Restaurant>> {
    state.store.restaurants().find_all().await
}

pub async fn get_restaurant<S: KeyValueStore>(
    state: &AppState<S>,
    id: Uuid,
) -> AppResult<Restaurant> {
    state.store.restaurants().find_by_id(id).await
}

pub async fn average_rating<S: KeyValueStore>(
    state: &AppState<S>,
    restaurant_id: Uuid,
) -> AppResult<AverageRating> {
    state.store.reviews().average_rating(restaurant_id).await
}

pub async fn create_restaurant<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    payload: CreateRestaurantRequest,
) -> AppResult<ActionResponse<Restaurant>> {
    ensure_admin(user, "create restaurants")?;
    let restaurant = state.store.restaurants().create(user.user_id, payload).await?;

    tracing::info!(user_id = %user.user_id, restaurant_id = %restaurant.id, "restaurant created");
    Ok(ActionResponse::success("Restaurant created", restaurant))
}

pub async fn update_restaurant<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRestaurantRequest,
) -> AppResult<ActionResponse<Restaurant>> {
    ensure_admin(user, "edit restaurants")?;
    let restaurant = state.store.restaurants().update(id, payload).await?;

    tracing::info!(user_id = %user.user_id, restaurant_id = %restaurant.id, "restaurant updated");
    Ok(ActionResponse::success("Restaurant updated", restaurant))
}

/// Deletes the restaurant together with its dishes and reviews.
pub async fn delete_restaurant<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ActionResponse<CascadeReport>> {
    ensure_admin(user, "delete restaurants")?;
    let report = state.store.restaurants().delete_cascade(id).await?;

    tracing::info!(
        user_id = %user.user_id,
        restaurant_id = %id,
        dishes_removed = report.dishes_removed,
        reviews_removed = report.reviews_removed,
        "restaurant deleted"
    );
    Ok(ActionResponse::success("Restaurant deleted", report))
}
