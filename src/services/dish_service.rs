use uuid::Uuid;

use crate::{
    auth::{AuthUser, ensure_admin},
    db::KeyValueStore,
    dto::dishes::{CreateDishRequest, UpdateDishRequest},
    error::AppResult,
    models::Dish,
    response::ActionResponse,
    state::AppState,
};

pub async fn list_dishes<S: KeyValueStore>(
    state: &AppState<S>,
    restaurant_id: Uuid,
) -> AppResult<Vec<Dish>> {
    state.store.dishes().find_by_restaurant(restaurant_id).await
}

pub async fn create_dish<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    restaurant_id: Uuid,
    payload: CreateDishRequest,
) -> AppResult<ActionResponse<Dish>> {
    ensure_admin(user, "create dishes")?;
    let dish = state.store.dishes().create(restaurant_id, payload).await?;

    tracing::info!(user_id = %user.user_id, dish_id = %dish.id, %restaurant_id, "dish created");
    Ok(ActionResponse::success("Dish created", dish))
}

pub async fn update_dish<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateDishRequest,
) -> AppResult<ActionResponse<Dish>> {
    ensure_admin(user, "edit dishes")?;
    let dish = state.store.dishes().update(id, payload).await?;

    tracing::info!(user_id = %user.user_id, dish_id = %dish.id, "dish updated");
    Ok(ActionResponse::success("Dish updated", dish))
}

pub async fn delete_dish<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ActionResponse<Dish>> {
    ensure_admin(user, "delete dishes")?;
    let dish = state.store.dishes().delete_by_id(id).await?;

    tracing::info!(user_id = %user.user_id, dish_id = %id, "dish deleted");
    Ok(ActionResponse::success("Dish deleted", dish))
}
