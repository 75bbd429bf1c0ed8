use uuid::Uuid;

use crate::{
    auth::{AuthUser, ensure_author, ensure_reviewer},
    db::KeyValueStore,
    dto::reviews::{CreateReviewRequest, UpdateReviewRequest},
    error::AppResult,
    models::Review,
    response::ActionResponse,
    state::AppState,
};

pub async fn list_reviews<S: KeyValueStore>(
    state: &AppState<S>,
    restaurant_id: Uuid,
) -> AppResult<Vec<Review>> {
    state.store.reviews().find_by_restaurant(restaurant_id).await
}

pub async fn create_review<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    restaurant_id: Uuid,
    payload: CreateReviewRequest,
) -> AppResult<ActionResponse<Review>> {
    ensure_reviewer(user)?;
    let review = state
        .store
        .reviews()
        .create(restaurant_id, user.user_id, &user.name, payload)
        .await?;

    tracing::info!(
        user_id = %user.user_id,
        review_id = %review.id,
        %restaurant_id,
        "review posted"
    );
    Ok(ActionResponse::success("Review posted", review))
}

/// Only the author may edit; id, author and creation time are kept.
pub async fn update_review<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateReviewRequest,
) -> AppResult<ActionResponse<Review>> {
    let reviews = state.store.reviews();
    let existing = reviews.find_by_id(id).await?;
    ensure_author(user, existing.author_id)?;
    let review = reviews.update(id, payload).await?;

    tracing::info!(user_id = %user.user_id, review_id = %id, "review updated");
    Ok(ActionResponse::success("Review updated", review))
}

pub async fn delete_review<S: KeyValueStore>(
    state: &AppState<S>,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ActionResponse<Review>> {
    let reviews = state.store.reviews();
    let existing = reviews.find_by_id(id).await?;
    ensure_author(user, existing.author_id)?;
    let review = reviews.delete_by_id(id).await?;

    tracing::info!(user_id = %user.user_id, review_id = %id, "review deleted");
    Ok(ActionResponse::success("Review deleted", review))
}
