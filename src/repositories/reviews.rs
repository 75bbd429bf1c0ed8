use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::KeyValueStore,
    dto::reviews::{CreateReviewRequest, UpdateReviewRequest},
    error::{AppError, AppResult},
    models::{AverageRating, Review},
    validation::{require_fields, validate_rating},
};

use super::Reviews;

impl<S: KeyValueStore> Reviews<'_, S> {
    pub async fn find_by_restaurant(&self, restaurant_id: Uuid) -> AppResult<Vec<Review>> {
        self.find_where(|r| r.restaurant_id == restaurant_id).await
    }

    /// `author_name` is copied from the author at creation and never refreshed.
    pub async fn create(
        &self,
        restaurant_id: Uuid,
        author_id: Uuid,
        author_name: &str,
        payload: CreateReviewRequest,
    ) -> AppResult<Review> {
        validate_review(payload.rating, &payload.comment)?;
        if !self.store().restaurants().exists(restaurant_id).await? {
            return Err(AppError::not_found("Restaurant"));
        }
        let review = Review {
            id: Uuid::new_v4(),
            restaurant_id,
            author_id,
            author_name: author_name.to_string(),
            rating: payload.rating,
            comment: payload.comment.trim().to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.insert(review).await
    }

    pub async fn update(&self, id: Uuid, payload: UpdateReviewRequest) -> AppResult<Review> {
        let mut review = self.find_by_id(id).await?;
        if let Some(rating) = payload.rating {
            review.rating = rating;
        }
        if let Some(comment) = payload.comment {
            review.comment = comment.trim().to_string();
        }
        validate_review(review.rating, &review.comment)?;
        if !self.store().restaurants().exists(review.restaurant_id).await? {
            return Err(AppError::not_found("Restaurant"));
        }
        review.updated_at = Some(Utc::now());
        self.replace(review).await
    }

    pub async fn average_rating(&self, restaurant_id: Uuid) -> AppResult<AverageRating> {
        let reviews = self.find_by_restaurant(restaurant_id).await?;
        Ok(AverageRating::from_ratings(reviews.iter().map(|r| r.rating)))
    }
}

fn validate_review(rating: u8, comment: &str) -> AppResult<()> {
    require_fields(&[("comment", comment)])?;
    validate_rating(rating)
}
