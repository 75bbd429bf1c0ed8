use uuid::Uuid;

use crate::{
    auth::AuthUser,
    db::KeyValueStore,
    error::AppResult,
    models::{AverageRating, Dish, Restaurant, Review, Role},
    services::{dish_service, restaurant_service, review_service},
    state::AppState,
};

pub const DEFAULT_IMAGE: &str = "🍽️";

#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantCard {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub image: String,
    pub rating: AverageRating,
    /// Edit and delete buttons.
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DishCard {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
    pub id: Uuid,
    pub author_name: String,
    pub rating: u8,
    pub stars: String,
    pub comment: String,
    pub date: String,
    pub edited: bool,
    pub can_manage: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub restaurant: Restaurant,
    pub average_rating: AverageRating,
    pub dishes: Vec<DishCard>,
    pub reviews: Vec<ReviewCard>,
    pub can_add_dish: bool,
    pub can_add_review: bool,
}

/// What the presentation layer draws for the current section.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Register,
    Login,
    RestaurantList(Vec<RestaurantCard>),
    AdminPanel(Vec<RestaurantCard>),
    RestaurantDetail(DetailView),
}

pub async fn restaurant_cards<S: KeyValueStore>(
    state: &AppState<S>,
    admin_actions: bool,
) -> AppResult<Vec<RestaurantCard>> {
    let restaurants = restaurant_service::list_restaurants(state).await?;
    let reviews = state.store.reviews().find_all().await?;

    Ok(restaurants
        .into_iter()
        .map(|restaurant| {
            let rating = AverageRating::from_ratings(
                reviews
                    .iter()
                    .filter(|r| r.restaurant_id == restaurant.id)
                    .map(|r| r.rating),
            );
            restaurant_card(restaurant, rating, admin_actions)
        })
        .collect())
}

pub async fn detail_view<S: KeyValueStore>(
    state: &AppState<S>,
    restaurant_id: Uuid,
    viewer: &AuthUser,
) -> AppResult<DetailView> {
    let restaurant = restaurant_service::get_restaurant(state, restaurant_id).await?;
    let dishes = dish_service::list_dishes(state, restaurant_id).await?;
    let reviews = review_service::list_reviews(state, restaurant_id).await?;
    let is_admin = viewer.role == Role::Admin;

    Ok(DetailView {
        restaurant,
        average_rating: AverageRating::from_ratings(reviews.iter().map(|r| r.rating)),
        dishes: dishes
            .into_iter()
            .map(|d| dish_card(d, is_admin))
            .collect(),
        reviews: reviews
            .into_iter()
            .map(|r| {
                let can_manage = !is_admin && r.author_id == viewer.user_id;
                review_card(r, can_manage)
            })
            .collect(),
        can_add_dish: is_admin,
        can_add_review: !is_admin,
    })
}

fn restaurant_card(
    restaurant: Restaurant,
    rating: AverageRating,
    can_manage: bool,
) -> RestaurantCard {
    RestaurantCard {
        id: restaurant.id,
        name: restaurant.name,
        description: restaurant.description,
        category: restaurant.category,
        location: restaurant.location,
        image: restaurant.image.unwrap_or_else(|| DEFAULT_IMAGE.to_string()),
        rating,
        can_manage,
    }
}

fn dish_card(dish: Dish, can_manage: bool) -> DishCard {
    DishCard {
        id: dish.id,
        name: dish.name,
        description: dish.description,
        category: dish.category,
        price: format!("${:.2}", dish.price),
        can_manage,
    }
}

fn review_card(review: Review, can_manage: bool) -> ReviewCard {
    ReviewCard {
        id: review.id,
        author_name: review.author_name,
        rating: review.rating,
        stars: "⭐".repeat(usize::from(review.rating)),
        comment: review.comment,
        date: review.created_at.format("%Y-%m-%d").to_string(),
        edited: review.updated_at.is_some(),
        can_manage,
    }
}
