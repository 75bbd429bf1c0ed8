pub mod auth;
pub mod dishes;
pub mod restaurants;
pub mod reviews;
