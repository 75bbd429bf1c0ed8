pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod repositories;
pub mod response;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
pub mod view;
