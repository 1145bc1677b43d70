pub mod auth;
pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod provider;
pub mod repository;
pub mod state;
pub mod utils;
