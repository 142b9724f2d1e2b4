pub mod app_config;
pub mod database;
pub mod redis_repo;

pub use database::{DbClient, PostgresBannerRepository};
pub use redis_repo::RedisClient;
