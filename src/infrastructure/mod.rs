pub mod errors;
pub mod models;
pub mod order_cache;
pub mod order_repo;
