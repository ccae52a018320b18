pub mod manager;
pub mod memory;
pub mod models;
pub mod query_builder;
pub mod repository;
pub mod seed;
pub mod sql;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryRepository;
pub use repository::CityInfoRepository;
pub use sql::SqlRepository;
