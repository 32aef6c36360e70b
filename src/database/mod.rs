pub mod columns;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use columns::{ColumnError, ColumnValue, CourseColumn};
pub use manager::{DatabaseError, DatabaseManager};
pub use models::Course;
pub use repository::CourseRepository;
