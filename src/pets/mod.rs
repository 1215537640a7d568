pub mod error;
pub mod handlers;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;

pub use error::*;
pub use models::*;
pub use query::*;
pub use repository::*;
pub use service::*;
