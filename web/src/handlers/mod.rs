//! HTTP request handlers, one module per resource.

pub mod films;
pub mod health;
pub mod reference;
pub mod users;

pub use health::health_check;
