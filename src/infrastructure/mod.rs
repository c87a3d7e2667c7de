//! # Infrastructure Layer
//!
//! Concrete adapters behind the domain's repository and store traits:
//! PostgreSQL repositories, the Redis invite store, and connection setup.

pub mod cache;
pub mod database;
pub mod repositories;
