//! Request Handlers

pub mod friend;
pub mod health;
pub mod invite;
pub mod member;
