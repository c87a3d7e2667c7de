//! # Application Layer
//!
//! Business services orchestrating the domain: validation of
//! preconditions, conditional persistence, and fan-out of accepted
//! transitions. Plus the DTOs crossing the HTTP boundary.

pub mod dto;
pub mod services;
