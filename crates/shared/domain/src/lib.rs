//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The `InstanceInfo` entity defined here is both the relational row and the
//! search document shape.

pub mod constants;
pub mod error;
pub mod instance_info;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use instance_info::InstanceInfo;
