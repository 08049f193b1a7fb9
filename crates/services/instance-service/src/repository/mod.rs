//! Repository layer - record store access.

pub mod entities;
mod instance_info_repository;

pub use instance_info_repository::{InstanceInfoRepository, InstanceInfoStore};

#[cfg(any(test, feature = "test-utils"))]
pub use instance_info_repository::MockInstanceInfoRepository;
