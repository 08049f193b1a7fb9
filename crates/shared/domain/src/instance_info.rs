//! InstanceInfo domain entity.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_INSTANCE_INFO_NAME_LENGTH;
use crate::error::{DomainError, DomainResult};

/// InstanceInfo entity.
///
/// The same value lives in the record store (source of truth) and, keyed by
/// `id`, in the search index. `id` stays `None` until the record store
/// assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    /// Identifier generated by the record store
    #[cfg_attr(feature = "openapi", schema(example = 1))]
    pub id: Option<i64>,
    /// Display name (required)
    #[cfg_attr(feature = "openapi", schema(example = "AAAAA"))]
    pub instance_info_name: String,
    /// Free-form description
    #[cfg_attr(feature = "openapi", schema(example = "AAAAA"))]
    pub description: Option<String>,
}

impl InstanceInfo {
    /// Create a not-yet-persisted instance.
    pub fn new(instance_info_name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            instance_info_name: instance_info_name.into(),
            description,
        }
    }

    /// Return a copy carrying the given identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Whether the record store has not assigned an id yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Identifier or an error for entities that were never persisted.
    pub fn require_id(&self) -> DomainResult<i64> {
        self.id
            .ok_or_else(|| DomainError::internal("InstanceInfo has no id"))
    }

    /// Check the only business rule: a name is required.
    pub fn validate(&self) -> DomainResult<()> {
        if self.instance_info_name.chars().count() < MIN_INSTANCE_INFO_NAME_LENGTH {
            return Err(DomainError::validation("instanceInfoName is required"));
        }
        Ok(())
    }
}
