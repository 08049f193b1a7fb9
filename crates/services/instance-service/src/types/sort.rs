//! Caller-specified ordering for record store listings.
//!
//! Parsed from the `sort=<field>,<asc|desc>` query parameter.

use std::str::FromStr;

use common::AppError;

/// Sortable InstanceInfo columns, named by their JSON field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    InstanceInfoName,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortField::Id),
            "instanceInfoName" => Ok(SortField::InstanceInfoName),
            "description" => Ok(SortField::Description),
            other => Err(AppError::bad_request(format!("unknown sort field '{}'", other))),
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(AppError::bad_request(format!(
                "unknown sort direction '{}'",
                other
            ))),
        }
    }
}

impl FromStr for Sort {
    type Err = AppError;

    /// Parse `field` or `field,direction`; direction defaults to ascending.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',').map(str::trim);
        let field = parts.next().unwrap_or_default().parse()?;
        let direction = match parts.next() {
            Some(dir) if !dir.is_empty() => dir.parse()?,
            _ => SortDirection::Asc,
        };
        Ok(Sort { field, direction })
    }
}
