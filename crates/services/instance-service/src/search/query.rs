//! `field:value` search terms.
//!
//! Elasticsearch receives the raw query string untouched (`query_string`).
//! The in-process index evaluates the subset below with the same results for
//! the queries the API documents:
//!
//! - `id:42` matches the document with id 42 exactly (a non-numeric id is rejected)
//! - `instanceInfoName:foo` / `description:foo` match a whitespace token, ignoring case
//! - `"two words"` (quoted) matches a substring, ignoring case
//! - a bare term matches either text field
//! - `*` matches every document
//!
//! Terms are OR-ed, like `query_string` with its default operator.

use common::{AppError, AppResult};
use domain::{is_searchable_field, InstanceInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    Id,
    InstanceInfoName,
    Description,
    Any,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    MatchAll,
    Match {
        field: Field,
        value: String,
        phrase: bool,
    },
}

/// Parsed search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    terms: Vec<Term>,
}

impl SearchQuery {
    /// Parse a raw query string.
    ///
    /// Fails with a validation error when a term names an unknown field or
    /// has an empty value.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let terms = tokenize(raw)
            .into_iter()
            .map(|token| parse_term(&token))
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self { terms })
    }

    /// Whether the query has no terms (and therefore matches nothing).
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluate the query against one document.
    pub fn matches(&self, doc: &InstanceInfo) -> bool {
        self.terms.iter().any(|term| term.matches(doc))
    }
}

impl Term {
    fn matches(&self, doc: &InstanceInfo) -> bool {
        match self {
            Term::MatchAll => true,
            Term::Match {
                field,
                value,
                phrase,
            } => match field {
                Field::Id => value
                    .parse::<i64>()
                    .map(|id| doc.id == Some(id))
                    .unwrap_or(false),
                Field::InstanceInfoName => text_matches(&doc.instance_info_name, value, *phrase),
                Field::Description => doc
                    .description
                    .as_deref()
                    .is_some_and(|d| text_matches(d, value, *phrase)),
                Field::Any => {
                    text_matches(&doc.instance_info_name, value, *phrase)
                        || doc
                            .description
                            .as_deref()
                            .is_some_and(|d| text_matches(d, value, *phrase))
                }
            },
        }
    }
}

fn text_matches(text: &str, value: &str, phrase: bool) -> bool {
    let text = text.to_lowercase();
    let value = value.to_lowercase();
    if phrase {
        text.contains(&value)
    } else {
        text.split_whitespace().any(|token| token == value)
    }
}

/// Split on whitespace, keeping double-quoted runs together.
fn tokenize(raw: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in raw.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn parse_term(token: &str) -> AppResult<Term> {
    if token == "*" || token == "*:*" {
        return Ok(Term::MatchAll);
    }

    let (field, value) = match token.split_once(':') {
        Some((name, value)) if !name.starts_with('"') => {
            if !is_searchable_field(name) {
                return Err(AppError::validation(format!(
                    "unknown search field '{}'",
                    name
                )));
            }
            let field = match name {
                "id" => Field::Id,
                "instanceInfoName" => Field::InstanceInfoName,
                _ => Field::Description,
            };
            (field, value)
        }
        _ => (Field::Any, token),
    };

    let phrase = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    let value = value.trim_matches('"');
    if value.is_empty() {
        return Err(AppError::validation(format!(
            "search term '{}' has no value",
            token
        )));
    }

    if field == Field::Id && value.parse::<i64>().is_err() {
        return Err(AppError::validation(format!(
            "search term '{}' needs a numeric id",
            token
        )));
    }

    Ok(Term::Match {
        field,
        value: value.to_string(),
        phrase,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: i64, name: &str, description: Option<&str>) -> InstanceInfo {
        InstanceInfo::new(name, description.map(str::to_string)).with_id(id)
    }

    #[test]
    fn id_term_matches_exactly() {
        let query = SearchQuery::parse("id:12").unwrap();
        assert!(query.matches(&doc(12, "AAAAA", None)));
        assert!(!query.matches(&doc(120, "AAAAA", None)));
    }

    #[test]
    fn text_terms_ignore_case() {
        let item = doc(1, "Main Hotel", Some("Sea view rooms"));
        assert!(SearchQuery::parse("instanceInfoName:hotel").unwrap().matches(&item));
        assert!(SearchQuery::parse("description:VIEW").unwrap().matches(&item));
        assert!(!SearchQuery::parse("instanceInfoName:view").unwrap().matches(&item));
    }

    #[test]
    fn bare_and_quoted_terms() {
        let item = doc(1, "Main Hotel", Some("Sea view rooms"));
        assert!(SearchQuery::parse("rooms").unwrap().matches(&item));
        assert!(SearchQuery::parse("description:\"sea view\"").unwrap().matches(&item));
        assert!(!SearchQuery::parse("\"view sea\"").unwrap().matches(&item));
    }

    #[test]
    fn terms_are_or_ed() {
        let query = SearchQuery::parse("id:1 id:2").unwrap();
        assert!(query.matches(&doc(1, "a", None)));
        assert!(query.matches(&doc(2, "b", None)));
        assert!(!query.matches(&doc(3, "c", None)));
    }

    #[test]
    fn wildcard_and_empty_queries() {
        assert!(SearchQuery::parse("*").unwrap().matches(&doc(5, "x", None)));
        let empty = SearchQuery::parse("   ").unwrap();
        assert!(empty.is_empty());
        assert!(!empty.matches(&doc(5, "x", None)));
    }

    #[test]
    fn rejects_unknown_fields_and_empty_values() {
        assert!(matches!(SearchQuery::parse("name:x"), Err(AppError::Validation(_))));
        assert!(matches!(SearchQuery::parse("id:"), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_non_numeric_ids() {
        assert!(matches!(SearchQuery::parse("id:abc"), Err(AppError::Validation(_))));
        assert!(matches!(SearchQuery::parse("id:\"12\" id:x"), Err(AppError::Validation(_))));
    }
}
