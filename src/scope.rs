//! Scope identity shared by every pipeline stage.

use std::fmt;

use crate::error::InvalidScope;

/// One external connection plus one remote resource (repository, board).
///
/// Identities of staged records are only unique within a scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopeKey {
    pub connection_id: i64,
    pub scope_id: String,
}

impl ScopeKey {
    pub fn new<S: Into<String>>(connection_id: i64, scope_id: S) -> Self {
        Self {
            connection_id,
            scope_id: scope_id.into(),
        }
    }

    /// Both components are required: a positive connection id and a non-blank scope id.
    pub fn validate(&self) -> Result<(), InvalidScope> {
        if self.connection_id <= 0 {
            return Err(InvalidScope {
                field: "connection_id",
            });
        }
        if self.scope_id.trim().is_empty() {
            return Err(InvalidScope { field: "scope_id" });
        }
        Ok(())
    }
}

impl fmt::Display for ScopeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.connection_id, self.scope_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_components() {
        assert_eq!(
            ScopeKey::new(0, "repo").validate(),
            Err(InvalidScope {
                field: "connection_id"
            })
        );
        assert_eq!(
            ScopeKey::new(1, "  ").validate(),
            Err(InvalidScope { field: "scope_id" })
        );
        assert!(ScopeKey::new(1, "42").validate().is_ok());
    }

    #[test]
    fn displays_as_connection_and_scope() {
        assert_eq!(ScopeKey::new(3, "repo-9").to_string(), "3:repo-9");
    }
}
