//! Worker model.

use serde::{Deserialize, Serialize};

/// A person who can be rostered onto shifts.
///
/// Immutable for the duration of one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Display name, used in violation messages.
    pub name: String,
    /// Owning organization.
    #[serde(default)]
    pub organization_id: String,
}

impl Worker {
    /// Creates a worker with an empty name.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            organization_id: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the organization.
    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = organization_id.into();
        self
    }

    /// Name for messages; falls back to the id when no name is set.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(Worker::new("w1").display_name(), "w1");
        assert_eq!(Worker::new("w1").with_name("Alice").display_name(), "Alice");
    }

    #[test]
    fn test_camel_case_fields() {
        let w = Worker::new("w1").with_name("Alice").with_organization("org");
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["organizationId"], "org");
    }
}
