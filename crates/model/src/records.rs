//! Record payloads stored in list-valued form fields
//!
//! Tags are plain `String`s. The two structured payloads live here with the
//! exact field names the form engine stores.

use serde::{Deserialize, Serialize};

// ============================================================================
// BuildStep
// ============================================================================

/// One additional build step: a slot key from a closed domain plus the
/// command lines to run in that slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStep {
    /// Slot key (e.g. `prepend_base`, `append_final`)
    pub step_type: String,

    /// Parsed, trimmed, non-empty command lines
    #[serde(default)]
    pub commands: Vec<String>,
}

impl BuildStep {
    /// Create a build step with no commands
    pub fn new(step_type: impl Into<String>) -> Self {
        Self {
            step_type: step_type.into(),
            commands: Vec::new(),
        }
    }

    /// Set the command lines
    pub fn with_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands = commands.into_iter().map(Into::into).collect();
        self
    }

    /// Commands joined for display in a multi-line text area
    pub fn command_text(&self) -> String {
        self.commands.join("\n")
    }
}

// ============================================================================
// CascadeRecord
// ============================================================================

/// A committed cascading selection (collection, source, version)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeRecord {
    /// Primary key (collection name)
    pub primary_key: String,

    /// Secondary key (source)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_key: Option<String>,

    /// Tertiary key (version)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tertiary_key: Option<String>,

    /// Signature lines, present only when at least one is non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signatures: Option<Vec<String>>,
}

impl CascadeRecord {
    /// Create a record with only a primary key
    pub fn new(primary_key: impl Into<String>) -> Self {
        Self {
            primary_key: primary_key.into(),
            ..Default::default()
        }
    }

    /// Set the secondary key
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary_key = Some(secondary.into());
        self
    }

    /// Set the tertiary key
    pub fn with_tertiary(mut self, tertiary: impl Into<String>) -> Self {
        self.tertiary_key = Some(tertiary.into());
        self
    }

    /// Set signatures
    pub fn with_signatures<I, S>(mut self, signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signatures = Some(signatures.into_iter().map(Into::into).collect());
        self
    }

    /// Chip label, e.g. `community.general@1.0.0 (Galaxy)`
    pub fn chip_label(&self) -> String {
        let mut label = self.primary_key.clone();
        if let Some(version) = &self.tertiary_key {
            label.push('@');
            label.push_str(version);
        }
        if let Some(source) = &self.secondary_key {
            label.push_str(&format!(" ({source})"));
        }
        label
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_build_step_wire_shape() {
        let step = BuildStep::new("prepend_base").with_commands(["RUN dnf update -y"]);
        assert_eq!(
            serde_json::to_value(&step).unwrap(),
            json!({"stepType": "prepend_base", "commands": ["RUN dnf update -y"]})
        );
    }

    #[test]
    fn test_build_step_missing_commands_defaults_empty() {
        let step: BuildStep = serde_json::from_value(json!({"stepType": "append_final"})).unwrap();
        assert!(step.commands.is_empty());
    }

    #[test]
    fn test_cascade_record_omits_absent_fields() {
        let record = CascadeRecord::new("community.general").with_tertiary("1.0.0");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"primaryKey": "community.general", "tertiaryKey": "1.0.0"})
        );
    }

    #[test]
    fn test_chip_label() {
        let record = CascadeRecord::new("community.general")
            .with_secondary("Galaxy")
            .with_tertiary("1.0.0");
        assert_eq!(record.chip_label(), "community.general@1.0.0 (Galaxy)");
        assert_eq!(CascadeRecord::new("ansible.posix").chip_label(), "ansible.posix");
    }
}
