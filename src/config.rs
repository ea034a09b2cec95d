//! Project configuration: annotation tasks and prediction policy.
//!
//! Loaded from the JSON the project settings endpoint returns:
//!
//! ```json
//! {
//!   "prefill_predictions": true,
//!   "offset_unit": "utf16",
//!   "tasks": [
//!     { "value": "PER", "name": "Person", "kind": "ner", "color": "#e6194b" },
//!     { "value": "works_for", "name": "Works for", "kind": "relation" }
//!   ]
//! }
//! ```

use crate::offset::OffsetUnit;
use crate::reconcile::ReconcilePolicy;
use annotate_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// =============================================================================
// Tasks
// =============================================================================

/// Kind of annotation a task produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Character span over text content
    Ner,
    /// Polygon over image content
    Zone,
    /// Free-text answer
    Text,
    /// Label toggle
    Classification,
    /// Directed link between two NER annotations
    Relation,
}

/// One annotation task (a label the annotator can apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Identifier stored in annotation `value`
    pub value: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Annotation kind
    pub kind: TaskKind,
    /// Explicit `#RRGGBB` color; a palette color is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl TaskConfig {
    /// Create a task with no explicit color.
    pub fn new(value: impl Into<String>, name: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            value: value.into(),
            name: name.into(),
            kind,
            color: None,
        }
    }

    /// Set an explicit color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

// =============================================================================
// Project
// =============================================================================

/// Per-project settings consumed by the navigation workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Auto-accept non-conflicting predictions on item load
    #[serde(default)]
    pub prefill_predictions: bool,
    /// Unit of NER offsets in stored payloads
    #[serde(default)]
    pub offset_unit: OffsetUnit,
    /// Annotation tasks, in display order
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            prefill_predictions: false,
            offset_unit: OffsetUnit::Char,
            tasks: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed JSON and [`Error::Config`] when
    /// validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable prediction prefill.
    pub fn with_prefill(mut self, prefill: bool) -> Self {
        self.prefill_predictions = prefill;
        self
    }

    /// Set the stored offset unit.
    pub fn with_offset_unit(mut self, unit: OffsetUnit) -> Self {
        self.offset_unit = unit;
        self
    }

    /// Append a task.
    pub fn with_task(mut self, task: TaskConfig) -> Self {
        self.tasks.push(task);
        self
    }

    /// Reconciliation policy implied by the prefill flag.
    #[must_use]
    pub fn policy(&self) -> ReconcilePolicy {
        ReconcilePolicy::from(self.prefill_predictions)
    }

    /// Look up a task by its value.
    #[must_use]
    pub fn task(&self, value: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.value == value)
    }

    /// Check task values are unique and non-empty and colors are `#RRGGBB`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, task) in self.tasks.iter().enumerate() {
            if task.value.trim().is_empty() {
                return Err(Error::config(format!("tasks[{i}] has an empty value")));
            }
            if !seen.insert(task.value.as_str()) {
                return Err(Error::config(format!(
                    "tasks[{i}] repeats value '{}'",
                    task.value
                )));
            }
            if let Some(color) = &task.color {
                if !is_hex_color(color) {
                    return Err(Error::config(format!(
                        "tasks[{i}] color '{color}' is not #RRGGBB"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// `#RRGGBB` check.
pub(crate) fn is_hex_color(color: &str) -> bool {
    color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str() {
        let config = ProjectConfig::from_json_str(
            r##"{
                "prefill_predictions": true,
                "offset_unit": "utf16",
                "tasks": [
                    {"value": "PER", "name": "Person", "kind": "ner", "color": "#e6194b"},
                    {"value": "works_for", "kind": "relation"}
                ]
            }"##,
        )
        .unwrap();
        assert_eq!(config.policy(), ReconcilePolicy::Prefill);
        assert_eq!(config.offset_unit, OffsetUnit::Utf16);
        assert_eq!(config.task("works_for").map(|t| t.kind), Some(TaskKind::Relation));
        assert_eq!(config.task("works_for").map(|t| t.name.as_str()), Some(""));
    }

    #[test]
    fn test_defaults() {
        let config = ProjectConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.policy(), ReconcilePolicy::SuggestOnly);
    }

    #[test]
    fn test_duplicate_task_rejected() {
        let config = ProjectConfig::new()
            .with_task(TaskConfig::new("PER", "Person", TaskKind::Ner))
            .with_task(TaskConfig::new("PER", "People", TaskKind::Ner));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_color_rejected() {
        let config = ProjectConfig::new()
            .with_task(TaskConfig::new("PER", "Person", TaskKind::Ner).with_color("red"));
        assert!(config.validate().is_err());
        assert!(is_hex_color("#A0b1C2"));
        assert!(!is_hex_color("#A0b1C"));
        assert!(!is_hex_color("#GGGGGG"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            ProjectConfig::from_json_str("{\"tasks\": 3}"),
            Err(Error::Json(_))
        ));
    }
}
