//! Assistance modes
//!
//! Each mode maps to a distinct analysis on the assist service: OCR for
//! reading text, label detection for explaining diagrams, and object
//! localization for navigation.

use crate::{Result, VistaError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of assistance requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssistMode {
    /// Read printed or handwritten text aloud
    #[serde(rename = "text")]
    ReadText,

    /// Describe the elements of a chart or diagram
    #[serde(rename = "diagram")]
    ExplainDiagram,

    /// Describe objects and people in the user's path
    #[serde(rename = "navigation")]
    Navigation,
}

impl AssistMode {
    /// All modes, in the order they appear in the UI
    pub const ALL: [AssistMode; 3] = [
        AssistMode::ReadText,
        AssistMode::ExplainDiagram,
        AssistMode::Navigation,
    ];

    /// The form value the assist service expects
    pub fn wire_value(&self) -> &'static str {
        match self {
            AssistMode::ReadText => "text",
            AssistMode::ExplainDiagram => "diagram",
            AssistMode::Navigation => "navigation",
        }
    }

    /// Button label shown in the mode bar
    pub fn label(&self) -> &'static str {
        match self {
            AssistMode::ReadText => "Read Text",
            AssistMode::ExplainDiagram => "Explain Diagram",
            AssistMode::Navigation => "Navigation & People",
        }
    }

    /// Button icon shown next to the label
    pub fn icon(&self) -> &'static str {
        match self {
            AssistMode::ReadText => "📖",
            AssistMode::ExplainDiagram => "📊",
            AssistMode::Navigation => "🧭",
        }
    }

    /// Parse a wire value back into a mode
    pub fn from_wire(value: &str) -> Result<Self> {
        match value {
            "text" => Ok(AssistMode::ReadText),
            "diagram" => Ok(AssistMode::ExplainDiagram),
            "navigation" => Ok(AssistMode::Navigation),
            other => Err(VistaError::ServiceError(format!(
                "Unknown assistance mode: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for AssistMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values() {
        assert_eq!(AssistMode::ReadText.wire_value(), "text");
        assert_eq!(AssistMode::ExplainDiagram.wire_value(), "diagram");
        assert_eq!(AssistMode::Navigation.wire_value(), "navigation");
    }

    #[test]
    fn test_from_wire_round_trip() {
        for mode in AssistMode::ALL {
            assert_eq!(AssistMode::from_wire(mode.wire_value()).unwrap(), mode);
        }
    }

    #[test]
    fn test_from_wire_rejects_unknown() {
        assert!(AssistMode::from_wire("ocr").is_err());
        assert!(AssistMode::from_wire("").is_err());
    }

    #[test]
    fn test_serde_uses_wire_values() {
        let json = serde_json::to_string(&AssistMode::ExplainDiagram).unwrap();
        assert_eq!(json, "\"diagram\"");

        let mode: AssistMode = serde_json::from_str("\"navigation\"").unwrap();
        assert_eq!(mode, AssistMode::Navigation);
    }

    #[test]
    fn test_labels_are_distinct() {
        assert_ne!(AssistMode::ReadText.label(), AssistMode::Navigation.label());
        assert_eq!(AssistMode::Navigation.label(), "Navigation & People");
    }
}
