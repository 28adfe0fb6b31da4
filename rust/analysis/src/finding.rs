// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Findings: the engine's primary output.
//!
//! A [`Finding`] is a pure value. The output list preserves the order in
//! which checks ran — it is never sorted by severity.

use serde::{Deserialize, Serialize};

/// Severity of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Code or structural violation.
    Error,
    /// Deviation from target practice.
    Warning,
    /// Layout improvement, not a violation.
    Optimization,
}

/// A single validation issue pointing at a model element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub severity: Severity,
    /// Element kind tag, e.g. "Wall", "Door", "Space", "Story".
    pub element_type: String,
    /// Id of the offending element; empty when the finding is not tied to
    /// a single element.
    pub element_id: String,
    pub message: String,
}

impl Finding {
    pub fn error(
        element_type: impl Into<String>,
        element_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            element_type: element_type.into(),
            element_id: element_id.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        element_type: impl Into<String>,
        element_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            element_type: element_type.into(),
            element_id: element_id.into(),
            message: message.into(),
        }
    }

    pub fn optimization(
        element_type: impl Into<String>,
        element_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Optimization,
            element_type: element_type.into(),
            element_id: element_id.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_serializes_lowercase() {
        let f = Finding::warning("Wall", "w1", "gap");
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
    }
}
