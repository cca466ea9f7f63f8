//! Ten-section alignment summary
//!
//! The stored and wire shape is a flat JSON object with exactly ten string
//! keys. Deserialization rejects missing and unknown keys so a summary is
//! never partially constructed.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Synthesized group alignment, one paragraph per section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AlignmentSummary {
    pub purpose: String,
    pub sponsorship: String,
    pub resources: String,
    pub leadership: String,
    pub deliverables: String,
    pub plan: String,
    pub change: String,
    pub investment: String,
    pub benefits: String,
    pub overall_alignment: String,
}

/// A summary section: wire key, display label, and what the model should write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub key: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

/// All ten sections in display order
pub static SECTIONS: [Section; 10] = [
    Section { key: "purpose", label: "Purpose", description: "Unified vision/mission statement" },
    Section { key: "sponsorship", label: "Sponsorship", description: "Collective sponsorship commitments" },
    Section { key: "resources", label: "Resources", description: "Available and needed resources" },
    Section { key: "leadership", label: "Leadership", description: "Leadership structure and commitments" },
    Section { key: "deliverables", label: "Deliverables", description: "Key outputs and milestones" },
    Section { key: "plan", label: "Plan", description: "High-level action plan" },
    Section { key: "change", label: "Change", description: "Change management approach" },
    Section { key: "investment", label: "Investment", description: "Required investments and funding" },
    Section { key: "benefits", label: "Benefits", description: "Expected value and outcomes" },
    Section {
        key: "overallAlignment",
        label: "Overall Alignment",
        description: "Assessment of group readiness and next steps",
    },
];

impl AlignmentSummary {
    /// Section text paired with its section descriptor, in display order
    pub fn sections(&self) -> [(&'static Section, &str); 10] {
        [
            (&SECTIONS[0], self.purpose.as_str()),
            (&SECTIONS[1], self.sponsorship.as_str()),
            (&SECTIONS[2], self.resources.as_str()),
            (&SECTIONS[3], self.leadership.as_str()),
            (&SECTIONS[4], self.deliverables.as_str()),
            (&SECTIONS[5], self.plan.as_str()),
            (&SECTIONS[6], self.change.as_str()),
            (&SECTIONS[7], self.investment.as_str()),
            (&SECTIONS[8], self.benefits.as_str()),
            (&SECTIONS[9], self.overall_alignment.as_str()),
        ]
    }

    /// Serialize to the stored JSON text form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the stored JSON text form
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Strict JSON schema for structured model output
    ///
    /// Every section is a required string and no other properties are allowed.
    pub fn json_schema() -> Value {
        let mut properties = Map::new();
        for section in &SECTIONS {
            properties.insert(
                section.key.to_string(),
                json!({ "type": "string", "description": section.description }),
            );
        }
        let required: Vec<&str> = SECTIONS.iter().map(|s| s.key).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}
