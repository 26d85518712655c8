//! Core Schema Definitions
//!
//! This module contains the canonical descriptors for all tools that ship with
//! the editor. They cannot be modified by users; the `SchemaRegistry` hands
//! them to the normalization pass and the behavior engine.
//!
//! ## Simple Outline tools
//!
//! - **ranking** - ranked options, each with optional supporting points
//! - **decision-tree** - choices branching into consequences
//! - **agenda** - agenda topics with talking points
//!
//! ## Leveled Metadata List tools
//!
//! - **hypotheses** - rated by `confidence`
//! - **stakeholders** - rated by `role`, allows a `legend` line
//! - **risks** - rated by `probability`
//! - **evidence** - rated by `confidence`

use crate::models::schema::{Placeholders, SchemaDescriptor, ToolKind, ToolVariant};
use crate::models::Tag;

/// Build the canonical descriptor for `tool`
pub fn core_schema(tool: ToolKind) -> SchemaDescriptor {
    let (label, metadata_field, metadata_labels, allows_legend, placeholders) = match tool {
        ToolKind::Ranking => (
            "Ranking",
            None,
            ["", "", "", ""],
            false,
            Placeholders {
                header: "Best option",
                item: "Option",
                sub_item: "Why it ranks here",
            },
        ),
        ToolKind::DecisionTree => (
            "Decision Tree",
            None,
            ["", "", "", ""],
            false,
            Placeholders {
                header: "First choice",
                item: "Choice",
                sub_item: "Consequence",
            },
        ),
        ToolKind::Agenda => (
            "Agenda",
            None,
            ["", "", "", ""],
            false,
            Placeholders {
                header: "First topic",
                item: "Topic",
                sub_item: "Talking point",
            },
        ),
        ToolKind::Hypotheses => (
            "Hypotheses",
            Some("confidence"),
            ["Unrated", "Low", "Medium", "High"],
            false,
            Placeholders {
                header: "Question",
                item: "Hypothesis",
                sub_item: "",
            },
        ),
        ToolKind::Stakeholders => (
            "Stakeholders",
            Some("role"),
            ["Unassigned", "Informed", "Consulted", "Responsible"],
            true,
            Placeholders {
                header: "Group",
                item: "Stakeholder",
                sub_item: "",
            },
        ),
        ToolKind::Risks => (
            "Risks",
            Some("probability"),
            ["Unknown", "Unlikely", "Possible", "Likely"],
            false,
            Placeholders {
                header: "Area",
                item: "Risk",
                sub_item: "",
            },
        ),
        ToolKind::Evidence => (
            "Evidence",
            Some("confidence"),
            ["Unrated", "Weak", "Moderate", "Strong"],
            false,
            Placeholders {
                header: "Claim",
                item: "Evidence",
                sub_item: "",
            },
        ),
    };

    let (header_tag, title_tag) = match tool.variant() {
        ToolVariant::SimpleOutline => (None, Some(Tag::ItemTitle(tool))),
        ToolVariant::LeveledList => (Some(Tag::Header(tool)), None),
    };

    SchemaDescriptor {
        tool,
        label,
        container_tag: Tag::Container(tool),
        header_tag,
        item_tag: Tag::Item(tool),
        title_tag,
        metadata_field,
        metadata_labels,
        allows_legend,
        placeholders,
    }
}

/// Lookup table of every tool descriptor
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    descriptors: Vec<SchemaDescriptor>,
}

impl SchemaRegistry {
    /// Registry with all core tools
    pub fn core() -> Self {
        Self {
            descriptors: ToolKind::ALL.into_iter().map(core_schema).collect(),
        }
    }

    /// Descriptor of `tool`
    pub fn get(&self, tool: ToolKind) -> &SchemaDescriptor {
        let index = ToolKind::ALL
            .iter()
            .position(|kind| *kind == tool)
            .unwrap_or_default();
        &self.descriptors[index]
    }

    /// Descriptor owning `tag`, if it is a tool tag
    pub fn for_tag(&self, tag: &Tag) -> Option<&SchemaDescriptor> {
        tag.tool().map(|tool| self.get(tool))
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::core()
    }
}
