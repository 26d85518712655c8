//! Tool Schema Descriptors
//!
//! The editor ships seven "tools" that fall into two structural variants.
//! Instead of hand-writing a state machine per tool, each tool is described
//! by a `SchemaDescriptor` and the behavior engine is parametrized by it.
//!
//! - **Simple Outline** - container → Items, each `[ItemTitle, BulletedList?]`
//! - **Leveled Metadata List** - container → Header, then Headers/Items where
//!   every Item carries an `indent` level and a four-valued metadata field

use crate::models::{Node, Props, Tag, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Structural variant shared by a family of tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolVariant {
    SimpleOutline,
    LeveledList,
}

/// The seven built-in tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    /// Ranked list of options
    Ranking,
    /// Branching sub-outline of choices
    DecisionTree,
    /// Meeting agenda with talking points
    Agenda,
    /// Hypotheses rated by confidence
    Hypotheses,
    /// Stakeholders with their role
    Stakeholders,
    /// Risks rated by probability
    Risks,
    /// Evidence rated by confidence
    Evidence,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Ranking,
        ToolKind::DecisionTree,
        ToolKind::Agenda,
        ToolKind::Hypotheses,
        ToolKind::Stakeholders,
        ToolKind::Risks,
        ToolKind::Evidence,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::Ranking => "ranking",
            ToolKind::DecisionTree => "decision-tree",
            ToolKind::Agenda => "agenda",
            ToolKind::Hypotheses => "hypotheses",
            ToolKind::Stakeholders => "stakeholders",
            ToolKind::Risks => "risks",
            ToolKind::Evidence => "evidence",
        }
    }

    pub fn variant(&self) -> ToolVariant {
        match self {
            ToolKind::Ranking | ToolKind::DecisionTree | ToolKind::Agenda => {
                ToolVariant::SimpleOutline
            }
            ToolKind::Hypotheses | ToolKind::Stakeholders | ToolKind::Risks | ToolKind::Evidence => {
                ToolVariant::LeveledList
            }
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownTool(s.to_string()))
    }
}

/// Four-valued metadata ladder shared by every leveled tool
///
/// Each schema shows the values under its own labels (confidence, role,
/// probability); the stored value is always one of these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metadata {
    #[default]
    None,
    Low,
    Med,
    High,
}

impl Metadata {
    pub const ALL: [Metadata; 4] = [Metadata::None, Metadata::Low, Metadata::Med, Metadata::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metadata::None => "none",
            Metadata::Low => "low",
            Metadata::Med => "med",
            Metadata::High => "high",
        }
    }

    /// Position on the ladder (`None` = 0)
    pub fn rank(&self) -> usize {
        match self {
            Metadata::None => 0,
            Metadata::Low => 1,
            Metadata::Med => 2,
            Metadata::High => 3,
        }
    }

    /// Next value on the ladder, wrapping from `High` back to `None`
    pub fn cycle(&self) -> Metadata {
        Metadata::ALL[(self.rank() + 1) % Metadata::ALL.len()]
    }
}

impl FromStr for Metadata {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metadata::ALL
            .into_iter()
            .find(|value| value.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidMetadata(s.to_string()))
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholder texts shown by renderers for empty lines of a tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    /// Leveled header line, or the first outline item
    pub header: &'static str,
    pub item: &'static str,
    /// Line of an outline sub-list
    pub sub_item: &'static str,
}

/// Describes one tool so that the generic engines can drive it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDescriptor {
    pub tool: ToolKind,
    /// Human readable name (command menu, renderer chrome)
    pub label: &'static str,
    pub container_tag: Tag,
    /// Leveled lists only
    pub header_tag: Option<Tag>,
    pub item_tag: Tag,
    /// Simple Outline only
    pub title_tag: Option<Tag>,
    /// Property key holding the metadata value (leveled lists only)
    pub metadata_field: Option<&'static str>,
    /// Labels for `none`, `low`, `med`, `high`, in ladder order
    pub metadata_labels: [&'static str; 4],
    /// Whether `legend` lines are permitted inside the container
    pub allows_legend: bool,
    pub placeholders: Placeholders,
}

impl SchemaDescriptor {
    pub fn variant(&self) -> ToolVariant {
        self.tool.variant()
    }

    /// Display label for a metadata value under this schema
    pub fn metadata_label(&self, value: Metadata) -> &'static str {
        self.metadata_labels[value.rank()]
    }

    /// Placeholder provider: text shown for an empty line with `tag` whose
    /// item sits at `index` within the container.
    pub fn placeholder(&self, tag: &Tag, index: usize) -> Option<&'static str> {
        match tag {
            Tag::Header(kind) if *kind == self.tool => Some(self.placeholders.header),
            Tag::Item(kind) if *kind == self.tool => Some(self.placeholders.item),
            Tag::ItemTitle(kind) if *kind == self.tool => Some(if index == 0 {
                self.placeholders.header
            } else {
                self.placeholders.item
            }),
            Tag::ListItem if self.variant() == ToolVariant::SimpleOutline => {
                Some(self.placeholders.sub_item)
            }
            _ => None,
        }
    }

    /// Default props of a fresh leveled item
    pub fn item_props(&self, indent: u32, metadata: Metadata) -> Props {
        let mut props = Props::new();
        if let Some(field) = self.metadata_field {
            props.insert("indent".to_string(), json!(indent));
            props.insert(field.to_string(), json!(metadata.as_str()));
        }
        props
    }

    /// Read the indent level of a leveled item (missing or malformed → 0)
    pub fn indent_of(&self, props: &Props) -> u32 {
        props
            .get("indent")
            .and_then(|value| value.as_u64())
            .and_then(|value| u32::try_from(value).ok())
            .unwrap_or(0)
    }

    /// Read the metadata value of a leveled item (missing or malformed → `None`)
    pub fn metadata_of(&self, props: &Props) -> Metadata {
        self.metadata_field
            .and_then(|field| props.get(field))
            .and_then(|value| value.as_str())
            .and_then(|value| Metadata::from_str(value).ok())
            .unwrap_or_default()
    }

    /// A fresh empty leveled item
    pub fn new_item(&self, text: &str, indent: u32, metadata: Metadata) -> Node {
        Node::element_with_props(
            self.item_tag,
            self.item_props(indent, metadata),
            vec![Node::text(text)],
        )
    }

    /// A fresh outline item with an optional sub-list of lines
    pub fn new_outline_item(&self, title: &str, sub_items: &[&str]) -> Node {
        let title_tag = self.title_tag.unwrap_or(Tag::Paragraph);
        let mut children = vec![Node::element(title_tag, vec![Node::text(title)])];
        if !sub_items.is_empty() {
            children.push(Node::element(
                Tag::BulletedList,
                sub_items.iter().map(|line| Node::list_item(line)).collect(),
            ));
        }
        Node::element(self.item_tag, children)
    }

    /// A fresh leveled header line
    pub fn new_header(&self, text: &str) -> Node {
        Node::element(
            self.header_tag.unwrap_or(Tag::Paragraph),
            vec![Node::text(text)],
        )
    }

    /// A freshly inserted, already normalized, container subtree
    pub fn empty_container(&self) -> Node {
        let first = match self.variant() {
            ToolVariant::SimpleOutline => self.new_outline_item("", &[]),
            ToolVariant::LeveledList => self.new_header(""),
        };
        Node::element(self.container_tag, vec![first])
    }
}
