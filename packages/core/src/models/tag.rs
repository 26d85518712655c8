//! Node tags
//!
//! Every Element carries a `Tag`. Core document tags are fixed; tool tags are
//! derived from the tool's slug (`ranking`, `ranking-item`,
//! `ranking-item-title`, `risks-header`, ...). Tags are what renderers use to
//! pick a presentation component.

use crate::models::schema::{ToolKind, ToolVariant};
use crate::models::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Tag {
    /// Document title, always the first root child
    Title,
    Paragraph,
    /// Generic nested list (also used for outline sub-lists)
    BulletedList,
    /// Entry of a `BulletedList`: `[Text, BulletedList?]`
    ListItem,
    /// Explanatory line allowed inside the tools whose schema permits it
    Legend,
    /// Root element of a tool subtree
    Container(ToolKind),
    /// Leveled list header line
    Header(ToolKind),
    /// Tool entry (outline item or leveled item)
    Item(ToolKind),
    /// Title line of an outline item
    ItemTitle(ToolKind),
}

impl Tag {
    /// Tool this tag belongs to, if any
    pub fn tool(&self) -> Option<ToolKind> {
        match self {
            Tag::Container(kind) | Tag::Header(kind) | Tag::Item(kind) | Tag::ItemTitle(kind) => {
                Some(*kind)
            }
            _ => None,
        }
    }

    /// Blocks whose only content is a single Text leaf
    pub fn is_text_block(&self) -> bool {
        match self {
            Tag::Title | Tag::Paragraph | Tag::Legend | Tag::Header(_) | Tag::ItemTitle(_) => true,
            Tag::Item(kind) => kind.variant() == ToolVariant::LeveledList,
            _ => false,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Tag::BulletedList)
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Tag::Container(_))
    }

    /// Simple Outline item (`[ItemTitle, BulletedList?]`)
    pub fn is_outline_item(&self) -> bool {
        matches!(self, Tag::Item(kind) if kind.variant() == ToolVariant::SimpleOutline)
    }

    /// Elements that may own a nested sub-list
    pub fn owns_sublist(&self) -> bool {
        matches!(self, Tag::ListItem) || self.is_outline_item()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Title => write!(f, "title"),
            Tag::Paragraph => write!(f, "paragraph"),
            Tag::BulletedList => write!(f, "bulleted-list"),
            Tag::ListItem => write!(f, "list-item"),
            Tag::Legend => write!(f, "legend"),
            Tag::Container(kind) => write!(f, "{}", kind),
            Tag::Header(kind) => write!(f, "{}-header", kind),
            Tag::Item(kind) => write!(f, "{}-item", kind),
            Tag::ItemTitle(kind) => write!(f, "{}-item-title", kind),
        }
    }
}

impl FromStr for Tag {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => return Ok(Tag::Title),
            "paragraph" => return Ok(Tag::Paragraph),
            "bulleted-list" => return Ok(Tag::BulletedList),
            "list-item" => return Ok(Tag::ListItem),
            "legend" => return Ok(Tag::Legend),
            _ => {}
        }

        let unknown = || ValidationError::UnknownTag(s.to_string());

        if let Some(slug) = s.strip_suffix("-item-title") {
            let kind = ToolKind::from_str(slug).map_err(|_| unknown())?;
            return match kind.variant() {
                ToolVariant::SimpleOutline => Ok(Tag::ItemTitle(kind)),
                ToolVariant::LeveledList => Err(unknown()),
            };
        }
        if let Some(slug) = s.strip_suffix("-header") {
            let kind = ToolKind::from_str(slug).map_err(|_| unknown())?;
            return match kind.variant() {
                ToolVariant::LeveledList => Ok(Tag::Header(kind)),
                ToolVariant::SimpleOutline => Err(unknown()),
            };
        }
        if let Some(slug) = s.strip_suffix("-item") {
            let kind = ToolKind::from_str(slug).map_err(|_| unknown())?;
            return Ok(Tag::Item(kind));
        }
        ToolKind::from_str(s)
            .map(Tag::Container)
            .map_err(|_| unknown())
    }
}

impl TryFrom<String> for Tag {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Tag::from_str(&value)
    }
}

impl From<Tag> for String {
    fn from(tag: Tag) -> Self {
        tag.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trips_through_strings() {
        for kind in ToolKind::ALL {
            let mut tags = vec![Tag::Container(kind), Tag::Item(kind)];
            match kind.variant() {
                ToolVariant::SimpleOutline => tags.push(Tag::ItemTitle(kind)),
                ToolVariant::LeveledList => tags.push(Tag::Header(kind)),
            }
            for tag in tags {
                assert_eq!(Tag::from_str(&tag.to_string()).unwrap(), tag);
            }
        }
        assert_eq!(Tag::from_str("list-item").unwrap(), Tag::ListItem);
    }

    #[test]
    fn test_header_of_outline_tool_is_rejected() {
        assert!(Tag::from_str("ranking-header").is_err());
        assert!(Tag::from_str("risks-item-title").is_err());
        assert!(Tag::from_str("heading").is_err());
    }

    #[test]
    fn test_text_block_classification() {
        assert!(Tag::Item(ToolKind::Risks).is_text_block());
        assert!(!Tag::Item(ToolKind::Ranking).is_text_block());
        assert!(Tag::Item(ToolKind::Ranking).owns_sublist());
        assert!(Tag::ItemTitle(ToolKind::Agenda).is_text_block());
        assert!(!Tag::ListItem.is_text_block());
    }
}
