//! Editor facade
//!
//! One edit cycle: validate the incoming selection, let a handler (or the
//! host) mutate a draft, drive the draft to its normal form, enforce the
//! root layout once more, then hand back a fresh `EditorState` together with
//! the operations that produced it. The caller's state is never touched, so a
//! failed cycle leaves nothing behind.
//!
//! # Examples
//!
//! ```
//! use nodespace_outline::behaviors::KeyEvent;
//! use nodespace_outline::models::{EditorState, ToolKind};
//! use nodespace_outline::services::{Editor, EditorConfig};
//!
//! let editor = Editor::new(EditorConfig::default()).unwrap();
//! let state = editor.normalize(&EditorState::default()).unwrap().state;
//! let state = editor.insert_tool(&state, ToolKind::Ranking).unwrap().state;
//!
//! let outcome = editor.handle_keydown(&state, &KeyEvent::enter()).unwrap();
//! assert!(outcome.handled);
//! assert_eq!(outcome.handler, Some("ranking"));
//! ```

use crate::behaviors::{
    Dispatch, HandlerChain, KeyEvent, LeveledHandler, ListHandler, OutlineHandler,
};
use crate::models::{
    EditorState, Metadata, Path, Point, Props, SchemaRegistry, Tag, ToolKind, ToolVariant,
};
use crate::normalization::{normalize, root_layout};
use crate::operations::{Operation, Transaction, TransformError};
use crate::services::{EditorConfig, EditorError};
use serde_json::json;

/// Result of offering a key to the editor
#[derive(Debug, Clone, PartialEq)]
pub struct KeyOutcome {
    /// False when every handler declined; the host applies its default
    /// text behavior and `state` is the unchanged input
    pub handled: bool,
    pub state: EditorState,
    pub operations: Vec<Operation>,
    /// Name of the handler that claimed the key
    pub handler: Option<&'static str>,
}

/// Result of a host-driven edit
#[derive(Debug, Clone, PartialEq)]
pub struct EditOutcome {
    pub state: EditorState,
    pub operations: Vec<Operation>,
}

/// Structural editing engine for outline documents
///
/// Immutable after construction and safe to share between threads; all
/// document state travels through `EditorState` values.
#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,
    registry: SchemaRegistry,
    chain: HandlerChain,
}

impl Editor {
    /// Create an editor for `config`
    ///
    /// # Errors
    ///
    /// `EditorError::InvalidConfig` when the configuration does not validate.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let registry = SchemaRegistry::core();
        let chain = build_chain(&config, &registry);
        tracing::debug!(handlers = ?chain.names(), "editor ready");
        Ok(Self {
            config,
            registry,
            chain,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    /// Offer a structural key to the handler chain
    ///
    /// An unclaimed key is not an error: the outcome reports
    /// `handled == false` and carries the input state unchanged.
    pub fn handle_keydown(
        &self,
        state: &EditorState,
        event: &KeyEvent,
    ) -> Result<KeyOutcome, EditorError> {
        check_selection(state)?;

        let Some(Dispatch {
            handler,
            transaction,
        }) = self.chain.dispatch(state, event)?
        else {
            tracing::trace!(key = %event, "key not handled");
            return Ok(KeyOutcome {
                handled: false,
                state: state.clone(),
                operations: Vec::new(),
                handler: None,
            });
        };

        let (state, operations) = self.commit(transaction)?;
        Ok(KeyOutcome {
            handled: true,
            state,
            operations,
            handler: Some(handler),
        })
    }

    /// Run host-driven primitive edits on a draft and normalize the result
    ///
    /// ```
    /// use nodespace_outline::models::{EditorState, Point};
    /// use nodespace_outline::services::Editor;
    ///
    /// let editor = Editor::default();
    /// let state = editor.normalize(&EditorState::default()).unwrap().state;
    /// let outcome = editor
    ///     .apply(&state, |tx| {
    ///         tx.select_point(Point::new([0, 0], 0))?;
    ///         tx.insert_text("Plan")
    ///     })
    ///     .unwrap();
    /// assert_eq!(outcome.state.document.children[0].string(), "Plan");
    /// ```
    pub fn apply<F>(&self, state: &EditorState, edit: F) -> Result<EditOutcome, EditorError>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<(), TransformError>,
    {
        let mut tx = Transaction::new(state);
        edit(&mut tx)?;
        let (state, operations) = self.commit(tx)?;
        Ok(EditOutcome { state, operations })
    }

    /// Bring an arbitrary state (for example freshly loaded content) into
    /// normal form
    pub fn normalize(&self, state: &EditorState) -> Result<EditOutcome, EditorError> {
        self.apply(state, |_| Ok(()))
    }

    /// Insert an empty `tool` container at the caret and put the caret in it
    ///
    /// An empty paragraph holding the caret is replaced. Otherwise the
    /// container goes right after the top-level block holding the caret, or
    /// before the trailing paragraph when there is no selection.
    pub fn insert_tool(
        &self,
        state: &EditorState,
        tool: ToolKind,
    ) -> Result<EditOutcome, EditorError> {
        if !self.config.is_enabled(tool) {
            return Err(EditorError::tool_disabled(tool));
        }
        check_selection(state)?;
        let container = self.registry.get(tool).empty_container();

        self.apply(state, |tx| {
            let document = tx.document();
            let count = document.child_count(&Path::root());
            let block = tx
                .selection()
                .and_then(|range| range.focus.path.indices().first().copied());

            let index = match block {
                Some(index) => {
                    let at = Path::from([index]);
                    if index > 0
                        && document.tag(&at) == Some(Tag::Paragraph)
                        && document.is_empty_at(&at)
                    {
                        tx.remove_node(&at)?;
                        index
                    } else {
                        index + 1
                    }
                }
                None => count.saturating_sub(1).max(1).min(count),
            };

            let at = Path::from([index]);
            tx.insert_node(container, &at)?;
            let start = tx
                .document()
                .start(&at)
                .ok_or_else(|| TransformError::invalid_path(at.clone()))?;
            tracing::debug!(tool = %tool, at = %at, "tool inserted");
            tx.select_point(start)
        })
    }

    /// Set the metadata value of the leveled item at `path`
    pub fn set_item_metadata(
        &self,
        state: &EditorState,
        path: &Path,
        value: Metadata,
    ) -> Result<EditOutcome, EditorError> {
        let field = self.metadata_field(state, path)?;
        self.apply(state, |tx| {
            let mut patch = Props::new();
            patch.insert(field.to_string(), json!(value.as_str()));
            tx.set_props(path, patch)
        })
    }

    /// Advance the metadata of the leveled item at `path` one step along
    /// `none → low → med → high → none`
    pub fn cycle_item_metadata(
        &self,
        state: &EditorState,
        path: &Path,
    ) -> Result<EditOutcome, EditorError> {
        self.metadata_field(state, path)?;
        let current = state
            .document
            .element(path)
            .and_then(|element| {
                self.registry
                    .for_tag(&element.tag)
                    .map(|schema| schema.metadata_of(&element.props))
            })
            .unwrap_or_default();
        self.set_item_metadata(state, path, current.cycle())
    }

    /// Property key holding the metadata of the leveled item at `path`
    fn metadata_field(&self, state: &EditorState, path: &Path) -> Result<&'static str, EditorError> {
        let tag = state.document.tag(path);
        match tag {
            Some(Tag::Item(tool)) if tool.variant() == ToolVariant::LeveledList => self
                .registry
                .get(tool)
                .metadata_field
                .ok_or_else(|| EditorError::not_an_item(path.clone())),
            _ => Err(EditorError::not_an_item(path.clone())),
        }
    }

    /// Normalize, enforce the root layout and settle the selection
    fn commit(&self, mut tx: Transaction<'_>) -> Result<(EditorState, Vec<Operation>), EditorError> {
        let max_passes = self.config.max_normalization_passes;
        normalize(&mut tx, &self.registry, max_passes)?;
        root_layout::enforce(&mut tx, max_passes)?;
        settle_selection(&mut tx)?;
        Ok(tx.into_parts())
    }
}

impl Default for Editor {
    fn default() -> Self {
        let config = EditorConfig::default();
        let registry = SchemaRegistry::core();
        let chain = build_chain(&config, &registry);
        Self {
            config,
            registry,
            chain,
        }
    }
}

/// Handler chain for `config`: generic lists first, then one handler per
/// enabled tool in configuration order
fn build_chain(config: &EditorConfig, registry: &SchemaRegistry) -> HandlerChain {
    let mut chain = HandlerChain::new();
    if config.generic_lists {
        chain.push(Box::new(ListHandler));
    }
    for tool in &config.enabled_tools {
        let schema = registry.get(*tool).clone();
        match schema.variant() {
            ToolVariant::SimpleOutline => chain.push(Box::new(OutlineHandler::new(schema))),
            ToolVariant::LeveledList => {
                chain.push(Box::new(LeveledHandler::new(schema, config.max_indent)))
            }
        }
    }
    chain
}

fn check_selection(state: &EditorState) -> Result<(), EditorError> {
    let Some(range) = &state.selection else {
        return Ok(());
    };
    for point in [&range.anchor, &range.focus] {
        if !state.document.is_valid_point(point) {
            return Err(EditorError::invalid_selection(format!(
                "no text position at {} offset {}",
                point.path, point.offset
            )));
        }
    }
    Ok(())
}

/// A committed selection must address existing text; anything else is
/// moved to the end of the document
fn settle_selection(tx: &mut Transaction<'_>) -> Result<(), TransformError> {
    let Some(range) = tx.selection().cloned() else {
        return Ok(());
    };
    let document = tx.document();
    if document.is_valid_point(&range.anchor) && document.is_valid_point(&range.focus) {
        return Ok(());
    }
    let fallback = document
        .texts()
        .last()
        .map(|(path, text)| Point::new(path.clone(), text.len()));
    tracing::warn!(selection = ?range, "selection re-anchored after normalization");
    match fallback {
        Some(point) => tx.select_point(point),
        None => tx.deselect(),
    }
}

