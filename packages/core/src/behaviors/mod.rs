//! Key Behavior Engine
//!
//! Structural keys (Enter, Backspace, Tab, Shift+Tab) are offered to an
//! ordered chain of handlers:
//!
//! - `ListHandler` - generic bulleted lists (always first)
//! - `OutlineHandler` - one per enabled Simple Outline tool
//! - `LeveledHandler` - one per enabled Leveled Metadata List tool
//!
//! Every handler receives its own draft `Transaction`. The first one that
//! answers `KeyResponse::Handled` wins and its draft is handed back for
//! normalization; the drafts of handlers that answer `Ignored` are dropped,
//! so a declined event never leaves a trace in the document.
//!
//! The two tool handlers are parametrized by a `SchemaDescriptor`, which is
//! what lets seven tools share two state machines.

mod carry_down;
mod keys;
mod leveled;
mod list;
mod outline;

#[cfg(test)]
mod list_test;

pub use carry_down::{indent, outdent};
pub use keys::{Key, KeyEvent};
pub use leveled::LeveledHandler;
pub use list::ListHandler;
pub use outline::OutlineHandler;

use crate::models::{EditorState, Point};
use crate::operations::{Transaction, TransformError};

/// Whether a handler claimed an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// The draft holds the complete edit; default text input is suppressed
    Handled,
    /// Preconditions not met; the draft is discarded
    Ignored,
}

/// A keystroke state machine
///
/// Implementations inspect the draft, and either perform their whole edit
/// and return `Handled`, or return `Ignored`. Errors are reserved for
/// addressing failures, which mean a broken tree invariant.
pub trait KeyHandler: Send + Sync {
    /// Short name for logs and `KeyOutcome::handler`
    fn name(&self) -> &'static str;

    fn handle(
        &self,
        tx: &mut Transaction<'_>,
        event: &KeyEvent,
    ) -> Result<KeyResponse, TransformError>;
}

/// The draft produced by the handler that claimed an event
#[derive(Debug)]
pub struct Dispatch<'a> {
    pub handler: &'static str,
    pub transaction: Transaction<'a>,
}

/// Ordered handler list; the first `Handled` answer wins
#[derive(Default)]
pub struct HandlerChain {
    handlers: Vec<Box<dyn KeyHandler>>,
}

impl HandlerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler with the lowest priority so far
    pub fn push(&mut self, handler: Box<dyn KeyHandler>) {
        self.handlers.push(handler);
    }

    pub fn with(mut self, handler: impl KeyHandler + 'static) -> Self {
        self.push(Box::new(handler));
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|handler| handler.name()).collect()
    }

    /// Offer `event` to each handler in turn
    ///
    /// Returns `None` when every handler ignored the event.
    pub fn dispatch<'a>(
        &self,
        state: &'a EditorState,
        event: &KeyEvent,
    ) -> Result<Option<Dispatch<'a>>, TransformError> {
        for handler in &self.handlers {
            let mut transaction = Transaction::new(state);
            match handler.handle(&mut transaction, event)? {
                KeyResponse::Handled => {
                    tracing::debug!(
                        handler = handler.name(),
                        key = %event,
                        operations = transaction.operations().len(),
                        "key handled"
                    );
                    return Ok(Some(Dispatch {
                        handler: handler.name(),
                        transaction,
                    }));
                }
                KeyResponse::Ignored => {
                    tracing::trace!(handler = handler.name(), key = %event, "key ignored");
                }
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerChain")
            .field("handlers", &self.names())
            .finish()
    }
}

/// Collapsed caret inside an existing text, the only selection structural
/// handlers act on
pub(crate) fn collapsed_caret(tx: &Transaction<'_>) -> Option<Point> {
    tx.caret()
        .filter(|caret| tx.document().is_valid_point(caret))
}
