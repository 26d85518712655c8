//! Keystroke Replay Binary
//!
//! Runs a scripted sequence of keys and edits through the outline engine and
//! prints the resulting editor state as JSON. Useful for reproducing editing
//! bugs outside the desktop app.
//!
//! # Usage
//!
//! ```bash
//! # Script from a file
//! cargo run --bin keystroke-replay -- script.json
//!
//! # Script from stdin, with handler logs
//! RUST_LOG=debug cargo run --bin keystroke-replay < script.json
//! ```
//!
//! # Script format
//!
//! ```json
//! {
//!   "config": { "enabledTools": ["ranking", "risks"] },
//!   "state": { "document": { "children": [] } },
//!   "steps": ["caret:1.0@0", "tool:ranking", "type:First", "Enter", "Tab"]
//! }
//! ```
//!
//! `config` and `state` are optional. Steps are key names (`Enter`,
//! `Backspace`, `Tab`, `Shift+Tab`) or one of `type:<text>`, `tool:<tool>`,
//! `caret:<path>@<offset>` and `metadata:<path>` (cycle an item's metadata).
//! Keys no handler claims get the host's default behavior.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Logging level (default: "info"); logs go to stderr

use std::io::Read;

use anyhow::Context;
use nodespace_outline::behaviors::{Key, KeyEvent};
use nodespace_outline::models::{EditorState, Path, Point, ToolKind};
use nodespace_outline::services::{Editor, EditorConfig};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Script {
    #[serde(default)]
    config: EditorConfig,
    #[serde(default)]
    state: EditorState,
    steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Key(KeyEvent),
    Type(String),
    Tool(ToolKind),
    Caret(Point),
    Metadata(Path),
}

fn parse_path(raw: &str) -> anyhow::Result<Path> {
    let indices = raw
        .split('.')
        .map(|index| index.trim().parse::<usize>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid path '{}'", raw))?;
    Ok(Path::new(indices))
}

fn parse_step(raw: &str) -> anyhow::Result<Step> {
    if let Some(text) = raw.strip_prefix("type:") {
        return Ok(Step::Type(text.to_string()));
    }
    if let Some(tool) = raw.strip_prefix("tool:") {
        return Ok(Step::Tool(tool.parse()?));
    }
    if let Some(caret) = raw.strip_prefix("caret:") {
        let (path, offset) = caret
            .split_once('@')
            .ok_or_else(|| anyhow::anyhow!("caret step needs <path>@<offset>"))?;
        let offset = offset
            .parse::<usize>()
            .with_context(|| format!("invalid offset '{}'", offset))?;
        return Ok(Step::Caret(Point::new(parse_path(path)?, offset)));
    }
    if let Some(path) = raw.strip_prefix("metadata:") {
        return Ok(Step::Metadata(parse_path(path)?));
    }
    Ok(Step::Key(raw.parse()?))
}

fn run_step(editor: &Editor, state: EditorState, step: Step) -> anyhow::Result<EditorState> {
    let next = match step {
        Step::Key(event) => {
            let outcome = editor.handle_keydown(&state, &event)?;
            if outcome.handled {
                tracing::info!(
                    key = %event,
                    handler = outcome.handler.unwrap_or_default(),
                    operations = outcome.operations.len(),
                    "key handled"
                );
                outcome.state
            } else {
                tracing::info!(key = %event, "default behavior");
                default_key(editor, &state, &event)?
            }
        }
        Step::Type(text) => editor.apply(&state, |tx| tx.insert_text(&text))?.state,
        Step::Tool(tool) => editor.insert_tool(&state, tool)?.state,
        Step::Caret(point) => editor.apply(&state, |tx| tx.select_point(point))?.state,
        Step::Metadata(path) => editor.cycle_item_metadata(&state, &path)?.state,
    };
    Ok(next)
}

/// What the host does with a key no handler claimed
fn default_key(editor: &Editor, state: &EditorState, event: &KeyEvent) -> anyhow::Result<EditorState> {
    let Some(caret) = state.caret().cloned() else {
        return Ok(state.clone());
    };
    let outcome = match event.key {
        Key::Backspace => editor.apply(state, |tx| tx.delete_backward().map(|_| ()))?,
        Key::Enter => {
            let block = caret.path.parent();
            let splittable = state
                .document
                .tag(&block)
                .is_some_and(|tag| tag.is_text_block());
            if !splittable {
                return Ok(state.clone());
            }
            editor.apply(state, |tx| tx.split_nodes(&caret, &block, None))?
        }
        Key::Tab => return Ok(state.clone()),
    };
    Ok(outcome.state)
}

fn read_script(path: Option<String>) -> anyhow::Result<Script> {
    let json = match path.as_deref() {
        None | Some("-") => {
            let mut json = String::new();
            std::io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read script from stdin")?;
            json
        }
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path))?,
    };
    serde_json::from_str(&json).context("Failed to parse script")
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let script = read_script(std::env::args().nth(1))?;
    let editor = Editor::new(script.config)?;
    tracing::info!(handlers = ?editor.chain().names(), steps = script.steps.len(), "replaying");

    let mut state = editor.normalize(&script.state)?.state;
    for (index, raw) in script.steps.iter().enumerate() {
        let step = parse_step(raw).with_context(|| format!("step {}: '{}'", index, raw))?;
        state = run_step(&editor, state, step)
            .with_context(|| format!("step {} failed: '{}'", index, raw))?;
    }

    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(parse_step("Shift+Tab").unwrap(), Step::Key(KeyEvent::shift_tab()));
        assert_eq!(parse_step("type:a b").unwrap(), Step::Type("a b".to_string()));
        assert_eq!(
            parse_step("tool:decision-tree").unwrap(),
            Step::Tool(ToolKind::DecisionTree)
        );
        assert_eq!(
            parse_step("caret:1.0.0@3").unwrap(),
            Step::Caret(Point::new([1, 0, 0], 3))
        );
        assert!(parse_step("caret:1.x@0").is_err());
        assert!(parse_step("Escape").is_err());
    }

    #[test]
    fn test_replay_builds_ranking() {
        let editor = Editor::default();
        let script: Script = serde_json::from_str(
            r#"{"steps": ["caret:1.0@0", "tool:ranking", "type:First", "Enter", "type:Second", "Tab"]}"#,
        )
        .unwrap();

        let mut state = editor.normalize(&script.state).unwrap().state;
        for raw in &script.steps {
            state = run_step(&editor, state, parse_step(raw).unwrap()).unwrap();
        }

        let ranking = nodespace_outline::models::core_schema(ToolKind::Ranking);
        let expected = nodespace_outline::models::Node::element(
            ranking.container_tag,
            vec![ranking.new_outline_item("First", &["Second"])],
        );
        assert_eq!(state.document.children[1], expected);
    }

    #[test]
    fn test_unclaimed_backspace_deletes_character() {
        let editor = Editor::default();
        let state = editor.normalize(&EditorState::default()).unwrap().state;
        let state = run_step(&editor, state, Step::Caret(Point::new([0, 0], 0))).unwrap();
        let state = run_step(&editor, state, Step::Type("ab".to_string())).unwrap();
        let state = run_step(&editor, state, Step::Key(KeyEvent::backspace())).unwrap();
        assert_eq!(state.document.children[0].string(), "a");
    }
}
