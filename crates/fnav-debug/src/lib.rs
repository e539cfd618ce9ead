#![forbid(unsafe_code)]

//! Stack-tree debugging.
//!
//! [`snapshot_stack_tree`] walks a stack and its nested child stacks
//! without mutating anything. The snapshot renders as an indented text log
//! ([`render_stack_log`]), exports as JSON ([`to_json`]), or goes straight
//! to `tracing` ([`log_stack`]).
//!
//! Top-level records are ordered bottom to top, as the host attached them.
//! Child records are ordered top to bottom, the way the text log reads.

use std::fmt::Write as _;

use fnav_core::host::simple_name;
use fnav_core::{Host, ScreenId, StackId};
use fnav_runtime::{NavConfig, StackViewMode};
use serde::{Deserialize, Serialize};

const RULE: &str =
    "═══════════════════════════════════════════════════════════════════════════════════";

/// One screen and its nested stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRecord {
    /// Simple class name.
    pub name: String,
    /// Child stack records, top first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ScreenRecord>,
}

impl ScreenRecord {
    /// Leaf record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Record with children, top first.
    #[must_use]
    pub fn with_children(name: impl Into<String>, children: Vec<ScreenRecord>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }
}

/// Snapshot `stack`, bottom first.
pub fn snapshot_stack_tree<H: Host>(host: &H, stack: StackId) -> Vec<ScreenRecord> {
    let mut visiting = vec![stack];
    host.screens(stack)
        .into_iter()
        .filter_map(|s| record(host, s, &mut visiting))
        .collect()
}

fn record<H: Host>(
    host: &H,
    screen: ScreenId,
    visiting: &mut Vec<StackId>,
) -> Option<ScreenRecord> {
    let info = host.screen(screen)?;
    let mut children = Vec::new();
    if let Some(child) = info.child_stack
        && !visiting.contains(&child)
    {
        visiting.push(child);
        children = host
            .screens(child)
            .into_iter()
            .rev()
            .filter_map(|s| record(host, s, visiting))
            .collect();
        visiting.pop();
    }
    Some(ScreenRecord::with_children(
        simple_name(&info.class_name),
        children,
    ))
}

/// Render a snapshot as the stack log: top first, each child stack
/// indented below its parent. A lone record prints only its top line.
#[must_use]
pub fn render_stack_log(records: &[ScreenRecord]) -> String {
    let mut out = String::new();
    if records.is_empty() {
        return out;
    }
    out.push_str(RULE);
    out.push('\n');
    let last = records.len() - 1;
    for (i, record) in records.iter().enumerate().rev() {
        let marker = if i == last {
            "top"
        } else if i == 0 {
            "bottom"
        } else {
            "↓"
        };
        let _ = write!(out, "\t{marker}\t\t\t{}\n\n", record.name);
        render_children(&record.children, &mut out, 1);
    }
    out.push_str(RULE);
    out
}

fn render_children(children: &[ScreenRecord], out: &mut String, depth: usize) {
    let last = children.len().saturating_sub(1);
    for (j, child) in children.iter().enumerate() {
        for _ in 0..depth {
            out.push_str("\t\t\t");
        }
        let marker = if j == 0 {
            "child top"
        } else if j == last {
            "child bottom"
        } else {
            "↓"
        };
        let _ = write!(out, "\t{marker}\t\t{}\n\n", child.name);
        render_children(&child.children, out, depth + 1);
    }
}

/// Export a snapshot as pretty JSON.
///
/// # Errors
///
/// Serialization errors from `serde_json`.
pub fn to_json(records: &[ScreenRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Parse a JSON snapshot.
///
/// # Errors
///
/// Deserialization errors from `serde_json`.
pub fn from_json(json: &str) -> serde_json::Result<Vec<ScreenRecord>> {
    serde_json::from_str(json)
}

/// Log the stack tree of `stack` at info level under target `fnav`.
///
/// Silent when the stack is empty or the config disables the stack view.
/// Returns whether anything was logged.
pub fn log_stack<H: Host>(host: &H, stack: StackId, config: &NavConfig) -> bool {
    if config.stack_view_mode == StackViewMode::None {
        return false;
    }
    let records = snapshot_stack_tree(host, stack);
    if records.is_empty() {
        return false;
    }
    tracing::info!(target: "fnav", %stack, "stack tree\n{}", render_stack_log(&records));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnav_core::testing::MemoryHost;
    use fnav_core::{CommitMode, ContainerId, Transaction};
    use tracing_test::traced_test;

    fn attach(
        host: &mut MemoryHost,
        stack: StackId,
        container: ContainerId,
        class: &str,
    ) -> ScreenId {
        let screen = host.create_screen(class);
        host.commit(
            stack,
            Transaction::new().add(container, screen, class).add_to_back_stack(class),
            CommitMode::Normal,
        )
        .expect("commit");
        screen
    }

    fn sample() -> (MemoryHost, StackId) {
        let mut host = MemoryHost::new();
        let stack = host.create_stack();
        let container = host.create_container();
        let _home = attach(&mut host, stack, container, "app.Home");
        let tabs = attach(&mut host, stack, container, "app.Tabs");
        let child = host.create_child_stack(tabs);
        let inner = host.create_container();
        attach(&mut host, child, inner, "app.Feed");
        attach(&mut host, child, inner, "app.Post");
        (host, stack)
    }

    #[test]
    fn snapshot_orders_roots_bottom_first_and_children_top_first() {
        let (host, stack) = sample();
        let records = snapshot_stack_tree(&host, stack);
        assert_eq!(
            records,
            vec![
                ScreenRecord::new("Home"),
                ScreenRecord::with_children(
                    "Tabs",
                    vec![ScreenRecord::new("Post"), ScreenRecord::new("Feed")]
                ),
            ]
        );
    }

    #[test]
    fn log_marks_top_bottom_and_children() {
        let (host, stack) = sample();
        let log = render_stack_log(&snapshot_stack_tree(&host, stack));
        let expected = format!(
            "{RULE}\n\ttop\t\t\tTabs\n\n\
             \t\t\t\tchild top\t\tPost\n\n\
             \t\t\t\tchild bottom\t\tFeed\n\n\
             \tbottom\t\t\tHome\n\n{RULE}"
        );
        assert_eq!(log, expected);
    }

    #[test]
    fn single_record_prints_only_the_top_line() {
        let log = render_stack_log(&[ScreenRecord::new("Only")]);
        assert_eq!(log, format!("{RULE}\n\ttop\t\t\tOnly\n\n{RULE}"));
        assert!(!log.contains("bottom"));
        assert!(render_stack_log(&[]).is_empty());
    }

    #[test]
    fn json_round_trips_and_omits_empty_children() {
        let (host, stack) = sample();
        let records = snapshot_stack_tree(&host, stack);
        let json = to_json(&records).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("value");
        assert!(value[0].get("children").is_none());
        assert_eq!(value[1]["children"][0]["name"], "Post");
        assert_eq!(from_json(&json).expect("parse"), records);
    }

    #[traced_test]
    #[test]
    fn log_stack_respects_view_mode() {
        let (host, stack) = sample();
        assert!(log_stack(&host, stack, &NavConfig::default()));
        assert!(logs_contain("stack tree"));

        let silent = NavConfig::new().stack_view_mode(StackViewMode::None);
        assert!(!log_stack(&host, stack, &silent));
    }
}
