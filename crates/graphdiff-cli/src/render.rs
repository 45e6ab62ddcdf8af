use std::fmt::Write;

use colored::Colorize;
use graphdiff_core::{Node, NodeVisitor, State, Visit};
use graphdiff_types::Value;

/// Renders a node tree as indented lines, one per node.
pub struct TreeRenderer {
    include_untouched: bool,
    base_depth: usize,
    out: String,
}

impl TreeRenderer {
    pub fn new(root: &Node, include_untouched: bool) -> Self {
        Self {
            include_untouched,
            base_depth: root.path().len(),
            out: String::new(),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl NodeVisitor for TreeRenderer {
    fn node(&mut self, node: &Node) -> Visit {
        if !self.include_untouched && !node.has_changes() {
            return Visit::SkipChildren;
        }
        let depth = node.path().len().saturating_sub(self.base_depth);
        let label = match node.path().last() {
            Some(element) if depth > 0 => element.to_string(),
            _ => node.path().to_string(),
        };
        let _ = writeln!(
            self.out,
            "{}{} {}{}",
            "  ".repeat(depth),
            label,
            paint(node.state()),
            summary(node)
        );
        Visit::Continue
    }
}

/// Render the subtree rooted at `node`.
pub fn tree(node: &Node, include_untouched: bool) -> String {
    let mut renderer = TreeRenderer::new(node, include_untouched);
    node.visit(&mut renderer);
    renderer.finish()
}

/// One `STATE path summary` line for a change.
pub fn change_line(node: &Node) -> String {
    format!("{} {}{}", paint(node.state()), node.path(), summary(node))
}

fn paint(state: State) -> colored::ColoredString {
    let text = state.to_string();
    match state {
        State::Added => text.green(),
        State::Removed => text.red(),
        State::Changed => text.yellow(),
        State::Untouched => text.dimmed(),
    }
}

fn summary(node: &Node) -> String {
    if node.has_children() {
        return String::new();
    }
    match (node.state(), node.working(), node.base()) {
        (State::Changed, Some(w), Some(b)) => format!(": {} → {}", quote(b), quote(w)),
        (State::Added, Some(w), _) => format!(": {}", quote(w)),
        (State::Removed, _, Some(b)) => format!(": {}", quote(b)),
        _ => String::new(),
    }
}

fn quote(value: &Value) -> String {
    match value.as_text() {
        Some(text) => format!("{text:?}"),
        None => value.to_string(),
    }
}
