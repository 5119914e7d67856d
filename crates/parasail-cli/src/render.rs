//! Plain-text rendering of the library tree and service results.

use parasail_core::{CompletionCandidate, Diagnostic, DisplayNode, Library, NodeKind};
use std::fmt::Write;

/// Render the display forest as an indented tree.
pub fn render_forest(forest: &[DisplayNode]) -> String {
    let mut out = String::new();
    for node in forest {
        match &node.kind {
            NodeKind::AddAction { command } => {
                let _ = writeln!(out, "[+] {} ({})", node.label, command);
            }
            _ => {
                let _ = writeln!(out, "{}", node_line(node));
                render_children(&mut out, &node.children, "");
            }
        }
    }
    out
}

fn render_children(out: &mut String, children: &[DisplayNode], prefix: &str) {
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let branch = if last { "└── " } else { "├── " };
        let _ = writeln!(out, "{}{}{}", prefix, branch, node_line(child));

        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        render_children(out, &child.children, &nested);
    }
}

fn node_line(node: &DisplayNode) -> String {
    match &node.tooltip {
        Some(tooltip) if node.collapsible() => format!("{}  ({})", node.label, tooltip),
        _ => node.label.clone(),
    }
}

/// One line per library: name, file counts and path.
pub fn render_library_list(libraries: &[Library]) -> String {
    let mut out = String::new();
    for library in libraries {
        let _ = writeln!(
            out,
            "{}\t{} headers, {} sources\t{}",
            library.name,
            library.headers.len(),
            library.sources.len(),
            library.path.display()
        );
    }
    out
}

pub fn render_completions(candidates: &[CompletionCandidate]) -> String {
    let mut out = String::new();
    for candidate in candidates {
        match &candidate.detail {
            Some(detail) => {
                let _ = writeln!(out, "{}\t{}", candidate.label, detail);
            }
            None => {
                let _ = writeln!(out, "{}", candidate.label);
            }
        }
    }
    out
}

/// `file:line:col: severity: message`, with one-based line and column.
pub fn render_diagnostics(file: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        let start = diagnostic.range.start;
        let severity = diagnostic
            .severity
            .map(|s| s.to_string())
            .unwrap_or_else(|| "error".to_string());
        let _ = writeln!(
            out,
            "{}:{}:{}: {}: {}",
            file,
            start.line + 1,
            start.character + 1,
            severity,
            diagnostic.message
        );
    }
    out
}
