//! The UI renders command output into bordered panels and tables.
//!
//! Widgets are drawn into an off-screen ratatui buffer and flattened to plain lines, so output
//! looks the same on a terminal, in a pipe or in a test. The outline view draws the heading tree
//! with box-drawing characters.

use crate::heading_tree::{HeadingNode, HeadingTree};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    text::{Line, Text},
    widgets::{Block, Paragraph, Row, Table, Widget},
};

/// Narrowest panel drawn, enough for the border and a few characters.
const MIN_WIDTH: u16 = 8;

fn height_for(rows: usize, chrome: u16) -> u16 {
    u16::try_from(rows)
        .unwrap_or(u16::MAX)
        .saturating_add(chrome)
}

/// Turn a rendered buffer into text, one line per row, trailing spaces removed.
fn flatten(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let row: String = (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect();
            row.trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn draw(widget: impl Widget, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width.max(MIN_WIDTH), height);
    let mut buffer = Buffer::empty(area);
    widget.render(area, &mut buffer);
    flatten(&buffer)
}

#[must_use]
/// Draw `lines` inside a titled border `width` columns wide. Long lines are cut at the border.
pub fn render_panel<S: AsRef<str>>(title: &str, lines: &[S], width: u16) -> String {
    let text = Text::from(
        lines
            .iter()
            .map(|l| Line::raw(l.as_ref().to_string()))
            .collect::<Vec<_>>(),
    );
    let paragraph = Paragraph::new(text).block(Block::bordered().title(title.to_string()));
    draw(paragraph, width, height_for(lines.len(), 2))
}

#[must_use]
/// Draw two-column `rows` under a header inside a titled border.
pub fn render_table(title: &str, header: [&str; 2], rows: &[(String, String)], width: u16) -> String {
    let key_width = rows
        .iter()
        .map(|(k, _)| k.chars().count())
        .chain(std::iter::once(header[0].chars().count()))
        .max()
        .unwrap_or(0);
    let table = Table::new(
        rows.iter()
            .map(|(k, v)| Row::new(vec![k.clone(), v.clone()])),
        [
            Constraint::Length(u16::try_from(key_width).unwrap_or(u16::MAX)),
            Constraint::Min(0),
        ],
    )
    .header(Row::new(vec![header[0].to_string(), header[1].to_string()]))
    .block(Block::bordered().title(title.to_string()));
    draw(table, width, height_for(rows.len(), 3))
}

/// Generate box-drawing prefix for tree structure
fn get_tree_prefix(open_ancestors: &[bool], is_last: bool) -> String {
    let mut prefix = String::new();

    // Draw vertical lines for ancestors that still have siblings below
    for &open in open_ancestors {
        if open {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }

    // Draw branch for current level
    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }

    prefix
}

fn walk(
    nodes: &[HeadingNode],
    siblings: &[usize],
    depth: usize,
    open_ancestors: &mut Vec<bool>,
    out: &mut Vec<String>,
) {
    for (position, &index) in siblings.iter().enumerate() {
        let node = &nodes[index];
        let is_last = position + 1 == siblings.len();
        let prefix = if depth == 0 {
            String::new()
        } else {
            get_tree_prefix(open_ancestors, is_last)
        };
        out.push(format!(
            "{prefix}{} :{}",
            node.heading.title(),
            node.heading.line_index + 1
        ));

        if depth > 0 {
            open_ancestors.push(!is_last);
        }
        walk(nodes, &node.children_indices, depth + 1, open_ancestors, out);
        if depth > 0 {
            open_ancestors.pop();
        }
    }
}

#[must_use]
/// One line per heading, indented under its parent, each ending in its 1-based line number.
pub fn outline_lines(tree: &HeadingTree) -> Vec<String> {
    let nodes = tree.nodes();
    let roots: Vec<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.parent_index.is_none())
        .map(|(i, _)| i)
        .collect();
    let mut out = Vec::with_capacity(nodes.len());
    walk(nodes, &roots, 0, &mut Vec::new(), &mut out);
    out
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
