//! Parent/child structure over the flat heading list.
//!
//! The tree is an arena: nodes live in a `Vec` in document order and refer to each other by
//! position, the same way sections refer to their parent and children by index. Nothing in the
//! tree owns another node, so replacing the whole tree after an edit is a single assignment.

use crate::heading::{Heading, MAX_LEVEL, MIN_LEVEL};

#[derive(Clone, Debug, PartialEq, Eq)]
/// One heading plus its links into the arena.
pub struct HeadingNode {
    /// The heading this node wraps.
    pub heading: Heading,
    /// Arena position of the enclosing heading, if any.
    pub parent_index: Option<usize>,
    /// Arena positions of directly nested headings, in document order.
    pub children_indices: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Forest of headings where each parent has a strictly lower level than its children.
pub struct HeadingTree {
    nodes: Vec<HeadingNode>,
}

impl HeadingTree {
    #[must_use]
    /// Build the forest from headings already sorted by line.
    ///
    /// Keeps the most recent heading seen at each level. A heading's parent is the closest
    /// occupied slot above its own level; once placed, it clears every deeper slot so later
    /// headings can't attach to a section that has already ended.
    pub fn build(headings: &[Heading]) -> Self {
        let mut nodes: Vec<HeadingNode> = Vec::with_capacity(headings.len());
        let mut open: [Option<usize>; MAX_LEVEL + 1] = [None; MAX_LEVEL + 1];

        for heading in headings {
            let level = heading.level.clamp(MIN_LEVEL, MAX_LEVEL);
            let parent_index = (MIN_LEVEL..level).rev().find_map(|l| open[l]);
            let index = nodes.len();

            if let Some(parent) = parent_index {
                nodes[parent].children_indices.push(index);
            }
            nodes.push(HeadingNode {
                heading: heading.clone(),
                parent_index,
                children_indices: Vec::new(),
            });

            open[level] = Some(index);
            for slot in &mut open[level + 1..] {
                *slot = None;
            }
        }

        Self { nodes }
    }

    #[must_use]
    /// All nodes in document order.
    pub fn nodes(&self) -> &[HeadingNode] {
        &self.nodes
    }

    #[must_use]
    /// True when no headings were indexed.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena position of `heading`, or `None` if the tree does not hold this exact heading.
    fn position(&self, heading: &Heading) -> Option<usize> {
        let index = self
            .nodes
            .binary_search_by_key(&heading.line_index, |n| n.heading.line_index)
            .ok()?;
        (self.nodes[index].heading == *heading).then_some(index)
    }

    #[must_use]
    /// The node for `heading`, if it is current.
    pub fn node(&self, heading: &Heading) -> Option<&HeadingNode> {
        self.position(heading).map(|i| &self.nodes[i])
    }

    /// Top-level headings in document order.
    pub fn roots(&self) -> impl Iterator<Item = &Heading> {
        self.nodes
            .iter()
            .filter(|n| n.parent_index.is_none())
            .map(|n| &n.heading)
    }

    #[must_use]
    /// Direct children of `heading`; empty when it has none or is not in the tree.
    pub fn children_of(&self, heading: &Heading) -> Vec<&Heading> {
        self.node(heading)
            .map(|node| {
                node.children_indices
                    .iter()
                    .map(|&i| &self.nodes[i].heading)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    /// The enclosing heading of `heading`.
    pub fn parent_of(&self, heading: &Heading) -> Option<&Heading> {
        let parent = self.node(heading)?.parent_index?;
        Some(&self.nodes[parent].heading)
    }

    #[must_use]
    /// Enclosing headings from nearest to outermost.
    pub fn ancestors(&self, heading: &Heading) -> Vec<&Heading> {
        let mut chain = Vec::new();
        let mut current = self.node(heading).and_then(|n| n.parent_index);
        while let Some(index) = current {
            chain.push(&self.nodes[index].heading);
            current = self.nodes[index].parent_index;
        }
        chain
    }

    #[must_use]
    /// First direct child of `heading` at `level` whose title equals `title`, ignoring case.
    pub fn first_child_matching(
        &self,
        heading: &Heading,
        title: &str,
        level: usize,
    ) -> Option<&Heading> {
        let wanted = title.trim().to_lowercase();
        self.node(heading)?
            .children_indices
            .iter()
            .map(|&i| &self.nodes[i].heading)
            .find(|child| child.level == level && child.title().to_lowercase() == wanted)
    }
}

#[cfg(test)]
#[path = "tests/heading_tree.rs"]
mod tests;
