//! Tree positions used while walking a selection path

use crate::node::PresetNode;
use crate::path::SelectionPath;

/// Where a walk currently stands
///
/// A walk starts at the category's top-level [`TreePosition::Sequence`] and
/// each id moves it onto a [`TreePosition::Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreePosition<'a> {
    /// A sequence of sibling nodes (only the top level)
    Sequence(&'a [PresetNode]),
    /// A single node reached by a non-empty path
    Node(&'a PresetNode),
}

impl<'a> TreePosition<'a> {
    /// Start position for a category's top-level sequence
    #[inline]
    #[must_use]
    pub fn top(nodes: &'a [PresetNode]) -> Self {
        Self::Sequence(nodes)
    }

    /// Nodes selectable from this position
    #[inline]
    #[must_use]
    pub fn options(&self) -> &'a [PresetNode] {
        match *self {
            Self::Sequence(nodes) => nodes,
            Self::Node(node) => node.children(),
        }
    }

    /// Move onto the option with the given id
    #[must_use]
    pub fn descend(&self, id: &str) -> Option<TreePosition<'a>> {
        self.options()
            .iter()
            .find(|node| node.id == id)
            .map(TreePosition::Node)
    }

    /// The node at this position, if any
    #[inline]
    #[must_use]
    pub fn node(&self) -> Option<&'a PresetNode> {
        match *self {
            Self::Sequence(_) => None,
            Self::Node(node) => Some(node),
        }
    }
}

/// Walk `path` from the top-level sequence
///
/// Returns `None` as soon as an id is missing at its level.
#[must_use]
pub fn walk<'a>(nodes: &'a [PresetNode], path: &SelectionPath) -> Option<TreePosition<'a>> {
    path.iter()
        .try_fold(TreePosition::top(nodes), |position, id| position.descend(id))
}

/// Labels of the nodes along `path`, stopping at the first missing id
#[must_use]
pub fn breadcrumb(nodes: &[PresetNode], path: &SelectionPath) -> Vec<String> {
    let mut labels = Vec::with_capacity(path.len());
    let mut position = TreePosition::top(nodes);
    for id in path.iter() {
        match position.descend(id) {
            Some(next) => {
                if let Some(node) = next.node() {
                    labels.push(node.label.clone());
                }
                position = next;
            }
            None => break,
        }
    }
    labels
}
