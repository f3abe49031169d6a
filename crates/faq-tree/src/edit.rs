//! Path-addressed editing primitives
//!
//! All operations act on one category's top-level sequence. A path's last id
//! names the target node and the preceding ids name its ancestors. Ids that
//! cannot be found leave the tree untouched and report
//! [`EditOutcome::NotFound`]; the caller may be acting on a stale path.
//! Invalid input (blank labels, sibling id clashes) is an [`EditError`] and
//! is detected before anything is mutated.

use crate::node::PresetNode;
use crate::path::SelectionPath;
use crate::position::walk;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Result of an edit that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOutcome {
    /// The tree changed
    Applied,
    /// Nothing to do (e.g. reorder onto the same index)
    Unchanged,
    /// Some id on the path does not exist at its level
    NotFound,
    /// A reorder index is outside the top-level sequence
    OutOfRange,
}

impl EditOutcome {
    /// Check if the tree changed
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Invalid admin input; the edit is aborted with no partial mutation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// Label is empty after trimming
    #[error("label must not be empty")]
    EmptyLabel,

    /// A sibling already uses this id
    #[error("a sibling already uses id '{id}'")]
    DuplicateSibling {
        /// Clashing id
        id: String,
    },
}

/// Shallow patch for [`update_node`]
///
/// `None` fields are left untouched. `answer: Some("")` clears the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePatch {
    /// New label (trimmed, must not be blank)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// New answer text; blank clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl NodePatch {
    /// Patch only the label
    #[inline]
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            answer: None,
        }
    }

    /// Patch only the answer
    #[inline]
    #[must_use]
    pub fn answer(answer: impl Into<String>) -> Self {
        Self {
            label: None,
            answer: Some(answer.into()),
        }
    }

    /// Check if the patch changes nothing
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.answer.is_none()
    }
}

/// Trim a label, rejecting blank input
///
/// # Errors
/// Returns [`EditError::EmptyLabel`] if nothing is left after trimming
pub fn validate_label(label: &str) -> Result<String, EditError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        Err(EditError::EmptyLabel)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Find the node addressed by `path`
///
/// The empty path addresses no node.
#[must_use]
pub fn find_node<'a>(nodes: &'a [PresetNode], path: &SelectionPath) -> Option<&'a PresetNode> {
    if path.is_empty() {
        return None;
    }
    walk(nodes, path).and_then(|position| position.node())
}

/// Mutable variant of [`find_node`]
pub fn find_node_mut<'a>(nodes: &'a mut [PresetNode], path: &SelectionPath) -> Option<&'a mut PresetNode> {
    find_in(nodes, path.segments())
}

fn find_in<'a>(nodes: &'a mut [PresetNode], ids: &[String]) -> Option<&'a mut PresetNode> {
    let (first, rest) = ids.split_first()?;
    let mut current = nodes.iter_mut().find(|node| &node.id == first)?;
    for id in rest {
        current = current
            .children
            .as_mut()?
            .iter_mut()
            .find(|node| &node.id == id)?;
    }
    Some(current)
}

/// Sibling sequence below `ancestors`, creating `children` when absent
fn sequence_mut<'a>(nodes: &'a mut Vec<PresetNode>, ancestors: &[String]) -> Option<&'a mut Vec<PresetNode>> {
    if ancestors.is_empty() {
        return Some(nodes);
    }
    let parent = find_in(nodes, ancestors)?;
    Some(parent.children.get_or_insert_with(Vec::new))
}

fn remove_by_id(siblings: &mut Vec<PresetNode>, id: &str) -> bool {
    match siblings.iter().position(|node| node.id == id) {
        Some(index) => {
            siblings.remove(index);
            true
        }
        None => false,
    }
}

/// Append `node` under `parent` (top level when `parent` is empty)
///
/// The label is trimmed before insertion. A parent without `children` gets a
/// fresh sequence.
///
/// # Errors
/// - [`EditError::EmptyLabel`] if the label is blank
/// - [`EditError::DuplicateSibling`] if a sibling already uses the id
pub fn add_node(
    nodes: &mut Vec<PresetNode>,
    parent: &SelectionPath,
    mut node: PresetNode,
) -> Result<EditOutcome, EditError> {
    node.label = validate_label(&node.label)?;

    let Some(siblings) = sequence_mut(nodes, parent.segments()) else {
        return Ok(EditOutcome::NotFound);
    };
    if siblings.iter().any(|sibling| sibling.id == node.id) {
        return Err(EditError::DuplicateSibling { id: node.id });
    }
    siblings.push(node);
    Ok(EditOutcome::Applied)
}

/// Remove the node at `path` together with its subtree
///
/// A parent left without children drops its `children` list. Since loaded
/// and built nodes never hold an empty list, an add followed by a delete of
/// the same node restores the parent exactly.
pub fn delete_node(nodes: &mut Vec<PresetNode>, path: &SelectionPath) -> EditOutcome {
    let Some((target, ancestors)) = path.split_last() else {
        return EditOutcome::NotFound;
    };

    let removed = if ancestors.is_empty() {
        remove_by_id(nodes, target)
    } else {
        let Some(parent) = find_in(nodes, ancestors) else {
            return EditOutcome::NotFound;
        };
        let Some(children) = parent.children.as_mut() else {
            return EditOutcome::NotFound;
        };
        let removed = remove_by_id(children, target);
        if removed && children.is_empty() {
            parent.children = None;
        }
        removed
    };

    if removed {
        EditOutcome::Applied
    } else {
        EditOutcome::NotFound
    }
}

/// Merge `patch` into the node at `path`
///
/// # Errors
/// Returns [`EditError::EmptyLabel`] if the patch carries a blank label
pub fn update_node(
    nodes: &mut [PresetNode],
    path: &SelectionPath,
    patch: &NodePatch,
) -> Result<EditOutcome, EditError> {
    let label = patch.label.as_deref().map(validate_label).transpose()?;
    if patch.is_empty() {
        return Ok(EditOutcome::Unchanged);
    }

    let Some(node) = find_node_mut(nodes, path) else {
        return Ok(EditOutcome::NotFound);
    };
    if let Some(label) = label {
        node.label = label;
    }
    if let Some(answer) = &patch.answer {
        node.answer = if answer.trim().is_empty() {
            None
        } else {
            Some(answer.clone())
        };
    }
    Ok(EditOutcome::Applied)
}

/// Move a top-level node from `from` to `to`
///
/// Out-of-range indices are rejected without touching the sequence.
pub fn reorder_top_level(nodes: &mut Vec<PresetNode>, from: usize, to: usize) -> EditOutcome {
    if from >= nodes.len() || to >= nodes.len() {
        return EditOutcome::OutOfRange;
    }
    if from == to {
        return EditOutcome::Unchanged;
    }
    let moved = nodes.remove(from);
    nodes.insert(to, moved);
    EditOutcome::Applied
}

/// A single admin edit, replayable against a category's nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TreeEdit {
    /// Append a node under `parent`
    Add {
        /// Parent path (empty = top level)
        parent: SelectionPath,
        /// Node to insert
        node: PresetNode,
    },
    /// Remove a node and its subtree
    Delete {
        /// Target path
        path: SelectionPath,
    },
    /// Patch label and/or answer
    Update {
        /// Target path
        path: SelectionPath,
        /// Fields to merge
        patch: NodePatch,
    },
    /// Move a top-level node
    Reorder {
        /// Current index
        from: usize,
        /// New index
        to: usize,
    },
}

impl TreeEdit {
    /// Apply in place
    ///
    /// # Errors
    /// Propagates validation errors from the underlying primitive
    pub fn apply(&self, nodes: &mut Vec<PresetNode>) -> Result<EditOutcome, EditError> {
        match self {
            Self::Add { parent, node } => add_node(nodes, parent, node.clone()),
            Self::Delete { path } => Ok(delete_node(nodes, path)),
            Self::Update { path, patch } => update_node(nodes, path, patch),
            Self::Reorder { from, to } => Ok(reorder_top_level(nodes, *from, *to)),
        }
    }

    /// Apply to a copy, leaving `nodes` untouched
    ///
    /// # Errors
    /// Propagates validation errors from the underlying primitive
    pub fn applied(&self, nodes: &[PresetNode]) -> Result<(Vec<PresetNode>, EditOutcome), EditError> {
        let mut copy = nodes.to_vec();
        let outcome = self.apply(&mut copy)?;
        Ok((copy, outcome))
    }
}

impl Display for TreeEdit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add { parent, node } => write!(f, "add '{}' under '{}'", node.id, parent),
            Self::Delete { path } => write!(f, "delete '{path}'"),
            Self::Update { path, .. } => write!(f, "update '{path}'"),
            Self::Reorder { from, to } => write!(f, "reorder {from} -> {to}"),
        }
    }
}
