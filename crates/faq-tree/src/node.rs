//! Preset-answer nodes
//!
//! A [`PresetNode`] is either a branch (has children to pick from), an
//! answer leaf, or a title-only leaf whose label doubles as the answer.

use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

/// One option in a category's preset-answer tree
///
/// # Invariants
/// - `id` is unique among its siblings only
/// - `children` is never `Some` of an empty list; `"children": []` loads as
///   `None`
/// - `label` is non-empty after trimming when created through the edit API
/// - when both `children` (non-empty) and `answer` are set, `children` wins
///   and the answer stays latent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetNode {
    /// Sibling-unique id
    pub id: String,

    /// Display label
    pub label: String,

    /// Sub-options in display order
    #[serde(
        default,
        deserialize_with = "non_empty_children",
        skip_serializing_if = "Option::is_none"
    )]
    pub children: Option<Vec<PresetNode>>,

    /// Final answer text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

fn non_empty_children<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<PresetNode>>, D::Error> {
    let children = Option::<Vec<PresetNode>>::deserialize(deserializer)?;
    Ok(children.filter(|children| !children.is_empty()))
}

/// How a node behaves when selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Has at least one child; selecting it navigates
    Branch,
    /// No children, non-empty answer
    Answer,
    /// Neither children nor answer; selecting it echoes the label
    TitleOnly,
}

impl PresetNode {
    /// Create a title-only node
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            children: None,
            answer: None,
        }
    }

    /// Create a title-only node with a freshly generated id
    #[inline]
    #[must_use]
    pub fn draft(label: impl Into<String>) -> Self {
        Self::new(fresh_node_id(), label)
    }

    /// With answer text
    #[inline]
    #[must_use]
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// With child nodes (an empty list leaves `children` unset)
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<PresetNode>) -> Self {
        self.children = Some(children).filter(|children| !children.is_empty());
        self
    }

    /// Children that count for traversal (empty slice when absent)
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[PresetNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Check if the node has at least one child
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Answer text when the node is an answer leaf
    ///
    /// Returns `None` for branches even if an answer is staged on them.
    #[must_use]
    pub fn active_answer(&self) -> Option<&str> {
        if self.has_children() {
            return None;
        }
        self.answer
            .as_deref()
            .filter(|answer| !answer.trim().is_empty())
    }

    /// Classify the node
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        if self.has_children() {
            NodeKind::Branch
        } else if self.active_answer().is_some() {
            NodeKind::Answer
        } else {
            NodeKind::TitleOnly
        }
    }

    /// Check if the node is title-only
    #[inline]
    #[must_use]
    pub fn is_title_only(&self) -> bool {
        self.kind() == NodeKind::TitleOnly
    }

    /// Find a direct child by id
    #[inline]
    #[must_use]
    pub fn child(&self, id: &str) -> Option<&PresetNode> {
        self.children().iter().find(|child| child.id == id)
    }

    /// Single title-only child, if that is the node's only child
    ///
    /// Selecting such a node answers with the child's label right away.
    #[must_use]
    pub fn sole_title_only_child(&self) -> Option<&PresetNode> {
        match self.children() {
            [only] if only.is_title_only() => Some(only),
            _ => None,
        }
    }

    /// Total number of nodes in this subtree, including self
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(PresetNode::subtree_len)
            .sum::<usize>()
    }
}

/// Generate a fresh node id for admin-created options
///
/// Ids are `new-` followed by a lowercase ULID, so ids created later sort
/// after earlier ones.
#[must_use]
pub fn fresh_node_id() -> String {
    format!("new-{}", Ulid::new().to_string().to_lowercase())
}
