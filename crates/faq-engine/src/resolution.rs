//! Resolution results and the pure classification step

use faq_tree::{walk, NodeKind, PresetNode, SelectionPath, TreePosition};
use serde::{Deserialize, Serialize};

/// One selectable option as shown to the end user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionView {
    /// Node id to append to the path when selected
    pub id: String,
    /// Display label
    pub label: String,
    /// What selecting it will do
    pub kind: NodeKind,
}

impl From<&PresetNode> for OptionView {
    fn from(node: &PresetNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            kind: node.kind(),
        }
    }
}

/// What the chat should show for a category and path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Resolution {
    /// The path ends on an answer leaf
    Answer {
        /// Label of the answered option
        label: String,
        /// Answer text
        text: String,
    },
    /// Options to pick from
    Options {
        /// Options in display order
        options: Vec<OptionView>,
    },
    /// The path ends on a title-only leaf: speak the label, then pop one level
    LeafEcho {
        /// Label to echo as the answer
        label: String,
    },
    /// Nothing to show
    Empty,
}

impl Resolution {
    /// Check for the empty state
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Option labels, empty unless this is an options list
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Self::Options { options } => options.iter().map(|o| o.label.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Result of selecting a displayed option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectOutcome {
    /// The option's id was appended to the path
    Advanced {
        /// New path
        path: SelectionPath,
        /// Resolution at the new path
        resolution: Resolution,
    },
    /// A label is spoken as the answer and the path stays put
    Echo {
        /// Label to echo
        label: String,
        /// Unchanged path
        path: SelectionPath,
    },
    /// The option or path no longer exists; the caller should clear the path
    Reset,
}

/// Classify `path` against a category's top-level nodes
///
/// A node with children is an options list even if it carries an answer.
#[must_use]
pub fn classify(nodes: &[PresetNode], path: &SelectionPath) -> Resolution {
    let Some(position) = walk(nodes, path) else {
        return Resolution::Empty;
    };
    match position {
        TreePosition::Sequence(items) if items.is_empty() => Resolution::Empty,
        TreePosition::Sequence(items) => options(items),
        TreePosition::Node(node) => match node.kind() {
            NodeKind::Branch => options(node.children()),
            NodeKind::Answer => Resolution::Answer {
                label: node.label.clone(),
                text: node.active_answer().unwrap_or_default().to_string(),
            },
            NodeKind::TitleOnly => Resolution::LeafEcho {
                label: node.label.clone(),
            },
        },
    }
}

fn options(nodes: &[PresetNode]) -> Resolution {
    Resolution::Options {
        options: nodes.iter().map(OptionView::from).collect(),
    }
}

/// Select `option_id` below `path`
///
/// Title-only options echo their own label. An option whose only child is
/// title-only echoes that child's label instead of navigating. In both cases
/// the path does not advance.
#[must_use]
pub fn select_in(nodes: &[PresetNode], path: &SelectionPath, option_id: &str) -> SelectOutcome {
    let Some(option) = walk(nodes, path)
        .and_then(|position| position.descend(option_id))
        .and_then(|position| position.node())
    else {
        return SelectOutcome::Reset;
    };

    if option.is_title_only() {
        return SelectOutcome::Echo {
            label: option.label.clone(),
            path: path.clone(),
        };
    }
    if let Some(only) = option.sole_title_only_child() {
        return SelectOutcome::Echo {
            label: only.label.clone(),
            path: path.clone(),
        };
    }

    let next = path.child(option_id);
    SelectOutcome::Advanced {
        resolution: classify(nodes, &next),
        path: next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_test_utils::sample_forest;
    use pretty_assertions::assert_eq;

    fn support() -> Vec<PresetNode> {
        sample_forest().get("support").unwrap().to_vec()
    }

    #[test]
    fn root_lists_options() {
        let resolution = classify(&support(), &SelectionPath::root());
        assert_eq!(resolution.labels(), vec!["Staged", "Collapse", "Title only", "Answer"]);
    }

    #[test]
    fn empty_top_level_is_empty() {
        assert_eq!(classify(&[], &SelectionPath::root()), Resolution::Empty);
    }

    #[test]
    fn children_beat_answer() {
        let resolution = classify(&support(), &SelectionPath::single("both"));
        assert_eq!(resolution.labels(), vec!["X", "Y"]);
    }

    #[test]
    fn answer_leaf() {
        let resolution = classify(&support(), &SelectionPath::single("answer"));
        assert_eq!(
            resolution,
            Resolution::Answer {
                label: "Answer".into(),
                text: "the answer".into()
            }
        );
    }

    #[test]
    fn title_only_is_leaf_echo() {
        let resolution = classify(&support(), &SelectionPath::single("title"));
        assert_eq!(resolution, Resolution::LeafEcho { label: "Title only".into() });
    }

    #[test]
    fn broken_path_is_empty() {
        assert!(classify(&support(), &SelectionPath::from(["both", "zzz"])).is_empty());
    }

    #[test]
    fn select_collapses_single_title_only_child() {
        let outcome = select_in(&support(), &SelectionPath::root(), "collapse");
        assert_eq!(
            outcome,
            SelectOutcome::Echo {
                label: "Call the office".into(),
                path: SelectionPath::root()
            }
        );
    }

    #[test]
    fn select_title_only_echoes() {
        let outcome = select_in(&support(), &SelectionPath::root(), "title");
        assert!(matches!(outcome, SelectOutcome::Echo { label, path } if label == "Title only" && path.is_empty()));
    }

    #[test]
    fn select_advances() {
        let outcome = select_in(&support(), &SelectionPath::single("both"), "x");
        assert_eq!(
            outcome,
            SelectOutcome::Advanced {
                path: SelectionPath::from(["both", "x"]),
                resolution: Resolution::Answer {
                    label: "X".into(),
                    text: "x answer".into()
                }
            }
        );
    }

    #[test]
    fn select_unknown_resets() {
        assert_eq!(select_in(&support(), &SelectionPath::root(), "nope"), SelectOutcome::Reset);
        assert_eq!(
            select_in(&support(), &SelectionPath::single("gone"), "x"),
            SelectOutcome::Reset
        );
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(Resolution::LeafEcho { label: "L".into() }).unwrap();
        assert_eq!(json, serde_json::json!({"state": "leaf_echo", "label": "L"}));
    }
}
