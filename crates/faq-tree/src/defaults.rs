//! Compiled-in default forest
//!
//! Used when no source provides data for a category. Every default category
//! has three options (`A`, `B`, `C`) with three answered children each.

use crate::forest::Forest;
use crate::node::PresetNode;

/// Category ids that ship with a default tree
pub const DEFAULT_CATEGORY_IDS: [&str; 3] = ["support", "campus", "appointment"];

const OPTION_IDS: [&str; 3] = ["A", "B", "C"];
const CHILD_IDS: [&str; 3] = ["가", "나", "다"];

/// (category, answer prefix, detail item counts per option and child)
const SEEDS: [(&str, &str, [[usize; 3]; 3]); 3] = [
    ("support", "지원금", [[3, 2, 3], [2, 3, 1], [3, 2, 3]]),
    ("campus", "금융캠퍼스", [[2, 3, 1], [3, 2, 3], [1, 3, 2]]),
    ("appointment", "위촉", [[3, 2, 3], [1, 3, 2], [3, 1, 3]]),
];

/// Seeded answer text for a default leaf
#[must_use]
pub fn seeded_answer(prefix: &str, option: &str, child: &str, items: usize) -> String {
    let details: String = (1..=items).map(|n| format!("\n- 항목 {n}")).collect();
    format!("{prefix} {option} 옵션의 \"{child}\"에 대한 답변입니다.\n\n상세 내용:{details}")
}

fn seeded_category(prefix: &str, counts: &[[usize; 3]; 3]) -> Vec<PresetNode> {
    OPTION_IDS
        .iter()
        .zip(counts)
        .map(|(option, items)| {
            let children = CHILD_IDS
                .iter()
                .zip(items)
                .map(|(child, &n)| {
                    PresetNode::new(*child, *child).with_answer(seeded_answer(prefix, option, child, n))
                })
                .collect();
            PresetNode::new(*option, format!("{option} 옵션")).with_children(children)
        })
        .collect()
}

/// Build the default forest
#[must_use]
pub fn default_forest() -> Forest {
    SEEDS
        .iter()
        .map(|(category, prefix, counts)| ((*category).to_string(), seeded_category(prefix, counts)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::find_node;
    use crate::path::SelectionPath;

    #[test]
    fn default_categories_present() {
        let forest = default_forest();
        assert_eq!(forest.keys().collect::<Vec<_>>(), DEFAULT_CATEGORY_IDS.to_vec());
        for category in DEFAULT_CATEGORY_IDS {
            let labels: Vec<_> = forest.get(category).unwrap().iter().map(|n| n.label.as_str()).collect();
            assert_eq!(labels, vec!["A 옵션", "B 옵션", "C 옵션"]);
        }
        assert_eq!(forest.node_count(), 3 * 3 * 4);
    }

    #[test]
    fn seeded_answer_text() {
        let forest = default_forest();
        let node = find_node(forest.get("support").unwrap(), &SelectionPath::from(["A", "가"])).unwrap();
        assert_eq!(
            node.active_answer(),
            Some("지원금 A 옵션의 \"가\"에 대한 답변입니다.\n\n상세 내용:\n- 항목 1\n- 항목 2\n- 항목 3")
        );

        let node = find_node(forest.get("campus").unwrap(), &SelectionPath::from(["C", "가"])).unwrap();
        assert_eq!(
            node.active_answer(),
            Some("금융캠퍼스 C 옵션의 \"가\"에 대한 답변입니다.\n\n상세 내용:\n- 항목 1")
        );
    }
}
