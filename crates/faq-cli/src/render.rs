//! Plain-text and JSON output

use faq_category::CategoryRecord;
use faq_engine::{AssistOutcome, OptionView, Resolution, SelectOutcome};
use faq_tree::{NodeKind, SelectionPath};
use serde::Serialize;
use std::fmt::Write as _;

/// Print `value` as pretty JSON, or `text` otherwise
pub(crate) fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn option_line(out: &mut String, option: &OptionView) {
    let marker = match option.kind {
        NodeKind::Branch => "+",
        NodeKind::Answer => "=",
        NodeKind::TitleOnly => "-",
    };
    let _ = writeln!(out, "  {marker} [{}] {}", option.id, option.label);
}

pub(crate) fn resolution(path: &SelectionPath, breadcrumb: &[String], resolution: &Resolution) -> String {
    let mut out = String::new();
    if !path.is_empty() {
        let _ = writeln!(out, "{}", breadcrumb.join(" > "));
    }
    match resolution {
        Resolution::Answer { label, text } => {
            let _ = write!(out, "{label}\n\n{text}");
        }
        Resolution::Options { options } => {
            out.push_str("Options:\n");
            for option in options {
                option_line(&mut out, option);
            }
        }
        Resolution::LeafEcho { label } => out.push_str(label),
        Resolution::Empty => out.push_str("(no options)"),
    }
    out.trim_end().to_string()
}

pub(crate) fn select_outcome(outcome: &SelectOutcome) -> String {
    match outcome {
        SelectOutcome::Advanced { path, resolution: next } => {
            format!("path: {path}\n{}", resolution(&SelectionPath::root(), &[], next))
        }
        SelectOutcome::Echo { label, path } => format!("{label}\n(path stays at '{path}')"),
        SelectOutcome::Reset => "option not found; start over from the top".to_string(),
    }
}

pub(crate) fn categories(records: &[CategoryRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{} {:<12} {} - {}", r.emoji, r.id, r.label, r.description))
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn assist(outcome: &AssistOutcome) -> String {
    match outcome {
        AssistOutcome::Answered { answer } => answer.trim().to_string(),
        AssistOutcome::Escalate { message, contact } => format!("{message}\n\n{}", contact.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faq_category::default_categories;
    use pretty_assertions::assert_eq;

    #[test]
    fn options_listing() {
        let text = resolution(
            &SelectionPath::root(),
            &[],
            &Resolution::Options {
                options: vec![
                    OptionView {
                        id: "A".into(),
                        label: "A 옵션".into(),
                        kind: NodeKind::Branch,
                    },
                    OptionView {
                        id: "t".into(),
                        label: "Title".into(),
                        kind: NodeKind::TitleOnly,
                    },
                ],
            },
        );
        assert_eq!(text, "Options:\n  + [A] A 옵션\n  - [t] Title");
    }

    #[test]
    fn answer_with_breadcrumb() {
        let text = resolution(
            &SelectionPath::from(["A", "가"]),
            &["A 옵션".to_string(), "가".to_string()],
            &Resolution::Answer {
                label: "가".into(),
                text: "답변".into(),
            },
        );
        assert_eq!(text, "A 옵션 > 가\n가\n\n답변");
    }

    #[test]
    fn empty_and_reset() {
        assert_eq!(resolution(&SelectionPath::root(), &[], &Resolution::Empty), "(no options)");
        assert!(select_outcome(&SelectOutcome::Reset).contains("start over"));
    }

    #[test]
    fn category_lines() {
        let text = categories(&default_categories());
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("💰 support"));
    }
}
