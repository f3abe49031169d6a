//! Staff contacts offered when no answer is available
//!
//! Each default category has a fixed contact. The contact document can
//! override it with a `### <category label>` section holding either a
//! `| name | position | extension | duty |` table or `담당자:` and
//! `내선번호:` lines.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Main office number every extension hangs off
pub const MAIN_PHONE: &str = "02-6410-5000";

/// Office hours line appended to contact messages
pub const OFFICE_HOURS: &str = "업무 시간: 평일 09:00 ~ 18:00";

/// Escalation line appended to contact messages
pub const URGENT_CONTACT: &str = "긴급 문의: 김남헌 팀장 (02-6410-5000 내선 7385)";

static TEXT_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"담당자[：:]\s*([^\n|]+)").expect("name pattern compiles"));
static TEXT_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"내선번호[：:]\s*([^\n|]+)").expect("extension pattern compiles"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern compiles"));

/// Who to call about a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    /// Category id, `None` for the general contact
    pub category: Option<String>,
    /// Names with positions, comma separated
    pub name: String,
    /// Main number with extensions
    pub phone: String,
    /// Optional email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactInfo {
    fn new<I, S>(category: Option<&str>, name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            category: category.map(str::to_string),
            name: name.into(),
            phone: format_extensions(extensions),
            email: None,
        }
    }

    /// Chat message presenting this contact
    #[must_use]
    pub fn message(&self) -> String {
        let email = self
            .email
            .as_deref()
            .map(|email| format!("\n이메일: {email}"))
            .unwrap_or_default();
        format!(
            "📞 담당자 연락처\n\n{}\n{}{email}\n\n{OFFICE_HOURS}\n{URGENT_CONTACT}",
            self.name, self.phone
        )
    }
}

impl Display for ContactInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.phone)
    }
}

/// Format extensions after the main number: `02-6410-5000(내선 7258, 7439)`
pub fn format_extensions<I, S>(extensions: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let list = extensions
        .into_iter()
        .map(|ext| ext.as_ref().replace("내선", "").trim().to_string())
        .filter(|ext| !ext.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    format!("{MAIN_PHONE}(내선 {list})")
}

/// Heading label used for `category` in the contact document
#[must_use]
pub fn section_label(category: &str) -> Option<&'static str> {
    match category {
        "support" => Some("지원금"),
        "campus" => Some("금융캠퍼스"),
        "appointment" => Some("위촉"),
        _ => None,
    }
}

/// Built-in contact for `category`
///
/// Unknown categories and `None` get the general contact.
#[must_use]
pub fn default_contact(category: Option<&str>) -> ContactInfo {
    match category {
        Some("support") => ContactInfo::new(category, "조준승 차장, 서미해 대리", ["7258", "7439"]),
        Some("campus") => ContactInfo::new(category, "고현진 과장", ["7380"]),
        Some("appointment") => ContactInfo::new(category, "안다솜 과장, 백현정 부장", ["7821", "7490"]),
        _ => ContactInfo::new(None, "김남헌 팀장", ["7385"]),
    }
}

/// Contact for `category` from the contact document, else the built-in one
#[must_use]
pub fn extract_from_document(content: &str, category: Option<&str>) -> ContactInfo {
    let Some(id) = category else {
        return default_contact(None);
    };
    let Some(section) = section_label(id).and_then(|label| find_section(content, label)) else {
        return default_contact(category);
    };
    from_table(section, id)
        .or_else(|| from_text(section, id))
        .unwrap_or_else(|| default_contact(category))
}

/// Body of the first `###` heading mentioning `label`, up to the next heading
fn find_section<'c>(content: &'c str, label: &str) -> Option<&'c str> {
    let heading = Regex::new(&format!(r"(?i)###[ \t]+[^\n]*{}[^\n]*\n", regex::escape(label))).ok()?;
    let start = heading.find(content)?.end();
    let body = &content[start..];
    Some(body.find("##").map_or(body, |end| &body[..end]))
}

fn from_table(section: &str, category: &str) -> Option<ContactInfo> {
    let rows: Vec<Vec<&str>> = section
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('|'))
        .map(|line| line.split('|').map(str::trim).filter(|cell| !cell.is_empty()).collect())
        .collect();
    if rows.len() < 2 {
        return None;
    }

    let mut names = Vec::new();
    let mut extensions = Vec::new();
    for cells in rows.iter().skip(1).filter(|cells| cells.len() >= 3) {
        let (name, position, extension) = (cells[0], cells[1], cells[2]);
        if name.contains("이름") || extension.contains("내선번호") || is_rule(name) {
            continue;
        }
        names.push(format!("{name} {position}"));
        let digits: String = extension.chars().filter(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            extensions.push(digits);
        }
    }

    (!names.is_empty() && !extensions.is_empty())
        .then(|| ContactInfo::new(Some(category), names.join(", "), extensions))
}

fn from_text(section: &str, category: &str) -> Option<ContactInfo> {
    let name = TEXT_NAME.captures(section)?.get(1)?.as_str().trim();
    let extensions = TEXT_EXTENSION.captures(section)?.get(1)?.as_str();
    let digits: Vec<&str> = DIGITS.find_iter(extensions).map(|m| m.as_str()).collect();
    (!name.is_empty() && !digits.is_empty()).then(|| ContactInfo::new(Some(category), name, digits))
}

fn is_rule(cell: &str) -> bool {
    cell.chars().all(|c| matches!(c, '-' | ':' | ' '))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "\
# 연락처

## 담당자 안내

### 💰 지원금 문의
| 이름 | 직급 | 내선번호 | 담당업무 |
|------|------|----------|----------|
| 홍길동 | 차장 | 내선 1234 | 지원금 심사 |
| 김철수 | 대리 | 5678 | 지급 |

### 🏫 금융캠퍼스 문의
담당자: 이영희 과장
내선번호: 2222, 3333

### 📋 위촉 문의
준비 중입니다.
";

    #[test]
    fn formats_extensions() {
        assert_eq!(format_extensions(["7258", "7439"]), "02-6410-5000(내선 7258, 7439)");
        assert_eq!(format_extensions(["내선 7380", " "]), "02-6410-5000(내선 7380)");
    }

    #[test]
    fn defaults() {
        assert_eq!(default_contact(Some("campus")).phone, "02-6410-5000(내선 7380)");
        let general = default_contact(None);
        assert_eq!(general.name, "김남헌 팀장");
        assert_eq!(default_contact(Some("custom-1")), general);
    }

    #[test]
    fn table_section() {
        let contact = extract_from_document(DOC, Some("support"));
        assert_eq!(contact.name, "홍길동 차장, 김철수 대리");
        assert_eq!(contact.phone, "02-6410-5000(내선 1234, 5678)");
        assert_eq!(contact.category.as_deref(), Some("support"));
    }

    #[test]
    fn text_section() {
        let contact = extract_from_document(DOC, Some("campus"));
        assert_eq!(contact.name, "이영희 과장");
        assert_eq!(contact.phone, "02-6410-5000(내선 2222, 3333)");
    }

    #[test]
    fn falls_back_to_default() {
        assert_eq!(extract_from_document(DOC, Some("appointment")), default_contact(Some("appointment")));
        assert_eq!(extract_from_document("", Some("support")), default_contact(Some("support")));
        assert_eq!(extract_from_document(DOC, None), default_contact(None));
    }

    #[test]
    fn message_layout() {
        let message = default_contact(Some("campus")).message();
        assert!(message.starts_with("📞 담당자 연락처\n\n고현진 과장\n02-6410-5000(내선 7380)\n\n"));
        assert!(message.ends_with(URGENT_CONTACT));
    }
}
