//! 员工名册
//!
//! `members.json` 以员工编号为键：
//!
//! ```json
//! { "123": { "mail": "a@example.com", "boss": "45,67", "ignore": "0" } }
//! ```
//!
//! `boss` 为逗号分隔的上级编号（空字符串表示没有上级），`ignore` 为 `"1"` 时不通知。

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::error::DirectoryError;
use crate::models::normalize_employee_id;

/// 名册中的一名员工
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryEntry {
    pub mail: String,
    #[serde(rename = "boss", default, deserialize_with = "boss_ids")]
    pub boss_ids: Vec<String>,
    #[serde(default, deserialize_with = "flag")]
    pub ignore: bool,
}

fn boss_ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split(',')
        .map(normalize_employee_id)
        .filter(|id| !id.is_empty())
        .collect())
}

/// `"0"` / `"1"`，也接受 JSON 数字与布尔值；其它值视为 `false`
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Int(n) => n == 1,
        Raw::Text(s) => s.trim() == "1",
    })
}

/// 员工名册（只读）
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: BTreeMap<String, DirectoryEntry>,
}

impl Directory {
    pub fn new(entries: impl IntoIterator<Item = (String, DirectoryEntry)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(id, entry)| (normalize_employee_id(&id), entry))
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let text = std::fs::read_to_string(path).map_err(|source| DirectoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = Self::from_json_str(&text).map_err(|source| DirectoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("✓ 已加载员工名册 {} 人 ({})", directory.len(), path.display());
        Ok(directory)
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        let entries: BTreeMap<String, DirectoryEntry> = serde_json::from_str(text)?;
        Ok(Self::new(entries))
    }

    /// 按员工编号查找（编号会先规范化）
    pub fn get(&self, employee_id: &str) -> Option<&DirectoryEntry> {
        self.entries.get(&normalize_employee_id(employee_id))
    }

    /// 标记为不通知的员工；名册中没有的员工不算
    pub fn is_ignored(&self, employee_id: &str) -> bool {
        self.get(employee_id).is_some_and(|e| e.ignore)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_members_file() {
        let text = r#"{
            "1":   { "mail": "ceo@example.com", "boss": "", "ignore": "0" },
            "010": { "mail": "a@example.com", "boss": "1, 002", "ignore": "1" },
            "2":   { "mail": "b@example.com", "boss": "1" }
        }"#;
        let directory = Directory::from_json_str(text).unwrap();
        assert_eq!(directory.len(), 3);

        let a = directory.get("10").unwrap();
        assert_eq!(a.boss_ids, vec!["1", "2"]);
        assert!(a.ignore);
        assert!(directory.is_ignored("0010"));

        assert!(directory.get("1").unwrap().boss_ids.is_empty());
        assert!(!directory.is_ignored("2"));
        assert!(!directory.is_ignored("999"));
    }

    #[test]
    fn test_flag_accepts_numbers_and_bools() {
        let text = r#"{
            "1": { "mail": "x@example.com", "boss": "", "ignore": 1 },
            "2": { "mail": "y@example.com", "boss": "", "ignore": false }
        }"#;
        let directory = Directory::from_json_str(text).unwrap();
        assert!(directory.is_ignored("1"));
        assert!(!directory.is_ignored("2"));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = Directory::load(Path::new("/nonexistent/members.json")).unwrap_err();
        assert!(matches!(err, DirectoryError::Read { .. }));
    }
}
