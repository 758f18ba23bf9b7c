//! 报告记录
//!
//! 每个字段在生成记录时就确定了类型（日期 / 时长 / 计数 / 文本），
//! 输出端只调用 [`FieldValue::render`]。

use std::fmt;

use chrono::NaiveDate;

use super::WorkDuration;

const DATE_FORMAT: &str = "%Y/%m/%d";

/// 字段值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Date(NaiveDate),
    Duration(WorkDuration),
    Count(u32),
    Text(String),
}

impl FieldValue {
    /// 页面上读到的日期文字：能完整解析为 `YYYY/MM/DD` 时作为日期，否则原样保留
    pub fn date_or_text(raw: &str) -> Self {
        let raw = raw.trim();
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => FieldValue::Date(date),
            Err(_) => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn render(&self) -> String {
        match self {
            FieldValue::Date(date) => date.format(DATE_FORMAT).to_string(),
            FieldValue::Duration(duration) => duration.to_string(),
            FieldValue::Count(count) => count.to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// 一行报告：字段按插入顺序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRecord {
    employee_id: String,
    fields: Vec<(String, FieldValue)>,
}

impl ReportRecord {
    pub fn new(employee_id: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// 用于名册查询的员工编号（已规范化）
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn headers(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn rendered_values(&self) -> Vec<String> {
        self.fields.iter().map(|(_, value)| value.render()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }
}
