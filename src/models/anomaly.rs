//! 异常明细行
//!
//! 打卡遗漏与工时分配不一致都按"每个异常一行"输出，不做按员工的汇总。

use chrono::NaiveDate;

use super::{normalize_employee_id, FieldValue, ReportRecord};

/// 打卡遗漏一览中的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StampMissRow {
    pub employee_id: String,
    pub name: String,
    pub target_date: FieldValue,
    pub detail: String,
}

impl StampMissRow {
    pub fn new(
        employee_id: impl Into<String>,
        name: impl Into<String>,
        raw_date: &str,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            target_date: FieldValue::date_or_text(raw_date),
            detail: detail.into(),
        }
    }

    pub fn into_record(self) -> ReportRecord {
        ReportRecord::new(normalize_employee_id(&self.employee_id))
            .with_field("社員番号", FieldValue::Text(self.employee_id))
            .with_field("氏名", FieldValue::Text(self.name))
            .with_field("対象日", self.target_date)
            .with_field("メッセージ項目1", FieldValue::Text(self.detail))
    }
}

/// 工时分配中"就业时间"与"合计"不一致的一天
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManHourMismatchRow {
    pub employee_id: String,
    pub name: String,
    pub target_date: NaiveDate,
    pub working: String,
    pub allocated: String,
}

impl ManHourMismatchRow {
    pub fn new(
        employee_id: impl Into<String>,
        name: impl Into<String>,
        target_date: NaiveDate,
        working: impl Into<String>,
        allocated: impl Into<String>,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            name: name.into(),
            target_date,
            working: working.into(),
            allocated: allocated.into(),
        }
    }

    pub fn detail(&self) -> String {
        format!("就業時間 {} / 合計 {}", self.working, self.allocated)
    }

    pub fn into_record(self) -> ReportRecord {
        ReportRecord::new(normalize_employee_id(&self.employee_id))
            .with_field("氏名", FieldValue::Text(self.name))
            .with_field("社員番号", FieldValue::Text(self.employee_id))
            .with_field("日付", FieldValue::Date(self.target_date))
            .with_field("就業時間", FieldValue::Text(self.working))
            .with_field("合計", FieldValue::Text(self.allocated))
    }
}
