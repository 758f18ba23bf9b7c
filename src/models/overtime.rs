//! 加班时间汇总
//!
//! 月报中每一天有四个加班类别单元格，值为 `H:MM` 或空标记 `----`（零）。
//! [`EmployeeAggregate`] 在遍历期间逐日累加，结束时 [`EmployeeAggregate::finalize`]
//! 生成不可变的 [`ReportRecord`]。

use std::fmt;

use chrono::NaiveDate;

use super::{normalize_employee_id, FieldValue, ReportRecord, WorkDuration};

/// 零时长的显示标记
pub const EMPTY_SENTINEL: &str = "----";

pub const FIELD_NAME: &str = "氏名";
pub const FIELD_EMPLOYEE_ID: &str = "社員番号";
pub const FIELD_TOTAL: &str = "残業合計";
pub const FIELD_WORKED_DAYS: &str = "出勤日数";

/// 加班类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OvertimeCategory {
    /// 法定外勤务
    StatutoryExcess,
    /// 深夜加班
    LateNight,
    /// 休息日勤务
    HolidayWork,
    /// 休息日深夜
    HolidayLateNight,
}

impl OvertimeCategory {
    pub const ALL: [OvertimeCategory; 4] = [
        OvertimeCategory::StatutoryExcess,
        OvertimeCategory::LateNight,
        OvertimeCategory::HolidayWork,
        OvertimeCategory::HolidayLateNight,
    ];

    /// 报告中的列名
    pub fn label(self) -> &'static str {
        match self {
            OvertimeCategory::StatutoryExcess => "法定外勤",
            OvertimeCategory::LateNight => "深夜残業",
            OvertimeCategory::HolidayWork => "休日勤務",
            OvertimeCategory::HolidayLateNight => "休日深夜",
        }
    }

    fn index(self) -> usize {
        match self {
            OvertimeCategory::StatutoryExcess => 0,
            OvertimeCategory::LateNight => 1,
            OvertimeCategory::HolidayWork => 2,
            OvertimeCategory::HolidayLateNight => 3,
        }
    }
}

impl fmt::Display for OvertimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 单元格的值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellValue {
    /// 空标记，等同于 00:00
    Sentinel,
    /// 有记录的时长（可能为 00:00）
    Recorded(WorkDuration),
}

impl CellValue {
    /// 解析单元格原始值
    ///
    /// 空白字符串返回 `None`（尚未渲染，不能当作零），无法识别的值同样返回 `None`。
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw == EMPTY_SENTINEL {
            return Some(CellValue::Sentinel);
        }
        WorkDuration::parse(raw).map(CellValue::Recorded)
    }

    pub fn duration(&self) -> WorkDuration {
        match self {
            CellValue::Sentinel => WorkDuration::ZERO,
            CellValue::Recorded(duration) => *duration,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, CellValue::Sentinel)
    }
}

/// 一天的加班记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTimeRecord {
    date: NaiveDate,
    values: [CellValue; 4],
}

impl DailyTimeRecord {
    /// `values` 按 [`OvertimeCategory::ALL`] 的顺序排列
    pub fn new(date: NaiveDate, values: [CellValue; 4]) -> Self {
        Self { date, values }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn value(&self, category: OvertimeCategory) -> CellValue {
        self.values[category.index()]
    }

    /// 四个类别之和
    pub fn total(&self) -> WorkDuration {
        self.values.iter().map(CellValue::duration).sum()
    }

    /// 至少有一个类别不是空标记
    pub fn has_work(&self) -> bool {
        self.values.iter().any(|v| !v.is_sentinel())
    }
}

/// 员工在统计期间内的加班汇总（构建中）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeAggregate {
    employee_id: String,
    display_name: String,
    per_category: [WorkDuration; 4],
    grand_total: WorkDuration,
    worked_days: u32,
}

impl EmployeeAggregate {
    pub fn new(employee_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            employee_id: employee_id.into(),
            display_name: display_name.into(),
            per_category: [WorkDuration::ZERO; 4],
            grand_total: WorkDuration::ZERO,
            worked_days: 0,
        }
    }

    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// 累加一天
    pub fn apply(&mut self, day: &DailyTimeRecord) {
        for category in OvertimeCategory::ALL {
            self.per_category[category.index()] += day.value(category).duration();
        }
        self.grand_total += day.total();
        if day.has_work() {
            self.worked_days += 1;
        }
    }

    pub fn category_total(&self, category: OvertimeCategory) -> WorkDuration {
        self.per_category[category.index()]
    }

    pub fn grand_total(&self) -> WorkDuration {
        self.grand_total
    }

    pub fn worked_days(&self) -> u32 {
        self.worked_days
    }

    /// 结束累加，生成报告记录
    pub fn finalize(self) -> FinalizedAggregate {
        let mut record = ReportRecord::new(normalize_employee_id(&self.employee_id))
            .with_field(FIELD_NAME, FieldValue::Text(self.display_name))
            .with_field(FIELD_EMPLOYEE_ID, FieldValue::Text(self.employee_id));
        for category in OvertimeCategory::ALL {
            record = record.with_field(
                category.label(),
                FieldValue::Duration(self.per_category[category.index()]),
            );
        }
        let record = record
            .with_field(FIELD_TOTAL, FieldValue::Duration(self.grand_total))
            .with_field(FIELD_WORKED_DAYS, FieldValue::Count(self.worked_days));

        FinalizedAggregate {
            record,
            grand_total: self.grand_total,
        }
    }
}

/// 已完成的汇总：报告记录与用于阈值判断的合计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedAggregate {
    pub record: ReportRecord,
    pub grand_total: WorkDuration,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(h: u32, m: u32) -> CellValue {
        CellValue::Recorded(WorkDuration::new(h, m))
    }

    #[test]
    fn test_cell_parse_distinguishes_sentinel_from_blank() {
        assert_eq!(CellValue::parse("----"), Some(CellValue::Sentinel));
        assert_eq!(CellValue::parse(" 1:30 "), Some(rec(1, 30)));
        assert_eq!(CellValue::parse(""), None);
        assert_eq!(CellValue::parse("   "), None);
        assert_eq!(CellValue::parse("abc"), None);
    }

    #[test]
    fn test_aggregate_accumulates_with_carry() {
        let mut agg = EmployeeAggregate::new("000123", "山田 太郎");
        agg.apply(&DailyTimeRecord::new(
            ymd(2024, 3, 1),
            [rec(22, 50), CellValue::Sentinel, CellValue::Sentinel, CellValue::Sentinel],
        ));
        agg.apply(&DailyTimeRecord::new(
            ymd(2024, 3, 2),
            [rec(2, 20), rec(0, 15), CellValue::Sentinel, CellValue::Sentinel],
        ));
        agg.apply(&DailyTimeRecord::new(ymd(2024, 3, 3), [CellValue::Sentinel; 4]));

        assert_eq!(agg.category_total(OvertimeCategory::StatutoryExcess).to_string(), "25:10");
        assert_eq!(agg.grand_total().to_string(), "25:25");
        assert_eq!(agg.worked_days(), 2);

        let finalized = agg.finalize();
        assert_eq!(finalized.record.employee_id(), "123");
        assert_eq!(
            finalized.record.headers(),
            vec![
                "氏名",
                "社員番号",
                "法定外勤",
                "深夜残業",
                "休日勤務",
                "休日深夜",
                "残業合計",
                "出勤日数"
            ]
        );
        assert_eq!(
            finalized.record.rendered_values(),
            vec!["山田 太郎", "000123", "25:10", "00:15", "00:00", "00:00", "25:25", "2"]
        );
    }

    #[test]
    fn test_all_sentinel_aggregate_is_zero_not_missing() {
        let mut agg = EmployeeAggregate::new("7", "佐藤");
        for day in 1..=5 {
            agg.apply(&DailyTimeRecord::new(ymd(2024, 3, day), [CellValue::Sentinel; 4]));
        }
        let finalized = agg.finalize();
        assert!(finalized.grand_total.is_zero());
        assert_eq!(finalized.record.get(FIELD_TOTAL).unwrap().render(), "00:00");
        assert_eq!(finalized.record.get(FIELD_WORKED_DAYS), Some(&FieldValue::Count(0)));
    }

    #[test]
    fn test_explicit_zero_counts_as_worked_day() {
        let day = DailyTimeRecord::new(
            ymd(2024, 3, 4),
            [rec(0, 0), CellValue::Sentinel, CellValue::Sentinel, CellValue::Sentinel],
        );
        assert!(day.has_work());
        assert!(day.total().is_zero());
    }
}
