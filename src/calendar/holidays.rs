//! 营业日判定
//!
//! 周六、周日固定为非营业日；其余节假日来自政府公布的节假日 CSV
//! （每行 `日期,名称`，日期形如 `2024/1/1`，首行为表头）。

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::{debug, info};

use crate::error::CalendarError;

const DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%Y-%m-%d"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim().trim_start_matches('\u{feff}');
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// 节假日日历
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    holidays: BTreeSet<NaiveDate>,
}

impl Calendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// 只有周末的日历
    pub fn weekends_only() -> Self {
        Self::default()
    }

    /// 从节假日 CSV 文件加载
    ///
    /// 官方文件为 Shift_JIS 编码。只使用日期列（ASCII），按 UTF-8 宽松解码，
    /// 名称列会变成替换字符并被丢弃，不会出现在日历或日志中。
    pub fn load(path: &Path) -> Result<Self, CalendarError> {
        let bytes = std::fs::read(path).map_err(|e| CalendarError::Load {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        let text = String::from_utf8_lossy(&bytes);
        let calendar = Self::from_csv_text(&text).map_err(|e| match e {
            CalendarError::Load { source, .. } => CalendarError::Load {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            "✓ 已加载节假日 {} 天 ({})",
            calendar.holidays.len(),
            path.display()
        );
        Ok(calendar)
    }

    /// 解析节假日 CSV 文本
    pub fn from_csv_text(text: &str) -> Result<Self, CalendarError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        let mut holidays = BTreeSet::new();
        for (index, record) in reader.records().enumerate() {
            let line = index + 1;
            let record = record.map_err(|e| CalendarError::Load {
                path: Default::default(),
                source: Box::new(e),
            })?;
            let Some(raw) = record.get(0) else {
                continue;
            };
            if raw.trim().is_empty() {
                continue;
            }
            match parse_date(raw) {
                Some(date) => {
                    holidays.insert(date);
                }
                // 表头
                None if line == 1 => debug!("跳过节假日列表表头: {}", raw),
                None => {
                    return Err(CalendarError::Malformed {
                        line,
                        value: raw.to_string(),
                    })
                }
            }
        }
        Ok(Self { holidays })
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// 是否为列表中的节假日（精确匹配日期）
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    /// 周末或节假日
    pub fn is_non_business_day(&self, date: NaiveDate) -> bool {
        Self::is_weekend(date) || self.is_holiday(date)
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    /// 连续非营业日的理论上限，超过即说明列表有误
    pub fn lookback_limit(&self) -> usize {
        2 * self.holidays.len() + 7
    }
}
