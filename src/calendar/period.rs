//! 统计期间计算
//!
//! - 加班（20 日截止）：21 日开始，次月 20 日结束，取基准日时最近一个已截止的周期
//! - 打卡遗漏 / 工时分配：自然月，取基准日所在的月份
//!
//! 基准日 = 执行日前一天；启用节假日跳过时继续回溯到最近的营业日。

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::{debug, info};

use super::Calendar;
use crate::error::{AppError, CalendarError, PeriodError};

/// 期间种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    /// 加班时间（20 日截止）
    Overtime,
    /// 打卡遗漏（自然月）
    StampMiss,
    /// 工时分配（自然月）
    ManHour,
}

impl PeriodKind {
    /// 旧版命令行使用的编号 (1/2/3)
    pub fn code(self) -> u8 {
        match self {
            PeriodKind::Overtime => 1,
            PeriodKind::StampMiss => 2,
            PeriodKind::ManHour => 3,
        }
    }

    /// 配置文件中的段落名
    pub fn key(self) -> &'static str {
        match self {
            PeriodKind::Overtime => "overtime",
            PeriodKind::StampMiss => "stamp_miss",
            PeriodKind::ManHour => "man_hour",
        }
    }

    /// 期间开始日
    pub fn opening_day(self) -> u32 {
        match self {
            PeriodKind::Overtime => 21,
            PeriodKind::StampMiss | PeriodKind::ManHour => 1,
        }
    }
}

impl TryFrom<i64> for PeriodKind {
    type Error = PeriodError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PeriodKind::Overtime),
            2 => Ok(PeriodKind::StampMiss),
            3 => Ok(PeriodKind::ManHour),
            other => Err(PeriodError::InvalidPeriodKind(other)),
        }
    }
}

/// 统计期间（闭区间）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportingPeriod {
    /// `start > end` 时返回 `None`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 期间内的每一天
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

fn minus_days(date: NaiveDate, n: u64) -> Result<NaiveDate, PeriodError> {
    date.checked_sub_days(Days::new(n))
        .ok_or(PeriodError::OutOfRange(date))
}

fn plus_days(date: NaiveDate, n: u64) -> Result<NaiveDate, PeriodError> {
    date.checked_add_days(Days::new(n))
        .ok_or(PeriodError::OutOfRange(date))
}

fn day_of_month(date: NaiveDate, day: u32) -> Result<NaiveDate, PeriodError> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), day).ok_or(PeriodError::OutOfRange(date))
}

/// 包含 `date` 的、以 `opening_day` 开始的一个月窗口
fn window_containing(
    date: NaiveDate,
    opening_day: u32,
) -> Result<(NaiveDate, NaiveDate), PeriodError> {
    if date.day() < opening_day {
        let end = minus_days(day_of_month(date, opening_day)?, 1)?;
        let start = end
            .checked_sub_months(Months::new(1))
            .ok_or(PeriodError::OutOfRange(end))
            .and_then(|d| plus_days(d, 1))?;
        Ok((start, end))
    } else {
        let start = day_of_month(date, opening_day)?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(PeriodError::OutOfRange(start))
            .and_then(|d| minus_days(d, 1))?;
        Ok((start, end))
    }
}

/// 期间计算器
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver<'a> {
    calendar: &'a Calendar,
    skip_non_business_days: bool,
}

impl<'a> PeriodResolver<'a> {
    pub fn new(calendar: &'a Calendar, skip_non_business_days: bool) -> Self {
        Self {
            calendar,
            skip_non_business_days,
        }
    }

    /// 最近的检查对象日：前一天，或（跳过节假日时）前一天起最近的营业日
    pub fn resolve_recent_business_date(
        &self,
        reference: NaiveDate,
    ) -> Result<NaiveDate, AppError> {
        let mut date = minus_days(reference, 1)?;
        if !self.skip_non_business_days {
            return Ok(date);
        }

        let limit = self.calendar.lookback_limit();
        let mut steps = 0;
        while self.calendar.is_non_business_day(date) {
            steps += 1;
            if steps > limit {
                return Err(CalendarError::LookbackExhausted {
                    from: reference,
                    steps,
                }
                .into());
            }
            debug!("{} 为非营业日，继续回溯", date);
            date = minus_days(date, 1)?;
        }
        Ok(date)
    }

    /// 计算统计期间
    pub fn resolve_span(
        &self,
        reference: NaiveDate,
        kind: PeriodKind,
    ) -> Result<ReportingPeriod, AppError> {
        let base = self.resolve_recent_business_date(reference)?;

        let (start, end) = match kind {
            // 取包含次日的周期的前一个周期，即截至基准日已经截止的最近周期
            PeriodKind::Overtime => {
                let (current_start, _) =
                    window_containing(plus_days(base, 1)?, kind.opening_day())?;
                let start = current_start
                    .checked_sub_months(Months::new(1))
                    .ok_or(PeriodError::OutOfRange(current_start))?;
                (start, minus_days(current_start, 1)?)
            }
            PeriodKind::StampMiss | PeriodKind::ManHour => {
                window_containing(base, kind.opening_day())?
            }
        };

        let period = ReportingPeriod::new(start, end).ok_or(PeriodError::OutOfRange(start))?;
        info!(
            "统计期间: {} (种类 {}, 基准日 {})",
            period,
            kind.code(),
            base
        );
        Ok(period)
    }
}
