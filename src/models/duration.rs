use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// 经过时长（时:分）
///
/// 分钟始终在 `0..60`，超出部分进位到小时；小时可以超过 24。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkDuration {
    hours: u32,
    minutes: u32,
}

impl WorkDuration {
    pub const ZERO: WorkDuration = WorkDuration {
        hours: 0,
        minutes: 0,
    };

    pub fn new(hours: u32, minutes: u32) -> Self {
        Self {
            hours: hours + minutes / 60,
            minutes: minutes % 60,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn total_minutes(&self) -> u64 {
        u64::from(self.hours) * 60 + u64::from(self.minutes)
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }

    /// 解析 `H:MM` / `HH:MM`
    pub fn parse(raw: &str) -> Option<Self> {
        let (h, m) = raw.trim().split_once(':')?;
        let h = h.trim();
        let m = m.trim();
        if h.is_empty() || m.is_empty() {
            return None;
        }
        if !h.chars().all(|c| c.is_ascii_digit()) || !m.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self::new(h.parse().ok()?, m.parse().ok()?))
    }
}

impl Add for WorkDuration {
    type Output = WorkDuration;

    fn add(self, rhs: WorkDuration) -> WorkDuration {
        WorkDuration::new(self.hours + rhs.hours, self.minutes + rhs.minutes)
    }
}

impl AddAssign for WorkDuration {
    fn add_assign(&mut self, rhs: WorkDuration) {
        *self = *self + rhs;
    }
}

impl Sum for WorkDuration {
    fn sum<I: Iterator<Item = WorkDuration>>(iter: I) -> Self {
        iter.fold(WorkDuration::ZERO, Add::add)
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}
