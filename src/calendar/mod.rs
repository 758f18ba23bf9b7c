//! 营业日历与统计期间

pub mod holidays;
pub mod period;

pub use holidays::Calendar;
pub use period::{PeriodKind, PeriodResolver, ReportingPeriod};
