//! 数据模型
//!
//! - `duration` - 经过时长 (HH:MM)
//! - `record` - 输出记录与带类型的字段值
//! - `overtime` - 加班类别、单日记录、员工汇总
//! - `anomaly` - 打卡遗漏 / 工时不一致明细行
//! - `employee` - 员工编号与筛选

pub mod anomaly;
pub mod duration;
pub mod employee;
pub mod overtime;
pub mod record;

pub use anomaly::{ManHourMismatchRow, StampMissRow};
pub use duration::WorkDuration;
pub use employee::{normalize_employee_id, EmployeeFilter, EmployeeRef};
pub use overtime::{
    CellValue, DailyTimeRecord, EmployeeAggregate, FinalizedAggregate, OvertimeCategory,
};
pub use record::{FieldValue, ReportRecord};
