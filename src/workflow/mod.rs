//! 数据提取流程
//!
//! - `employee_ctx` - 日志用的员工/日期上下文
//! - `outcome` - 单步结果与跳过原因
//! - `render` - 延迟渲染单元格的重读
//! - `overtime` / `stamp_miss` / `man_hour` - 三种检查的提取引擎

pub mod employee_ctx;
pub mod man_hour;
pub mod outcome;
pub mod overtime;
pub mod render;
pub mod stamp_miss;

pub use employee_ctx::{DayCtx, EmployeeCtx};
pub use man_hour::ManHourEngine;
pub use outcome::{classify, classify_required, log_skip, IntoStep, SkipSignal, StepOutcome};
pub use overtime::OvertimeEngine;
pub use render::{read_rendered, CellField};
pub use stamp_miss::StampMissEngine;
