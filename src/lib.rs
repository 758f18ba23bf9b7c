//! # atd_check
//!
//! 考勤系统检查工具：从浏览器渲染的考勤系统中提取加班时间、打卡遗漏、
//! 工时分配不一致，按员工名册通知本人与上级
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure / Adapter）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露 eval() 能力
//! - `adapter/` - `PageAdapter`：定位 / 等待 / 读取 / 点击 / 切换框架与窗口；
//!   `SessionContext` 记录当前焦点与显示月份
//! - `browser/` - 连接已启动的浏览器或启动无头浏览器
//!
//! ### ② 领域层（Domain）
//! - `calendar/` - 营业日判断与统计期间计算
//! - `models/` - 时长、加班汇总、异常行、输出记录
//! - `directory/` - 员工名册与上级通知对象展开
//!
//! ### ③ 流程层（Workflow）
//! - `screens/` - 画面元素位置与画面间导航
//! - `workflow/` - 三种检查的提取引擎（员工 → 月份 → 日期）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 一次运行：期间计算 → 提取 → 筛选 → 输出
//! - `report/` - 阈值 / 忽略名单筛选、CSV、邮件
//!
//! ## 模块结构

pub mod adapter;
pub mod browser;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod directory;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod screens;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use adapter::{ChromiumAdapter, PageAdapter, SessionContext};
pub use calendar::{Calendar, PeriodKind, PeriodResolver, ReportingPeriod};
pub use cli::Cli;
pub use config::Settings;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use orchestrator::{extract_records, App, CheckRequest};
pub use workflow::{ManHourEngine, OvertimeEngine, SkipSignal, StampMissEngine, StepOutcome};
