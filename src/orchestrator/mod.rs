//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责一次检查的整体调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用主流程
//! - 管理应用生命周期（初始化、运行、关闭浏览器）
//! - 计算统计期间、加载员工名册
//! - 筛选结果并交给输出层（CSV / 邮件）
//!
//! ### `extraction` - 浏览器部分
//! - 登录、打开菜单
//! - 按检查种类选择提取引擎
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行)
//!     ↓
//! extraction (登录 → 菜单 → 引擎)
//!     ↓
//! workflow::*Engine (员工 / 日期遍历)
//!     ↓
//! screens (画面导航)
//!     ↓
//! adapter (PageAdapter / ChromiumAdapter)
//! ```
//!
//! ## 设计原则
//!
//! 1. **资源隔离**：只有编排层持有浏览器会话
//! 2. **向下依赖**：编排层 → workflow → screens → adapter
//! 3. **无业务逻辑**：只做调度和输出，不做单元格级别的判断

pub mod app;
pub mod extraction;

pub use app::App;
pub use extraction::{extract_records, CheckRequest};
