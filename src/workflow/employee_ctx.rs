//! 员工处理上下文
//!
//! 封装"我正在检查哪位员工的哪一天"这一信息，用于日志前缀。

use std::fmt::Display;

use chrono::NaiveDate;

use crate::models::EmployeeRef;

/// 员工处理上下文
#[derive(Debug, Clone)]
pub struct EmployeeCtx {
    /// 员工编号（规范化后）
    pub employee_id: String,

    /// 显示名称
    pub name: String,

    /// 员工序号（从1开始，仅用于日志显示）
    pub index: usize,

    /// 员工总数
    pub total: usize,
}

impl EmployeeCtx {
    pub fn new(employee: &EmployeeRef, index: usize, total: usize) -> Self {
        Self {
            employee_id: employee.id(),
            name: employee.name.clone(),
            index,
            total,
        }
    }

    /// 带日期的日志前缀
    pub fn on(&self, date: NaiveDate) -> DayCtx<'_> {
        DayCtx { employee: self, date }
    }
}

impl Display for EmployeeCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[员工 {} {}]", self.employee_id, self.name)
    }
}

/// 员工 + 日期
#[derive(Debug, Clone, Copy)]
pub struct DayCtx<'a> {
    employee: &'a EmployeeCtx,
    date: NaiveDate,
}

impl Display for DayCtx<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[员工 {} {}][{}]",
            self.employee.employee_id, self.employee.name, self.date
        )
    }
}
