//! 单步结果
//!
//! "该员工/该日没有数据"是常见且预期的结果，用 [`StepOutcome::Skipped`] 返回，
//! 不走错误通道。只有会话级的问题（驱动断开、窗口/框架消失）才作为错误向上传递。

use std::fmt;

use chrono::NaiveDate;

use tracing::{error, warn};

use crate::adapter::AdapterError;

/// 跳过原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipSignal {
    /// 系统弹出对话框（通常表示无对象数据）
    NoData { message: String },
    /// 元素未出现 / 已失效
    Missing { detail: String },
    /// 多次滚动重读后仍为空白
    RenderLag { attempts: u32 },
    /// 单元格的值无法识别
    Unreadable { raw: String },
    /// 画面上的日期与预期不一致
    DateMismatch { expected: NaiveDate, rendered: String },
    /// 画面上显示的员工与选择的员工不一致
    EmployeeMismatch { expected: String, shown: String },
    /// 该月份无数据（切换月份时已确认）
    MonthUnavailable,
}

impl SkipSignal {
    /// 是否属于数据一致性问题（记为 error 而非 warn）
    pub fn is_integrity_issue(&self) -> bool {
        matches!(
            self,
            SkipSignal::DateMismatch { .. } | SkipSignal::EmployeeMismatch { .. }
        )
    }
}

impl fmt::Display for SkipSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipSignal::NoData { message } => write!(f, "无对象数据 ({})", message),
            SkipSignal::Missing { detail } => write!(f, "数据取得失败 ({})", detail),
            SkipSignal::RenderLag { attempts } => {
                write!(f, "重读 {} 次后仍未显示", attempts)
            }
            SkipSignal::Unreadable { raw } => write!(f, "无法识别的值 '{}'", raw),
            SkipSignal::DateMismatch { expected, rendered } => {
                write!(f, "日期不一致 (预期 {}, 画面 '{}')", expected, rendered)
            }
            SkipSignal::EmployeeMismatch { expected, shown } => {
                write!(f, "员工不一致 (选择 {}, 画面 '{}')", expected, shown)
            }
            SkipSignal::MonthUnavailable => write!(f, "该月无数据"),
        }
    }
}

/// 记录一次跳过：一致性问题记为 error，其余记为 warn
///
/// `scope` 需要能看出是哪位员工、哪一天。
pub fn log_skip(scope: impl fmt::Display, signal: &SkipSignal) {
    if signal.is_integrity_issue() {
        error!("{} ❌ 数据不一致，已排除: {}", scope, signal);
    } else {
        warn!("{} ⚠️ 跳过: {}", scope, signal);
    }
}

/// 单步结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Done(T),
    Skipped(SkipSignal),
}

impl<T> StepOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StepOutcome<U> {
        match self {
            StepOutcome::Done(value) => StepOutcome::Done(f(value)),
            StepOutcome::Skipped(signal) => StepOutcome::Skipped(signal),
        }
    }
}

/// 把适配层错误分为"跳过当前条目"与"中止"
pub fn classify(err: AdapterError) -> Result<SkipSignal, AdapterError> {
    match err {
        AdapterError::UnexpectedModalPresent { message } => Ok(SkipSignal::NoData { message }),
        e if e.is_local() => Ok(SkipSignal::Missing {
            detail: e.to_string(),
        }),
        e => Err(e),
    }
}

/// 必需步骤（员工列表、选择全员、期间输入、月份切换）的错误分类
///
/// 对话框表示"没有对象"，仍是跳过；超时等其余错误一律中止。
pub fn classify_required(err: AdapterError) -> Result<SkipSignal, AdapterError> {
    if err.is_modal() {
        classify(err)
    } else {
        Err(err)
    }
}

/// 把 `Result<T, AdapterError>` 转为单步结果
pub trait IntoStep<T> {
    fn into_step(self) -> Result<StepOutcome<T>, AdapterError>;

    /// 同 [`IntoStep::into_step`]，但只有对话框算作跳过
    fn into_required_step(self) -> Result<StepOutcome<T>, AdapterError>;
}

impl<T> IntoStep<T> for Result<T, AdapterError> {
    fn into_step(self) -> Result<StepOutcome<T>, AdapterError> {
        match self {
            Ok(value) => Ok(StepOutcome::Done(value)),
            Err(e) => classify(e).map(StepOutcome::Skipped),
        }
    }

    fn into_required_step(self) -> Result<StepOutcome<T>, AdapterError> {
        match self {
            Ok(value) => Ok(StepOutcome::Done(value)),
            Err(e) => classify_required(e).map(StepOutcome::Skipped),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::adapter::{Locator, Readiness, WindowHandle};

    #[test]
    fn test_modal_and_timeout_are_local_skips() {
        let modal = AdapterError::UnexpectedModalPresent {
            message: "該当者がいません".to_string(),
        };
        assert_eq!(
            classify(modal).unwrap(),
            SkipSignal::NoData {
                message: "該当者がいません".to_string()
            }
        );

        let timeout = AdapterError::ElementTimeout {
            locator: Locator::id("x"),
            condition: Readiness::Present,
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(classify(timeout), Ok(SkipSignal::Missing { .. })));
    }

    #[test]
    fn test_session_errors_are_fatal() {
        assert!(classify(AdapterError::Driver("closed".to_string())).is_err());
        assert!(classify(AdapterError::NoSuchWindow(WindowHandle::new("w"))).is_err());
        assert!(classify(AdapterError::NoSuchFrame { index: 1 }).is_err());
    }

    #[test]
    fn test_required_step_skips_only_on_modal() {
        let modal: Result<(), AdapterError> = Err(AdapterError::UnexpectedModalPresent {
            message: "対象者がいません".to_string(),
        });
        assert!(matches!(
            modal.into_required_step(),
            Ok(StepOutcome::Skipped(SkipSignal::NoData { .. }))
        ));

        let timeout: Result<(), AdapterError> = Err(AdapterError::ElementTimeout {
            locator: Locator::id("txtStart"),
            condition: Readiness::Present,
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(
            timeout.into_required_step(),
            Err(AdapterError::ElementTimeout { .. })
        ));
    }

    #[test]
    fn test_into_step() {
        let ok: Result<u32, AdapterError> = Ok(3);
        assert_eq!(ok.into_step().unwrap(), StepOutcome::Done(3));
    }
}
