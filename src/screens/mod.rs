//! 考勤系统画面：元素位置与画面间的导航

pub mod layout;
pub mod navigation;

use std::time::Duration;

use crate::config::TimingSettings;

pub use navigation::{
    enumerate_employees, focus_content_frame, login, open_menu, select_all_employees,
    select_employee,
};

/// 等待参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Waits {
    /// 等待单个元素的超时
    pub element: Duration,
    /// 轮询间隔
    pub poll: Duration,
}

impl Waits {
    /// 只探测一次，不等待
    pub const PROBE: Duration = Duration::ZERO;

    pub fn new(element: Duration, poll: Duration) -> Self {
        Self { element, poll }
    }
}

impl From<&TimingSettings> for Waits {
    fn from(timing: &TimingSettings) -> Self {
        Self::new(timing.element_timeout(), timing.poll_interval())
    }
}
