//! 会话上下文
//!
//! 浏览器会话中唯一的可变共享状态：当前窗口、框架路径、月报当前显示月份。

use std::fmt;

use chrono::{Datelike, NaiveDate};

/// 窗口句柄
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(String);

impl WindowHandle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 年月
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 月份下拉框的选项值 (`YYYYMM`)
    pub fn option_value(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// 月报画面当前显示的月份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayedMonth {
    /// 未知（刚切换员工或刚进入画面）
    #[default]
    Unknown,
    /// 正在显示
    Showing(YearMonth),
    /// 该月切换时弹出了对话框，当前员工在该月无数据
    Unavailable(YearMonth),
}

/// 会话焦点
#[derive(Debug, Clone)]
pub struct SessionContext {
    main_window: WindowHandle,
    window: WindowHandle,
    frame_path: Vec<usize>,
    displayed_month: DisplayedMonth,
}

impl SessionContext {
    pub fn new(main_window: WindowHandle) -> Self {
        Self {
            window: main_window.clone(),
            main_window,
            frame_path: Vec::new(),
            displayed_month: DisplayedMonth::Unknown,
        }
    }

    /// 登录后的主窗口
    pub fn main_window(&self) -> &WindowHandle {
        &self.main_window
    }

    pub fn window(&self) -> &WindowHandle {
        &self.window
    }

    pub fn frame_path(&self) -> &[usize] {
        &self.frame_path
    }

    pub fn displayed_month(&self) -> DisplayedMonth {
        self.displayed_month
    }

    pub fn set_displayed_month(&mut self, month: DisplayedMonth) {
        self.displayed_month = month;
    }

    pub fn enter_frame(&mut self, index: usize) {
        self.frame_path.push(index);
    }

    pub fn leave_frame(&mut self) {
        self.frame_path.pop();
    }

    pub fn reset_frames(&mut self) {
        self.frame_path.clear();
    }

    /// 切换窗口后焦点总是回到顶层文档
    pub fn enter_window(&mut self, window: WindowHandle) {
        self.window = window;
        self.frame_path.clear();
    }

    pub fn in_main_window(&self) -> bool {
        self.window == self.main_window
    }
}
