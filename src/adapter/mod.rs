//! 页面适配层
//!
//! 提取引擎只通过 [`PageAdapter`] 与浏览器交互：
//! 定位 / 等待 / 读取 / 点击 / 切换框架与窗口。
//!
//! - `session` - 会话焦点（窗口、框架路径、当前显示月份）
//! - `script` - 生成在页面中执行的 JS 片段
//! - `chromium` - 基于 chromiumoxide 的实现

pub mod chromium;
pub mod script;
pub mod session;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use chromium::ChromiumAdapter;
pub use session::{DisplayedMonth, SessionContext, WindowHandle, YearMonth};

/// 元素定位方式
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// 按 id 属性
    Id(String),
    /// 按 name 属性（取第一个）
    Name(String),
    /// 按 XPath 结构路径
    XPath(String),
    /// 按链接的 title 属性
    LinkTitle(String),
    /// 按链接文字
    LinkText(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn name(value: impl Into<String>) -> Self {
        Locator::Name(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    pub fn link_title(value: impl Into<String>) -> Self {
        Locator::LinkTitle(value.into())
    }

    pub fn link_text(value: impl Into<String>) -> Self {
        Locator::LinkText(value.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(v) => write!(f, "id={}", v),
            Locator::Name(v) => write!(f, "name={}", v),
            Locator::XPath(v) => write!(f, "xpath={}", v),
            Locator::LinkTitle(v) => write!(f, "link[title={}]", v),
            Locator::LinkText(v) => write!(f, "link[text={}]", v),
        }
    }
}

/// 就绪条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// 元素存在于文档中
    Present,
    /// 元素可见且未被禁用
    Clickable,
    /// 下拉框已有选中项
    OptionSelected,
    /// 元素文字包含指定内容
    TextPresent(String),
    /// 元素可见
    Visible,
    /// 元素是已加载完成的子框架
    FrameReady,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readiness::Present => write!(f, "present"),
            Readiness::Clickable => write!(f, "clickable"),
            Readiness::OptionSelected => write!(f, "option-selected"),
            Readiness::TextPresent(text) => write!(f, "text-present({})", text),
            Readiness::Visible => write!(f, "visible"),
            Readiness::FrameReady => write!(f, "frame-ready"),
        }
    }
}

/// 已定位的元素
///
/// 只记录"在哪个窗口、哪个框架里、用什么方式找到"，
/// 每次操作时重新解析，焦点改变后再使用会得到 [`AdapterError::StaleElement`]。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementHandle {
    locator: Locator,
    window: WindowHandle,
    frame_path: Vec<usize>,
}

impl ElementHandle {
    pub fn new(locator: Locator, window: WindowHandle, frame_path: Vec<usize>) -> Self {
        Self {
            locator,
            window,
            frame_path,
        }
    }

    /// 在当前会话焦点下创建句柄
    pub fn in_session(locator: Locator, session: &SessionContext) -> Self {
        Self::new(
            locator,
            session.window().clone(),
            session.frame_path().to_vec(),
        )
    }

    pub fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn window(&self) -> &WindowHandle {
        &self.window
    }

    pub fn frame_path(&self) -> &[usize] {
        &self.frame_path
    }
}

/// 下拉框选项
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

/// 适配层错误
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// 等待超时
    #[error("等待元素超时 ({locator}, {condition}, {timeout:?})")]
    ElementTimeout {
        locator: Locator,
        condition: Readiness,
        timeout: Duration,
    },
    /// 出现了未预期的对话框（通常表示该员工/期间无数据）
    #[error("出现意外的对话框: {message}")]
    UnexpectedModalPresent { message: String },
    /// 元素已不在原位置
    #[error("元素已失效: {locator}")]
    StaleElement { locator: Locator },
    /// 下拉框中没有指定的选项
    #[error("下拉框 {locator} 中没有选项 '{value}'")]
    NoSuchOption { locator: Locator, value: String },
    /// 框架不存在
    #[error("当前文档中没有第 {index} 个框架")]
    NoSuchFrame { index: usize },
    /// 窗口不存在
    #[error("窗口不存在: {0}")]
    NoSuchWindow(WindowHandle),
    /// 浏览器驱动本身出错
    #[error("浏览器驱动错误: {0}")]
    Driver(String),
}

impl AdapterError {
    /// 是否为对话框信号
    pub fn is_modal(&self) -> bool {
        matches!(self, AdapterError::UnexpectedModalPresent { .. })
    }

    /// 是否只影响当前条目（而不是整个会话）
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AdapterError::ElementTimeout { .. }
                | AdapterError::UnexpectedModalPresent { .. }
                | AdapterError::StaleElement { .. }
                | AdapterError::NoSuchOption { .. }
        )
    }
}

/// 页面操作能力
///
/// 所有方法都基于 [`SessionContext`] 中记录的当前窗口与框架；
/// 任何方法都可能返回 [`AdapterError::UnexpectedModalPresent`]。
#[async_trait]
pub trait PageAdapter: Send {
    fn session(&self) -> &SessionContext;

    fn session_mut(&mut self) -> &mut SessionContext;

    /// 当前窗口导航到 URL，焦点回到顶层文档
    async fn goto(&mut self, url: &str) -> Result<(), AdapterError>;

    /// 当前窗口标题
    async fn title(&mut self) -> Result<String, AdapterError>;

    /// 等待元素满足条件，超时返回 [`AdapterError::ElementTimeout`]
    async fn await_and_locate(
        &mut self,
        locator: &Locator,
        condition: &Readiness,
        timeout: Duration,
    ) -> Result<ElementHandle, AdapterError>;

    /// 元素的可见文字（去除首尾空白）
    async fn read(&mut self, handle: &ElementHandle) -> Result<String, AdapterError>;

    /// 元素属性，不存在时返回 `None`
    async fn read_attribute(
        &mut self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, AdapterError>;

    /// 下拉框的全部选项
    async fn list_options(
        &mut self,
        handle: &ElementHandle,
    ) -> Result<Vec<SelectOption>, AdapterError>;

    async fn click(&mut self, handle: &ElementHandle) -> Result<(), AdapterError>;

    async fn select_option(
        &mut self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<(), AdapterError>;

    async fn clear(&mut self, handle: &ElementHandle) -> Result<(), AdapterError>;

    async fn type_text(&mut self, handle: &ElementHandle, text: &str) -> Result<(), AdapterError>;

    async fn scroll_into_view(&mut self, handle: &ElementHandle) -> Result<(), AdapterError>;

    /// 进入当前文档的第 `index` 个子框架
    async fn switch_to_frame(&mut self, index: usize) -> Result<(), AdapterError>;

    /// 回到上一级框架，已在顶层时不变
    async fn switch_to_parent_frame(&mut self) -> Result<(), AdapterError> {
        self.session_mut().leave_frame();
        Ok(())
    }

    /// 回到当前窗口的顶层文档
    async fn switch_to_default_content(&mut self) -> Result<(), AdapterError> {
        self.session_mut().reset_frames();
        Ok(())
    }

    /// 切换到指定窗口，焦点回到该窗口顶层文档
    async fn switch_to_window(&mut self, handle: &WindowHandle) -> Result<(), AdapterError>;

    async fn list_window_handles(&mut self) -> Result<Vec<WindowHandle>, AdapterError>;

    /// 结束会话
    async fn close(&mut self) -> Result<(), AdapterError>;
}
