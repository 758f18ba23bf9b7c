//! 错误类型
//!
//! 按关注点划分：配置 / 日历 / 期间 / 页面导航 / 员工名册 / 报告输出，
//! 统一由 [`AppError`] 包装。单日、单员工级别的"无数据"不走错误通道，
//! 见 [`crate::workflow::SkipSignal`]。

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::adapter::AdapterError;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 节假日日历错误
    #[error("日历错误: {0}")]
    Calendar(#[from] CalendarError),
    /// 统计期间错误
    #[error("期间错误: {0}")]
    Period(#[from] PeriodError),
    /// 必需的页面导航步骤失败
    #[error("导航错误: {0}")]
    Navigation(#[from] NavigationError),
    /// 员工名册错误
    #[error("员工名册错误: {0}")]
    Directory(#[from] DirectoryError),
    /// 报告输出错误
    #[error("报告输出错误: {0}")]
    Report(#[from] ReportError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 升级层级取值非法（只允许 -1 或非负整数）
    #[error("升级层级 {0} 非法，只允许 -1（无限）或非负整数")]
    InvalidEscalationLevel(i64),
    /// 其它字段校验失败
    #[error("配置项 {field} 非法: {reason}")]
    Invalid { field: String, reason: String },
}

/// 节假日日历错误
#[derive(Debug, Error)]
pub enum CalendarError {
    /// 节假日列表无法读取
    #[error("无法读取节假日列表 {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 节假日列表中存在无法解析的日期
    #[error("节假日列表第 {line} 行日期无法解析: '{value}'")]
    Malformed { line: usize, value: String },
    /// 回溯超过日历范围仍未找到营业日
    #[error("从 {from} 起回溯 {steps} 天仍未找到营业日，节假日列表可能有误")]
    LookbackExhausted { from: NaiveDate, steps: usize },
}

/// 统计期间错误
#[derive(Debug, Error)]
pub enum PeriodError {
    /// 未知的期间种类
    #[error("未知的期间种类: {0}")]
    InvalidPeriodKind(i64),
    /// 日期运算越界
    #[error("日期运算越界: {0}")]
    OutOfRange(NaiveDate),
}

/// 必需的导航步骤失败（致命，需要关闭会话）
#[derive(Debug, Error)]
pub enum NavigationError {
    /// 浏览器无法连接或启动
    #[error("浏览器不可用: {0}")]
    BrowserUnavailable(String),
    /// 目标站点维护中
    #[error("服务器维护中，处理中止 ({url})")]
    Maintenance { url: String },
    /// 登录失败
    #[error("登录失败 (公司: {company}, ID: {login_id})")]
    LoginFailed { company: String, login_id: String },
    /// 某个必需步骤失败
    #[error("步骤 '{step}' 失败: {source}")]
    Step {
        step: String,
        #[source]
        source: AdapterError,
    },
}

impl NavigationError {
    pub fn step(step: impl Into<String>, source: AdapterError) -> Self {
        NavigationError::Step {
            step: step.into(),
            source,
        }
    }
}

/// 员工名册错误
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// 名册文件读取失败
    #[error("无法读取员工名册 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 名册文件解析失败
    #[error("员工名册解析失败 {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 报告输出错误
#[derive(Debug, Error)]
pub enum ReportError {
    /// 文件写入失败
    #[error("写入文件失败 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// CSV 写入失败
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] csv::Error),
    /// 邮件地址非法
    #[error("邮件地址非法 '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    /// 附件无法读取或类型非法
    #[error("附件处理失败 {path}: {reason}")]
    Attachment { path: PathBuf, reason: String },
    /// 邮件构建失败
    #[error("邮件构建失败: {0}")]
    MessageBuild(#[from] lettre::error::Error),
    /// SMTP 发送失败
    #[error("SMTP 发送失败: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    /// 没有任何收件人
    #[error("没有任何收件人，邮件未发送")]
    NoRecipients,
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
