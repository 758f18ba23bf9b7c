//! 程序配置
//!
//! 从 TOML 文件加载（缺省项使用默认值），再用环境变量覆盖密码与端口等。

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::calendar::PeriodKind;
use crate::directory::EscalationDepth;
use crate::error::ConfigError;

/// 程序配置文件
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub environment: EnvironmentSettings,
    pub site: SiteSettings,
    pub mail: MailSettings,
    pub modes: ModeTable,
    pub files: FileSettings,
    pub timing: TimingSettings,
}

/// 浏览器环境
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// 浏览器调试端口（连接已启动的浏览器时使用）
    pub browser_debug_port: u16,
    /// 自行启动浏览器，而不是连接已有的浏览器
    pub launch_browser: bool,
    /// 自行启动时是否无头
    pub headless: bool,
    /// 浏览器可执行文件，未指定时自动查找
    pub browser_executable: Option<PathBuf>,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            launch_browser: true,
            headless: true,
            browser_executable: None,
        }
    }
}

/// 考勤系统登录信息
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SiteSettings {
    pub url: String,
    pub company: String,
    pub login_id: String,
    pub password: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            url: "https://example.invalid/cws/cws".to_string(),
            company: String::new(),
            login_id: String::new(),
            password: String::new(),
        }
    }
}

/// 邮件发送
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    /// 邮件中附带 CSV 文件
    pub attach_csv: bool,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from: "noreply@gmail.com".to_string(),
            attach_csv: false,
        }
    }
}

/// 各检查模式的设置
#[derive(Clone, Debug)]
pub struct ModeSettings {
    /// 左侧菜单链接的 title
    pub menu_title: String,
    /// 邮件标题（后面会追加期间）
    pub mail_title: String,
    /// 邮件正文开头的说明文字
    pub mail_body: String,
    /// 抄送上级的层数，-1 表示一直到最上层
    pub escalation_level: i64,
    /// 发送邮件时只保留合计小时数不低于该值的员工（仅加班检查）
    pub overtime_threshold: u32,
}

impl ModeSettings {
    fn with_titles(menu_title: &str, mail_title: &str) -> Self {
        Self {
            menu_title: menu_title.to_string(),
            mail_title: mail_title.to_string(),
            mail_body: String::new(),
            escalation_level: -1,
            overtime_threshold: 0,
        }
    }

    pub fn escalation_depth(&self) -> Result<EscalationDepth, ConfigError> {
        EscalationDepth::try_from(self.escalation_level)
    }
}

/// 配置文件中某个模式段落实际写出的项
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModeOverrides {
    menu_title: Option<String>,
    mail_title: Option<String>,
    mail_body: Option<String>,
    escalation_level: Option<i64>,
    overtime_threshold: Option<u32>,
}

impl ModeOverrides {
    fn apply(self, base: ModeSettings) -> ModeSettings {
        ModeSettings {
            menu_title: self.menu_title.unwrap_or(base.menu_title),
            mail_title: self.mail_title.unwrap_or(base.mail_title),
            mail_body: self.mail_body.unwrap_or(base.mail_body),
            escalation_level: self.escalation_level.unwrap_or(base.escalation_level),
            overtime_threshold: self.overtime_threshold.unwrap_or(base.overtime_threshold),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawModeTable {
    overtime: ModeOverrides,
    stamp_miss: ModeOverrides,
    man_hour: ModeOverrides,
}

/// 三种检查模式的设置，未写出的项取各模式的默认值
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "RawModeTable")]
pub struct ModeTable {
    pub overtime: ModeSettings,
    pub stamp_miss: ModeSettings,
    pub man_hour: ModeSettings,
}

impl Default for ModeTable {
    fn default() -> Self {
        Self {
            overtime: ModeSettings {
                overtime_threshold: 30,
                ..ModeSettings::with_titles("就業週報月報", "【残業時間確認】")
            },
            stamp_miss: ModeSettings::with_titles("打ち忘れﾁｪｯｸﾘｽﾄ", "【打刻漏れ確認】"),
            man_hour: ModeSettings::with_titles("工数配分入力結果", "【工数登録確認】"),
        }
    }
}

impl From<RawModeTable> for ModeTable {
    fn from(raw: RawModeTable) -> Self {
        let defaults = ModeTable::default();
        Self {
            overtime: raw.overtime.apply(defaults.overtime),
            stamp_miss: raw.stamp_miss.apply(defaults.stamp_miss),
            man_hour: raw.man_hour.apply(defaults.man_hour),
        }
    }
}

impl ModeTable {
    pub fn get(&self, kind: PeriodKind) -> &ModeSettings {
        match kind {
            PeriodKind::Overtime => &self.overtime,
            PeriodKind::StampMiss => &self.stamp_miss,
            PeriodKind::ManHour => &self.man_hour,
        }
    }
}

/// 文件路径
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct FileSettings {
    /// 员工名册 (JSON)
    pub members: PathBuf,
    /// 节假日列表 (CSV)
    pub holidays: PathBuf,
    /// CSV 输出目录
    pub output_dir: PathBuf,
    /// 运行日志
    pub log_file: PathBuf,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            members: PathBuf::from("members.json"),
            holidays: PathBuf::from("syukujitsu.csv"),
            output_dir: PathBuf::from("."),
            log_file: PathBuf::from("atd_check.log"),
        }
    }
}

/// 等待与重试
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// 等待元素的超时（秒）
    pub element_timeout_secs: u64,
    /// 轮询间隔（毫秒）
    pub poll_interval_ms: u64,
    /// 单次 JS 执行的超时（秒）
    pub script_timeout_secs: u64,
    /// 单元格为空白时滚动重读的最大次数
    pub render_retry_limit: u32,
    /// 翻页与期间切换的最大次数（一览下一页、工时画面前后周）
    pub max_term_steps: u32,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            element_timeout_secs: 10,
            poll_interval_ms: 200,
            script_timeout_secs: 30,
            render_retry_limit: 5,
            max_term_steps: 60,
        }
    }
}

impl TimingSettings {
    pub fn element_timeout(&self) -> Duration {
        Duration::from_secs(self.element_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn script_timeout(&self) -> Duration {
        Duration::from_secs(self.script_timeout_secs)
    }
}

fn env_string(var_name: &str) -> Option<String> {
    std::env::var(var_name).ok().filter(|v| !v.is_empty())
}

fn env_parse<T: FromStr>(var_name: &str, expected_type: &str) -> Result<Option<T>, ConfigError> {
    match env_string(var_name) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}

impl Settings {
    /// 读取配置文件并应用环境变量
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = settings.with_env_overrides()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// 用环境变量覆盖部分设置
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(port) = env_parse("BROWSER_DEBUG_PORT", "u16")? {
            self.environment.browser_debug_port = port;
        }
        if let Some(launch) = env_parse("ATD_LAUNCH_BROWSER", "bool")? {
            self.environment.launch_browser = launch;
        }
        if let Some(headless) = env_parse("ATD_HEADLESS", "bool")? {
            self.environment.headless = headless;
        }
        if let Some(path) = env_string("ATD_BROWSER_EXECUTABLE") {
            self.environment.browser_executable = Some(PathBuf::from(path));
        }
        if let Some(url) = env_string("ATD_SITE_URL") {
            self.site.url = url;
        }
        if let Some(password) = env_string("ATD_SITE_PASSWORD") {
            self.site.password = password;
        }
        if let Some(password) = env_string("ATD_SMTP_PASSWORD") {
            self.mail.password = password;
        }
        if let Some(timeout) = env_parse("ATD_ELEMENT_TIMEOUT_SECS", "u64")? {
            self.timing.element_timeout_secs = timeout;
        }
        Ok(self)
    }

    /// 启动前的校验
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in [PeriodKind::Overtime, PeriodKind::StampMiss, PeriodKind::ManHour] {
            let mode = self.modes.get(kind);
            mode.escalation_depth()?;
            if mode.menu_title.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field: format!("modes.{}.menu_title", kind.key()),
                    reason: "不能为空".to_string(),
                });
            }
        }
        if self.site.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "site.url".to_string(),
                reason: "不能为空".to_string(),
            });
        }
        if self.timing.element_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.element_timeout_secs".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.poll_interval_ms".to_string(),
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }
}
