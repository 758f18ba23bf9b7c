//! 命令行参数

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, ValueEnum};

use crate::calendar::PeriodKind;
use crate::models::EmployeeFilter;

/// 检查种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// 残业时间
    #[value(alias = "1")]
    Overtime,
    /// 打卡遗漏
    #[value(alias = "2")]
    StampMiss,
    /// 工时登录
    #[value(alias = "3")]
    ManHour,
}

impl Mode {
    pub fn period_kind(self) -> PeriodKind {
        match self {
            Mode::Overtime => PeriodKind::Overtime,
            Mode::StampMiss => PeriodKind::StampMiss,
            Mode::ManHour => PeriodKind::ManHour,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Overtime => write!(f, "残業時間"),
            Mode::StampMiss => write!(f, "打ち忘れ"),
            Mode::ManHour => write!(f, "工数登録"),
        }
    }
}

/// 输出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Output {
    /// 发送邮件
    #[value(alias = "1")]
    Mail,
    /// 输出 CSV 文件
    #[value(alias = "2")]
    Csv,
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Mail => write!(f, "メール送信"),
            Output::Csv => write!(f, "CSVファイル出力"),
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|e| format!("日期需要 YYYYMMDD 格式 ({}): {}", value, e))
}

/// 考勤系统检查工具
#[derive(Debug, Clone, Parser)]
#[command(name = "atd_check", version, about)]
pub struct Cli {
    /// 检查种类 (overtime|stamp-miss|man-hour，或 1/2/3)
    #[arg(short, long, value_enum)]
    pub mode: Mode,

    /// 输出方式 (mail|csv，或 1/2)
    #[arg(short, long, value_enum)]
    pub output: Output,

    /// 假定在该日执行 (YYYYMMDD)，缺省为今天
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// 土日祝日不执行，期间计算也跳过非营业日
    #[arg(short = 'e', long)]
    pub exholiday: bool,

    /// 只检查指定的员工编号（逗号分隔）
    #[arg(long, value_delimiter = ',')]
    pub employees: Vec<String>,

    /// 配置文件
    #[arg(short, long, default_value = "setting.toml")]
    pub config: PathBuf,
}

impl Cli {
    /// 执行日
    pub fn reference_date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// 员工筛选；未指定（或只给了空白）时为全员
    pub fn employee_filter(&self) -> EmployeeFilter {
        let ids: Vec<&str> = self
            .employees
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        if ids.is_empty() {
            EmployeeFilter::all()
        } else {
            EmployeeFilter::only(ids)
        }
    }
}
