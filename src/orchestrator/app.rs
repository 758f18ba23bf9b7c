//! 应用主流程 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：加载配置、启动日志、读取节假日列表
//! 2. **执行判断**：`--exholiday` 时非营业日直接结束
//! 3. **会话管理**：启动或连接浏览器，任何退出路径都会关闭会话
//! 4. **结果输出**：忽略名单筛选后输出 CSV 或发送邮件，结果为空时什么都不输出

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{error, info, warn};

use super::extraction::{extract_records, CheckRequest};
use crate::adapter::{ChromiumAdapter, PageAdapter};
use crate::browser;
use crate::calendar::{Calendar, PeriodResolver};
use crate::cli::{Cli, Output};
use crate::config::Settings;
use crate::directory::{expand_recipients, Directory};
use crate::error::{AppError, NavigationError};
use crate::models::ReportRecord;
use crate::report::{
    compose_body, compose_subject, drop_ignored, output_file_name, write_csv, Mailer,
    OutgoingMail,
};
use crate::utils::logging::{init_logging, log_startup, print_final_stats};

/// `--exholiday` 且基准日为非营业日时整个运行不执行
fn skips_for_holiday(exholiday: bool, calendar: &Calendar, reference: NaiveDate) -> bool {
    exholiday && calendar.is_non_business_day(reference)
}

/// 去掉忽略名单中的员工；结果为空时返回 `None`，不输出任何东西
fn deliverable(records: Vec<ReportRecord>, directory: &Directory) -> Option<Vec<ReportRecord>> {
    let records = drop_ignored(records, directory);
    (!records.is_empty()).then_some(records)
}

/// 应用主结构
pub struct App {
    cli: Cli,
    settings: Settings,
    calendar: Calendar,
}

impl App {
    /// 初始化应用
    pub fn initialize(cli: Cli) -> Result<Self> {
        let settings = Settings::load(&cli.config)
            .with_context(|| format!("加载配置失败: {}", cli.config.display()))?;

        init_logging(&settings.files.log_file)?;
        log_startup(&cli.mode.to_string(), &cli.output.to_string());

        let calendar = Calendar::load(&settings.files.holidays).map_err(AppError::from)?;
        info!("✓ 节假日列表: {} 天", calendar.len());

        Ok(Self {
            cli,
            settings,
            calendar,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let reference = self.cli.reference_date();
        if skips_for_holiday(self.cli.exholiday, &self.calendar, reference) {
            info!("📅 {} 为土日祝日，不执行检查", reference);
            print_final_stats(0, None, &self.settings.files.log_file);
            return Ok(());
        }

        let kind = self.cli.mode.period_kind();
        let period = PeriodResolver::new(&self.calendar, self.cli.exholiday)
            .resolve_span(reference, kind)?;
        let directory = Directory::load(&self.settings.files.members).map_err(AppError::from)?;
        info!("✓ 员工名册: {} 人", directory.len());

        let request = CheckRequest {
            kind,
            period,
            filter: self.cli.employee_filter(),
            threshold_hours: match self.cli.output {
                Output::Mail => self.settings.modes.get(kind).overtime_threshold,
                Output::Csv => 0,
            },
        };

        let mut adapter = self.open_session().await?;
        let extracted = extract_records(&mut adapter, &self.settings, &request).await;
        if let Err(e) = adapter.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        let records = extracted.map_err(|e| {
            error!("❌ {}", e);
            AppError::from(e)
        })?;

        let Some(records) = deliverable(records, &directory) else {
            info!("💤 没有需要通知的结果");
            print_final_stats(0, None, &self.settings.files.log_file);
            return Ok(());
        };

        let delivered = match self.cli.output {
            Output::Csv => self.write_report(&request, &records)?.display().to_string(),
            Output::Mail => self.send_report(&request, &records, &directory).await?,
        };
        print_final_stats(
            records.len(),
            Some(&delivered),
            &self.settings.files.log_file,
        );
        Ok(())
    }

    /// 启动或连接浏览器
    async fn open_session(&self) -> Result<ChromiumAdapter, AppError> {
        let env = &self.settings.environment;
        let url = &self.settings.site.url;
        let opened = if env.launch_browser {
            browser::launch_headless_browser(url, env.browser_executable.as_deref(), env.headless)
                .await
        } else {
            browser::connect_to_browser_and_page(env.browser_debug_port, url).await
        };
        let (browser, page) =
            opened.map_err(|e| NavigationError::BrowserUnavailable(e.to_string()))?;

        let timing = &self.settings.timing;
        let adapter = ChromiumAdapter::new(
            browser,
            page,
            timing.poll_interval(),
            timing.script_timeout(),
        )
        .await
        .map_err(|e| NavigationError::step("初始化页面适配器", e))?;
        Ok(adapter)
    }

    fn write_report(
        &self,
        request: &CheckRequest,
        records: &[ReportRecord],
    ) -> Result<PathBuf, AppError> {
        let now = chrono::Local::now().naive_local();
        let file_name = output_file_name(request.kind, &request.period, now);
        let path = write_csv(&self.settings.files.output_dir, &file_name, records)?;
        info!("💾 已写出 {}", path.display());
        Ok(path)
    }

    async fn send_report(
        &self,
        request: &CheckRequest,
        records: &[ReportRecord],
        directory: &Directory,
    ) -> Result<String, AppError> {
        let mode = self.settings.modes.get(request.kind);
        let depth = mode.escalation_depth()?;
        let recipients = expand_recipients(
            records.iter().map(ReportRecord::employee_id),
            directory,
            depth,
        );
        if !recipients.misses.is_empty() {
            warn!("名册中找不到 {} 个编号，见上方日志", recipients.misses.len());
        }

        let attachment = if self.settings.mail.attach_csv {
            Some(self.write_report(request, records)?)
        } else {
            None
        };

        let mail = OutgoingMail {
            subject: compose_subject(&mode.mail_title, &request.period),
            body: compose_body(&mode.mail_body, records),
            recipients,
            attachment,
        };
        Mailer::new(self.settings.mail.clone()).send(&mail).await?;

        Ok(format!(
            "邮件 '{}' ({} 个收件地址)",
            mail.subject,
            mail.recipients.all_addresses().len()
        ))
    }
}
