//! 加班时间提取
//!
//! 状态迁移：选择员工 → 切换月份 → 读取当日单元格 →（下一天 | 下一月 | 员工结束）
//! → 下一位员工 | 结束。
//!
//! 员工列表在开始前一次性从个人选择窗口取得（可按编号筛选），
//! 下一位员工由列表决定，而不是依赖画面上的"下一人"按钮。

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use super::render::{read_rendered, CellField};
use super::{log_skip, EmployeeCtx, IntoStep, SkipSignal, StepOutcome};
use crate::adapter::{AdapterError, DisplayedMonth, Locator, PageAdapter, Readiness, YearMonth};
use crate::calendar::ReportingPeriod;
use crate::error::NavigationError;
use crate::models::{
    normalize_employee_id, CellValue, DailyTimeRecord, EmployeeAggregate, EmployeeFilter,
    EmployeeRef, FinalizedAggregate, OvertimeCategory,
};
use crate::screens::layout::{self, monthly};
use crate::screens::{enumerate_employees, focus_content_frame, select_employee, Waits};

/// 切换月份的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonthState {
    Ready,
    Unavailable,
}

/// 加班时间提取引擎
pub struct OvertimeEngine<'a, A: PageAdapter + ?Sized> {
    adapter: &'a mut A,
    period: ReportingPeriod,
    waits: Waits,
    render_retry_limit: u32,
}

impl<'a, A: PageAdapter + ?Sized> OvertimeEngine<'a, A> {
    pub fn new(
        adapter: &'a mut A,
        period: ReportingPeriod,
        waits: Waits,
        render_retry_limit: u32,
    ) -> Self {
        Self {
            adapter,
            period,
            waits,
            render_retry_limit,
        }
    }

    /// 对全部（或筛选后的）员工汇总期间内的加班时间
    pub async fn run(
        &mut self,
        filter: &EmployeeFilter,
    ) -> Result<Vec<FinalizedAggregate>, NavigationError> {
        info!("📊 加班时间检查: {}", self.period);

        let listed = enumerate_employees(self.adapter, &monthly::picker_button(), self.waits)
            .await
            .into_required_step()
            .map_err(|e| NavigationError::step("读取员工列表", e))?;
        let employees = match listed {
            StepOutcome::Done(employees) => employees,
            StepOutcome::Skipped(signal) => {
                log_skip("[员工列表]", &signal);
                focus_content_frame(self.adapter)
                    .await
                    .map_err(|e| NavigationError::step("读取员工列表", e))?;
                return Ok(Vec::new());
            }
        };
        let targets = filter.apply(employees);
        if filter.is_restricted() {
            info!("对象员工: {} 人（已按编号筛选）", targets.len());
        }

        let total = targets.len();
        let mut results = Vec::with_capacity(total);
        for (index, employee) in targets.iter().enumerate() {
            let ctx = EmployeeCtx::new(employee, index + 1, total);
            info!("{} 👤 开始检查 ({}/{})", ctx, ctx.index, ctx.total);

            let outcome = self
                .process_employee(employee, &ctx)
                .await
                .map_err(|e| NavigationError::step(format!("员工 {}", ctx.employee_id), e))?;
            match outcome {
                StepOutcome::Done(aggregate) => {
                    info!("{} ✓ 残業合計 {}", ctx, aggregate.grand_total);
                    results.push(aggregate);
                }
                StepOutcome::Skipped(signal) => log_skip(&ctx, &signal),
            }
        }

        info!("✓ 加班时间检查完成: {}/{} 人", results.len(), total);
        Ok(results)
    }

    async fn process_employee(
        &mut self,
        employee: &EmployeeRef,
        ctx: &EmployeeCtx,
    ) -> Result<StepOutcome<FinalizedAggregate>, AdapterError> {
        if let StepOutcome::Skipped(signal) =
            select_employee(self.adapter, &monthly::picker_button(), employee, self.waits)
                .await
                .into_step()?
        {
            return Ok(StepOutcome::Skipped(signal));
        }
        // 切换员工后画面上的月份不再可信
        self.adapter
            .session_mut()
            .set_displayed_month(DisplayedMonth::Unknown);

        let (shown_id, name) = match self.read_header(employee).await? {
            StepOutcome::Done(header) => header,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };

        let mut aggregate = EmployeeAggregate::new(shown_id, name);
        for date in self.period.days() {
            match self.read_day(date, ctx).await? {
                StepOutcome::Done(day) => {
                    debug!("{} 合计 {}", ctx.on(date), day.total());
                    aggregate.apply(&day);
                }
                StepOutcome::Skipped(signal) => log_skip(ctx.on(date), &signal),
            }
        }
        Ok(StepOutcome::Done(aggregate.finalize()))
    }

    /// 读取画面上的员工编号与姓名，并确认与选择的员工一致
    async fn read_header(
        &mut self,
        employee: &EmployeeRef,
    ) -> Result<StepOutcome<(String, String)>, AdapterError> {
        let shown_id = match self.read_text(&monthly::employee_id()).await? {
            StepOutcome::Done(id) => id,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        if normalize_employee_id(&shown_id) != employee.id() {
            return Ok(StepOutcome::Skipped(SkipSignal::EmployeeMismatch {
                expected: employee.id(),
                shown: shown_id,
            }));
        }

        let name = match self.read_text(&monthly::employee_name()).await? {
            StepOutcome::Done(name) => name,
            StepOutcome::Skipped(signal) => {
                warn!("[员工 {}] 姓名读取失败，使用列表中的名称: {}", employee.id(), signal);
                employee.name.clone()
            }
        };
        Ok(StepOutcome::Done((shown_id, name)))
    }

    async fn read_text(&mut self, locator: &Locator) -> Result<StepOutcome<String>, AdapterError> {
        read_rendered(
            self.adapter,
            locator,
            CellField::Text,
            self.render_retry_limit,
            self.waits,
        )
        .await
    }

    /// 读取一天的四个类别
    async fn read_day(
        &mut self,
        date: NaiveDate,
        ctx: &EmployeeCtx,
    ) -> Result<StepOutcome<DailyTimeRecord>, AdapterError> {
        if self.ensure_month(date, ctx).await? == MonthState::Unavailable {
            return Ok(StepOutcome::Skipped(SkipSignal::MonthUnavailable));
        }

        let day = date.day();
        let rendered = match self.read_text(&monthly::date_cell(day)).await? {
            StepOutcome::Done(text) => text,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        if layout::rendered_day_matches(&rendered, date) != Some(true) {
            return Ok(StepOutcome::Skipped(SkipSignal::DateMismatch {
                expected: date,
                rendered,
            }));
        }

        let mut values = [CellValue::Sentinel; 4];
        for (slot, category) in values.iter_mut().zip(OvertimeCategory::ALL) {
            let locator = monthly::day_cell(day, monthly::column(category));
            let raw = match read_rendered(
                self.adapter,
                &locator,
                CellField::Attribute(monthly::VALUE_ATTRIBUTE),
                self.render_retry_limit,
                self.waits,
            )
            .await?
            {
                StepOutcome::Done(raw) => raw,
                StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
            };
            *slot = match CellValue::parse(&raw) {
                Some(value) => value,
                None => return Ok(StepOutcome::Skipped(SkipSignal::Unreadable { raw })),
            };
        }
        Ok(StepOutcome::Done(DailyTimeRecord::new(date, values)))
    }

    /// 需要时切换显示月份
    ///
    /// 切换时弹出对话框表示该员工在该月没有数据（如入职前），记为不可用，
    /// 同月的其余日期不再重试。等待超时则中止，避免以不完整的合计报告。
    async fn ensure_month(
        &mut self,
        date: NaiveDate,
        ctx: &EmployeeCtx,
    ) -> Result<MonthState, AdapterError> {
        let target = YearMonth::of(date);
        match self.adapter.session().displayed_month() {
            DisplayedMonth::Showing(month) if month == target => return Ok(MonthState::Ready),
            DisplayedMonth::Unavailable(month) if month == target => {
                return Ok(MonthState::Unavailable)
            }
            _ => {}
        }

        debug!("{} 切换显示月份 → {}", ctx, target);
        match self.change_month(target).await.into_required_step()? {
            StepOutcome::Done(()) => {
                self.adapter
                    .session_mut()
                    .set_displayed_month(DisplayedMonth::Showing(target));
                Ok(MonthState::Ready)
            }
            StepOutcome::Skipped(signal) => {
                warn!("{} {} 月份切换失败，该月跳过: {}", ctx.on(date), target, signal);
                self.adapter
                    .session_mut()
                    .set_displayed_month(DisplayedMonth::Unavailable(target));
                // 对话框可能在切换框架途中出现，焦点需要重新确立
                focus_content_frame(self.adapter).await?;
                Ok(MonthState::Unavailable)
            }
        }
    }

    /// 选择月份、检索，并等待 1 日的单元格出现
    ///
    /// 进入：主窗口内容框架。返回：主窗口内容框架。
    async fn change_month(&mut self, target: YearMonth) -> Result<(), AdapterError> {
        let select = self
            .adapter
            .await_and_locate(&monthly::month_select(), &Readiness::Present, self.waits.element)
            .await?;
        self.adapter
            .select_option(&select, &target.option_value())
            .await?;
        let search = self
            .adapter
            .await_and_locate(&layout::search_button(), &Readiness::Clickable, self.waits.element)
            .await?;
        self.adapter.click(&search).await?;

        focus_content_frame(self.adapter).await?;
        self.adapter
            .await_and_locate(
                &monthly::first_day_anchor(),
                &Readiness::Present,
                self.waits.element,
            )
            .await?;
        Ok(())
    }
}
