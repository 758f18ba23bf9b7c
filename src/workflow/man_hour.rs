//! 工时分配不一致提取
//!
//! 画面按周显示。对每位员工：
//! 1. 用"前期间"回退，直到显示的期间开始日不晚于统计期间开始日
//! 2. 用"次期间"前进，直到期间开始日超过统计期间结束日
//! 3. 每周比较七列的"就业时间"与"合计"，不一致的日子记一行
//!
//! 回退与前进的次数都受 `max_term_steps` 限制。

use chrono::{Days, NaiveDate};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::render::{read_rendered, CellField};
use super::{log_skip, EmployeeCtx, IntoStep, SkipSignal, StepOutcome};
use crate::adapter::{AdapterError, Locator, PageAdapter, Readiness};
use crate::calendar::ReportingPeriod;
use crate::error::NavigationError;
use crate::models::{EmployeeFilter, EmployeeRef, ManHourMismatchRow};
use crate::screens::layout::{self, man_hour};
use crate::screens::{enumerate_employees, focus_content_frame, select_employee, Waits};

/// 翻周方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermStep {
    Previous,
    Next,
}

impl TermStep {
    fn button(self) -> Locator {
        match self {
            TermStep::Previous => man_hour::previous_term(),
            TermStep::Next => man_hour::next_term(),
        }
    }
}

/// 工时分配不一致提取引擎
pub struct ManHourEngine<'a, A: PageAdapter + ?Sized> {
    adapter: &'a mut A,
    period: ReportingPeriod,
    waits: Waits,
    render_retry_limit: u32,
    max_term_steps: u32,
}

impl<'a, A: PageAdapter + ?Sized> ManHourEngine<'a, A> {
    pub fn new(
        adapter: &'a mut A,
        period: ReportingPeriod,
        waits: Waits,
        render_retry_limit: u32,
        max_term_steps: u32,
    ) -> Self {
        Self {
            adapter,
            period,
            waits,
            render_retry_limit,
            max_term_steps,
        }
    }

    pub async fn run(
        &mut self,
        filter: &EmployeeFilter,
    ) -> Result<Vec<ManHourMismatchRow>, NavigationError> {
        info!("🧮 工时分配检查: {}", self.period);

        let listed = enumerate_employees(self.adapter, &man_hour::picker_button(), self.waits)
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

        let total = targets.len();
        let mut rows = Vec::new();
        for (index, employee) in targets.iter().enumerate() {
            let ctx = EmployeeCtx::new(employee, index + 1, total);
            info!("{} 👤 开始检查 ({}/{})", ctx, ctx.index, ctx.total);

            let outcome = self
                .process_employee(employee, &ctx)
                .await
                .map_err(|e| NavigationError::step(format!("员工 {}", ctx.employee_id), e))?;
            match outcome {
                StepOutcome::Done(found) => {
                    if !found.is_empty() {
                        info!("{} 不一致 {} 件", ctx, found.len());
                    }
                    rows.extend(found);
                }
                StepOutcome::Skipped(signal) => log_skip(&ctx, &signal),
            }
        }

        info!("✓ 工时分配检查完成: {} 件", rows.len());
        Ok(rows)
    }

    async fn process_employee(
        &mut self,
        employee: &EmployeeRef,
        ctx: &EmployeeCtx,
    ) -> Result<StepOutcome<Vec<ManHourMismatchRow>>, AdapterError> {
        if let StepOutcome::Skipped(signal) =
            select_employee(self.adapter, &man_hour::picker_button(), employee, self.waits)
                .await
                .into_step()?
        {
            return Ok(StepOutcome::Skipped(signal));
        }

        let name = match self.read_text(&man_hour::employee_name()).await? {
            StepOutcome::Done(name) => name,
            StepOutcome::Skipped(_) => employee.name.clone(),
        };

        let mut term_start = match self.read_term_start().await? {
            StepOutcome::Done(start) => start,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };

        let mut steps = 0;
        while self.period.start() < term_start {
            if steps >= self.max_term_steps {
                warn!("{} 回退次数达到上限 ({})，停止", ctx, self.max_term_steps);
                return Ok(StepOutcome::Skipped(SkipSignal::Missing {
                    detail: format!("无法回退到 {}", self.period.start()),
                }));
            }
            term_start = match self.turn_term(TermStep::Previous, term_start).await? {
                StepOutcome::Done(start) => start,
                StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
            };
            steps += 1;
        }
        debug!("{} 起始周 {}", ctx, term_start);

        let mut rows = Vec::new();
        let mut steps = 0;
        while term_start <= self.period.end() {
            rows.extend(self.compare_week(employee, &name, term_start, ctx).await?);

            if steps >= self.max_term_steps {
                warn!("{} 前进次数达到上限 ({})，停止", ctx, self.max_term_steps);
                break;
            }
            term_start = match self.turn_term(TermStep::Next, term_start).await? {
                StepOutcome::Done(start) => start,
                StepOutcome::Skipped(signal) => {
                    log_skip(ctx, &signal);
                    break;
                }
            };
            steps += 1;
        }
        Ok(StepOutcome::Done(rows))
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

    async fn read_term_start(&mut self) -> Result<StepOutcome<NaiveDate>, AdapterError> {
        let text = match self.read_text(&man_hour::term()).await? {
            StepOutcome::Done(text) => text,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        Ok(match layout::parse_term_start(&text) {
            Some(start) => StepOutcome::Done(start),
            None => StepOutcome::Skipped(SkipSignal::Unreadable { raw: text }),
        })
    }

    /// 点击翻周按钮，等待显示的期间变化
    ///
    /// 进入：主窗口内容框架。返回：主窗口内容框架。
    async fn turn_term(
        &mut self,
        step: TermStep,
        current: NaiveDate,
    ) -> Result<StepOutcome<NaiveDate>, AdapterError> {
        let button = match self
            .adapter
            .await_and_locate(&step.button(), &Readiness::Clickable, self.waits.element)
            .await
            .into_step()?
        {
            StepOutcome::Done(button) => button,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        if let StepOutcome::Skipped(signal) = self.adapter.click(&button).await.into_step()? {
            return Ok(StepOutcome::Skipped(signal));
        }
        if let StepOutcome::Skipped(signal) = focus_content_frame(self.adapter).await.into_step()? {
            focus_content_frame(self.adapter).await?;
            return Ok(StepOutcome::Skipped(signal));
        }

        let deadline = Instant::now() + self.waits.element;
        loop {
            match self.read_term_start().await? {
                StepOutcome::Done(start) if start != current => {
                    debug!("期间 {} → {}", current, start);
                    return Ok(StepOutcome::Done(start));
                }
                StepOutcome::Done(_) => {}
                StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
            }
            if Instant::now() >= deadline {
                return Ok(StepOutcome::Skipped(SkipSignal::Missing {
                    detail: format!("期间未从 {} 切换", current),
                }));
            }
            sleep(self.waits.poll).await;
        }
    }

    /// 比较一周七列
    async fn compare_week(
        &mut self,
        employee: &EmployeeRef,
        name: &str,
        term_start: NaiveDate,
        ctx: &EmployeeCtx,
    ) -> Result<Vec<ManHourMismatchRow>, AdapterError> {
        let mut rows = Vec::new();
        for (offset, column) in man_hour::DAY_COLUMNS.enumerate() {
            let Some(date) = term_start.checked_add_days(Days::new(offset as u64)) else {
                continue;
            };
            if !self.period.contains(date) {
                continue;
            }
            match self.compare_day(employee, name, date, column).await? {
                StepOutcome::Done(Some(row)) => {
                    info!("{} ❗ {}", ctx.on(date), row.detail());
                    rows.push(row);
                }
                StepOutcome::Done(None) => {}
                StepOutcome::Skipped(signal) => log_skip(ctx.on(date), &signal),
            }
        }
        Ok(rows)
    }

    async fn compare_day(
        &mut self,
        employee: &EmployeeRef,
        name: &str,
        date: NaiveDate,
        column: usize,
    ) -> Result<StepOutcome<Option<ManHourMismatchRow>>, AdapterError> {
        let rendered = match self.read_text(&man_hour::date_cell(column)).await? {
            StepOutcome::Done(text) => text,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        if layout::rendered_day_matches(&rendered, date) != Some(true) {
            return Ok(StepOutcome::Skipped(SkipSignal::DateMismatch {
                expected: date,
                rendered,
            }));
        }

        // 没有工时的日子两边都是空白，空白在这里是合法的值
        let working = match self.read_plain(&man_hour::working_hours(column)).await? {
            StepOutcome::Done(text) => text,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        let allocated = match self.read_plain(&man_hour::allocated_total(column)).await? {
            StepOutcome::Done(text) => text,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };

        if working == allocated {
            return Ok(StepOutcome::Done(None));
        }
        Ok(StepOutcome::Done(Some(ManHourMismatchRow::new(
            employee.option_value.clone(),
            name,
            date,
            working,
            allocated,
        ))))
    }

    async fn read_plain(&mut self, locator: &Locator) -> Result<StepOutcome<String>, AdapterError> {
        let handle = match self
            .adapter
            .await_and_locate(locator, &Readiness::Present, self.waits.element)
            .await
            .into_step()?
        {
            StepOutcome::Done(handle) => handle,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        self.adapter
            .read(&handle)
            .await
            .map(|text| text.trim().to_string())
            .into_step()
    }
}
