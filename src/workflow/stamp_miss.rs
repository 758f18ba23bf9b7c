//! 打卡遗漏一览提取
//!
//! 选择全员 → 设定期间并检索 → 逐行读取直到行不存在 →（有"次ページ"时翻页）。
//! 每行就是一条异常，不做汇总。

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use super::render::{read_rendered, CellField};
use super::{classify, classify_required, log_skip, IntoStep, StepOutcome};
use crate::adapter::{AdapterError, PageAdapter, Readiness};
use crate::calendar::ReportingPeriod;
use crate::error::NavigationError;
use crate::models::{normalize_employee_id, EmployeeFilter, StampMissRow};
use crate::screens::layout::{self, stamp_miss};
use crate::screens::{focus_content_frame, select_all_employees, Waits};

/// 期间输入框的格式
const INPUT_DATE_FORMAT: &str = "%Y%m%d";

fn input_value(date: NaiveDate) -> String {
    date.format(INPUT_DATE_FORMAT).to_string()
}

/// 打卡遗漏一览提取引擎
pub struct StampMissEngine<'a, A: PageAdapter + ?Sized> {
    adapter: &'a mut A,
    period: ReportingPeriod,
    waits: Waits,
    render_retry_limit: u32,
    max_pages: u32,
}

impl<'a, A: PageAdapter + ?Sized> StampMissEngine<'a, A> {
    pub fn new(
        adapter: &'a mut A,
        period: ReportingPeriod,
        waits: Waits,
        render_retry_limit: u32,
        max_pages: u32,
    ) -> Self {
        Self {
            adapter,
            period,
            waits,
            render_retry_limit,
            max_pages,
        }
    }

    pub async fn run(
        &mut self,
        filter: &EmployeeFilter,
    ) -> Result<Vec<StampMissRow>, NavigationError> {
        info!("📋 打卡遗漏检查: {}", self.period);

        let selected =
            select_all_employees(self.adapter, &stamp_miss::picker_button(), self.waits)
                .await
                .into_required_step()
                .map_err(|e| NavigationError::step("选择全员", e))?;
        if let StepOutcome::Skipped(signal) = selected {
            log_skip("[选择全员]", &signal);
            return self.give_up("选择全员").await;
        }

        let searched = match self.set_period().await {
            Ok(outcome) => outcome,
            Err(e) => classify_required(e)
                .map(StepOutcome::Skipped)
                .map_err(|e| NavigationError::step("设定期间", e))?,
        };
        if let StepOutcome::Skipped(signal) = searched {
            log_skip("[打卡遗漏检索]", &signal);
            return self.give_up("设定期间").await;
        }

        let mut rows = Vec::new();
        let mut page = 1;
        loop {
            let read = self
                .read_page(page, filter, &mut rows)
                .await
                .map_err(|e| NavigationError::step(format!("读取第 {} 页", page), e))?;
            debug!("第 {} 页: {} 行", page, read);

            if page >= self.max_pages {
                warn!("已达到翻页上限 ({} 页)，停止读取", self.max_pages);
                break;
            }
            let turned = self
                .next_page()
                .await
                .map_err(|e| NavigationError::step("翻页", e))?;
            if !turned {
                break;
            }
            page += 1;
        }

        info!("✓ 打卡遗漏检查完成: {} 件", rows.len());
        Ok(rows)
    }

    /// 对话框结束检索：重新确立焦点，结果为空
    async fn give_up(&mut self, step: &str) -> Result<Vec<StampMissRow>, NavigationError> {
        focus_content_frame(self.adapter)
            .await
            .map_err(|e| NavigationError::step(step, e))?;
        Ok(Vec::new())
    }

    /// 期间与画面上的值不同时重新输入并检索
    ///
    /// 检索时弹出对话框（期间内无对象）返回 `Skipped`。
    /// 进入：主窗口内容框架。返回：主窗口内容框架。
    async fn set_period(&mut self) -> Result<StepOutcome<()>, AdapterError> {
        let start = input_value(self.period.start());
        let end = input_value(self.period.end());

        let start_input = self
            .adapter
            .await_and_locate(&stamp_miss::start_input(), &Readiness::Present, self.waits.element)
            .await?;
        let end_input = self
            .adapter
            .await_and_locate(&stamp_miss::end_input(), &Readiness::Present, self.waits.element)
            .await?;
        let shown_start = self.adapter.read_attribute(&start_input, "value").await?;
        let shown_end = self.adapter.read_attribute(&end_input, "value").await?;

        let unchanged = shown_start.as_deref() == Some(start.as_str())
            && shown_end.as_deref() == Some(end.as_str());
        if unchanged {
            debug!("期间已是 {} - {}，无需检索", start, end);
            return Ok(StepOutcome::Done(()));
        }

        info!("设定期间 {} - {}", start, end);
        for (handle, value) in [(&start_input, &start), (&end_input, &end)] {
            self.adapter.clear(handle).await?;
            self.adapter.type_text(handle, value).await?;
        }
        let search = self
            .adapter
            .await_and_locate(&layout::search_button(), &Readiness::Clickable, self.waits.element)
            .await?;
        self.adapter.click(&search).await?;
        match focus_content_frame(self.adapter).await.into_step()? {
            StepOutcome::Done(()) => Ok(StepOutcome::Done(())),
            StepOutcome::Skipped(signal) => {
                focus_content_frame(self.adapter).await?;
                Ok(StepOutcome::Skipped(signal))
            }
        }
    }

    /// 读取当前页的所有行，返回读到的行数
    async fn read_page(
        &mut self,
        page: u32,
        filter: &EmployeeFilter,
        rows: &mut Vec<StampMissRow>,
    ) -> Result<usize, AdapterError> {
        let mut index = 0;
        loop {
            // 第一行等待检索结果显示，之后的行只探测一次
            let wait = if index == 0 {
                self.waits.element
            } else {
                Waits::PROBE
            };
            match self
                .adapter
                .await_and_locate(&stamp_miss::row(index), &Readiness::Present, wait)
                .await
            {
                Ok(_) => {}
                Err(AdapterError::ElementTimeout { .. }) => {
                    if index == 0 {
                        info!("第 {} 页没有对象行", page);
                    }
                    return Ok(index);
                }
                Err(e) => {
                    let signal = classify(e)?;
                    log_skip(format!("[第 {} 页]", page), &signal);
                    return Ok(index);
                }
            }

            if let Some(row) = self.read_row(page, index).await? {
                if filter.allows(&row.employee_id) {
                    rows.push(row);
                } else {
                    debug!(
                        "[员工 {}] 不在对象范围内，忽略",
                        normalize_employee_id(&row.employee_id)
                    );
                }
            }
            index += 1;
        }
    }

    async fn read_row(
        &mut self,
        page: u32,
        index: usize,
    ) -> Result<Option<StampMissRow>, AdapterError> {
        let scope = format!("[第 {} 页 第 {} 行]", page, index + 1);

        let employee_id = match self
            .read_cell(index, stamp_miss::COL_EMPLOYEE_ID, true)
            .await?
        {
            StepOutcome::Done(id) => id,
            StepOutcome::Skipped(signal) => {
                log_skip(&scope, &signal);
                return Ok(None);
            }
        };
        let scope = format!("[员工 {}]", normalize_employee_id(&employee_id));

        let target_date = match self.read_cell(index, stamp_miss::COL_DATE, true).await? {
            StepOutcome::Done(date) => date,
            StepOutcome::Skipped(signal) => {
                log_skip(&scope, &signal);
                return Ok(None);
            }
        };
        let scope = format!("{}[{}]", scope, target_date);

        let mut texts = Vec::with_capacity(2);
        for column in [stamp_miss::COL_NAME, stamp_miss::COL_MESSAGE] {
            match self.read_cell(index, column, false).await? {
                StepOutcome::Done(text) => texts.push(text),
                StepOutcome::Skipped(signal) => {
                    log_skip(&scope, &signal);
                    return Ok(None);
                }
            }
        }
        let detail = texts.pop().unwrap_or_default();
        let name = texts.pop().unwrap_or_default();

        debug!("{} {} {}", scope, name, detail);
        Ok(Some(StampMissRow::new(employee_id, name, &target_date, detail)))
    }

    /// 读取单元格文字；`required` 为真时空白视为尚未渲染
    async fn read_cell(
        &mut self,
        row: usize,
        column: usize,
        required: bool,
    ) -> Result<StepOutcome<String>, AdapterError> {
        let locator = stamp_miss::cell(row, column);
        if required {
            return read_rendered(
                self.adapter,
                &locator,
                CellField::Text,
                self.render_retry_limit,
                self.waits,
            )
            .await;
        }

        let handle = match self
            .adapter
            .await_and_locate(&locator, &Readiness::Present, self.waits.element)
            .await
            .into_step()?
        {
            StepOutcome::Done(handle) => handle,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };
        self.adapter.read(&handle).await.into_step()
    }

    /// 有"次ページ"链接时翻页
    async fn next_page(&mut self) -> Result<bool, AdapterError> {
        let link = match self
            .adapter
            .await_and_locate(&stamp_miss::next_page(), &Readiness::Clickable, Waits::PROBE)
            .await
            .into_step()?
        {
            StepOutcome::Done(link) => link,
            StepOutcome::Skipped(_) => return Ok(false),
        };

        match self.adapter.click(&link).await.into_step()? {
            StepOutcome::Done(()) => {}
            StepOutcome::Skipped(signal) => {
                warn!("翻页失败，停止读取: {}", signal);
                return Ok(false);
            }
        }
        if let StepOutcome::Skipped(signal) = focus_content_frame(self.adapter).await.into_step()? {
            warn!("翻页后画面异常，停止读取: {}", signal);
            focus_content_frame(self.adapter).await?;
            return Ok(false);
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_input_format() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(input_value(date), "20240301");
    }
}
