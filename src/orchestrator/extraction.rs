//! 单次检查的浏览器部分
//!
//! 登录 → 打开菜单 → 运行对应的提取引擎 → 统一成 [`ReportRecord`] 列表。
//! 只依赖 [`PageAdapter`]，测试时可以换成内存中的假画面。

use tracing::info;

use crate::adapter::PageAdapter;
use crate::calendar::{PeriodKind, ReportingPeriod};
use crate::config::Settings;
use crate::error::NavigationError;
use crate::models::{EmployeeFilter, ReportRecord};
use crate::report::apply_threshold;
use crate::screens::{login, open_menu, Waits};
use crate::workflow::{ManHourEngine, OvertimeEngine, StampMissEngine};

/// 一次检查的参数
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub kind: PeriodKind,
    pub period: ReportingPeriod,
    pub filter: EmployeeFilter,
    /// 加班合计的下限（小时），0 表示不筛选
    pub threshold_hours: u32,
}

/// 登录并提取检查结果
///
/// 进入：任意。返回：主窗口内容框架（成功时）。
pub async fn extract_records<A>(
    adapter: &mut A,
    settings: &Settings,
    request: &CheckRequest,
) -> Result<Vec<ReportRecord>, NavigationError>
where
    A: PageAdapter + ?Sized,
{
    let waits = Waits::from(&settings.timing);
    let timing = &settings.timing;

    login(adapter, &settings.site, waits).await?;
    open_menu(adapter, &settings.modes.get(request.kind).menu_title, waits).await?;

    let records: Vec<ReportRecord> = match request.kind {
        PeriodKind::Overtime => {
            let aggregates =
                OvertimeEngine::new(adapter, request.period, waits, timing.render_retry_limit)
                    .run(&request.filter)
                    .await?;
            apply_threshold(aggregates, request.threshold_hours)
                .into_iter()
                .map(|agg| agg.record)
                .collect()
        }
        PeriodKind::StampMiss => StampMissEngine::new(
            adapter,
            request.period,
            waits,
            timing.render_retry_limit,
            timing.max_term_steps,
        )
        .run(&request.filter)
        .await?
        .into_iter()
        .map(|row| row.into_record())
        .collect(),
        PeriodKind::ManHour => ManHourEngine::new(
            adapter,
            request.period,
            waits,
            timing.render_retry_limit,
            timing.max_term_steps,
        )
        .run(&request.filter)
        .await?
        .into_iter()
        .map(|row| row.into_record())
        .collect(),
    };

    info!("✓ 提取完成: {} 件", records.len());
    Ok(records)
}
