//! 输出前的筛选
//!
//! 阈值筛选与忽略名单筛选互相独立，先后顺序不影响结果。

use tracing::{debug, info};

use crate::directory::Directory;
use crate::models::{FinalizedAggregate, ReportRecord};

/// 只保留合计小时数不低于 `threshold_hours` 的员工，0 表示不筛选
pub fn apply_threshold(
    aggregates: Vec<FinalizedAggregate>,
    threshold_hours: u32,
) -> Vec<FinalizedAggregate> {
    if threshold_hours == 0 {
        return aggregates;
    }
    let before = aggregates.len();
    let kept: Vec<_> = aggregates
        .into_iter()
        .filter(|agg| {
            let keep = agg.grand_total.hours() >= threshold_hours;
            if !keep {
                debug!(
                    "[员工 {}] 合计 {} 未达到阈值 {} 小时",
                    agg.record.employee_id(),
                    agg.grand_total,
                    threshold_hours
                );
            }
            keep
        })
        .collect();
    info!(
        "阈值筛选 ({} 小时): {} → {} 人",
        threshold_hours,
        before,
        kept.len()
    );
    kept
}

/// 去掉名册中标记为忽略的员工
pub fn drop_ignored(records: Vec<ReportRecord>, directory: &Directory) -> Vec<ReportRecord> {
    records
        .into_iter()
        .filter(|record| {
            let ignored = directory.is_ignored(record.employee_id());
            if ignored {
                info!("[员工 {}] 在忽略名单中，不输出", record.employee_id());
            }
            !ignored
        })
        .collect()
}
