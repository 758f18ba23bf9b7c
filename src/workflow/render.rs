//! 延迟渲染的单元格读取
//!
//! 空白字符串表示"还没渲染出来"，而不是真正的空值（真正的零用 `----` 表示），
//! 此时滚动到该元素再读，最多重试 `retry_limit` 次。

use tokio::time::sleep;
use tracing::debug;

use super::{IntoStep, SkipSignal, StepOutcome};
use crate::adapter::{AdapterError, Locator, PageAdapter, Readiness};
use crate::screens::Waits;

/// 读取的内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellField<'a> {
    /// 可见文字
    Text,
    /// 属性值
    Attribute(&'a str),
}

/// 读取非空白的值（已去除首尾空白）
pub async fn read_rendered<A>(
    adapter: &mut A,
    locator: &Locator,
    field: CellField<'_>,
    retry_limit: u32,
    waits: Waits,
) -> Result<StepOutcome<String>, AdapterError>
where
    A: PageAdapter + ?Sized,
{
    let mut attempt = 0;
    loop {
        let handle = match adapter
            .await_and_locate(locator, &Readiness::Present, waits.element)
            .await
            .into_step()?
        {
            StepOutcome::Done(handle) => handle,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };

        let read = match field {
            CellField::Text => adapter.read(&handle).await,
            CellField::Attribute(name) => adapter
                .read_attribute(&handle, name)
                .await
                .map(Option::unwrap_or_default),
        };
        let value = match read.into_step()? {
            StepOutcome::Done(value) => value,
            StepOutcome::Skipped(signal) => return Ok(StepOutcome::Skipped(signal)),
        };

        let value = value.trim();
        if !value.is_empty() {
            return Ok(StepOutcome::Done(value.to_string()));
        }
        if attempt >= retry_limit {
            return Ok(StepOutcome::Skipped(SkipSignal::RenderLag {
                attempts: attempt + 1,
            }));
        }

        attempt += 1;
        debug!("{} 为空白，滚动后重读 ({}/{})", locator, attempt, retry_limit);
        if let StepOutcome::Skipped(signal) = adapter.scroll_into_view(&handle).await.into_step()? {
            return Ok(StepOutcome::Skipped(signal));
        }
        sleep(waits.poll).await;
    }
}
