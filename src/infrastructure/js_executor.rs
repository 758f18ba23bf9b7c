//! JS 执行器 - 基础设施层
//!
//! 持有当前活动窗口的 page，只暴露"执行 JS"的能力

use std::time::Duration;

use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tokio::time::timeout;

use crate::adapter::AdapterError;

/// JS 执行器
///
/// 职责：
/// - 持有当前窗口的 Page 资源
/// - 暴露 eval() 能力，且每次执行都有超时
/// - 不认识员工 / 月报
pub struct JsExecutor {
    page: Page,
    script_timeout: Duration,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page, script_timeout: Duration) -> Self {
        Self {
            page,
            script_timeout,
        }
    }

    /// 获取 page 的引用（用于导航等其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue, AdapterError> {
        let evaluation = timeout(self.script_timeout, self.page.evaluate(js_code.into()))
            .await
            .map_err(|_| {
                AdapterError::Driver(format!("脚本执行超时 ({:?})", self.script_timeout))
            })?
            .map_err(|e| AdapterError::Driver(e.to_string()))?;
        evaluation
            .into_value()
            .map_err(|e| AdapterError::Driver(e.to_string()))
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(
        &self,
        js_code: impl Into<String>,
    ) -> Result<T, AdapterError> {
        let json_value = self.eval(js_code).await?;
        serde_json::from_value(json_value).map_err(|e| AdapterError::Driver(e.to_string()))
    }
}
