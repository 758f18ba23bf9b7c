//! 基于 chromiumoxide 的页面适配器
//!
//! 所有 DOM 操作都通过 [`JsExecutor`] 执行 JS 片段完成；
//! JS 对话框（alert / confirm）由后台任务监听并自动关闭，
//! 消息进入队列，下一次操作时以 [`AdapterError::UnexpectedModalPresent`] 返回。

use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{
    EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::script::{self, JsReply, REASON_NO_OPTION};
use super::{
    AdapterError, ElementHandle, Locator, PageAdapter, Readiness, SelectOption, SessionContext,
    WindowHandle,
};
use crate::infrastructure::JsExecutor;

type ModalQueue = Arc<Mutex<VecDeque<String>>>;

fn window_handle(page: &Page) -> WindowHandle {
    WindowHandle::new(page.target_id().as_ref())
}

fn driver_error(err: impl std::fmt::Display) -> AdapterError {
    AdapterError::Driver(err.to_string())
}

/// chromiumoxide 页面适配器
pub struct ChromiumAdapter {
    browser: Browser,
    executor: JsExecutor,
    session: SessionContext,
    modals: ModalQueue,
    watched: HashSet<WindowHandle>,
    poll_interval: Duration,
    script_timeout: Duration,
}

impl ChromiumAdapter {
    /// 以 `page` 所在窗口为主窗口创建适配器
    pub async fn new(
        browser: Browser,
        page: Page,
        poll_interval: Duration,
        script_timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let main = window_handle(&page);
        let mut adapter = Self {
            browser,
            executor: JsExecutor::new(page.clone(), script_timeout),
            session: SessionContext::new(main),
            modals: Arc::new(Mutex::new(VecDeque::new())),
            watched: HashSet::new(),
            poll_interval,
            script_timeout,
        };
        adapter.watch_dialogs(&page).await?;
        Ok(adapter)
    }

    /// 为窗口注册对话框监听（每个窗口只注册一次）
    async fn watch_dialogs(&mut self, page: &Page) -> Result<(), AdapterError> {
        let handle = window_handle(page);
        if !self.watched.insert(handle.clone()) {
            return Ok(());
        }

        let mut events = page
            .event_listener::<EventJavascriptDialogOpening>()
            .await
            .map_err(driver_error)?;
        let page = page.clone();
        let modals = Arc::clone(&self.modals);

        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                debug!("[窗口 {}] 对话框: {}", handle, event.message);
                if let Ok(mut queue) = modals.lock() {
                    queue.push_back(event.message.clone());
                }
                if let Err(e) = page.execute(HandleJavaScriptDialogParams::new(true)).await {
                    warn!("[窗口 {}] 关闭对话框失败: {}", handle, e);
                }
            }
        });
        Ok(())
    }

    /// 有未处理的对话框时返回错误并清空队列
    fn take_modal(&self) -> Result<(), AdapterError> {
        let mut queue = self
            .modals
            .lock()
            .map_err(|_| AdapterError::Driver("对话框队列已损坏".to_string()))?;
        match queue.pop_front() {
            Some(message) => {
                queue.clear();
                Err(AdapterError::UnexpectedModalPresent { message })
            }
            None => Ok(()),
        }
    }

    async fn eval_reply(&self, js: String) -> Result<JsReply, AdapterError> {
        self.executor.eval_as::<JsReply>(js).await
    }

    /// 对句柄执行动作体，返回 `value`
    async fn act(
        &mut self,
        handle: &ElementHandle,
        body: &str,
    ) -> Result<serde_json::Value, AdapterError> {
        if handle.window() != self.session.window() {
            return Err(AdapterError::StaleElement {
                locator: handle.locator().clone(),
            });
        }
        self.take_modal()?;
        let reply = self
            .eval_reply(script::action(handle.frame_path(), handle.locator(), body))
            .await?;
        self.take_modal()?;

        if reply.ok {
            return Ok(reply.value);
        }
        Err(match reply.reason() {
            REASON_NO_OPTION => AdapterError::NoSuchOption {
                locator: handle.locator().clone(),
                value: String::new(),
            },
            _ => AdapterError::StaleElement {
                locator: handle.locator().clone(),
            },
        })
    }

    async fn find_page(&self, handle: &WindowHandle) -> Result<Page, AdapterError> {
        let pages = self.browser.pages().await.map_err(driver_error)?;
        pages
            .into_iter()
            .find(|p| &window_handle(p) == handle)
            .ok_or_else(|| AdapterError::NoSuchWindow(handle.clone()))
    }
}

#[async_trait]
impl PageAdapter for ChromiumAdapter {
    fn session(&self) -> &SessionContext {
        &self.session
    }

    fn session_mut(&mut self) -> &mut SessionContext {
        &mut self.session
    }

    async fn goto(&mut self, url: &str) -> Result<(), AdapterError> {
        self.executor.page().goto(url).await.map_err(driver_error)?;
        self.session.reset_frames();
        self.take_modal()
    }

    async fn title(&mut self) -> Result<String, AdapterError> {
        let title = self
            .executor
            .page()
            .get_title()
            .await
            .map_err(driver_error)?;
        Ok(title.unwrap_or_default())
    }

    async fn await_and_locate(
        &mut self,
        locator: &Locator,
        condition: &Readiness,
        timeout: Duration,
    ) -> Result<ElementHandle, AdapterError> {
        let deadline = Instant::now() + timeout;
        let frame_path = self.session.frame_path().to_vec();
        loop {
            self.take_modal()?;
            let reply = self
                .eval_reply(script::probe(&frame_path, locator, condition))
                .await?;
            if reply.ok {
                return Ok(ElementHandle::in_session(locator.clone(), &self.session));
            }
            if Instant::now() >= deadline {
                return Err(AdapterError::ElementTimeout {
                    locator: locator.clone(),
                    condition: condition.clone(),
                    timeout,
                });
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn read(&mut self, handle: &ElementHandle) -> Result<String, AdapterError> {
        let value = self.act(handle, script::READ_TEXT).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn read_attribute(
        &mut self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, AdapterError> {
        let value = self.act(handle, &script::read_attribute(name)).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn list_options(
        &mut self,
        handle: &ElementHandle,
    ) -> Result<Vec<SelectOption>, AdapterError> {
        let value = self.act(handle, script::LIST_OPTIONS).await?;
        serde_json::from_value(value).map_err(driver_error)
    }

    async fn click(&mut self, handle: &ElementHandle) -> Result<(), AdapterError> {
        self.act(handle, script::CLICK).await.map(|_| ())
    }

    async fn select_option(
        &mut self,
        handle: &ElementHandle,
        value: &str,
    ) -> Result<(), AdapterError> {
        match self.act(handle, &script::select_option(value)).await {
            Err(AdapterError::NoSuchOption { locator, .. }) => Err(AdapterError::NoSuchOption {
                locator,
                value: value.to_string(),
            }),
            other => other.map(|_| ()),
        }
    }

    async fn clear(&mut self, handle: &ElementHandle) -> Result<(), AdapterError> {
        self.act(handle, script::CLEAR).await.map(|_| ())
    }

    async fn type_text(&mut self, handle: &ElementHandle, text: &str) -> Result<(), AdapterError> {
        self.act(handle, &script::type_text(text)).await.map(|_| ())
    }

    async fn scroll_into_view(&mut self, handle: &ElementHandle) -> Result<(), AdapterError> {
        self.act(handle, script::SCROLL_INTO_VIEW).await.map(|_| ())
    }

    async fn switch_to_frame(&mut self, index: usize) -> Result<(), AdapterError> {
        // 框架可能仍在加载，等待至脚本超时为止
        let deadline = Instant::now() + self.script_timeout;
        loop {
            self.take_modal()?;
            let reply = self
                .eval_reply(script::frame_exists(self.session.frame_path(), index))
                .await?;
            if reply.ok {
                self.session.enter_frame(index);
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(AdapterError::NoSuchFrame { index });
            }
            sleep(self.poll_interval).await;
        }
    }

    async fn switch_to_window(&mut self, handle: &WindowHandle) -> Result<(), AdapterError> {
        let page = self.find_page(handle).await?;
        self.watch_dialogs(&page).await?;
        self.executor = JsExecutor::new(page, self.script_timeout);
        self.session.enter_window(handle.clone());
        Ok(())
    }

    async fn list_window_handles(&mut self) -> Result<Vec<WindowHandle>, AdapterError> {
        let pages = self.browser.pages().await.map_err(driver_error)?;
        Ok(pages.iter().map(window_handle).collect())
    }

    async fn close(&mut self) -> Result<(), AdapterError> {
        self.browser.close().await.map_err(driver_error)?;
        Ok(())
    }
}
