//! 画面导航
//!
//! 每个函数注明进入时需要的焦点与返回时留下的焦点。
//! 跨窗口操作（个人选择子窗口）结束后总是重新进入主窗口的内容框架，
//! 调用方不要假设焦点会自动恢复。

use tokio::time::{sleep, Instant};
use tracing::{debug, error, info};

use super::layout::{self, login as login_screen, picker, CONTENT_FRAME, MENU_FRAME, PICKER_FRAME};
use super::Waits;
use crate::adapter::{AdapterError, Locator, PageAdapter, Readiness, WindowHandle};
use crate::config::SiteSettings;
use crate::error::NavigationError;
use crate::models::EmployeeRef;

/// 登录
///
/// 进入：任意。返回：主窗口顶层文档。
pub async fn login<A>(
    adapter: &mut A,
    site: &SiteSettings,
    waits: Waits,
) -> Result<(), NavigationError>
where
    A: PageAdapter + ?Sized,
{
    info!("🔐 登录 {}", site.url);
    adapter
        .goto(&site.url)
        .await
        .map_err(|e| NavigationError::step("打开登录页", e))?;

    let title = adapter
        .title()
        .await
        .map_err(|e| NavigationError::step("读取页面标题", e))?;
    if title.trim() == layout::MAINTENANCE_TITLE {
        error!("服务器维护中，处理中止");
        return Err(NavigationError::Maintenance {
            url: site.url.clone(),
        });
    }

    let fields = [
        (login_screen::company(), site.company.as_str()),
        (login_screen::login_id(), site.login_id.as_str()),
        (login_screen::password(), site.password.as_str()),
    ];
    for (locator, value) in fields {
        let handle = adapter
            .await_and_locate(&locator, &Readiness::Present, waits.element)
            .await
            .map_err(|e| NavigationError::step("登录画面显示", e))?;
        adapter
            .type_text(&handle, value)
            .await
            .map_err(|e| NavigationError::step("输入登录信息", e))?;
    }

    let submit = adapter
        .await_and_locate(&login_screen::submit(), &Readiness::Clickable, waits.element)
        .await
        .map_err(|e| NavigationError::step("登录按钮", e))?;
    adapter
        .click(&submit)
        .await
        .map_err(|e| NavigationError::step("点击登录", e))?;

    // 登录成功后才会出现菜单/内容框架
    adapter
        .switch_to_default_content()
        .await
        .map_err(|e| NavigationError::step("登录确认", e))?;
    if let Err(e) = adapter
        .await_and_locate(&login_screen::frameset(), &Readiness::Present, waits.element)
        .await
    {
        error!("登录失败 (公司: {}, ID: {}): {}", site.company, site.login_id, e);
        return Err(NavigationError::LoginFailed {
            company: site.company.clone(),
            login_id: site.login_id.clone(),
        });
    }

    info!("✓ 登录成功");
    Ok(())
}

/// 点击左侧菜单
///
/// 进入：主窗口任意框架。返回：主窗口菜单框架。
pub async fn open_menu<A>(adapter: &mut A, title: &str, waits: Waits) -> Result<(), NavigationError>
where
    A: PageAdapter + ?Sized,
{
    info!("📂 打开菜单 '{}'", title);
    let step = |e| NavigationError::step(format!("菜单 '{}'", title), e);

    adapter.switch_to_default_content().await.map_err(step)?;
    adapter.switch_to_frame(MENU_FRAME).await.map_err(step)?;
    let link = adapter
        .await_and_locate(&Locator::link_title(title), &Readiness::Clickable, waits.element)
        .await
        .map_err(step)?;
    adapter.click(&link).await.map_err(step)
}

/// 把焦点放到主窗口的内容框架
///
/// 进入：任意窗口、任意框架。返回：主窗口内容框架。
pub async fn focus_content_frame<A>(adapter: &mut A) -> Result<(), AdapterError>
where
    A: PageAdapter + ?Sized,
{
    if !adapter.session().in_main_window() {
        let main = adapter.session().main_window().clone();
        adapter.switch_to_window(&main).await?;
    }
    adapter.switch_to_default_content().await?;
    adapter.switch_to_frame(CONTENT_FRAME).await
}

/// 等待子窗口出现
async fn await_sub_window<A>(adapter: &mut A, waits: Waits) -> Result<WindowHandle, AdapterError>
where
    A: PageAdapter + ?Sized,
{
    let deadline = Instant::now() + waits.element;
    let main = adapter.session().main_window().clone();
    loop {
        let handles = adapter.list_window_handles().await?;
        if let Some(handle) = handles.into_iter().find(|h| *h != main) {
            return Ok(handle);
        }
        if Instant::now() >= deadline {
            return Err(AdapterError::ElementTimeout {
                locator: Locator::name("個人選択ウィンドウ"),
                condition: Readiness::Visible,
                timeout: waits.element,
            });
        }
        sleep(waits.poll).await;
    }
}

/// 点击"个人选择"按钮，进入子窗口的员工列表框架
///
/// 进入：任意。返回：子窗口列表框架，且 `ready` 已出现。
async fn open_picker<A>(
    adapter: &mut A,
    button: &Locator,
    ready: &Locator,
    waits: Waits,
) -> Result<(), AdapterError>
where
    A: PageAdapter + ?Sized,
{
    focus_content_frame(adapter).await?;
    let handle = adapter
        .await_and_locate(button, &Readiness::Clickable, waits.element)
        .await?;
    adapter.click(&handle).await?;

    let window = await_sub_window(adapter, waits).await?;
    debug!("个人选择窗口: {}", window);
    adapter.switch_to_window(&window).await?;
    adapter.switch_to_frame(PICKER_FRAME).await?;
    adapter
        .await_and_locate(ready, &Readiness::Present, waits.element)
        .await?;
    Ok(())
}

/// 点击确定并回到主窗口内容框架
async fn confirm_picker<A>(adapter: &mut A, waits: Waits) -> Result<(), AdapterError>
where
    A: PageAdapter + ?Sized,
{
    let confirm = adapter
        .await_and_locate(&picker::confirm(), &Readiness::Clickable, waits.element)
        .await?;
    adapter.click(&confirm).await?;
    focus_content_frame(adapter).await
}

/// 从个人选择窗口读取员工列表（选择第一个员工后关闭）
///
/// 进入：任意。返回：主窗口内容框架。
pub async fn enumerate_employees<A>(
    adapter: &mut A,
    button: &Locator,
    waits: Waits,
) -> Result<Vec<EmployeeRef>, AdapterError>
where
    A: PageAdapter + ?Sized,
{
    let list = picker::member_list();
    open_picker(adapter, button, &list, waits).await?;

    let handle = adapter
        .await_and_locate(&list, &Readiness::Present, waits.element)
        .await?;
    let options = adapter.list_options(&handle).await?;
    let employees: Vec<EmployeeRef> = options
        .into_iter()
        .filter(|o| !o.value.trim().is_empty())
        .map(|o| EmployeeRef::new(o.value, o.text))
        .collect();

    if let Some(first) = employees.first() {
        adapter.select_option(&handle, &first.option_value).await?;
    }
    confirm_picker(adapter, waits).await?;

    info!("✓ 员工列表: {} 人", employees.len());
    Ok(employees)
}

/// 在个人选择窗口中选择一名员工
///
/// 进入：任意。返回：主窗口内容框架，画面显示该员工。
pub async fn select_employee<A>(
    adapter: &mut A,
    button: &Locator,
    employee: &EmployeeRef,
    waits: Waits,
) -> Result<(), AdapterError>
where
    A: PageAdapter + ?Sized,
{
    let list = picker::member_list();
    open_picker(adapter, button, &list, waits).await?;
    let handle = adapter
        .await_and_locate(&list, &Readiness::Present, waits.element)
        .await?;
    adapter.select_option(&handle, &employee.option_value).await?;
    confirm_picker(adapter, waits).await
}

/// 在个人选择窗口中选择全员
///
/// 进入：任意。返回：主窗口内容框架。
pub async fn select_all_employees<A>(
    adapter: &mut A,
    button: &Locator,
    waits: Waits,
) -> Result<(), AdapterError>
where
    A: PageAdapter + ?Sized,
{
    let all = picker::select_all();
    open_picker(adapter, button, &all, waits).await?;
    let radio = adapter
        .await_and_locate(&all, &Readiness::Clickable, waits.element)
        .await?;
    adapter.click(&radio).await?;
    confirm_picker(adapter, waits).await
}
