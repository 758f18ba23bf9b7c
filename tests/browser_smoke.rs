//! 需要真实浏览器与考勤系统的测试，默认忽略：cargo test -- --ignored

use std::path::Path;
use std::time::Duration;

use atd_check::adapter::{ChromiumAdapter, PageAdapter};
use atd_check::browser::{connect_to_browser_and_page, launch_headless_browser};
use atd_check::config::Settings;
use atd_check::screens::{login, Waits};

fn settings() -> Settings {
    Settings::load(Path::new("setting.toml")).expect("加载 setting.toml 失败")
}

#[tokio::test]
#[ignore]
async fn test_browser_connection() {
    let settings = settings();

    let result = connect_to_browser_and_page(
        settings.environment.browser_debug_port,
        &settings.site.url,
    )
    .await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_headless_login() {
    let settings = settings();

    let (browser, page) = launch_headless_browser(
        &settings.site.url,
        settings.environment.browser_executable.as_deref(),
        true,
    )
    .await
    .expect("启动浏览器失败");
    let mut adapter = ChromiumAdapter::new(
        browser,
        page,
        Duration::from_millis(200),
        Duration::from_secs(30),
    )
    .await
    .expect("初始化适配器失败");

    let waits = Waits::from(&settings.timing);
    let result = login(&mut adapter, &settings.site, waits).await;
    adapter.close().await.expect("关闭浏览器失败");

    assert!(result.is_ok(), "应该能够登录: {:?}", result.err());
}
