//! 浏览器会话的获取：连接已启动的浏览器，或启动无头浏览器

pub mod connection;
pub mod headless;

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;
