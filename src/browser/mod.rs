//! 真实浏览器
//!
//! - `headless`：浏览器进程的启动与关闭
//! - `cdp`：基于 DevTools 协议实现 `Automation` / `PageHandle`

pub mod cdp;
pub mod headless;

pub use cdp::CdpPage;
pub use headless::BrowserSession;
