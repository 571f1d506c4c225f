//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 默认日志级别，浏览器协议层的噪声降到 warn
const DEFAULT_FILTER: &str = "info,chromiumoxide=warn";

/// 初始化全局日志
///
/// 优先读取 `RUST_LOG`；重复调用不会报错，测试中可以随意调用。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
