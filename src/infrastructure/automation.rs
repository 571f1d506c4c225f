//! 浏览器自动化接口 - 基础设施层
//!
//! 编排层只通过这里的 trait 操作浏览器：
//! - `Automation`：全局自动化句柄，负责浏览上下文与页面的创建/销毁
//! - `PageHandle`：单个标签页暴露的能力（导航、脚本、输入、请求拦截）
//!
//! 真实实现见 `browser::cdp`，测试中使用 `infrastructure::fake`。

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::AppResult;

/// 请求的资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Document,
    Stylesheet,
    Image,
    Media,
    Font,
    Script,
    Xhr,
    Fetch,
    Other,
}

impl ResourceKind {
    /// 从协议中的资源类型名解析（不区分大小写）
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "document" => Self::Document,
            "stylesheet" => Self::Stylesheet,
            "image" => Self::Image,
            "media" => Self::Media,
            "font" => Self::Font,
            "script" => Self::Script,
            "xhr" => Self::Xhr,
            "fetch" => Self::Fetch,
            _ => Self::Other,
        }
    }
}

/// 请求过滤策略：返回 `true` 表示拦截该请求
pub type ResourceFilter = fn(ResourceKind) -> bool;

/// 默认策略：只需要元数据，图片、样式、字体、媒体一律拦截
pub fn should_block(kind: ResourceKind) -> bool {
    matches!(
        kind,
        ResourceKind::Image | ResourceKind::Stylesheet | ResourceKind::Font | ResourceKind::Media
    )
}

/// 视口尺寸（CSS 像素）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// 主文档的导航响应
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationResponse {
    pub status: u16,
}

impl NavigationResponse {
    /// 2xx 视为成功
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 浏览上下文的身份参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextProfile {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl ContextProfile {
    pub fn desktop(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            viewport_width: 1920,
            viewport_height: 1080,
        }
    }
}

/// 已创建的隔离浏览上下文（独立的 cookie / 缓存 / 存储）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextHandle {
    pub id: String,
    pub profile: ContextProfile,
}

/// 全局浏览器自动化句柄
#[async_trait]
pub trait Automation: Send + Sync {
    type Page: PageHandle + 'static;

    /// 创建一个隔离的浏览上下文
    async fn open_context(&self, profile: &ContextProfile) -> AppResult<ContextHandle>;

    /// 在上下文中打开一个空白页
    async fn open_page(&self, context: &ContextHandle) -> AppResult<Self::Page>;

    /// 销毁浏览上下文
    async fn close_context(&self, context: ContextHandle) -> AppResult<()>;
}

/// 单个标签页的能力
#[async_trait]
pub trait PageHandle: Send + Sync {
    /// 安装请求拦截策略，之后的每个请求都经过 `filter`
    async fn install_filter(&self, filter: ResourceFilter) -> AppResult<()>;

    /// 导航到 `url`，等到 DOM 解析完成即返回
    ///
    /// 超过 `timeout` 返回错误；没有主文档响应时返回 `Ok(None)`。
    async fn navigate(&self, url: &str, timeout: Duration) -> AppResult<Option<NavigationResponse>>;

    /// 执行脚本并返回 JSON 结果
    async fn evaluate(&self, script: &str) -> AppResult<JsonValue>;

    /// 等到 `selector` 对应的元素出现，超过 `timeout` 返回错误
    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> AppResult<()>;

    /// 第一个匹配 `selector` 的元素的 outerHTML
    async fn outer_html(&self, selector: &str) -> AppResult<Option<String>>;

    /// 当前视口尺寸
    async fn viewport(&self) -> AppResult<Option<Viewport>>;

    /// 分 `steps` 步把指针移动到 `(x, y)`
    async fn move_pointer(&self, x: f64, y: f64, steps: u32) -> AppResult<()>;

    /// 滚轮向下滚动 `delta_y` 像素
    async fn scroll_by(&self, delta_y: f64) -> AppResult<()>;

    /// 关闭标签页
    async fn close(&self) -> AppResult<()>;
}
