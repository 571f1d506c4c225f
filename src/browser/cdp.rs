//! DevTools 协议实现
//!
//! - 浏览上下文：`Target.createBrowserContext` / `Target.disposeBrowserContext`
//! - 请求拦截：`Fetch.enable` + `Fetch.requestPaused`
//! - 导航状态：`Network.responseReceived` 中的主文档响应

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::emulation::{SetDeviceMetricsOverrideParams, SetUserAgentOverrideParams};
use chromiumoxide::cdp::browser_protocol::fetch::{
    self, ContinueRequestParams, EventRequestPaused, FailRequestParams, RequestPattern, RequestStage,
};
use chromiumoxide::cdp::browser_protocol::input::{DispatchMouseEventParams, DispatchMouseEventType};
use chromiumoxide::cdp::browser_protocol::network::{self, ErrorReason, EventResponseReceived, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::{EventDomContentEventFired, NavigateParams};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::browser::headless::BrowserSession;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::{
    Automation, ContextHandle, ContextProfile, NavigationResponse, PageHandle, ResourceFilter, ResourceKind, Viewport,
};

/// 等待元素时的轮询间隔
const SELECTOR_POLL: Duration = Duration::from_millis(100);

const VIEWPORT_SCRIPT: &str = "({ width: window.innerWidth, height: window.innerHeight })";

#[async_trait]
impl Automation for BrowserSession {
    type Page = CdpPage;

    async fn open_context(&self, profile: &ContextProfile) -> AppResult<ContextHandle> {
        let created = self
            .browser
            .execute(CreateBrowserContextParams::default())
            .await
            .map_err(AppError::context_failed)?;

        Ok(ContextHandle {
            id: created.result.browser_context_id.inner().clone(),
            profile: profile.clone(),
        })
    }

    async fn open_page(&self, context: &ContextHandle) -> AppResult<CdpPage> {
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(BrowserContextId::new(context.id.clone()))
            .build()
            .map_err(AppError::page_failed)?;
        let page = self.browser.new_page(params).await.map_err(AppError::page_failed)?;

        if let Err(e) = apply_profile(&page, &context.profile).await {
            if let Err(close_err) = page.clone().close().await {
                debug!("关闭未就绪的页面出错: {}", close_err);
            }
            return Err(e);
        }

        Ok(CdpPage::new(page))
    }

    async fn close_context(&self, context: ContextHandle) -> AppResult<()> {
        self.browser
            .execute(DisposeBrowserContextParams::new(BrowserContextId::new(context.id)))
            .await
            .map_err(AppError::context_failed)?;
        Ok(())
    }
}

/// 给新页面设置 UA、视口并开启网络事件
async fn apply_profile(page: &Page, profile: &ContextProfile) -> AppResult<()> {
    page.execute(SetUserAgentOverrideParams::new(profile.user_agent.clone()))
        .await
        .map_err(AppError::page_failed)?;
    page.execute(SetDeviceMetricsOverrideParams::new(
        i64::from(profile.viewport_width),
        i64::from(profile.viewport_height),
        1.0,
        false,
    ))
    .await
    .map_err(AppError::page_failed)?;
    page.execute(network::EnableParams::default())
        .await
        .map_err(AppError::page_failed)?;
    Ok(())
}

/// DevTools 协议下的标签页
pub struct CdpPage {
    page: Page,
    /// 指针当前位置，用于插值移动
    pointer: Mutex<(f64, f64)>,
    interceptor: Mutex<Option<JoinHandle<()>>>,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            pointer: Mutex::new((0.0, 0.0)),
            interceptor: Mutex::new(None),
        }
    }

    pub fn inner(&self) -> &Page {
        &self.page
    }

    fn replace_interceptor(&self, task: Option<JoinHandle<()>>) {
        let previous = match self.interceptor.lock() {
            Ok(mut slot) => std::mem::replace(&mut *slot, task),
            Err(poisoned) => std::mem::replace(&mut *poisoned.into_inner(), task),
        };
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    fn pointer(&self) -> (f64, f64) {
        match self.pointer.lock() {
            Ok(position) => *position,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn set_pointer(&self, position: (f64, f64)) {
        match self.pointer.lock() {
            Ok(mut slot) => *slot = position,
            Err(poisoned) => *poisoned.into_inner() = position,
        }
    }

    async fn dispatch_mouse(&self, params: DispatchMouseEventParams) -> AppResult<()> {
        self.page
            .execute(params)
            .await
            .map_err(|e| AppError::Browser(BrowserError::InputFailed { reason: e.to_string() }))?;
        Ok(())
    }

    /// 导航并等待主文档响应和 DOMContentLoaded
    async fn load(&self, url: &str) -> AppResult<Option<NavigationResponse>> {
        // 先订阅再导航，避免丢事件
        let mut responses = self.page.event_listener::<EventResponseReceived>().await?;
        let mut dom_ready = self.page.event_listener::<EventDomContentEventFired>().await?;

        let navigated = self
            .page
            .execute(NavigateParams::new(url))
            .await
            .map_err(|e| AppError::navigation_failed(url, e.to_string()))?;
        if let Some(reason) = navigated.result.error_text.clone() {
            return Err(AppError::navigation_failed(url, reason));
        }
        let loader_id = navigated.result.loader_id.clone();

        let mut status = None;
        while let Some(event) = responses.next().await {
            let same_load = loader_id.as_ref().map_or(true, |id| *id == event.loader_id);
            if same_load && event.r#type == ResourceType::Document {
                status = u16::try_from(event.response.status).ok();
                break;
            }
        }
        dom_ready.next().await;

        Ok(status.map(|status| NavigationResponse { status }))
    }
}

#[async_trait]
impl PageHandle for CdpPage {
    async fn install_filter(&self, filter: ResourceFilter) -> AppResult<()> {
        let intercept_failed = |e: chromiumoxide::error::CdpError| {
            AppError::Browser(BrowserError::InterceptFailed { source: Box::new(e) })
        };

        let mut paused = self
            .page
            .event_listener::<EventRequestPaused>()
            .await
            .map_err(intercept_failed)?;
        self.page
            .execute(fetch::EnableParams {
                patterns: Some(vec![RequestPattern {
                    url_pattern: Some("*".to_string()),
                    resource_type: None,
                    request_stage: Some(RequestStage::Request),
                }]),
                handle_auth_requests: None,
            })
            .await
            .map_err(intercept_failed)?;

        let page = self.page.clone();
        let task = tokio::spawn(async move {
            while let Some(event) = paused.next().await {
                let kind = ResourceKind::parse(event.resource_type.as_ref());
                let routed = if filter(kind) {
                    page.execute(FailRequestParams::new(
                        event.request_id.clone(),
                        ErrorReason::BlockedByClient,
                    ))
                    .await
                    .map(|_| ())
                } else {
                    page.execute(ContinueRequestParams::new(event.request_id.clone()))
                        .await
                        .map(|_| ())
                };
                if let Err(e) = routed {
                    debug!("请求路由失败 ({:?}): {}", kind, e);
                }
            }
        });
        self.replace_interceptor(Some(task));
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> AppResult<Option<NavigationResponse>> {
        tokio::time::timeout(timeout, self.load(url)).await.map_err(|_| {
            AppError::Browser(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        })?
    }

    async fn evaluate(&self, script: &str) -> AppResult<JsonValue> {
        let result = self.page.evaluate(script.to_string()).await.map_err(AppError::script_failed)?;
        result.into_value().map_err(AppError::script_failed)
    }

    async fn viewport(&self) -> AppResult<Option<Viewport>> {
        #[derive(Deserialize)]
        struct Size {
            width: f64,
            height: f64,
        }

        let size: Size = serde_json::from_value(self.evaluate(VIEWPORT_SCRIPT).await?)?;
        if size.width <= 0.0 || size.height <= 0.0 {
            return Ok(None);
        }
        Ok(Some(Viewport {
            width: size.width,
            height: size.height,
        }))
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        let poll = async {
            while self.page.find_element(selector).await.is_err() {
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        };
        tokio::time::timeout(timeout, poll).await.map_err(|_| {
            AppError::Browser(BrowserError::SelectorTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            })
        })
    }

    async fn outer_html(&self, selector: &str) -> AppResult<Option<String>> {
        match self.page.find_element(selector).await {
            Ok(element) => element.outer_html().await.map_err(AppError::script_failed),
            Err(_) => Ok(None),
        }
    }

    async fn move_pointer(&self, x: f64, y: f64, steps: u32) -> AppResult<()> {
        let (from_x, from_y) = self.pointer();
        let steps = steps.max(1);
        for step in 1..=steps {
            let t = f64::from(step) / f64::from(steps);
            let params = DispatchMouseEventParams::new(
                DispatchMouseEventType::MouseMoved,
                from_x + (x - from_x) * t,
                from_y + (y - from_y) * t,
            );
            self.dispatch_mouse(params).await?;
        }
        self.set_pointer((x, y));
        Ok(())
    }

    async fn scroll_by(&self, delta_y: f64) -> AppResult<()> {
        let (x, y) = self.pointer();
        let params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(x)
            .y(y)
            .delta_x(0.0)
            .delta_y(delta_y)
            .build()
            .map_err(|reason| AppError::Browser(BrowserError::InputFailed { reason }))?;
        self.dispatch_mouse(params).await
    }

    async fn close(&self) -> AppResult<()> {
        self.replace_interceptor(None);
        if let Err(e) = self.page.clone().close().await {
            warn!("⚠️  关闭标签页出错: {}", e);
            return Err(AppError::page_failed(e));
        }
        Ok(())
    }
}
