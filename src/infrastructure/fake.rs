//! 测试用的内存浏览器
//!
//! 按 URL 预设页面行为（状态码、标题、meta 内容、脚本错误、panic、耗时），
//! 并记录上下文/页面的生命周期事件与被路由的请求。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value as JsonValue};

use crate::config::DelayRange;
use crate::error::{AppError, AppResult, BrowserError};
use crate::infrastructure::automation::{
    Automation, ContextHandle, ContextProfile, NavigationResponse, PageHandle, ResourceFilter, ResourceKind,
    Viewport,
};
use crate::infrastructure::randomness::RandomSource;

/// 单个 URL 的预设行为
#[derive(Debug, Clone)]
pub struct ScriptedPage {
    pub status: Option<u16>,
    pub title: String,
    /// 与描述选择器一一对应的 content 值
    pub metas: Vec<Option<String>>,
    pub navigation_error: bool,
    pub eval_error: bool,
    pub eval_panic: bool,
    pub input_error: bool,
    pub load_time: Duration,
    /// 导航元素的 outerHTML，`None` 表示页面上没有该元素
    pub nav_html: Option<String>,
    /// 导航元素在加载完成后多久出现
    pub nav_delay: Duration,
}

impl ScriptedPage {
    pub fn ok(title: &str) -> Self {
        Self {
            status: Some(200),
            title: title.to_string(),
            metas: Vec::new(),
            navigation_error: false,
            eval_error: false,
            eval_panic: false,
            input_error: false,
            load_time: Duration::from_millis(100),
            nav_html: None,
            nav_delay: Duration::ZERO,
        }
    }

    /// 带导航元素的页面
    pub fn with_nav(mut self, html: &str) -> Self {
        self.nav_html = Some(html.to_string());
        self
    }

    pub fn with_nav_delay(mut self, delay: Duration) -> Self {
        self.nav_delay = delay;
        self
    }

    pub fn with_status(mut self, status: Option<u16>) -> Self {
        self.status = status;
        self
    }

    pub fn with_metas(mut self, metas: &[Option<&str>]) -> Self {
        self.metas = metas.iter().map(|m| m.map(str::to_string)).collect();
        self
    }

    pub fn with_load_time(mut self, load_time: Duration) -> Self {
        self.load_time = load_time;
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.navigation_error = true;
        self
    }

    pub fn failing_eval(mut self) -> Self {
        self.eval_error = true;
        self
    }

    pub fn panicking_eval(mut self) -> Self {
        self.eval_panic = true;
        self
    }

    pub fn failing_input(mut self) -> Self {
        self.input_error = true;
        self
    }
}

/// 生命周期事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ContextOpened(String),
    ContextClosed(String),
    PageOpened(usize),
    PageClosed(usize),
    Navigated(String),
    Extracted(String),
    PointerMoved { steps: u32 },
    Scrolled(i64),
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub events: Vec<Event>,
    /// (资源类型, 是否被拦截)
    pub routed: Vec<(ResourceKind, bool)>,
    next_context: usize,
    next_page: usize,
    in_flight: usize,
    pub max_in_flight: usize,
}

/// 内存浏览器
#[derive(Clone, Default)]
pub struct FakeAutomation {
    scripts: Arc<HashMap<String, ScriptedPage>>,
    pub state: Arc<Mutex<FakeState>>,
    fail_contexts: bool,
    open_delay: Duration,
}

impl FakeAutomation {
    pub fn new(scripts: impl IntoIterator<Item = (String, ScriptedPage)>) -> Self {
        Self {
            scripts: Arc::new(scripts.into_iter().collect()),
            state: Arc::default(),
            fail_contexts: false,
            open_delay: Duration::ZERO,
        }
    }

    /// 每次打开标签页耗时 `delay`
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    /// 所有上下文都创建失败
    pub fn with_failing_contexts(mut self) -> Self {
        self.fail_contexts = true;
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn routed(&self) -> Vec<(ResourceKind, bool)> {
        self.state.lock().unwrap().routed.clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    fn record(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }
}

#[async_trait]
impl Automation for FakeAutomation {
    type Page = FakePage;

    async fn open_context(&self, profile: &ContextProfile) -> AppResult<ContextHandle> {
        if self.fail_contexts {
            return Err(AppError::context_failed("context quota exceeded"));
        }
        let id = {
            let mut state = self.state.lock().unwrap();
            state.next_context += 1;
            format!("ctx-{}", state.next_context)
        };
        self.record(Event::ContextOpened(id.clone()));
        Ok(ContextHandle {
            id,
            profile: profile.clone(),
        })
    }

    async fn open_page(&self, _context: &ContextHandle) -> AppResult<FakePage> {
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        let id = {
            let mut state = self.state.lock().unwrap();
            state.next_page += 1;
            state.next_page
        };
        self.record(Event::PageOpened(id));
        Ok(FakePage {
            id,
            automation: self.clone(),
            filter: Mutex::new(None),
            current: Mutex::new(None),
            url: Mutex::new(String::new()),
        })
    }

    async fn close_context(&self, context: ContextHandle) -> AppResult<()> {
        self.record(Event::ContextClosed(context.id));
        Ok(())
    }
}

/// 内存标签页
pub struct FakePage {
    id: usize,
    automation: FakeAutomation,
    filter: Mutex<Option<ResourceFilter>>,
    current: Mutex<Option<ScriptedPage>>,
    url: Mutex<String>,
}

impl FakePage {
    fn current(&self) -> AppResult<ScriptedPage> {
        self.current
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AppError::script_failed("页面尚未导航"))
    }

    /// 页面加载时发出的请求
    fn route_requests(&self) {
        let filter = *self.filter.lock().unwrap();
        if let Some(filter) = filter {
            let mut state = self.automation.state.lock().unwrap();
            for kind in [
                ResourceKind::Document,
                ResourceKind::Script,
                ResourceKind::Stylesheet,
                ResourceKind::Image,
                ResourceKind::Font,
                ResourceKind::Media,
                ResourceKind::Xhr,
            ] {
                state.routed.push((kind, filter(kind)));
            }
        }
    }
}

#[async_trait]
impl PageHandle for FakePage {
    async fn install_filter(&self, filter: ResourceFilter) -> AppResult<()> {
        *self.filter.lock().unwrap() = Some(filter);
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> AppResult<Option<NavigationResponse>> {
        self.automation.record(Event::Navigated(url.to_string()));
        let script = self
            .automation
            .scripts
            .get(url)
            .cloned()
            .unwrap_or_else(|| ScriptedPage::ok("").with_status(Some(404)));

        {
            let mut state = self.automation.state.lock().unwrap();
            state.in_flight += 1;
            state.max_in_flight = state.max_in_flight.max(state.in_flight);
        }
        let load = tokio::time::timeout(timeout, tokio::time::sleep(script.load_time)).await;
        self.automation.state.lock().unwrap().in_flight -= 1;

        if load.is_err() {
            return Err(AppError::navigation_failed(url, "timeout"));
        }
        if script.navigation_error {
            return Err(AppError::navigation_failed(url, "net::ERR_CONNECTION_RESET"));
        }

        self.route_requests();
        let status = script.status;
        *self.current.lock().unwrap() = Some(script);
        *self.url.lock().unwrap() = url.to_string();
        Ok(status.map(|status| NavigationResponse { status }))
    }

    async fn evaluate(&self, _script: &str) -> AppResult<JsonValue> {
        let page = self.current()?;
        if page.eval_panic {
            panic!("evaluation crashed for page {}", self.id);
        }
        if page.eval_error {
            return Err(AppError::script_failed("Execution context was destroyed"));
        }
        let url = self.url.lock().unwrap().clone();
        self.automation.record(Event::Extracted(url));
        Ok(json!({
            "title": page.title,
            "candidates": page.metas,
        }))
    }

    async fn viewport(&self) -> AppResult<Option<Viewport>> {
        Ok(Some(Viewport {
            width: 1920.0,
            height: 1080.0,
        }))
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> AppResult<()> {
        let page = self.current()?;
        match page.nav_html {
            Some(_) if page.nav_delay <= timeout => {
                tokio::time::sleep(page.nav_delay).await;
                Ok(())
            }
            _ => {
                tokio::time::sleep(timeout).await;
                Err(AppError::Browser(BrowserError::SelectorTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                }))
            }
        }
    }

    async fn outer_html(&self, _selector: &str) -> AppResult<Option<String>> {
        Ok(self.current()?.nav_html)
    }

    async fn move_pointer(&self, _x: f64, _y: f64, steps: u32) -> AppResult<()> {
        if self.current()?.input_error {
            return Err(AppError::script_failed("Input.dispatchMouseEvent failed"));
        }
        self.automation.record(Event::PointerMoved { steps });
        Ok(())
    }

    async fn scroll_by(&self, delta_y: f64) -> AppResult<()> {
        self.automation.record(Event::Scrolled(delta_y as i64));
        Ok(())
    }

    async fn close(&self) -> AppResult<()> {
        self.automation.record(Event::PageClosed(self.id));
        Ok(())
    }
}

/// 返回确定值并记录所有延迟请求的随机源
pub struct RecordingRandom {
    /// `chance` 的返回值
    pub roll: bool,
    pub requested: Mutex<Vec<DelayRange>>,
}

impl RecordingRandom {
    pub fn new(roll: bool) -> Self {
        Self {
            roll,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested(&self) -> Vec<DelayRange> {
        self.requested.lock().unwrap().clone()
    }

    pub fn count(&self, range: DelayRange) -> usize {
        self.requested().into_iter().filter(|r| *r == range).count()
    }
}

impl RandomSource for RecordingRandom {
    fn delay(&self, range: DelayRange) -> Duration {
        self.requested.lock().unwrap().push(range);
        Duration::from_millis(range.min)
    }

    fn int_in(&self, low: u32, _high: u32) -> u32 {
        low
    }

    fn float_below(&self, upper: f64) -> f64 {
        upper / 2.0
    }

    fn chance(&self, _p: f64) -> bool {
        self.roll
    }
}
