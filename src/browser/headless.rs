use std::path::Path;

use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};

/// 启动参数：隐藏自动化特征，容器环境下禁用沙盒与共享内存
const LAUNCH_ARGS: [&str; 3] = [
    "--disable-blink-features=AutomationControlled",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
];

/// 一次运行独占的浏览器进程
///
/// 事件循环在后台任务中驱动，`shutdown` 负责关闭进程并回收任务。
pub struct BrowserSession {
    pub(crate) browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    /// 启动浏览器
    pub async fn launch(headless: bool, executable: Option<&Path>) -> AppResult<Self> {
        info!("🚀 启动浏览器 (headless: {})...", headless);

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1920, 1080)
            .args(LAUNCH_ARGS);
        builder = if headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };
        if let Some(path) = executable {
            debug!("浏览器路径: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        let browser_config = builder.build().map_err(|e| {
            error!("配置浏览器失败: {}", e);
            AppError::launch_failed(e)
        })?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            error!("启动浏览器失败: {}", e);
            AppError::launch_failed(e)
        })?;
        debug!("浏览器启动成功");

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(tokio::time::Duration::from_millis(300)).await;

        Ok(Self { browser, handler_task })
    }

    /// 关闭浏览器进程；出错只记录日志
    pub async fn shutdown(mut self) {
        info!("🧹 关闭浏览器...");
        if let Err(e) = self.browser.close().await {
            warn!("⚠️  关闭浏览器出错: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            debug!("等待浏览器进程退出出错: {}", e);
        }
        self.handler_task.abort();
        info!("✅ 浏览器已关闭");
    }
}
