use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("启动浏览器失败: {source}")]
    LaunchFailed { source: BoxedSource },
    /// 创建或关闭浏览上下文失败
    #[error("浏览上下文操作失败: {source}")]
    ContextFailed { source: BoxedSource },
    /// 创建或关闭页面失败
    #[error("页面操作失败: {source}")]
    PageFailed { source: BoxedSource },
    /// 导航失败
    #[error("导航到 {url} 失败: {reason}")]
    NavigationFailed { url: String, reason: String },
    /// 导航超时
    #[error("导航到 {url} 超时 ({timeout_ms}ms)")]
    NavigationTimeout { url: String, timeout_ms: u64 },
    /// 响应状态码不在成功范围
    #[error("HTTP {status}: {url}")]
    BadStatus { url: String, status: u16 },
    /// 没有收到导航响应
    #[error("未收到导航响应: {url}")]
    NoResponse { url: String },
    /// 执行脚本失败
    #[error("执行脚本失败: {source}")]
    ScriptFailed { source: BoxedSource },
    /// 安装请求拦截失败
    #[error("安装请求拦截失败: {source}")]
    InterceptFailed { source: BoxedSource },
    /// 等待元素超时
    #[error("等待元素 {selector} 超时 ({timeout_ms}ms)")]
    SelectorTimeout { selector: String, timeout_ms: u64 },
    /// 页面上没有目标元素
    #[error("未找到 {selector} 元素在页面 {page}")]
    ElementMissing { selector: String, page: String },
    /// 输入事件派发失败
    #[error("输入事件派发失败: {reason}")]
    InputFailed { reason: String },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed { path: String, source: BoxedSource },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed { path: String, source: BoxedSource },
    /// JSON / TOML 解析失败
    #[error("解析文件失败 ({path}): {source}")]
    ParseFailed { path: String, source: BoxedSource },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 批处理大小必须大于 0
    #[error("batchSize 必须大于 0")]
    InvalidBatchSize,
    /// 导航超时必须大于 0
    #[error("timeout 必须大于 0")]
    InvalidTimeout,
    /// 延迟区间 min > max
    #[error("延迟区间 {name} 无效: min={min} > max={max}")]
    InvalidDelayRange { name: String, min: u64, max: u64 },
    /// 用户代理为空
    #[error("userAgent 不能为空")]
    EmptyUserAgent,
    /// 导航选择器为空
    #[error("navigation.fullSelector 不能为空")]
    EmptySelector,
    /// 不支持的配置文件格式
    #[error("不支持的配置文件格式: {path}")]
    UnsupportedFormat { path: String },
}

// ========== 从常见错误类型转换 ==========

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::File(FileError::ParseFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建浏览器启动错误
    pub fn launch_failed(source: impl Into<BoxedSource>) -> Self {
        AppError::Browser(BrowserError::LaunchFailed {
            source: source.into(),
        })
    }

    /// 创建浏览上下文错误
    pub fn context_failed(source: impl Into<BoxedSource>) -> Self {
        AppError::Browser(BrowserError::ContextFailed {
            source: source.into(),
        })
    }

    /// 创建页面错误
    pub fn page_failed(source: impl Into<BoxedSource>) -> Self {
        AppError::Browser(BrowserError::PageFailed {
            source: source.into(),
        })
    }

    /// 创建脚本执行错误
    pub fn script_failed(source: impl Into<BoxedSource>) -> Self {
        AppError::Browser(BrowserError::ScriptFailed {
            source: source.into(),
        })
    }

    /// 创建导航错误
    pub fn navigation_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            reason: reason.into(),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: source.into(),
        })
    }

    /// 创建文件解析错误
    pub fn file_parse_failed(path: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        AppError::File(FileError::ParseFailed {
            path: path.into(),
            source: source.into(),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: impl Into<BoxedSource>) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: source.into(),
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_status_message_contains_status_and_url() {
        let err = AppError::from(BrowserError::BadStatus {
            url: "https://example.com/docs".to_string(),
            status: 404,
        });
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("https://example.com/docs"));
    }

    #[test]
    fn test_delay_range_message() {
        let err = ConfigError::InvalidDelayRange {
            name: "reading".to_string(),
            min: 10,
            max: 5,
        };
        assert_eq!(err.to_string(), "延迟区间 reading 无效: min=10 > max=5");
    }

    #[test]
    fn test_string_source_boxes_into_error() {
        let err = AppError::script_failed("document is detached");
        assert!(err.to_string().contains("document is detached"));
    }
}
