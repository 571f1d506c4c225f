//! 程序配置
//!
//! 两层配置：
//! - `RuntimePaths`：运行路径，来自环境变量（可被命令行覆盖）
//! - `CrawlConfig`：爬虫参数，来自 JSON / TOML 配置文件，加载时即校验

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 默认用户代理
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 运行路径配置
#[derive(Clone, Debug)]
pub struct RuntimePaths {
    /// 抓取配置文件
    pub crawler_config: PathBuf,
    /// 导航获取配置文件
    pub nav_config: PathBuf,
    /// 导航解析配置文件
    pub parse_config: PathBuf,
    /// 数据目录（导航 JSON、描述 JSON、合并结果）
    pub sources_dir: PathBuf,
    /// 自定义浏览器可执行文件
    pub chrome_executable: Option<PathBuf>,
}

impl Default for RuntimePaths {
    fn default() -> Self {
        Self {
            crawler_config: PathBuf::from("config/fetch-descriptions.config.json"),
            nav_config: PathBuf::from("config/fetch-mastra-nav.config.json"),
            parse_config: PathBuf::from("config/parse-mastra-nav.config.json"),
            sources_dir: PathBuf::from("sources"),
            chrome_executable: None,
        }
    }
}

impl RuntimePaths {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            crawler_config: std::env::var("CRAWLER_CONFIG").map(PathBuf::from).unwrap_or(default.crawler_config),
            nav_config: std::env::var("FETCH_NAV_CONFIG").map(PathBuf::from).unwrap_or(default.nav_config),
            parse_config: std::env::var("PARSE_NAV_CONFIG").map(PathBuf::from).unwrap_or(default.parse_config),
            sources_dir: std::env::var("SOURCES_DIR").map(PathBuf::from).unwrap_or(default.sources_dir),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().filter(|v| !v.is_empty()).map(PathBuf::from),
        }
    }

    /// 数据目录下的文件路径
    pub fn source_file(&self, file_name: &str) -> PathBuf {
        self.sources_dir.join(file_name)
    }
}

/// 毫秒延迟区间 `[min, max]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelayRange {
    pub min: u64,
    pub max: u64,
}

impl DelayRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvalidDelayRange {
                name: name.to_string(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// 各类节奏延迟
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Delays {
    /// 导航前的"思考"时间
    pub thinking: DelayRange,
    /// 页面加载后的"阅读"时间
    pub reading: DelayRange,
    /// 同一批次内打开相邻标签页的间隔
    pub tab_opening: DelayRange,
    /// 批次之间的间隔
    pub batch_interval: DelayRange,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            thinking: DelayRange::new(500, 1500),
            reading: DelayRange::new(1000, 3000),
            tab_opening: DelayRange::new(300, 800),
            batch_interval: DelayRange::new(2000, 5000),
        }
    }
}

/// 重试参数
///
/// 只做解析和校验，抓取流程不会重试导航。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff_ms: 1000,
        }
    }
}

/// 配置文件中的 `crawler` 段（未校验）
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawCrawlerSection {
    batch_size: usize,
    timeout: u64,
    headless: bool,
    user_agent: String,
    delays: Delays,
    retries: RetryConfig,
}

impl Default for RawCrawlerSection {
    fn default() -> Self {
        Self {
            batch_size: 5,
            timeout: 30_000,
            headless: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            delays: Delays::default(),
            retries: RetryConfig::default(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInput {
    navigation_file: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutput {
    descriptions_file: String,
}

impl Default for RawInput {
    fn default() -> Self {
        Self {
            navigation_file: "mastra-nav.json".to_string(),
        }
    }
}

impl Default for RawOutput {
    fn default() -> Self {
        Self {
            descriptions_file: "mastra-descriptions.json".to_string(),
        }
    }
}

/// 配置文件整体结构（未校验）
#[derive(Clone, Debug, Deserialize)]
pub struct RawFetchConfig {
    #[serde(default)]
    name: String,
    #[serde(default)]
    input: RawInput,
    #[serde(default)]
    output: RawOutput,
    #[serde(default)]
    crawler: RawCrawlerSection,
}

/// 抓取参数，运行期间不可变
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlConfig {
    /// 每批并发处理的链接数
    pub batch_size: usize,
    /// 单次导航的超时时间（毫秒）
    pub navigation_timeout_ms: u64,
    pub headless: bool,
    pub user_agent: String,
    pub delays: Delays,
    pub retries: RetryConfig,
}

impl CrawlConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// 校验各项取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize);
        }
        if self.navigation_timeout_ms == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        self.delays.thinking.validate("thinking")?;
        self.delays.reading.validate("reading")?;
        self.delays.tab_opening.validate("tabOpening")?;
        self.delays.batch_interval.validate("batchInterval")?;
        Ok(())
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        let raw = RawCrawlerSection::default();
        Self {
            batch_size: raw.batch_size,
            navigation_timeout_ms: raw.timeout,
            headless: raw.headless,
            user_agent: raw.user_agent,
            delays: raw.delays,
            retries: raw.retries,
        }
    }
}

/// 校验后的抓取任务配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchConfig {
    pub name: String,
    pub navigation_file: String,
    pub descriptions_file: String,
    pub crawler: CrawlConfig,
}

impl RawFetchConfig {
    /// 校验并转换为强类型配置
    pub fn validate(self) -> Result<FetchConfig, ConfigError> {
        let crawler = CrawlConfig {
            batch_size: self.crawler.batch_size,
            navigation_timeout_ms: self.crawler.timeout,
            headless: self.crawler.headless,
            user_agent: self.crawler.user_agent,
            delays: self.crawler.delays,
            retries: self.crawler.retries,
        };
        crawler.validate()?;

        Ok(FetchConfig {
            name: self.name,
            navigation_file: self.input.navigation_file,
            descriptions_file: self.output.descriptions_file,
            crawler,
        })
    }
}

/// 导航获取配置
///
/// `docsUrls` 按页面名排序处理，页面名同时是输出文件名。
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNavConfig {
    #[serde(default)]
    pub name: String,
    pub docs_urls: BTreeMap<String, String>,
    pub navigation: NavElement,
    pub output: FetchNavOutput,
    #[serde(default)]
    pub crawler: FetchNavCrawler,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavElement {
    /// 导航根元素的完整选择器
    pub full_selector: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNavOutput {
    pub html_folder: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FetchNavCrawler {
    /// 页面加载超时（毫秒）
    pub timeout: u64,
    pub user_agent: String,
}

impl Default for FetchNavCrawler {
    fn default() -> Self {
        Self {
            timeout: 30_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchNavConfig {
    pub fn page_timeout(&self) -> Duration {
        Duration::from_millis(self.crawler.timeout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawler.timeout == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(ConfigError::EmptyUserAgent);
        }
        if self.navigation.full_selector.trim().is_empty() {
            return Err(ConfigError::EmptySelector);
        }
        Ok(())
    }
}

/// 导航解析配置
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseNavConfig {
    pub name: String,
    pub base_url: String,
    pub input: ParseNavInput,
    pub output: ParseNavOutput,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseNavInput {
    pub html_folder: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseNavOutput {
    pub json_file: String,
}

/// 配置文件格式，按扩展名判断
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}
