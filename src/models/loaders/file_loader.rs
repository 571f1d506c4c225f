use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::config::{ConfigFormat, FetchConfig, FetchNavConfig, ParseNavConfig, RawFetchConfig};
use crate::error::{AppError, FileError};
use crate::models::link::NavigationData;

/// 读取文件内容，文件不存在时返回 `FileError::NotFound`
async fn read_text(path: &Path) -> Result<String> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(AppError::File(FileError::NotFound {
            path: path.display().to_string(),
        })
        .into());
    }

    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path.display().to_string(), e).into())
}

/// 从 JSON 文件加载并反序列化
pub async fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = read_text(path).await?;
    let value = serde_json::from_str(&content)
        .map_err(|e| AppError::file_parse_failed(path.display().to_string(), e))?;
    Ok(value)
}

/// 按扩展名选择 JSON 或 TOML 解析
async fn load_config_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let format = ConfigFormat::from_path(path).map_err(AppError::from)?;
    let content = read_text(path).await?;

    let value = match format {
        ConfigFormat::Json => serde_json::from_str(&content)
            .map_err(|e| AppError::file_parse_failed(path.display().to_string(), e))?,
        ConfigFormat::Toml => toml::from_str(&content)
            .map_err(|e| AppError::file_parse_failed(path.display().to_string(), e))?,
    };
    Ok(value)
}

/// 加载并校验抓取配置
pub async fn load_fetch_config(path: &Path) -> Result<FetchConfig> {
    let raw: RawFetchConfig = load_config_file(path)
        .await
        .with_context(|| format!("无法加载配置文件: {}", path.display()))?;

    let config = raw
        .validate()
        .map_err(AppError::from)
        .with_context(|| format!("配置文件校验失败: {}", path.display()))?;

    tracing::debug!("配置加载完成: {:?}", config);
    Ok(config)
}

/// 加载并校验导航获取配置
pub async fn load_fetch_nav_config(path: &Path) -> Result<FetchNavConfig> {
    let config: FetchNavConfig = load_config_file(path)
        .await
        .with_context(|| format!("无法加载导航获取配置: {}", path.display()))?;

    config
        .validate()
        .map_err(AppError::from)
        .with_context(|| format!("配置文件校验失败: {}", path.display()))?;
    Ok(config)
}

/// 加载导航解析配置
pub async fn load_parse_nav_config(path: &Path) -> Result<ParseNavConfig> {
    load_config_file(path)
        .await
        .with_context(|| format!("无法加载导航解析配置: {}", path.display()))
}

/// 加载导航数据
pub async fn load_navigation_data(path: &Path) -> Result<NavigationData> {
    let nav: NavigationData = load_json_file(path)
        .await
        .with_context(|| format!("无法加载导航数据: {}", path.display()))?;

    tracing::info!("成功加载 {} 个链接", nav.links.len());
    Ok(nav)
}

/// 以缩进格式写出 JSON，必要时创建父目录
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::file_write_failed(parent.display().to_string(), e))?;
    }

    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;
    Ok(())
}
