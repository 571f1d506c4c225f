//! 导航链接数据

use serde::{Deserialize, Serialize};

/// 导航中的一条链接
///
/// `full_url` 是后续所有查找的主键。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDescriptor {
    pub title: String,
    pub href: String,
    pub full_url: String,
}

impl LinkDescriptor {
    pub fn new(title: impl Into<String>, href: impl Into<String>, full_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: href.into(),
            full_url: full_url.into(),
        }
    }
}

/// 导航数据文件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationData {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub generated: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub links: Vec<LinkDescriptor>,
}
