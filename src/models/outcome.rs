//! 单个页面的处理结果

use serde::{Deserialize, Serialize};

/// 页面元数据
///
/// 失败时两个字段都是空字符串，下游依赖这个结构始终完整。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub title: String,
    pub description: String,
}

impl PageInfo {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// 页面处理结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOutcome {
    pub url: String,
    pub success: bool,
    pub data: PageInfo,
}

impl PageOutcome {
    pub fn success(url: impl Into<String>, data: PageInfo) -> Self {
        Self {
            url: url.into(),
            success: true,
            data,
        }
    }

    /// 失败结果，数据为空
    pub fn failure(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            success: false,
            data: PageInfo::default(),
        }
    }
}
