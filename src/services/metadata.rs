//! 页面元数据提取 - 业务能力层
//!
//! 只负责"从已加载的页面读出标题和描述"，不关心导航与重试。

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::infrastructure::PageHandle;
use crate::models::PageInfo;

/// 描述来源，按优先级从高到低
pub const DESCRIPTION_SELECTORS: [&str; 4] = [
    r#"meta[name="description"]"#,
    r#"meta[property="og:description"]"#,
    r#"meta[name="twitter:description"]"#,
    r#"meta[property="description"]"#,
];

/// 页面内执行的原始读取结果
#[derive(Debug, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    title: Option<String>,
    /// 与 `DESCRIPTION_SELECTORS` 顺序一致的 content 属性
    #[serde(default)]
    candidates: Vec<Option<String>>,
}

/// 生成页面内执行的读取脚本
pub fn extraction_script() -> String {
    let selectors = serde_json::to_string(&DESCRIPTION_SELECTORS).unwrap_or_else(|_| "[]".to_string());
    format!(
        r#"
        (() => {{
            const selectors = {selectors};
            return {{
                title: document.title || "",
                candidates: selectors.map((selector) => {{
                    const element = document.querySelector(selector);
                    return element ? element.getAttribute("content") : null;
                }}),
            }};
        }})()
        "#
    )
}

/// 取第一个去空白后非空的候选
pub fn select_description(candidates: &[Option<String>]) -> String {
    candidates
        .iter()
        .flatten()
        .map(|content| content.trim())
        .find(|content| !content.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// 读取页面标题与描述
pub async fn extract_page_info<P: PageHandle + ?Sized>(page: &P) -> AppResult<PageInfo> {
    let value = page.evaluate(&extraction_script()).await?;
    let raw: RawMetadata =
        serde_json::from_value(value).map_err(|e| AppError::script_failed(format!("元数据格式错误: {}", e)))?;

    Ok(PageInfo {
        title: raw.title.unwrap_or_default().trim().to_string(),
        description: select_description(&raw.candidates),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_name_description_wins() {
        let candidates = vec![some("primary"), some("og"), None, None];
        assert_eq!(select_description(&candidates), "primary");
    }

    #[test]
    fn test_falls_back_to_og_when_name_missing() {
        let candidates = vec![None, some("  from og  "), some("twitter"), None];
        assert_eq!(select_description(&candidates), "from og");
    }

    #[test]
    fn test_blank_content_is_skipped() {
        let candidates = vec![some("   "), some(""), some("twitter card"), None];
        assert_eq!(select_description(&candidates), "twitter card");
    }

    #[test]
    fn test_no_candidates_gives_empty() {
        assert_eq!(select_description(&[None, None, None, None]), "");
        assert_eq!(select_description(&[]), "");
    }

    #[test]
    fn test_script_lists_selectors_in_priority_order() {
        let script = extraction_script();
        let fragments = [
            r#"meta[name=\"description\"]"#,
            r#"meta[property=\"og:description\"]"#,
            r#"meta[name=\"twitter:description\"]"#,
            r#"meta[property=\"description\"]"#,
        ];
        let positions: Vec<usize> = fragments.iter().map(|f| script.find(f).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(script.contains("document.title"));
    }
}
