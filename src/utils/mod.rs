pub mod logging;

pub use logging::truncate_text;

/// 当前 UTC 时间，ISO-8601 格式（毫秒精度）
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
