use chrono::{DateTime, Utc};
use handlebars::{Handlebars, JsonValue, handlebars_helper};

/// 将 RFC 3339 时间转换为便于阅读的 UTC 格式，例如 `17 Oct 2026 at 09:30`
pub fn format_human_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string())
        .unwrap_or_default()
}

handlebars_helper!(human_date: |ts: str| format_human_date(ts));
handlebars_helper!(eq: |a: JsonValue, b: JsonValue| a == b);

/// 注册所有模板共用的辅助函数
pub fn register_helpers(registry: &mut Handlebars<'static>) {
    registry.register_helper("human_date", Box::new(human_date));
    registry.register_helper("eq", Box::new(eq));
}
