//! 公共类型（对外暴露）
use std::fmt;

/// 列类型：同时决定排序比较器与过滤策略
/// - Location/Message：正则文本过滤
/// - Category/Severity：下拉精确匹配
/// - Generic：无过滤，按字符串比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Location,
    Severity,
    Category,
    Message,
    Generic,
}

impl ColumnKind {
    /// 四个标准列（与报告表头顺序一致）
    pub const STANDARD: [ColumnKind; 4] = [
        ColumnKind::Location,
        ColumnKind::Category,
        ColumnKind::Severity,
        ColumnKind::Message,
    ];

    /// 从表头的列标记解析；未知标记一律归为 Generic
    pub fn from_marker(marker: &str) -> Self {
        match marker.trim().to_ascii_lowercase().as_str() {
            "location" => ColumnKind::Location,
            "severity" => ColumnKind::Severity,
            "category" => ColumnKind::Category,
            "message" => ColumnKind::Message,
            _ => ColumnKind::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Location => "location",
            ColumnKind::Severity => "severity",
            ColumnKind::Category => "category",
            ColumnKind::Message => "message",
            ColumnKind::Generic => "generic",
        }
    }

    /// 该列应使用的过滤控件类型；Generic 列不可过滤
    pub fn filter_style(&self) -> Option<FilterStyle> {
        match self {
            ColumnKind::Location | ColumnKind::Message => Some(FilterStyle::Text),
            ColumnKind::Category | ColumnKind::Severity => Some(FilterStyle::Select),
            ColumnKind::Generic => None,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 过滤控件类型：文本框（正则）或下拉框（精确匹配）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterStyle {
    Text,
    Select,
}

impl fmt::Display for FilterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterStyle::Text => f.write_str("text"),
            FilterStyle::Select => f.write_str("select"),
        }
    }
}
