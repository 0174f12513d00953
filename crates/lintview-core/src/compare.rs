//! 按列类型选择的比较器
//!
//! 所有比较器都是纯函数：同样输入总得到同样的 `Ordering`，不读写任何外部状态。
//! - location：文件路径按区域化规则比较，相同时按行号数值比较
//! - severity：固定顺序 error < warning < information < style，未知值排在最后
//! - 其他：整段文本按区域化规则比较
use std::cmp::Ordering;

use unicase::UniCase;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::ColumnKind;

/// 单元格文本比较函数
pub type Comparator = fn(&str, &str) -> Ordering;

/// 严重级别的升序排列（error 最先）
pub const SEVERITY_ORDER: [&str; 4] = ["error", "warning", "information", "style"];

/// 根据列类型选择比较器
pub fn comparator_for(kind: ColumnKind) -> Comparator {
    match kind {
        ColumnKind::Location => compare_locations,
        ColumnKind::Severity => compare_severity,
        ColumnKind::Category | ColumnKind::Message | ColumnKind::Generic => compare_generic,
    }
}

/// 区域化字符串比较，分三级：
/// 1) 去掉变音符号并忽略大小写（"é" 与 "e" 同级，排在 "f" 之前）
/// 2) 忽略大小写，无变音符号的在前
/// 3) 仅大小写不同时小写在前
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    UniCase::new(base_letters(a))
        .cmp(&UniCase::new(base_letters(b)))
        .then_with(|| UniCase::new(a).cmp(&UniCase::new(b)))
        .then_with(|| b.cmp(a))
}

/// NFD 分解后丢弃组合用变音符号
fn base_letters(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

pub fn compare_generic(a: &str, b: &str) -> Ordering {
    locale_compare(a, b)
}

/// 比较 `"<文件路径>:<行号>..."` 形式的位置
/// 行号无法解析的条目排在同一文件所有可解析条目之后，彼此视为相等
pub fn compare_locations(a: &str, b: &str) -> Ordering {
    let (file_a, line_a) = split_location(a);
    let (file_b, line_b) = split_location(b);

    locale_compare(file_a, file_b).then_with(|| known_first(line_a, line_b))
}

/// 比较严重级别；未知级别排在所有已知级别之后
pub fn compare_severity(a: &str, b: &str) -> Ordering {
    known_first(severity_rank(a), severity_rank(b))
}

/// 严重级别在 SEVERITY_ORDER 中的位置（精确匹配）
pub fn severity_rank(severity: &str) -> Option<usize> {
    SEVERITY_ORDER.iter().position(|s| *s == severity)
}

/// 以第一个 `:` 切分出文件路径与行号
pub(crate) fn split_location(location: &str) -> (&str, Option<i64>) {
    match location.split_once(':') {
        Some((file, rest)) => (file, parse_line_number(rest)),
        None => (location, None),
    }
}

/// 取开头的可选符号与连续数字作为行号（"12:5" -> 12，"7 col" -> 7，"+5" -> 5）
fn parse_line_number(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign = usize::from(s.starts_with(['+', '-']));
    let end = s[sign..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(s.len(), |i| i + sign);
    s[..end].parse().ok()
}

/// 有值的排在前面；两者都有值时按值比较
fn known_first<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
