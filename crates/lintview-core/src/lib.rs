//! 静态分析报告表格的排序与过滤核心库
//!
//! 设计要点：
//! - 列类型为枚举（`ColumnKind`），比较器与过滤策略都按枚举分派，不做字符串判断。
//! - 排序开关是每列一个的显式状态（`SortState`），通过纯函数转移。
//! - 排序为稳定排序；相同键的行保持原有相对顺序。
//! - 过滤正则编译失败不报错：该列退化为匹配全部，并在控件上标记 invalid。
//! - 所有事件同步处理，一次一个（`ReportView::handle`）。

mod compare;
mod error;
mod filter;
mod findings;
mod options;
mod output;
mod sort;
mod table;
mod types;
mod view;

pub use compare::{
    compare_generic, compare_locations, compare_severity, comparator_for, locale_compare, severity_rank,
    Comparator, SEVERITY_ORDER,
};
pub use error::TableError;
pub use filter::{CombinedPredicate, FilterControl, FilterInput, FilterRow, FilterStats, NO_FILTER_OPTION};
pub use findings::{load_findings, load_findings_as, parse_xml_report, Finding};
pub use options::{InputFormat, OutputFormat, ViewConfig};
pub use output::write_visible_rows;
pub use sort::{SortController, SortDirection, SortIndicator, SortState};
pub use table::{HeaderCell, Row, Table};
pub use types::{ColumnKind, FilterStyle};
pub use view::{ReportView, ViewEvent, ViewOutcome};
