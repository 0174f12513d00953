//! 表格结构错误
use thiserror::Error;

use crate::types::{ColumnKind, FilterStyle};

/// 表格/视图层面的结构性错误（正则编译失败不在此列，走降级路径）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("row {row} has {found} cells but the header has {expected}")]
    RowWidth { row: usize, expected: usize, found: usize },

    #[error("filter row has {found} controls but the header has {expected} columns")]
    FilterRowWidth { expected: usize, found: usize },

    #[error("column index {0} is out of range")]
    ColumnOutOfRange(usize),

    #[error("column {column} ({kind}) does not take a {style} filter")]
    ControlKind { column: usize, kind: ColumnKind, style: FilterStyle },

    #[error("column {column} has a {style} filter and cannot take that input")]
    InputMismatch { column: usize, style: FilterStyle },

    #[error("column {0} has no filter control")]
    NotFilterable(usize),

    #[error("column {column} offers no option `{value}`")]
    UnknownOption { column: usize, value: String },

    #[error("no column named `{0}`")]
    UnknownColumn(String),
}
