//! 排序状态机与排序控制器
//!
//! 每列独立维护“下一次是否降序”的开关；激活某列时：
//! 1) 所有列的指示器复位为 unsorted（其他列的开关状态不变）
//! 2) 按该列比较器对全部数据行做稳定排序
//! 3) 该列指示器更新为 sorted-up / sorted-down，并翻转开关
use tracing::debug;

use crate::compare::comparator_for;
use crate::error::TableError;
use crate::table::{Row, Table};
use crate::types::ColumnKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// 表头排序指示器的三种互斥状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortIndicator {
    #[default]
    Unsorted,
    SortedUp,
    SortedDown,
}

impl SortIndicator {
    /// 与报告样式表约定的 class 名
    pub fn css_class(&self) -> &'static str {
        match self {
            SortIndicator::Unsorted => "unsorted",
            SortIndicator::SortedUp => "sorted-up",
            SortIndicator::SortedDown => "sorted-down",
        }
    }
}

impl From<SortDirection> for SortIndicator {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => SortIndicator::SortedUp,
            SortDirection::Descending => SortIndicator::SortedDown,
        }
    }
}

/// 单列排序开关
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    next_descending: bool,
}

impl SortState {
    /// 纯状态转移：返回新状态与本次应采用的方向
    pub fn activate(self) -> (SortState, SortDirection) {
        let direction = self.next_direction();
        (SortState { next_descending: !self.next_descending }, direction)
    }

    pub fn next_direction(&self) -> SortDirection {
        if self.next_descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        }
    }
}

/// 按指定列稳定排序；降序为比较结果取反，相等行保持原有相对顺序
pub(crate) fn sort_rows(rows: &mut [Row], column: usize, kind: ColumnKind, direction: SortDirection) {
    let cmp = comparator_for(kind);
    rows.sort_by(|a, b| {
        let ord = cmp(a.cell(column).unwrap_or(""), b.cell(column).unwrap_or(""));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// 排序控制器：每列一个开关 + 一个指示器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortController {
    states: Vec<SortState>,
    indicators: Vec<SortIndicator>,
}

impl SortController {
    pub fn new(columns: usize) -> Self {
        Self {
            states: vec![SortState::default(); columns],
            indicators: vec![SortIndicator::Unsorted; columns],
        }
    }

    /// 复位所有开关与指示器
    pub fn reset(&mut self) {
        self.states.iter_mut().for_each(|s| *s = SortState::default());
        self.reset_indicators();
    }

    fn reset_indicators(&mut self) {
        self.indicators.iter_mut().for_each(|i| *i = SortIndicator::Unsorted);
    }

    pub fn indicator(&self, column: usize) -> Option<SortIndicator> {
        self.indicators.get(column).copied()
    }

    pub fn indicators(&self) -> &[SortIndicator] {
        &self.indicators
    }

    /// 激活某列排序并重排整张表
    pub fn activate(&mut self, table: &mut Table, column: usize) -> Result<SortDirection, TableError> {
        let kind = table.kind(column)?;
        let state = self.states.get(column).copied().ok_or(TableError::ColumnOutOfRange(column))?;
        let (next, direction) = state.activate();

        self.reset_indicators();
        sort_rows(table.rows_mut(), column, kind, direction);

        self.indicators[column] = direction.into();
        self.states[column] = next;
        debug!(column, %kind, ?direction, "rows sorted");
        Ok(direction)
    }
}
