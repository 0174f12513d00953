//! 报告视图：持有表格、排序控制器与过滤行，按事件逐个处理
//!
//! 事件处理均为同步的 `&mut self` 调用，一个事件处理完才会处理下一个。
//! `init` 显式且幂等：指示器全部复位、排序开关复位、按当前控件值重算可见性。
use tracing::{debug, info};

use crate::error::TableError;
use crate::filter::{FilterControl, FilterInput, FilterRow, FilterStats};
use crate::options::ViewConfig;
use crate::sort::{SortController, SortDirection, SortIndicator};
use crate::table::{Row, Table};

/// 用户交互事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// 点击某列的排序指示器
    SortActivated(usize),
    /// 某列过滤控件的值发生变化
    FilterChanged(usize, FilterInput),
}

/// 事件处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOutcome {
    Sorted(SortDirection),
    Filtered(FilterStats),
}

#[derive(Debug, Clone)]
pub struct ReportView {
    table: Table,
    sort: SortController,
    filters: FilterRow,
}

impl ReportView {
    /// 以表格数据自动生成过滤控件
    pub fn new(table: Table) -> Self {
        let filters = FilterRow::for_table(&table);
        Self::assemble(table, filters)
    }

    /// 使用外部给定的过滤控件（需与列类型匹配）
    pub fn with_filters(table: Table, controls: Vec<Option<FilterControl>>) -> Result<Self, TableError> {
        let filters = FilterRow::new(&table, controls)?;
        Ok(Self::assemble(table, filters))
    }

    fn assemble(table: Table, filters: FilterRow) -> Self {
        let sort = SortController::new(table.column_count());
        let mut view = Self { table, sort, filters };
        view.init();
        view
    }

    /// 复位排序状态并按当前过滤值重算可见性；重复调用结果相同
    pub fn init(&mut self) -> FilterStats {
        self.sort.reset();
        let stats = self.filters.apply(&mut self.table);
        debug!(rows = self.table.row_count(), columns = self.table.column_count(), "view initialised");
        stats
    }

    /// 分发单个事件
    pub fn handle(&mut self, event: ViewEvent) -> Result<ViewOutcome, TableError> {
        match event {
            ViewEvent::SortActivated(column) => self.activate_sort(column).map(ViewOutcome::Sorted),
            ViewEvent::FilterChanged(column, input) => self.change_filter(column, input).map(ViewOutcome::Filtered),
        }
    }

    pub fn activate_sort(&mut self, column: usize) -> Result<SortDirection, TableError> {
        self.sort.activate(&mut self.table, column)
    }

    /// 更新一个控件后重建组合谓词并刷新所有行
    pub fn change_filter(&mut self, column: usize, input: FilterInput) -> Result<FilterStats, TableError> {
        self.filters.set_input(column, input)?;
        Ok(self.filters.apply(&mut self.table))
    }

    /// 以文本值更新控件（文本框作为正则，下拉框按选项文本）
    pub fn change_filter_value(&mut self, column: usize, value: &str) -> Result<FilterStats, TableError> {
        self.filters.set_value(column, value)?;
        Ok(self.filters.apply(&mut self.table))
    }

    /// 应用视图配置：先写入全部过滤值，再按顺序激活排序
    /// 任一列名或过滤值无效时返回错误，视图保持原样
    pub fn apply_config(&mut self, config: &ViewConfig) -> Result<(), TableError> {
        let mut filters = self.filters.clone();
        for (name, value) in &config.filters {
            let column = self.table.column_by_name(name)?;
            filters.set_value(column, value)?;
        }
        let sort_columns = config
            .sort
            .iter()
            .map(|name| self.table.column_by_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        self.filters = filters;
        let stats = self.filters.apply(&mut self.table);
        for column in sort_columns {
            self.activate_sort(column)?;
        }
        info!(visible = stats.visible, hidden = stats.hidden, sorts = config.sort.len(), "view config applied");
        Ok(())
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn indicator(&self, column: usize) -> Option<SortIndicator> {
        self.sort.indicator(column)
    }

    pub fn indicators(&self) -> &[SortIndicator] {
        self.sort.indicators()
    }

    pub fn filter(&self, column: usize) -> Option<&FilterControl> {
        self.filters.control(column)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.table.visible_rows()
    }
}
