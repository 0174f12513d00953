//! 过滤控件、谓词构建与过滤控制器
//!
//! - 文本控件（location/message）：内容按正则编译，非锚定匹配；空串匹配全部；
//!   编译失败时该列退化为匹配全部，并在控件上标记 invalid，不向外抛错
//! - 下拉控件（category/severity）：第 0 项为“不过滤”，其余选项要求单元格全文相等
//! - 组合谓词：各列谓词逻辑与，遇到第一个不满足的列即短路
use regex::Regex;
use tracing::{debug, warn};

use crate::compare::comparator_for;
use crate::error::TableError;
use crate::table::{Row, Table};
use crate::types::FilterStyle;

/// 下拉框第 0 项（不过滤）的显示文本
pub const NO_FILTER_OPTION: &str = "(all)";

/// 单列过滤控件的当前值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterControl {
    Text { pattern: String, invalid: bool },
    Select { options: Vec<String>, selected: usize },
}

impl FilterControl {
    pub fn text() -> Self {
        FilterControl::Text { pattern: String::new(), invalid: false }
    }

    /// 构造下拉框；会在最前面补上“不过滤”项
    pub fn select<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut options = vec![NO_FILTER_OPTION.to_string()];
        options.extend(values.into_iter().map(Into::into));
        FilterControl::Select { options, selected: 0 }
    }

    /// 按列类型为表格生成控件；下拉选项取该列去重后的值，并用该列比较器排序
    pub fn for_column(table: &Table, column: usize) -> Option<Self> {
        let kind = table.kind(column).ok()?;
        match kind.filter_style()? {
            FilterStyle::Text => Some(Self::text()),
            FilterStyle::Select => {
                let mut values: Vec<&str> = table.column_values(column).collect();
                let cmp = comparator_for(kind);
                values.sort_by(|a, b| cmp(a, b).then_with(|| a.cmp(b)));
                values.dedup();
                Some(Self::select(values))
            }
        }
    }

    pub fn style(&self) -> FilterStyle {
        match self {
            FilterControl::Text { .. } => FilterStyle::Text,
            FilterControl::Select { .. } => FilterStyle::Select,
        }
    }

    /// 最近一次构建谓词时正则是否编译失败
    pub fn is_invalid(&self) -> bool {
        matches!(self, FilterControl::Text { invalid: true, .. })
    }

    /// 当前是否处于“不过滤”状态
    pub fn is_inactive(&self) -> bool {
        match self {
            FilterControl::Text { pattern, .. } => pattern.is_empty(),
            FilterControl::Select { selected, .. } => *selected == 0,
        }
    }

    /// 下拉框当前选中项文本；文本框返回 None
    pub fn selection(&self) -> Option<&str> {
        match self {
            FilterControl::Select { options, selected } => options.get(*selected).map(String::as_str),
            FilterControl::Text { .. } => None,
        }
    }
}

/// 一次过滤输入事件携带的新值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterInput {
    Text(String),
    /// 按下标选择下拉项（0 = 不过滤）
    Select(usize),
    /// 按选项文本选择下拉项
    SelectValue(String),
}

/// 单列谓词
#[derive(Debug, Clone)]
pub(crate) enum ColumnPredicate {
    MatchAll,
    Pattern(Regex),
    Exact(String),
}

impl ColumnPredicate {
    fn matches(&self, text: &str) -> bool {
        match self {
            ColumnPredicate::MatchAll => true,
            ColumnPredicate::Pattern(rx) => rx.is_match(text),
            ColumnPredicate::Exact(value) => text == value,
        }
    }
}

/// 从控件当前值构建单列谓词（会刷新文本控件的 invalid 标记）
pub(crate) fn build_column_predicate(column: usize, control: &mut FilterControl) -> ColumnPredicate {
    match control {
        FilterControl::Text { pattern, invalid } => {
            *invalid = false;
            if pattern.is_empty() {
                return ColumnPredicate::MatchAll;
            }
            match Regex::new(pattern) {
                Ok(rx) => ColumnPredicate::Pattern(rx),
                Err(e) => {
                    warn!(column, pattern = %pattern, error = %e, "invalid filter pattern, column left unfiltered");
                    *invalid = true;
                    ColumnPredicate::MatchAll
                }
            }
        }
        FilterControl::Select { options, selected } => match options.get(*selected) {
            Some(value) if *selected > 0 => ColumnPredicate::Exact(value.clone()),
            _ => ColumnPredicate::MatchAll,
        },
    }
}

/// 组合谓词：各列谓词逻辑与
#[derive(Debug, Clone, Default)]
pub struct CombinedPredicate {
    columns: Vec<(usize, ColumnPredicate)>,
}

impl CombinedPredicate {
    pub fn matches(&self, row: &Row) -> bool {
        self.columns
            .iter()
            .all(|(column, pred)| pred.matches(row.cell(*column).unwrap_or("")))
    }

    /// 是否不含任何实际约束
    pub fn is_match_all(&self) -> bool {
        self.columns.is_empty()
    }
}

/// 一次过滤的统计（便于 CLI 打印）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FilterStats {
    pub visible: usize,
    pub hidden: usize,
    pub invalid_patterns: usize,
}

/// 过滤行：与表头按位置对齐，每列一个可选控件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRow {
    controls: Vec<Option<FilterControl>>,
}

impl FilterRow {
    /// 依据列类型与表格数据生成整行控件
    pub fn for_table(table: &Table) -> Self {
        let controls = (0..table.column_count())
            .map(|c| FilterControl::for_column(table, c))
            .collect();
        Self { controls }
    }

    /// 使用调用方提供的控件；校验数量与列类型
    pub fn new(table: &Table, controls: Vec<Option<FilterControl>>) -> Result<Self, TableError> {
        if controls.len() != table.column_count() {
            return Err(TableError::FilterRowWidth { expected: table.column_count(), found: controls.len() });
        }
        for (column, control) in controls.iter().enumerate() {
            let Some(control) = control else { continue };
            let kind = table.kind(column)?;
            if kind.filter_style() != Some(control.style()) {
                return Err(TableError::ControlKind { column, kind, style: control.style() });
            }
        }
        Ok(Self { controls })
    }

    pub fn control(&self, column: usize) -> Option<&FilterControl> {
        self.controls.get(column).and_then(Option::as_ref)
    }

    pub fn controls(&self) -> &[Option<FilterControl>] {
        &self.controls
    }

    fn control_mut(&mut self, column: usize) -> Result<&mut FilterControl, TableError> {
        match self.controls.get_mut(column) {
            Some(Some(control)) => Ok(control),
            Some(None) => Err(TableError::NotFilterable(column)),
            None => Err(TableError::ColumnOutOfRange(column)),
        }
    }

    /// 写入一次输入；输入类型与控件不符或选项不存在时报错且不修改控件
    pub fn set_input(&mut self, column: usize, input: FilterInput) -> Result<(), TableError> {
        let control = self.control_mut(column)?;
        match (control, input) {
            (FilterControl::Text { pattern, .. }, FilterInput::Text(value)) => {
                *pattern = value;
            }
            (FilterControl::Select { options, selected }, FilterInput::Select(idx)) => {
                if idx >= options.len() {
                    return Err(TableError::UnknownOption { column, value: idx.to_string() });
                }
                *selected = idx;
            }
            (FilterControl::Select { options, selected }, FilterInput::SelectValue(value)) => {
                *selected = options
                    .iter()
                    .position(|o| *o == value)
                    .ok_or(TableError::UnknownOption { column, value })?;
            }
            (control, _) => {
                return Err(TableError::InputMismatch { column, style: control.style() });
            }
        }
        Ok(())
    }

    /// 按控件类型解释文本值：文本框作为正则，下拉框按选项文本选择
    pub fn set_value(&mut self, column: usize, value: &str) -> Result<(), TableError> {
        let input = match self.control_mut(column)?.style() {
            FilterStyle::Text => FilterInput::Text(value.to_string()),
            FilterStyle::Select => FilterInput::SelectValue(value.to_string()),
        };
        self.set_input(column, input)
    }

    /// 所有控件恢复为“不过滤”
    pub fn clear(&mut self) {
        for control in self.controls.iter_mut().flatten() {
            match control {
                FilterControl::Text { pattern, invalid } => {
                    pattern.clear();
                    *invalid = false;
                }
                FilterControl::Select { selected, .. } => *selected = 0,
            }
        }
    }

    /// 由全部控件的当前值重建组合谓词
    pub fn combined(&mut self) -> CombinedPredicate {
        let columns = self
            .controls
            .iter_mut()
            .enumerate()
            .filter_map(|(column, control)| control.as_mut().map(|c| (column, build_column_predicate(column, c))))
            .filter(|(_, pred)| !matches!(pred, ColumnPredicate::MatchAll))
            .collect();
        CombinedPredicate { columns }
    }

    /// 重建谓词并刷新每一行的可见性
    pub fn apply(&mut self, table: &mut Table) -> FilterStats {
        let predicate = self.combined();
        let mut stats = FilterStats {
            invalid_patterns: self.controls.iter().flatten().filter(|c| c.is_invalid()).count(),
            ..FilterStats::default()
        };
        for row in table.rows_mut() {
            let visible = predicate.matches(row);
            row.set_visible(visible);
            if visible {
                stats.visible += 1;
            } else {
                stats.hidden += 1;
            }
        }
        debug!(visible = stats.visible, hidden = stats.hidden, "filters applied");
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HeaderCell;
    use crate::types::ColumnKind;

    fn findings_table() -> Table {
        let headers = ColumnKind::STANDARD.iter().map(|k| HeaderCell::from_kind(*k)).collect();
        let rows = [
            ["src/a.cpp:10", "naked new", "error", "Naked new called"],
            ["src/a.cpp:20", "whitespace", "style", "Trailing whitespace"],
            ["src/b.cpp:5", "naked delete", "error", "Naked delete called"],
            ["src/c.cpp:7", "todo", "information", "TODO comment"],
        ]
        .iter()
        .map(|r| r.iter().map(|s| s.to_string()).collect())
        .collect();
        Table::new(headers, rows).unwrap()
    }

    fn visible_locations(t: &Table) -> Vec<&str> {
        t.visible_rows().map(|r| r.cell(0).unwrap()).collect()
    }

    #[test]
    fn controls_follow_column_kind() {
        let t = findings_table();
        let row = FilterRow::for_table(&t);
        assert_eq!(row.control(0), Some(&FilterControl::text()));
        assert_eq!(row.control(3), Some(&FilterControl::text()));
        assert_eq!(
            row.control(2),
            Some(&FilterControl::select(["error", "information", "style"]))
        );
        assert_eq!(
            row.control(1).map(|c| c.style()),
            Some(FilterStyle::Select)
        );
    }

    #[test]
    fn empty_pattern_matches_everything() {
        let mut t = findings_table();
        let mut row = FilterRow::for_table(&t);
        row.set_input(3, FilterInput::Text(String::new())).unwrap();
        let stats = row.apply(&mut t);
        assert_eq!(stats, FilterStats { visible: 4, hidden: 0, invalid_patterns: 0 });
    }

    #[test]
    fn invalid_pattern_matches_everything_and_flags_control() {
        let mut t = findings_table();
        let mut row = FilterRow::for_table(&t);
        row.set_input(3, FilterInput::Text("(".into())).unwrap();
        let stats = row.apply(&mut t);
        assert_eq!(stats.visible, 4);
        assert_eq!(stats.invalid_patterns, 1);
        assert!(row.control(3).unwrap().is_invalid());

        // 修正后标记被清除
        row.set_input(3, FilterInput::Text("Naked".into())).unwrap();
        row.apply(&mut t);
        assert!(!row.control(3).unwrap().is_invalid());
        assert_eq!(visible_locations(&t), vec!["src/a.cpp:10", "src/b.cpp:5"]);
    }

    #[test]
    fn invalid_pattern_does_not_disturb_other_columns() {
        let mut t = findings_table();
        let mut row = FilterRow::for_table(&t);
        row.set_input(0, FilterInput::Text("[".into())).unwrap();
        row.set_value(2, "style").unwrap();
        row.apply(&mut t);
        assert_eq!(visible_locations(&t), vec!["src/a.cpp:20"]);
    }

    #[test]
    fn pattern_is_unanchored() {
        let mut t = findings_table();
        let mut row = FilterRow::for_table(&t);
        row.set_input(0, FilterInput::Text("b\\.cpp".into())).unwrap();
        row.apply(&mut t);
        assert_eq!(visible_locations(&t), vec!["src/b.cpp:5"]);
    }

    #[test]
    fn select_requires_exact_match_and_combines_with_regex() {
        let mut t = findings_table();
        let mut row = FilterRow::for_table(&t);
        row.set_value(2, "error").unwrap();
        row.apply(&mut t);
        assert_eq!(visible_locations(&t), vec!["src/a.cpp:10", "src/b.cpp:5"]);

        row.set_input(3, FilterInput::Text("delete".into())).unwrap();
        let stats = row.apply(&mut t);
        assert_eq!(visible_locations(&t), vec!["src/b.cpp:5"]);
        assert_eq!((stats.visible, stats.hidden), (1, 3));

        // 选回第 0 项即取消该列过滤
        row.set_input(2, FilterInput::Select(0)).unwrap();
        row.set_input(3, FilterInput::Text(String::new())).unwrap();
        assert!(row.combined().is_match_all());
    }

    #[test]
    fn select_option_text_must_be_offered() {
        let t = findings_table();
        let mut row = FilterRow::for_table(&t);
        assert_eq!(
            row.set_value(2, "fatal"),
            Err(TableError::UnknownOption { column: 2, value: "fatal".into() })
        );
        assert_eq!(
            row.set_input(2, FilterInput::Select(9)),
            Err(TableError::UnknownOption { column: 2, value: "9".into() })
        );
        assert_eq!(
            row.set_input(3, FilterInput::Select(1)),
            Err(TableError::InputMismatch { column: 3, style: FilterStyle::Text })
        );
        assert_eq!(row.control(2).unwrap().selection(), Some(NO_FILTER_OPTION));
    }

    #[test]
    fn rejects_controls_that_do_not_fit_the_column() {
        let t = findings_table();
        let controls = vec![Some(FilterControl::text()), None, None, Some(FilterControl::select(["x"]))];
        assert_eq!(
            FilterRow::new(&t, controls),
            Err(TableError::ControlKind { column: 3, kind: ColumnKind::Message, style: FilterStyle::Select })
        );
        assert_eq!(
            FilterRow::new(&t, vec![None]),
            Err(TableError::FilterRowWidth { expected: 4, found: 1 })
        );
    }

    #[test]
    fn clear_restores_match_all() {
        let mut t = findings_table();
        let mut row = FilterRow::for_table(&t);
        row.set_value(1, "todo").unwrap();
        row.set_value(3, "(").unwrap();
        row.apply(&mut t);
        row.clear();
        assert!(row.controls().iter().flatten().all(|c| c.is_inactive() && !c.is_invalid()));
        assert_eq!(row.apply(&mut t).visible, 4);
    }
}
