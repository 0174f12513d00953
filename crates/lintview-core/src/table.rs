//! 表格模型：表头、数据行与行可见性
use crate::error::TableError;
use crate::types::ColumnKind;

/// 表头单元格（显示名 + 列类型）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub label: String,
    pub kind: ColumnKind,
}

impl HeaderCell {
    pub fn new(label: impl Into<String>, kind: ColumnKind) -> Self {
        Self { label: label.into(), kind }
    }

    /// 以列类型名作为显示名
    pub fn from_kind(kind: ColumnKind) -> Self {
        Self::new(kind.as_str(), kind)
    }
}

/// 数据行；`visible` 是最近一次过滤计算的结果，随行一起移动
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    cells: Vec<String>,
    visible: bool,
}

impl Row {
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

/// 表格：表头与各行单元格按位置对齐（构造时校验）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<HeaderCell>,
    rows: Vec<Row>,
}

impl Table {
    /// 构造表格并校验每一行的单元格数与表头一致
    pub fn new(headers: Vec<HeaderCell>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let expected = headers.len();
        let mut out = Vec::with_capacity(rows.len());
        for (idx, cells) in rows.into_iter().enumerate() {
            if cells.len() != expected {
                return Err(TableError::RowWidth { row: idx, expected, found: cells.len() });
            }
            out.push(Row { cells, visible: true });
        }
        Ok(Self { headers, rows: out })
    }

    pub fn headers(&self) -> &[HeaderCell] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 指定列的类型
    pub fn kind(&self, column: usize) -> Result<ColumnKind, TableError> {
        self.headers
            .get(column)
            .map(|h| h.kind)
            .ok_or(TableError::ColumnOutOfRange(column))
    }

    /// 按名称查找列：先匹配列类型名，再匹配显示名（均忽略大小写）
    pub fn column_by_name(&self, name: &str) -> Result<usize, TableError> {
        let kind = ColumnKind::from_marker(name);
        let by_kind = match kind {
            ColumnKind::Generic => None,
            kind => self.headers.iter().position(|h| h.kind == kind),
        };
        by_kind
            .or_else(|| self.headers.iter().position(|h| h.label.eq_ignore_ascii_case(name)))
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// 指定列的全部单元格文本（按当前行序）
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().filter_map(move |r| r.cell(column))
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter().filter(|r| r.visible)
    }
}
