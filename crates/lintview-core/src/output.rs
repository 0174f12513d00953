//! 可见行输出（JSON 数组流式写入 / 制表符文本）
use anyhow::Result;
use std::collections::HashSet;
use std::io::Write;

use crate::options::OutputFormat;
use crate::table::Table;

/// 按当前行序写出所有可见行，返回写出的行数
pub fn write_visible_rows(table: &Table, out: &mut dyn Write, format: OutputFormat) -> Result<usize> {
    match format {
        OutputFormat::Json => write_json(table, out),
        OutputFormat::Text => write_text(table, out),
    }
}

/// JSON 数组：每行一个对象，键为表头显示名（重名列追加 `#<列号>`）
fn write_json(table: &Table, out: &mut dyn Write) -> Result<usize> {
    let keys = json_keys(table);
    let mut written = 0usize;
    write!(out, "[")?;
    for row in table.visible_rows() {
        if written > 0 {
            write!(out, ",")?;
        }
        let item: serde_json::Map<String, serde_json::Value> = keys
            .iter()
            .zip(row.cells())
            .map(|(key, cell)| (key.clone(), serde_json::Value::String(cell.clone())))
            .collect();
        serde_json::to_writer(&mut *out, &item)?;
        written += 1;
    }
    write!(out, "]")?;
    Ok(written)
}

fn json_keys(table: &Table) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .headers()
        .iter()
        .enumerate()
        .map(|(column, h)| {
            if seen.insert(h.label.as_str()) {
                h.label.clone()
            } else {
                format!("{}#{}", h.label, column)
            }
        })
        .collect()
}

/// 制表符文本：首行为表头，单元格内的 `\\`、制表符与换行转义
fn write_text(table: &Table, out: &mut dyn Write) -> Result<usize> {
    let labels: Vec<String> = table.headers().iter().map(|h| escape_field(&h.label)).collect();
    writeln!(out, "{}", labels.join("\t"))?;
    let mut written = 0usize;
    for row in table.visible_rows() {
        let cells: Vec<String> = row.cells().iter().map(|c| escape_field(c)).collect();
        writeln!(out, "{}", cells.join("\t"))?;
        written += 1;
    }
    Ok(written)
}

fn escape_field(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}
