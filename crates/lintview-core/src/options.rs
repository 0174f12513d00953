//! 视图配置（TOML）与输出选项
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// 视图配置文件结构
///
/// ```toml
/// sort = ["severity", "location"]   # 依次激活的排序列
/// [filters]
/// message = "null"                  # 文本列：正则
/// severity = "error"                # 下拉列：选项文本
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub sort: Vec<String>,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
}

impl ViewConfig {
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        Ok(toml::from_str(txt)?)
    }

    /// 从 TOML 文件加载视图配置
    pub fn load(path: &Path) -> Result<Self> {
        let txt = std::fs::read_to_string(path).with_context(|| format!("read view config {}", path.display()))?;
        Self::from_toml_str(&txt).with_context(|| format!("parse view config {}", path.display()))
    }

    /// 追加命令行给出的排序与过滤（命令行覆盖同名过滤项）
    pub fn merge_cli(&mut self, sort: &[String], filters: &[(String, String)]) {
        self.sort.extend(sort.iter().cloned());
        for (column, value) in filters {
            self.filters.insert(column.clone(), value.clone());
        }
    }
}

/// 输出格式
/// - Json：可见行组成的 JSON 数组，键为表头显示名
/// - Text：制表符分隔，首行为表头
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// 分析结果文件格式；Auto 按扩展名判断（`.xml` 为 XML，其余按 JSON）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Auto,
    Json,
    Xml,
}

impl InputFormat {
    /// 将 Auto 落到具体格式
    pub fn resolve(self, path: &Path) -> InputFormat {
        match self {
            InputFormat::Auto => match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("xml") => InputFormat::Xml,
                _ => InputFormat::Json,
            },
            other => other,
        }
    }
}
