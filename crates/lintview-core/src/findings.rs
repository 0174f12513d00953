//! 分析结果（findings）加载与建表
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::TableError;
use crate::options::InputFormat;
use crate::table::{HeaderCell, Table};
use crate::types::ColumnKind;

/// 单条分析结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub file: String,
    pub line: u64,
    #[serde(alias = "id")]
    pub category: String,
    pub severity: String,
    #[serde(alias = "msg")]
    pub message: String,
}

/// 读取分析结果，按扩展名选择 JSON 或 XML
pub fn load_findings(path: &Path) -> Result<Vec<Finding>> {
    load_findings_as(path, InputFormat::Auto)
}

/// 以指定格式读取分析结果
pub fn load_findings_as(path: &Path, format: InputFormat) -> Result<Vec<Finding>> {
    let findings = match format.resolve(path) {
        InputFormat::Xml => {
            let txt = std::fs::read_to_string(path).with_context(|| format!("open findings {}", path.display()))?;
            parse_xml_report(&txt).with_context(|| format!("parse findings {}", path.display()))?
        }
        _ => {
            let file = File::open(path).with_context(|| format!("open findings {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("parse findings {}", path.display()))?
        }
    };
    debug!(count = findings.len(), path = %path.display(), "findings loaded");
    Ok(findings)
}

/// 解析 cppcheck 兼容的 XML 报告（`<results version="2">`）
///
/// 每个 `<error id severity msg>` 取第一个 `<location file line>` 作为位置；
/// 没有 location 的条目跳过。
pub fn parse_xml_report(txt: &str) -> Result<Vec<Finding>> {
    let doc = roxmltree::Document::parse(txt).context("malformed XML")?;
    let errors = doc
        .root_element()
        .children()
        .find(|n| n.has_tag_name("errors"))
        .ok_or_else(|| anyhow!("missing <errors> element"))?;

    let mut findings = Vec::new();
    for error in errors.children().filter(|n| n.has_tag_name("error")) {
        let attr = |name: &str| error.attribute(name).unwrap_or_default().to_string();
        let Some(location) = error.children().find(|n| n.has_tag_name("location")) else {
            debug!(id = %attr("id"), "error without location skipped");
            continue;
        };
        let line = location.attribute("line").unwrap_or("0");
        let line: u64 = line.parse().with_context(|| format!("bad line number `{line}`"))?;
        findings.push(Finding {
            file: location.attribute("file").unwrap_or_default().to_string(),
            line,
            category: attr("id"),
            severity: attr("severity"),
            message: attr("msg"),
        });
    }
    Ok(findings)
}

/// 所有文件所在目录的公共前缀（按路径分量计算）
pub(crate) fn common_dir_prefix<'a, I>(files: I) -> PathBuf
where
    I: IntoIterator<Item = &'a str>,
{
    let mut prefix: Option<Vec<std::path::Component<'a>>> = None;
    for file in files {
        let dir: Vec<_> = Path::new(file).parent().map(|p| p.components().collect()).unwrap_or_default();
        prefix = Some(match prefix {
            None => dir,
            Some(cur) => cur.into_iter().zip(dir).take_while(|(a, b)| a == b).map(|(a, _)| a).collect(),
        });
    }
    prefix.unwrap_or_default().into_iter().collect()
}

/// 位置文本："<相对路径>:<行号>"
fn location_text(file: &str, line: u64, prefix: &Path) -> String {
    let rel = Path::new(file).strip_prefix(prefix).unwrap_or_else(|_| Path::new(file));
    format!("{}:{}", rel.to_string_lossy(), line)
}

impl Table {
    /// 以四个标准列（location, category, severity, message）建表，文件路径相对于公共目录
    pub fn from_findings(findings: &[Finding]) -> Result<Table, TableError> {
        let prefix = common_dir_prefix(findings.iter().map(|f| f.file.as_str()));
        let headers = ColumnKind::STANDARD.iter().map(|k| HeaderCell::from_kind(*k)).collect();
        let rows = findings
            .iter()
            .map(|f| {
                vec![
                    location_text(&f.file, f.line, &prefix),
                    f.category.clone(),
                    f.severity.clone(),
                    f.message.clone(),
                ]
            })
            .collect();
        Table::new(headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(file: &str, line: u64) -> Finding {
        Finding {
            file: file.into(),
            line,
            category: "todo".into(),
            severity: "information".into(),
            message: "TODO".into(),
        }
    }

    #[test]
    fn prefix_is_shared_directory() {
        let p = common_dir_prefix(["/p/src/a.cpp", "/p/src/ui/b.cpp", "/p/src/ai/c.cpp"]);
        assert_eq!(p, PathBuf::from("/p/src"));
        assert_eq!(common_dir_prefix(["/p/x.cpp", "/q/y.cpp"]), PathBuf::from("/"));
        assert_eq!(common_dir_prefix(std::iter::empty()), PathBuf::new());
    }

    #[test]
    fn table_uses_relative_locations() {
        let t = Table::from_findings(&[finding("/p/src/a.cpp", 9), finding("/p/src/ui/b.cpp", 10)]).unwrap();
        assert_eq!(t.column_values(0).collect::<Vec<_>>(), vec!["a.cpp:9", "ui/b.cpp:10"]);
        let kinds: Vec<_> = t.headers().iter().map(|h| h.kind).collect();
        assert_eq!(kinds, ColumnKind::STANDARD);
    }

    #[test]
    fn single_finding_keeps_file_name() {
        let t = Table::from_findings(&[finding("src/only.cpp", 3)]).unwrap();
        assert_eq!(t.column_values(0).collect::<Vec<_>>(), vec!["only.cpp:3"]);
    }

    #[test]
    fn accepts_report_field_aliases() {
        let f: Finding = serde_json::from_str(
            r#"{"file":"a.cpp","line":4,"id":"naked new","severity":"error","msg":"Naked new called"}"#,
        )
        .unwrap();
        assert_eq!(f.category, "naked new");
        assert_eq!(f.message, "Naked new called");
    }

    const XML_REPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<results version="2">
  <cppcheck version="colobot-lint-0.1"/>
  <errors>
    <error id="naked new" severity="error" msg="Naked new called with type &apos;Robot&apos;" verbose="Naked new called with type &apos;Robot&apos;">
      <location file="/p/src/object/robot.cpp" line="10"/>
    </error>
    <error id="todo" severity="information" msg="TODO comment">
      <location file="/p/src/ui/button.cpp" line="7"/>
    </error>
    <error id="orphan" severity="style" msg="no location"/>
  </errors>
</results>"#;

    #[test]
    fn reads_xml_report() {
        let findings = parse_xml_report(XML_REPORT).unwrap();
        assert_eq!(findings.len(), 2);
        assert_eq!(
            findings[0],
            Finding {
                file: "/p/src/object/robot.cpp".into(),
                line: 10,
                category: "naked new".into(),
                severity: "error".into(),
                message: "Naked new called with type 'Robot'".into(),
            }
        );
        assert_eq!(findings[1].category, "todo");
    }

    #[test]
    fn rejects_broken_xml() {
        assert!(parse_xml_report("<results><errors>").is_err());
        assert!(parse_xml_report("<results version=\"2\"/>").is_err());
        let bad_line = r#"<results><errors><error id="x" severity="error" msg="m"><location file="a.c" line="ten"/></error></errors></results>"#;
        let err = parse_xml_report(bad_line).unwrap_err();
        assert!(format!("{err:#}").contains("bad line number `ten`"));
    }
}
