use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use lintview_core::{load_findings_as, write_visible_rows, InputFormat, OutputFormat, ReportView, Table, ViewConfig};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "lintview", version, about = "静态分析报告的排序与过滤")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 加载分析结果，按配置排序/过滤后输出可见行
    View {
        /// 分析结果文件（JSON 数组或 XML 报告）
        #[arg(long)]
        input: PathBuf,

        /// 输入格式：auto（按扩展名）、json 或 xml
        #[arg(long = "input-format", default_value = "auto", value_parser = ["auto", "json", "xml"])]
        input_format: String,

        /// 输出文件；缺省写到标准输出
        #[arg(long)]
        output: Option<PathBuf>,

        /// 视图配置文件（TOML）
        #[arg(long)]
        config: Option<PathBuf>,

        /// 依次激活的排序列（可重复，例如 --sort severity --sort location）
        #[arg(long = "sort")]
        sort: Vec<String>,

        /// 列过滤（可重复，形如 message=regex 或 severity=error）
        #[arg(long = "filter", value_parser = parse_filter)]
        filter: Vec<(String, String)>,

        /// 输出格式：json 或 text（默认 json）
        #[arg(long, default_value = "json", value_parser = ["json", "text"])]
        format: String,
    },
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::View { input, input_format, output, config, sort, filter, format } => {
            info!(?input, ?output, "loading findings");
            let input_format = match input_format.as_str() {
                "json" => InputFormat::Json,
                "xml" => InputFormat::Xml,
                _ => InputFormat::Auto,
            };
            let findings = load_findings_as(&input, input_format)?;
            let table = Table::from_findings(&findings).context("build findings table")?;
            let mut view = ReportView::new(table);

            // 配置文件在前，命令行参数追加在后
            let mut view_config = match &config {
                Some(path) => ViewConfig::load(path)?,
                None => ViewConfig::default(),
            };
            view_config.merge_cli(&sort, &filter);
            view.apply_config(&view_config).context("apply view config")?;

            let format = match format.as_str() {
                "text" => OutputFormat::Text,
                _ => OutputFormat::Json,
            };

            let mut out: Box<dyn Write> = match &output {
                Some(path) => Box::new(BufWriter::new(File::create(path).context("create output file")?)),
                None => Box::new(BufWriter::new(io::stdout().lock())),
            };
            let written = emit(&view, &mut *out, format)?;

            info!(rows = view.table().row_count(), visible = written, "view written");
        }
    }

    Ok(())
}

/// 写出可见行并刷新输出；刷新失败（磁盘满、管道关闭）同样报错
fn emit(view: &ReportView, out: &mut dyn Write, format: OutputFormat) -> Result<usize> {
    let written = write_visible_rows(view.table(), out, format).context("write rows failed")?;
    out.flush().context("flush output")?;
    Ok(written)
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，避免与标准输出上的结果混在一起
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析 `列=值` 形式的过滤参数
fn parse_filter(s: &str) -> Result<(String, String)> {
    let (column, value) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("expected COLUMN=VALUE, got `{s}`"))?;
    Ok((column.trim().to_string(), value.to_string()))
}
