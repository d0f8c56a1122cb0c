use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use serde::Deserialize;

use propedit::calc;
use propedit::{
    DateEntry, DateValue, Entry, IntEntry, PropertyFileError, PropertyFileOperation, StringEntry,
    Unit,
};

#[derive(Parser)]
#[command(name = "propedit")]
#[command(about = "声明式编辑Java风格的.properties文件")]
#[command(version)]
struct Cli {
    /// 目标属性文件路径
    #[arg(short, long)]
    file: PathBuf,

    /// 批处理描述JSON文件路径
    #[arg(short, long)]
    batch: Option<PathBuf>,

    /// 从标准输入读取批处理描述JSON
    #[arg(long)]
    batch_stdin: bool,

    /// 写入文件头部的注释
    #[arg(short, long)]
    comment: Option<String>,

    /// 任何警告都视为失败
    #[arg(long)]
    fail_on_warning: bool,

    /// 应用条目前先清空文件
    #[arg(long)]
    clear: bool,

    /// 静默模式(仅输出错误)
    #[arg(short, long)]
    quiet: bool,
}

/// 批处理描述
#[derive(Deserialize)]
struct BatchSpec {
    /// 文件头部注释（命令行 --comment 优先）
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    entries: Vec<EntrySpec>,
}

/// 单个条目描述
#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum EntrySpec {
    String {
        key: String,
        #[serde(default)]
        set: Option<String>,
        #[serde(default)]
        default: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        /// 追加到当前值末尾
        #[serde(default)]
        append: Option<String>,
        /// 插入到当前值开头
        #[serde(default)]
        prepend: Option<String>,
        #[serde(default)]
        delete: bool,
    },
    Int {
        key: String,
        #[serde(default)]
        set: Option<i64>,
        #[serde(default)]
        default: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        calc: Option<CalcSpec>,
        #[serde(default)]
        delete: bool,
    },
    Date {
        key: String,
        #[serde(default)]
        set: Option<String>,
        #[serde(default)]
        default: Option<String>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        calc: Option<CalcSpec>,
        #[serde(default)]
        unit: Option<Unit>,
        #[serde(default)]
        delete: bool,
    },
}

/// 计算函数描述："add"、"sub" 或整数偏移量
#[derive(Deserialize)]
#[serde(untagged)]
enum CalcSpec {
    Named(String),
    Offset(i64),
}

impl CalcSpec {
    fn into_calc(self) -> anyhow::Result<Box<dyn Fn(i64) -> i64>> {
        Ok(match self {
            CalcSpec::Named(name) => match name.as_str() {
                "add" => Box::new(calc::add),
                "sub" => Box::new(calc::sub),
                other => anyhow::bail!("未知的calc名称: {other}（可用: add, sub 或整数偏移量）"),
            },
            CalcSpec::Offset(n) => Box::new(move |v| v + n),
        })
    }
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("错误: {e:#}");
        let status = e
            .downcast_ref::<PropertyFileError>()
            .map(PropertyFileError::exit_status)
            .unwrap_or(1);
        std::process::exit(status);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    validate_batch_options(&cli)?;

    let spec = load_batch_spec(&cli)?;

    let mut op = PropertyFileOperation::new()
        .command("propedit")
        .file(&cli.file)
        .fail_on_warning(cli.fail_on_warning);

    // 命令行注释优先于JSON中的注释
    if let Some(comment) = cli.comment.clone().or_else(|| spec.comment.clone()) {
        op = op.comment(comment);
    }
    if cli.clear {
        op = op.clear();
    }

    let entry_count = spec.entries.len();
    for entry_spec in spec.entries {
        op = op.entry(build_entry(entry_spec)?);
    }

    op.execute().context("批处理执行失败")?;

    if !cli.quiet {
        println!("已应用 {} 个条目，写入: {:?}", entry_count, cli.file);
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();
}

/// 校验批处理来源选项（最多使用一种方式）
fn validate_batch_options(cli: &Cli) -> anyhow::Result<()> {
    if cli.batch.is_some() && cli.batch_stdin {
        anyhow::bail!("只能使用一种批处理描述方式：--batch 或 --batch-stdin");
    }
    Ok(())
}

/// 加载批处理描述
///
/// 未指定来源时得到空条目列表（配合 --clear 或 --comment 仍然有用）。
fn load_batch_spec(cli: &Cli) -> anyhow::Result<BatchSpec> {
    let json = if let Some(batch_file) = &cli.batch {
        std::fs::read_to_string(batch_file)
            .with_context(|| format!("读取批处理文件失败: {batch_file:?}"))?
    } else if cli.batch_stdin {
        if !cli.quiet {
            eprintln!("等待从标准输入读取JSON数据... (Ctrl+D结束输入)");
        }
        let mut buffer = String::new();
        use std::io::Read;
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("从标准输入读取失败")?;
        buffer
    } else {
        return Ok(BatchSpec {
            comment: None,
            entries: Vec::new(),
        });
    };

    serde_json::from_str(&json).context("解析批处理JSON失败")
}

/// 把条目描述转换为条目
fn build_entry(spec: EntrySpec) -> anyhow::Result<Entry> {
    Ok(match spec {
        EntrySpec::String {
            key,
            set,
            default,
            pattern,
            append,
            prepend,
            delete,
        } => {
            let mut entry = StringEntry::new(key);
            if let Some(v) = set {
                entry = entry.set(v);
            }
            if let Some(v) = default {
                entry = entry.default_value(v);
            }
            if let Some(p) = pattern {
                entry = entry.pattern(p);
            }
            if let Some(suffix) = append {
                entry = entry.modify_with(suffix, |cur, mv| format!("{cur}{mv}"));
            }
            if let Some(prefix) = prepend {
                entry = entry.modify_with(prefix, |cur, mv| format!("{mv}{cur}"));
            }
            if delete {
                entry = entry.delete();
            }
            entry.into()
        }
        EntrySpec::Int {
            key,
            set,
            default,
            pattern,
            calc,
            delete,
        } => {
            let mut entry = IntEntry::new(key);
            if let Some(v) = set {
                entry = entry.set(v);
            }
            if let Some(v) = default {
                entry = entry.default_value(v);
            }
            if let Some(p) = pattern {
                entry = entry.pattern(p);
            }
            if let Some(c) = calc {
                let f = c.into_calc()?;
                entry = entry.calc(move |v| f(v));
            }
            if delete {
                entry = entry.delete();
            }
            entry.into()
        }
        EntrySpec::Date {
            key,
            set,
            default,
            pattern,
            calc,
            unit,
            delete,
        } => {
            let mut entry = DateEntry::new(key);
            if let Some(v) = set {
                entry = entry.set(parse_date_value(&v));
            }
            if let Some(v) = default {
                entry = entry.default_value(parse_date_value(&v));
            }
            if let Some(p) = pattern {
                entry = entry.pattern(p);
            }
            if let Some(c) = calc {
                let f = c.into_calc()?;
                entry = entry.calc(move |v| f(v));
            }
            if let Some(u) = unit {
                entry = entry.unit(u);
            }
            if delete {
                entry = entry.delete();
            }
            entry.into()
        }
    })
}

/// 解析日期字符串
///
/// 依次尝试 RFC3339、`yyyy-MM-dd HH:mm:ss`、`yyyy-MM-dd`、`HH:mm:ss`；
/// 都不匹配时保留为文本（now 关键字，或由处理器报 invalid-value）。
fn parse_date_value(s: &str) -> DateValue {
    if s.eq_ignore_ascii_case("now") {
        return DateValue::Text(s.to_string());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.into();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return dt.into();
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.into();
    }
    if let Ok(t) = NaiveTime::parse_from_str(s, "%H:%M:%S") {
        return t.into();
    }
    DateValue::Text(s.to_string())
}
