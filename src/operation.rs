/// 批处理执行模块
///
/// 一次执行 = 一个目标文件 + 有序的条目列表。执行流程：
/// 校验配置 → 加载文件 →（可选）清空 → 逐条分发 → 全部成功后保存。
/// 条目严格按列表顺序生效，后面的条目能看到前面条目的修改结果。
use std::path::PathBuf;

use crate::entry::Entry;
use crate::error::PropertyFileError;
use crate::io;
use crate::process::{self, warn, warn_or_fail};
use crate::properties::Properties;

/// 属性文件批处理操作
///
/// # 使用示例
///
/// ```rust,ignore
/// use propedit::{calc, DateEntry, IntEntry, PropertyFileOperation};
///
/// PropertyFileOperation::new()
///     .command("updateVersion")
///     .file("version.properties")
///     .comment("Generated file - do not modify!")
///     .entry(IntEntry::new("version.major").default_value(0).calc(calc::ADD))
///     .entry(IntEntry::new("version.minor").set(0))
///     .entry(DateEntry::new("build.date").now().pattern("yyyy-MM-dd"))
///     .execute()?;
/// ```
#[derive(Default)]
pub struct PropertyFileOperation {
    command: Option<String>,
    file: Option<PathBuf>,
    comment: String,
    fail_on_warning: bool,
    clear: bool,
    entries: Vec<Entry>,
}

impl PropertyFileOperation {
    /// 创建新的批处理操作
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置发起命令名（日志前缀，必填）
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// 设置目标属性文件路径
    pub fn file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// 设置写入文件头部的注释
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// 任何警告都中止执行并返回非零退出状态
    pub fn fail_on_warning(mut self, fail_on_warning: bool) -> Self {
        self.fail_on_warning = fail_on_warning;
        self
    }

    /// 应用条目前先清空已加载的属性
    pub fn clear(mut self) -> Self {
        self.clear = true;
        self
    }

    /// 追加一个修改条目
    pub fn entry(mut self, entry: impl Into<Entry>) -> Self {
        self.entries.push(entry.into());
        self
    }

    /// 执行批处理
    ///
    /// # 错误
    /// - 缺少命令名或文件路径：配置错误，总是致命
    /// - 加载失败：宽容策略下记录警告并结束（不保存，原文件不动）
    /// - 条目警告 / invalid-value：按 fail_on_warning 策略处理
    /// - 保存失败：总是致命
    pub fn execute(&self) -> Result<(), PropertyFileError> {
        let Some(command) = self.command.as_deref() else {
            tracing::error!("A command name must be specified.");
            return Err(PropertyFileError::MissingCommand);
        };

        let Some(file) = &self.file else {
            warn(command, "A properties file must be specified.");
            return Err(PropertyFileError::MissingFile);
        };

        let mut props = Properties::new();
        if !io::load_properties(command, file, &mut props, self.fail_on_warning)? {
            return Ok(());
        }

        if self.clear {
            props.clear();
        }

        for entry in &self.entries {
            let key = entry.get_key();
            if key.trim().is_empty() {
                warn_or_fail(
                    command,
                    "An entry key must be specified.".to_string(),
                    self.fail_on_warning,
                )?;
                continue;
            }

            if entry.is_delete() {
                props.remove(key);
                continue;
            }

            let current_blank = props.get(key).map_or(true, |v| v.trim().is_empty());
            if entry.new_value_is_blank() && entry.default_value_is_blank() && current_blank {
                warn_or_fail(
                    command,
                    format!("An entry must be set or have a default value: {key}"),
                    self.fail_on_warning,
                )?;
                continue;
            }

            match entry {
                Entry::String(e) => {
                    process::process_string(command, &mut props, e, self.fail_on_warning)?;
                }
                Entry::Int(e) => {
                    process::process_int(command, &mut props, e, self.fail_on_warning)?;
                }
                Entry::Date(e) => {
                    process::process_date(command, &mut props, e, self.fail_on_warning)?;
                }
            }
        }

        io::save_properties(file, &self.comment, &props)
    }
}
