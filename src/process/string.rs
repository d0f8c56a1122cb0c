/// 字符串处理器
use super::{invalid_value, resolve, warn_or_fail};
use crate::entry::StringEntry;
use crate::error::PropertyFileError;
use crate::pattern::{printf, PatternArg};
use crate::properties::Properties;

/// 处理一个字符串条目
///
/// 解析值直接写入；有格式参数时先经 printf 渲染。修改函数与修改参数
/// 同时存在时，以刚写入的值为基础重算一遍并再次渲染。
pub fn process_string(
    command: &str,
    props: &mut Properties,
    entry: &StringEntry,
    fail_on_warning: bool,
) -> Result<bool, PropertyFileError> {
    let key = entry.get_key().to_string();

    let current = props.get(&key).map(str::to_string);
    let resolved = resolve(
        current,
        entry.get_default_value().map(str::to_string),
        entry.get_new_value().map(str::to_string),
    );
    let Some(resolved) = resolved else {
        warn_or_fail(
            command,
            format!("No value to write for \"{key}\""),
            fail_on_warning,
        )?;
        return Ok(false);
    };

    let rendered = match apply_pattern(resolved, entry.get_pattern()) {
        Ok(v) => v,
        Err(cause) => {
            invalid_value(command, "Non-formattable value", &key, cause, fail_on_warning)?;
            return Ok(false);
        }
    };
    props.set(&key, rendered);

    if let (Some(modify), Some(modify_value)) = (entry.get_modify(), entry.get_modify_value()) {
        let base = props.get(&key).unwrap_or_default().to_string();
        let modified = modify(&base, modify_value);
        match apply_pattern(modified, entry.get_pattern()) {
            Ok(v) => {
                props.set(&key, v);
            }
            Err(cause) => {
                invalid_value(command, "Non-formattable value", &key, cause, fail_on_warning)?;
                return Ok(false);
            }
        }
    }

    Ok(true)
}

fn apply_pattern(value: String, pattern: Option<&PatternArg>) -> Result<String, String> {
    match pattern {
        Some(arg) => printf::format(&value, arg),
        None => Ok(value),
    }
}
