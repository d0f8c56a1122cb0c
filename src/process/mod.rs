/// 处理器层模块
///
/// 该模块实现值解析规则与三个类型化处理器。处理器签名保持一致：
/// `(command, store, entry, fail_on_warning) -> Result<bool>`，
/// 返回 `Ok(true)` 表示写入成功，`Ok(false)` 表示按宽容策略跳过，
/// `Err` 表示警告被提升为致命错误。
///
/// 所有警告都以 `[<command>] <message>` 前缀输出。
pub mod date;
pub mod int;
pub mod string;

pub use date::process_date;
pub use int::process_int;
pub use string::process_string;

use crate::error::PropertyFileError;

/// 三候选值解析
///
/// 优先级：新值 > 当前存储值 > 默认值。对所有条目变体一致；
/// 当前值存在时不会回落到默认值。
pub fn resolve<T>(current: Option<T>, default: Option<T>, new: Option<T>) -> Option<T> {
    new.or(current).or(default)
}

/// 记录一条警告
pub(crate) fn warn(command: &str, message: &str) {
    tracing::warn!("[{}] {}", command, message);
}

/// 按策略记录警告或升级为致命错误
///
/// fail_on_warning 开启时记录 error 级日志并返回 Err，
/// 否则记录 warn 级日志后正常返回。
pub(crate) fn warn_or_fail(
    command: &str,
    message: String,
    fail_on_warning: bool,
) -> Result<(), PropertyFileError> {
    if fail_on_warning {
        tracing::error!("[{}] {}", command, message);
        Err(PropertyFileError::Warning(message))
    } else {
        warn(command, &message);
        Ok(())
    }
}

/// 按策略报告类型化处理器里的 invalid-value 错误
///
/// 消息格式沿用 `<label> for "<key>" --> <cause>`；升级为致命错误时
/// 携带键名与根因。
pub(crate) fn invalid_value(
    command: &str,
    label: &str,
    key: &str,
    cause: String,
    fail_on_warning: bool,
) -> Result<(), PropertyFileError> {
    let message = format!("{label} for \"{key}\" --> {cause}");
    if fail_on_warning {
        tracing::error!("[{}] {}", command, message);
        Err(PropertyFileError::InvalidValue {
            key: key.to_string(),
            cause,
        })
    } else {
        warn(command, &message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 解析规则的五条文档化组合
    #[test]
    fn test_resolve_new_wins() {
        assert_eq!(
            resolve(Some("prev"), Some("default"), Some("new")),
            Some("new")
        );
        assert_eq!(resolve(None, Some("default"), Some("new")), Some("new"));
    }

    #[test]
    fn test_resolve_current_over_default() {
        assert_eq!(resolve(Some("prev"), Some("default"), None), Some("prev"));
    }

    #[test]
    fn test_resolve_default_last() {
        assert_eq!(resolve(None, Some("default"), None), Some("default"));
    }

    #[test]
    fn test_resolve_all_absent() {
        assert_eq!(resolve::<&str>(None, None, None), None);
    }

    #[test]
    fn test_warn_or_fail_policy() {
        assert!(warn_or_fail("test", "message".to_string(), false).is_ok());
        assert!(warn_or_fail("test", "message".to_string(), true).is_err());
    }
}
