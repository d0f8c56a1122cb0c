/// 整数处理器
use super::{invalid_value, resolve};
use crate::entry::IntEntry;
use crate::error::PropertyFileError;
use crate::pattern::decimal::DecimalFormat;
use crate::properties::Properties;

/// 处理一个整数条目
///
/// 解析值经十进制模式解析（空白视为 0），应用计算函数后用同一模式
/// 渲染回去。解析失败按 fail_on_warning 策略处理，宽容时跳过且不写入。
pub fn process_int(
    command: &str,
    props: &mut Properties,
    entry: &IntEntry,
    fail_on_warning: bool,
) -> Result<bool, PropertyFileError> {
    let key = entry.get_key().to_string();

    match compute(props, entry) {
        Ok(rendered) => {
            props.set(&key, rendered);
            Ok(true)
        }
        Err(cause) => {
            invalid_value(command, "Non-integer value", &key, cause, fail_on_warning)?;
            Ok(false)
        }
    }
}

fn compute(props: &Properties, entry: &IntEntry) -> Result<String, String> {
    let fmt = DecimalFormat::new(entry.get_pattern().unwrap_or("0"))?;

    let current = props.get(entry.get_key()).map(str::to_string);
    let resolved = resolve(
        current,
        entry.get_default_value().map(str::to_string),
        entry.get_new_value().map(|v| v.to_string()),
    );

    let value = match resolved {
        None => 0,
        Some(s) if s.trim().is_empty() => 0,
        Some(s) => fmt.parse(&s)?,
    };
    let value = match entry.get_calc() {
        Some(calc) => calc(value),
        None => value,
    };

    Ok(fmt.format(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{ADD, SUB};
    use crate::entry::IntEntry;

    const CMD: &str = "test";

    #[test]
    fn test_set_value() {
        let mut props = Properties::new();
        let entry = IntEntry::new("version.minor").set(0);

        assert!(process_int(CMD, &mut props, &entry, false).unwrap());
        assert_eq!(props.get("version.minor"), Some("0"));
    }

    #[test]
    fn test_default_plus_add_from_negative_one() {
        let mut props = Properties::new();
        let entry = IntEntry::new("version.patch").default_value("-1").calc(ADD);

        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("version.patch"), Some("0"));
    }

    #[test]
    fn test_repeated_add_increments_stored_value() {
        let mut props = Properties::new();
        let entry = IntEntry::new("anint").default_value("0").calc(ADD);

        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("anint"), Some("1"));
        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("anint"), Some("2"));
    }

    #[test]
    fn test_padded_pattern_roundtrip() {
        let mut props = Properties::new();
        let entry = IntEntry::new("formatted.int")
            .default_value("0013")
            .pattern("0000")
            .calc(ADD);

        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("formatted.int"), Some("0014"));
        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("formatted.int"), Some("0015"));
    }

    #[test]
    fn test_new_value_through_pattern() {
        let mut props = Properties::new();
        props.set("formatted.int", "0016");

        let entry = IntEntry::new("formatted.int")
            .set(2)
            .default_value("0013")
            .pattern("0000")
            .calc(ADD);
        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("formatted.int"), Some("0003"));
    }

    #[test]
    fn test_custom_calc() {
        let mut props = Properties::new();
        let entry = IntEntry::new("n")
            .default_value("0013")
            .pattern("0000")
            .calc(|v| v + 23);

        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("n"), Some("0036"));
    }

    #[test]
    fn test_sub() {
        let mut props = Properties::new();
        props.set("n", "0040");

        let entry = IntEntry::new("n").pattern("0000").calc(SUB);
        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("n"), Some("0039"));
    }

    #[test]
    fn test_blank_resolves_to_zero() {
        let mut props = Properties::new();
        props.set("blank", "  ");

        let entry = IntEntry::new("blank").calc(ADD);
        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("blank"), Some("1"));
    }

    #[test]
    fn test_parse_failure_lenient_skips() {
        let mut props = Properties::new();
        props.set("bad", "abc");

        let entry = IntEntry::new("bad").calc(ADD);
        assert!(!process_int(CMD, &mut props, &entry, false).unwrap());
        // 跳过且不写入，原值保持不变
        assert_eq!(props.get("bad"), Some("abc"));
    }

    #[test]
    fn test_parse_failure_fatal_under_fail_on_warning() {
        let mut props = Properties::new();
        props.set("bad", "abc");

        let entry = IntEntry::new("bad").calc(ADD);
        assert!(process_int(CMD, &mut props, &entry, true).is_err());
    }

    #[test]
    fn test_grouping_pattern() {
        let mut props = Properties::new();
        let entry = IntEntry::new("big").set(1234567).pattern("#,##0");

        process_int(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("big"), Some("1,234,567"));
    }
}
