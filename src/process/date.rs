/// 日期时间处理器
use std::fmt::Write as _;

use chrono::{DateTime, Days, Duration, Local, Months, NaiveDate, NaiveTime};

use super::{invalid_value, resolve, warn_or_fail};
use crate::entry::{DateEntry, DateValue, Unit};
use crate::error::PropertyFileError;
use crate::pattern::date as date_pattern;
use crate::properties::Properties;

/// 归一化后的时间值
///
/// LocalDate 与 LocalTime 保持无时区；其余输入统一落到系统时区。
enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    Zoned(DateTime<Local>),
}

/// 处理一个日期条目
///
/// 模式为空时解析值的字符串形式原样写出。否则归一化、按 `calc(0)`
/// 的偏移量与单位做日历运算、再按模式渲染。`now` 关键字大小写不敏感；
/// 其余字符串在有模式时报 invalid-value。
pub fn process_date(
    command: &str,
    props: &mut Properties,
    entry: &DateEntry,
    fail_on_warning: bool,
) -> Result<bool, PropertyFileError> {
    let key = entry.get_key().to_string();

    let current = props.get(&key).map(|v| DateValue::Text(v.to_string()));
    let resolved = resolve(
        current,
        entry.get_default_value().cloned(),
        entry.get_new_value().cloned(),
    );
    let Some(resolved) = resolved else {
        warn_or_fail(
            command,
            format!("No value to write for \"{key}\""),
            fail_on_warning,
        )?;
        return Ok(false);
    };

    let pattern = entry.get_pattern().filter(|p| !p.trim().is_empty());
    let Some(pattern) = pattern else {
        props.set(&key, resolved.to_string());
        return Ok(true);
    };

    match render(&resolved, pattern, entry) {
        Ok(formatted) => {
            props.set(&key, formatted);
            Ok(true)
        }
        Err(cause) => {
            invalid_value(command, "Non-date value", &key, cause, fail_on_warning)?;
            Ok(false)
        }
    }
}

fn render(value: &DateValue, pattern: &str, entry: &DateEntry) -> Result<String, String> {
    let fmt = date_pattern::to_strftime(pattern)?;
    let temporal = normalize(value)?;

    let offset = match entry.get_calc() {
        Some(calc) => calc(0),
        None => 0,
    };
    let temporal = if offset != 0 {
        apply_offset(temporal, entry.get_unit(), offset)?
    } else {
        temporal
    };

    format_temporal(&temporal, &fmt)
}

fn normalize(value: &DateValue) -> Result<Temporal, String> {
    Ok(match value {
        DateValue::Text(s) if s.eq_ignore_ascii_case("now") => Temporal::Zoned(Local::now()),
        DateValue::Text(s) => {
            return Err(format!(
                "\"{s}\" is not a date/time value or the \"now\" keyword"
            ));
        }
        DateValue::Timestamp(st) => Temporal::Zoned(DateTime::<Local>::from(*st)),
        DateValue::Instant(dt) => Temporal::Zoned(dt.with_timezone(&Local)),
        DateValue::Zoned(dt) => Temporal::Zoned(dt.with_timezone(&Local)),
        DateValue::Local(dt) => Temporal::Zoned(*dt),
        DateValue::DateTime(dt) => Temporal::Zoned(
            dt.and_local_timezone(Local)
                .earliest()
                .ok_or_else(|| "nonexistent local date-time".to_string())?,
        ),
        DateValue::Date(d) => Temporal::Date(*d),
        DateValue::Time(t) => Temporal::Time(*t),
    })
}

/// 按单位施加偏移；与值域不兼容的单位保持原值不变
fn apply_offset(temporal: Temporal, unit: Unit, offset: i64) -> Result<Temporal, String> {
    Ok(match temporal {
        Temporal::Date(d) => Temporal::Date(match unit {
            Unit::Day => shift_date(d, offset)?,
            Unit::Week => shift_date(d, mul(offset, 7)?)?,
            Unit::Month => shift_date_months(d, offset)?,
            Unit::Year => shift_date_months(d, mul(offset, 12)?)?,
            _ => d,
        }),
        Temporal::Time(t) => Temporal::Time(match unit {
            // 时间运算绕午夜回绕
            Unit::Second => t
                .overflowing_add_signed(try_duration(Duration::try_seconds(offset))?)
                .0,
            Unit::Minute => t
                .overflowing_add_signed(try_duration(Duration::try_minutes(offset))?)
                .0,
            Unit::Hour => t
                .overflowing_add_signed(try_duration(Duration::try_hours(offset))?)
                .0,
            _ => t,
        }),
        Temporal::Zoned(z) => Temporal::Zoned(match unit {
            Unit::Second => z
                .checked_add_signed(try_duration(Duration::try_seconds(offset))?)
                .ok_or_else(overflow)?,
            Unit::Minute => z
                .checked_add_signed(try_duration(Duration::try_minutes(offset))?)
                .ok_or_else(overflow)?,
            Unit::Hour => z
                .checked_add_signed(try_duration(Duration::try_hours(offset))?)
                .ok_or_else(overflow)?,
            Unit::Day => shift_zoned_days(z, offset)?,
            Unit::Week => shift_zoned_days(z, mul(offset, 7)?)?,
            Unit::Month => shift_zoned_months(z, offset)?,
            Unit::Year => shift_zoned_months(z, mul(offset, 12)?)?,
        }),
    })
}

fn overflow() -> String {
    "date arithmetic overflow".to_string()
}

fn mul(offset: i64, by: i64) -> Result<i64, String> {
    offset.checked_mul(by).ok_or_else(overflow)
}

fn try_duration(d: Option<Duration>) -> Result<Duration, String> {
    d.ok_or_else(overflow)
}

fn shift_date(d: NaiveDate, days: i64) -> Result<NaiveDate, String> {
    let amount = Days::new(days.unsigned_abs());
    if days >= 0 {
        d.checked_add_days(amount)
    } else {
        d.checked_sub_days(amount)
    }
    .ok_or_else(overflow)
}

fn shift_date_months(d: NaiveDate, months: i64) -> Result<NaiveDate, String> {
    let amount = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| overflow())?);
    if months >= 0 {
        d.checked_add_months(amount)
    } else {
        d.checked_sub_months(amount)
    }
    .ok_or_else(overflow)
}

fn shift_zoned_days(z: DateTime<Local>, days: i64) -> Result<DateTime<Local>, String> {
    let amount = Days::new(days.unsigned_abs());
    if days >= 0 {
        z.checked_add_days(amount)
    } else {
        z.checked_sub_days(amount)
    }
    .ok_or_else(overflow)
}

fn shift_zoned_months(z: DateTime<Local>, months: i64) -> Result<DateTime<Local>, String> {
    let amount = Months::new(u32::try_from(months.unsigned_abs()).map_err(|_| overflow())?);
    if months >= 0 {
        z.checked_add_months(amount)
    } else {
        z.checked_sub_months(amount)
    }
    .ok_or_else(overflow)
}

/// 渲染归一化值
///
/// 通过 write! 捕获模式与值域不匹配的格式化失败（例如对 LocalDate
/// 使用小时字段），避免 Display 直接 panic。
fn format_temporal(temporal: &Temporal, fmt: &str) -> Result<String, String> {
    let mut out = String::new();
    let result = match temporal {
        Temporal::Date(d) => write!(out, "{}", d.format(fmt)),
        Temporal::Time(t) => write!(out, "{}", t.format(fmt)),
        Temporal::Zoned(z) => write!(out, "{}", z.format(fmt)),
    };
    result.map_err(|_| format!("pattern \"{fmt}\" is incompatible with the value"))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::ADD;
    use crate::entry::DateEntry;
    use chrono::Datelike;

    const CMD: &str = "test";

    #[test]
    fn test_now_with_date_pattern() {
        let mut props = Properties::new();
        let entry = DateEntry::new("build.date").now().pattern("yyyy-MM-dd");

        assert!(process_date(CMD, &mut props, &entry, true).unwrap());
        let expected = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(props.get("build.date"), Some(expected.as_str()));
    }

    #[test]
    fn test_now_case_insensitive() {
        let mut props = Properties::new();
        let entry = DateEntry::new("d").set("NOW").pattern("yyyy");

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(
            props.get("d"),
            Some(Local::now().year().to_string().as_str())
        );
    }

    #[test]
    fn test_blank_pattern_stores_text_as_is() {
        let mut props = Properties::new();
        let entry = DateEntry::new("raw").set("99");

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("raw"), Some("99"));
    }

    #[test]
    fn test_local_date_with_month_offset() {
        let mut props = Properties::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let entry = DateEntry::new("d")
            .set(date)
            .pattern("yyyy-MM-dd")
            .unit(Unit::Month)
            .calc(ADD);

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("d"), Some("2025-02-15"));
    }

    #[test]
    fn test_month_end_clamped() {
        let mut props = Properties::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let entry = DateEntry::new("d")
            .set(date)
            .pattern("yyyy-MM-dd")
            .unit(Unit::Month)
            .calc(ADD);

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("d"), Some("2025-02-28"));
    }

    #[test]
    fn test_local_date_day_and_week_offsets() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let mut props = Properties::new();
        let entry = DateEntry::new("d")
            .set(date)
            .pattern("yyyy-MM-dd")
            .calc(|v| v - 5);
        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("d"), Some("2025-01-10"));

        let entry = DateEntry::new("w")
            .set(date)
            .pattern("yyyy-MM-dd")
            .unit(Unit::Week)
            .calc(|v| v + 2);
        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("w"), Some("2025-01-29"));
    }

    #[test]
    fn test_incompatible_unit_leaves_date_unchanged() {
        let mut props = Properties::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let entry = DateEntry::new("d")
            .set(date)
            .pattern("yyyy-MM-dd")
            .unit(Unit::Hour)
            .calc(|v| v + 3);

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("d"), Some("2025-01-15"));
    }

    #[test]
    fn test_local_time_offsets_wrap_midnight() {
        let mut props = Properties::new();
        let time = NaiveTime::from_hms_opt(23, 30, 0).unwrap();
        let entry = DateEntry::new("t")
            .set(time)
            .pattern("HH:mm")
            .unit(Unit::Hour)
            .calc(ADD);

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("t"), Some("00:30"));
    }

    #[test]
    fn test_naive_datetime_gets_zoned() {
        let mut props = Properties::new();
        let dt = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let entry = DateEntry::new("dt").set(dt).pattern("yyyy-MM-dd HH:mm:ss");

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("dt"), Some("2025-06-01 10:30:00"));
    }

    #[test]
    fn test_zoned_seconds_offset() {
        let mut props = Properties::new();
        let dt = NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let entry = DateEntry::new("dt")
            .set(dt)
            .pattern("HH:mm:ss")
            .unit(Unit::Second)
            .calc(|v| v + 90);

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("dt"), Some("10:01:30"));
    }

    #[test]
    fn test_day_of_year_pattern() {
        let mut props = Properties::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let entry = DateEntry::new("doy").set(date).pattern("D");

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("doy"), Some("15"));
    }

    #[test]
    fn test_arbitrary_text_rejected_under_pattern() {
        let mut props = Properties::new();
        props.set("d", "2025-01-15");

        // 存储的字符串不是 now 关键字，按策略跳过且不写入
        let entry = DateEntry::new("d").pattern("yyyy-MM-dd");
        assert!(!process_date(CMD, &mut props, &entry, false).unwrap());
        assert_eq!(props.get("d"), Some("2025-01-15"));

        assert!(process_date(CMD, &mut props, &entry, true).is_err());
    }

    #[test]
    fn test_incompatible_pattern_is_invalid_value() {
        let mut props = Properties::new();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let entry = DateEntry::new("d").set(date).pattern("HH:mm");

        assert!(!process_date(CMD, &mut props, &entry, false).unwrap());
        assert!(!props.contains_key("d"));
    }

    #[test]
    fn test_bad_pattern_letter_is_invalid_value() {
        let mut props = Properties::new();
        let entry = DateEntry::new("d").now().pattern("yyyy-QQ");

        assert!(!process_date(CMD, &mut props, &entry, false).unwrap());
    }

    #[test]
    fn test_instant_normalized_to_local() {
        use chrono::{TimeZone, Utc};

        let mut props = Properties::new();
        let instant = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let entry = DateEntry::new("i").set(instant).pattern("yyyy");

        process_date(CMD, &mut props, &entry, true).unwrap();
        assert_eq!(props.get("i"), Some("2025"));
    }

    #[test]
    fn test_system_time_accepted() {
        let mut props = Properties::new();
        let entry = DateEntry::new("ts")
            .set(std::time::SystemTime::now())
            .pattern("yyyy-MM-dd");

        process_date(CMD, &mut props, &entry, true).unwrap();
        let expected = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(props.get("ts"), Some(expected.as_str()));
    }
}
