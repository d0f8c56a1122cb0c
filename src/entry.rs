/// 条目定义模块
///
/// 一个条目声明对单个属性键的一次修改。三种变体各带自己的类型化字段，
/// 通过 `Entry` 标签枚举分发；构建方法链式消耗 self，与 getter
/// （`get_` 前缀）共存。
///
/// 值解析规则（对所有变体一致）：
/// - 只给 set：无条件写入新值
/// - 只给 default 且键已存在：保持原值
/// - 只给 default 且键不存在：写入默认值
/// - set 与 default 都给：键存在写 set，不存在写 default
use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pattern::PatternArg;

/// 纯整数计算函数
pub type CalcFn = Box<dyn Fn(i64) -> i64>;

/// 纯字符串修改函数（当前值 + 修改参数 → 新值）
pub type ModifyFn = Box<dyn Fn(&str, &str) -> String>;

/// 日期偏移单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Second,
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Year,
}

/// 日期条目可接受的输入值
///
/// 字符串输入只有 `now` 关键字（大小写不敏感，处理时识别）有日期含义；
/// 其余字符串在无模式时原样写出，有模式时报 invalid-value。
#[derive(Debug, Clone, PartialEq)]
pub enum DateValue {
    /// 文本（`now` 关键字或已格式化的日期）
    Text(String),
    /// 旧式时间戳
    Timestamp(SystemTime),
    /// UTC 时刻
    Instant(DateTime<Utc>),
    /// 带固定偏移的日期时间
    Zoned(DateTime<FixedOffset>),
    /// 本地时区日期时间
    Local(DateTime<Local>),
    /// 无时区日期时间
    DateTime(NaiveDateTime),
    /// 无时区日期
    Date(NaiveDate),
    /// 无时区时间
    Time(NaiveTime),
}

impl DateValue {
    /// 文本值是否为 now 关键字
    pub fn is_now(&self) -> bool {
        matches!(self, DateValue::Text(s) if s.eq_ignore_ascii_case("now"))
    }

    pub(crate) fn is_blank(&self) -> bool {
        matches!(self, DateValue::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Text(s) => f.write_str(s),
            DateValue::Timestamp(st) => write!(f, "{}", DateTime::<Local>::from(*st)),
            DateValue::Instant(dt) => write!(f, "{dt}"),
            DateValue::Zoned(dt) => write!(f, "{dt}"),
            DateValue::Local(dt) => write!(f, "{dt}"),
            DateValue::DateTime(dt) => write!(f, "{dt}"),
            DateValue::Date(d) => write!(f, "{d}"),
            DateValue::Time(t) => write!(f, "{t}"),
        }
    }
}

impl From<&str> for DateValue {
    fn from(v: &str) -> Self {
        DateValue::Text(v.to_string())
    }
}

impl From<String> for DateValue {
    fn from(v: String) -> Self {
        DateValue::Text(v)
    }
}

impl From<SystemTime> for DateValue {
    fn from(v: SystemTime) -> Self {
        DateValue::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(v: DateTime<Utc>) -> Self {
        DateValue::Instant(v)
    }
}

impl From<DateTime<FixedOffset>> for DateValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        DateValue::Zoned(v)
    }
}

impl From<DateTime<Local>> for DateValue {
    fn from(v: DateTime<Local>) -> Self {
        DateValue::Local(v)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(v: NaiveDateTime) -> Self {
        DateValue::DateTime(v)
    }
}

impl From<NaiveDate> for DateValue {
    fn from(v: NaiveDate) -> Self {
        DateValue::Date(v)
    }
}

impl From<NaiveTime> for DateValue {
    fn from(v: NaiveTime) -> Self {
        DateValue::Time(v)
    }
}

/// 字符串条目
pub struct StringEntry {
    key: String,
    new_value: Option<String>,
    default_value: Option<String>,
    delete: bool,
    pattern: Option<PatternArg>,
    modify_value: Option<String>,
    modify: Option<ModifyFn>,
}

impl StringEntry {
    /// 创建指向指定键的字符串条目
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: None,
            default_value: None,
            delete: false,
            pattern: None,
            modify_value: None,
            modify: None,
        }
    }

    /// 设置新值（无条件覆盖）
    pub fn set(mut self, value: impl ToString) -> Self {
        self.new_value = Some(value.to_string());
        self
    }

    /// 设置默认值（键不存在时使用）
    pub fn default_value(mut self, value: impl ToString) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// 设置修改函数（需要配合 modify_with 提供修改参数才会生效）
    pub fn modify(mut self, f: impl Fn(&str, &str) -> String + 'static) -> Self {
        self.modify = Some(Box::new(f));
        self
    }

    /// 设置修改参数与修改函数
    pub fn modify_with(
        mut self,
        value: impl Into<String>,
        f: impl Fn(&str, &str) -> String + 'static,
    ) -> Self {
        self.modify_value = Some(value.into());
        self.modify = Some(Box::new(f));
        self
    }

    /// 设置格式参数（已解析值作为 printf 格式串，此参数为唯一实参）
    pub fn pattern(mut self, arg: impl Into<PatternArg>) -> Self {
        self.pattern = Some(arg.into());
        self
    }

    /// 标记为删除
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// 更换目标键
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_new_value(&self) -> Option<&str> {
        self.new_value.as_deref()
    }

    pub fn get_default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn get_pattern(&self) -> Option<&PatternArg> {
        self.pattern.as_ref()
    }

    pub fn get_modify_value(&self) -> Option<&str> {
        self.modify_value.as_deref()
    }

    pub fn get_modify(&self) -> Option<&ModifyFn> {
        self.modify.as_ref()
    }

    pub fn is_delete(&self) -> bool {
        self.delete
    }
}

/// 整数条目
pub struct IntEntry {
    key: String,
    new_value: Option<i64>,
    default_value: Option<String>,
    delete: bool,
    pattern: Option<String>,
    calc: Option<CalcFn>,
}

impl IntEntry {
    /// 创建指向指定键的整数条目
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: None,
            default_value: None,
            delete: false,
            pattern: None,
            calc: None,
        }
    }

    /// 设置新值
    pub fn set(mut self, value: i64) -> Self {
        self.new_value = Some(value);
        self
    }

    /// 设置默认值（按十进制模式解析，如 "0013"）
    pub fn default_value(mut self, value: impl ToString) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// 设置计算函数
    pub fn calc(mut self, f: impl Fn(i64) -> i64 + 'static) -> Self {
        self.calc = Some(Box::new(f));
        self
    }

    /// 设置十进制格式模式（如 "0000"、"#,##0"）
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// 标记为删除
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// 更换目标键
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_new_value(&self) -> Option<i64> {
        self.new_value
    }

    pub fn get_default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn get_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn get_calc(&self) -> Option<&CalcFn> {
        self.calc.as_ref()
    }

    pub fn is_delete(&self) -> bool {
        self.delete
    }
}

/// 日期条目
pub struct DateEntry {
    key: String,
    new_value: Option<DateValue>,
    default_value: Option<DateValue>,
    delete: bool,
    pattern: Option<String>,
    calc: Option<CalcFn>,
    unit: Unit,
}

impl DateEntry {
    /// 创建指向指定键的日期条目
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            new_value: None,
            default_value: None,
            delete: false,
            pattern: None,
            calc: None,
            unit: Unit::default(),
        }
    }

    /// 设置新值（接受 chrono 各日期时间类型、SystemTime 或字符串）
    pub fn set(mut self, value: impl Into<DateValue>) -> Self {
        self.new_value = Some(value.into());
        self
    }

    /// 设置新值为当前时刻（now 关键字）
    pub fn now(mut self) -> Self {
        self.new_value = Some(DateValue::Text("now".to_string()));
        self
    }

    /// 设置默认值
    pub fn default_value(mut self, value: impl Into<DateValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// 设置计算函数；偏移量取 `calc(0)`
    pub fn calc(mut self, f: impl Fn(i64) -> i64 + 'static) -> Self {
        self.calc = Some(Box::new(f));
        self
    }

    /// 设置偏移单位（默认 Day）
    pub fn unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// 设置日期格式模式（如 "yyyy-MM-dd"）
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// 标记为删除
    pub fn delete(mut self) -> Self {
        self.delete = true;
        self
    }

    /// 更换目标键
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn get_key(&self) -> &str {
        &self.key
    }

    pub fn get_new_value(&self) -> Option<&DateValue> {
        self.new_value.as_ref()
    }

    pub fn get_default_value(&self) -> Option<&DateValue> {
        self.default_value.as_ref()
    }

    pub fn get_pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn get_calc(&self) -> Option<&CalcFn> {
        self.calc.as_ref()
    }

    pub fn get_unit(&self) -> Unit {
        self.unit
    }

    pub fn is_delete(&self) -> bool {
        self.delete
    }
}

/// 条目标签枚举，批处理执行器按变体分发
pub enum Entry {
    String(StringEntry),
    Int(IntEntry),
    Date(DateEntry),
}

impl Entry {
    pub fn get_key(&self) -> &str {
        match self {
            Entry::String(e) => e.get_key(),
            Entry::Int(e) => e.get_key(),
            Entry::Date(e) => e.get_key(),
        }
    }

    pub fn is_delete(&self) -> bool {
        match self {
            Entry::String(e) => e.is_delete(),
            Entry::Int(e) => e.is_delete(),
            Entry::Date(e) => e.is_delete(),
        }
    }

    /// 新值是否缺失或空白
    pub(crate) fn new_value_is_blank(&self) -> bool {
        match self {
            Entry::String(e) => e.get_new_value().map_or(true, |v| v.trim().is_empty()),
            Entry::Int(e) => e.get_new_value().is_none(),
            Entry::Date(e) => e.get_new_value().map_or(true, DateValue::is_blank),
        }
    }

    /// 默认值是否缺失或空白
    pub(crate) fn default_value_is_blank(&self) -> bool {
        match self {
            Entry::String(e) => e.get_default_value().map_or(true, |v| v.trim().is_empty()),
            Entry::Int(e) => e.get_default_value().map_or(true, |v| v.trim().is_empty()),
            Entry::Date(e) => e.get_default_value().map_or(true, DateValue::is_blank),
        }
    }
}

impl From<StringEntry> for Entry {
    fn from(e: StringEntry) -> Self {
        Entry::String(e)
    }
}

impl From<IntEntry> for Entry {
    fn from(e: IntEntry) -> Self {
        Entry::Int(e)
    }
}

impl From<DateEntry> for Entry {
    fn from(e: DateEntry) -> Self {
        Entry::Date(e)
    }
}
