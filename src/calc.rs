/// 预定义计算函数
///
/// `calc` 字段接受任意 `fn(i64) -> i64` 纯函数；这里提供最常用的两个。
/// 整数与日期处理器都通过它们驱动：整数处理器对解析结果求值，
/// 日期处理器用 `calc(0)` 取得偏移量。

/// 加一
pub fn add(v: i64) -> i64 {
    v + 1
}

/// 减一
pub fn sub(v: i64) -> i64 {
    v - 1
}

/// 加一函数值
pub const ADD: fn(i64) -> i64 = add;

/// 减一函数值
pub const SUB: fn(i64) -> i64 = sub;
