/// 模式方言模块
///
/// 三种条目各自解释自己的模式字段，互不混用：
///
/// - **decimal**: 整数条目的十进制格式（`0` 补零、`#`、`,` 分组），
///   解析与格式化共用同一个模式对象
/// - **date**: 日期条目的模式字母（y M d H m s 等），翻译为 chrono
///   的 strftime 格式串后交给 chrono 渲染
/// - **printf**: 字符串条目的运行时 printf 子集，已解析值作为格式串，
///   模式参数作为唯一实参
pub mod date;
pub mod decimal;
pub mod printf;

pub use printf::PatternArg;
