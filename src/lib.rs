pub mod calc;
pub mod entry;
pub mod error;
pub mod io;
pub mod operation;
pub mod pattern;
pub mod process;
pub mod properties;

// 重新导出主要结构
pub use entry::{DateEntry, DateValue, Entry, IntEntry, StringEntry, Unit};
pub use error::PropertyFileError;
pub use operation::PropertyFileOperation;
pub use pattern::PatternArg;
pub use properties::Properties;

// 常量定义
pub const SUPPORTED_EXTENSIONS: &[&str] = &["properties"];
