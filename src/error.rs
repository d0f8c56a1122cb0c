use std::path::PathBuf;
use thiserror::Error;

/// 自定义错误类型
///
/// 分为三类：配置错误（总是致命）、条目级错误（按 fail_on_warning 策略
/// 处理）、IO 错误（加载阶段按策略，保存阶段总是致命）。
#[derive(Error, Debug)]
pub enum PropertyFileError {
    #[error("A command name must be specified")]
    MissingCommand,

    #[error("A properties file must be specified")]
    MissingFile,

    #[error("Invalid value for \"{key}\": {cause}")]
    InvalidValue { key: String, cause: String },

    #[error("Malformed properties stream: {0}")]
    Malformed(String),

    #[error("Could not save properties file {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Warning(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PropertyFileError {
    /// 对应的进程退出状态码（非零）
    pub fn exit_status(&self) -> i32 {
        1
    }
}
