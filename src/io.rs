/// 文件 IO 适配层
///
/// 负责路径级的加载与保存，把文件系统错误翻译进错误分类：
/// 文件缺失不是错误（得到空存储）；加载失败按 fail_on_warning 策略
/// 处理；保存失败总是致命。
use std::fs;
use std::path::Path;

use crate::error::PropertyFileError;
use crate::process::warn_or_fail;
use crate::properties::Properties;

/// 从路径加载属性文件
///
/// # 返回
/// * `Ok(true)` - 加载成功（含文件不存在的情况）
/// * `Ok(false)` - 文件存在但不可读或格式损坏，已按宽容策略记录警告
/// * `Err` - 警告被 fail_on_warning 提升为致命错误
pub fn load_properties(
    command: &str,
    path: &Path,
    props: &mut Properties,
    fail_on_warning: bool,
) -> Result<bool, PropertyFileError> {
    if !path.exists() {
        return Ok(true);
    }

    let outcome = fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|bytes| props.load_bytes(&bytes).map_err(|e| e.to_string()));

    match outcome {
        Ok(()) => Ok(true),
        Err(cause) => {
            warn_or_fail(
                command,
                format!("Could not load properties file: {cause}"),
                fail_on_warning,
            )?;
            Ok(false)
        }
    }
}

/// 保存属性文件
///
/// 父目录不存在时先创建。任何失败都是致命错误。
pub fn save_properties(
    path: &Path,
    comment: &str,
    props: &Properties,
) -> Result<(), PropertyFileError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PropertyFileError::Save {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let mut buf = Vec::new();
    props
        .store(&mut buf, comment)
        .map_err(|source| PropertyFileError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    fs::write(path, buf).map_err(|source| PropertyFileError::Save {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.properties");

        let mut props = Properties::new();
        assert!(load_properties("test", &path, &mut props, false).unwrap());
        assert!(props.is_empty());
    }

    #[test]
    fn test_load_malformed_file_lenient() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.properties");
        std::fs::write(&path, b"key=\\uzzzz\n").unwrap();

        let mut props = Properties::new();
        assert!(!load_properties("test", &path, &mut props, false).unwrap());
    }

    #[test]
    fn test_load_malformed_file_fail_on_warning() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.properties");
        std::fs::write(&path, b"key=\\uzzzz\n").unwrap();

        let mut props = Properties::new();
        assert!(load_properties("test", &path, &mut props, true).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out.properties");

        let mut props = Properties::new();
        props.set("test", "test");
        save_properties(&path, "Generated file - do not modify!", &props).unwrap();

        let mut reloaded = Properties::new();
        assert!(load_properties("test", &path, &mut reloaded, false).unwrap());
        assert_eq!(reloaded.get("test"), Some("test"));
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/out.properties");

        let props = Properties::new();
        save_properties(&path, "", &props).unwrap();
        assert!(path.exists());
    }
}
