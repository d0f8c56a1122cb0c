/// 属性文件存储模块
///
/// 实现扁平 `key=value` 属性文件格式的有序存储与编解码。
/// 格式遵循 java.util.Properties 的约定：ISO-8859-1 编码、`#`/`!` 注释行、
/// 行尾反斜杠续行、`\t \n \r \f \\ \uXXXX` 转义。
///
/// 遵循"解析-重建分离"原则：load 与 store 互为逆操作，
/// 重新加载 store 的输出应得到相同顺序的相同映射。
use std::io::{self, Read, Write};

use indexmap::IndexMap;

use crate::error::PropertyFileError;


/// 有序属性存储
///
/// # 不变量
/// - 键不重复（重复键加载时保留首次出现的位置，值取最后一次）
/// - 迭代顺序与插入顺序一致，并在 load/store 往返中保持
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// 键值映射（插入有序）
    map: IndexMap<String, String>,
}

impl Properties {
    /// 创建空的属性存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指定键的值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(String::as_str)
    }

    /// 设置键值，返回被替换的旧值
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.map.insert(key.into(), value.into())
    }

    /// 删除指定键，返回其旧值
    ///
    /// 使用 shift_remove 以保持剩余条目的相对顺序。
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.map.shift_remove(key)
    }

    /// 检查是否包含指定键
    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// 清空所有条目
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// 条目数量
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 按插入顺序迭代所有条目
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 从读取器加载属性
    pub fn load<R: Read>(&mut self, reader: &mut R) -> Result<(), PropertyFileError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.load_bytes(&data)
    }

    /// 从字节数据加载属性
    ///
    /// # 参数
    /// * `data` - ISO-8859-1 编码的属性文件字节数据
    ///
    /// # 返回
    /// 格式错误（如非法的 \uXXXX 转义）返回 `PropertyFileError::Malformed`
    pub fn load_bytes(&mut self, data: &[u8]) -> Result<(), PropertyFileError> {
        // ISO-8859-1 解码：字节值即码点
        let text: String = data.iter().map(|&b| b as char).collect();
        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        let mut lines = text.split('\n');
        while let Some(raw) = lines.next() {
            let line = raw.trim_start_matches([' ', '\t', '\x0c']);
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            // 组装逻辑行：行尾奇数个反斜杠表示续行
            let mut logical = line.to_string();
            while ends_with_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => {
                        logical.push_str(next.trim_start_matches([' ', '\t', '\x0c']));
                    }
                    None => break,
                }
            }

            let (key, value) = split_key_value(&logical);
            self.map.insert(unescape(&key)?, unescape(&value)?);
        }
        Ok(())
    }

    /// 将属性写入输出流
    ///
    /// 先写入注释头（逐行加 `#` 前缀，空白注释跳过），再写入时间戳注释，
    /// 然后按插入顺序写出 `key=value` 行。输出为纯 ASCII，
    /// 超出可打印范围的码点转义为 `\uXXXX`。
    pub fn store<W: Write>(&self, writer: &mut W, comment: &str) -> io::Result<()> {
        if !comment.trim().is_empty() {
            for line in comment.lines() {
                writeln!(writer, "#{}", escape_comment(line))?;
            }
        }
        let stamp = chrono::Local::now().format("%a %b %d %H:%M:%S %:z %Y");
        writeln!(writer, "#{}", stamp)?;

        for (key, value) in &self.map {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }
        Ok(())
    }
}

/// 检查逻辑行是否以续行符结尾（奇数个反斜杠）
fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    trailing % 2 == 1
}

/// 切分键与值
///
/// 键终止于首个未转义的 `=`、`:` 或空白；分隔符两侧的空白不属于键值。
/// 空白分隔后还允许一个可选的 `=` 或 `:`（`a  =  b` 与 `a b` 均合法）。
fn split_key_value(line: &str) -> (String, String) {
    let cs: Vec<char> = line.chars().collect();
    let n = cs.len();

    let mut key_end = n;
    let mut i = 0;
    while i < n {
        match cs[i] {
            '\\' => i += 2,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => i += 1,
        }
    }
    let key_end = key_end.min(n);

    let mut j = key_end;
    while j < n && matches!(cs[j], ' ' | '\t' | '\x0c') {
        j += 1;
    }
    if j < n && matches!(cs[j], '=' | ':') {
        j += 1;
        while j < n && matches!(cs[j], ' ' | '\t' | '\x0c') {
            j += 1;
        }
    }

    (
        cs[..key_end].iter().collect(),
        cs[j.min(n)..].iter().collect(),
    )
}

/// 解码转义序列
fn unescape(s: &str) -> Result<String, PropertyFileError> {
    let cs: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(cs.len());
    let mut i = 0;
    while i < cs.len() {
        let c = cs[i];
        if c != '\\' {
            out.push(c);
            i += 1;
            continue;
        }
        i += 1;
        let Some(&esc) = cs.get(i) else {
            // 孤立的行尾反斜杠被丢弃
            break;
        };
        match esc {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let code = read_hex4(&cs, i + 1)?;
                i += 4;
                if (0xD800..0xDC00).contains(&code) {
                    // 高位代理项必须与后续低位代理项成对
                    if cs.get(i + 1) == Some(&'\\') && cs.get(i + 2) == Some(&'u') {
                        let low = read_hex4(&cs, i + 3)?;
                        if !(0xDC00..0xE000).contains(&low) {
                            return Err(PropertyFileError::Malformed(
                                "unpaired \\uXXXX surrogate".to_string(),
                            ));
                        }
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        out.push(char::from_u32(combined).ok_or_else(|| {
                            PropertyFileError::Malformed(format!(
                                "invalid code point U+{combined:X}"
                            ))
                        })?);
                        i += 6;
                    } else {
                        return Err(PropertyFileError::Malformed(
                            "unpaired \\uXXXX surrogate".to_string(),
                        ));
                    }
                } else if (0xDC00..0xE000).contains(&code) {
                    return Err(PropertyFileError::Malformed(
                        "unpaired \\uXXXX surrogate".to_string(),
                    ));
                } else {
                    out.push(char::from_u32(code).ok_or_else(|| {
                        PropertyFileError::Malformed(format!("invalid code point U+{code:X}"))
                    })?);
                }
            }
            other => out.push(other),
        }
        i += 1;
    }
    Ok(out)
}

/// 读取 4 位十六进制数
fn read_hex4(cs: &[char], pos: usize) -> Result<u32, PropertyFileError> {
    if pos + 4 > cs.len() {
        return Err(PropertyFileError::Malformed(
            "truncated \\uXXXX escape".to_string(),
        ));
    }
    let hex: String = cs[pos..pos + 4].iter().collect();
    u32::from_str_radix(&hex, 16)
        .map_err(|_| PropertyFileError::Malformed(format!("invalid \\u{hex} escape")))
}

/// 编码转义序列
///
/// 键中所有空格都转义；值中仅转义前导空格。
fn escape(s: &str, escape_all_spaces: bool) -> String {
    let mut out = String::with_capacity(s.len() * 2);
    let mut leading = true;
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            ' ' => {
                if escape_all_spaces || leading {
                    out.push('\\');
                }
                out.push(' ');
            }
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if (' '..='~').contains(&c) => out.push(c),
            c => push_unicode_escape(&mut out, c),
        }
        if c != ' ' {
            leading = false;
        }
    }
    out
}

/// 注释行只做码点转义，不做反斜杠转义
fn escape_comment(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if (' '..='~').contains(&c) || c == '\t' {
            out.push(c);
        } else {
            push_unicode_escape(&mut out, c);
        }
    }
    out
}

/// 以 UTF-16 单元写出 \uXXXX 转义（星位面字符输出代理对）
fn push_unicode_escape(out: &mut String, c: char) {
    let mut buf = [0u16; 2];
    for unit in c.encode_utf16(&mut buf) {
        out.push_str(&format!("\\u{unit:04X}"));
    }
}
