/// 十进制格式模式
///
/// DecimalFormat 的整数子集：`0` 表示必须出现的数字位（不足补零），
/// `#` 表示可选数字位，`,` 声明分组间隔，数字核心前后的字符作为字面
/// 前缀/后缀。同一个模式对象同时负责解析与格式化，保证往返一致：
/// `"0000"` 将 `0014` 解析为 14，再把 14 渲染回 `0014`。

/// 解析后的十进制模式
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalFormat {
    /// 字面前缀
    prefix: String,
    /// 字面后缀
    suffix: String,
    /// 最少数字位数（`0` 的个数）
    min_digits: usize,
    /// 分组大小（最后一个 `,` 到核心末尾的距离）
    grouping: Option<usize>,
}

impl DecimalFormat {
    /// 解析模式字符串
    ///
    /// 空模式等价于 `"0"`（普通整数）。
    pub fn new(pattern: &str) -> Result<Self, String> {
        if pattern.is_empty() {
            return Ok(Self {
                prefix: String::new(),
                suffix: String::new(),
                min_digits: 1,
                grouping: None,
            });
        }

        let cs: Vec<char> = pattern.chars().collect();
        let is_core = |c: char| matches!(c, '0' | '#' | ',');

        let start = cs.iter().position(|&c| is_core(c));
        let Some(start) = start else {
            return Err(format!("no digit placeholder in pattern \"{pattern}\""));
        };
        let end = cs.iter().rposition(|&c| is_core(c)).unwrap_or(start) + 1;

        let core = &cs[start..end];
        if core.iter().any(|&c| !is_core(c)) {
            return Err(format!("unsupported character inside pattern \"{pattern}\""));
        }

        let min_digits = core.iter().filter(|&&c| c == '0').count();
        let grouping = core
            .iter()
            .rposition(|&c| c == ',')
            .map(|pos| core.len() - pos - 1)
            .filter(|&g| g > 0);

        Ok(Self {
            prefix: cs[..start].iter().collect(),
            suffix: cs[end..].iter().collect(),
            min_digits: min_digits.max(1),
            grouping,
        })
    }

    /// 按模式渲染整数
    pub fn format(&self, value: i64) -> String {
        let mut digits = value.unsigned_abs().to_string();
        while digits.len() < self.min_digits {
            digits.insert(0, '0');
        }

        if let Some(group) = self.grouping {
            let mut grouped = String::with_capacity(digits.len() * 2);
            for (i, c) in digits.chars().enumerate() {
                let remaining = digits.len() - i;
                if i > 0 && remaining % group == 0 {
                    grouped.push(',');
                }
                grouped.push(c);
            }
            digits = grouped;
        }

        let sign = if value < 0 { "-" } else { "" };
        format!("{sign}{}{digits}{}", self.prefix, self.suffix)
    }

    /// 按模式解析整数
    ///
    /// 去掉前缀/后缀与分组分隔符后必须是完整的十进制整数，
    /// 残留字符视为解析错误。
    pub fn parse(&self, text: &str) -> Result<i64, String> {
        let mut t = text.trim();

        let negative = if let Some(rest) = t.strip_prefix('-') {
            t = rest;
            true
        } else {
            false
        };

        if !self.prefix.is_empty() {
            t = t.strip_prefix(self.prefix.as_str()).unwrap_or(t);
        }
        if !self.suffix.is_empty() {
            t = t.strip_suffix(self.suffix.as_str()).unwrap_or(t);
        }

        let digits: String = t.chars().filter(|&c| c != ',').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("unparseable number: \"{text}\""));
        }

        let magnitude: i64 = digits
            .parse()
            .map_err(|_| format!("number out of range: \"{text}\""))?;
        Ok(if negative { -magnitude } else { magnitude })
    }
}
