/// 日期模式翻译
///
/// 把约定俗成的日期模式字母（`yyyy-MM-dd` 一类）翻译成 chrono 的
/// strftime 格式串，渲染与解析都交给 chrono。相同字母的连续出现作为
/// 一组处理，组长决定补零与缩写形式；`'...'` 内为字面文本，`''` 表示
/// 单引号本身。不认识的模式字母直接报错，而不是静默输出。

/// 翻译模式字母为 chrono 格式串
pub fn to_strftime(pattern: &str) -> Result<String, String> {
    let cs: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < cs.len() {
        let c = cs[i];

        if c == '\'' {
            // 引号内的字面文本；'' 转义为单引号
            i += 1;
            if cs.get(i) == Some(&'\'') {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < cs.len() && cs[i] != '\'' {
                push_literal(&mut out, cs[i]);
                i += 1;
            }
            if i >= cs.len() {
                return Err("unterminated quote in date pattern".to_string());
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut count = 1;
        while i + count < cs.len() && cs[i + count] == c {
            count += 1;
        }
        i += count;

        let spec = match (c, count) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', c) if c >= 4 => "%B",
            ('M', 3) => "%b",
            ('M', 2) => "%m",
            ('M', _) => "%-m",
            ('d', c) if c >= 2 => "%d",
            ('d', _) => "%-d",
            ('H', c) if c >= 2 => "%H",
            ('H', _) => "%-H",
            ('h', c) if c >= 2 => "%I",
            ('h', _) => "%-I",
            ('m', c) if c >= 2 => "%M",
            ('m', _) => "%-M",
            ('s', c) if c >= 2 => "%S",
            ('s', _) => "%-S",
            ('S', _) => "%3f",
            ('D', c) if c >= 3 => "%j",
            ('D', _) => "%-j",
            ('E', c) if c >= 4 => "%A",
            ('E', _) => "%a",
            ('a', _) => "%p",
            ('z', _) => "%Z",
            ('Z', _) => "%z",
            ('X', _) => "%:z",
            (other, _) => {
                return Err(format!("unsupported date pattern letter '{other}'"));
            }
        };
        out.push_str(spec);
    }

    Ok(out)
}

/// 写入字面字符，% 需要翻倍
fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
