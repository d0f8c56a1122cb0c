/// printf 运行时格式化
///
/// 字符串条目的模式机制：已解析出的属性值作为格式串，条目的模式参数
/// 作为唯一实参。支持 `%s %d %i %x %X %o %f %e %%`，旗标 `-`（左对齐）
/// 与 `0`（补零），以及宽度和精度。格式串中最多允许一个消耗实参的
/// 指令，多余的指令报错。

/// 模式参数（字符串、整数或浮点数）
#[derive(Debug, Clone, PartialEq)]
pub enum PatternArg {
    Str(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for PatternArg {
    fn from(v: &str) -> Self {
        PatternArg::Str(v.to_string())
    }
}

impl From<String> for PatternArg {
    fn from(v: String) -> Self {
        PatternArg::Str(v)
    }
}

impl From<i64> for PatternArg {
    fn from(v: i64) -> Self {
        PatternArg::Int(v)
    }
}

impl From<i32> for PatternArg {
    fn from(v: i32) -> Self {
        PatternArg::Int(v as i64)
    }
}

impl From<f64> for PatternArg {
    fn from(v: f64) -> Self {
        PatternArg::Float(v)
    }
}

impl PatternArg {
    fn as_int(&self) -> Result<i64, String> {
        match self {
            PatternArg::Int(v) => Ok(*v),
            PatternArg::Float(v) => Ok(*v as i64),
            PatternArg::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("\"{s}\" is not an integer argument")),
        }
    }

    fn as_float(&self) -> Result<f64, String> {
        match self {
            PatternArg::Int(v) => Ok(*v as f64),
            PatternArg::Float(v) => Ok(*v),
            PatternArg::Str(s) => s
                .trim()
                .parse()
                .map_err(|_| format!("\"{s}\" is not a numeric argument")),
        }
    }

    fn as_display(&self) -> String {
        match self {
            PatternArg::Str(s) => s.clone(),
            PatternArg::Int(v) => v.to_string(),
            PatternArg::Float(v) => v.to_string(),
        }
    }
}

/// 单个格式指令
struct Directive {
    left_align: bool,
    zero_pad: bool,
    width: usize,
    precision: Option<usize>,
    conversion: char,
}

/// 按格式串渲染唯一实参
pub fn format(fmt: &str, arg: &PatternArg) -> Result<String, String> {
    let cs: Vec<char> = fmt.chars().collect();
    let mut out = String::with_capacity(fmt.len());
    let mut consumed = false;
    let mut i = 0;

    while i < cs.len() {
        if cs[i] != '%' {
            out.push(cs[i]);
            i += 1;
            continue;
        }

        let (directive, next) = parse_directive(&cs, i)?;
        i = next;

        if directive.conversion == '%' {
            out.push('%');
            continue;
        }
        if consumed {
            return Err("format string expects more than one argument".to_string());
        }
        consumed = true;

        let rendered = render(&directive, arg)?;
        out.push_str(&pad(rendered, &directive));
    }

    Ok(out)
}

/// 解析 % 之后的旗标、宽度、精度与转换字符
fn parse_directive(cs: &[char], start: usize) -> Result<(Directive, usize), String> {
    let mut i = start + 1;
    let mut left_align = false;
    let mut zero_pad = false;

    while let Some(&c) = cs.get(i) {
        match c {
            '-' => left_align = true,
            '0' => zero_pad = true,
            _ => break,
        }
        i += 1;
    }

    let mut width = 0;
    while let Some(&c) = cs.get(i) {
        if let Some(d) = c.to_digit(10) {
            width = width * 10 + d as usize;
            i += 1;
        } else {
            break;
        }
    }

    let mut precision = None;
    if cs.get(i) == Some(&'.') {
        i += 1;
        let mut p = 0;
        let mut any = false;
        while let Some(&c) = cs.get(i) {
            if let Some(d) = c.to_digit(10) {
                p = p * 10 + d as usize;
                i += 1;
                any = true;
            } else {
                break;
            }
        }
        if !any {
            return Err("missing precision digits in format string".to_string());
        }
        precision = Some(p);
    }

    let Some(&conversion) = cs.get(i) else {
        return Err("truncated format directive".to_string());
    };
    if !matches!(conversion, 's' | 'd' | 'i' | 'x' | 'X' | 'o' | 'f' | 'e' | '%') {
        return Err(format!("unsupported conversion '%{conversion}'"));
    }

    Ok((
        Directive {
            left_align,
            zero_pad,
            width,
            precision,
            conversion,
        },
        i + 1,
    ))
}

/// 渲染指令主体（不含宽度填充）
fn render(d: &Directive, arg: &PatternArg) -> Result<String, String> {
    Ok(match d.conversion {
        's' => {
            let s = arg.as_display();
            match d.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s,
            }
        }
        'd' | 'i' => arg.as_int()?.to_string(),
        'x' => format!("{:x}", arg.as_int()?),
        'X' => format!("{:X}", arg.as_int()?),
        'o' => format!("{:o}", arg.as_int()?),
        'f' => format!("{:.*}", d.precision.unwrap_or(6), arg.as_float()?),
        'e' => {
            let p = d.precision.unwrap_or(6);
            format!("{:.*e}", p, arg.as_float()?)
        }
        _ => unreachable!("conversion validated in parse_directive"),
    })
}

/// 应用宽度与对齐
fn pad(body: String, d: &Directive) -> String {
    if body.len() >= d.width {
        return body;
    }
    let fill = d.width - body.len();
    if d.left_align {
        format!("{body}{}", " ".repeat(fill))
    } else if d.zero_pad && body.starts_with('-') {
        format!("-{}{}", "0".repeat(fill), &body[1..])
    } else if d.zero_pad {
        format!("{}{body}", "0".repeat(fill))
    } else {
        format!("{}{body}", " ".repeat(fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_conversion() {
        let out = format("hello %s", &PatternArg::from("world")).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn test_int_conversions() {
        assert_eq!(format("%d", &PatternArg::Int(42)).unwrap(), "42");
        assert_eq!(format("%05d", &PatternArg::Int(42)).unwrap(), "00042");
        assert_eq!(format("%x", &PatternArg::Int(255)).unwrap(), "ff");
        assert_eq!(format("%X", &PatternArg::Int(255)).unwrap(), "FF");
        assert_eq!(format("%o", &PatternArg::Int(8)).unwrap(), "10");
    }

    #[test]
    fn test_float_precision() {
        assert_eq!(
            format("%.2f", &PatternArg::Float(3.14159)).unwrap(),
            "3.14"
        );
        assert_eq!(format("%.0f", &PatternArg::Float(2.7)).unwrap(), "3");
    }

    #[test]
    fn test_string_arg_parsed_as_number() {
        assert_eq!(
            format("%.2f", &PatternArg::from("3.14159")).unwrap(),
            "3.14"
        );
        assert!(format("%d", &PatternArg::from("abc")).is_err());
    }

    #[test]
    fn test_width_and_alignment() {
        assert_eq!(format("[%6s]", &PatternArg::from("ab")).unwrap(), "[    ab]");
        assert_eq!(format("[%-6s]", &PatternArg::from("ab")).unwrap(), "[ab    ]");
    }

    #[test]
    fn test_negative_zero_pad() {
        assert_eq!(format("%05d", &PatternArg::Int(-42)).unwrap(), "-0042");
    }

    #[test]
    fn test_percent_literal() {
        assert_eq!(format("100%%", &PatternArg::Int(0)).unwrap(), "100%");
    }

    #[test]
    fn test_no_directive_passthrough() {
        assert_eq!(
            format("plain text", &PatternArg::from("unused")).unwrap(),
            "plain text"
        );
    }

    #[test]
    fn test_too_many_directives() {
        assert!(format("%s %s", &PatternArg::from("x")).is_err());
    }

    #[test]
    fn test_bad_directives() {
        assert!(format("%q", &PatternArg::from("x")).is_err());
        assert!(format("trailing %", &PatternArg::from("x")).is_err());
        assert!(format("%.f", &PatternArg::Float(1.0)).is_err());
    }
}
