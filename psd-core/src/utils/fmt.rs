use crate::environment::prelude::Value;

/// Substitutes `%`-placeholders in `format` in a single left-to-right pass.
///
/// `%s`, `%d`, `%i` and `%f` each consume the next argument, `%%` emits a
/// literal percent sign. A placeholder with no argument left is kept
/// verbatim; arguments with no placeholder are appended space-separated.
pub fn substitute(format: &str, args: &[Value]) -> String {
    let mut out = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            },
            Some(spec @ ('s' | 'd' | 'i' | 'f')) => {
                let spec = *spec;
                match args.next() {
                    Some(value) => {
                        chars.next();
                        out.push_str(&substitute_one(spec, value));
                    },
                    None => out.push('%'),
                }
            },
            _ => out.push('%'),
        }
    }

    for value in args {
        out.push(' ');
        out.push_str(&value.to_string());
    }

    out
}

fn substitute_one(spec: char, value: &Value) -> String {
    match spec {
        's' => value.to_string(),
        // numeric specifiers render non-numbers as NaN instead of failing
        'd' | 'i' | 'f' => match value {
            Value::Int(_) | Value::Real(_) => value.to_string(),
            _ => "NaN".to_string(),
        },
        _ => unreachable!("unhandled format specifier `{spec}`"),
    }
}
