/// Exposed (camelCase) name of a snake_case wire method name.
///
/// Every `_` followed by a lowercase ASCII letter is replaced by that letter
/// in uppercase; anything else is kept as-is, so `notify` stays `notify`.
pub fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '_' {
            if let Some(next) = chars.peek().copied().filter(char::is_ascii_lowercase) {
                out.push(next.to_ascii_uppercase());
                chars.next();
                continue;
            }
        }
        out.push(ch);
    }

    out
}
