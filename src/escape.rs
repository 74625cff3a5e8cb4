//! Escaping of code fragments for embedding in a double-quoted shell argument.

/// Escape a fragment so it survives inside `"$..."`-style double quotes.
///
/// A single left-to-right pass over the input maps each of `\`, `"`,
/// `` ` `` and `$` to its backslash-escaped pair; every other character,
/// including newlines and runs of spaces, passes through untouched.
/// The scan reads the original string only, so already-produced escapes
/// are never re-escaped within one call. The transform is deliberately
/// not idempotent: it is applied exactly once, when a dispatcher wraps a
/// fragment in a `node -e "..."` / `python -c "..."` invocation.
pub fn escape_for_shell(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '"' | '`' | '$' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
