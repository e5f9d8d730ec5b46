//! Identifier quoting and object-name sanitization.

/// Quote an identifier in bracket style, escaping closing brackets:
/// `odd]name` becomes `[odd]]name]`.
pub fn quote_ident(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Schema-qualified quoted name: `[schema].[name]`.
pub fn qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}

/// Replace anything outside `[A-Za-z0-9_]` with `_` so a derived table or
/// constraint name is safe to embed unquoted.
pub fn safe_object_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Quote and comma-join a list of column names.
pub fn quoted_list<'a, I>(cols: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    cols.into_iter()
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(", ")
}
