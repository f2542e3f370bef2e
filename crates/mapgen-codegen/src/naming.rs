//! Java identifier and literal helpers.

/// Java reserved words and literals that cannot name a variable.
const JAVA_KEYWORDS: [&str; 54] = [
    "_",
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "false",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "true",
    "try",
    "void",
    "volatile",
    "while",
];

/// Turn a table or column name into a Java identifier.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`; a leading digit gets a `_`
/// prefix and a reserved word gets a `_` suffix. Plain SQL names pass through
/// unchanged.
pub fn java_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if JAVA_KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Variable name of a column: `<table>_<column>`.
pub(crate) fn column_variable(table: &str, column: &str) -> String {
    java_identifier(&format!("{table}_{column}"))
}

/// Quote a value as a Java string literal.
pub fn java_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Make free text safe for a single `//` comment line.
///
/// Line breaks and tabs are written as `\n`, `\r` and `\t`, other control
/// characters become a space, and backslashes are doubled so the compiler
/// never sees a unicode escape.
pub(crate) fn comment_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push(' '),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_pass_through() {
        assert_eq!(java_identifier("customer_out"), "customer_out");
        assert_eq!(column_variable("customer", "name"), "customer_name");
    }

    #[test]
    fn odd_characters_are_replaced() {
        assert_eq!(java_identifier("crm.customer"), "crm_customer");
        assert_eq!(java_identifier("order-lines"), "order_lines");
        assert_eq!(java_identifier("2024_sales"), "_2024_sales");
    }

    #[test]
    fn literals_are_escaped() {
        assert_eq!(java_string_literal("ACTIVE"), "\"ACTIVE\"");
        assert_eq!(java_string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
        assert_eq!(java_string_literal("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn reserved_words_get_a_suffix() {
        assert_eq!(java_identifier("class"), "class_");
        assert_eq!(java_identifier("new"), "new_");
        assert_eq!(java_identifier("_"), "__");
        assert_eq!(java_identifier("classes"), "classes");
        assert_eq!(column_variable("order", "int"), "order_int");
    }

    #[test]
    fn comment_text_stays_on_one_line() {
        assert_eq!(comment_text("customer.name"), "customer.name");
        assert_eq!(comment_text("GEN\nDER"), "GEN\\nDER");
        assert_eq!(comment_text("a\r\tb"), "a\\r\\tb");
        assert_eq!(comment_text("C:\\u000a"), "C:\\\\u000a");
        assert_eq!(comment_text("bell\u{7}"), "bell ");
        assert!(!comment_text("x\ny\rz").contains(['\n', '\r']));
    }
}
