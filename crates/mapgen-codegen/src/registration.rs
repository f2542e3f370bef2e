//! Table registration boilerplate from a list of table names.

use std::io::{self, BufRead};

use crate::naming::{java_identifier, java_string_literal};

/// Read newline-delimited table names, stopping at the first blank line.
pub fn read_table_names<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if name.is_empty() {
            break;
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Emit two registration statements per table name read from `reader`.
///
/// ```text
/// SourceTable customer = new SourceTable("customer");
/// tables.put("customer", customer);
/// ```
pub fn registration_statements<R: BufRead>(reader: R) -> io::Result<String> {
    let mut out = String::new();
    for name in read_table_names(reader)? {
        let variable = java_identifier(&name);
        let literal = java_string_literal(&name);
        out.push_str(&format!(
            "SourceTable {variable} = new SourceTable({literal});\n"
        ));
        out.push_str(&format!("tables.put({literal}, {variable});\n"));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn stops_at_first_blank_line() {
        let input = Cursor::new("customer\n  orders  \n\nignored\n");
        let names = read_table_names(input).unwrap();
        assert_eq!(names, vec!["customer", "orders"]);
    }

    #[test]
    fn emits_statements_per_table() {
        let input = Cursor::new("customer\norders\n");
        let code = registration_statements(input).unwrap();
        assert_eq!(
            code,
            "SourceTable customer = new SourceTable(\"customer\");\n\
             tables.put(\"customer\", customer);\n\
             SourceTable orders = new SourceTable(\"orders\");\n\
             tables.put(\"orders\", orders);\n"
        );
    }

    #[test]
    fn empty_input_emits_nothing() {
        let code = registration_statements(Cursor::new("")).unwrap();
        assert!(code.is_empty());
    }
}
