//! Java compilation unit generation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use mapgen_model::{
    ExternalConnection, Mapping, MappingKind, Project, SourceColumnId, SourceTableId,
    TargetColumnId,
};
use tracing::{info, warn};

use crate::error::{CodegenError, Result};
use crate::naming::{column_variable, comment_text, java_identifier, java_string_literal};

/// Options for Java generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Package declaration; omitted when `None`.
    pub package: Option<String>,
    /// Name of the generated class.
    pub class_name: String,
    /// Provider interface the class implements.
    pub interface_name: String,
    /// Package of the runtime mapping framework, imported with a wildcard.
    pub framework_package: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            package: None,
            class_name: "GeneratedMappings".to_string(),
            interface_name: "MappingProvider".to_string(),
            framework_package: "mapping.framework".to_string(),
        }
    }
}

/// Line writer with four-space indentation.
#[derive(Default)]
struct JavaWriter {
    out: String,
    indent: usize,
}

impl JavaWriter {
    fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str("    ");
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self, text: &str) {
        self.line(text);
        self.indent += 1;
    }

    fn close(&mut self, text: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.line(text);
    }
}

struct ColumnVar {
    variable: String,
    display: String,
}

/// Java variable names for every table and column of a project.
#[derive(Default)]
struct Variables {
    source_tables: HashMap<SourceTableId, String>,
    source_columns: HashMap<SourceColumnId, ColumnVar>,
    target_columns: HashMap<TargetColumnId, ColumnVar>,
}

impl Variables {
    fn collect(project: &Project) -> Self {
        let mut vars = Self::default();
        for (id, table) in project.source_tables() {
            vars.source_tables.insert(id, java_identifier(table.name()));
            for (column, column_id) in table.table().columns() {
                vars.source_columns.insert(
                    column_id,
                    ColumnVar {
                        variable: column_variable(table.name(), column),
                        display: format!("{}.{}", table.name(), column),
                    },
                );
            }
        }
        for (_, table) in project.target_tables() {
            for (column, column_id) in table.table().columns() {
                vars.target_columns.insert(
                    column_id,
                    ColumnVar {
                        variable: column_variable(table.name(), column),
                        display: format!("{}.{}", table.name(), column),
                    },
                );
            }
        }
        vars
    }

    fn source(&self, id: SourceColumnId, index: usize) -> Result<&ColumnVar> {
        self.source_columns
            .get(&id)
            .ok_or(CodegenError::UnknownColumn {
                index,
                kind: "source",
            })
    }

    fn target(&self, id: TargetColumnId, index: usize) -> Result<&ColumnVar> {
        self.target_columns
            .get(&id)
            .ok_or(CodegenError::UnknownColumn {
                index,
                kind: "target",
            })
    }
}

/// Local holding the mapping set inside `getMappings`.
const SET_VARIABLE: &str = "set";

/// Variable names that would be declared more than once in the generated code,
/// sorted. The method's own `set` local counts as a declaration.
fn variable_collisions(project: &Project) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    seen.insert(SET_VARIABLE.to_string(), 1);
    for (_, table) in project.source_tables() {
        *seen.entry(java_identifier(table.name())).or_default() += 1;
        for column in table.table().column_names() {
            *seen.entry(column_variable(table.name(), column)).or_default() += 1;
        }
    }
    for (_, table) in project.target_tables() {
        *seen.entry(java_identifier(table.name())).or_default() += 1;
        for column in table.table().column_names() {
            *seen.entry(column_variable(table.name(), column)).or_default() += 1;
        }
    }
    let mut collisions: Vec<String> = seen
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect();
    collisions.sort();
    collisions
}

/// Generate the Java compilation unit for `project`.
///
/// Output is deterministic: tables and columns follow registration order and
/// mappings follow the mapping list.
pub fn generate_java(project: &Project, options: &GeneratorOptions) -> Result<String> {
    for name in variable_collisions(project) {
        warn!(variable = %name, "generated variable name is declared more than once");
    }
    let vars = Variables::collect(project);
    let mut w = JavaWriter::default();

    w.line("// Generated by mapgen. Do not edit.");
    if let Some(package) = options.package.as_deref().filter(|p| !p.trim().is_empty()) {
        w.line(&format!("package {};", package.trim()));
    }
    w.blank();
    w.line("import java.util.LinkedHashSet;");
    w.line("import java.util.Set;");
    w.blank();
    w.line(&format!("import {}.*;", options.framework_package));
    w.blank();
    w.open(&format!(
        "public class {} implements {} {{",
        options.class_name, options.interface_name
    ));
    w.blank();
    w.line("@Override");
    w.open("public Set<Mapping> getMappings() {");
    w.line(&format!("Set<Mapping> {SET_VARIABLE} = new LinkedHashSet<>();"));

    w.blank();
    w.line("// Source tables");
    for (_, table) in project.source_tables() {
        w.line(&format!(
            "SourceTable {} = new SourceTable({}, {});",
            java_identifier(table.name()),
            java_string_literal(table.name()),
            java_string_literal(table.data_source())
        ));
    }

    w.blank();
    w.line("// Target tables");
    for (_, table) in project.target_tables() {
        let source = vars
            .source_tables
            .get(&table.source())
            .map_or("null", String::as_str);
        w.line(&format!(
            "TargetTable {} = new TargetTable({}, {}, {});",
            java_identifier(table.name()),
            java_string_literal(table.name()),
            source,
            java_string_literal(table.data_source())
        ));
    }

    w.blank();
    w.line("// Source columns");
    for (_, table) in project.source_tables() {
        for column in table.table().column_names() {
            w.line(&format!(
                "SourceColumn {} = new SourceColumn({}, {});",
                column_variable(table.name(), column),
                java_identifier(table.name()),
                java_string_literal(column)
            ));
        }
    }

    w.blank();
    w.line("// Target columns");
    for (_, table) in project.target_tables() {
        for column in table.table().column_names() {
            w.line(&format!(
                "TargetColumn {} = new TargetColumn({}, {});",
                column_variable(table.name(), column),
                java_identifier(table.name()),
                java_string_literal(column)
            ));
        }
    }

    w.blank();
    w.line("// Mappings");
    for (index, mapping) in project.mappings().iter().enumerate() {
        let (comment, statement) = render_mapping(&vars, index, mapping)?;
        w.line(&format!("// {}", comment_text(&comment)));
        w.line(&statement);
    }

    w.blank();
    w.line("return set;");
    w.close("}");
    w.close("}");
    Ok(w.out)
}

/// Render one mapping as a descriptive comment and a `set.add(...)` statement.
fn render_mapping(vars: &Variables, index: usize, mapping: &Mapping) -> Result<(String, String)> {
    let target = vars.target(mapping.target, index)?;
    let rendered = match &mapping.kind {
        MappingKind::None { source } => {
            let source = vars.source(*source, index)?;
            (
                format!("None: {} <- {}", target.display, source.display),
                format!("set.add(new None({},{}));", target.variable, source.variable),
            )
        }
        MappingKind::Dict {
            dict_type,
            source,
            session,
        } => {
            let source = vars.source(*source, index)?;
            (
                format!(
                    "Dict: {} <- {} via {}",
                    target.display, source.display, dict_type
                ),
                format!(
                    "set.add(new Dict({},{},{},{}));",
                    target.variable,
                    java_string_literal(dict_type),
                    source.variable,
                    java_string_literal(session)
                ),
            )
        }
        MappingKind::Constant { value } => (
            format!("Constant: {} <- \"{}\"", target.display, value),
            format!(
                "set.add(new Constant({},{}));",
                target.variable,
                java_string_literal(value)
            ),
        ),
        MappingKind::ExternalConnection(connection) => {
            render_external(vars, index, &target.variable, &target.display, connection)?
        }
    };
    Ok(rendered)
}

fn render_external(
    vars: &Variables,
    index: usize,
    target_variable: &str,
    target_display: &str,
    connection: &ExternalConnection,
) -> Result<(String, String)> {
    let select = vars.source(connection.select, index)?;
    let lookup_key = vars.source(connection.lookup_key, index)?;
    let source_key = vars.source(connection.source_key, index)?;
    let correlation_id = vars.source(connection.correlation_id, index)?;

    let mut comment = format!(
        "ExternalConnection: {} <- {} where {} = {}, id {}",
        target_display,
        select.display,
        lookup_key.display,
        source_key.display,
        correlation_id.display
    );
    let mut statement = format!(
        "set.add(new ExternalConnection({},{},{},{},{},{})",
        target_variable,
        select.variable,
        lookup_key.variable,
        source_key.variable,
        correlation_id.variable,
        java_string_literal(&connection.session)
    );
    for join in &connection.left_joins {
        let left = vars.source(join.left, index)?;
        let right = vars.source(join.right, index)?;
        comment.push_str(&format!(", left join {} = {}", left.display, right.display));
        statement.push_str(&format!(".leftJoin({},{})", left.variable, right.variable));
    }
    statement.push_str(");");
    Ok((comment, statement))
}

/// Generate the Java unit and write it verbatim to `path`.
pub fn write_java(project: &Project, options: &GeneratorOptions, path: &Path) -> Result<()> {
    let code = generate_java(project, options)?;
    fs::write(path, code).map_err(|source| CodegenError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        path = %path.display(),
        mappings = project.mappings().len(),
        "wrote generated mappings"
    );
    Ok(())
}
