//! Terminal tables for projects and data sources.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use mapgen_model::{MappingKind, Project, SourceColumnId};
use mapgen_persistence::DataSource;
use mapgen_wizard::NameFilter;

const MASKED_PASSWORD: &str = "********";

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

pub fn source_tables_table(project: &Project, filter: &NameFilter) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source table"),
        header_cell("Data source"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for (_, source) in project.source_tables() {
        if !filter.matches(source.name()) {
            continue;
        }
        table.add_row(vec![
            name_cell(source.name()),
            Cell::new(source.data_source()),
            Cell::new(join_names(source.table().column_names())),
        ]);
    }
    table
}

pub fn target_tables_table(project: &Project, filter: &NameFilter) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Target table"),
        header_cell("Derived from"),
        header_cell("Data source"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for (_, target) in project.target_tables() {
        if !filter.matches(target.name()) {
            continue;
        }
        let derived_from = project
            .source_table(target.source())
            .map(|source| source.name().to_string())
            .unwrap_or_default();
        table.add_row(vec![
            name_cell(target.name()),
            Cell::new(derived_from),
            Cell::new(target.data_source()),
            Cell::new(join_names(target.table().column_names())),
        ]);
    }
    table
}

/// Mappings whose target table passes `filter`, with their list index.
pub fn mappings_table(project: &Project, filter: &NameFilter) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Type"),
        header_cell("Target"),
        header_cell("Definition"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, mapping) in project.mappings().iter().enumerate() {
        let Some(target) = project.target_ref(mapping.target) else {
            continue;
        };
        if !filter.matches(&target.table) {
            continue;
        }
        table.add_row(vec![
            Cell::new(index),
            Cell::new(mapping.mapping_type()),
            Cell::new(&target),
            Cell::new(describe_mapping(project, &mapping.kind)),
        ]);
    }
    table
}

fn column_name(project: &Project, id: SourceColumnId) -> String {
    project
        .source_ref(id)
        .map_or_else(|| "?".to_string(), |column| column.to_string())
}

/// One-line description of what a mapping reads.
pub fn describe_mapping(project: &Project, kind: &MappingKind) -> String {
    match kind {
        MappingKind::None { source } => format!("<- {}", column_name(project, *source)),
        MappingKind::Dict {
            dict_type,
            source,
            session,
        } => format!(
            "{dict_type}({}) session {session}",
            column_name(project, *source)
        ),
        MappingKind::Constant { value } => format!("= {value:?}"),
        MappingKind::ExternalConnection(connection) => {
            let mut text = format!(
                "{} where {} = {}, correlated by {}, session {}",
                column_name(project, connection.select),
                column_name(project, connection.lookup_key),
                column_name(project, connection.source_key),
                column_name(project, connection.correlation_id),
                connection.session,
            );
            for join in &connection.left_joins {
                text.push_str(&format!(
                    ", left join {} = {}",
                    column_name(project, join.left),
                    column_name(project, join.right)
                ));
            }
            text
        }
    }
}

pub fn data_sources_table(sources: &[DataSource]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Driver"),
        header_cell("URL"),
        header_cell("User"),
        header_cell("Password"),
        header_cell("Database"),
    ]);
    apply_table_style(&mut table);
    for source in sources {
        let password = if source.password.is_empty() {
            ""
        } else {
            MASKED_PASSWORD
        };
        table.add_row(vec![
            name_cell(&source.name),
            Cell::new(&source.db_type),
            Cell::new(&source.jdbc_driver),
            Cell::new(&source.jdbc_url),
            Cell::new(&source.username),
            Cell::new(password),
            Cell::new(&source.database_name),
        ]);
    }
    table
}
