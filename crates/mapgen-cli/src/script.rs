//! Line-oriented wizard sessions.
//!
//! Each non-blank line is one command followed by whitespace-separated
//! arguments. Arguments may be double-quoted to include spaces (`\"` and
//! `\\` escape inside quotes). Lines starting with `#` are comments.
//! Columns are written `table.column`.
//!
//! A failing line is reported and the session moves on to the next line.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{debug, error};

use mapgen_codegen::GeneratorOptions;
use mapgen_model::{ColumnRef, MappingType};
use mapgen_wizard::{ExternalKeys, MatchMode, NameFilter, Wizard};

use crate::report::{data_sources_table, mappings_table};

/// A script line that could not be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    /// 1-based line number.
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptSummary {
    pub executed: usize,
    pub failures: Vec<ScriptFailure>,
}

impl ScriptSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A [`Wizard`] driven by script commands, reporting to `out`.
pub struct ScriptSession<W: Write> {
    wizard: Wizard,
    options: GeneratorOptions,
    out: W,
}

impl<W: Write> ScriptSession<W> {
    pub fn new(wizard: Wizard, options: GeneratorOptions, out: W) -> Self {
        Self {
            wizard,
            options,
            out,
        }
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn into_parts(self) -> (Wizard, W) {
        (self.wizard, self.out)
    }

    /// Execute every line of `reader`.
    ///
    /// # Errors
    ///
    /// Only when the script itself cannot be read; failing commands are
    /// collected in the returned summary.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<ScriptSummary> {
        let mut summary = ScriptSummary::default();
        for (index, line) in reader.lines().enumerate() {
            let line = line.context("read script line")?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            summary.executed += 1;
            if let Err(err) = self.execute(trimmed) {
                let message = format!("{err:#}");
                error!(line = index + 1, command = trimmed, %message, "script command failed");
                writeln!(self.out, "line {}: error: {message}", index + 1)?;
                summary.failures.push(ScriptFailure {
                    line: index + 1,
                    message,
                });
            }
        }
        Ok(summary)
    }

    /// Execute one command line.
    pub fn execute(&mut self, line: &str) -> Result<()> {
        let args = split_args(line)?;
        let Some((command, rest)) = args.split_first() else {
            return Ok(());
        };
        debug!(command = command.as_str(), args = rest.len(), "script command");
        let rest: Vec<&str> = rest.iter().map(String::as_str).collect();
        match command.as_str() {
            "next" => {
                expect_args(&rest, 0, "next")?;
                let moved = self.wizard.next();
                self.report_step(moved)
            }
            "previous" => {
                expect_args(&rest, 0, "previous")?;
                let moved = self.wizard.previous();
                self.report_step(moved)
            }
            "step" => {
                expect_args(&rest, 0, "step")?;
                self.report_step(true)
            }
            "source-table" => {
                let [name, data_source] = optional_second(&rest, "source-table <name> [data-source]")?;
                self.wizard.add_source_table(name, data_source)?;
                self.ok()
            }
            "target-table" => {
                let usage = "target-table <name> <source-table> [data-source]";
                let (name, source, data_source) = match rest.as_slice() {
                    [name, source] => (*name, *source, ""),
                    [name, source, data_source] => (*name, *source, *data_source),
                    _ => bail!("usage: {usage}"),
                };
                let added = self.wizard.add_target_table(name, source, data_source)?;
                self.changed(added.is_some())
            }
            "source-column" => {
                let (table, columns) = table_and_columns(&rest, "source-column <table> <column>...")?;
                let mut added = 0;
                for column in columns {
                    if self.wizard.add_source_column(table, column)?.is_some() {
                        added += 1;
                    }
                }
                self.changed(added > 0)
            }
            "target-column" => {
                let (table, columns) = table_and_columns(&rest, "target-column <table> <column>...")?;
                let mut added = 0;
                for column in columns {
                    if self.wizard.add_target_column(table, column)?.is_some() {
                        added += 1;
                    }
                }
                self.changed(added > 0)
            }
            "remove-source-table" => {
                let [name] = exact::<1>(&rest, "remove-source-table <name>")?;
                let removed = self.wizard.remove_source_table(name);
                self.changed(removed)
            }
            "remove-target-table" => {
                let [name] = exact::<1>(&rest, "remove-target-table <name>")?;
                let removed = self.wizard.remove_target_table(name);
                self.changed(removed)
            }
            "remove-source-column" => {
                let [table, column] = exact::<2>(&rest, "remove-source-column <table> <column>")?;
                let removed = self.wizard.remove_source_column(table, column);
                self.changed(removed)
            }
            "remove-target-column" => {
                let [table, column] = exact::<2>(&rest, "remove-target-column <table> <column>")?;
                let removed = self.wizard.remove_target_column(table, column);
                self.changed(removed)
            }
            "map-none" => {
                let [target, source] = exact::<2>(&rest, "map-none <target> <source>")?;
                let added = self
                    .wizard
                    .add_none_mapping(&column_ref(target)?, &column_ref(source)?);
                self.changed(added)
            }
            "map-dict" => {
                let [target, dict_type, source, session] =
                    exact::<4>(&rest, "map-dict <target> <dict-type> <source> <session>")?;
                let added = self.wizard.add_dict_mapping(
                    &column_ref(target)?,
                    dict_type,
                    &column_ref(source)?,
                    session,
                )?;
                self.changed(added)
            }
            "map-constant" => {
                let [target, value] = exact::<2>(&rest, "map-constant <target> <value>")?;
                let added = self.wizard.add_constant_mapping(&column_ref(target)?, value);
                self.changed(added)
            }
            "map-external" => {
                let [target, select, lookup_key, source_key, correlation_id, session] = exact::<6>(
                    &rest,
                    "map-external <target> <select> <lookup-key> <source-key> <correlation-id> <session>",
                )?;
                let keys = external_keys(lookup_key, source_key, correlation_id, session)?;
                let added = self.wizard.add_external_mapping(
                    &column_ref(target)?,
                    &column_ref(select)?,
                    &keys,
                )?;
                self.changed(added)
            }
            "left-join" => {
                let [index, left, right] = exact::<3>(&rest, "left-join <index> <left> <right>")?;
                let added = self.wizard.add_left_join(
                    mapping_index(index)?,
                    &column_ref(left)?,
                    &column_ref(right)?,
                );
                self.changed(added)
            }
            "remove-mapping" => {
                let [index, kind] = exact::<2>(&rest, "remove-mapping <index> <type>")?;
                let expected: MappingType = kind.parse()?;
                let removed = self.wizard.remove_mapping(mapping_index(index)?, expected);
                self.changed(removed)
            }
            "auto-map" => self.auto_map(&rest),
            "reset" => {
                expect_args(&rest, 0, "reset")?;
                self.wizard.reset();
                self.ok()
            }
            "save" => {
                let [path] = exact::<1>(&rest, "save <path>")?;
                self.wizard
                    .save_config(Path::new(path))
                    .with_context(|| format!("save configuration to {path}"))?;
                self.ok()
            }
            "load" => {
                let [path] = exact::<1>(&rest, "load <path>")?;
                let report = self
                    .wizard
                    .load_config(Path::new(path))
                    .with_context(|| format!("load configuration from {path}"))?;
                for table in &report.skipped_tables {
                    writeln!(self.out, "skipped table {table}")?;
                }
                for mapping in &report.skipped_mappings {
                    writeln!(self.out, "skipped mapping for {mapping}")?;
                }
                self.ok()
            }
            "generate" => match rest.as_slice() {
                [] => {
                    let code = self.wizard.generate_code(&self.options)?;
                    self.out.write_all(code.as_bytes())?;
                    Ok(())
                }
                [path] => {
                    self.wizard
                        .write_code(&self.options, Path::new(path))
                        .with_context(|| format!("write generated code to {path}"))?;
                    self.ok()
                }
                _ => bail!("usage: generate [path]"),
            },
            "show" => {
                let pattern = match rest.as_slice() {
                    [] => "",
                    [pattern] => *pattern,
                    _ => bail!("usage: show [pattern]"),
                };
                let filter = NameFilter::new(pattern, MatchMode::Wildcard)?;
                writeln!(self.out, "{}", mappings_table(self.wizard.project(), &filter))?;
                Ok(())
            }
            "datasources" => match rest.as_slice() {
                [] => {
                    writeln!(self.out, "{}", data_sources_table(self.wizard.data_sources()))?;
                    Ok(())
                }
                ["load", path] => {
                    let count = self
                        .wizard
                        .load_data_sources(Path::new(path))
                        .with_context(|| format!("load data sources from {path}"))?;
                    writeln!(self.out, "loaded {count} data sources")?;
                    Ok(())
                }
                ["save", path] => {
                    self.wizard
                        .save_data_sources(Path::new(path))
                        .with_context(|| format!("save data sources to {path}"))?;
                    self.ok()
                }
                _ => bail!("usage: datasources [load <path> | save <path>]"),
            },
            other => Err(anyhow!("unknown command `{other}`")),
        }
    }

    fn auto_map(&mut self, rest: &[&str]) -> Result<()> {
        let added = match rest {
            ["none", target_table] => self.wizard.auto_map_none(target_table),
            [
                "external",
                target_table,
                select_table,
                lookup_key,
                source_key,
                correlation_id,
                session,
            ] => {
                let keys = external_keys(lookup_key, source_key, correlation_id, session)?;
                self.wizard
                    .auto_map_external(target_table, select_table, &keys)?
            }
            _ => bail!(
                "usage: auto-map none <target-table> | auto-map external <target-table> \
                 <select-table> <lookup-key> <source-key> <correlation-id> <session>"
            ),
        };
        writeln!(self.out, "mapped {added} columns")?;
        Ok(())
    }

    fn report_step(&mut self, moved: bool) -> Result<()> {
        let step = self.wizard.step();
        if !moved {
            writeln!(self.out, "no change")?;
        }
        writeln!(
            self.out,
            "step {}/8 {}: {}",
            step.index() + 1,
            step.name(),
            step.title()
        )?;
        Ok(())
    }

    fn ok(&mut self) -> Result<()> {
        writeln!(self.out, "ok")?;
        Ok(())
    }

    fn changed(&mut self, changed: bool) -> Result<()> {
        if changed {
            self.ok()
        } else {
            writeln!(self.out, "no change")?;
            Ok(())
        }
    }
}

fn expect_args(args: &[&str], count: usize, usage: &str) -> Result<()> {
    if args.len() != count {
        bail!("usage: {usage}");
    }
    Ok(())
}

fn exact<'a, const N: usize>(args: &[&'a str], usage: &str) -> Result<[&'a str; N]> {
    <[&'a str; N]>::try_from(args).map_err(|_| anyhow!("usage: {usage}"))
}

fn optional_second<'a>(args: &[&'a str], usage: &str) -> Result<[&'a str; 2]> {
    match args {
        [first] => Ok([*first, ""]),
        [first, second] => Ok([*first, *second]),
        _ => bail!("usage: {usage}"),
    }
}

fn table_and_columns<'a, 'b>(args: &'b [&'a str], usage: &str) -> Result<(&'a str, &'b [&'a str])> {
    match args {
        [table, columns @ ..] if !columns.is_empty() => Ok((*table, columns)),
        _ => bail!("usage: {usage}"),
    }
}

fn column_ref(value: &str) -> Result<ColumnRef> {
    ColumnRef::parse(value).ok_or_else(|| anyhow!("expected <table>.<column>, got `{value}`"))
}

fn mapping_index(value: &str) -> Result<usize> {
    value
        .parse()
        .with_context(|| format!("invalid mapping index `{value}`"))
}

fn external_keys(
    lookup_key: &str,
    source_key: &str,
    correlation_id: &str,
    session: &str,
) -> Result<ExternalKeys> {
    Ok(ExternalKeys {
        lookup_key: column_ref(lookup_key)?,
        source_key: column_ref(source_key)?,
        correlation_id: column_ref(correlation_id)?,
        session: session.to_string(),
        left_joins: Vec::new(),
    })
}

/// Split a command line into arguments, honoring double quotes.
pub fn split_args(line: &str) -> Result<Vec<String>> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                in_arg = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(escaped) => current.push(escaped),
                            None => bail!("unterminated quote"),
                        },
                        Some(c) => current.push(c),
                        None => bail!("unterminated quote"),
                    }
                }
            }
            c if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            c => {
                in_arg = true;
                current.push(c);
            }
        }
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}
