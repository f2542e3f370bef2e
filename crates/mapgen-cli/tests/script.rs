//! Integration tests for scripted wizard sessions.

use std::io::Cursor;

use mapgen_cli::script::{ScriptSession, ScriptSummary};
use mapgen_codegen::GeneratorOptions;
use mapgen_model::MappingType;
use mapgen_wizard::{Wizard, WizardStep};
use tempfile::tempdir;

const CUSTOMER_SCRIPT: &str = r#"
# tables
source-table customer crm
source-column customer id name status
source-table address crm
source-column address customer_id city
target-table customer_out customer dwh
target-column customer_out id name status city

map-none customer_out.name customer.name
map-constant customer_out.status "ACTIVE"
map-external customer_out.city address.city address.customer_id customer.id customer.id crm
left-join 2 address.customer_id customer.id
auto-map none customer_out
"#;

fn run(script: &str) -> (ScriptSummary, Wizard, String) {
    let mut session = ScriptSession::new(Wizard::new(), GeneratorOptions::default(), Vec::new());
    let summary = session.run(Cursor::new(script)).unwrap();
    let (wizard, out) = session.into_parts();
    (summary, wizard, String::from_utf8(out).unwrap())
}

#[test]
fn script_builds_project_and_generates_java() {
    let script = format!("{CUSTOMER_SCRIPT}generate\n");
    let (summary, wizard, out) = run(&script);

    assert!(summary.is_success(), "{:?}", summary.failures);
    assert_eq!(summary.executed, 12);
    let types: Vec<MappingType> = wizard
        .project()
        .mappings()
        .iter()
        .map(|mapping| mapping.mapping_type())
        .collect();
    assert_eq!(
        types,
        vec![
            MappingType::None,
            MappingType::Constant,
            MappingType::ExternalConnection,
            MappingType::None,
        ]
    );
    assert!(out.contains("mapped 1 columns"));
    assert!(out.contains("set.add(new None(customer_out_name,customer_name));"));
    assert!(out.contains("set.add(new Constant(customer_out_status,\"ACTIVE\"));"));
    assert!(out.contains(".leftJoin(address_customer_id,customer_id)"));
}

#[test]
fn failing_lines_are_reported_and_the_session_continues() {
    let script = "\
source-table customer crm
map-none customer_out.name
frobnicate
source-column customer id
remove-mapping 0 Sometimes
";
    let (summary, wizard, out) = run(script);

    assert!(!summary.is_success());
    assert_eq!(summary.executed, 5);
    let lines: Vec<usize> = summary.failures.iter().map(|f| f.line).collect();
    assert_eq!(lines, vec![2, 3, 5]);
    assert!(summary.failures[0].message.starts_with("usage: map-none"));
    assert!(out.contains("line 3: error: unknown command `frobnicate`"));
    let customer = wizard.project().source_table_id("customer").unwrap();
    let table = wizard.project().source_table(customer).unwrap();
    assert!(table.table().contains_column("id"));
}

#[test]
fn unknown_references_change_nothing_without_failing() {
    let (summary, wizard, out) = run("map-constant nowhere.column x\nremove-source-table ghost\n");
    assert!(summary.is_success());
    assert!(wizard.project().mappings().is_empty());
    assert_eq!(out.lines().filter(|line| *line == "no change").count(), 2);
}

#[test]
fn navigation_reports_steps_and_stops_at_the_ends() {
    let (summary, wizard, out) = run("previous\nnext\nnext\nstep\n");
    assert!(summary.is_success());
    assert_eq!(wizard.step(), WizardStep::AddColumns);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "no change");
    assert_eq!(lines[1], "step 1/8 databaseConfig: Database configuration");
    assert_eq!(lines[2], "step 2/8 addTables: Add tables");
    assert_eq!(lines[4], "step 3/8 addColumns: Add columns");
}

#[test]
fn save_and_load_round_trip_through_script() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("nested").join("mapping.json");
    let script = format!("{CUSTOMER_SCRIPT}save \"{}\"\n", config.display());
    let (summary, original, _) = run(&script);
    assert!(summary.is_success(), "{:?}", summary.failures);

    let (summary, restored, _) = run(&format!("load \"{}\"\n", config.display()));
    assert!(summary.is_success(), "{:?}", summary.failures);
    assert_eq!(
        restored.project().mappings().len(),
        original.project().mappings().len()
    );

    let options = GeneratorOptions::default();
    assert_eq!(
        restored.generate_code(&options).unwrap(),
        original.generate_code(&options).unwrap()
    );
}

#[test]
fn generate_to_file_writes_java() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("GeneratedMappings.java");
    let script = format!("{CUSTOMER_SCRIPT}generate \"{}\"\n", output.display());
    let (summary, _, _) = run(&script);
    assert!(summary.is_success(), "{:?}", summary.failures);
    let java = std::fs::read_to_string(&output).unwrap();
    assert!(java.contains("public class GeneratedMappings implements MappingProvider"));
}
