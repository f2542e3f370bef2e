//! Save/load tests for mapping configurations and data sources.

use mapgen_model::{ColumnRef, ExternalConnection, LeftJoin, Mapping, MappingType, Project};
use mapgen_persistence::{
    ConfigDocument, DataSource, MappingRecord, load_data_sources, load_project,
    save_data_sources, save_project,
};
use serde_json::Value;
use tempfile::tempdir;

fn populated_project() -> Project {
    let mut project = Project::new();
    project.add_source_table("customer", "crm").unwrap();
    for column in ["id", "name", "gender"] {
        project.add_source_column("customer", column).unwrap();
    }
    project.add_source_table("address", "crm").unwrap();
    for column in ["id", "customer_id", "city"] {
        project.add_source_column("address", column).unwrap();
    }
    project
        .add_target_table("customer_out", "customer", "dwh")
        .unwrap();
    for column in ["id", "name", "gender", "status", "city"] {
        project.add_target_column("customer_out", column).unwrap();
    }

    let src = |p: &Project, t: &str, c: &str| p.resolve_source(&ColumnRef::new(t, c)).unwrap();
    let dst = |p: &Project, c: &str| {
        p.resolve_target(&ColumnRef::new("customer_out", c))
            .unwrap()
    };

    let none = Mapping::none(dst(&project, "name"), src(&project, "customer", "name"));
    let dict = Mapping::dict(
        dst(&project, "gender"),
        "GENDER",
        src(&project, "customer", "gender"),
        "dict",
    );
    let constant = Mapping::constant(dst(&project, "status"), "ACTIVE");
    let external = Mapping::external(
        dst(&project, "city"),
        ExternalConnection {
            select: src(&project, "address", "city"),
            lookup_key: src(&project, "address", "customer_id"),
            source_key: src(&project, "customer", "id"),
            correlation_id: src(&project, "customer", "id"),
            session: "crm".to_string(),
            left_joins: vec![LeftJoin {
                left: src(&project, "address", "id"),
                right: src(&project, "customer", "id"),
            }],
        },
    );
    for mapping in [none, dict, constant, external] {
        assert!(project.add_mapping(mapping));
    }
    project
}

#[test]
fn project_round_trips_through_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    let original = populated_project();

    save_project(&original, &path).unwrap();

    let mut reloaded = Project::new();
    let report = load_project(&mut reloaded, &path).unwrap();

    assert!(report.is_clean());
    assert_eq!(
        ConfigDocument::from_project(&reloaded),
        ConfigDocument::from_project(&original)
    );
    let kinds: Vec<MappingType> = reloaded.mappings().iter().map(Mapping::mapping_type).collect();
    assert_eq!(
        kinds,
        vec![
            MappingType::None,
            MappingType::Dict,
            MappingType::Constant,
            MappingType::ExternalConnection
        ]
    );
}

#[test]
fn loading_resets_existing_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    save_project(&populated_project(), &path).unwrap();

    let mut project = Project::new();
    project.add_source_table("stale", "old").unwrap();
    load_project(&mut project, &path).unwrap();

    assert!(project.source_table_id("stale").is_none());
    assert!(project.source_table_id("customer").is_some());
}

#[test]
fn json_layout_uses_documented_keys() {
    let document = ConfigDocument::from_project(&populated_project());
    let json: Value = serde_json::to_value(&document).unwrap();

    assert_eq!(json["targetTables"][0]["sourceTableName"], "customer");
    assert_eq!(json["sourceTables"][0]["dataSourceName"], "crm");
    assert_eq!(json["mappings"][0]["type"], "None");
    assert_eq!(json["mappings"][2]["type"], "Constant");
    assert_eq!(json["mappings"][2]["value"], "ACTIVE");
    let external = &json["mappings"][3];
    assert_eq!(external["type"], "ExternalConnection");
    assert_eq!(external["leftJoins"][0]["leftTable"], "address");
    assert_eq!(external["leftJoins"][0]["rightColumn"], "id");
}

#[test]
fn unresolved_entries_are_skipped_and_reported() {
    let json = r#"{
        "sourceTables": [{ "name": "customer", "dataSourceName": "crm", "columns": ["id"] }],
        "targetTables": [
            { "name": "customer_out", "sourceTableName": "customer", "columns": ["id"] },
            { "name": "orphan_out", "sourceTableName": "orphan", "columns": ["id"] }
        ],
        "mappings": [
            { "type": "None", "targetTable": "customer_out", "targetColumn": "id",
              "sourceTable": "customer", "sourceColumn": "missing" },
            { "type": "Constant", "targetTable": "customer_out", "targetColumn": "id", "value": "1" }
        ]
    }"#;
    let document: ConfigDocument = serde_json::from_str(json).unwrap();
    assert_eq!(document.version, "1.0");

    let mut project = Project::new();
    let report = document.apply_to(&mut project).unwrap();

    assert_eq!(report.skipped_tables, vec!["orphan_out"]);
    assert_eq!(report.skipped_mappings, vec!["customer_out.id"]);
    assert_eq!(project.mappings().len(), 1);
    assert_eq!(project.mappings()[0].mapping_type(), MappingType::Constant);
}

#[test]
fn blank_names_in_files_are_errors() {
    let document = ConfigDocument {
        source_tables: vec![mapgen_persistence::SourceTableRecord {
            name: " ".to_string(),
            data_source_name: String::new(),
            columns: Vec::new(),
        }],
        ..ConfigDocument::default()
    };
    let mut project = Project::new();
    assert!(document.apply_to(&mut project).is_err());
}

#[test]
fn mapping_record_target_reads_any_variant() {
    let record = MappingRecord::Constant {
        target_table: "customer_out".to_string(),
        target_column: "status".to_string(),
        value: "ACTIVE".to_string(),
    };
    assert_eq!(record.target().to_string(), "customer_out.status");
}

#[test]
fn data_sources_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("datasources.json");
    let sources = vec![
        DataSource {
            db_type: "MySQL".to_string(),
            jdbc_driver: "com.mysql.cj.jdbc.Driver".to_string(),
            jdbc_url: "jdbc:mysql://localhost:3306/crm".to_string(),
            username: "etl".to_string(),
            password: "secret".to_string(),
            database_name: "crm".to_string(),
            ..DataSource::new("crm")
        },
        DataSource::new("dwh"),
    ];

    save_data_sources(&sources, &path).unwrap();
    let loaded = load_data_sources(&path).unwrap();

    assert_eq!(loaded, sources);
    let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert!(raw.is_array());
    assert_eq!(raw[0]["jdbcUrl"], "jdbc:mysql://localhost:3306/crm");
}

#[test]
fn mapping_config_does_not_carry_credentials() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapping.json");
    save_project(&populated_project(), &path).unwrap();
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("password"));
    assert!(!raw.contains("jdbcUrl"));
}
