//! Integration tests for Java generation.

use mapgen_codegen::{CodegenError, GeneratorOptions, generate_java, write_java};
use mapgen_model::{ColumnRef, ExternalConnection, LeftJoin, Mapping, Project};

fn src(project: &Project, table: &str, column: &str) -> mapgen_model::SourceColumnId {
    project
        .resolve_source(&ColumnRef::new(table, column))
        .unwrap()
}

fn dst(project: &Project, table: &str, column: &str) -> mapgen_model::TargetColumnId {
    project
        .resolve_target(&ColumnRef::new(table, column))
        .unwrap()
}

fn customer_project() -> Project {
    let mut project = Project::new();
    project.add_source_table("customer", "crm").unwrap();
    for column in ["id", "name", "status", "gender"] {
        project.add_source_column("customer", column).unwrap();
    }
    project.add_source_table("address", "crm").unwrap();
    for column in ["id", "customer_id", "city"] {
        project.add_source_column("address", column).unwrap();
    }
    project
        .add_target_table("customer_out", "customer", "dwh")
        .unwrap();
    for column in ["id", "name", "status", "gender", "city"] {
        project.add_target_column("customer_out", column).unwrap();
    }
    project
}

fn customer_project_with_mappings() -> Project {
    let mut project = customer_project();
    project.add_mapping(Mapping::none(
        dst(&project, "customer_out", "name"),
        src(&project, "customer", "name"),
    ));
    project.add_mapping(Mapping::constant(
        dst(&project, "customer_out", "status"),
        "ACTIVE",
    ));
    project.add_mapping(Mapping::dict(
        dst(&project, "customer_out", "gender"),
        "GENDER",
        src(&project, "customer", "gender"),
        "dict",
    ));
    project.add_mapping(Mapping::external(
        dst(&project, "customer_out", "city"),
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
    ));
    project
}

fn line_index(code: &str, expected: &str) -> Option<usize> {
    code.lines().position(|line| line.trim() == expected)
}

#[test]
fn none_mapping_line_is_preceded_by_a_comment() {
    let project = customer_project_with_mappings();
    let code = generate_java(&project, &GeneratorOptions::default()).unwrap();

    let idx = line_index(&code, "set.add(new None(customer_out_name,customer_name));")
        .expect("none mapping statement");
    let comment = code.lines().nth(idx - 1).unwrap().trim();
    assert!(comment.starts_with("//"));
    assert!(comment.contains("customer_out.name"));
    assert!(comment.contains("customer.name"));
}

#[test]
fn constant_mapping_renders_literal() {
    let project = customer_project_with_mappings();
    let code = generate_java(&project, &GeneratorOptions::default()).unwrap();
    assert!(line_index(&code, "set.add(new Constant(customer_out_status,\"ACTIVE\"));").is_some());
}

#[test]
fn declarations_precede_mappings_in_registration_order() {
    let project = customer_project_with_mappings();
    let code = generate_java(&project, &GeneratorOptions::default()).unwrap();

    let customer = line_index(&code, "SourceTable customer = new SourceTable(\"customer\", \"crm\");")
        .unwrap();
    let address =
        line_index(&code, "SourceTable address = new SourceTable(\"address\", \"crm\");").unwrap();
    let target = line_index(
        &code,
        "TargetTable customer_out = new TargetTable(\"customer_out\", customer, \"dwh\");",
    )
    .unwrap();
    let column = line_index(
        &code,
        "TargetColumn customer_out_city = new TargetColumn(customer_out, \"city\");",
    )
    .unwrap();
    let first_mapping = code.lines().position(|l| l.trim().starts_with("set.add(")).unwrap();
    let trailer = line_index(&code, "return set;").unwrap();

    assert!(customer < address);
    assert!(address < target);
    assert!(target < column);
    assert!(column < first_mapping);
    assert!(first_mapping < trailer);
}

#[test]
fn line_breaks_in_free_text_stay_inside_the_comment() {
    let mut project = customer_project();
    project.add_mapping(Mapping::dict(
        dst(&project, "customer_out", "gender"),
        "GEN\nDER",
        src(&project, "customer", "gender"),
        "dict",
    ));
    project.add_mapping(Mapping::constant(
        dst(&project, "customer_out", "status"),
        "A\r\nB",
    ));
    let code = generate_java(&project, &GeneratorOptions::default()).unwrap();

    assert!(line_index(&code, "DER").is_none());
    assert!(line_index(&code, "// Dict: customer_out.gender <- customer.gender via GEN\\nDER").is_some());
    assert!(
        line_index(
            &code,
            "set.add(new Dict(customer_out_gender,\"GEN\\nDER\",customer_gender,\"dict\"));"
        )
        .is_some()
    );
    assert!(line_index(&code, "// Constant: customer_out.status <- \"A\\r\\nB\"").is_some());

    let start = line_index(&code, "// Mappings").unwrap();
    let end = line_index(&code, "return set;").unwrap();
    for line in code.lines().take(end).skip(start + 1) {
        let line = line.trim();
        assert!(
            line.is_empty() || line.starts_with("//") || line.starts_with("set.add("),
            "stray line in mapping section: {line:?}"
        );
    }
}

#[test]
fn empty_project_still_produces_a_compilation_unit() {
    let options = GeneratorOptions {
        package: Some("com.example".to_string()),
        ..GeneratorOptions::default()
    };
    let code = generate_java(&Project::new(), &options).unwrap();
    assert!(code.starts_with("// Generated by mapgen. Do not edit.\npackage com.example;\n"));
    assert!(code.contains("public class GeneratedMappings implements MappingProvider {"));
    assert!(!code.contains("set.add("));
    assert!(code.trim_end().ends_with('}'));
}

#[test]
fn generation_is_deterministic() {
    let project = customer_project_with_mappings();
    let options = GeneratorOptions::default();
    assert_eq!(
        generate_java(&project, &options).unwrap(),
        generate_java(&project, &options).unwrap()
    );
}

#[test]
fn customer_projection_snapshot() {
    let project = customer_project_with_mappings();
    let options = GeneratorOptions {
        package: Some("com.example.mappings".to_string()),
        class_name: "CustomerMappings".to_string(),
        ..GeneratorOptions::default()
    };
    let code = generate_java(&project, &options).unwrap();
    insta::assert_snapshot!("customer_projection", code);
}

#[test]
fn write_java_reports_the_failing_path() {
    let project = customer_project();
    let path = std::env::temp_dir()
        .join("mapgen-missing-dir-for-test")
        .join("nested")
        .join("Out.java");
    let err = write_java(&project, &GeneratorOptions::default(), &path).unwrap_err();
    match err {
        CodegenError::Write { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other}"),
    }
}
