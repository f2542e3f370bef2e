//! Property tests for the set-like registry behaviour.

use mapgen_model::{ColumnRef, Mapping, Project};
use proptest::prelude::*;

fn column_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,6}"
}

proptest! {
    #[test]
    fn column_names_stay_unique(names in prop::collection::vec(column_name(), 1..20)) {
        let mut project = Project::new();
        project.add_source_table("t", "ds").unwrap();
        for name in &names {
            project.add_source_column("t", name).unwrap();
            project.add_source_column("t", name).unwrap();
        }

        let table = project.source_table(project.source_table_id("t").unwrap()).unwrap();
        let stored: Vec<&str> = table.table().column_names().collect();
        let mut expected: Vec<&str> = Vec::new();
        for name in &names {
            if !expected.contains(&name.as_str()) {
                expected.push(name);
            }
        }
        prop_assert_eq!(stored, expected);
    }

    #[test]
    fn one_mapping_per_target_column(
        writes in prop::collection::vec((0usize..4, any::<bool>()), 1..30)
    ) {
        let mut project = Project::new();
        project.add_source_table("src", "ds").unwrap();
        project.add_target_table("dst", "src", "ds").unwrap();
        let mut targets = Vec::new();
        for idx in 0..4 {
            let name = format!("c{idx}");
            let source = project.add_source_column("src", &name).unwrap().unwrap();
            let target = project.add_target_column("dst", &name).unwrap().unwrap();
            targets.push((target, source));
        }

        for (idx, constant) in &writes {
            let (target, source) = targets[*idx];
            let mapping = if *constant {
                Mapping::constant(target, "X")
            } else {
                Mapping::none(target, source)
            };
            prop_assert!(project.add_mapping(mapping));
        }

        let mut distinct: Vec<usize> = writes.iter().map(|(idx, _)| *idx).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(project.mappings().len(), distinct.len());

        let last = writes.last().unwrap();
        let last_target = ColumnRef::new("dst", format!("c{}", last.0));
        let newest = project.mappings().last().unwrap();
        prop_assert_eq!(Some(newest.target), project.resolve_target(&last_target));
    }
}
