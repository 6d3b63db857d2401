use std::io::Write;

use knvectis::{
    demo_hunters, forest_engine, knowledge_demo, FailurePolicy, KnvectisConfig, ObjectRef,
    TraversalMode,
};
use tempfile::NamedTempFile;

#[test]
fn file_config_drives_a_hunt() {
    let yaml = r#"
version: "1.0"
name: "lateral-and-down"
traversal:
  mode: "custom"
  children: true
  lateral: true
  max_depth: 1
engine:
  failure_policy: "surface"
  max_matches: 2
logging:
  level: "warn"
"#;
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = KnvectisConfig::from_file(file.path()).unwrap();
    assert_eq!(config.engine.failure_policy, FailurePolicy::Surface);
    let mode = config.traversal.to_traversal_mode().unwrap();
    assert_eq!(
        mode,
        TraversalMode::Custom {
            children: true,
            parent: false,
            lateral: true,
        }
    );

    let mut engine = forest_engine(&config).unwrap();
    for hunter in demo_hunters() {
        engine.add_hunter(hunter);
    }
    let (forest, root) = knowledge_demo().unwrap();
    let mut hunt = engine
        .run(ObjectRef::new(&forest, root).unwrap(), mode)
        .unwrap();

    // Depth is capped at the branches, none of which is a leaf.
    assert!(hunt.next().is_none());
    assert_eq!(hunt.stats().visited, 3);
}

#[test]
fn missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = KnvectisConfig::from_file(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, knvectis::ConfigLoadError::FileRead(_)));
}
