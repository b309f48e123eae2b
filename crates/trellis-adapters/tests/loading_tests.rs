//! End-to-end loading through the filesystem adapters.

use std::fs;
use std::sync::Arc;

use tempfile::TempDir;
use trellis_adapters::{
    FileSystemResourceLoader, ManifestLoader, builtin_factories, environment::system_environment_from,
    manifest::manifest_base_dir,
};
use trellis_core::prelude::*;

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::write(
        root.join("trellis.toml"),
        r#"
[[unit]]
name = "BaseConfig"

[[unit.property_source]]
name = "app"
locations = ["classpath:app.properties"]

[[unit.property_source]]
name = "server"
locations = ["conf/server.toml"]

[[unit]]
name = "ProfileConfig"

[[unit.property_source]]
name = "app"
locations = ["file:conf/${profile:dev}.json"]
ignore_resource_not_found = true
"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("conf")).unwrap();
    fs::write(
        root.join("app.properties"),
        "app.name=trellis\napp.greeting=Hello from ${app.name} on ${server.port}",
    )
    .unwrap();
    fs::write(root.join("conf/server.toml"), "[server]\nport = 8080\n").unwrap();
    fs::write(root.join("conf/prod.json"), r#"{"app": {"name": "trellis-prod"}}"#).unwrap();
    temp
}

fn service(
    root: &std::path::Path,
    environment: StandardEnvironment,
) -> ConfigurationService<StandardEnvironment> {
    ConfigurationService::new(PropertySourceProcessor::new(
        environment,
        Arc::new(FileSystemResourceLoader::new(manifest_base_dir(&root.join("trellis.toml")))),
        builtin_factories(),
    ))
}

#[test]
fn test_manifest_loads_into_environment() {
    let temp = project();
    let units = ManifestLoader::new().load(&temp.path().join("trellis.toml")).unwrap();
    let mut service = service(temp.path(), StandardEnvironment::new());

    let report = service.load_units(&units).unwrap();

    assert_eq!(report.loaded.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].location.contains("${profile:dev}"));
    let env = service.environment();
    assert_eq!(env.property_sources().names(), vec!["server", "app"]);
    assert_eq!(
        env.get_property("app.greeting").unwrap().as_deref(),
        Some("Hello from trellis on 8080")
    );
}

#[test]
fn test_profile_from_environment_selects_location_and_merges() {
    let temp = project();
    let units = ManifestLoader::new().load(&temp.path().join("trellis.toml")).unwrap();
    let mut environment = StandardEnvironment::new();
    environment
        .property_sources_mut()
        .add_last(system_environment_from([("PROFILE", "prod")]));
    let mut service = service(temp.path(), environment);

    let report = service.load_units(&units).unwrap();

    assert!(report.is_complete());
    let env = service.environment();
    let app = env.property_sources().get("app").unwrap();
    let composite = app.as_composite().unwrap();
    assert_eq!(composite.sources().len(), 2);
    assert!(composite.source_names()[0].ends_with("prod.json]"));
    assert_eq!(env.get_property("app.name").unwrap().as_deref(), Some("trellis-prod"));
    assert_eq!(
        env.property_sources().names(),
        vec!["systemEnvironment", "server", "app"]
    );
}
