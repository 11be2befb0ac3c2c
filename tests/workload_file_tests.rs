//! Workload draft files on disk
//!
//! Drafts are edited by hand as often as through `costctl workload`, so
//! loading has to repair what the form invariants forbid.

use costctl::error::CostctlError;
use costctl::exit_codes::{codes, exit_code_for_error};
use costctl::model::Component;
use costctl::validation::{build_fleet_request, INCOMPLETE_COMPONENTS_MESSAGE};
use costctl::workload::WorkloadForm;
use tempfile::TempDir;

#[test]
fn test_hand_written_toml_draft() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("shop.toml");
    std::fs::write(
        &path,
        r#"
[[apps]]
app = "storefront"

[[apps.components]]
name = "web"
vCPUs = 2
memory = 4
behavior = "stop"
frequency = 1

[[apps]]
app = "batch"
share = false
components = []
"#,
    )
    .unwrap();

    let form = WorkloadForm::load(&path).unwrap();
    assert_eq!(form.len(), 2);
    assert!(form.app(0).unwrap().share);
    // an App never has zero components
    assert_eq!(form.app(1).unwrap().components.len(), 1);

    let err = build_fleet_request(
        Default::default(),
        Default::default(),
        Default::default(),
        form.apps(),
    )
    .unwrap_err();
    assert_eq!(err.user_message(), INCOMPLETE_COMPONENTS_MESSAGE);

    let fixed = form.update_component(1, 0, Component::new("cron", 1, 2));
    let request =
        build_fleet_request(Default::default(), Default::default(), Default::default(), fixed.apps())
            .unwrap();
    assert_eq!(request.apps[0].app, "App1");
    assert_eq!(request.apps[1].app, "App2");
    assert!(!request.apps[1].share);
}

#[test]
fn test_json_draft_round_trips_through_toml() {
    let temp_dir = TempDir::new().unwrap();
    let json_path = temp_dir.path().join("draft.json");
    std::fs::write(
        &json_path,
        r#"{"apps": [{"app": "api", "components": [{"name": "svc", "vCPUs": 4, "memory": 16, "anti-affinity": "db"}]}]}"#,
    )
    .unwrap();

    let form = WorkloadForm::load(&json_path).unwrap();
    let component = form.component(0, 0).unwrap();
    assert_eq!(component.vcpus, 4);
    assert_eq!(component.anti_affinity.as_deref(), Some("db"));

    let toml_path = temp_dir.path().join("draft.toml");
    form.save(&toml_path).unwrap();
    assert_eq!(WorkloadForm::load(&toml_path).unwrap(), form);
}

#[test]
fn test_empty_draft_gets_one_app() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.toml");
    std::fs::write(&path, "").unwrap();

    let form = WorkloadForm::load(&path).unwrap();
    assert_eq!(form.len(), 1);
    assert_eq!(form.app(0).unwrap().app, "App1");
}

#[test]
fn test_missing_draft_is_error() {
    let temp_dir = TempDir::new().unwrap();
    assert!(WorkloadForm::load(&temp_dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_malformed_drafts_are_user_errors_in_both_formats() {
    let temp_dir = TempDir::new().unwrap();
    let toml_path = temp_dir.path().join("w.toml");
    let json_path = temp_dir.path().join("w.json");
    std::fs::write(&toml_path, "[[apps]\napp = ").unwrap();
    std::fs::write(&json_path, r#"{"apps": [{"app": "x",}"#).unwrap();

    for path in [&toml_path, &json_path] {
        let err = WorkloadForm::load(path).unwrap_err();
        assert!(
            matches!(&err, CostctlError::Validation { field, .. } if field == "workload"),
            "{}: {:?}",
            path.display(),
            err
        );
        assert!(err.user_message().contains(&path.display().to_string()));
        assert_eq!(exit_code_for_error(&err), codes::USER_ERROR);
    }
}
