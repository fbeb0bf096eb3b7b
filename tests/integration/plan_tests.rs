//! Tests for JSON plans resolved against a slide folder.

use std::fs;

use slide_manifest::{IdentityPolicy, Plan, SlideSource, SourceError, Specimen};

use super::test_utils::TestWorkspace;

fn write_plan(ws: &TestWorkspace, json: &str) -> Plan {
    let path = ws.output_dir().with_file_name("plan.json");
    fs::write(&path, json).unwrap();
    Plan::from_file(&path).unwrap()
}

#[test]
fn test_plan_drives_run() {
    let ws = TestWorkspace::new().with_slides(&[
        "ABCDEFGHIJKL-001-B1-DAB.svs",
        "ABCDEFGHIJKL-001-B2-HE.svs",
        "MNOPQRSTUVWX-002-B1-HE.ndpi",
    ]);
    let plan = write_plan(
        &ws,
        r#"{
            "groups": [
                { "files": ["ABCDEFGHIJKL-001-B1-DAB.svs", "ABCDEFGHIJKL-001-B2-HE.svs"],
                  "algorithm": "AIM-HER2 Breast", "specimen": "Biopsy" },
                { "files": ["MNOPQRSTUVWX-002-B1-HE.ndpi"], "algorithm": "AIM-NASH" }
            ]
        }"#,
    );

    let groups = plan.to_controller(&ws.source()).unwrap().snapshot();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].specimen, Specimen::Biopsy);
    assert_eq!(groups[1].specimen, Specimen::Tissue);

    let summary = ws.run(&groups, IdentityPolicy::default(), 1).unwrap();
    let tests: Vec<&str> = summary.rows.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(tests, ["AIM-HER2 Breast", "AIM-HER2 Breast", "AIM-NASH"]);
    assert_eq!(summary.cases, 2);
}

#[test]
fn test_plan_accepts_explicit_paths() {
    let ws = TestWorkspace::new();
    let outside = ws.output_dir().with_file_name("elsewhere.svs");
    fs::write(&outside, b"slide").unwrap();

    let json = format!(
        r#"{{ "groups": [ {{ "files": [{}], "algorithm": "AIM-NASH" }} ] }}"#,
        serde_json::to_string(&outside.display().to_string()).unwrap()
    );
    let plan = write_plan(&ws, &json);

    let groups = plan.to_controller(&ws.source()).unwrap().snapshot();
    assert_eq!(groups[0].files[0].path, outside);
    assert_eq!(groups[0].files[0].file_name, "elsewhere.svs");
}

#[test]
fn test_plan_unknown_slide() {
    let ws = TestWorkspace::new().with_slides(&["A-1-B1-HE.svs"]);
    let plan = write_plan(
        &ws,
        r#"{ "groups": [ { "files": ["missing.svs"], "algorithm": "AIM-NASH" } ] }"#,
    );

    let err = plan.to_controller(&ws.source()).unwrap_err();
    assert!(matches!(err, SourceError::NotFound(name) if name == "missing.svs"));
}

#[test]
fn test_slide_folder_listing() {
    let ws = TestWorkspace::new().with_slides(&["b.ndpi", "a.svs", "notes.txt", "c.SVS"]);

    let names: Vec<String> = ws
        .source()
        .list_available()
        .unwrap()
        .into_iter()
        .map(|s| s.file_name)
        .collect();

    assert_eq!(names, ["a.svs", "b.ndpi", "c.SVS"]);
}
