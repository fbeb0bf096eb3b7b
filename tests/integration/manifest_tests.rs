//! End-to-end tests for manifest generation runs.

use std::collections::HashSet;
use std::fs;

use slide_manifest::{
    IdentityPolicy, ManifestError, SlideFile, SlideGroup, Specimen, TransactionIdentityScope,
    MANIFEST_COLUMNS,
};

use super::test_utils::{header_line, read_manifest, TestWorkspace};

// =============================================================================
// Basic Functionality Tests
// =============================================================================

#[test]
fn test_her2_biopsy_case() {
    let ws = TestWorkspace::new()
        .with_slides(&["ABCDEFGHIJKL-001-B1-DAB.svs", "ABCDEFGHIJKL-001-B2-HE.svs"]);
    let groups = [ws.group(
        &["ABCDEFGHIJKL-001-B1-DAB.svs", "ABCDEFGHIJKL-001-B2-HE.svs"],
        "AIM-HER2 Breast",
        Specimen::Biopsy,
    )];

    let summary = ws.run(&groups, IdentityPolicy::default(), 1).unwrap();

    assert_eq!(summary.cases, 1);
    assert_eq!(summary.rows.len(), 2);

    let rows = read_manifest(&summary.manifest_path);
    assert_eq!(rows, summary.rows);

    for row in &rows {
        assert_eq!(row.test_name, "AIM-HER2 Breast");
        assert_eq!(row.test_version, "1.1.0");
        assert_eq!(row.specimen, "Tissue");
        assert_eq!(row.specimen_type, "Biopsy");
        assert_eq!(row.replace, "");
    }

    assert_eq!(rows[0].patient_id, rows[1].patient_id);
    assert_eq!(rows[0].first_name, rows[1].first_name);
    assert_eq!(rows[0].last_name, rows[1].last_name);
    assert_eq!(rows[0].patient_dob, rows[1].patient_dob);

    assert_eq!((rows[0].stain.as_str(), rows[0].block_id.as_str()), ("DAB", "B1"));
    assert_eq!((rows[1].stain.as_str(), rows[1].block_id.as_str()), ("HE", "B2"));
}

#[test]
fn test_manifest_location_and_header() {
    let ws = TestWorkspace::new().with_slides(&["A-1-B1-HE.svs"]);
    let groups = [ws.group(&["A-1-B1-HE.svs"], "AIM-NASH", Specimen::Tissue)];

    let summary = ws.run(&groups, IdentityPolicy::default(), 2).unwrap();

    assert_eq!(summary.folder, ws.output_dir().join("Upload_20240315_103000"));
    assert_eq!(
        summary.manifest_path,
        summary.folder.join("upload_file_20240315_103000.csv")
    );
    assert_eq!(header_line(&summary.manifest_path), MANIFEST_COLUMNS.join(","));
}

#[test]
fn test_slides_copied_with_same_name() {
    let ws = TestWorkspace::new().with_slides(&["A-1-B1-HE.svs", "B-1-B1-HE.ndpi"]);
    let groups = [ws.group(&["A-1-B1-HE.svs", "B-1-B1-HE.ndpi"], "TumorDetect", Specimen::Tissue)];

    let summary = ws.run(&groups, IdentityPolicy::default(), 3).unwrap();

    for name in ["A-1-B1-HE.svs", "B-1-B1-HE.ndpi"] {
        let copied = summary.folder.join(name);
        assert_eq!(fs::read(&copied).unwrap(), name.as_bytes());
        // Source stays in place
        assert!(ws.slides_dir().join(name).exists());
    }
}

#[test]
fn test_no_hyphen_slide_name() {
    let ws = TestWorkspace::new().with_slides(&["SLIDE001.svs"]);
    let groups = [ws.group(&["SLIDE001.svs"], "PathAssist Derm", Specimen::Tissue)];

    let row = ws.run(&groups, IdentityPolicy::default(), 4).unwrap().rows.remove(0);

    assert_eq!(row.stain, "H&E");
    assert_eq!(row.test_input_name, "H&E_slides");
    assert_eq!(row.block_id.len(), 7);
    assert!(row.block_id.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn test_row_order_follows_groups_then_files() {
    let names = ["CASE00000003-1-B1-HE.svs", "CASE00000001-1-B1-HE.svs", "CASE00000002-1-B1-HE.svs"];
    let ws = TestWorkspace::new().with_slides(&names);
    let groups = [
        ws.group(&[names[0]], "AIM-ER Breast", Specimen::Tissue),
        SlideGroup::default(),
        ws.group(&[names[1], names[2]], "AIM-PR Breast", Specimen::Biopsy),
    ];

    let summary = ws.run(&groups, IdentityPolicy::default(), 5).unwrap();
    let order: Vec<&str> = summary
        .rows
        .iter()
        .map(|r| r.slide_file_name.as_str())
        .collect();

    assert_eq!(order, names.to_vec());
    assert_eq!(summary.cases, 3);
}

// =============================================================================
// Identity Tests
// =============================================================================

#[test]
fn test_distinct_cases_get_distinct_patient_ids() {
    let names: Vec<String> = (0..200).map(|i| format!("CASE{:08}-1-B1-HE.svs", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let ws = TestWorkspace::new().with_slides(&refs);
    let groups = [ws.group(&refs, "TumorDetect", Specimen::Tissue)];

    let summary = ws.run(&groups, IdentityPolicy::default(), 6).unwrap();

    let ids: HashSet<&str> = summary.rows.iter().map(|r| r.patient_id.as_str()).collect();
    assert_eq!(ids.len(), 200);
}

#[test]
fn test_same_case_across_groups_shares_patient() {
    let ws = TestWorkspace::new()
        .with_slides(&["SHAREDCASE01-1-B1-ER.svs", "SHAREDCASE01-1-B1-PR.svs"]);
    let groups = [
        ws.group(&["SHAREDCASE01-1-B1-ER.svs"], "AIM-ER Breast", Specimen::Tissue),
        ws.group(&["SHAREDCASE01-1-B1-PR.svs"], "AIM-PR Breast", Specimen::Biopsy),
    ];

    let rows = ws.run(&groups, IdentityPolicy::default(), 7).unwrap().rows;

    assert_eq!(rows[0].patient_id, rows[1].patient_id);
    assert_eq!(rows[0].first_name, rows[1].first_name);
    assert_eq!(rows[0].patient_dob, rows[1].patient_dob);
    // Per-slide transaction scope by default
    assert_ne!(rows[0].accession_id, rows[1].accession_id);
}

#[test]
fn test_per_case_scope_shares_accession() {
    let ws = TestWorkspace::new().with_slides(&["SHAREDCASE01-1-B1-HE.svs", "SHAREDCASE01-1-B2-HE.svs"]);
    let groups = [ws.group(
        &["SHAREDCASE01-1-B1-HE.svs", "SHAREDCASE01-1-B2-HE.svs"],
        "AIM-NASH",
        Specimen::Tissue,
    )];
    let policy = IdentityPolicy {
        transaction_scope: TransactionIdentityScope::PerCase,
        case_assignee_count: 2,
        ..IdentityPolicy::default()
    };

    let rows = ws.run(&groups, policy, 8).unwrap().rows;

    assert_eq!(rows[0].accession_id, rows[1].accession_id);
    assert_eq!(rows[0].case_assignees, rows[1].case_assignees);
    assert_eq!(rows[0].case_assignees.split(',').count(), 2);
}

#[test]
fn test_birth_dates_in_range() {
    let names: Vec<String> = (0..100).map(|i| format!("DOB{:09}.svs", i)).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let ws = TestWorkspace::new().with_slides(&refs);
    let groups = [ws.group(&refs, "AIM-NASH", Specimen::Tissue)];

    let rows = ws.run(&groups, IdentityPolicy::default(), 9).unwrap().rows;

    for row in rows {
        // ISO dates compare correctly as strings
        assert!(row.patient_dob.as_str() >= "1940-01-01", "{}", row.patient_dob);
        assert!(row.patient_dob.as_str() <= "2015-12-31", "{}", row.patient_dob);
    }
}

#[test]
fn test_same_seed_reproduces_rows() {
    let names = ["REPRO0000001-1-B1-HE.svs", "REPRO0000002.svs"];
    let first = TestWorkspace::new().with_slides(&names);
    let second = TestWorkspace::new().with_slides(&names);

    let a = first
        .run(&[first.group(&names, "AIM-NASH", Specimen::Tissue)], IdentityPolicy::default(), 42)
        .unwrap();
    let b = second
        .run(&[second.group(&names, "AIM-NASH", Specimen::Tissue)], IdentityPolicy::default(), 42)
        .unwrap();

    assert_eq!(a.rows, b.rows);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[test]
fn test_unknown_algorithm_is_fatal() {
    let ws = TestWorkspace::new().with_slides(&["A-1-B1-HE.svs"]);
    let groups = [ws.group(&["A-1-B1-HE.svs"], "Imaginary Algorithm", Specimen::Tissue)];

    let err = ws.run(&groups, IdentityPolicy::default(), 10).unwrap_err();

    assert!(matches!(err, ManifestError::UnknownAlgorithm(ref name) if name == "Imaginary Algorithm"));
    assert!(!ws.output_dir().exists());
}

#[test]
fn test_copy_failure_keeps_completed_rows() {
    let ws = TestWorkspace::new().with_slides(&["GOOD00000001-1-B1-HE.svs"]);
    let missing = SlideFile::from_path(ws.slides_dir().join("GONE00000001-1-B1-HE.svs")).unwrap();
    let mut group = ws.group(&["GOOD00000001-1-B1-HE.svs"], "AIM-NASH", Specimen::Tissue);
    group.files.push(missing);

    let err = ws.run(&[group], IdentityPolicy::default(), 11).unwrap_err();
    assert!(matches!(err, ManifestError::CopyFailed { .. }));

    let folder = ws.output_dir().join("Upload_20240315_103000");
    assert!(folder.join("GOOD00000001-1-B1-HE.svs").exists());
    assert!(!folder.join("GONE00000001-1-B1-HE.svs").exists());

    let rows = read_manifest(&folder.join("upload_file_20240315_103000.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].slide_file_name, "GOOD00000001-1-B1-HE.svs");

    let ledger = slide_manifest::UsedIdsLedger::load(&ws.ledger_path()).unwrap();
    assert_eq!(ledger.len(), 1);
    assert!(ledger.contains_patient_id(&rows[0].patient_id));
}

#[test]
fn test_second_run_same_second_gets_new_folder() {
    let ws = TestWorkspace::new().with_slides(&["A-1-B1-HE.svs"]);
    let groups = [ws.group(&["A-1-B1-HE.svs"], "AIM-NASH", Specimen::Tissue)];

    let first = ws.run(&groups, IdentityPolicy::default(), 12).unwrap();
    let second = ws.run(&groups, IdentityPolicy::default(), 13).unwrap();

    assert_ne!(first.folder, second.folder);
    assert_eq!(second.folder, ws.output_dir().join("Upload_20240315_103000_2"));
    assert!(second.manifest_path.exists());
}
