//! End-to-end tests for directory analysis with the default export layout.

use sniff_bout::{
    audit::AuditLog,
    batch::{run_batch, BatchOptions},
    config::{AnalysisConfig, CoordPair, ObjectPlacement},
    report::write_table,
};
use std::path::{Path, PathBuf};

fn test_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sniff-bout-it-{tag}-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("Failed to create test dir");
    dir
}

/// Left zone centered at (100, 100), right at (300, 100), radius 10 + 10 = 20 px.
fn config() -> AnalysisConfig {
    AnalysisConfig {
        object_pixel_radius: 10,
        object_cm_radius: 2.0,
        interaction_distance_cm: 2.0,
        left_object: ObjectPlacement::new(CoordPair(100.0, 0.0), CoordPair(0.0, 100.0)),
        right_object: ObjectPlacement::new(CoordPair(300.0, 0.0), CoordPair(0.0, 100.0)),
        interaction_time_ms: 100,
        video_fps: 30,
        trial_runtime_secs: 60,
        ..AnalysisConfig::default()
    }
}

/// Build one export row: frame index, subject B nose at fields 1/2 and
/// subject A nose at fields 13/14, with filler body parts in between.
fn export_row(frame: usize, a: (f64, f64), b: (f64, f64)) -> String {
    let mut fields = vec![frame.to_string(), b.0.to_string(), b.1.to_string()];
    fields.push("0.99".to_string());
    for _ in 0..3 {
        fields.extend(["0".to_string(), "0".to_string(), "0.5".to_string()]);
    }
    fields.extend([a.0.to_string(), a.1.to_string(), "0.99".to_string()]);
    fields.join(",")
}

/// Header line, 3 metadata rows, then the given frames.
fn write_export(dir: &Path, name: &str, frames: &[((f64, f64), (f64, f64))]) -> PathBuf {
    let mut lines = vec![
        "scorer,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc,dlc".to_string(),
        "individuals,m2,m2,m2,m2,m2,m2,m2,m2,m2,m2,m2,m2,m1,m1,m1".to_string(),
        "bodyparts,nose,nose,nose,ear,ear,ear,tail,tail,tail,body,body,body,nose,nose,nose"
            .to_string(),
        "coords,x,y,likelihood,x,y,likelihood,x,y,likelihood,x,y,likelihood,x,y,likelihood"
            .to_string(),
    ];
    for (i, (a, b)) in frames.iter().enumerate() {
        lines.push(export_row(i, *a, *b));
    }
    let path = dir.join(name);
    std::fs::write(&path, lines.join("\n")).expect("Failed to write export");
    path
}

const AWAY: (f64, f64) = (200.0, 400.0);
const AT_LEFT: (f64, f64) = (105.0, 95.0);
const AT_RIGHT: (f64, f64) = (295.0, 110.0);

#[test]
fn test_single_bout_end_to_end() {
    let dir = test_dir("single");
    let mut frames = vec![(AWAY, AWAY); 13];
    for frame in frames.iter_mut().skip(3).take(3) {
        frame.0 = AT_LEFT;
    }
    write_export(&dir, "trial.csv", &frames);

    let config = config();
    let criteria = config.criteria().expect("valid config");
    assert_eq!(criteria.required_run_length, 3);

    let log = AuditLog::new();
    let report = run_batch(&dir, &criteria, &config.columns, BatchOptions::default(), &log)
        .expect("batch runs");

    assert_eq!(report.summaries.len(), 2);
    let subject1 = &report.summaries[0];
    assert_eq!(subject1.key(), "trial_1_subject_1");
    assert_eq!(subject1.bout_count, 1);
    assert_eq!(subject1.total_qualifying_frames, 3);
    assert_eq!(subject1.total_frames, 13);
    assert!((subject1.qualifying_secs - 0.1).abs() < 1e-9);
    assert!((subject1.percent_qualifying_frames - 3.0 / 13.0 * 100.0).abs() < 1e-9);
    assert!((subject1.percent_qualifying_time - 0.16666666666666669).abs() < 1e-9);

    assert_eq!(log.stats().frames_read, 13);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_missing_cells_and_swaps_across_trials() {
    let dir = test_dir("multi");

    // Trial 1: subject B at the right object for 4 frames, one lost frame.
    let mut first = vec![(AWAY, AWAY); 10];
    for frame in first.iter_mut().take(4) {
        frame.1 = AT_RIGHT;
    }
    first[8].1 = (f64::NAN, f64::NAN);
    write_export(&dir, "01.csv", &first);

    // Trial 2: identities swapped by the tracker.
    let mut second = vec![(AWAY, AWAY); 10];
    for frame in second.iter_mut().skip(2).take(5) {
        frame.0 = AT_RIGHT;
        frame.1 = AT_LEFT;
    }
    write_export(&dir, "02.csv", &second);

    let config = config();
    let criteria = config.criteria().expect("valid config");
    let log = AuditLog::new();
    let report = run_batch(&dir, &criteria, &config.columns, BatchOptions { jobs: 2 }, &log)
        .expect("batch runs");

    assert_eq!(report.summaries.len(), 4);
    let by_key = |key: &str| {
        report
            .summaries
            .iter()
            .find(|s| s.key() == key)
            .expect("summary present")
    };

    let t1s2 = by_key("trial_1_subject_2");
    assert_eq!(t1s2.bout_count, 1);
    assert_eq!(t1s2.total_qualifying_frames, 4);
    assert_eq!(t1s2.total_frames, 9);

    let t2s1 = by_key("trial_2_subject_1");
    assert_eq!(t2s1.bout_count, 1);
    assert_eq!(t2s1.total_qualifying_frames, 5);
    let t2s2 = by_key("trial_2_subject_2");
    assert_eq!(t2s2.bout_count, 1);

    assert_eq!(log.stats().invalid_frames, 1);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_repeat_runs_write_identical_tables() {
    let dir = test_dir("repeat");
    let mut frames = vec![(AWAY, AWAY); 30];
    for frame in frames.iter_mut().skip(5).take(10) {
        frame.0 = AT_LEFT;
        frame.1 = AT_RIGHT;
    }
    write_export(&dir, "a.csv", &frames);
    write_export(&dir, "b.csv", &frames[..20]);

    let config = config();
    let criteria = config.criteria().expect("valid config");

    let render = |jobs: usize| {
        let report = run_batch(
            &dir,
            &criteria,
            &config.columns,
            BatchOptions { jobs },
            &AuditLog::new(),
        )
        .expect("batch runs");
        let mut buf = Vec::new();
        write_table(&mut buf, &report.summaries).expect("table written");
        String::from_utf8(buf).expect("utf8 table")
    };

    let first = render(1);
    assert_eq!(first, render(1));
    assert_eq!(first, render(3));
    assert_eq!(first.lines().count(), 5);

    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let mut config = config();
    config.object_cm_radius = 0.0;
    assert!(config.criteria().is_err());
}
