use clap::Parser;
use longpaths::cli::{Args, SortKey};
use longpaths::output::{csv, terminal};
use longpaths::utils::sort_violations;
use longpaths::{ScanConfig, scan};
use std::fs;
use tempfile::TempDir;

fn scan_sample(root: &std::path::Path) -> longpaths::ScanResult {
    let nested = root.join("first_level_directory").join("second_level_directory");
    fs::create_dir_all(&nested).expect("Failed to create nested dirs");
    fs::write(nested.join("document.txt"), "content").expect("Failed to write file");
    scan(ScanConfig::new(root, 1)).expect("scan failed")
}

#[test]
fn test_csv_export_round_trips_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let tree = temp_dir.path().join("tree");
    fs::create_dir(&tree).unwrap();
    let result = scan_sample(&tree);
    let output = temp_dir.path().join("long.csv");

    let args = Args::parse_from([
        "longpaths",
        tree.to_str().unwrap(),
        "-m",
        "1",
        "--output",
        output.to_str().unwrap(),
    ]);
    csv::render(&result.violations, &args).expect("CSV export failed");

    let mut reader = ::csv::Reader::from_path(&output).expect("Failed to open CSV");
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["Path", "Length", "Excess"]);

    let rows: Vec<::csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), result.violations.len());
    assert_eq!(rows.len(), 3);
    for row in &rows {
        let length: u32 = row[1].parse().unwrap();
        let excess: u32 = row[2].parse().unwrap();
        assert_eq!(excess, length - 1);
        assert_eq!(row[0].chars().count() as u32, length);
    }
}

#[test]
fn test_csv_export_to_unwritable_path_fails_without_losing_result() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = scan_sample(temp_dir.path());
    let bad = temp_dir.path().join("no_such_dir").join("out.csv");

    let args = Args::parse_from(["longpaths", "--output", bad.to_str().unwrap()]);
    assert!(csv::render(&result.violations, &args).is_err());
    assert_eq!(result.violations.len(), 3);
}

#[test]
fn test_terminal_table_shows_top_rows_and_summary() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let mut result = scan_sample(temp_dir.path());
    sort_violations(&mut result.violations, SortKey::Length);

    let args = Args::parse_from(["longpaths", "-m", "1", "--detailed", "--top", "2"]);
    let mut buf = Vec::new();
    terminal::write_table(&mut buf, &result.violations, &result.summary, &args)
        .expect("Failed to write table");
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert!(lines[0].starts_with("Type"));
    assert!(lines[1].starts_with("File"));
    assert!(lines[1].ends_with(&result.violations[0].path));
    assert!(lines[2].starts_with("Folder"));
    assert!(lines[2].ends_with("second_level_directory"));
    assert_eq!(lines[3], "... 1 more not shown");
    assert!(text.contains(&format!(
        "Found 3 path(s) longer than 1 characters (1 files, 2 folders, longest {})",
        result.violations[0].length
    )));
    assert!(text.contains("Scanned 3 entries; 0 skipped subtree(s) or failed batch(es)"));
}
