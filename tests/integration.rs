use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn kws_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("kws");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let docs_dir = root.join("docs");
    fs::create_dir_all(&docs_dir).unwrap();
    fs::write(
        docs_dir.join("claim.txt"),
        "Claim 0042 review notes.\nThe claim was Approved by staff.\nNo fraud found; fraud checks passed.\n",
    )
    .unwrap();
    fs::write(docs_dir.join("clean.txt"), "Nothing of interest here.\n").unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/kws.sqlite"

[scan]
context_radius = 10

[render]
markup = "markdown"

[server]
bind = "127.0.0.1:7341"
"#,
        root.display()
    );

    let config_path = config_dir.join("kws.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_kws(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = kws_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run kws binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn seed_keywords(config_path: &Path) {
    let (_, stderr, success) = run_kws(config_path, &["init"]);
    assert!(success, "init failed: {}", stderr);
    for (text, category) in [("approved", "positive"), ("fraud", "negative")] {
        let (_, stderr, success) =
            run_kws(config_path, &["keyword", "add", text, "--category", category]);
        assert!(success, "keyword add {} failed: {}", text, stderr);
    }
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_kws(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data").join("kws.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_kws(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_kws(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_missing_config_errors() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_kws(&tmp.path().join("nope.toml"), &["init"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"), "{}", stderr);
}

#[test]
fn test_keyword_add_and_list() {
    let (_tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);

    let (stdout, _, success) = run_kws(&config_path, &["keyword", "list"]);
    assert!(success);
    assert!(stdout.contains("approved"));
    assert!(stdout.contains("fraud"));
    assert!(stdout.contains("2 keyword(s)"));

    let (stdout, _, success) =
        run_kws(&config_path, &["keyword", "list", "--category", "negative"]);
    assert!(success);
    assert!(stdout.contains("fraud"));
    assert!(!stdout.contains("approved"));
}

#[test]
fn test_keyword_duplicate_rejected() {
    let (_tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);

    let (_, stderr, success) = run_kws(
        &config_path,
        &["keyword", "add", "FRAUD", "--category", "negative"],
    );
    assert!(!success, "duplicate keyword should fail");
    assert!(stderr.contains("already exists"), "stderr: {}", stderr);
}

#[test]
fn test_keyword_empty_and_bad_category_rejected() {
    let (_tmp, config_path) = setup_test_env();
    run_kws(&config_path, &["init"]);

    let (_, stderr, success) =
        run_kws(&config_path, &["keyword", "add", "   ", "--category", "positive"]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"), "stderr: {}", stderr);

    let (_, _, success) =
        run_kws(&config_path, &["keyword", "add", "late", "--category", "neutral"]);
    assert!(!success);
}

#[test]
fn test_keyword_remove() {
    let (_tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);

    let (stdout, _, success) = run_kws(&config_path, &["keyword", "remove", "1"]);
    assert!(success);
    assert!(stdout.contains("Removed keyword #1"));

    let (_, stderr, success) = run_kws(&config_path, &["keyword", "remove", "1"]);
    assert!(!success);
    assert!(stderr.contains("No keyword with id 1"));
}

#[test]
fn test_keyword_import_export() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);

    let import = tmp.path().join("more.json");
    fs::write(
        &import,
        r#"[{"text": "denied", "category": "negative"}, {"text": "Approved", "category": "positive"}]"#,
    )
    .unwrap();
    let (stdout, stderr, success) =
        run_kws(&config_path, &["keyword", "import", import.to_str().unwrap()]);
    assert!(success, "import failed: {}", stderr);
    assert!(stdout.contains("Imported 1 keyword(s), skipped 1 duplicate(s)"));

    let export = tmp.path().join("out").join("keywords.json");
    let (_, stderr, success) = run_kws(
        &config_path,
        &["keyword", "export", "--output", export.to_str().unwrap()],
    );
    assert!(success, "export failed: {}", stderr);
    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    let texts: Vec<&str> = exported
        .as_array()
        .unwrap()
        .iter()
        .map(|k| k["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["approved", "fraud", "denied"]);
}

#[test]
fn test_scan_text_document() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("claim.txt");

    let (stdout, stderr, success) = run_kws(&config_path, &["scan", doc.to_str().unwrap()]);
    assert!(success, "scan failed: {}", stderr);
    assert!(stdout.contains("page 1, line 2 [positive] approved"), "{}", stdout);
    assert!(stdout.contains("claim was **Approved** by staff."), "{}", stdout);
    assert!(stdout.contains("page 1, line 3 [negative] fraud"), "{}", stdout);
    assert!(stdout.contains("Summary: 1 positive, 1 negative"), "{}", stdout);
}

#[test]
fn test_scan_all_occurrences_json() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("claim.txt");

    let (stdout, stderr, success) = run_kws(
        &config_path,
        &[
            "scan",
            doc.to_str().unwrap(),
            "--mode",
            "all-occurrences",
            "--format",
            "json",
        ],
    );
    assert!(success, "scan failed: {}", stderr);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["page_count"], 1);
    assert_eq!(report["mode"], "all-occurrences");
    assert_eq!(report["matches"].as_array().unwrap().len(), 3);
    assert_eq!(report["summary"]["counts_by_keyword"]["fraud"], 2);
    assert_eq!(report["summary"]["counts_by_category"]["negative"], 2);
}

#[test]
fn test_scan_category_filter() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("claim.txt");

    let (stdout, _, success) = run_kws(
        &config_path,
        &[
            "scan",
            doc.to_str().unwrap(),
            "--category",
            "positive",
            "--format",
            "json",
        ],
    );
    assert!(success);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let keywords = report["summary"]["counts_by_keyword"].as_object().unwrap();
    assert!(keywords.contains_key("approved"));
    assert!(!keywords.contains_key("fraud"));
}

#[test]
fn test_scan_lines_view() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("claim.txt");

    let (stdout, _, success) = run_kws(
        &config_path,
        &["scan", doc.to_str().unwrap(), "--format", "lines"],
    );
    assert!(success);
    assert_eq!(
        stdout,
        "page 1, line 2: approved (positive)\npage 1, line 3: fraud (negative)\n"
    );
}

#[test]
fn test_scan_no_matches() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("clean.txt");

    let (stdout, _, success) = run_kws(&config_path, &["scan", doc.to_str().unwrap()]);
    assert!(success);
    assert!(stdout.contains("No matches."));
}

#[test]
fn test_scan_unknown_extension_errors() {
    let (tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("data.bin");
    fs::write(&doc, b"\x00\x01").unwrap();

    let (_, stderr, success) = run_kws(&config_path, &["scan", doc.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Cannot infer content type"), "{}", stderr);
}

#[test]
fn test_scan_respects_max_file_bytes() {
    let (tmp, config_path) = setup_test_env();
    let config = fs::read_to_string(&config_path).unwrap();
    fs::write(
        &config_path,
        config.replace("context_radius = 10", "context_radius = 10\nmax_file_bytes = 8"),
    )
    .unwrap();
    seed_keywords(&config_path);
    let doc = tmp.path().join("docs").join("claim.txt");

    let (_, stderr, success) = run_kws(&config_path, &["scan", doc.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("max_file_bytes"), "{}", stderr);
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();
    seed_keywords(&config_path);

    let (stdout, _, success) = run_kws(&config_path, &["stats"]);
    assert!(success);
    assert!(stdout.contains("Keywords:    2"));
    assert!(stdout.contains("positive"));
    assert!(stdout.contains("negative"));
}
