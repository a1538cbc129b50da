mod common;

use common::{fixture, fixture_str, TestEnv};
use predicates::str::contains;

#[test]
fn validate_fixture() {
    let env = TestEnv::new();
    env.cmd()
        .arg("validate")
        .arg(fixture("IMPROVEMENTS.md"))
        .assert()
        .success()
        .stdout(contains("valid improvement report (4 improvement(s), 0 warning(s))"));
}

#[test]
fn validate_json() {
    let env = TestEnv::new();
    let out = env.run_json(&["validate", fixture_str("IMPROVEMENTS.md").as_str()]);

    assert_eq!(out["valid"], true);
    assert_eq!(out["issues"].as_array().unwrap().len(), 0);
}

#[test]
fn validate_rejects_bad_confidence() {
    let env = TestEnv::new();
    let content = std::fs::read_to_string(fixture("IMPROVEMENTS.md"))
        .unwrap()
        .replace("70.00%", "170.00%");
    let path = env.write("broken.md", &content);

    env.cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(contains("confidence '170.00%' is not a percentage between 0 and 100"))
        .stderr(contains("1 error(s)"));
}

#[test]
fn validate_reports_every_problem() {
    let env = TestEnv::new();
    let path = env.write(
        "sparse.md",
        "# Detected Code Improvements\n\n## Improvement 1: Code Quality\n\n**Confidence:** 60.00%\n",
    );

    env.cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(contains("missing 'Generated:' line"))
        .stdout(contains("missing 'Description:'"))
        .stdout(contains("no suggested changes listed"));
}

#[test]
fn show_fixture() {
    let env = TestEnv::new();
    env.cmd()
        .arg("show")
        .arg(fixture("IMPROVEMENTS.md"))
        .assert()
        .success()
        .stdout(contains("1. Performance Optimization (confidence: 80.00%)"))
        .stdout(contains("- Create automated reporting workflows"))
        .stdout(contains("Average confidence: 65.00%"));
}

#[test]
fn show_json_uses_type_slugs() {
    let env = TestEnv::new();
    let out = env.run_json(&["show", fixture_str("IMPROVEMENTS.md").as_str()]);

    let improvements = out["improvements"].as_array().unwrap();
    assert_eq!(improvements.len(), 4);
    assert_eq!(improvements[0]["type"], "performance_optimization");
    assert_eq!(improvements[3]["confidence"], 0.5);
    assert_eq!(out["generated"], "2025-11-25T14:03:07.482913");
}

#[test]
fn detect_prints_markdown() {
    let env = TestEnv::new();
    env.cmd()
        .args(["detect", "--input", fixture_str("research.json").as_str()])
        .assert()
        .success()
        .stdout(contains("# Detected Code Improvements"))
        .stdout(contains("## Improvement 1: Performance Optimization"))
        .stdout(contains("## Improvement 2: Automation Expansion"))
        .stdout(contains("## Improvement 4: Feature Enhancement"));
}

#[test]
fn detect_output_is_valid_report() {
    let env = TestEnv::new();
    let output = env.work.join("IMPROVEMENTS.md");

    env.cmd()
        .args(["detect", "--input", fixture_str("research.json").as_str(), "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(contains("Wrote 4 improvement(s)"));

    env.cmd().arg("validate").arg(&output).assert().success();
}

#[test]
fn detect_missing_input_fails() {
    let env = TestEnv::new();
    env.cmd()
        .args(["detect", "--input", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(contains("reading research results"));
}

#[test]
fn config_thresholds_change_detection() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.home).unwrap();
    std::fs::write(
        env.home.join("config.json"),
        r#"{"thresholds": {"intelligence_score": 90, "central_concepts": 2}}"#,
    )
    .unwrap();

    let out = env.run_json(&["detect", "--input", fixture_str("research.json").as_str()]);
    let kinds: Vec<&str> = out["report"]["improvements"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["type"].as_str().unwrap())
        .collect();

    assert_eq!(
        kinds,
        vec![
            "intelligence_enhancement",
            "automation_expansion",
            "code_quality",
            "feature_enhancement"
        ]
    );
}

#[test]
fn bad_config_fails() {
    let env = TestEnv::new();
    std::fs::create_dir_all(&env.home).unwrap();
    std::fs::write(env.home.join("config.json"), r#"{"unknown": 1}"#).unwrap();

    env.cmd()
        .arg("status")
        .assert()
        .failure()
        .stderr(contains("loading configuration"));
}
