//! Tests for the doctor module and `usermod-resolver doctor`.

use usermod_resolver::config::BundlerConfig;
use usermod_resolver::doctor::{
    DependencyChecker, DependencyStatus, DoctorFormatter, OutputFormat, Platform, ToolStatus,
};

mod fixtures;
use fixtures::*;

fn missing_tools() -> BundlerConfig {
    BundlerConfig {
        node: "no-such-node-7f3a".to_string(),
        npm: "no-such-npm-7f3a".to_string(),
    }
}

#[test]
fn test_check_all_reports_every_dependency() {
    let env = TestEnv::new();
    env.write_file("package.json", "{}");
    let rules = env.write_file("rules.toml", BUILTIN_RULES_TOML);

    let statuses =
        DependencyChecker::with_tools(missing_tools()).check_all(env.path(), Some(rules.as_path()));

    assert_eq!(statuses.len(), 4);
    assert_eq!(statuses[0].status, ToolStatus::Missing);
    assert_eq!(statuses[1].status, ToolStatus::Missing);
    assert_eq!(statuses[2].status, ToolStatus::Available);
    assert_eq!(statuses[3].status, ToolStatus::Available);
    assert!(statuses[3].message.contains("4 entries"));
}

#[test]
fn test_formatter_json_status_values() {
    let formatter = DoctorFormatter::with_format(OutputFormat::Json);
    let ready = formatter.format_results(&[DependencyStatus::available("Node.js", "20.0.0")]);
    let json: serde_json::Value = serde_json::from_str(&ready).unwrap();
    assert_eq!(json["status"], "ready");

    let warnings = formatter.format_results(&[DependencyStatus::unknown("npm", "weird")]);
    let json: serde_json::Value = serde_json::from_str(&warnings).unwrap();
    assert_eq!(json["status"], "warnings");
}

#[test]
fn test_formatter_windows_hint() {
    let output = DoctorFormatter::with_platform(Platform::Windows)
        .format_results(&[DependencyStatus::missing("Node.js", "Not found in PATH")]);
    assert!(output.contains("winget install OpenJS.NodeJS"));
}

// ============================================================================
// Doctor Command Tests
// ============================================================================

#[test]
fn test_doctor_missing_tools_exits_1() {
    let env = TestEnv::with_config("[bundler]\nnode = \"no-such-node-7f3a\"\nnpm = \"no-such-npm-7f3a\"\n");
    let output = env.run(&["doctor"]);

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Pre-build Environment Status"));
    assert!(out.contains("✗ Node.js"));
    assert!(stderr(&output).contains("Some checks failed"));
}

#[test]
fn test_doctor_json() {
    let env = TestEnv::with_config("[bundler]\nnode = \"no-such-node-7f3a\"\nnpm = \"no-such-npm-7f3a\"\n");
    let output = env.run(&["doctor", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Should parse JSON output");
    assert_eq!(json["status"], "missing_dependencies");

    let names: Vec<&str> = json["dependencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Node.js", "npm", "Web UI", "Rule file"]);
}

#[test]
fn test_doctor_reports_stale_rule_file_from_config() {
    let env = TestEnv::new();
    let gone = env.path().join("gone.toml");
    std::fs::write(
        env.config_path(),
        format!(
            "[paths]\nrules_file = {:?}\n\n[bundler]\nnode = \"no-such-node-7f3a\"\n",
            gone.to_str().unwrap()
        ),
    )
    .unwrap();

    let resolve = env.run(&["resolve", "-u", "Temperature"]);
    assert_eq!(resolve.status.code(), Some(2));

    let output = env.run(&["doctor", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("Should parse JSON output");
    let dependencies = json["dependencies"].as_array().unwrap();

    let rule_file = dependencies
        .iter()
        .find(|d| d["name"] == "Rule file")
        .expect("Rule file check");
    assert_eq!(rule_file["status"], "missing");
    assert!(rule_file["message"].as_str().unwrap().contains("gone.toml"));

    let node = dependencies
        .iter()
        .find(|d| d["name"] == "Node.js")
        .expect("Node.js check");
    assert_eq!(node["status"], "missing", "Configured node name is used");
}

#[test]
fn test_doctor_reports_unparseable_config() {
    let env = TestEnv::with_config("[bundler\n");
    let output = env.run(&["doctor", "--json"]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["dependencies"][0]["name"], "Config");
    assert_eq!(json["dependencies"][0]["status"], "missing");
}
