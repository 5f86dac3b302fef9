use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// A `bizdesk` command isolated to `dir`.
fn bizdesk(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bizdesk").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("BIZDESK_DATA_DIR")
        .env_remove("BIZDESK_LEGACY_STRING_SORT")
        .env_remove("BIZDESK_TABLE_WIDTH")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(dir.path().join("data"));
    cmd
}

fn seeded() -> TempDir {
    let dir = TempDir::new().unwrap();
    bizdesk(&dir).arg("init").assert().success();
    dir
}

/// The layout of `entity` as printed by `fields list --json`.
fn layout(dir: &TempDir, entity: &str) -> Vec<Value> {
    let out = bizdesk(dir)
        .args(["fields", "list", entity, "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    serde_json::from_slice(&out.stdout).unwrap()
}

/// Add a field and return its generated id.
fn add_field(dir: &TempDir, entity: &str, label: &str, extra: &[&str]) -> String {
    bizdesk(dir)
        .args(["fields", "add", entity, label])
        .args(extra)
        .assert()
        .success();
    layout(dir, entity)
        .iter()
        .find(|f| f["label"] == label)
        .and_then(|f| f["id"].as_str())
        .unwrap()
        .to_string()
}

/// The raw JSON stored under `key`.
fn stored(dir: &TempDir, key: &str) -> Value {
    let path = dir.path().join("data").join(format!("{key}.json"));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn labels(fields: &[Value]) -> Vec<&str> {
    fields.iter().map(|f| f["label"].as_str().unwrap()).collect()
}

#[test]
fn init_seeds_once() {
    let dir = TempDir::new().unwrap();
    bizdesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded leads"));
    assert!(dir.path().join("data").join("leads.json").exists());

    bizdesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing seeded"));
}

#[test]
fn list_filters_and_sorts() {
    let dir = seeded();

    bizdesk(&dir)
        .args(["records", "list", "leads", "--search", "ACME", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("John Doe"))
        .stdout(predicate::str::contains("Jane Smith").not());

    let out = bizdesk(&dir)
        .args(["records", "list", "opportunities", "--sort", "value", "--desc", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let delta = stdout.find("Delta Sale").unwrap();
    let acme = stdout.find("Acme Deal").unwrap();
    let beta = stdout.find("Beta Project").unwrap();
    assert!(delta < acme && acme < beta, "{stdout}");
}

#[test]
fn custom_field_round_trip() {
    let dir = seeded();

    bizdesk(&dir)
        .args([
            "fields",
            "add",
            "opportunities",
            "Priority",
            "--type",
            "select",
            "--option",
            "Low",
            "--option",
            "High",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added select field 'Priority'"));

    bizdesk(&dir)
        .args(["fields", "list", "opportunities", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Priority\""))
        .stdout(predicate::str::contains("\"High\""));

    bizdesk(&dir)
        .args(["records", "set", "opportunities", "1", "priority", "High"])
        .assert()
        .success();

    bizdesk(&dir)
        .args(["records", "show", "opportunities", "1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"display\": \"High\""));

    // Other entities are unaffected.
    bizdesk(&dir)
        .args(["fields", "list", "leads"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No custom fields"));
}

#[test]
fn notes_show_on_the_timeline() {
    let dir = seeded();

    bizdesk(&dir)
        .args(["records", "note", "leads", "2", "Called back"])
        .assert()
        .success();

    bizdesk(&dir)
        .args(["records", "show", "leads", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Timeline"))
        .stdout(predicate::str::contains("Called back"));
}

#[test]
fn pipeline_lists_every_stage() {
    let dir = seeded();

    bizdesk(&dir)
        .args(["pipeline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Proposal"))
        .stdout(predicate::str::contains("100,000"));
}

#[test]
fn errors_exit_with_code_one() {
    let dir = seeded();

    bizdesk(&dir)
        .args(["records", "show", "leads", "99"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("leads record not found: 99"));

    bizdesk(&dir)
        .args(["fields", "add", "leads", "   "])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("label must not be empty"));

    bizdesk(&dir)
        .args(["records", "set", "leads", "1", "nope", "x"])
        .assert()
        .code(1);
}

#[test]
fn records_add_resolves_fixed_and_custom_fields() {
    let dir = seeded();
    let tier = add_field(&dir, "accounts", "Tier", &[]);
    let region = add_field(&dir, "accounts", "Region", &[]);
    add_field(&dir, "accounts", "Owner", &[]);

    let region_pair = format!("{region}=North");
    bizdesk(&dir)
        .args(["records", "add", "accounts", "name=Zeta", "TIER=Gold", region_pair.as_str()])
        .arg("owner=Carol")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Account 3"));

    let accounts = stored(&dir, "accounts");
    let zeta = &accounts[2];
    assert_eq!(zeta["name"], "Zeta");
    assert_eq!(zeta["owner"], "Carol");
    assert_eq!(zeta["custom"][tier.as_str()], "Gold");
    assert_eq!(zeta["custom"][region.as_str()], "North");
    assert_eq!(zeta["custom"].as_object().unwrap().len(), 2);

    bizdesk(&dir)
        .args(["records", "add", "accounts", "name=Omega", "size=10"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("has no field 'size'"));
    assert_eq!(stored(&dir, "accounts").as_array().unwrap().len(), 3);
}

#[test]
fn fields_edit_appends_options_in_place() {
    let dir = seeded();
    let source = add_field(&dir, "leads", "Source", &[]);
    let priority = add_field(&dir, "leads", "Priority", &["--type", "select", "--option", "Low"]);
    add_field(&dir, "leads", "Budget", &["--type", "number"]);

    bizdesk(&dir)
        .args(["fields", "edit", "leads", priority.as_str(), "--label", "Deal Priority"])
        .args(["--option", "High", "--option", "Urgent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated field 'Deal Priority'"));

    let fields = layout(&dir, "leads");
    assert_eq!(labels(&fields), vec!["Source", "Deal Priority", "Budget"]);
    assert_eq!(fields[1]["id"], priority.as_str());
    assert_eq!(fields[1]["options"], serde_json::json!(["Low", "High", "Urgent"]));

    bizdesk(&dir)
        .args(["fields", "edit", "leads", source.as_str(), "--option", "Web"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--option only applies to select fields"));
    assert_eq!(layout(&dir, "leads"), fields);
}

#[test]
fn fields_move_takes_the_target_position() {
    let dir = seeded();
    let one = add_field(&dir, "contacts", "One", &[]);
    add_field(&dir, "contacts", "Two", &[]);
    let three = add_field(&dir, "contacts", "Three", &[]);

    bizdesk(&dir)
        .args(["fields", "move", "contacts", one.as_str(), three.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Two, Three, One"));
    assert_eq!(labels(&layout(&dir, "contacts")), vec!["Two", "Three", "One"]);

    bizdesk(&dir)
        .args(["fields", "move", "contacts", three.as_str(), one.as_str()])
        .assert()
        .success();
    assert_eq!(labels(&layout(&dir, "contacts")), vec!["Two", "One", "Three"]);

    bizdesk(&dir)
        .args(["fields", "move", "contacts", one.as_str(), "missing"])
        .assert()
        .code(1);
}

#[test]
fn removed_field_values_stay_until_unset() {
    let dir = seeded();
    let source = add_field(&dir, "leads", "Source", &[]);
    bizdesk(&dir)
        .args(["records", "set", "leads", "1", "source", "Expo"])
        .assert()
        .success();

    bizdesk(&dir)
        .args(["fields", "remove", "leads", source.as_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("values already stored on records are kept"));
    assert!(layout(&dir, "leads").is_empty());
    assert_eq!(stored(&dir, "leads")[0]["custom"][source.as_str()], "Expo");

    bizdesk(&dir)
        .args(["records", "unset", "leads", "1", source.as_str()])
        .assert()
        .success();
    assert!(stored(&dir, "leads")[0]["custom"][source.as_str()].is_null());
}

#[test]
fn calendar_day_must_be_a_real_date() {
    let dir = seeded();

    for bad in ["2024-13-45", "tomorrow"] {
        bizdesk(&dir)
            .args(["calendar", "--date", bad])
            .assert()
            .code(1)
            .stderr(predicate::str::contains(format!("invalid date '{bad}'")));
    }

    bizdesk(&dir)
        .args(["calendar", "--date", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Call"))
        .stdout(predicate::str::contains("Meeting").not());
}
