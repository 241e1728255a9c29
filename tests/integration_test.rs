use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn protokoll_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_protokoll"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    protokoll_cmd()
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap()
}

fn run_ok(dir: &Path, args: &[&str]) -> String {
    let output = run(dir, args);
    assert!(
        output.status.success(),
        "command {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Pull the short id out of handler output like "Sitzung angelegt (ab12cd3) - ...".
fn extract_id(stdout: &str) -> String {
    let start = stdout.find('(').expect("no id in output") + 1;
    let end = stdout.find(')').expect("no id in output");
    stdout[start..end].to_string()
}

fn init_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["init"]);
    tmp
}

fn create_sitzung(dir: &Path) -> String {
    let stdout = run_ok(
        dir,
        &[
            "sitzung",
            "add",
            "3. ordentliche Sitzung",
            "--date",
            "2024-01-15",
            "--time",
            "14:00",
        ],
    );
    extract_id(&stdout)
}

#[test]
fn test_init_creates_protokoll_directory() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["init"]);
    assert!(output.status.success());
    assert!(tmp.path().join(".protokoll").exists());
    assert!(tmp.path().join(".protokoll/sitzungen.json").exists());
}

#[test]
fn test_init_twice_fails() {
    let tmp = TempDir::new().unwrap();
    run_ok(tmp.path(), &["init"]);

    let output = run(tmp.path(), &["init"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Already initialized"));
}

#[test]
fn test_commands_without_init_fail() {
    let tmp = TempDir::new().unwrap();

    let output = run(tmp.path(), &["sitzung", "list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not in a protokoll project"));
}

#[test]
fn test_sitzung_crud() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let stdout = run_ok(tmp.path(), &["sitzung", "list"]);
    assert!(stdout.contains("3. ordentliche Sitzung"));
    assert!(stdout.contains("[planned]"));

    let stdout = run_ok(tmp.path(), &["sitzung", "get", &id]);
    assert!(stdout.contains("Titel: 3. ordentliche Sitzung"));
    assert!(stdout.contains("Datum: 2024-01-15 14:00"));

    run_ok(
        tmp.path(),
        &["sitzung", "update", &id, "--title", "Umbenannte Sitzung"],
    );
    let stdout = run_ok(tmp.path(), &["sitzung", "get", &id]);
    assert!(stdout.contains("Umbenannte Sitzung"));

    run_ok(tmp.path(), &["sitzung", "delete", &id, "--force"]);
    let stdout = run_ok(tmp.path(), &["sitzung", "list"]);
    assert!(stdout.contains("Keine Sitzungen"));
}

#[test]
fn test_sitzung_empty_title_rejected() {
    let tmp = init_project();

    let output = run(
        tmp.path(),
        &["sitzung", "add", "   ", "--date", "2024-01-15"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("darf nicht leer sein"));
}

#[test]
fn test_default_roles_are_seeded() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let stdout = run_ok(tmp.path(), &["rolle", "list", &id]);
    assert!(stdout.contains("Referent"));
    assert!(stdout.contains("Mitglied"));
    assert!(stdout.contains("Gast"));
    assert!(stdout.contains("Ehrenmitglied"));
    assert!(stdout.contains("(Standard)"));
}

#[test]
fn test_role_validation() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    // Unknown role names are rejected.
    let output = run(tmp.path(), &["rolle", "add", &id, "Vorsitz"]);
    assert!(!output.status.success());

    // Duplicate names are rejected.
    let output = run(tmp.path(), &["rolle", "add", &id, "Mitglied"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("existiert bereits"));
}

#[test]
fn test_quorum_in_status() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    // Two Mitglieder, one present: threshold ceil(2/2) = 1.
    let out = run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Alex Schmidt", "--role", "Mitglied"],
    );
    let alex = extract_id(&out);
    run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Robin Weber", "--role", "Mitglied"],
    );
    // A present guest does not count towards quorum.
    let out = run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Chris Meyer", "--role", "Gast"],
    );
    let chris = extract_id(&out);
    run_ok(tmp.path(), &["teilnehmer", "toggle", &id, &chris]);

    let stdout = run_ok(tmp.path(), &["sitzung", "status", &id]);
    assert!(stdout.contains("NICHT GEGEBEN"));
    assert!(stdout.contains("0 von 2"));

    run_ok(tmp.path(), &["teilnehmer", "toggle", &id, &alex]);
    let stdout = run_ok(tmp.path(), &["sitzung", "status", &id]);
    assert!(stdout.contains("GEGEBEN"));
    assert!(stdout.contains("1 von 2"));
}

#[test]
fn test_vote_requires_ongoing_meeting() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());
    run_ok(tmp.path(), &["top", "add", &id, "Genehmigung der Tagesordnung"]);

    let output = run(
        tmp.path(),
        &[
            "top", "vote", &id, "1", "--ja", "1", "--nein", "0", "--enthaltungen", "0",
        ],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("muss gestartet sein"));
}

#[test]
fn test_vote_total_cross_checked_against_eligible_voters() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());
    run_ok(tmp.path(), &["top", "add", &id, "Haushaltsplanung"]);

    for name in ["A", "B", "C"] {
        let out = run_ok(
            tmp.path(),
            &["teilnehmer", "add", &id, name, "--role", "Mitglied"],
        );
        let pid = extract_id(&out);
        run_ok(tmp.path(), &["teilnehmer", "toggle", &id, &pid]);
    }
    run_ok(tmp.path(), &["zeiten", "open", &id, "--time", "14:00"]);

    // 3 eligible voters, only 2 votes entered.
    let output = run(
        tmp.path(),
        &[
            "top", "vote", &id, "1", "--ja", "1", "--nein", "1", "--enthaltungen", "0",
        ],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stimmberechtigter Teilnehmer"));

    let stdout = run_ok(
        tmp.path(),
        &[
            "top", "vote", &id, "1", "--ja", "2", "--nein", "1", "--enthaltungen", "0",
        ],
    );
    assert!(stdout.contains("ANGENOMMEN"));
}

#[test]
fn test_zeiten_lifecycle() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    run_ok(tmp.path(), &["zeiten", "open", &id, "--time", "14:00"]);
    let stdout = run_ok(tmp.path(), &["sitzung", "get", &id]);
    assert!(stdout.contains("Status: ongoing"));

    run_ok(tmp.path(), &["zeiten", "pause", &id, "--time", "15:00"]);

    // A second pause while one is running is rejected.
    let output = run(tmp.path(), &["zeiten", "pause", &id, "--time", "15:05"]);
    assert!(!output.status.success());

    // Closing force-closes the open pause and completes the meeting.
    run_ok(tmp.path(), &["zeiten", "close", &id, "--time", "16:00"]);
    let stdout = run_ok(tmp.path(), &["zeiten", "show", &id]);
    assert!(stdout.contains("Pause 1: 15:00 - 16:00"));
    assert!(stdout.contains("Schluss: 16:00 Uhr"));
    assert!(stdout.contains("Gesamtdauer: 01:00"));

    let stdout = run_ok(tmp.path(), &["sitzung", "get", &id]);
    assert!(stdout.contains("Status: completed"));
}

#[test]
fn test_export_refused_when_not_ready() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let output = run(tmp.path(), &["export", &id]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nicht bereit"));
    // No file is produced.
    assert!(!tmp
        .path()
        .read_dir()
        .unwrap()
        .any(|e| e.unwrap().file_name().to_string_lossy().starts_with("Stupa-Protokoll")));
}

#[test]
fn test_export_txt_layout() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let out = run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Alex Schmidt", "--role", "Mitglied"],
    );
    let alex = extract_id(&out);
    run_ok(tmp.path(), &["teilnehmer", "toggle", &id, &alex]);
    run_ok(tmp.path(), &["top", "add", &id, "Genehmigung der Tagesordnung"]);
    run_ok(tmp.path(), &["zeiten", "open", &id, "--time", "14:00"]);
    run_ok(
        tmp.path(),
        &[
            "top", "vote", &id, "1", "--ja", "1", "--nein", "0", "--enthaltungen", "0",
        ],
    );
    run_ok(
        tmp.path(),
        &["export", &id, "--format", "txt", "-o", "protokoll.txt"],
    );

    let text = std::fs::read_to_string(tmp.path().join("protokoll.txt")).unwrap();
    assert!(text.starts_with("PROTOKOLL\n"));
    assert!(text.contains("ANWESENHEIT:"));
    assert!(text.contains("Mitglied (1):"));
    assert!(text.contains("• Alex Schmidt"));
    assert!(text.contains("BESCHLUSSFÄHIGKEIT: GEGEBEN"));
    assert!(text.contains("TOP 1: Genehmigung der Tagesordnung"));
    assert!(text.contains("Abstimmungsergebnis: 1 Ja, 0 Nein, 0 Enthaltungen (1 Stimmen)"));
    assert!(text.contains("Ergebnis: ANGENOMMEN"));
    assert!(text.contains("Protokoll erstellt am:"));
}

#[test]
fn test_export_markdown_headings() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let out = run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Alex", "--role", "Mitglied"],
    );
    let alex = extract_id(&out);
    run_ok(tmp.path(), &["teilnehmer", "toggle", &id, &alex]);
    run_ok(tmp.path(), &["top", "add", &id, "Berichte"]);
    run_ok(
        tmp.path(),
        &["export", &id, "--format", "md", "-o", "protokoll.md"],
    );

    let md = std::fs::read_to_string(tmp.path().join("protokoll.md")).unwrap();
    assert!(md.starts_with("# PROTOKOLL"));
    assert!(md.contains("## ANWESENHEIT:"));
    assert!(md.contains("### TOP 1: Berichte"));
    assert!(md.contains("- Alex"));
}

#[test]
fn test_json_export_reimport_roundtrip() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Alex", "--role", "Mitglied"],
    );
    run_ok(tmp.path(), &["top", "add", &id, "Berichte"]);
    run_ok(
        tmp.path(),
        &["export", &id, "--format", "json", "-o", "sitzung.json"],
    );

    let before = run_ok(tmp.path(), &["sitzung", "get", &id, "--json"]);

    // Re-importing while the record exists violates id uniqueness.
    let output = run(tmp.path(), &["import", "sitzung.json"]);
    assert!(!output.status.success());

    run_ok(tmp.path(), &["sitzung", "delete", &id, "--force"]);
    run_ok(tmp.path(), &["import", "sitzung.json"]);

    let after = run_ok(tmp.path(), &["sitzung", "get", &id, "--json"]);
    assert_eq!(before, after);
}

#[test]
fn test_text_import_is_best_effort() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let out = run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Alex Schmidt", "--role", "Mitglied"],
    );
    let alex = extract_id(&out);
    run_ok(tmp.path(), &["teilnehmer", "toggle", &id, &alex]);
    run_ok(tmp.path(), &["top", "add", &id, "Berichte"]);
    run_ok(tmp.path(), &["top", "note", &id, "1", "Bericht des Vorsitzes"]);
    run_ok(
        tmp.path(),
        &["export", &id, "--format", "txt", "-o", "protokoll.txt"],
    );

    let stdout = run_ok(tmp.path(), &["import", "protokoll.txt"]);
    assert!(stdout.contains("1 Teilnehmer"));
    assert!(stdout.contains("1 TOPs"));
}

#[test]
fn test_garbage_text_import_degrades_to_empty() {
    let tmp = init_project();
    std::fs::write(tmp.path().join("kaputt.txt"), "das ist kein Protokoll\n").unwrap();

    let stdout = run_ok(tmp.path(), &["import", "kaputt.txt"]);
    assert!(stdout.contains("0 Teilnehmer"));
    assert!(stdout.contains("0 TOPs"));
}

#[test]
fn test_snapshot_lifecycle() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    let out = run_ok(
        tmp.path(),
        &["snapshot", "create", &id, "Vor Abstimmung TOP 3"],
    );
    let snapshot_id = extract_id(&out);

    let stdout = run_ok(tmp.path(), &["snapshot", "list", &id]);
    assert!(stdout.contains("Vor Abstimmung TOP 3"));
    assert!(stdout.contains("[manuell]"));

    // Change the title, then restore the checkpoint.
    run_ok(
        tmp.path(),
        &["sitzung", "update", &id, "--title", "Geänderter Titel"],
    );
    run_ok(tmp.path(), &["snapshot", "restore", &id, &snapshot_id]);

    let stdout = run_ok(tmp.path(), &["sitzung", "get", &id]);
    assert!(stdout.contains("3. ordentliche Sitzung"));
    assert!(!stdout.contains("Geänderter Titel"));

    // The restore left a safety checkpoint behind.
    let stdout = run_ok(tmp.path(), &["snapshot", "list", &id]);
    assert!(stdout.contains("Vor Wiederherstellung"));

    run_ok(tmp.path(), &["snapshot", "delete", &id, &snapshot_id]);
    // Deleting again is idempotent at the storage level but the CLI
    // reports the missing id.
    let output = run(tmp.path(), &["snapshot", "delete", &id, &snapshot_id]);
    assert!(!output.status.success());

    run_ok(tmp.path(), &["snapshot", "clear", &id]);
    let stdout = run_ok(tmp.path(), &["snapshot", "list", &id]);
    assert!(stdout.contains("Keine Snapshots"));
}

#[test]
fn test_corrupt_version_history_reinitializes() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());
    run_ok(tmp.path(), &["snapshot", "create", &id, "checkpoint"]);

    // Clobber the history blob.
    let full_id = {
        let json = run_ok(tmp.path(), &["sitzung", "get", &id, "--json"]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        parsed["id"].as_str().unwrap().to_string()
    };
    std::fs::write(
        tmp.path()
            .join(".protokoll")
            .join(format!("sitzung_versions_{}.json", full_id)),
        "{definitely not json",
    )
    .unwrap();

    let stdout = run_ok(tmp.path(), &["snapshot", "list", &id]);
    assert!(stdout.contains("Keine Snapshots"));
}

#[test]
fn test_template_instantiation() {
    let tmp = init_project();

    let stdout = run_ok(tmp.path(), &["template", "list"]);
    assert!(stdout.contains("standard-weekly"));
    assert!(stdout.contains("blank"));

    let stdout = run_ok(
        tmp.path(),
        &[
            "sitzung",
            "add",
            "Wochensitzung",
            "--date",
            "2024-01-15",
            "--template",
            "standard-weekly",
        ],
    );
    let id = extract_id(&stdout);

    let stdout = run_ok(tmp.path(), &["top", "list", &id]);
    assert!(stdout.contains("TOP 1:"));
    assert!(stdout.contains("Genehmigung der Tagesordnung"));
    assert!(stdout.contains("Schließung der Sitzung"));

    // Built-in templates are protected.
    let output = run(tmp.path(), &["template", "delete", "blank"]);
    assert!(!output.status.success());
}

#[test]
fn test_template_from_sitzung() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());
    run_ok(tmp.path(), &["top", "add", &id, "Eröffnung"]);
    run_ok(tmp.path(), &["top", "add", &id, "Berichte"]);

    run_ok(
        tmp.path(),
        &["template", "add", "kurz", "Kurzsitzung", "--from", &id],
    );
    let stdout = run_ok(tmp.path(), &["template", "show", "kurz"]);
    assert!(stdout.contains("TOP 1: Eröffnung"));
    assert!(stdout.contains("TOP 2: Berichte"));

    run_ok(tmp.path(), &["template", "delete", "kurz"]);
}

#[test]
fn test_settings_and_invite() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());
    run_ok(
        tmp.path(),
        &["teilnehmer", "add", &id, "Alex Schmidt", "--role", "Mitglied"],
    );

    // Invitation requires configured settings.
    let output = run(tmp.path(), &["invite", &id]);
    assert!(!output.status.success());

    // Malformed collector domain is rejected.
    let output = run(
        tmp.path(),
        &[
            "settings",
            "set-email",
            "--sender-email",
            "stupa@uni-beispiel.de",
            "--sender-name",
            "StuPa Präsidium",
            "--collector-email",
            "sammler@kaputt",
        ],
    );
    assert!(!output.status.success());

    run_ok(
        tmp.path(),
        &[
            "settings",
            "set-email",
            "--sender-email",
            "stupa@uni-beispiel.de",
            "--sender-name",
            "StuPa Präsidium",
            "--collector-email",
            "sammler@uni-beispiel.de",
        ],
    );

    let stdout = run_ok(tmp.path(), &["invite", &id]);
    assert!(stdout.starts_with("mailto:sammler@uni-beispiel.de?subject="));
    assert!(stdout.contains("Einladung"));
}

#[test]
fn test_antraege_workflow() {
    let tmp = init_project();
    let id = create_sitzung(tmp.path());

    run_ok(tmp.path(), &["top", "add", &id, "Berichte"]);
    run_ok(
        tmp.path(),
        &["top", "add", &id, "Anträge", "--antraege-section"],
    );

    // Anträge only live under the Anträge section.
    let output = run(tmp.path(), &["antrag", "add", &id, "1", "Haushaltsantrag"]);
    assert!(!output.status.success());

    run_ok(tmp.path(), &["antrag", "add", &id, "2", "Haushaltsantrag"]);
    run_ok(
        tmp.path(),
        &[
            "antrag", "add", &id, "2", "Stellungnahme", "--type", "input",
        ],
    );
    run_ok(tmp.path(), &["zeiten", "open", &id, "--time", "14:00"]);
    run_ok(
        tmp.path(),
        &[
            "antrag", "vote", &id, "2", "1", "--ja", "4", "--nein", "1", "--enthaltungen", "0",
        ],
    );
    run_ok(
        tmp.path(),
        &["antrag", "input", &id, "2", "2", "wird vertagt"],
    );

    let stdout = run_ok(tmp.path(), &["antrag", "list", &id, "2"]);
    assert!(stdout.contains("[ANGENOMMEN]"));
    assert!(stdout.contains("[wird vertagt]"));

    // Both Anträge resolved: the section TOP reports completed.
    let stdout = run_ok(tmp.path(), &["top", "list", &id]);
    assert!(stdout.contains("TOP 2: ✓"));
}
