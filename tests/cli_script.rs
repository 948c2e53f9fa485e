use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("fambudget_cli")
        .unwrap()
        .env("FAMBUDGET_CLI_SCRIPT", "1")
        .env("FAMBUDGET_HOME", home.path())
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_tracks_rent_and_insurance() {
    let home = TempDir::new().unwrap();
    let input = "add-fixed Rent 1200 monthly Housing\n\
                 add-subscription Insurance 600 yearly 15 Insurance\n\
                 summary 2024-06\n\
                 pay 1 2024-06\n\
                 summary 2024-06\n\
                 exit\n";

    script(&home, input)
        .success()
        .stdout(contains("Added `Rent`"))
        .stdout(contains("Monthly total: $1,250.00"))
        .stdout(contains("Marked `Rent` paid for 2024-06."))
        .stdout(contains("Unpaid: $50.00 (1 items)"));

    let book = std::fs::read_to_string(home.path().join("books/household.json")).unwrap();
    assert!(book.contains("\"Insurance\""));
    let paid = std::fs::read_to_string(home.path().join("books/household.paid.json")).unwrap();
    assert!(paid.contains("\"2024-06\""));
}

#[test]
fn payment_status_persists_between_runs() {
    let home = TempDir::new().unwrap();
    script(&home, "add-fixed Rent 1200 monthly\npay 1 2024-06\nexit\n").success();

    script(&home, "list paid 2024-06\nexit\n")
        .success()
        .stdout(contains("[x] Rent"));
}

#[test]
fn bad_input_is_reported_without_aborting() {
    let home = TempDir::new().unwrap();
    script(&home, "add-fixed Rent -5 monthly\nsumary\nmonths 1 1\nexit\n")
        .success()
        .stderr(contains("amount must be zero or positive"))
        .stdout(contains("Suggestion: `summary`?"));
}
