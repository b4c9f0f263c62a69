use std::fs;
use std::io::Write;

use assert_cmd::Command;
use predicates as pred;
use tempfile::{NamedTempFile, TempDir};

const HEADER: &str = "command, tax_id, name, birth_date, address, amount";

fn commands(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    writeln!(file, "{}\n{}", HEADER, body).unwrap();
    file
}

#[test]
fn end_to_end_outputs_expected_balances() {
    // account 1: deposit 1000, three withdrawals of 200 -> 400.00, 4 records
    // account 2: limit exceeded and negative deposit -> 0.00, 0 records
    let file = commands(
        "new_client, 12345678900, Maria Silva, 17-05-1990, Rua A 10,\n\
         new_client, 98765432100, Joao Souza, 02-03-1985, Rua B 20,\n\
         new_account, 12345678900, , , ,\n\
         new_account, 98765432100, , , ,\n\
         deposit, 12345678900, , , , 1000\n\
         withdraw, 12345678900, , , , 200\n\
         withdraw, 12345678900, , , , 200\n\
         withdraw, 12345678900, , , , 200\n\
         withdraw, 12345678900, , , , 100\n\
         withdraw, 98765432100, , , , 50\n\
         deposit, 98765432100, , , , -10\n\
         transfer, 1, , , , 5",
    );
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("ledger.json");

    let exe = env!("CARGO_BIN_EXE_personal_ledger");
    let mut cmd = Command::new(exe);
    cmd.arg(file.path()).arg(&data);

    cmd.assert()
        .success()
        .stdout(pred::str::contains("account,agency,holder,balance,transactions"))
        .stdout(pred::str::contains("1,0001,Maria Silva,400.00,4"))
        .stdout(pred::str::contains("2,0001,Joao Souza,0.00,0"))
        .stderr(pred::str::contains("Maximum number of withdrawals (3) already reached"))
        .stderr(pred::str::contains("Insufficient funds"))
        .stderr(pred::str::contains("Invalid amount -10.00"))
        .stderr(pred::str::contains("Invalid command: transfer"));

    assert!(data.exists());
}

#[test]
fn state_survives_between_runs() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("ledger.json");
    let exe = env!("CARGO_BIN_EXE_personal_ledger");

    let first = commands(
        "new_client, 111, Ana Lima, 1990-01-01, Rua 1,\n\
         new_account, 111, , , ,\n\
         deposit, 111, , , , 250.75",
    );
    Command::new(exe)
        .arg(first.path())
        .arg(&data)
        .assert()
        .success()
        .stdout(pred::str::contains("1,0001,Ana Lima,250.75,1"));

    let second = commands(
        "new_client, 111, Ana Lima, 1990-01-01, Rua 1,\n\
         new_account, 111, , , ,\n\
         withdraw, 111, , , , 50.75",
    );
    Command::new(exe)
        .arg(second.path())
        .env("LEDGER_DATA_FILE", dir.path().join("ignored.json"))
        .arg(&data)
        .assert()
        .success()
        .stdout(pred::str::contains("1,0001,Ana Lima,200.00,2"))
        .stdout(pred::str::contains("2,0001,Ana Lima,0.00,0"))
        .stderr(pred::str::contains("already exists"));

    let saved = fs::read_to_string(&data).unwrap();
    assert!(saved.contains("\"tax_id\": \"111\""));
}

#[test]
fn missing_command_file_fails() {
    let exe = env!("CARGO_BIN_EXE_personal_ledger");
    Command::new(exe).assert().failure();
}

#[test]
fn statement_and_client_list_follow_account_listing() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("ledger.json");
    let file = commands(
        "new_client, 111, Ana Lima, 01-01-1990, Rua 1,\n\
         new_client, 222, Bia Reis, 02-02-1992, Rua 2,\n\
         new_account, 111, , , ,\n\
         deposit, 111, , , , 1000\n\
         withdraw, 111, , , , 200\n\
         statement, 111, , , ,\n\
         statement, 333, , , ,\n\
         list_clients, , , , ,",
    );

    let exe = env!("CARGO_BIN_EXE_personal_ledger");
    Command::new(exe)
        .arg(file.path())
        .arg(&data)
        .assert()
        .success()
        .stdout(pred::str::contains("1,0001,Ana Lima,800.00,2"))
        .stdout(pred::str::contains("\n\naccount,entry,amount,timestamp\n"))
        .stdout(pred::str::contains("1,deposit,1000.00,"))
        .stdout(pred::str::contains("1,withdrawal,200.00,"))
        .stdout(pred::str::contains("1,balance,800.00,\n"))
        .stdout(pred::str::contains("\n\ntax_id,name,birth_date,address,accounts\n"))
        .stdout(pred::str::contains("111,Ana Lima,01-01-1990,Rua 1,1\n"))
        .stdout(pred::str::contains("222,Bia Reis,02-02-1992,Rua 2,\n"))
        .stderr(pred::str::contains("Client with tax id 333 not found"));
}

#[test]
fn log_level_follows_rust_log() {
    let exe = env!("CARGO_BIN_EXE_personal_ledger");

    let run = |level: &str| {
        let dir = TempDir::new().unwrap();
        let file = commands("new_client, 1, Ana Lima, 01-01-1990, Rua 1,");
        let output = Command::new(exe)
            .arg(file.path())
            .arg(dir.path().join("ledger.json"))
            .env("RUST_LOG", level)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stderr).unwrap()
    };

    let debug = run("debug");
    assert!(debug.contains("bank saved"));

    let quiet = run("error");
    assert!(!quiet.contains("engine ready"));
    assert!(!quiet.contains("bank saved"));
}
