use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{NamedTempFile, TempDir};

/// Command with an isolated, empty config directory
fn hashgen(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("hashgen").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1")
        .env_remove("HASHGEN_ENGINE__WORKER_COUNT")
        .env_remove("HASHGEN_ENGINE__BATCH_SIZE")
        .env_remove("HASHGEN_OUTPUT__DEFAULT_FORMAT");
    cmd
}

#[test]
fn test_version() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_hash_sha256() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["hash", "abc", "--algorithm", "sha256"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad\n",
        ));
}

#[test]
fn test_hash_without_workers_matches() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["hash", "abc", "-a", "md5", "--no-workers", "--uppercase"])
        .assert()
        .success()
        .stdout(predicate::str::contains("900150983CD24FB0D6963F7D28E17F72"));
}

#[test]
fn test_hash_with_salt_and_cost() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args([
            "hash",
            "U*U",
            "-a",
            "bcrypt",
            "--salt",
            "CCCCCCCCCCCCCCCCCCCCC.",
            "--cost",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "$2a$05$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW",
        ));
}

#[test]
fn test_hash_unknown_algorithm_fails() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["hash", "abc", "-a", "rot13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported algorithm"));
}

#[test]
fn test_invalid_worker_count_fails() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["--workers", "0", "hash", "abc", "-a", "md5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("worker_count"));
}

#[test]
fn test_bulk_from_file_text() {
    let config_home = TempDir::new().unwrap();
    let temp_file = NamedTempFile::new().unwrap();
    fs::write(temp_file.path(), "a\nb\n\nc\n").unwrap();

    hashgen(&config_home)
        .arg("bulk")
        .arg(temp_file.path())
        .args(["-a", "md5", "--batch-size", "1"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "a\t0cc175b9c0f1b6a831c399e269772661\n\
             b\t92eb5ffee6ae2fec3ad71c777531578f\n\
             c\t4a8a08f09d37b73795649038408b5f33\n",
        ));
}

#[test]
fn test_bulk_from_stdin_json() {
    let config_home = TempDir::new().unwrap();
    let output = hashgen(&config_home)
        .args(["bulk", "-a", "sha1", "--output", "json"])
        .write_stdin("abc\n")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value[0]["input"], "abc");
    assert_eq!(
        value[0]["digest"],
        "a9993e364706816aba3e25717850c26c9cd0d89d"
    );
}

#[test]
fn test_bulk_csv_from_config_default() {
    let config_home = TempDir::new().unwrap();
    let config_dir = config_home.path().join("hashgen");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[output]\ndefault_format = \"csv\"\n",
    )
    .unwrap();

    hashgen(&config_home)
        .args(["bulk", "-a", "md5"])
        .write_stdin("a\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("input,digest\n"))
        .stdout(predicate::str::contains(
            "a,0cc175b9c0f1b6a831c399e269772661",
        ));
}

#[test]
fn test_bulk_rejects_invalid_passphrase() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["bulk", "-a", "wpa-pmkid"])
        .write_stdin("longpassphrase\nshort\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("passphrase must be 8 to 63"));
}

#[test]
fn test_salt_length() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["salt", "--length", "24"])
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[A-Za-z0-9./]{24}\n$").unwrap());
}

#[test]
fn test_detect_best_guess_and_all() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["detect", "8846f7eaee8fb117ad06bdd830b7586c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MD5 [md5] (confidence 90%)"))
        .stdout(predicate::str::contains("NTLM").not());

    hashgen(&config_home)
        .args(["detect", "--all", "8846f7eaee8fb117ad06bdd830b7586c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NTLM [ntlm] (confidence 60%)"));
}

#[test]
fn test_detect_unknown() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["detect", "definitely-not-a-hash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown hash format"));
}

#[test]
fn test_strength() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["strength", "password"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0/100 (Very Weak)"))
        .stdout(predicate::str::contains("This is a very common password"));
}

#[test]
fn test_algorithms_lists_every_category() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .arg("algorithms")
        .assert()
        .success()
        .stdout(predicate::str::contains("Password Hashing"))
        .stdout(predicate::str::contains("bcrypt"))
        .stdout(predicate::str::contains("wpa-pmkid"))
        .stdout(predicate::str::contains("cost=10"));
}

#[test]
fn test_config_path_honours_xdg() {
    let config_home = TempDir::new().unwrap();
    let expected = config_home.path().join("hashgen").join("config.toml");
    hashgen(&config_home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_string_lossy().to_string()));
}

#[test]
fn test_config_show_applies_env() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .env("HASHGEN_ENGINE__BATCH_SIZE", "77")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("batch_size = 77"))
        .stdout(predicate::str::contains("default_format = \"text\""));
}

#[test]
fn test_completions() {
    let config_home = TempDir::new().unwrap();
    hashgen(&config_home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hashgen"));
}
