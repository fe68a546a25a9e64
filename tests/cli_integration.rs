//! Integration tests for the StegPass CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.  The
//! master secret comes from the `STEGPASS_PASSWORD` env var and login
//! passwords are piped through stdin, so no test needs a terminal.  Each
//! test drops a `.stegpass.toml` with cheap Argon2 parameters into its temp
//! dir to keep key derivation fast.

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;

const MASTER: &str = "test-master-secret";

/// Helper: get a Command pointing at the stegpass binary.
fn stegpass() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("stegpass").expect("binary should exist")
}

/// Helper: a temp dir with fast KDF settings configured.
fn workdir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join(".stegpass.toml"),
        "argon2_memory_kib = 8192\nargon2_iterations = 1\nargon2_parallelism = 1\n",
    )
    .unwrap();
    tmp
}

#[test]
fn help_flag_shows_usage() {
    stegpass()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Encrypted password vault"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("gen"))
        .stdout(predicate::str::contains("query"))
        .stdout(predicate::str::contains("edit"))
        .stdout(predicate::str::contains("rem"))
        .stdout(predicate::str::contains("hide"))
        .stdout(predicate::str::contains("reveal"));
}

#[test]
fn version_flag_shows_version() {
    stegpass()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("stegpass"));
}

#[test]
fn no_args_shows_help() {
    stegpass()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn query_without_criteria_fails_before_prompting() {
    let tmp = workdir();

    stegpass()
        .args(["query"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--uri or --username"));
}

#[test]
fn init_creates_vault_and_refuses_to_recreate() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vault created"));

    assert!(tmp.path().join("vault.spv").exists());

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_rejects_short_master_secret() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", "short")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));

    assert!(!tmp.path().join("vault.spv").exists());
}

#[test]
fn add_then_query_roundtrip() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    // Login password arrives on stdin; master secret from the env.
    stegpass()
        .args(["add", "github.com", "alice"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .write_stdin("gh-password\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("id 1"));

    stegpass()
        .args(["query", "--uri", "github", "--show"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success()
        .stdout(predicate::str::contains("gh-password"));
}

#[test]
fn query_with_no_matches_succeeds_quietly() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["query", "--uri", "nowhere.invalid", "--show"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success()
        .stdout(predicate::str::contains("No logins matched"));
}

#[test]
fn wrong_master_secret_is_rejected() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["query", "--uri", "anything", "--show"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", "not-the-master-secret")
        .assert()
        .failure()
        .stderr(predicate::str::contains("authentication failed"));
}

#[test]
fn add_rejects_short_login_password() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["add", "github.com", "alice"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .write_stdin("short\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 7 characters"));
}

#[test]
fn edit_and_rem_change_the_store() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["add", "mail.com", "bob"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .write_stdin("first-password\n")
        .assert()
        .success();

    stegpass()
        .args(["edit", "1"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .write_stdin("second-password\n")
        .assert()
        .success();

    stegpass()
        .args(["query", "--username", "bob", "--show"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success()
        .stdout(predicate::str::contains("second-password"));

    stegpass()
        .args(["rem", "1", "--force"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["query", "--username", "bob", "--show"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success()
        .stdout(predicate::str::contains("No logins matched"));
}

#[test]
fn edit_unknown_id_fails() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["edit", "42"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .write_stdin("irrelevant-password\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No login with id 42"));
}

#[test]
fn hide_and_reveal_roundtrip_the_vault() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    stegpass()
        .args(["add", "x.com", "alice"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .write_stdin("hidden-password\n")
        .assert()
        .success();

    // Write a cover image big enough for the vault file.
    let cover_path = tmp.path().join("cover.png");
    let cover = image::RgbImage::from_fn(256, 256, |x, y| {
        let base = (x * 3 + y * 5) as u8;
        image::Rgb([base, base.wrapping_add(40), base.wrapping_add(90)])
    });
    cover.save(&cover_path).unwrap();

    stegpass()
        .args(["hide", "cover.png", "--output", "holiday.png"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Hid"));

    stegpass()
        .args(["reveal", "holiday.png", "recovered.spv"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovered"));

    // The recovered file is byte-identical to the original vault.
    let original = std::fs::read(tmp.path().join("vault.spv")).unwrap();
    let recovered = std::fs::read(tmp.path().join("recovered.spv")).unwrap();
    assert_eq!(original, recovered);

    // And it opens like any other vault.
    stegpass()
        .args(["--vault", "recovered.spv", "query", "--uri", "x.com", "--show"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success()
        .stdout(predicate::str::contains("hidden-password"));
}

#[test]
fn reveal_refuses_to_overwrite_an_existing_vault() {
    let tmp = workdir();
    std::fs::write(tmp.path().join("existing.spv"), b"precious").unwrap();

    let cover_path = tmp.path().join("cover.png");
    image::RgbImage::new(32, 32).save(&cover_path).unwrap();

    stegpass()
        .args(["reveal", "cover.png", "existing.spv"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    // The existing file is untouched.
    assert_eq!(
        std::fs::read(tmp.path().join("existing.spv")).unwrap(),
        b"precious"
    );
}

#[test]
fn hide_fails_without_a_vault() {
    let tmp = workdir();

    let cover_path = tmp.path().join("cover.png");
    image::RgbImage::new(32, 32).save(&cover_path).unwrap();

    stegpass()
        .args(["hide", "cover.png"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Vault not found"));
}

#[test]
fn hide_fails_on_a_too_small_cover() {
    let tmp = workdir();

    stegpass()
        .args(["init"])
        .current_dir(tmp.path())
        .env("STEGPASS_PASSWORD", MASTER)
        .assert()
        .success();

    // 4x4 RGB = 48 bit slots, far less than any vault file needs.
    let cover_path = tmp.path().join("tiny.png");
    image::RgbImage::new(4, 4).save(&cover_path).unwrap();

    stegpass()
        .args(["hide", "tiny.png"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("only holds"));

    assert!(!tmp.path().join("tiny-stego.png").exists());
}
