//! Drive the demo binary end to end: exit codes, stdout and stderr.

use assert_cmd::Command;
use predicates::prelude::*;

fn demo() -> Command {
    Command::cargo_bin("applause-demo").unwrap()
}

#[test]
fn help_exits_successfully() {
    demo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "USAGE: applause-demo [add | update | remove | info | list]",
        ))
        .stdout(predicate::str::contains("COMMANDS:"))
        .stdout(predicate::str::contains("Display this help and exit."));
}

#[test]
fn no_arguments_shows_help() {
    demo()
        .assert()
        .success()
        .stdout(predicate::str::contains("COMMANDS:"));
}

#[test]
fn subcommand_help() {
    demo()
        .args(["add", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "USAGE: applause-demo add [packages...] [--dev] [--registry <url>] [--jobs <jobs>]",
        ))
        .stdout(predicate::str::contains("(default: https://registry.npmjs.org)"));
}

#[test]
fn unknown_option_fails_with_usage() {
    demo()
        .arg("--bogus")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "ERROR: `--bogus` is not a recognised option",
        ))
        .stderr(predicate::str::contains("USAGE: applause-demo"));
}

#[test]
fn unknown_command_fails_with_help() {
    demo()
        .arg("publish")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "ERROR: `publish` is not a recognised command",
        ))
        .stderr(predicate::str::contains("COMMANDS:"));
}

#[test]
fn nested_errors_show_nested_usage() {
    demo()
        .args(["add", "left-pad", "--jobs", "lots"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ERROR: jobs: invalid u8 value \"lots\""))
        .stderr(predicate::str::contains("USAGE: applause-demo add"));
}

#[test]
fn add_packages() {
    demo()
        .args(["add", "-Dj2", "left-pad", "is-even"])
        .assert()
        .success()
        .stdout("add (dev) left-pad is-even from https://registry.npmjs.org with 2 jobs\n");
}

#[test]
fn update_everything() {
    demo()
        .args(["update"])
        .assert()
        .success()
        .stdout("update all (latest: false)\n");

    demo()
        .args(["update", "-L", "left-pad"])
        .assert()
        .success()
        .stdout("update left-pad (latest: true)\n");
}

#[test]
fn info_from_stdin() {
    demo()
        .args(["info", "-"])
        .write_stdin("left-pad\n")
        .assert()
        .success()
        .stdout("info: left-pad\n");
}

#[test]
fn list_without_arguments() {
    demo().arg("list").assert().success().stdout("list\n");
}
