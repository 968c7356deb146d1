//! End-to-end tests for the `myrepos sync` command.
//!
//! A fake `git` script on `PATH` records every invocation, so these tests
//! check the exact commands a sync issues and where it issues them.

#![cfg(unix)]

mod common;
use common::prelude::*;

fn sync(fixture: &TestFixture) -> assert_cmd::assert::Assert {
    fixture
        .command()
        .arg("sync")
        .arg("--skip-agent-check")
        .assert()
}

fn ran(calls: &[String], dir_suffix: &str, args: &str) -> bool {
    calls.iter().any(|call| match call.split_once('|') {
        Some((dir, rest)) => dir.ends_with(dir_suffix) && rest == args,
        None => false,
    })
}

#[test]
fn test_sync_clones_missing_repo() {
    let fixture = TestFixture::new()
        .with_layout(layouts::SINGLE_REPO)
        .with_fake_git();

    sync(&fixture)
        .success()
        .stdout(predicate::str::contains("example.com"))
        .stdout(predicate::str::contains("org1"))
        .stdout(predicate::str::contains("repoA"))
        .stdout(predicate::str::contains("cloned to latest at"))
        .stdout(predicate::str::contains("Alice : initial commit"));

    let calls = fixture.git_calls();
    assert!(ran(&calls, "src/example.com/org1", "clone git@example.com:org1/repoA.git"));
    assert!(ran(&calls, "src/example.com/org1/repoA", "remote -v"));
    assert!(!calls.iter().any(|c| c.contains("remote add")));
    assert!(fixture.root().join("example.com/org1/repoA").is_dir());
}

#[test]
fn test_sync_clones_fork_with_push_guard() {
    let fixture = TestFixture::new().with_layout(layouts::FORK).with_fake_git();

    sync(&fixture).success();

    let calls = fixture.git_calls();
    assert!(ran(&calls, "src/example.com/dir1", "clone git@example.com:origin1/repoB.git"));
    assert!(ran(
        &calls,
        "src/example.com/dir1/repoB",
        "remote add upstream git@example.com:upstream1/repoB.git"
    ));
    assert!(ran(
        &calls,
        "src/example.com/dir1/repoB",
        "remote set-url --push upstream disabled_push_git@example.com:upstream1/repoB.git"
    ));
}

#[test]
fn test_sync_rebases_existing_repo() {
    let fixture = TestFixture::new()
        .with_layout(layouts::SINGLE_REPO)
        .with_fake_git();
    std::fs::create_dir_all(fixture.root().join("example.com/org1/repoA")).unwrap();

    sync(&fixture)
        .success()
        .stdout(predicate::str::contains("no change since"));

    let calls = fixture.git_calls();
    let dir = "src/example.com/org1/repoA";
    assert!(ran(&calls, dir, "branch --list main"));
    assert!(ran(&calls, dir, "checkout main"));
    assert!(ran(&calls, dir, "fetch origin"));
    assert!(ran(&calls, dir, "diff origin/main"));
    assert!(!calls.iter().any(|c| c.contains("|clone")));
    assert!(!calls.iter().any(|c| c.contains("|push")));
}

#[test]
fn test_sync_twice_clones_then_rebases() {
    let fixture = TestFixture::new()
        .with_layout(layouts::SINGLE_REPO)
        .with_fake_git();

    sync(&fixture).success();
    sync(&fixture)
        .success()
        .stdout(predicate::str::contains("no change since"));

    let clones = fixture
        .git_calls()
        .iter()
        .filter(|c| c.contains("|clone "))
        .count();
    assert_eq!(clones, 1);
}

#[test]
fn test_sync_https_server_uses_port() {
    let fixture = TestFixture::new()
        .with_layout(layouts::TWO_SERVERS)
        .with_fake_git();

    sync(&fixture).success();

    let calls = fixture.git_calls();
    assert!(ran(
        &calls,
        "src/git.example.org/team",
        "clone https://git.example.org:8443/team/api.git"
    ));
    assert!(ran(
        &calls,
        "src/git.example.org/team",
        "clone https://git.example.org:8443/team/web.git"
    ));
    assert!(ran(&calls, "src/github.com/me", "clone git@github.com:me/dots.git"));
}

#[test]
fn test_sync_missing_root_touches_nothing() {
    let fixture = TestFixture::new()
        .with_layout(layouts::SINGLE_REPO)
        .with_fake_git();
    std::fs::remove_dir(fixture.root()).unwrap();

    sync(&fixture)
        .code(1)
        .stderr(predicate::str::contains("make it first"));

    assert!(fixture.git_calls().is_empty());
    assert!(!fixture.root().exists());
}

#[test]
fn test_sync_file_in_place_of_repo_fails() {
    let fixture = TestFixture::new()
        .with_layout(layouts::SINGLE_REPO)
        .with_fake_git()
        .with_file("src/example.com/org1/repoA", "not a repo");

    sync(&fixture)
        .code(1)
        .stdout(predicate::str::contains("error"))
        .stderr(predicate::str::contains("exists but isn't a directory"));

    assert!(fixture.git_calls().is_empty());
}

#[test]
fn test_sync_explicit_layout_path() {
    let fixture = TestFixture::new().with_fake_git();
    let root = fixture.root().display().to_string();
    let fixture = fixture.with_file(
        "layouts/work.yml",
        &layouts::SINGLE_REPO.replace("{root}", &root),
    );

    fixture
        .command()
        .arg("sync")
        .arg("--skip-agent-check")
        .arg(fixture.path().join("layouts/work.yml"))
        .assert()
        .success();

    assert!(fixture.root().join("example.com/org1/repoA").is_dir());
}
