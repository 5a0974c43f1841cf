use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let p = dir.join(name);
    std::fs::write(&p, body).unwrap();
    p
}

/// English headers, float-formatted ids, a translated duplicate column.
fn fixture(dir: &Path) -> (PathBuf, PathBuf) {
    let perf = write(
        dir,
        "songs.csv",
        "Song Name (translated),Song Name,Vocal,Order,Event ID\n\
         Blue Sky,青い空,Aki,1,1.0\n\
         Night,夜,Mina,2,1\n\
         Blue Sky,青い空,Mina,1,2\n\
         Rain,雨,Aki,x,2\n",
    );
    let events = write(
        dir,
        "lives.csv",
        "Event ID,Date,Venue,Title,Status\n\
         1,2024-05-01,Zepp Tokyo,Spring Live,done\n\
         2,2023-12-24,Osaka Hall,Xmas Live,done\n\
         3,2025-02-01,Nagoya Dome,Next Live,scheduled\n\
         4,TBD,Sendai,Someday,未\n",
    );
    (perf, events)
}

fn vsop(perf: &Path, events: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vsop").unwrap();
    cmd.arg("--performances").arg(perf).arg("--events").arg(events);
    cmd
}

#[test]
fn songs_ranked_by_play_count_with_untranslated_titles() {
    let dir = tempfile::tempdir().unwrap();
    let (perf, events) = fixture(dir.path());

    vsop(&perf, &events)
        .args(["songs", "--limit", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rank=1 title=青い空 plays=2 vocalist=Aki"))
        .stdout(predicate::str::contains("rank=2 title=夜 plays=1 vocalist=Mina"))
        .stdout(predicate::str::contains("rank=3").not());
}

#[test]
fn events_search_and_upcoming() {
    let dir = tempfile::tempdir().unwrap();
    let (perf, events) = fixture(dir.path());

    vsop(&perf, &events)
        .args(["events", "--search", "zepp"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id=1 date=2024-05-01 venue=Zepp Tokyo title=Spring Live status=completed"))
        .stdout(predicate::str::contains("id=2").not());

    let out = vsop(&perf, &events)
        .args(["events", "--upcoming"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let ids: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ids, vec!["id=3", "id=4"]);
}

#[test]
fn events_by_date_puts_undated_last() {
    let dir = tempfile::tempdir().unwrap();
    let (perf, events) = fixture(dir.path());

    let out = vsop(&perf, &events).args(["events", "--by-date"]).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let ids: Vec<&str> = stdout
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ids, vec!["id=2", "id=1", "id=3", "id=4"]);
}

#[test]
fn columns_reports_matches_and_virtual_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (perf, events) = fixture(dir.path());

    vsop(&perf, &events)
        .arg("columns")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "table=performances field=song_title column=Song Name kind=actual rule=marker_excluding_substring",
        ))
        .stdout(predicate::str::contains(
            "table=performances field=start_offset column=STARTTIME_virtual kind=virtual fallback=0",
        ))
        .stdout(predicate::str::contains("matched=4 unmatched=0 unordered=1"));
}

#[test]
fn columns_json_is_machine_readable() {
    let dir = tempfile::tempdir().unwrap();
    let (perf, events) = fixture(dir.path());

    let out = vsop(&perf, &events).args(["columns", "--json"]).output().unwrap();
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(v["performances"]["columns"]["vocalist"]["name"], "Vocal");
    assert_eq!(v["events"]["columns"]["video_base_link"]["kind"], "virtual");
    assert_eq!(v["report"]["events_without_setlist"][0], "3");
}
