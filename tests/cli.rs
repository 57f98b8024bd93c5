use assert_cmd::Command;
use std::fs;
use tempfile::tempdir;

#[test]
fn print_leaderboard_ranks_stored_scores() {
    let dir = tempdir().unwrap();
    let scores = dir.path().join("scores.csv");
    fs::write(
        &scores,
        "date,score,name,misses,accuracy\n\
         08.01.2026 19:41,23,,2,0.92\n\
         09.01.2026 08:05,31,,0,1.0\n\
         09.01.2026 08:07,12,,4,0.75\n",
    )
    .unwrap();

    let output = Command::cargo_bin("flick")
        .unwrap()
        .arg("--print-leaderboard")
        .arg("--scores")
        .arg(&scores)
        .arg("--log-file")
        .arg(dir.path().join("flick.log"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Rank  Score  Accuracy   Date");
    assert!(lines[2].contains("31") && lines[2].contains("🥇"));
    assert!(lines[3].contains("23") && lines[3].contains("🥈"));
    assert!(lines[4].contains("12") && lines[4].contains("75.00%"));
}

#[test]
fn print_leaderboard_respects_limit() {
    let dir = tempdir().unwrap();
    let scores = dir.path().join("scores.csv");
    let mut csv = String::from("date,score,name,misses,accuracy\n");
    for score in 0..15 {
        csv.push_str(&format!("08.01.2026 19:{score:02},{score},,0,1.0\n"));
    }
    fs::write(&scores, csv).unwrap();

    let output = Command::cargo_bin("flick")
        .unwrap()
        .args(["--print-leaderboard", "--limit", "4", "--scores"])
        .arg(&scores)
        .arg("--log-file")
        .arg(dir.path().join("flick.log"))
        .output()
        .unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 2 + 4);
}

#[test]
fn print_leaderboard_reports_corrupt_store() {
    let dir = tempdir().unwrap();
    let scores = dir.path().join("scores.csv");
    fs::write(&scores, "date,score,name,misses,accuracy\n08.01.2026 19:41,lots,,2,0.92\n").unwrap();

    Command::cargo_bin("flick")
        .unwrap()
        .arg("--print-leaderboard")
        .arg("--scores")
        .arg(&scores)
        .arg("--log-file")
        .arg(dir.path().join("flick.log"))
        .assert()
        .failure();
}

#[test]
fn empty_store_prints_hint() {
    let dir = tempdir().unwrap();
    let output = Command::cargo_bin("flick")
        .unwrap()
        .arg("--print-leaderboard")
        .arg("--scores")
        .arg(dir.path().join("none.csv"))
        .arg("--log-file")
        .arg(dir.path().join("flick.log"))
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("No scores yet"));
}
