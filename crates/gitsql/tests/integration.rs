//! Integration tests for gitsql library API.

use gitsql::sql::register_module;
use gitsql::{GitRepo, GitsqlError, SqlEngine, TABLES};
use rusqlite::Connection;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(path: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(["-c", "user.email=test@example.com", "-c", "user.name=Test User"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(path)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("git output is utf-8")
}

/// Creates an empty temporary Git repository.
fn create_empty_repo() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    git(temp.path(), &["init"]);
    temp
}

/// Writes `files` and commits everything with a fixed committer time.
fn commit(path: &Path, files: &[(&str, &str)], time: i64) -> String {
    for (name, content) in files {
        let full = path.join(name);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create dirs");
        }
        std::fs::write(full, content).expect("Failed to write file");
    }
    git(path, &["add", "-A"]);

    let date = format!("{time} +0000");
    let output = Command::new("git")
        .args(["-c", "user.email=test@example.com", "-c", "user.name=Test User"])
        .args(["-c", "commit.gpgsign=false"])
        .args(["commit", "--allow-empty", "-m", &format!("commit at {time}")])
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .current_dir(path)
        .output()
        .expect("Failed to commit");
    assert!(output.status.success(), "commit failed");

    git(path, &["rev-parse", "HEAD"]).trim().to_string()
}

fn rows(engine: &SqlEngine, query: &str) -> Vec<Vec<Value>> {
    engine.execute(query).expect("Failed to execute query").rows
}

#[test]
fn test_open_nonexistent_repo() {
    let result = GitRepo::open("/nonexistent/path");
    assert!(matches!(result, Err(GitsqlError::RepoNotFound(_))));

    let result = SqlEngine::open("/nonexistent/path");
    assert!(matches!(result, Err(GitsqlError::RepoNotFound(_))));
}

#[test]
fn test_table_info() {
    assert_eq!(TABLES.len(), 1);
    let columns: Vec<&str> = TABLES[0].columns.iter().map(|c| c.name).collect();
    assert_eq!(columns, ["commit_id", "file", "additions", "deletions"]);
}

#[test]
fn test_empty_repo_has_no_rows() {
    let temp = create_empty_repo();
    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");

    let result = engine.execute("SELECT * FROM stats").expect("Empty repo is not an error");
    assert!(result.is_empty());
    assert_eq!(
        result.columns,
        ["commit_id", "file", "additions", "deletions"]
    );
}

#[test]
fn test_root_commit_counts_every_line() {
    let temp = create_empty_repo();
    let h = commit(temp.path(), &[("a.txt", "1\n2\n3\n"), ("b.txt", "1\n2\n")], 1_600_000_000);

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    assert_eq!(
        rows(&engine, "SELECT * FROM stats"),
        vec![
            vec![json!(h), json!("a.txt"), json!(3), json!(0)],
            vec![json!(h), json!("b.txt"), json!(2), json!(0)],
        ]
    );
}

#[test]
fn test_second_commit_diffs_against_parent() {
    let temp = create_empty_repo();
    let h1 = commit(temp.path(), &[("a.txt", "1\n2\n3\n4\n5\n")], 1_600_000_000);
    let h2 = commit(temp.path(), &[("a.txt", "1\n2\nthree\n4\n5\n6\n7\n")], 1_600_000_100);

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    assert_eq!(
        rows(&engine, "SELECT * FROM stats"),
        vec![
            vec![json!(h2), json!("a.txt"), json!(3), json!(1)],
            vec![json!(h1), json!("a.txt"), json!(5), json!(0)],
        ]
    );
}

#[test]
fn test_predicate_on_commit_id_filters_full_scan() {
    let temp = create_empty_repo();
    let h1 = commit(temp.path(), &[("a.txt", "1\n"), ("b.txt", "1\n")], 1_600_000_000);
    commit(temp.path(), &[("a.txt", "1\n2\n")], 1_600_000_100);
    commit(temp.path(), &[("c.txt", "x\n")], 1_600_000_200);

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let result = rows(
        &engine,
        &format!("SELECT file, additions FROM stats WHERE commit_id = '{h1}' ORDER BY file"),
    );
    assert_eq!(
        result,
        vec![
            vec![json!("a.txt"), json!(1)],
            vec![json!("b.txt"), json!(1)],
        ]
    );
}

#[test]
fn test_commit_ids_match_reachable_history() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);
    git(temp.path(), &["checkout", "-b", "side"]);
    commit(temp.path(), &[("side.txt", "s\n")], 1_600_000_300);
    git(temp.path(), &["checkout", "-"]);
    commit(temp.path(), &[("a.txt", "1\n2\n")], 1_600_000_200);
    git(
        temp.path(),
        &["merge", "--no-ff", "--no-edit", "side"],
    );

    let expected: HashSet<String> = git(temp.path(), &["rev-list", "HEAD"])
        .lines()
        .map(str::to_string)
        .collect();

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let actual: HashSet<String> = rows(&engine, "SELECT DISTINCT commit_id FROM stats")
        .into_iter()
        .map(|row| row[0].as_str().expect("commit_id is text").to_string())
        .collect();

    assert_eq!(expected.len(), 4);
    assert_eq!(actual, expected);
}

#[test]
fn test_commits_ordered_by_committer_time() {
    let temp = create_empty_repo();
    let h1 = commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);
    let h2 = commit(temp.path(), &[("a.txt", "1\n2\n")], 1_600_000_100);
    let h3 = commit(temp.path(), &[("a.txt", "1\n2\n3\n")], 1_600_000_200);

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let ids: Vec<Value> = rows(&engine, "SELECT commit_id FROM stats")
        .into_iter()
        .map(|mut row| row.remove(0))
        .collect();
    assert_eq!(ids, vec![json!(h3), json!(h2), json!(h1)]);
}

#[test]
fn test_self_join_uses_independent_cursors() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n"), ("b.txt", "1\n2\n")], 1_600_000_000);
    commit(temp.path(), &[("a.txt", "1\n2\n")], 1_600_000_100);

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let result = rows(
        &engine,
        "SELECT COUNT(*) FROM stats s1 JOIN stats s2 ON s1.file = s2.file",
    );
    // a.txt appears twice (2x2) and b.txt once (1x1).
    assert_eq!(result, vec![vec![json!(5)]]);
}

#[test]
fn test_repeated_queries_restart_scan() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);
    commit(temp.path(), &[("b.txt", "1\n")], 1_600_000_100);

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let first = rows(&engine, "SELECT * FROM stats");
    let second = rows(&engine, "SELECT * FROM stats");
    assert_eq!(first.len(), 2);
    assert_eq!(first, second);

    // A correlated subquery re-filters the inner cursor once per outer row.
    let correlated = rows(
        &engine,
        "SELECT s.file, (SELECT COUNT(*) FROM stats t WHERE t.commit_id = s.commit_id) FROM stats s",
    );
    assert_eq!(correlated.len(), 2);
    assert!(correlated.iter().all(|row| row[1] == json!(1)));
}

#[test]
fn test_module_on_custom_connection() {
    let temp = create_empty_repo();
    let h = commit(temp.path(), &[("notes.md", "# a\n\nb\n")], 1_600_000_000);

    let conn = Connection::open_in_memory().expect("Failed to open connection");
    register_module(&conn).expect("Failed to register module");
    conn.execute_batch(&format!(
        "CREATE VIRTUAL TABLE history USING git_stats('{}')",
        temp.path().display()
    ))
    .expect("Failed to create table");

    let (commit_id, additions): (String, i64) = conn
        .query_row("SELECT commit_id, additions FROM history", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .expect("Failed to query");
    assert_eq!(commit_id, h);
    assert_eq!(additions, 3);
}

#[test]
fn test_missing_path_argument_is_rejected() {
    let conn = Connection::open_in_memory().expect("Failed to open connection");
    register_module(&conn).expect("Failed to register module");

    let err = conn
        .execute_batch("CREATE VIRTUAL TABLE broken USING git_stats")
        .expect_err("Table without a path must fail");
    assert!(err.to_string().contains("repository path"), "{err}");
}

#[test]
fn test_removed_repository_aborts_query() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);
    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");

    std::fs::remove_dir_all(temp.path().join(".git")).expect("Failed to remove .git");

    let err = engine
        .execute("SELECT * FROM stats")
        .expect_err("Query must fail once the repository is gone");
    assert!(matches!(err, GitsqlError::Sql(_)), "{err}");
}

#[test]
fn test_missing_blob_aborts_query_with_diff_error() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "old\n"), ("b.txt", "b\n")], 1_600_000_000);
    commit(temp.path(), &[("b.txt", "b\nb\n")], 1_600_000_100);
    commit(temp.path(), &[("b.txt", "b\nb\nb\n")], 1_600_000_200);

    // Only the root commit needs the contents of a.txt.
    let blob = git(temp.path(), &["rev-parse", "HEAD~2:a.txt"]).trim().to_string();
    let object = temp
        .path()
        .join(".git/objects")
        .join(&blob[..2])
        .join(&blob[2..]);
    std::fs::remove_file(object).expect("Failed to remove blob");

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let err = engine
        .execute("SELECT * FROM stats")
        .expect_err("Query must fail on a missing blob");
    assert!(matches!(err, GitsqlError::Sql(_)), "{err}");
    assert!(
        err.to_string().contains("Failed to compute diff statistics"),
        "{err}"
    );
}

#[test]
fn test_dangling_head_aborts_query_with_tip_error() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);

    let branch = git(temp.path(), &["symbolic-ref", "HEAD"]).trim().to_string();
    std::fs::write(
        temp.path().join(".git").join(&branch),
        "0123456789abcdef0123456789abcdef01234567\n",
    )
    .expect("Failed to rewrite branch ref");

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let err = engine
        .execute("SELECT * FROM stats")
        .expect_err("Query must fail when HEAD names a missing commit");
    assert!(matches!(err, GitsqlError::Sql(_)), "{err}");
    assert!(
        err.to_string().contains("Failed to resolve history tip"),
        "{err}"
    );
}

#[test]
fn test_empty_commit_has_no_rows() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);
    let empty = commit(temp.path(), &[], 1_600_000_100);
    commit(temp.path(), &[("a.txt", "1\n2\n")], 1_600_000_200);

    let expected: HashSet<String> = git(temp.path(), &["rev-list", "HEAD"])
        .lines()
        .filter(|id| *id != empty)
        .map(str::to_string)
        .collect();

    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");
    let actual: HashSet<String> = rows(&engine, "SELECT DISTINCT commit_id FROM stats")
        .into_iter()
        .map(|row| row[0].as_str().expect("commit_id is text").to_string())
        .collect();

    assert_eq!(expected.len(), 2);
    assert!(!actual.contains(&empty));
    assert_eq!(actual, expected);
}

#[test]
fn test_engine_reports_repository_root() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("src/a.txt", "1\n")], 1_600_000_000);

    let engine = SqlEngine::open(temp.path().join("src")).expect("Failed to open engine");
    let root = Path::new(engine.repo_path())
        .canonicalize()
        .expect("Failed to canonicalize repo path");
    assert_eq!(root, temp.path().canonicalize().expect("Failed to canonicalize"));
    assert_eq!(rows(&engine, "SELECT file FROM stats"), vec![vec![json!("src/a.txt")]]);
}

#[test]
fn test_query_result_to_json() {
    let temp = create_empty_repo();
    commit(temp.path(), &[("a.txt", "1\n")], 1_600_000_000);
    let engine = SqlEngine::open(temp.path()).expect("Failed to open engine");

    let result = engine
        .execute("SELECT file, additions FROM stats LIMIT 1")
        .expect("Failed to execute query");

    let json = result.to_json_array();
    assert_eq!(json.len(), 1, "Should have 1 JSON object");
    assert_eq!(json[0]["file"], json!("a.txt"));
    assert_eq!(json[0]["additions"], json!(1));
}
