//! End-to-end runs of the `wash-find` command line.

use std::fs;
use std::path::Path;

use clap::Parser;
use serde_json::json;
use tempfile::TempDir;
use wash_find::{run, Cli};

fn write_tree(dir: &Path) -> std::path::PathBuf {
    let tree = json!([
        {
            "name": "aws",
            "actions": ["list"],
            "children": [
                {
                    "name": "i-1",
                    "actions": ["list", "exec"],
                    "meta": {"state": "running", "cores": 4},
                    "children": [
                        {"name": "console.out", "actions": ["read"], "meta": {"state": "running"}}
                    ]
                },
                {
                    "name": "i-2",
                    "actions": ["list"],
                    "meta": {"state": "stopped", "cores": 2}
                }
            ]
        }
    ]);
    let path = dir.join("tree.json");
    fs::write(&path, tree.to_string()).unwrap();
    path
}

fn find(args: &[&str]) -> (usize, String) {
    let dir = TempDir::new().unwrap();
    let file = write_tree(dir.path());
    let mut argv = vec!["wash-find".to_string(), file.display().to_string()];
    argv.extend(args.iter().map(|arg| arg.to_string()));
    let cli = Cli::try_parse_from(argv).unwrap();
    let mut out = Vec::new();
    let count = run(&cli, &mut out).unwrap();
    (count, String::from_utf8(out).unwrap())
}

#[test]
fn no_expression_prints_every_entry() {
    let (count, out) = find(&[]);
    assert_eq!(count, 4);
    assert_eq!(out, "/aws\n/aws/i-1\n/aws/i-1/console.out\n/aws/i-2\n");
}

#[test]
fn depth_window() {
    let (_, out) = find(&["--mindepth", "1", "--maxdepth", "1"]);
    assert_eq!(out, "/aws/i-1\n/aws/i-2\n");
}

#[test]
fn meta_defaults_to_maxdepth_one() {
    let (count, out) = find(&["--", "-meta", ".state", "running"]);
    assert_eq!(count, 1);
    assert_eq!(out, "/aws/i-1\n");
}

#[test]
fn explicit_maxdepth_overrides_meta_default() {
    let (_, out) = find(&["--maxdepth", "2", "--", "-meta", ".state", "running"]);
    assert_eq!(out, "/aws/i-1\n/aws/i-1/console.out\n");
}

#[test]
fn rql_query() {
    let rql = json!(["AND", ["action", "exec"], ["meta", ["object", [["key", "cores"], ["number", [">", 2]]]]]]);
    let (_, out) = find(&["--rql", &rql.to_string()]);
    assert_eq!(out, "/aws/i-1\n");
}

#[test]
fn print_rql() {
    let (_, out) = find(&["--print-rql", "--", "-m", ".cores", "+2"]);
    insta::assert_snapshot!(out.trim_end(), @r#"["meta",["object",[["key","cores"],["number",[">",2]]]]]"#);
}

#[test]
fn journal_records_searches() {
    let dir = TempDir::new().unwrap();
    let file = write_tree(dir.path());
    let journal = dir.path().join("journal.log");
    let cli = Cli::try_parse_from([
        "wash-find".to_string(),
        file.display().to_string(),
        "--journal".to_string(),
        journal.display().to_string(),
        "--".to_string(),
        "-meta".to_string(),
        ".state".to_string(),
        "stopped".to_string(),
    ])
    .unwrap();
    let mut out = Vec::new();
    assert_eq!(run(&cli, &mut out).unwrap(), 1);

    let lines: Vec<String> = fs::read_to_string(&journal)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("find "));
    assert_eq!(lines[1], "matched 1 entries");
}

#[test]
fn bad_expressions_are_errors() {
    let dir = TempDir::new().unwrap();
    let file = write_tree(dir.path());
    for (args, message) in [
        (vec!["--", "-name", "foo"], "unknown primary or operator -name"),
        (vec!["--", "-meta", "state"], "-meta: key sequences must begin with a '.'"),
        (vec!["--rql", "[\"bogus\"]"], "--rql"),
    ] {
        let mut argv = vec!["wash-find".to_string(), file.display().to_string()];
        argv.extend(args.into_iter().map(String::from));
        let cli = Cli::try_parse_from(argv).unwrap();
        let err = run(&cli, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").starts_with(message), "{err:#}");
    }
}

#[test]
fn missing_file_is_reported() {
    let cli = Cli::try_parse_from(["wash-find", "/nonexistent/tree.json"]).unwrap();
    let err = run(&cli, &mut Vec::new()).unwrap_err();
    assert!(err.to_string().starts_with("reading /nonexistent/tree.json"));
}
