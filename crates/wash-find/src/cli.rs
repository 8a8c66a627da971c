//! The `wash-find` command line.
//!
//! ```text
//! wash-find tree.json -- -meta .tags[?] .key department
//! wash-find tree.json --rql '["meta", ["object", [["key", "arch"], ["string", ["=", "x86_64"]]]]]'
//! ```
//!
//! The input file holds one entry or an array of entries. Matching entry
//! paths are printed one per line.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use serde_json::Value;
use wash_rql::{Entry, EntryPredicate, ExprNode, Query};

use crate::journal::{self, FileJournal, Journal};
use crate::meta::MetaPrimary;
use crate::options::Options;
use crate::primary::{self, Primary};

/// Find entries in a resource tree by their metadata.
#[derive(Debug, Parser)]
#[command(name = "wash-find", version)]
#[command(about = "Find entries in a resource tree by their metadata")]
pub struct Cli {
    /// JSON file holding an entry or an array of entries
    pub file: PathBuf,

    /// Do not report entries shallower than this depth (roots are depth 0)
    #[arg(long, value_name = "N")]
    pub mindepth: Option<usize>,

    /// Do not descend below this depth
    #[arg(long, value_name = "N")]
    pub maxdepth: Option<usize>,

    /// Use a query in its JSON form instead of a find expression
    #[arg(long, value_name = "JSON", conflicts_with = "expression")]
    pub rql: Option<String>,

    /// Print the compiled query as JSON and exit
    #[arg(long)]
    pub print_rql: bool,

    /// Append a record of each search to this file
    #[arg(long, value_name = "PATH")]
    pub journal: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Find expression, e.g. `-meta .key value`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "EXPRESSION")]
    pub expression: Vec<String>,
}

const PRIMARIES: &[&dyn Primary] = &[&MetaPrimary];

/// Compiles a find expression. Consecutive primaries are joined by AND.
///
/// Returns `None` for an empty expression, which matches every entry.
pub fn compile(tokens: &[String], options: &mut Options) -> anyhow::Result<Option<Query>> {
    let mut root: Option<ExprNode<dyn EntryPredicate>> = None;
    let mut rest = tokens;
    while let Some((token, args)) = rest.split_first() {
        let Some(primary) = primary::lookup(PRIMARIES, token) else {
            bail!("unknown primary or operator {token}");
        };
        let (predicate, remaining) = primary
            .parse(args)
            .with_context(|| token.clone())?;
        primary.options_setter(options);
        let node = ExprNode::atom(predicate);
        root = Some(match root {
            Some(left) => ExprNode::and(left, node),
            None => node,
        });
        rest = remaining;
    }
    Ok(root.map(Query::from_node))
}

/// Reads the entry tree from `path`, filling in paths from names.
pub fn load_entries(path: &Path) -> anyhow::Result<Vec<Entry>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let value: Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", path.display()))?;
    let mut entries: Vec<Entry> = match value {
        Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    for entry in &mut entries {
        entry.assign_paths("");
    }
    Ok(entries)
}

/// Runs a search, writing matching paths to `out`.
///
/// Returns the number of matches.
pub fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<usize> {
    let journal = cli
        .journal
        .as_ref()
        .map(FileJournal::open)
        .transpose()
        .context("opening journal")?;
    let journal = journal.as_ref().map(|j| j as &dyn Journal);

    let mut options = Options::new();
    if let Some(depth) = cli.mindepth {
        options.set_mindepth(depth);
    }
    if let Some(depth) = cli.maxdepth {
        options.set_maxdepth(depth);
    }

    let query = match &cli.rql {
        Some(text) => Some(Query::parse(text).context("--rql")?),
        None => compile(&cli.expression, &mut options)?,
    };

    if cli.print_rql {
        let rql = query.as_ref().map_or(Value::Null, Query::to_value);
        writeln!(out, "{rql}")?;
        return Ok(0);
    }

    let entries = load_entries(&cli.file)?;
    log::debug!("searching {} roots with {:?}", entries.len(), options);
    if journal.is_some() {
        let rql = query.as_ref().map_or(Value::Null, Query::to_value);
        journal::log(journal, format_args!("find {} {rql}", cli.file.display()));
    }

    let mut matched = 0;
    for entry in &entries {
        walk(entry, 0, &options, query.as_ref(), out, &mut matched)?;
    }
    if journal.is_some() {
        journal::log(journal, format_args!("matched {matched} entries"));
    }
    Ok(matched)
}

fn walk(
    entry: &Entry,
    depth: usize,
    options: &Options,
    query: Option<&Query>,
    out: &mut impl Write,
    matched: &mut usize,
) -> anyhow::Result<()> {
    if options.reports(depth) && query.map_or(true, |q| q.matches(entry)) {
        writeln!(out, "{}", entry.path)?;
        *matched += 1;
    }
    if options.descends(depth) {
        for child in &entry.children {
            walk(child, depth + 1, options, query, out, matched)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<String> {
        input.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn empty_expression_matches_everything() {
        let mut options = Options::new();
        assert!(compile(&[], &mut options).unwrap().is_none());
        assert_eq!(options.maxdepth, None);
    }

    #[test]
    fn meta_limits_depth() {
        let mut options = Options::new();
        compile(&toks("-meta .a foo"), &mut options).unwrap();
        assert_eq!(options.maxdepth, Some(1));
    }

    #[test]
    fn consecutive_primaries_are_anded() {
        let mut options = Options::new();
        let query = compile(&toks("-m .a foo -meta .b -true"), &mut options)
            .unwrap()
            .unwrap();
        let rql = query.to_value();
        assert_eq!(rql[0], "AND");
    }

    #[test]
    fn leftover_tokens_are_rejected() {
        let mut options = Options::new();
        let err = compile(&toks("-meta .a foo -name bar"), &mut options).unwrap_err();
        assert_eq!(err.to_string(), "unknown primary or operator -name");
        let err = compile(&toks("-meta .a"), &mut options).unwrap_err();
        assert_eq!(format!("{err:#}"), "-meta: expected a predicate expression");
    }

    #[test]
    fn cli_parses_trailing_expression() {
        let cli = Cli::try_parse_from([
            "wash-find",
            "tree.json",
            "--maxdepth",
            "3",
            "--",
            "-meta",
            ".a",
            "-true",
        ])
        .unwrap();
        assert_eq!(cli.maxdepth, Some(3));
        assert_eq!(cli.expression, toks("-meta .a -true"));
    }
}
