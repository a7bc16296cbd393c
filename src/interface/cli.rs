use crate::domain::config::{ConfigFile, DedupConfig};
use crate::infrastructure::event_ndjson::spawn_ndjson_printer;
use crate::infrastructure::netscape_html::{
    read_bookmarks_html, render_bookmarks_html, write_bookmarks_html,
};
use crate::infrastructure::report_json::{read_report_file, write_report_file};
use crate::infrastructure::union_find::UnionFindComponentDetector;
use crate::infrastructure::url_normalizer::DefaultUrlNormalizer;
use crate::usecase::clean::clean_bookmarks;
use crate::usecase::event::AppEvent;
use crate::usecase::report::{build_report, render_text_report};
use crate::usecase::validate::validate_report;
use anyhow::{anyhow, Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    run_with_args(&args).await
}

pub async fn run_with_args(args: &[String]) -> Result<()> {
    let cmd = Cli::parse(args)?;

    match cmd {
        Cli::BookmarksClean(opts) => {
            if !opts.dry_run {
                let targets = [("--out", Some(&opts.output)), ("--report", opts.report.as_ref())];
                for (flag, path) in targets {
                    if path.is_some_and(|p| is_same_file(&opts.input, p)) {
                        return Err(anyhow!(
                            "refusing to overwrite input with {flag}: {}",
                            opts.input
                        ));
                    }
                }
            }

            let config = resolve_config(&opts).await?;

            let (tx, rx) = mpsc::channel::<AppEvent>(1024);
            let printer = if opts.emit_events {
                Some(spawn_ndjson_printer(rx))
            } else {
                drop(rx);
                None
            };

            let parsed = read_bookmarks_html(&opts.input)
                .await
                .with_context(|| format!("reading bookmark export: {}", opts.input))?;
            let (records, rejected) = (&parsed.records, &parsed.rejected);

            let normalizer = DefaultUrlNormalizer;
            let components = UnionFindComponentDetector;
            let sink = opts.emit_events.then_some(tx);
            let result =
                clean_bookmarks(records, rejected, &config, &normalizer, &components, sink).await?;

            if let Some(handle) = printer {
                handle.await.ok();
            }

            let report = build_report(records, rejected, &result, &config, now_ms());
            validate_report(&report).context("validating duplicate report")?;

            if !opts.dry_run {
                let html = render_bookmarks_html(result.labeled());
                write_bookmarks_html(&opts.output, &html)
                    .await
                    .with_context(|| format!("writing cleaned bookmarks: {}", opts.output))?;
                if let Some(path) = opts.report.as_deref() {
                    write_report_file(path, &report)
                        .await
                        .with_context(|| format!("writing report JSON: {path}"))?;
                }
            }

            if config.generate_report {
                eprint!("{}", render_text_report(records, rejected, &result, &config));
            }

            let s = &result.stats;
            eprintln!(
                "summary: total_input={} survivors={} removed={} groups={} malformed_urls={} rejected_links={}",
                s.total_input,
                s.survivors,
                s.total_removed,
                s.group_count,
                s.malformed_urls,
                rejected.len()
            );

            Ok(())
        }

        Cli::BookmarksValidate { input } => {
            let dto = read_report_file(&input)
                .await
                .with_context(|| format!("reading report JSON: {input}"))?;

            validate_report(&dto).with_context(|| format!("validating report: {input}"))?;

            eprintln!("schema validation passed");
            eprintln!("ok: report validated");
            Ok(())
        }
    }
}

#[derive(Debug, Default)]
struct CleanOptions {
    input: String,
    output: String,
    report: Option<String>,
    config: Option<String>,
    strategy: Option<String>,
    keep: Option<String>,
    threshold: Option<f64>,
    max_title: Option<usize>,
    duplicate_report: bool,
    emit_events: bool,
    dry_run: bool,
}

#[derive(Debug)]
enum Cli {
    BookmarksClean(CleanOptions),
    BookmarksValidate { input: String },
}

impl Cli {
    fn parse(args: &[String]) -> Result<Self> {
        // <bin> bookmarks clean --in <export.html> --out <clean.html> [options]
        // <bin> bookmarks validate --in <report.json>
        if args.len() < 3 || args[1] != "bookmarks" {
            return Err(anyhow!(usage()));
        }

        match args[2].as_str() {
            "clean" => Self::parse_clean(args),
            "validate" => Self::parse_validate(args),
            _ => Err(anyhow!(usage())),
        }
    }

    fn parse_clean(args: &[String]) -> Result<Self> {
        let mut opts = CleanOptions::default();
        let mut input: Option<String> = None;
        let mut output: Option<String> = None;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--in" | "--input" => {
                    i += 1;
                    input = args.get(i).cloned();
                }
                "--out" | "--output" => {
                    i += 1;
                    output = args.get(i).cloned();
                }
                "--report" => {
                    i += 1;
                    opts.report = Some(value_of(args, i, "--report")?);
                }
                "--config" => {
                    i += 1;
                    opts.config = Some(value_of(args, i, "--config")?);
                }
                "--strategy" => {
                    i += 1;
                    opts.strategy = Some(value_of(args, i, "--strategy")?);
                }
                "--keep" => {
                    i += 1;
                    opts.keep = Some(value_of(args, i, "--keep")?);
                }
                "--threshold" => {
                    i += 1;
                    let raw = value_of(args, i, "--threshold")?;
                    let t: f64 = raw
                        .parse()
                        .map_err(|_| anyhow!("--threshold expects a number, got {raw:?}"))?;
                    opts.threshold = Some(t);
                }
                "--max-title" => {
                    i += 1;
                    let raw = value_of(args, i, "--max-title")?;
                    let n: usize = raw
                        .parse()
                        .map_err(|_| anyhow!("--max-title expects a character count, got {raw:?}"))?;
                    opts.max_title = Some(n);
                }
                "--duplicate-report" => opts.duplicate_report = true,
                "--emit-events" => opts.emit_events = true,
                "--dry-run" => opts.dry_run = true,
                "-h" | "--help" => return Err(anyhow!(usage())),
                other => return Err(anyhow!(format!("unknown arg: {other}\n\n{}", usage()))),
            }
            i += 1;
        }

        opts.input = input.ok_or_else(|| anyhow!(format!("missing --in/--input\n\n{}", usage())))?;
        opts.output = if opts.dry_run {
            output.unwrap_or_default()
        } else {
            output.ok_or_else(|| anyhow!(format!("missing --out/--output\n\n{}", usage())))?
        };

        Ok(Cli::BookmarksClean(opts))
    }

    fn parse_validate(args: &[String]) -> Result<Self> {
        let mut input: Option<String> = None;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--in" | "--input" => {
                    i += 1;
                    input = args.get(i).cloned();
                }
                "-h" | "--help" => return Err(anyhow!(usage())),
                other => return Err(anyhow!(format!("unknown arg: {other}\n\n{}", usage()))),
            }
            i += 1;
        }

        let input = input.ok_or_else(|| anyhow!(format!("missing --in/--input\n\n{}", usage())))?;

        Ok(Cli::BookmarksValidate { input })
    }
}

fn value_of(args: &[String], i: usize, flag: &str) -> Result<String> {
    args.get(i)
        .cloned()
        .ok_or_else(|| anyhow!(format!("missing value for {flag}\n\n{}", usage())))
}

/// Defaults, then the config file, then command-line flags.
async fn resolve_config(opts: &CleanOptions) -> Result<DedupConfig> {
    let mut config = DedupConfig::default();

    if let Some(path) = opts.config.as_deref() {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config file: {path}"))?;
        let file: ConfigFile =
            serde_json::from_str(&raw).with_context(|| format!("parsing config file: {path}"))?;
        config
            .apply_file(&file)
            .with_context(|| format!("applying config file: {path}"))?;
    }

    if let Some(s) = opts.strategy.as_deref() {
        config.strategy = s.parse()?;
    }
    if let Some(k) = opts.keep.as_deref() {
        config.keep_strategy = k.parse()?;
    }
    if let Some(t) = opts.threshold {
        config.similarity_threshold = t;
    }
    if let Some(n) = opts.max_title {
        config.max_title_chars = n;
    }
    if opts.duplicate_report {
        config.generate_report = true;
    }
    config.validate()?;
    Ok(config)
}

fn usage() -> &'static str {
    "Usage:\n  bookmarks clean --in/--input <export.html> --out/--output <clean.html> [--report <report.json>] [--config <config.json>] [--strategy url|title|smart|fuzzy] [--keep first|last|shortest|longest] [--threshold <0..1>] [--max-title <chars>] [--duplicate-report] [--emit-events] [--dry-run]\n  bookmarks validate --in/--input <report.json>\n\nEvents:\n  If --emit-events is set, NDJSON events are written to stdout; summary goes to stderr.\n\nSafety:\n  Output and report paths must differ from the input file."
}

fn is_same_file(a: &str, b: &str) -> bool {
    let a = std::fs::canonicalize(a).unwrap_or_else(|_| PathBuf::from(a));
    let b = std::fs::canonicalize(b).unwrap_or_else(|_| PathBuf::from(b));
    a == b
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
