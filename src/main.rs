//! # echolalia CLI
//!
//! Command-line interface for the echolalia library.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use echolalia::cli::{Args, BatchArgs, Command, ParseArgs};
use echolalia::config::PipelineConfig;
use echolalia::core::Turn;
use echolalia::core::output::Tabular;
use echolalia::format::{OutputFormat, write_to_format};
use echolalia::manifest::Manifest;
use echolalia::parser::Source;
use echolalia::pipeline::{DocumentOutput, process_batch, process_content};
use echolalia::store::FsBlobStore;
use echolalia::{EcholaliaError, ExceptionKind};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("echolalia=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), EcholaliaError> {
    let args = <Args as ClapParser>::parse();
    let format: OutputFormat = args.format.into();
    let out_dir = PathBuf::from(&args.out_dir);
    std::fs::create_dir_all(&out_dir)?;

    println!("🦜 echolalia v{}", env!("CARGO_PKG_VERSION"));
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match &args.command {
        Command::Parse(parse) => run_parse(parse, &out_dir, format),
        Command::Batch(batch) => run_batch(batch, &out_dir, format),
    }
}

fn run_parse(args: &ParseArgs, out_dir: &Path, format: OutputFormat) -> Result<(), EcholaliaError> {
    let source: Source = args.source.into();
    println!("📖 Source:  {}", source);
    println!("📂 Input:   {}", args.input);
    println!("👤 Target:  {}", args.user);
    println!("📄 Format:  {}", format);
    println!();

    let start = Instant::now();
    let content = std::fs::read_to_string(&args.input)?;
    let output = process_content(source, &args.input, &content, &args.user)?;
    let elapsed = start.elapsed();

    let turns_path = write_table(&output.turns, out_dir, "turns", format)?;
    let pairs_path = write_table(&output.pairs, out_dir, "pairs", format)?;
    println!("💾 Turns:   {}", turns_path);
    println!("💾 Pairs:   {}", pairs_path);
    if args.exclusions {
        let excluded_path = write_table(&output.report.excluded, out_dir, "exclusions", format)?;
        println!("💾 Excluded rows: {}", excluded_path);
    }

    println!();
    print_document_summary(&output);
    println!();
    println!("⚡ Parsed in {:.2}s", elapsed.as_secs_f64());
    Ok(())
}

fn run_batch(args: &BatchArgs, out_dir: &Path, format: OutputFormat) -> Result<(), EcholaliaError> {
    let store = FsBlobStore::new(&args.store);
    let config = PipelineConfig::new()
        .with_bucket(args.bucket.clone())
        .with_max_attempts(args.max_attempts)
        .with_parallel(!args.sequential);

    let manifest_path = Path::new(&args.manifest);
    let manifest = if manifest_path.is_file() {
        Manifest::from_path(manifest_path)?
    } else {
        Manifest::from_store(&store, &config.bucket, &args.manifest, config.max_attempts)?
    };

    println!("📋 Manifest: {} ({} sources)", args.manifest, manifest.sources.len());
    println!("🪣 Bucket:   {}", manifest.bucket_or(&config.bucket));
    println!("📄 Format:   {}", format);
    println!();

    let start = Instant::now();
    let report = process_batch(&store, &manifest, &config);
    let elapsed = start.elapsed();

    for (i, result) in report.results.iter().enumerate() {
        match &result.outcome {
            Ok(output) => {
                let path = write_table(&output.turns, out_dir, &format!("turns_{}", i + 1), format)?;
                println!("✅ {} ({}) → {}", result.entry.logfile, output.source, path);
                print_document_summary(output);
            }
            Err(e) => println!("❌ {}: {}", result.entry.logfile, e),
        }
    }

    let pairs = report.all_pairs();
    let pairs_path = write_table(&pairs, out_dir, "pairs", format)?;

    println!();
    println!("📊 Summary:");
    println!("   Documents: {} ok, {} failed", report.succeeded().count(), report.failed().count());
    println!("   Pairs:     {} → {}", pairs.len(), pairs_path);
    println!("   Time:      {:.2}s", elapsed.as_secs_f64());

    if report.succeeded().next().is_none() && !report.results.is_empty() {
        return Err(EcholaliaError::malformed(
            args.manifest.clone(),
            "every document in the batch failed",
        ));
    }
    Ok(())
}

fn write_table<T: Tabular>(
    rows: &[T],
    out_dir: &Path,
    stem: &str,
    format: OutputFormat,
) -> Result<String, EcholaliaError> {
    let path = out_dir.join(format.file_name(stem)).to_string_lossy().into_owned();
    write_to_format(rows, &path, format)?;
    Ok(path)
}

fn print_document_summary(output: &DocumentOutput) {
    let report = &output.report;
    println!("   Rows:      {} used, {} excluded", report.used, report.excluded.len());
    for reason in ExceptionKind::all() {
        let count = report.count(*reason);
        if count > 0 {
            println!("     {}: {}", reason, count);
        }
    }
    println!("   Turns:     {}", output.turns.len());

    // Median of the per-turn medians, over turns with more than one message
    let mut paces: Vec<_> = output
        .turns
        .iter()
        .filter(|t| t.message_count > 1)
        .map(Turn::median_interval)
        .collect();
    paces.sort_unstable();
    if let Some(pace) = paces.get(paces.len() / 2) {
        println!("   Pace:      {}s between messages of a turn", pace.num_seconds());
    }

    println!("   Pairs:     {}", output.pairs.len());
}
