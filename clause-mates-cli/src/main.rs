//! `clause-mates` - extract pronoun/clause-mate relationships from
//! WebAnno-style coreference annotation files.
//!
//! ```bash
//! # One CSV row per relationship, files analyzed independently
//! clause-mates analyze chapter1.tsv chapter2.tsv > relationships.csv
//!
//! # Treat a directory of files as consecutive chapters of one novel
//! clause-mates analyze --chapters --format json book/ -o book.jsonl
//!
//! # Show how a file's columns were recognized
//! clause-mates detect chapter1.tsv --sentences 2
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Args, Parser, Subcommand};

use clause_mates::{ClauseMateError, ClauseMateResult, CorpusReader, SentenceDisplay, TokenOffsets};
use clause_mates_chains::{collect_inputs, AnalysisReport, AnalyzerConfig, Pipeline, RecordSink};

mod output;

use output::{OutputFormat, RecordWriter};

/// Pronoun and clause-mate analysis for coreference-annotated corpora
#[derive(Parser)]
#[command(name = "clause-mates", author, version)]
#[command(propagate_version = true)]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract relationships and write one record per pronoun/clause-mate pair
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),

    /// Print the detected column layout of a file
    #[command(visible_alias = "d")]
    Detect(DetectArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Annotation files, or directories searched for .tsv files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Read the inputs as consecutive chapters of one document
    #[arg(long)]
    chapters: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Write records here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    analyzer: AnalyzerArgs,
}

#[derive(Args)]
struct DetectArgs {
    file: PathBuf,

    /// Also draw the first N sentences with their annotations
    #[arg(long, default_value_t = 0)]
    sentences: usize,

    #[command(flatten)]
    analyzer: AnalyzerArgs,
}

#[derive(Args)]
struct AnalyzerArgs {
    /// TOML configuration; ignored when missing
    #[arg(short, long, default_value = "clause-mates.toml")]
    config: PathBuf,

    /// Skip layout detection and read every file with the standard column map
    #[arg(long)]
    no_adaptive: bool,
}

impl AnalyzerArgs {
    fn load(&self) -> ClauseMateResult<AnalyzerConfig> {
        let config = AnalyzerConfig::load(&self.config)?;
        Ok(if self.no_adaptive {
            config.with_adaptive(false)
        } else {
            config
        })
    }
}

fn init_logger(cli: &Cli) {
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else {
        match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(&cli);

    let result = match cli.command {
        Commands::Analyze(args) => analyze(args, cli.quiet),
        Commands::Detect(args) => detect(args),
    };
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(2),
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns false when some input could not be processed.
fn analyze(args: AnalyzeArgs, quiet: bool) -> ClauseMateResult<bool> {
    let pipeline = Pipeline::new(args.analyzer.load()?);
    let inputs = collect_inputs(&args.inputs)?;
    if inputs.is_empty() {
        log::warn!("no annotation files found");
    }

    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| ClauseMateError::io(path, e))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };
    let mut writer = RecordWriter::new(args.format, out);

    let report = if args.chapters {
        pipeline.run_chapters(&inputs, &mut writer)?
    } else {
        let mut report = pipeline.analyze_independent(&inputs);
        for record in std::mem::take(&mut report.relationships) {
            writer.accept(record)?;
        }
        report
    };
    writer.finish()?;

    if !quiet {
        print_summary(&report);
    }
    Ok(!report.has_failures())
}

fn print_summary(report: &AnalysisReport) {
    for (layout, diagnostics) in report.layouts.iter().zip(&report.diagnostics) {
        eprintln!(
            "{}: {} layout, {}",
            layout.source,
            layout.layout.variant,
            diagnostics.summary()
        );
    }
    for failure in &report.failures {
        eprintln!("{}: failed: {}", failure.source, failure.error);
    }
    eprintln!(
        "{} relationships from {} files, {}",
        report.records,
        report.layouts.len(),
        report.summary()
    );
}

fn detect(args: DetectArgs) -> ClauseMateResult<bool> {
    let config = args.analyzer.load()?;
    let reader = CorpusReader::open(&args.file, &config.schema)?;

    let layout = serde_json::to_string_pretty(reader.layout()).map_err(ClauseMateError::output)?;
    println!("{}", layout);

    if args.sentences > 0 {
        let mut sentences = reader.sentences(TokenOffsets::default());
        for sentence in (&mut sentences).take(args.sentences) {
            println!();
            println!("{} {}", sentence.sentence_id, sentence.text);
            println!(
                "{}",
                SentenceDisplay::new(&sentence).include_pointers().include_roles()
            );
        }
        for diagnostic in sentences.diagnostics().iter() {
            log::info!("{}", diagnostic);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_adaptive_forces_the_standard_map() {
        let command = Cli::command();
        let detect = command.find_subcommand("detect").unwrap();
        let help = detect
            .get_arguments()
            .find(|arg| arg.get_id() == "no_adaptive")
            .and_then(|arg| arg.get_help())
            .unwrap()
            .to_string();
        assert!(help.contains("standard column map"));

        let config = std::env::temp_dir().join("clause-mates-no-such-config.toml");
        let cli = Cli::try_parse_from([
            "clause-mates",
            "detect",
            "a.tsv",
            "--no-adaptive",
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        let args = match cli.command {
            Commands::Detect(args) => args,
            Commands::Analyze(_) => unreachable!(),
        };
        assert!(!args.analyzer.load().unwrap().schema.adaptive);
    }
}
