use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use segmerge::{
    init_console_logging, init_logging, merge_segments, parse_transcript_file, run_merge,
    AnomalyKind, CliOverrides, LogReporter, MergerConfig, MergerError, StatusReporter,
};

#[derive(Parser)]
#[command(name = "segmerge")]
#[command(author, version, about = "Collapse consecutive same-speaker utterances into paragraphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge same-speaker runs in a diarized transcript
    Merge {
        /// Input transcript file
        #[arg(short, long)]
        transcript: PathBuf,

        /// Alternative YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the merged transcript
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// File name for the merged transcript
        #[arg(long)]
        output_file: Option<String>,

        /// Whether to write a logfile
        #[arg(long)]
        enable_logfile: Option<bool>,

        /// Directory for the logfile
        #[arg(long)]
        logfile_dir: Option<PathBuf>,

        /// File name for the logfile
        #[arg(long)]
        logfile_name: Option<String>,

        /// Write a JSON merge report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Inspect a transcript without writing anything
    Analyze {
        /// Input transcript file
        #[arg(short, long)]
        transcript: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            transcript,
            config,
            output_dir,
            output_file,
            enable_logfile,
            logfile_dir,
            logfile_name,
            report,
            verbose,
        } => {
            let overrides = CliOverrides {
                config,
                output_dir,
                output_file,
                enable_logfile,
                logfile_dir,
                logfile_name,
            };
            let (config, warnings) = match MergerConfig::resolve(transcript, overrides) {
                Ok(resolved) => resolved,
                Err(error) => return fail_before_logging(&error),
            };
            if let Err(error) = init_logging(&config, verbose) {
                return fail_before_logging(&error);
            }

            let mut reporter = LogReporter::new();
            for warning in &warnings {
                reporter.warning(warning);
            }
            if let Err(error) = run_merge(&config, report.as_deref(), &mut reporter) {
                reporter.fatal(&error);
            }
            ExitCode::from(reporter.exit_status().code())
        }

        Commands::Analyze {
            transcript,
            verbose,
        } => {
            init_console_logging(verbose);
            match analyze_transcript(&transcript) {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => {
                    let mut reporter = LogReporter::new();
                    reporter.fatal(&error);
                    ExitCode::from(reporter.exit_status().code())
                }
            }
        }
    }
}

/// Failures during configuration or logging setup happen before the
/// subscriber exists, so they go straight to stderr.
fn fail_before_logging(error: &MergerError) -> ExitCode {
    eprintln!("segmerge: {error}");
    ExitCode::from(error.exit_status().code())
}

fn analyze_transcript(path: &Path) -> Result<(), MergerError> {
    let parsed = parse_transcript_file(path)?;
    let outcome = merge_segments(&parsed.segments);

    println!("Transcript Analysis");
    println!("===================");
    println!("Segments: {}", parsed.segments.len());
    println!("Paragraphs after merge: {}", outcome.paragraphs.len());

    let mut speakers: Vec<&str> = parsed
        .segments
        .iter()
        .filter(|s| !s.is_unattributed())
        .map(|s| s.speaker_id.as_str())
        .collect();
    speakers.sort();
    speakers.dedup();
    println!("Speakers: {}", speakers.len());
    println!();

    println!("Speaker Statistics");
    println!("------------------");
    for speaker in &speakers {
        let segment_count = parsed
            .segments
            .iter()
            .filter(|s| s.speaker_id == *speaker)
            .count();
        let paragraph_count = outcome
            .paragraphs
            .iter()
            .filter(|p| p.speaker_id == *speaker)
            .count();
        let speaking_time: f64 = parsed
            .segments
            .iter()
            .filter(|s| s.speaker_id == *speaker)
            .map(|s| s.duration())
            .sum();
        let avg_paragraph = if paragraph_count > 0 {
            outcome
                .paragraphs
                .iter()
                .filter(|p| p.speaker_id == *speaker)
                .map(|p| p.duration())
                .sum::<f64>()
                / paragraph_count as f64
        } else {
            0.0
        };
        println!(
            "{}: {} segments, {} paragraphs, {:.1}s speaking time, avg paragraph {:.1}s",
            speaker, segment_count, paragraph_count, speaking_time, avg_paragraph
        );
    }
    println!();

    println!("Anomalies");
    println!("---------");
    let mut malformed = 0;
    let mut missing_speaker = 0;
    let mut invalid_timestamp = 0;
    let mut negative_span = 0;
    let mut regression = 0;
    for anomaly in parsed.anomalies.iter().chain(&outcome.anomalies) {
        match anomaly.kind {
            AnomalyKind::MalformedLine => malformed += 1,
            AnomalyKind::MissingSpeaker => missing_speaker += 1,
            AnomalyKind::InvalidTimestamp => invalid_timestamp += 1,
            AnomalyKind::NegativeSpan => negative_span += 1,
            AnomalyKind::TimestampRegression => regression += 1,
        }
    }
    println!("Malformed lines: {malformed}");
    println!("Missing speakers: {missing_speaker}");
    println!("Invalid timestamps: {invalid_timestamp}");
    println!("Negative spans: {negative_span}");
    println!("Timestamp regressions: {regression}");

    Ok(())
}
