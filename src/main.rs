use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use relgrade::assembly::{self, WeightPolicy, PRESETS};
use relgrade::report;
use relgrade::{summarize_semester, GradeScale, Semester};

#[derive(Parser)]
#[command(name = "relgrade")]
#[command(about = "Predict grades and GPA from performance relative to class averages", long_about = None)]
struct Cli {
    #[command(flatten)]
    scale: ScaleArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ScaleArgs {
    /// JSON grade scale: [{"threshold": 0.2, "letter": "A", "points": 4.0}, ...]
    #[arg(long, global = true, env = "RELGRADE_SCALE")]
    scale: Option<PathBuf>,
    /// Move a grade to a new threshold, e.g. A=25 for +25% above average
    #[arg(long = "threshold", global = true, value_name = "LETTER=PERCENT", value_parser = parse_threshold)]
    thresholds: Vec<(String, f64)>,
}

#[derive(Args)]
struct InputArgs {
    /// Semester document (.json) or component rows (.csv)
    #[arg(long)]
    input: PathBuf,
    /// Override the semester name
    #[arg(long)]
    name: Option<String>,
    #[arg(long, requires = "previous_credits")]
    previous_cgpa: Option<f64>,
    #[arg(long, requires = "previous_cgpa")]
    previous_credits: Option<f64>,
    /// Reject subjects whose weights do not total 100 instead of normalizing
    #[arg(long)]
    strict_weights: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grade scale in effect
    Scale,
    /// List component presets and their slots
    Presets,
    /// Grade a semester and print the results
    Grade {
        #[command(flatten)]
        input: InputArgs,
        /// Also write the summary as JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Write a markdown report for a semester
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn parse_threshold(raw: &str) -> Result<(String, f64), String> {
    let (letter, percent) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected LETTER=PERCENT, got {raw}"))?;
    let percent: f64 = percent
        .trim()
        .parse()
        .map_err(|_| format!("{percent} is not a number"))?;
    Ok((letter.trim().to_string(), percent / 100.0))
}

fn load_scale(args: &ScaleArgs) -> anyhow::Result<GradeScale> {
    let scale = match &args.scale {
        Some(path) => GradeScale::from_json_file(path)?,
        None => GradeScale::default(),
    };
    if args.thresholds.is_empty() {
        return Ok(scale);
    }
    scale
        .retuned(&args.thresholds)
        .context("failed to apply threshold overrides")
}

fn load_semester(args: &InputArgs) -> anyhow::Result<Semester> {
    let mut input = assembly::load_semester_input(&args.input, args.name.as_deref())?;
    if args.previous_cgpa.is_some() {
        input.previous_cgpa = args.previous_cgpa;
        input.previous_credits = args.previous_credits;
    }

    let policy = if args.strict_weights {
        WeightPolicy::Strict
    } else {
        WeightPolicy::Normalize
    };
    let semester = assembly::assemble_semester(&input, policy)
        .with_context(|| format!("invalid semester in {}", args.input.display()))?;
    info!(
        semester = %semester.name,
        subjects = semester.subjects.len(),
        "semester ready for grading"
    );
    Ok(semester)
}

fn write_report(out: &Path, contents: &str) -> anyhow::Result<()> {
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let scale = load_scale(&cli.scale)?;

    match cli.command {
        Commands::Scale => {
            print!("{}", report::render_scale(&scale));
        }
        Commands::Presets => {
            for preset in PRESETS {
                println!("{}:", preset.name);
                for (name, weight) in preset.expand() {
                    println!("- {name} ({weight:.2}%)");
                }
            }
        }
        Commands::Grade { input, export } => {
            let semester = load_semester(&input)?;
            let summary = summarize_semester(&semester, &scale);
            print!("{}", report::render_semester(&summary));

            if let Some(path) = export {
                summary.write_json(&path)?;
                println!("Summary saved to {}.", path.display());
            }
        }
        Commands::Report { input, out } => {
            let semester = load_semester(&input)?;
            let summary = summarize_semester(&semester, &scale);
            let today = chrono::Local::now().date_naive();
            let contents = report::build_report(&summary, &scale, today);
            write_report(&out, &contents)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
