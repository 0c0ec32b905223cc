use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use job_priority::config::PriorityConfig;
use job_priority::inspect::{check_capability_table, check_jobs_table, date_range};
use job_priority::loader::{self, RawTable};
use job_priority::pipeline::{self, RunInputs};
use job_priority::timestamp::parse_due;

#[derive(Parser, Debug)]
#[command(name = "job-priority")]
#[command(version)]
#[command(about = "Prioritize crew jobs by category, due date and internal capability")]
#[command(propagate_version = true)]
struct Args {
    /// TOML configuration file (categories, column names, output options)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worksheet holding the capability table when it is a workbook
    #[arg(long, global = true)]
    capability_sheet: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Rank jobs and write the prioritized report
    Run(RunArgs),

    /// Check input files for missing columns and unparsable dates
    Validate(ValidateArgs),

    /// Show the due-date spread of a jobs file
    DateRange {
        /// Jobs file (.csv or workbook)
        #[arg(long)]
        jobs: PathBuf,
    },
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Jobs file (.csv, or a workbook with the `excel` feature)
    #[arg(long)]
    jobs: PathBuf,

    /// Crew capability file (.csv, or a workbook with the `excel` feature)
    #[arg(long)]
    capability: PathBuf,

    /// LGA to Area mapping file
    #[arg(long)]
    lga_map: Option<PathBuf>,

    /// Keep jobs due on or after this date (e.g. 06/11/2025)
    #[arg(long)]
    reference_date: String,

    /// Output CSV file
    #[arg(long, default_value = "prioritized_jobs.csv")]
    output: PathBuf,

    /// Skip writing the summary file
    #[arg(long)]
    no_summary: bool,

    /// Number of top-priority jobs to print
    #[arg(long, default_value = "10")]
    top: usize,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Jobs file (.csv or workbook)
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Crew capability file (.csv or workbook)
    #[arg(long)]
    capability: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = dispatch(args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn dispatch(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => PriorityConfig::from_file(path)?,
        None => PriorityConfig::default(),
    };
    if let Some(sheet) = args.capability_sheet {
        config.capability_columns.sheet = sheet;
    }

    match args.command {
        Commands::Run(run) => run_command(run, config),
        Commands::Validate(validate) => validate_command(validate, &config),
        Commands::DateRange { jobs } => date_range_command(jobs, &config),
    }
}

fn run_command(args: RunArgs, config: PriorityConfig) -> Result<(), Box<dyn std::error::Error>> {
    let config = if args.no_summary {
        config.with_include_summary(false)
    } else {
        config
    };
    let inputs = RunInputs {
        jobs: args.jobs,
        capability: args.capability,
        area_map: args.lga_map,
        reference: parse_due(&args.reference_date)?,
        output: args.output,
    };

    let report = pipeline::run(&inputs, &config)?;

    println!("Priority summary:");
    println!("  {:>8}  {:>9}  Job Types", "Priority", "Job Count");
    for group in &report.groups {
        println!(
            "  {:>8}  {:>9}  {}",
            group.priority,
            group.job_count,
            group.job_types_label()
        );
    }

    println!();
    println!("Top {} priority jobs:", args.top);
    for row in report.rows.iter().take(args.top) {
        println!(
            "  {:>4}  {:<12} {:<10} {:<22} cannot_do={} check={}",
            row.priority, row.job_id, row.job_type, row.due, row.cannot_do, row.needs_check
        );
    }

    println!();
    println!("Output saved to: {}", inputs.output.display());
    if let Some(path) = &report.summary_path {
        println!("Summary saved to: {}", path.display());
    }
    Ok(())
}

fn validate_command(
    args: ValidateArgs,
    config: &PriorityConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if args.jobs.is_none() && args.capability.is_none() {
        return Err("nothing to validate: pass --jobs and/or --capability".into());
    }

    let mut ok = true;

    if let Some(path) = &args.jobs {
        let table = RawTable::load(path, None)?;
        let check = check_jobs_table(&table, &config.columns);

        println!("Jobs file: {}", path.display());
        println!("  Rows: {}", check.rows);
        println!("  Columns: {:?}", check.headers);
        if check.missing_columns.is_empty() {
            println!("  All required columns present");
        } else {
            println!("  MISSING REQUIRED COLUMNS: {:?}", check.missing_columns);
        }
        println!("  Job types: {:?}", check.job_types);
        println!("  Due dates (first {}):", check.due_samples.len());
        for (i, sample) in check.due_samples.iter().enumerate() {
            let status = if sample.parsed.is_some() { "OK" } else { "ERROR" };
            println!("    {}. {} -> {status}", i + 1, sample.raw);
        }
        for (column, blanks) in &check.blank_cells {
            println!("  Blank cells in {column}: {blanks}");
        }
        ok &= check.is_ok();
    }

    if let Some(path) = &args.capability {
        let table = RawTable::load(path, Some(&config.capability_columns.sheet))?;
        let check = check_capability_table(&table, &config.capability_columns);

        println!("Capability file: {}", path.display());
        println!("  Rows: {}", check.rows);
        println!("  Columns: {:?}", check.headers);
        if check.missing_columns.is_empty() {
            println!("  All required columns present");
        } else {
            println!("  MISSING REQUIRED COLUMNS: {:?}", check.missing_columns);
        }
        println!("  Cannot-do values (blank/NONE): {}", check.cannot_do_values);
        println!("  Conditional values (< or >): {}", check.conditional_values);
        for sample in &check.samples {
            println!("    - {sample}");
        }
        ok &= check.is_ok();
    }

    if ok {
        println!("Validation complete");
        Ok(())
    } else {
        Err("validation found problems".into())
    }
}

fn date_range_command(
    jobs: PathBuf,
    config: &PriorityConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let jobs = loader::load_jobs(&jobs, &config.columns)?;
    let Some(range) = date_range(&jobs) else {
        println!("No due dates found");
        return Ok(());
    };

    println!("Earliest due date: {}", range.earliest);
    println!("Latest due date: {}", range.latest);
    println!("Date range: {} days", range.span_days);
    println!("Jobs by month:");
    for ((year, month), count) in &range.per_month {
        println!("  {year}-{month:02}: {count} jobs");
    }
    Ok(())
}
