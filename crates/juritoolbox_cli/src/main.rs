//! Console presentation layer.
//!
//! # Responsibility
//! - Parse command-line input into core requests.
//! - Render core results as plain-text tables.
//!
//! # Invariants
//! - No calculation rule lives here; everything delegates to `juritoolbox_core`.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use juritoolbox_core::{
    assess_anpp, default_log_level, estimate_sentence, format_display_date, init_logging,
    init_stderr_logging, Aggravator, AnppInput, CalculatorConfig, CountingMode,
    DeadlineInput, DeadlineReport, DeadlineService, DosimetryInput, HolidayImport, Reducer,
    DISCLAIMER,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "juritoolbox")]
#[command(version)]
#[command(about = "Educational legal calculators: deadlines, ANPP eligibility, sentencing", long_about = None)]
struct Cli {
    /// Absolute directory for rolling log files (stderr when omitted)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<String>,
    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a procedural deadline and print its timeline
    Deadline(DeadlineArgs),
    /// Check ANPP eligibility (art. 28-A CPP)
    Anpp(AnppArgs),
    /// Estimate a simplified sentence (art. 59 CP)
    Dosimetry(DosimetryArgs),
}

#[derive(Args)]
struct DeadlineArgs {
    /// Start date (YYYY-MM-DD or DD/MM/YYYY); never counted itself
    start: String,
    /// Number of days to add
    #[arg(allow_negative_numbers = true)]
    amount: i64,
    /// Counting mode
    #[arg(long, value_enum, default_value_t = ModeArg::Business)]
    mode: ModeArg,
    /// Calendar mode: move a weekend/holiday end date to the next business day
    #[arg(long)]
    postpone: bool,
    /// CSV file with one holiday date per row
    #[arg(long, value_name = "FILE")]
    holidays: Option<PathBuf>,
    /// Longest run of non-business days tolerated while scanning
    #[arg(long, value_name = "N")]
    max_scan_days: Option<u32>,
    /// Largest accepted day amount
    #[arg(long, value_name = "N")]
    max_amount: Option<u32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Business,
    Calendar,
}

impl From<ModeArg> for CountingMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Business => CountingMode::BusinessDays,
            ModeArg::Calendar => CountingMode::CalendarDays,
        }
    }
}

#[derive(Args)]
struct AnppArgs {
    /// Minimum statutory penalty in years
    #[arg(long, default_value_t = 1.0)]
    min_penalty: f64,
    /// Violence or serious threat occurred
    #[arg(long)]
    violence: bool,
    /// No formal/circumstantial confession
    #[arg(long)]
    no_confession: bool,
    /// Specific recidivism in an intentional crime
    #[arg(long)]
    recidivist: bool,
    /// Habitual or professional offender
    #[arg(long)]
    habitual: bool,
    /// Heinous/equivalent crime or serious domestic violence
    #[arg(long)]
    heinous: bool,
}

#[derive(Args)]
struct DosimetryArgs {
    /// Minimum statutory penalty in years
    #[arg(long, default_value_t = 1.0)]
    min: f64,
    /// Maximum statutory penalty in years
    #[arg(long, default_value_t = 5.0)]
    max: f64,
    /// Eight comma-separated circumstance scores (-1, 0 or 1)
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    scores: Option<Vec<i8>>,
    /// Penalty reducer (repeatable)
    #[arg(long = "reducer", value_enum)]
    reducers: Vec<ReducerArg>,
    /// Penalty aggravator (repeatable)
    #[arg(long = "aggravator", value_enum)]
    aggravators: Vec<AggravatorArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReducerArg {
    Confession,
    Attempt,
    Minority,
    MinorParticipation,
}

impl From<ReducerArg> for Reducer {
    fn from(value: ReducerArg) -> Self {
        match value {
            ReducerArg::Confession => Reducer::SpontaneousConfession,
            ReducerArg::Attempt => Reducer::Attempt,
            ReducerArg::Minority => Reducer::RelativeMinority,
            ReducerArg::MinorParticipation => Reducer::MinorParticipation,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AggravatorArg {
    Concert,
    Weapon,
    FutileMotive,
    VulnerableVictim,
}

impl From<AggravatorArg> for Aggravator {
    fn from(value: AggravatorArg) -> Self {
        match value {
            AggravatorArg::Concert => Aggravator::ConcertOfAgents,
            AggravatorArg::Weapon => Aggravator::WeaponUse,
            AggravatorArg::FutileMotive => Aggravator::FutileOrBaseMotive,
            AggravatorArg::VulnerableVictim => Aggravator::VulnerableVictim,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_dir.as_deref(), cli.log_level.as_deref())?;

    match cli.command {
        Commands::Deadline(args) => cmd_deadline(args)?,
        Commands::Anpp(args) => cmd_anpp(&args)?,
        Commands::Dosimetry(args) => cmd_dosimetry(args)?,
    }

    println!();
    println!("{DISCLAIMER}");
    Ok(())
}

fn setup_logging(log_dir: Option<&str>, level: Option<&str>) -> Result<()> {
    let level = effective_log_level(level);
    match log_dir {
        Some(dir) => init_logging(level, dir),
        None => init_stderr_logging(level),
    }
    .map_err(|err| anyhow!(err))
    .context("Failed to initialize logging")
}

/// Same default for file and stderr targets.
fn effective_log_level(level: Option<&str>) -> &str {
    level.unwrap_or_else(|| default_log_level())
}

fn cmd_deadline(args: DeadlineArgs) -> Result<()> {
    let mut config = CalculatorConfig::from_env();
    if let Some(limit) = args.max_scan_days {
        config.max_scan_days = limit.max(1);
    }
    if let Some(limit) = args.max_amount {
        config.max_amount = limit.max(1);
    }

    let input = DeadlineInput {
        start: args.start,
        amount: args.amount,
        mode: args.mode.into(),
        postpone_if_non_business: args.postpone,
        holidays_csv: None,
    };
    let holidays = match &args.holidays {
        Some(path) => HolidayImport::from_path(path),
        None => HolidayImport::empty(),
    };

    let report = DeadlineService::new(&config)
        .calculate_with_import(&input, holidays)
        .context("Deadline calculation failed")?;
    print_deadline_report(&report);
    Ok(())
}

fn print_deadline_report(report: &DeadlineReport) {
    if let Some(warning) = &report.holiday_warning {
        eprintln!("warning: {warning}");
    }
    if report.dropped_holiday_rows > 0 {
        eprintln!(
            "warning: {} holiday row(s) ignored (no recognizable date)",
            report.dropped_holiday_rows
        );
    }

    let result = &report.result;
    println!("Prazo final: {}", result.formatted_end_date());
    println!(
        "Feriados considerados: {} | dias úteis no período: {}",
        report.holidays_loaded,
        result.business_day_count()
    );
    println!();
    println!("{:<12} {:<14} {:<9} {:<7}", "Data", "Dia", "Útil", "Feriado");
    for entry in &result.timeline {
        println!(
            "{:<12} {:<14} {:<9} {:<7}",
            format_display_date(entry.date),
            entry.weekday_name,
            yes_no(entry.is_business_day),
            yes_no(entry.is_holiday)
        );
    }
}

fn cmd_anpp(args: &AnppArgs) -> Result<()> {
    let input = AnppInput {
        minimum_penalty_years: args.min_penalty,
        violence_or_serious_threat: args.violence,
        formal_confession: !args.no_confession,
        specific_recidivism: args.recidivist,
        habitual_offender: args.habitual,
        heinous_or_domestic_violence: args.heinous,
    };
    let assessment = assess_anpp(&input).context("Invalid ANPP input")?;

    if assessment.eligible {
        println!("Elegível, em tese, ao ANPP (art. 28-A CPP).");
        println!(
            "Justificativa: pena mínima inferior a 4 anos, sem violência ou grave ameaça, \
             com confissão e sem impedimentos legais aparentes."
        );
    } else {
        println!("Não elegível, em tese, ao ANPP (art. 28-A CPP).");
        println!("Motivos:");
        for line in assessment.reason_lines() {
            println!("- {line}");
        }
    }
    Ok(())
}

fn cmd_dosimetry(args: DosimetryArgs) -> Result<()> {
    let mut input = DosimetryInput::neutral(args.min, args.max);
    if let Some(scores) = args.scores {
        input.circumstances = scores
            .try_into()
            .map_err(|scores: Vec<i8>| anyhow!("Expected 8 scores, got {}", scores.len()))?;
    }
    input.reducers = args.reducers.into_iter().map(Reducer::from).collect();
    input.aggravators = args.aggravators.into_iter().map(Aggravator::from).collect();

    let result = estimate_sentence(&input).context("Invalid sentencing input")?;
    println!("Pena-base (média): {:.2} anos", result.base_years);
    println!("Pena após art. 59: {:.2} anos", result.phase_one_years);
    println!("Pena provisória: {:.2} anos", result.final_years);
    println!();
    for line in &result.rationale {
        println!("{line}");
    }
    println!();
    println!("{}", result.draft);
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "sim"
    } else {
        "não"
    }
}

#[cfg(test)]
mod tests {
    use super::{effective_log_level, Cli};
    use clap::Parser;
    use juritoolbox_core::default_log_level;

    #[test]
    fn log_level_defaults_to_build_default_for_every_target() {
        let console = Cli::try_parse_from(["juritoolbox", "anpp"]).expect("args should parse");
        assert!(console.log_dir.is_none());
        assert_eq!(
            effective_log_level(console.log_level.as_deref()),
            default_log_level()
        );

        let file = Cli::try_parse_from(["juritoolbox", "--log-dir", "/tmp/jt", "anpp"])
            .expect("args should parse");
        assert_eq!(
            effective_log_level(file.log_level.as_deref()),
            default_log_level()
        );
    }

    #[test]
    fn explicit_log_level_wins() {
        let cli = Cli::try_parse_from(["juritoolbox", "--log-level", "error", "anpp"])
            .expect("args should parse");
        assert_eq!(effective_log_level(cli.log_level.as_deref()), "error");
    }
}
