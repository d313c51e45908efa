use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use enzian_core::{
    advisories, assemble_narrative, check_ready, generate_code, suggest_compartment_tier,
    suggest_ovary_tier, validate, ClinicalAlerts, CompartmentATier, CompartmentBTier,
    CompartmentCTier, CompartmentKind, Consistency, Grade, Report, ReportConfig, Tier,
};
use enzian_report::{load_record, render_markdown, ReportDocument};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "enzian")]
#[command(about = "#Enzian pelvic ultrasound classification CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the #Enzian code of a finding record
    Code {
        /// Record file (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// Print capture advisories (tier mismatches, rectal distance, ureteral dilation)
    Validate {
        /// Record file (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// Print clinical alerts
    Alerts {
        /// Record file (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// Print the detailed findings narrative
    Narrative {
        /// Record file (.yaml, .yml or .json)
        file: PathBuf,
    },
    /// Render the full Markdown report
    Report {
        /// Record file (.yaml, .yml or .json)
        file: PathBuf,
        /// Output file, or a directory to write the suggested file name into
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Suggest a tier for a measured size
    Suggest {
        kind: MeasureTarget,
        /// Size in centimetres (0 means not measured)
        magnitude: f64,
    },
    /// Check a selected compartment grade against a measured size
    Check {
        kind: CompartmentArg,
        /// Size in centimetres (0 means not measured)
        magnitude: f64,
        /// Selected grade (1 to 3)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
        tier: u8,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MeasureTarget {
    Ovary,
    A,
    B,
    C,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompartmentArg {
    A,
    B,
    C,
}

impl From<CompartmentArg> for CompartmentKind {
    fn from(arg: CompartmentArg) -> Self {
        match arg {
            CompartmentArg::A => CompartmentKind::A,
            CompartmentArg::B => CompartmentKind::B,
            CompartmentArg::C => CompartmentKind::C,
        }
    }
}

/// Log directive used when `RUST_LOG` is unset.
const DEFAULT_LOG_DIRECTIVE: &str = "enzian=info";

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_DIRECTIVE)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = report_config_from_env()?;
    let mut stdout = std::io::stdout().lock();
    run(cli.command, &config, &mut stdout)
}

fn report_config_from_env() -> anyhow::Result<ReportConfig> {
    ReportConfig::from_env_values(
        std::env::var("ENZIAN_REPORT_TITLE").ok(),
        std::env::var("ENZIAN_REPORT_SUBTITLE").ok(),
        std::env::var("ENZIAN_SIGNATURE_LABEL").ok(),
        std::env::var("ENZIAN_INCLUDE_RECOMMENDATIONS").ok(),
    )
    .context("invalid report configuration")
}

fn run(
    command: Option<Commands>,
    config: &ReportConfig,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Some(Commands::Code { file }) => {
            let record = load_record(&file)?;
            writeln!(out, "{}", generate_code(&record))?;
        }
        Some(Commands::Validate { file }) => {
            let record = load_record(&file)?;
            let found = advisories(&record);
            if found.is_empty() {
                writeln!(out, "No advisories.")?;
            }
            for advisory in found {
                writeln!(out, "- {advisory}")?;
            }
        }
        Some(Commands::Alerts { file }) => {
            let record = load_record(&file)?;
            let alerts = ClinicalAlerts::derive(&record);
            if alerts.is_empty() {
                writeln!(out, "No critical alerts.")?;
            }
            for message in alerts.messages() {
                writeln!(out, "- {message}")?;
            }
        }
        Some(Commands::Narrative { file }) => {
            let record = load_record(&file)?;
            for section in assemble_narrative(&record) {
                let heading = section.region.heading();
                match section.title {
                    Some(title) => writeln!(out, "[{heading}] {title}: {}", section.text)?,
                    None => writeln!(out, "[{heading}] {}", section.text)?,
                }
            }
        }
        Some(Commands::Report { file, out: target }) => {
            let record = load_record(&file)?;
            check_ready(&record)?;
            let document = ReportDocument::new(Report::compose(&record, config));
            let markdown = render_markdown(&document)?;

            match target {
                Some(target) => {
                    let path = report_path(&target, &document);
                    std::fs::write(&path, markdown)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    writeln!(out, "Wrote report to {}", path.display())?;
                }
                None => out.write_all(markdown.as_bytes())?,
            }
        }
        Some(Commands::Suggest { kind, magnitude }) => {
            let suggestion = match kind {
                MeasureTarget::Ovary => suggest_ovary_tier(magnitude).map(Tier::label),
                MeasureTarget::A => {
                    suggest_compartment_tier::<CompartmentATier>(magnitude).map(Tier::label)
                }
                MeasureTarget::B => {
                    suggest_compartment_tier::<CompartmentBTier>(magnitude).map(Tier::label)
                }
                MeasureTarget::C => {
                    suggest_compartment_tier::<CompartmentCTier>(magnitude).map(Tier::label)
                }
            };
            match suggestion {
                Some(label) => writeln!(out, "Suggested classification: {label}")?,
                None => writeln!(out, "Not measured.")?,
            }
        }
        Some(Commands::Check { kind, magnitude, tier }) => {
            let kind = CompartmentKind::from(kind);
            let selected = grade_from_digit(tier)?;
            match validate(kind, magnitude, selected) {
                Consistency::Ok => writeln!(out, "Consistent.")?,
                Consistency::Mismatch { expected, selected } => {
                    let letter = kind.letter();
                    writeln!(
                        out,
                        "Inconsistent: {magnitude} cm suggests {letter}{expected}, \
                         but {letter}{selected} was selected."
                    )?;
                }
            }
        }
        None => {
            writeln!(out, "Use 'enzian --help' for commands")?;
        }
    }

    Ok(())
}

fn grade_from_digit(digit: u8) -> anyhow::Result<Grade> {
    match digit {
        1 => Ok(Grade::One),
        2 => Ok(Grade::Two),
        3 => Ok(Grade::Three),
        other => anyhow::bail!("grade must be 1, 2 or 3, got {other}"),
    }
}

/// A directory target receives the suggested file name.
fn report_path(target: &Path, document: &ReportDocument) -> PathBuf {
    if target.is_dir() {
        target.join(document.file_name())
    } else {
        target.to_path_buf()
    }
}
