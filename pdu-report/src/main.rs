use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdu_core::domain::DeviceStatistics;
use pdu_report::{
    config::{AppConfig, MonthlyConfig},
    observability,
    pipeline::{Pipeline, PipelineError, Source},
    report::{BaseGrid, FilledReport, SectionFill, StatsCsvSource},
    sinks::{CsvFileSink, JsonFileSink},
    sources::open_rows,
    transform::MeasurementAggregator,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdu-report")]
#[command(about = "Summarise PDU current exports and merge them into the monthly report", long_about = None)]
struct Cli {
    /// TOML configuration file with default paths and mode
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Reduce a device export (A1.xlsx) to its statistics file (total_a1.csv)
    Stats {
        /// Device export workbook or CSV
        input: PathBuf,

        /// Statistics output (default: total_<input>.csv next to the input)
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = StatsFormat::Csv)]
        format: StatsFormat,
    },

    /// Merge a statistics file into the monthly report
    Fill {
        /// Statistics file; the PDU name is taken from its file name (total_a1.csv -> A1)
        stats: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Reduce a device export and merge it into the monthly report in one run
    Process {
        /// Device export workbook or CSV
        input: PathBuf,

        #[command(flatten)]
        report: ReportArgs,

        /// Also write the intermediate statistics CSV here
        #[arg(long, value_name = "FILE")]
        stats_out: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
enum StatsFormat {
    Csv,
    Json,
}

#[derive(Args)]
struct ReportArgs {
    /// Monthly template workbook
    #[arg(short, long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Filled report output (CSV)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Start from the clean template, dropping previously filled sections
    #[arg(short, long, conflicts_with = "preserve")]
    clean: bool,

    /// Start from the existing output when there is one
    #[arg(short, long)]
    preserve: bool,
}

struct ReportTarget {
    template: PathBuf,
    output: PathBuf,
    preserve_existing: bool,
}

impl ReportArgs {
    fn resolve(self, defaults: &MonthlyConfig) -> ReportTarget {
        let preserve_existing = if self.clean {
            false
        } else if self.preserve {
            true
        } else {
            defaults.preserve_existing
        };
        ReportTarget {
            template: self.template.unwrap_or_else(|| defaults.template.clone()),
            output: self.output.unwrap_or_else(|| defaults.output.clone()),
            preserve_existing,
        }
    }
}

fn ensure_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        return Err(PipelineError::Load(format!("{what} {} not found", path.display())).into());
    }
    Ok(())
}

fn run_stats(
    cfg: &AppConfig,
    input: PathBuf,
    output: Option<PathBuf>,
    format: StatsFormat,
) -> Result<()> {
    ensure_exists(&input, "device export")?;

    let output = output.unwrap_or_else(|| {
        let path = cfg.default_stats_path(&input);
        match format {
            StatsFormat::Csv => path,
            StatsFormat::Json => path.with_extension("json"),
        }
    });

    let source = open_rows(&input);
    let stats: DeviceStatistics = match format {
        StatsFormat::Csv => Pipeline {
            source,
            transform: MeasurementAggregator,
            sink: CsvFileSink::new(&output),
        }
        .run(),
        StatsFormat::Json => Pipeline {
            source,
            transform: MeasurementAggregator,
            sink: JsonFileSink::new(&output),
        }
        .run(),
    }
    .with_context(|| format!("processing device export {}", input.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        device = %stats.device_name,
        "processing completed"
    );
    Ok(())
}

fn merge_into_report(statistics: DeviceStatistics, target: &ReportTarget) -> Result<FilledReport> {
    ensure_exists(&target.template, "monthly template")?;

    let device = statistics.device_name.clone();
    let base = BaseGrid::choose(&target.template, &target.output, target.preserve_existing);
    let filled: FilledReport = Pipeline {
        source: base,
        transform: SectionFill::new(statistics),
        sink: CsvFileSink::new(&target.output),
    }
    .run()
    .with_context(|| format!("updating monthly report with PDU {device}"))?;

    let mode = if target.preserve_existing {
        "preserve existing data"
    } else {
        "clean template (previous data erased)"
    };
    tracing::info!(
        device = %device,
        template = %target.template.display(),
        output = %target.output.display(),
        rows = filled.grid.len(),
        mode,
        overwrote_existing = filled.outcome.overwrote_existing,
        digest = %filled.grid.digest(),
        "monthly report written"
    );
    Ok(filled)
}

fn run_fill(cfg: &AppConfig, stats: PathBuf, report: ReportArgs) -> Result<()> {
    let target = report.resolve(&cfg.monthly);
    ensure_exists(&stats, "PDU data file")?;

    let statistics = StatsCsvSource::new(&stats)
        .load()
        .with_context(|| format!("loading PDU data {}", stats.display()))?;
    merge_into_report(statistics, &target)?;
    Ok(())
}

fn run_process(
    cfg: &AppConfig,
    input: PathBuf,
    report: ReportArgs,
    stats_out: Option<PathBuf>,
) -> Result<()> {
    let target = report.resolve(&cfg.monthly);
    ensure_exists(&input, "device export")?;

    let statistics: DeviceStatistics = Pipeline {
        source: open_rows(&input),
        transform: MeasurementAggregator,
        sink: stats_out.as_ref().map(CsvFileSink::new),
    }
    .run()
    .with_context(|| format!("processing device export {}", input.display()))?;

    if statistics.device_name.is_empty() {
        bail!(
            "device export {} names no PDU in its header",
            input.display()
        );
    }

    merge_into_report(statistics, &target)?;
    Ok(())
}

fn main() -> Result<()> {
    observability::init_tracing();

    let cli = Cli::parse();
    let cfg = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Stats {
            input,
            output,
            format,
        } => run_stats(&cfg, input, output, format),
        Command::Fill { stats, report } => run_fill(&cfg, stats, report),
        Command::Process {
            input,
            report,
            stats_out,
        } => run_process(&cfg, input, report, stats_out),
    }
}
