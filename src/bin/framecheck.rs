use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use framecheck::{
    CpuBackend, CpuBackendOpts, Dpi, HarnessOpts, PixelFormat, Scenario, ScenarioCase,
    ScenarioRunner, Tolerance,
};

#[derive(Parser, Debug)]
#[command(name = "framecheck", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the scenario table with output and reference paths.
    List(ListArgs),
    /// Render scenarios and compare them against their references.
    Run(RunArgs),
    /// Compare two image files.
    Compare(CompareArgs),
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Directory holding outputs and references (default: $FRAMECHECK_OUTPUT_DIR or target/framecheck/Media/Bitmap).
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Only run this scenario.
    #[arg(long, value_parser = parse_scenario)]
    scenario: Option<Scenario>,

    /// Only run this pixel format (Rgba8888, Bgra8888, Rgb565).
    #[arg(long, value_parser = parse_format)]
    format: Option<PixelFormat>,

    /// Directory holding outputs and references (default: $FRAMECHECK_OUTPUT_DIR or target/framecheck/Media/Bitmap).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Overwrite each reference with the fresh output before comparing.
    #[arg(long)]
    bless: bool,

    #[command(flatten)]
    tolerance: ToleranceArgs,

    /// DPI for offscreen render targets.
    #[arg(long, default_value_t = 96.0)]
    dpi: f64,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Rendered image.
    #[arg(long)]
    actual: PathBuf,

    /// Golden image.
    #[arg(long)]
    reference: PathBuf,

    #[command(flatten)]
    tolerance: ToleranceArgs,
}

#[derive(clap::Args, Debug)]
struct ToleranceArgs {
    /// Largest allowed per-channel difference.
    #[arg(long)]
    max_channel_diff: Option<u8>,

    /// Largest allowed mean absolute difference.
    #[arg(long)]
    max_mean_diff: Option<f64>,
}

impl ToleranceArgs {
    fn resolve(&self, base: Option<Tolerance>) -> Option<Tolerance> {
        if self.max_channel_diff.is_none() && self.max_mean_diff.is_none() {
            return base;
        }
        let base = base.unwrap_or_default();
        Some(Tolerance {
            max_channel_diff: self.max_channel_diff.unwrap_or(base.max_channel_diff),
            max_mean_diff: self.max_mean_diff.unwrap_or(base.max_mean_diff),
        })
    }
}

fn parse_scenario(s: &str) -> Result<Scenario, String> {
    Scenario::from_name(s).ok_or_else(|| {
        let known: Vec<_> = Scenario::ALL.iter().map(|s| s.name()).collect();
        format!("unknown scenario '{s}' (expected one of: {})", known.join(", "))
    })
}

fn parse_format(s: &str) -> Result<PixelFormat, String> {
    PixelFormat::from_name(s).ok_or_else(|| {
        let known: Vec<_> = PixelFormat::ALL.iter().map(|f| f.name()).collect();
        format!("unknown pixel format '{s}' (expected one of: {})", known.join(", "))
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::List(args) => cmd_list(args),
        Command::Run(args) => cmd_run(args),
        Command::Compare(args) => cmd_compare(args),
    }
}

fn harness_opts(output_dir: Option<PathBuf>) -> HarnessOpts {
    let opts = HarnessOpts::from_env();
    match output_dir {
        Some(dir) => opts.with_output_dir(dir),
        None => opts,
    }
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let opts = harness_opts(args.output_dir);
    for case in framecheck::scenario_table() {
        println!(
            "{case}\t{}\t{}",
            case.output_path(&opts.output_dir).display(),
            case.reference_path(&opts.output_dir).display()
        );
    }
    Ok(())
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut opts = harness_opts(args.output_dir);
    opts.bless |= args.bless;
    opts.tolerance = args.tolerance.resolve(opts.tolerance);

    let cases: Vec<ScenarioCase> = framecheck::scenario_table()
        .into_iter()
        .filter(|c| args.scenario.is_none_or(|s| c.scenario == s))
        .filter(|c| args.format.is_none_or(|f| c.format == f))
        .collect();
    if cases.is_empty() {
        anyhow::bail!("no scenario matches the given --scenario/--format filters");
    }

    let dpi = Dpi::new(args.dpi, args.dpi).context("invalid --dpi")?;
    let backend = CpuBackend::new(CpuBackendOpts { dpi });
    let runner = ScenarioRunner::new(&backend, opts);

    let outcomes = runner.run_all(&cases);
    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(report) => println!(
                "ok    {}  (max channel diff {}, mean {:.4})",
                outcome.case, report.max_channel_diff, report.mean_abs_diff
            ),
            Err(err) => {
                failed += 1;
                println!("FAIL  {}  {}", outcome.case, err.root());
            }
        }
    }

    println!("{} passed, {failed} failed", outcomes.len() - failed);
    if failed > 0 {
        anyhow::bail!("{failed} of {} scenarios failed", outcomes.len());
    }
    Ok(())
}

fn cmd_compare(args: CompareArgs) -> anyhow::Result<()> {
    let tolerance = args
        .tolerance
        .resolve(HarnessOpts::from_env().tolerance)
        .unwrap_or_default();
    let report = framecheck::compare_images(&args.actual, &args.reference, tolerance)
        .with_context(|| {
            format!(
                "compare '{}' against '{}'",
                args.actual.display(),
                args.reference.display()
            )
        })?;
    println!(
        "{}x{}: max channel diff {}, mean abs diff {:.4}",
        report.width, report.height, report.max_channel_diff, report.mean_abs_diff
    );
    Ok(())
}
