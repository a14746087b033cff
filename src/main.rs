use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use termcolor::{ColorChoice, StandardStream};

use soygen::{
    render_diagnostic, ClassModel, DiagnosticCollector, DirFiler, Filer, MemoryFiler,
    ModelAnalysis, RunReport, RuntimeFacilities, Scheduler, SoyConfig, DEFAULT_ROUNDS,
};

#[derive(Parser, Debug)]
#[command(
    name = "soygen",
    version,
    about = "Factory generator for the Soy dependency injection runtime"
)]
struct Cli {
    /// When to color diagnostics
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto)]
    color: ColorWhen,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate factory sources from a class model
    Generate {
        /// Class model document (default: `model` from soy.toml, then classes.json)
        model: Option<String>,
        /// Output directory for generated sources
        #[arg(short, long)]
        out: Option<String>,
        /// Maximum processing rounds before unresolved classes are reported
        #[arg(long)]
        rounds: Option<usize>,
        /// Package the generated code imports the runtime facilities from
        #[arg(long)]
        runtime_package: Option<String>,
        /// Suppress non-error output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Run the full pipeline without writing files, reporting diagnostics only
    Check {
        /// Class model document (default: `model` from soy.toml, then classes.json)
        model: Option<String>,
        /// Maximum processing rounds before unresolved classes are reported
        #[arg(long)]
        rounds: Option<usize>,
        /// Package the generated code imports the runtime facilities from
        #[arg(long)]
        runtime_package: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ColorWhen {
    Auto,
    Always,
    Never,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = SoyConfig::discover(Path::new("."))?.unwrap_or_default();
    match cli.command {
        Command::Generate {
            model,
            out,
            rounds,
            runtime_package,
            quiet,
        } => {
            let model = load_model(model, &config)?;
            let out_dir = out
                .or(config.generate.out_dir)
                .unwrap_or_else(|| "generated".to_string());
            let mut filer = DirFiler::new(&out_dir);
            let (report, mut diags) = execute(
                &model,
                rounds.or(config.generate.rounds),
                runtime_package.or(config.generate.runtime_package),
                &mut filer,
            );
            if !quiet {
                diags.note(format!(
                    "generated {} of {} factories in {} rounds under {}",
                    report.succeeded(),
                    model.classes.len(),
                    report.rounds,
                    out_dir
                ));
            }
            report_diagnostics(&diags, cli.color)?;
            Ok(exit_for(&report))
        }
        Command::Check {
            model,
            rounds,
            runtime_package,
        } => {
            let model = load_model(model, &config)?;
            let mut filer = MemoryFiler::new();
            let (report, mut diags) = execute(
                &model,
                rounds.or(config.generate.rounds),
                runtime_package.or(config.generate.runtime_package),
                &mut filer,
            );
            diags.note(format!(
                "checked {} classes: {} factories resolvable",
                model.classes.len(),
                report.succeeded()
            ));
            report_diagnostics(&diags, cli.color)?;
            Ok(exit_for(&report))
        }
    }
}

fn load_model(arg: Option<String>, config: &SoyConfig) -> Result<ClassModel> {
    let path = arg
        .or_else(|| config.model.clone())
        .unwrap_or_else(|| "classes.json".to_string());
    ClassModel::load(&path).with_context(|| format!("loading class model {path}"))
}

fn execute(
    model: &ClassModel,
    rounds: Option<usize>,
    runtime_package: Option<String>,
    filer: &mut dyn Filer,
) -> (RunReport, DiagnosticCollector) {
    let runtime = runtime_package
        .map(RuntimeFacilities::with_package)
        .unwrap_or_default();
    let mut analysis = ModelAnalysis::new(&model.classes);
    let mut diags = DiagnosticCollector::new();
    let report = Scheduler::new(rounds.unwrap_or(DEFAULT_ROUNDS))
        .with_runtime(runtime)
        .run(&model.classes, &mut analysis, filer, &mut diags);
    (report, diags)
}

fn report_diagnostics(diags: &DiagnosticCollector, color: ColorWhen) -> Result<()> {
    let choice = match color {
        ColorWhen::Always => ColorChoice::Always,
        ColorWhen::Never => ColorChoice::Never,
        ColorWhen::Auto => {
            if atty::is(atty::Stream::Stderr) {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            }
        }
    };
    let stream = StandardStream::stderr(choice);
    let mut out = stream.lock();
    for diagnostic in diags.iter() {
        render_diagnostic(diagnostic, &mut out)?;
    }
    Ok(())
}

fn exit_for(report: &RunReport) -> ExitCode {
    if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
