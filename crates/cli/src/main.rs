//! `labelgen`: plan, render and print labels from JSON job files.

mod render;

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use label_engine_core::{
    LabelRequest, LayoutPlan, PreparedLabel, RenderOutput, Target, plan_prepared, render_plan,
};
use label_engine_diagnostics::{self as diag, Diagnostic};
use label_engine_print_client::{FileMode, FilePrinter, Printer, send_job};
use label_engine_profile::{Profile, load_profile_from_str, validate};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{Format, report};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "labelgen",
    version,
    about = "Lay out labels and generate printer commands, vector print jobs and HTML previews"
)]
struct Cli {
    /// Output mode: "pretty" writes diagnostics to stderr, "json" folds
    /// results and diagnostics into one JSON document on stdout.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG`
    /// takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Print the layout plan of a job as JSON.
    Plan {
        /// Job file, or `-` for stdin.
        job: String,
        /// Target whose unit scale the plan is computed in.
        #[arg(long, value_enum, default_value_t = TargetArg::Raster)]
        target: TargetArg,
        /// Render profile JSON (built-in defaults when omitted).
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Render a job for one target.
    Render {
        /// Job file, or `-` for stdin.
        job: String,
        /// Output target.
        #[arg(long, value_enum)]
        target: TargetArg,
        /// Write the artifact here instead of stdout.
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,
        /// Render profile JSON (built-in defaults when omitted).
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Render a job as printer commands and send it.
    Print {
        /// Job file, or `-` for stdin.
        job: String,
        /// Network printer: `IP`, `IP:PORT`, `host` or `host:PORT` (port 9100 by default).
        #[arg(long, conflicts_with = "file", required_unless_present_any = ["file", "dry_run"])]
        printer: Option<String>,
        /// Spool file or device path such as `/dev/usb/lp0`.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Append to `--file` instead of replacing its content.
        #[arg(long, requires = "file")]
        append: bool,
        /// Connect timeout in seconds.
        #[arg(long, default_value_t = 5)]
        timeout: u64,
        /// Print the commands to stdout instead of sending them.
        #[arg(long)]
        dry_run: bool,
        /// Render profile JSON (built-in defaults when omitted).
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Explain a diagnostic ID (e.g. LBL2002).
    Explain { id: String },
}

/// Output target as named on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    /// Thermal printer command stream (dots).
    Raster,
    /// XML vector print job (millimetres).
    Vector,
    /// HTML preview fragment (pixels).
    Preview,
}

impl From<TargetArg> for Target {
    fn from(t: TargetArg) -> Self {
        match t {
            TargetArg::Raster => Target::Raster,
            TargetArg::Vector => Target::Vector,
            TargetArg::Preview => Target::Preview,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve(cli.output.as_deref());

    match cli.cmd {
        Cmd::Plan {
            job,
            target,
            profile,
        } => cmd_plan(&job, target.into(), profile.as_deref(), format)?,
        Cmd::Render {
            job,
            target,
            out,
            profile,
        } => cmd_render(&job, target.into(), out.as_deref(), profile.as_deref(), format)?,
        Cmd::Print {
            job,
            printer,
            file,
            append,
            timeout,
            dry_run,
            profile,
        } => {
            let destination = match (printer, file) {
                (Some(addr), _) => Destination::Network { addr, timeout },
                (None, Some(path)) => Destination::File { path, append },
                (None, None) => Destination::None,
            };
            cmd_print(&job, destination, dry_run, profile.as_deref(), format)?
        }
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_plan(job: &str, target: Target, profile_path: Option<&Path>, format: Format) -> Result<()> {
    let (prepared, profile) = load_job(job, profile_path)?;
    let plan = plan_prepared(&prepared, target, &profile);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "target": target,
                "plan": plan,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{}", serde_json::to_string_pretty(&plan)?);
            report(&plan.diagnostics);
        }
    }

    Ok(())
}

fn cmd_render(
    job: &str,
    target: Target,
    out: Option<&Path>,
    profile_path: Option<&Path>,
    format: Format,
) -> Result<()> {
    let (prepared, profile) = load_job(job, profile_path)?;
    let output = render(&prepared, target, &profile)?;
    let diagnostics: Vec<Diagnostic> = output.diagnostics().cloned().collect();

    if let Some(path) = out {
        fs::write(path, &output.rendered.bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), bytes = output.rendered.bytes.len(), "artifact written");
    }

    match format {
        Format::Json => {
            let mut envelope = serde_json::json!({
                "target": target,
                "media_type": output.rendered.media_type,
                "diagnostics": diagnostics,
            });
            match out {
                Some(path) => envelope["output"] = path.display().to_string().into(),
                None => envelope["artifact"] = output.rendered.as_str().into(),
            }
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Format::Pretty => {
            if out.is_none() {
                write_stdout(&output.rendered.bytes)?;
            }
            report(&diagnostics);
        }
    }

    Ok(())
}

/// Where `print` sends the job.
enum Destination {
    Network { addr: String, timeout: u64 },
    File { path: PathBuf, append: bool },
    None,
}

fn cmd_print(
    job: &str,
    destination: Destination,
    dry_run: bool,
    profile_path: Option<&Path>,
    format: Format,
) -> Result<()> {
    let (prepared, profile) = load_job(job, profile_path)?;
    let output = render(&prepared, Target::Raster, &profile)?;
    let diagnostics: Vec<Diagnostic> = output.diagnostics().cloned().collect();

    let sent_to = if dry_run {
        None
    } else {
        let mut printer = open_printer(destination)?;
        send_job(printer.as_mut(), &output.rendered.bytes)
            .with_context(|| format!("failed to print to {}", printer.describe()))?;
        Some(printer.describe())
    };

    match format {
        Format::Json => {
            let mut envelope = serde_json::json!({
                "ok": true,
                "dry_run": dry_run,
                "copies": output.plan.copies,
                "bytes": output.rendered.bytes.len(),
                "diagnostics": diagnostics,
            });
            match &sent_to {
                Some(dest) => envelope["destination"] = dest.as_str().into(),
                None => envelope["job"] = output.rendered.as_str().into(),
            }
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Format::Pretty => {
            match &sent_to {
                Some(dest) => eprintln!(
                    "sent {} bytes ({} cop{}) to {dest}",
                    output.rendered.bytes.len(),
                    output.plan.copies,
                    if output.plan.copies == 1 { "y" } else { "ies" },
                ),
                None => write_stdout(&output.rendered.bytes)?,
            }
            report(&diagnostics);
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    let text = diag::explain(id);
    match format {
        Format::Json => {
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            use ariadne::Fmt;
            match text {
                Some(text) => println!("{}: {}", id.fg(ariadne::Color::Cyan), text),
                None => println!("{id}: (no explanation available)"),
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Read a job and resolve the profile it renders with.
///
/// A `printer_dpi` on the requirement overrides the profile's raster dpi.
fn load_job(job: &str, profile_path: Option<&Path>) -> Result<(PreparedLabel, Profile)> {
    let text = read_input(job)?;
    let request =
        LabelRequest::from_json(&text).with_context(|| format!("invalid job file {job}"))?;
    let prepared = request
        .to_spec_and_fields()
        .with_context(|| format!("cannot prepare label from {job}"))?;

    let mut profile = match profile_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read profile {}", path.display()))?;
            load_profile_from_str(&text)
                .with_context(|| format!("invalid profile {}", path.display()))?
        }
        None => Profile::default(),
    };
    if let Some(dpi) = request.requirement.printer_dpi {
        profile.raster.dpi = dpi;
        validate(&profile).with_context(|| format!("unusable printer_dpi {dpi} in {job}"))?;
    }
    tracing::debug!(profile = %profile.id, dpi = profile.raster.dpi, "profile resolved");
    Ok((prepared, profile))
}

fn render(prepared: &PreparedLabel, target: Target, profile: &Profile) -> Result<RenderOutput> {
    let plan: LayoutPlan = plan_prepared(prepared, target, profile);
    render_plan(plan, target, profile).with_context(|| format!("failed to render {target} output"))
}

fn open_printer(destination: Destination) -> Result<Box<dyn Printer>> {
    match destination {
        Destination::File { path, append } => {
            let mode = if append {
                FileMode::Append
            } else {
                FileMode::Truncate
            };
            Ok(Box::new(FilePrinter::new(path, mode)))
        }
        Destination::Network { addr, timeout } => connect_tcp(&addr, timeout),
        Destination::None => bail!("no destination: pass --printer or --file"),
    }
}

#[cfg(feature = "tcp")]
fn connect_tcp(addr: &str, timeout: u64) -> Result<Box<dyn Printer>> {
    use label_engine_print_client::{PrinterConfig, PrinterTimeouts, TcpPrinter};

    let timeouts = PrinterTimeouts::new(
        std::time::Duration::from_secs(timeout),
        PrinterTimeouts::default().write,
    );
    let printer = TcpPrinter::connect(addr, &PrinterConfig::with_timeouts(timeouts))
        .with_context(|| format!("cannot reach printer {addr}"))?;
    Ok(Box::new(printer))
}

#[cfg(not(feature = "tcp"))]
fn connect_tcp(addr: &str, _timeout: u64) -> Result<Box<dyn Printer>> {
    bail!("cannot print to {addr}: built without the `tcp` feature")
}

fn read_input(job: &str) -> Result<String> {
    if job == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read job from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(job).with_context(|| format!("failed to read job file {job}"))
    }
}

fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(bytes)?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}
