//! actx CLI - Command-line interface for Adaptive Context
//!
//! Commands:
//! - theme: Derive the theme for a configured context
//! - select: Pick a content variant for a configured context
//! - animate: Build an animation profile for a configured context
//! - replay: Apply a recorded event stream and print the resulting snapshot
//! - doctor: Diagnose configuration and environment

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

use adaptive_context::animation::{AnimationDirection, AnimationVariant, DurationClass, Repeat};
use adaptive_context::types::{AnimationSpeed, ColorMode, FontSize, PreferencesPatch, ThemePreference};
use adaptive_context::{
    AdaptationCategory, AnimationRequest, Context, ContextConfig, ContextEngine, ContextError,
    ContentVariants, EventAdapter, StaticEnvironment, Theme, ACTX_VERSION,
};

/// actx - Adaptive UI context and derived presentation values
#[derive(Parser)]
#[command(name = "actx")]
#[command(version = ACTX_VERSION)]
#[command(about = "Derive themes, content variants and animations from UI context", long_about = None)]
struct Cli {
    /// Context configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(flatten)]
    preferences: PreferenceArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Preference overrides applied on top of the config file
#[derive(Args)]
struct PreferenceArgs {
    /// Theme: light, dark or system
    #[arg(long, global = true, value_parser = ThemePreference::from_str)]
    theme: Option<ThemePreference>,

    /// Animation speed: slow, normal or fast
    #[arg(long, global = true, value_parser = AnimationSpeed::from_str)]
    animation_speed: Option<AnimationSpeed>,

    /// Font size: small, medium or large
    #[arg(long, global = true, value_parser = FontSize::from_str)]
    font_size: Option<FontSize>,

    /// Color mode: default, protanopia, deuteranopia or tritanopia
    #[arg(long, global = true, value_parser = ColorMode::from_str)]
    color_mode: Option<ColorMode>,

    /// Prefer reduced motion
    #[arg(long, global = true)]
    reduced_motion: Option<bool>,
}

impl PreferenceArgs {
    fn patch(&self) -> PreferencesPatch {
        PreferencesPatch {
            theme: self.theme,
            animation_speed: self.animation_speed,
            reduced_motion: self.reduced_motion,
            font_size: self.font_size,
            color_mode: self.color_mode,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the theme for the configured context
    Theme,

    /// Select a content variant for the configured context
    Select {
        /// Variants file: {"default": ..., "mobile": ..., "dark": ...} (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Categories to consider (defaults to all)
        #[arg(long, value_enum, value_delimiter = ',')]
        categories: Vec<CategoryArg>,
    },

    /// Build an animation profile for the configured context
    Animate {
        #[arg(value_enum)]
        variant: VariantArg,

        #[arg(long, value_enum, default_value = "none")]
        direction: DirectionArg,

        #[arg(long, value_enum, default_value = "medium")]
        duration: DurationArg,

        /// Entry delay in seconds
        #[arg(long, default_value = "0")]
        delay: f64,

        /// Repeat count; 0 repeats forever
        #[arg(long)]
        repeat: Option<u32>,

        /// Stagger between children in seconds
        #[arg(long)]
        stagger: Option<f64>,
    },

    /// Apply a recorded event stream and print the final snapshot
    Replay {
        /// Input file path (use - for stdin)
        #[arg(short, long, default_value = "-")]
        input: PathBuf,

        /// Input format
        #[arg(long, default_value = "ndjson")]
        input_format: InputFormat,
    },

    /// Diagnose configuration and environment
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one event per line)
    Ndjson,
    /// JSON array of events
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Device,
    Theme,
    Interaction,
    Accessibility,
}

impl From<CategoryArg> for AdaptationCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Device => AdaptationCategory::Device,
            CategoryArg::Theme => AdaptationCategory::Theme,
            CategoryArg::Interaction => AdaptationCategory::Interaction,
            CategoryArg::Accessibility => AdaptationCategory::Accessibility,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Fade,
    Slide,
    Scale,
    Rotate,
    Pulse,
}

impl From<VariantArg> for AnimationVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Fade => AnimationVariant::Fade,
            VariantArg::Slide => AnimationVariant::Slide,
            VariantArg::Scale => AnimationVariant::Scale,
            VariantArg::Rotate => AnimationVariant::Rotate,
            VariantArg::Pulse => AnimationVariant::Pulse,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl From<DirectionArg> for AnimationDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Up => AnimationDirection::Up,
            DirectionArg::Down => AnimationDirection::Down,
            DirectionArg::Left => AnimationDirection::Left,
            DirectionArg::Right => AnimationDirection::Right,
            DirectionArg::None => AnimationDirection::None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DurationArg {
    Fast,
    #[value(alias = "normal")]
    Medium,
    Slow,
}

impl From<DurationArg> for DurationClass {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::Fast => DurationClass::Fast,
            DurationArg::Medium => DurationClass::Medium,
            DurationArg::Slow => DurationClass::Slow,
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr so stdout stays machine-readable
fn init_tracing() {
    let filter = EnvFilter::try_from_env("ACTX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), ActxCliError> {
    let mut config = load_config(cli.config.as_deref())?;
    cli.preferences.patch().apply(&mut config.preferences);

    match cli.command {
        Commands::Theme => cmd_theme(&config, cli.pretty),
        Commands::Select { input, categories } => cmd_select(&config, &input, &categories, cli.pretty),
        Commands::Animate {
            variant,
            direction,
            duration,
            delay,
            repeat,
            stagger,
        } => {
            let mut request = AnimationRequest::new(variant.into())
                .direction(direction.into())
                .duration(duration.into())
                .delay(delay);
            if let Some(count) = repeat {
                request = request.repeat(if count == 0 {
                    Repeat::Infinite
                } else {
                    Repeat::Count(count)
                });
            }
            if let Some(seconds) = stagger {
                request = request.stagger_children(seconds);
            }
            cmd_animate(&config, &request, cli.pretty)
        }
        Commands::Replay {
            input,
            input_format,
        } => cmd_replay(&config, &input, input_format, cli.pretty),
        Commands::Doctor { json } => cmd_doctor(cli.config.as_deref(), &config, json),
    }
}

fn load_config(path: Option<&Path>) -> Result<ContextConfig, ActxCliError> {
    match path {
        Some(path) => Ok(ContextConfig::load(path)?),
        None => Ok(ContextConfig::default()),
    }
}

fn read_input(input: &Path) -> Result<String, ActxCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), ActxCliError> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}

fn cmd_theme(config: &ContextConfig, pretty: bool) -> Result<(), ActxCliError> {
    let engine = ContextEngine::from_config(config);
    print_json(&engine.theme(), pretty)
}

fn cmd_select(
    config: &ContextConfig,
    input: &Path,
    categories: &[CategoryArg],
    pretty: bool,
) -> Result<(), ActxCliError> {
    let variants: ContentVariants<serde_json::Value> = serde_json::from_str(&read_input(input)?)?;
    let categories: Vec<AdaptationCategory> = if categories.is_empty() {
        AdaptationCategory::ALL.to_vec()
    } else {
        categories.iter().map(|c| (*c).into()).collect()
    };

    let engine = ContextEngine::from_config(config);
    print_json(engine.select(&variants, &categories), pretty)
}

fn cmd_animate(config: &ContextConfig, request: &AnimationRequest, pretty: bool) -> Result<(), ActxCliError> {
    let engine = ContextEngine::from_config(config);
    print_json(&engine.animation(request), pretty)
}

fn cmd_replay(
    config: &ContextConfig,
    input: &Path,
    input_format: InputFormat,
    pretty: bool,
) -> Result<(), ActxCliError> {
    let input_data = read_input(input)?;
    let events = match input_format {
        InputFormat::Ndjson => EventAdapter::parse_ndjson(&input_data)?,
        InputFormat::Json => EventAdapter::parse_array(&input_data)?,
    };

    if events.is_empty() {
        return Err(ActxCliError::NoEvents);
    }

    let mut engine = ContextEngine::from_config(config);
    let applied = engine.apply_all(&events)?;
    tracing::info!(applied, "replay finished");

    let snapshot = ReplaySnapshot {
        events_applied: applied,
        tracked_elements: engine.recorder().tracked_count(),
        context: engine.context().clone(),
        theme: engine.theme(),
    };
    print_json(&snapshot, pretty)
}

fn cmd_doctor(path: Option<&Path>, config: &ContextConfig, json: bool) -> Result<(), ActxCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "actx_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("actx version {}", ACTX_VERSION),
    });

    // A config that failed to parse never reaches this point
    checks.push(match path {
        Some(path) => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: format!("Loaded {}", path.display()),
        },
        None => DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Ok,
            message: "No config file, using defaults".to_string(),
        },
    });

    checks.push(environment_check(&config.environment));

    if config.initial_section.trim().is_empty() {
        checks.push(DoctorCheck {
            name: "initialSection".to_string(),
            status: CheckStatus::Warning,
            message: "initialSection is empty; no element will match it".to_string(),
        });
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass a file to replay)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (replay ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        version: ACTX_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("actx Doctor Report");
        println!("==================");
        println!("Version:  {}", report.version);
        println!("\nChecks:");
        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(ActxCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn environment_check(env: &StaticEnvironment) -> DoctorCheck {
    if env.width == 0 || env.height == 0 {
        DoctorCheck {
            name: "environment".to_string(),
            status: CheckStatus::Error,
            message: format!("Viewport {}x{} has a zero dimension", env.width, env.height),
        }
    } else {
        let engine = ContextEngine::new(*env);
        let device = &engine.context().device;
        DoctorCheck {
            name: "environment".to_string(),
            status: CheckStatus::Ok,
            message: format!(
                "Viewport {}x{} classified as {} ({}, {})",
                env.width,
                env.height,
                device.device_class.as_str(),
                device.orientation.as_str(),
                device.connectivity.as_str()
            ),
        }
    }
}

// Error handling

#[derive(Debug)]
enum ActxCliError {
    Io(io::Error),
    Context(ContextError),
    Json(serde_json::Error),
    NoEvents,
    DoctorFailed,
}

impl From<io::Error> for ActxCliError {
    fn from(e: io::Error) -> Self {
        ActxCliError::Io(e)
    }
}

impl From<ContextError> for ActxCliError {
    fn from(e: ContextError) -> Self {
        ActxCliError::Context(e)
    }
}

impl From<serde_json::Error> for ActxCliError {
    fn from(e: serde_json::Error) -> Self {
        ActxCliError::Json(e)
    }
}

#[derive(Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<ActxCliError> for CliError {
    fn from(e: ActxCliError) -> Self {
        match e {
            ActxCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            ActxCliError::Context(e) => {
                let (code, hint) = match &e {
                    ContextError::ConfigError(_) => ("CONFIG_ERROR", "Check the TOML config file"),
                    ContextError::InvalidEvent(_) => {
                        ("INVALID_EVENT", "Element ids must be non-empty and ratios within 0.0-1.0")
                    }
                    ContextError::Io(_) => ("IO_ERROR", "Check file paths and permissions"),
                    _ => ("PARSE_ERROR", "Ensure input matches the context event schema"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            ActxCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            ActxCliError::NoEvents => CliError {
                code: "NO_EVENTS".to_string(),
                message: "No events found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            ActxCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplaySnapshot {
    events_applied: usize,
    tracked_elements: usize,
    context: Context,
    theme: Theme,
}

#[derive(Serialize)]
struct DoctorReport {
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_flags_override_config() {
        let cli = Cli::try_parse_from([
            "actx",
            "--theme",
            "dark",
            "--color-mode",
            "tritanopia",
            "theme",
        ])
        .unwrap();
        let mut config = ContextConfig::default();
        cli.preferences.patch().apply(&mut config.preferences);

        assert_eq!(config.preferences.theme, ThemePreference::Dark);
        assert_eq!(config.preferences.color_mode, ColorMode::Tritanopia);
        assert_eq!(config.preferences.font_size, FontSize::Medium);
    }

    #[test]
    fn test_unknown_preference_flag_value_is_rejected() {
        let err = Cli::try_parse_from(["actx", "theme", "--font-size", "huge"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Unknown font size value: huge"));
    }
}
