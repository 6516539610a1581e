//! MakeMyQRCode - styled QR code designer
//!
//! Command-line entry point.
//!
//! # Overview
//!
//! This binary drives the headless [`AppController`] from command-line flags.
//! It initializes:
//! - Settings ([`ConfigManager`]: defaults, `makemyqrcode.yaml`, `MAKEMYQR_*`)
//! - Logging infrastructure (daily rotated file + optional stderr output)
//! - Tokio runtime (registration request, rasterization, clipboard timer)
//! - State management ([`StateManager`]) and the controller
//!
//! # Execution Flow
//!
//! 1. Parse flags, load settings, apply flag overrides
//! 2. Initialize logging → `<log_dir>/makemyqrcode.<date>`
//! 3. Build the controller and render the initial configuration
//! 4. Apply design flags (URL, colours, shapes, preset, logo)
//! 5. Either download through the registration gate, copy to the clipboard,
//!    or print the rendered SVG to stdout
//! 6. Log the metrics summary and shut the runtime down

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::Parser;
use makemyqrcode::logging::ConsoleFormat;
use makemyqrcode::models::{
    Color, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel, ExportFormat,
};
use makemyqrcode::services::{DirectorySink, HttpRegistrationClient, SubmitOutcome, SystemClipboard};
use makemyqrcode::{APP_NAME, AppController, ConfigManager, Metrics, StateManager, VERSION};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "makemyqrcode", version, about = "Design styled QR codes and export them as SVG or PNG")]
struct Args {
    /// Destination URL encoded in the symbol
    #[arg(long)]
    url: Option<String>,

    /// Foreground colour (#RRGGBB or #RRGGBBAA)
    #[arg(long)]
    fg: Option<Color>,

    /// Background colour (#RRGGBB or #RRGGBBAA)
    #[arg(long)]
    bg: Option<Color>,

    /// Error correction level: L, M, Q or H
    #[arg(long)]
    level: Option<ErrorCorrectionLevel>,

    /// Use the narrow quiet zone
    #[arg(long)]
    no_margin: bool,

    /// Body dot shape (square, rounded, dots, classy, classy-rounded, extra-rounded)
    #[arg(long)]
    dot_type: Option<DotType>,

    /// Eye frame shape, or "none"
    #[arg(long)]
    corner_square: Option<String>,

    /// Eye ball shape, or "none"
    #[arg(long)]
    corner_dot: Option<String>,

    /// Colour/style preset id, applied before --fg/--bg/--dot-type
    #[arg(long)]
    preset: Option<String>,

    /// Logo preset id
    #[arg(long, conflicts_with = "logo_file")]
    logo_preset: Option<String>,

    /// Image file to embed as the logo
    #[arg(long)]
    logo_file: Option<Utf8PathBuf>,

    /// Viewport width used to pick the display target
    #[arg(long)]
    viewport_width: Option<u32>,

    /// Download the design as svg or png (requires registration)
    #[arg(long)]
    download: Option<ExportFormat>,

    #[arg(long, requires = "download")]
    name: Option<String>,

    #[arg(long, requires = "download")]
    phone: Option<String>,

    #[arg(long, requires = "download")]
    email: Option<String>,

    /// Copy the design to the clipboard as an image
    #[arg(long)]
    copy: bool,

    /// Directory holding makemyqrcode.yaml
    #[arg(long, default_value = "makemyqrcode-data")]
    config_dir: Utf8PathBuf,

    /// Directory downloads are written into
    #[arg(long)]
    output_dir: Option<Utf8PathBuf>,

    /// Registration service base URL
    #[arg(long, env = "MAKEMYQR_API_BASE_URL")]
    api_base_url: Option<String>,

    /// Mirror logs on stderr: off, text or json
    #[arg(long, default_value = "off", value_parser = ["off", "text", "json"])]
    console: String,

    #[arg(long)]
    debug: bool,
}

fn console_format(value: &str) -> ConsoleFormat {
    match value {
        "text" => ConsoleFormat::Text,
        "json" => ConsoleFormat::Json,
        _ => ConsoleFormat::Off,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let mut settings = config_manager.load_settings()?;
    if let Some(dir) = &args.output_dir {
        settings.output_dir = dir.clone();
    }
    if let Some(url) = &args.api_base_url {
        settings.api_base_url = url.clone();
    }
    if let Some(width) = args.viewport_width {
        settings.viewport_width = width;
    }
    settings.debug_mode |= args.debug;

    let _guard = makemyqrcode::logging::setup_logging_with_console(
        &settings.log_dir,
        APP_NAME,
        settings.debug_mode,
        console_format(&args.console),
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("makemyqrcode-worker")
        .build()?;

    let metrics = Arc::new(Metrics::new());
    let state_manager = StateManager::new();
    state_manager.set_viewport_width(settings.viewport_width);

    let client = HttpRegistrationClient::new(&settings.api_base_url, settings.request_timeout())?;
    let controller = AppController::new(
        state_manager,
        &settings,
        Arc::new(DirectorySink::new(settings.output_dir.clone())),
        Arc::new(SystemClipboard),
        Arc::new(client),
        metrics.clone(),
    )?;

    apply_design(&controller, &args)?;

    let result = runtime.block_on(run(&controller, &args));

    metrics.log_summary();
    runtime.shutdown_timeout(Duration::from_secs(5));
    tracing::info!("Shutdown complete");

    result
}

fn apply_design<C>(controller: &AppController<C>, args: &Args) -> Result<()>
where
    C: makemyqrcode::services::RegistrationClient,
{
    if let Some(url) = &args.url {
        controller.set_url(url.clone());
    }
    if let Some(id) = &args.preset {
        controller.apply_color_preset(id)?;
    }
    if let Some(fg) = args.fg {
        controller.set_foreground(fg);
    }
    if let Some(bg) = args.bg {
        controller.set_background(bg);
    }
    if let Some(level) = args.level {
        controller.set_level(level);
    }
    if args.no_margin {
        controller.set_include_margin(false);
    }
    if let Some(dot_type) = args.dot_type {
        controller.set_dot_type(dot_type);
    }
    if let Some(value) = &args.corner_square {
        controller.set_corner_square_type(CornerSquareType::parse_optional(value)?);
    }
    if let Some(value) = &args.corner_dot {
        controller.set_corner_dot_type(CornerDotType::parse_optional(value)?);
    }
    if let Some(id) = &args.logo_preset {
        controller.select_logo_preset(id)?;
    }
    if let Some(path) = &args.logo_file {
        controller
            .upload_logo_file(path)
            .with_context(|| format!("Failed to use {} as logo", path))?;
    }
    Ok(())
}

async fn run<C>(controller: &AppController<C>, args: &Args) -> Result<()>
where
    C: makemyqrcode::services::RegistrationClient,
{
    if let Some(format) = args.download {
        if !controller.request_download(format) {
            bail!("Download unavailable: set --url first");
        }
        controller.set_name(args.name.clone().unwrap_or_default());
        if !controller.set_phone(args.phone.as_deref().unwrap_or_default()) {
            bail!("Phone number may contain only digits and a leading +");
        }
        controller.set_email(args.email.clone().unwrap_or_default());

        match controller.submit_registration().await {
            SubmitOutcome::Exported { file: Some(file), .. } => {
                println!("Saved {} ({} bytes)", file.file_name, file.size_bytes);
            }
            SubmitOutcome::Exported { file: None, .. } => bail!("Nothing was exported"),
            SubmitOutcome::ExportFailed(message) => bail!("Export failed: {}", message),
            SubmitOutcome::Invalid(message)
            | SubmitOutcome::Rejected(message)
            | SubmitOutcome::Unreachable(message) => bail!("{}", message),
            SubmitOutcome::Ignored => bail!("Registration form was not open"),
        }
    }

    if args.copy {
        if controller.copy_to_clipboard().await? {
            println!("Copied to clipboard");
        } else {
            bail!("Nothing to copy");
        }
    }

    if args.download.is_none() && !args.copy {
        let drawing = controller
            .rendered_drawing()
            .context("No drawing was rendered")?;
        println!("{}", drawing.serialize());
    }

    Ok(())
}
