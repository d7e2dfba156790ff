//! gridkiosk entrypoint.
use anyhow::Result;
use clap::Parser;
use core_config::load_from;
use core_events::{EVENT_CHANNEL_CAP, Event, EventSourceRegistry, TickEventSource};
use core_render::FrameStyle;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalCapabilities};
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

mod runtime;
mod startup;

use runtime::{KioskRuntime, RuntimeParts, ShutdownReason};

const LOG_FILE: &str = "gridkiosk.log";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "gridkiosk", version, about = "Grid kiosk for touch terminals")]
struct Args {
    /// Configuration file path (overrides discovery of `kiosk.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn configure_logging(&mut self) -> Result<()> {
        let log_dir = Path::new(".");
        let log_path = log_dir.join(LOG_FILE);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        if tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .try_init()
            .is_ok()
        {
            self.log_guard = Some(guard);
        }
        Ok(())
    }

    fn install_panic_hook() {
        static HOOK: Once = Once::new();
        HOOK.call_once(|| {
            let default_panic = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                tracing::error!(target: "runtime.panic", ?info, "panic");
                default_panic(info);
            }));
        });
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut app = AppStartup::new();
    app.configure_logging()?;
    AppStartup::install_panic_hook();
    info!(target: "runtime", "startup");

    // Everything that can fail on bad input happens before the terminal
    // switches screens, so errors print normally.
    let config = load_from(args.config.clone())?;
    let layouts = startup::load_layouts(&config.layout_paths())?;
    let icons = startup::preload_icons(config.icon_dir(), &layouts).await;
    let style = config.frame_style(FrameStyle::terminal());
    let quit_message = config.quit_message().to_string();

    app.backend.set_title("gridkiosk")?;
    let mut guard = app.backend.enter_guard()?;
    let (width, height) = guard.backend().size()?;
    info!(
        target: "runtime.startup",
        config = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
        config_override = args.config.is_some(),
        layouts = layouts.len(),
        icons = icons.len(),
        width,
        height,
        "bootstrap_complete"
    );

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());
    let tick = TickEventSource::new(config.refresh_interval());
    let tick_cancel = tick.cancel_handle();
    let mut registry = EventSourceRegistry::new();
    registry.register(tick);
    let source_handles = registry.spawn_all(&tx);

    let parts = RuntimeParts {
        layouts,
        icons,
        style,
        size: (width, height),
        caps: TerminalCapabilities::detect(),
        quit_message: quit_message.clone(),
    };
    let mut runtime = KioskRuntime::new(parts, stdout(), tx, rx)?
        .with_tasks(source_handles, Some(tick_cancel))
        .with_input(input_task, input_shutdown);
    let reason = runtime.run().await?;

    drop(guard);
    if reason == ShutdownReason::ActionQuit {
        println!("{quit_message}");
    }
    drop(app.log_guard.take());
    Ok(())
}
