use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Terminal,
};
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use metricwatch::{events, server, ui, App, Fetcher, FileSource, HttpSource, SampleSource, Settings};

#[derive(Parser, Debug)]
#[command(name = "metricwatch")]
#[command(about = "Terminal dashboard for CPU and memory samples, with a CSV download endpoint")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// URL of the JSON sample source (overrides DATA_URL)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Read samples from a local JSON file instead of HTTP
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Listen address for the CSV endpoint
    #[arg(short, long)]
    listen: Option<String>,

    /// Refresh interval in seconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// CPU spike threshold
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Run the dashboard without the CSV endpoint
    #[arg(long, conflicts_with = "headless")]
    no_server: bool,

    /// Serve the CSV endpoint only, without the dashboard
    #[arg(long)]
    headless: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn settings(&self) -> Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref())?;

        if let Some(url) = &self.url {
            settings.data_url = url.clone();
        }
        if let Some(listen) = &self.listen {
            settings.listen_addr = listen.clone();
        }
        if let Some(refresh) = self.refresh {
            settings.refresh_secs = refresh;
        }
        if let Some(threshold) = self.threshold {
            settings.spike_threshold = threshold;
        }
        if let Some(path) = &self.log_file {
            settings.log_file = Some(path.clone());
        }

        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.settings()?;

    init_logging(&settings, args.headless)?;

    let source: Arc<dyn SampleSource> = match &args.file {
        Some(path) => Arc::new(FileSource::new(path)),
        None => Arc::new(
            HttpSource::builder()
                .url(settings.data_url.clone())
                .timeout(settings.request_timeout())
                .build()
                .context("failed to build HTTP client")?,
        ),
    };
    info!(source = source.description(), "sample source configured");

    let rt = Runtime::new()?;

    if args.headless {
        return rt.block_on(async {
            let listener = server::bind(&settings.listen_addr)
                .await
                .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
            server::serve(listener, source).await?;
            Ok(())
        });
    }

    if !args.no_server {
        // Bind before entering the TUI so failures are reported on a normal terminal.
        let listener = rt
            .block_on(server::bind(&settings.listen_addr))
            .with_context(|| format!("failed to bind {}", settings.listen_addr))?;
        let server_source = source.clone();
        rt.spawn(async move {
            if let Err(e) = server::serve(listener, server_source).await {
                error!(error = %e, "export endpoint stopped");
            }
        });
    }

    let fetcher = Fetcher::new(source, rt.handle().clone());
    run_tui(fetcher, &settings)
}

/// Install the tracing subscriber.
///
/// Headless mode logs to stderr. The dashboard owns the terminal, so it only
/// logs when a log file is configured.
fn init_logging(settings: &Settings, headless: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;

    if let Some(path) = &settings.log_file {
        let file = File::options()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

/// Run the TUI with the given fetcher
fn run_tui(fetcher: Fetcher, settings: &Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let mut app = App::new(fetcher, settings.refresh_interval(), settings.spike_threshold)
        .with_theme(ui::Theme::auto_detect());
    app.start();

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 20;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = Paragraph::new(msg)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow));
                let centered =
                    Rect::new(0, (area.height / 2).saturating_sub(2), area.width, 5u16.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            ui::draw(frame, app);
        })?;

        // Poll for events with a short timeout
        if let Some(Event::Key(key)) = events::poll_event(Duration::from_millis(100))? {
            events::handle_key_event(app, key);
        }

        app.tick(Instant::now());
        app.drain_results();
    }

    Ok(())
}
