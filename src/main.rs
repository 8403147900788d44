#[cfg(feature = "gui")]
mod app;

use std::path::PathBuf;
use std::sync::Arc;

use amcham_directory::{
    DirectoryApiClient, Effect, Language, ScreenContext, Session, StatisticsScreen, SystemClock,
    config::AppConfig,
};
use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[cfg(feature = "gui")]
use crate::app::{DirectoryApp, Message};

#[derive(Parser, Debug)]
#[command(name = "amcham-directory")]
#[command(about = "AmCham directory member console - GUI or headless statistics")]
struct Args {
    /// Load the statistics dashboard once and log a summary (no window)
    #[arg(long)]
    headless: bool,

    /// Interface language, overrides the configuration (fr or en)
    #[arg(long)]
    lang: Option<Language>,

    /// Write the daily views series to CSV (headless mode only)
    #[arg(long)]
    export_csv: bool,

    /// Directory for the CSV export, defaults to the download directory
    #[arg(long, requires = "export_csv")]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    #[cfg(feature = "gui")]
    let filter = if args.headless {
        EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
            .parse_lossy("amcham_directory=debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
            .parse_lossy("amcham_directory=debug,fontdb=error,wgpu=warn,naga=warn")
    };

    #[cfg(not(feature = "gui"))]
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("amcham_directory=debug");

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let lang = match args.lang {
        Some(lang) => lang,
        None => config
            .ui
            .language
            .parse()
            .context("Invalid ui.language in configuration")?,
    };
    let config = Arc::new(config);

    if args.headless {
        let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        run_headless(rt, config, lang, &args)
    } else {
        #[cfg(feature = "gui")]
        {
            run_gui(config, lang)
        }
        #[cfg(not(feature = "gui"))]
        {
            anyhow::bail!("GUI mode not available. Build with --features gui or run with --headless")
        }
    }
}

fn screen_context(config: &AppConfig) -> Result<ScreenContext> {
    let api = DirectoryApiClient::new(config.api.base_url.clone(), &config.network)?;
    let session = Session::from_config(&config.session);
    if session.is_none() {
        tracing::warn!("No session token configured, member screens will ask for login");
    }
    Ok(ScreenContext::new(
        api,
        session,
        Arc::new(SystemClock),
        config.timing.clone(),
    ))
}

/// Load the statistics dashboard once, log it and optionally export the views.
fn run_headless(
    rt: tokio::runtime::Runtime,
    config: Arc<AppConfig>,
    lang: Language,
    args: &Args,
) -> Result<()> {
    rt.block_on(async {
        tracing::info!("Starting AmCham directory in headless mode");
        let ctx = screen_context(&config)?;
        tracing::info!(base_url = ctx.api.base_url(), "API client initialized");

        let mut screen = StatisticsScreen::new(lang);
        if let Some(Effect::RedirectToLogin { .. }) = screen.load(&ctx).await {
            anyhow::bail!("Session rejected, log in again to refresh the token");
        }
        if let Some(err) = &screen.error {
            anyhow::bail!("Statistics unavailable: {}", err.localized(lang));
        }

        for card in screen.metrics() {
            tracing::info!(
                "{}: {} ({} {})",
                card.title,
                card.value,
                card.growth,
                card.period
            );
        }
        let pie = screen.pie_chart();
        for (i, slice) in pie.slices.iter().enumerate() {
            if let Some(tooltip) = pie.tooltip(i) {
                tracing::info!("{}: {}", slice.label, tooltip);
            }
        }

        if args.export_csv {
            let dir = args
                .output_dir
                .clone()
                .unwrap_or_else(StatisticsScreen::default_export_dir);
            let path = screen.export_csv(&dir, ctx.clock.as_ref()).await?;
            tracing::info!("Exported views to {}", path.display());
        }
        Ok(())
    })
}

/// Run in GUI mode - desktop application
#[cfg(feature = "gui")]
fn run_gui(config: Arc<AppConfig>, lang: Language) -> Result<()> {
    let ctx = screen_context(&config)?;

    let window_width = config.window.width;
    let window_height = config.window.height;

    let app = iced::application(
        move || DirectoryApp::new(ctx.clone(), config.clone(), lang),
        update,
        view,
    )
    .title("AmCham Directory")
    .subscription(subscription)
    .theme(theme)
    .window(iced::window::Settings {
        size: iced::Size::new(window_width, window_height),
        ..Default::default()
    })
    .antialiasing(true);

    app.run().context("Failed to run application")?;

    Ok(())
}

#[cfg(feature = "gui")]
fn update(app: &mut DirectoryApp, message: Message) -> iced::Task<Message> {
    app.update(message)
}

#[cfg(feature = "gui")]
fn view(app: &DirectoryApp) -> iced::Element<'_, Message> {
    app.view()
}

#[cfg(feature = "gui")]
fn subscription(app: &DirectoryApp) -> iced::Subscription<Message> {
    app.subscription()
}

#[cfg(feature = "gui")]
fn theme(app: &DirectoryApp) -> iced::Theme {
    app.theme()
}
