use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use remote::{HttpConfig, HttpInitError};
use services::{AppServices, CardService, LogPresenter, QuizController};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context, channel};

#[derive(Parser, Debug)]
#[command(name = "flashquiz", about = "Flashcard quiz desktop client")]
struct Args {
    /// Base URL of the flashcard quiz service.
    #[arg(
        long,
        env = "FLASHQUIZ_SERVER_URL",
        default_value = "http://127.0.0.1:8000",
        global = true
    )]
    server_url: String,

    /// How long answer feedback stays up before the next question.
    #[arg(
        long,
        env = "FLASHQUIZ_REVEAL_DELAY_MS",
        default_value_t = 2000,
        global = true
    )]
    reveal_delay_ms: u64,

    #[arg(long, default_value_t = 10, global = true)]
    request_timeout_secs: u64,

    /// Skip adding sample cards when the deck is empty at launch.
    #[arg(long, global = true)]
    no_sample_cards: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Open the desktop window (default).
    Ui,
    /// Add the sample cards if the deck is empty, then exit.
    Seed,
}

impl Args {
    fn http_config(&self) -> Result<HttpConfig, HttpInitError> {
        Ok(HttpConfig::new(&self.server_url)?
            .with_timeout(Duration::from_secs(self.request_timeout_secs)))
    }

    fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}

struct DesktopApp {
    services: AppServices,
    seed_samples_on_launch: bool,
}

impl UiApp for DesktopApp {
    fn card_service(&self) -> Arc<CardService> {
        self.services.card_service()
    }

    fn quiz_controller(&self) -> QuizController {
        self.services.quiz_controller()
    }

    fn seed_samples_on_launch(&self) -> bool {
        self.seed_samples_on_launch
    }
}

fn launch_ui(args: &Args, config: HttpConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (presenter, events) = channel();
    let services = AppServices::new_http(config, Arc::new(presenter), args.reveal_delay())?;
    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        services,
        seed_samples_on_launch: !args.no_sample_cards,
    });
    let context = build_app_context(&app, events);

    info!(server = %args.server_url, "launching desktop ui");

    // Some dev setups default the window to always-on-top.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Flashquiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn seed(args: &Args, config: HttpConfig) -> Result<(), Box<dyn std::error::Error>> {
    let services = AppServices::new_http(config, Arc::new(LogPresenter), args.reveal_delay())?;
    let added = services.card_service().seed_samples_if_empty().await?;
    if added == 0 {
        println!("deck at {} already has cards; nothing added", args.server_url);
    } else {
        println!("added {added} sample cards to {}", args.server_url);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.http_config()?;

    match args.command.unwrap_or(Command::Ui) {
        Command::Ui => launch_ui(&args, config),
        Command::Seed => seed(&args, config).await,
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
