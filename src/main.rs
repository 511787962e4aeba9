mod app;
mod config;
mod constants;
mod display;
mod graphics;
mod input;
mod logging;
mod overlay;
mod player;
mod print;
mod render;
mod results;
mod screen;
mod session;
mod theme;
mod thumbnails;
mod transport;
mod ui;
mod view;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
  },
};
use std::time::Duration;
use tracing::info;

use app::App;
use config::Config;
use display::CliDisplayMode;
use print::PlainView;
use session::{SearchSession, SubmitOutcome};
use transport::HttpTransport;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Search backend URL (default: prefs.toml, then the built-in endpoint)
  #[arg(short, long)]
  endpoint: Option<String>,

  /// Maximum results requested per page
  #[arg(short, long)]
  max_per_page: Option<u32>,

  /// Thumbnail preview mode: 'auto', 'direct' (half-block colour) or 'ascii'
  #[arg(short, long, default_value = "auto")]
  display_mode: CliDisplayMode,

  /// Run a single search, print the results and exit
  #[arg(short, long)]
  query: Option<String>,

  /// Print shell completions and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "mediasearch", &mut std::io::stdout());
    return Ok(());
  }

  let _log_guard = logging::init()?;
  let config = Config::load();
  let endpoint = config.resolve_endpoint(args.endpoint.as_deref());
  let max_per_page = config.resolve_max_per_page(args.max_per_page);
  info!(endpoint = %endpoint, max_per_page, "starting");
  let session = SearchSession::new(HttpTransport::new(), endpoint, max_per_page);

  if let Some(query) = args.query {
    return run_once(session, &query).await;
  }

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  execute!(std::io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
  let display_mode = display::resolve_display_mode(args.display_mode);
  let mut app = App::new(session, config, display_mode);
  let result = run(&mut terminal, &mut app);
  app.shutdown();
  let _ = execute!(std::io::stdout(), DisableMouseCapture);
  ratatui::restore();
  result
}

/// One search through the same session, printed line by line.
async fn run_once(mut session: SearchSession<HttpTransport>, query: &str) -> Result<()> {
  let mut view = PlainView::new(std::io::stdout().lock(), std::io::stderr().lock());
  match session.submit(query, &mut view) {
    SubmitOutcome::Started => {}
    SubmitOutcome::EmptyQuery => anyhow::bail!("Enter a search term."),
    SubmitOutcome::Rejected => anyhow::bail!("A search is already in flight."),
  }
  if let Some(Err(e)) = session.settle(&mut view).await {
    return Err(e).context("Search failed");
  }
  Ok(())
}

fn run(terminal: &mut DefaultTerminal, app: &mut App<HttpTransport>) -> Result<()> {
  loop {
    app.check_pending();

    terminal.draw(|frame| ui::ui(frame, app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key_event(app, key),
        Event::Mouse(mouse) => input::handle_mouse_event(app, mouse),
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
