mod app;
mod config;
mod input;
mod llm;
mod logging;
mod starfield;
mod types;
mod ui;

use app::App;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Star timer period.
const STAR_TICK: Duration = Duration::from_millis(80);
/// Upper bound on how long a finished search waits to be picked up.
const ANSWER_POLL: Duration = Duration::from_millis(20);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = logging::init();

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    match &log_file {
        Ok(path) => info!(log = %path.display(), "AstroScholar starting"),
        Err(e) => warn!(error = %e, "logging disabled"),
    }

    let result = run_app(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }
    info!("AstroScholar stopped");

    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (cols, rows) = terminal::size()?;
    let mut app = App::new(cols, rows);
    let mut next_tick = Instant::now() + STAR_TICK;

    loop {
        app.poll_answers();

        // Ticks only request frames; bursts collapse into one draw here.
        if app.take_redraw() {
            terminal.draw(|f| ui::draw(f, &app))?;
        }

        let mut timeout = next_tick.saturating_duration_since(Instant::now());
        if app.search == types::SearchState::Searching {
            timeout = timeout.min(ANSWER_POLL);
        }

        if event::poll(timeout)? {
            match event::read()? {
                // Only handle key press events, ignore release/repeat
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(&mut app, key);
                    app.request_redraw();
                }
                Event::Resize(cols, rows) => {
                    app.resize(cols, rows);
                }
                _ => {}
            }
        }

        // Let the runtime drive the in-flight request between polls.
        tokio::task::yield_now().await;

        let now = Instant::now();
        if now >= next_tick {
            app.on_tick(now);
            next_tick = now + STAR_TICK;
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
