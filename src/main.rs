use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use flexi_logger::{FileSpec, Logger, LoggerHandle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

mod app;
mod corpus;
mod dates;
mod locale;
mod models;
mod overlay;
mod storage;
mod ui;

use app::{App, AppConfig};
use corpus::CorpusSource;
use storage::PrefStore;

// Assumed cell width when the terminal does not report pixel dimensions.
const CELL_WIDTH_PX: u16 = 8;

#[derive(Parser)]
#[command(
    name = "quotetab",
    version,
    about = "Daily rotating quote for your terminal"
)]
struct Args {
    /// Load quotes from a local JSON file instead of the built-in set
    #[arg(long, value_name = "PATH", conflicts_with = "corpus_url")]
    corpus: Option<PathBuf>,

    /// Fetch quotes from a URL (JSON array); the last good fetch is cached
    #[arg(long, value_name = "URL")]
    corpus_url: Option<String>,

    /// Start the session at a day offset relative to today
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    offset: i64,

    /// Write diagnostics to ~/.quotetab-logs/ and show the index panel
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let _logger = if args.debug {
        Some(init_diagnostics()?)
    } else {
        None
    };

    let source = if let Some(path) = args.corpus {
        CorpusSource::File(path)
    } else if let Some(url) = args.corpus_url {
        CorpusSource::Remote(url)
    } else {
        CorpusSource::Bundled
    };
    let corpus = corpus::load(&source);

    let debug_panel = args.debug || cfg!(debug_assertions);

    let mut stdout = std::io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(
        corpus,
        PrefStore::open_default(),
        AppConfig {
            locale_tags: storage::preferred_locale_tags(),
            viewport_width: viewport_width(),
            system_prefers_dark: ambient_prefers_dark(),
            initial_offset: args.offset,
            debug_panel,
        },
        app::local_today,
    );

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(120))? {
            match event::read()? {
                Event::Key(key) => app.handle_key_event(key),
                Event::Resize(..) => app.set_viewport_width(viewport_width()),
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn init_diagnostics() -> Result<LoggerHandle, Box<dyn Error>> {
    let mut dir = dirs::home_dir().ok_or("Home directory not found")?;
    dir.push(".quotetab-logs");
    let handle = Logger::try_with_str("debug")?
        .log_to_file(FileSpec::default().directory(&dir).basename("quotetab"))
        .append()
        .start()?;
    Ok(handle)
}

/// Viewport width in pixel units: the terminal-reported pixel width when
/// available, else columns scaled by an assumed cell width.
fn viewport_width() -> u16 {
    match crossterm::terminal::window_size() {
        Ok(size) if size.width > 0 => size.width,
        _ => crossterm::terminal::size()
            .map(|(columns, _)| columns.saturating_mul(CELL_WIDTH_PX))
            .unwrap_or(0),
    }
}

fn ambient_prefers_dark() -> bool {
    prefers_dark_from(std::env::var("COLORFGBG").ok().as_deref())
}

// COLORFGBG is "<fg>;<bg>"; backgrounds 7 and 15 are the light palettes.
// Terminals that do not advertise a palette are treated as dark.
fn prefers_dark_from(colorfgbg: Option<&str>) -> bool {
    match colorfgbg {
        Some(value) => {
            let background = value.rsplit(';').next().unwrap_or("");
            !matches!(background.trim(), "7" | "15")
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_backgrounds_disable_the_dark_default() {
        assert!(!prefers_dark_from(Some("0;15")));
        assert!(!prefers_dark_from(Some("0;7")));
    }

    #[test]
    fn dark_or_unknown_backgrounds_prefer_dark() {
        assert!(prefers_dark_from(Some("15;0")));
        assert!(prefers_dark_from(Some("")));
        assert!(prefers_dark_from(None));
    }
}
