//! Terminal setup and teardown around the interactive app.

use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::CrosstermBackend, Terminal};

use crate::config::Config;
use crate::error::Result;
use crate::store::{KeyValueStore, RecordStore};
use crate::tui::app::App;

/// Open `board_id` and run the interface until the user quits.
pub fn run_tui<S: KeyValueStore>(store: &RecordStore<S>, config: &Config, board_id: &str) -> Result<()> {
    // Load before touching the terminal so an unknown board reports normally.
    let mut app = App::new(store, config, board_id)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(())
}
