//! gravity-tui - TUI frontend for gravity using Ratatui

pub mod app;
pub mod components;
pub mod empty_state;
pub mod tabs;
pub mod theme;
pub mod ui;

pub use app::App;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gravity_core::{AlertsStore, ColorScheme};
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Run the TUI application
///
/// The caller owns the refresher and watcher feeding `store`. Returns the
/// color scheme in effect on exit so it can be persisted.
pub async fn run(store: Arc<AlertsStore>, color_scheme: ColorScheme) -> Result<ColorScheme> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(store, color_scheme);
    let mut ui = ui::Ui::new();

    let result = run_loop(&mut terminal, &mut app, &mut ui).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result.map(|_| app.color_scheme)
}

async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, ui: &mut ui::Ui) -> Result<()>
where
    <B as Backend>::Error: Send + Sync + 'static,
{
    ui.mount(app);
    info!("Alerts tab mounted");

    loop {
        // Check for store events
        app.poll_events();

        // Redraw every tick so the spinner keeps moving
        terminal.draw(|f| ui.render(f, app))?;

        // Handle input with timeout for event polling
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Global keys first, unless a field is capturing input
                    let handled = !ui.is_editing() && app.handle_key(key.code, key.modifiers);

                    if !handled {
                        ui.handle_tab_key(key.code, app);
                    }
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Moved => {
                    ui.handle_mouse_move(mouse.column, mouse.row);
                }
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }

        tokio::task::yield_now().await;
    }
}
