mod app_logic;
mod app_state;
mod event_handler;
mod ui_renderer;

pub use app_logic::TuiApp;
pub use self::terminal::run_tui;

mod terminal {
    use super::app_logic::TuiApp;
    use super::event_handler::handle_events;
    use super::ui_renderer::ui_frame;
    use crate::lister::DirectoryLister;
    use crate::tree::TreeSession;
    use anyhow::Result;
    use crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::prelude::{CrosstermBackend, Terminal};
    use std::io::{self, Stdout};

    /// Runs the interactive tree until the user confirms or quits. Returns the
    /// session on confirmation.
    pub fn run_tui<L: DirectoryLister>(
        session: TreeSession<L>,
        summary_limit: usize,
    ) -> Result<Option<TreeSession<L>>> {
        let mut app = TuiApp::new(session, summary_limit);

        let mut terminal = init_terminal()?;
        let outcome = event_loop(&mut terminal, &mut app);
        restore_terminal(terminal)?;
        outcome?;

        if app.confirmed {
            Ok(Some(app.into_session()))
        } else {
            Ok(None)
        }
    }

    fn event_loop<L: DirectoryLister>(
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        app: &mut TuiApp<L>,
    ) -> Result<()> {
        while !app.quit {
            terminal.draw(|frame| ui_frame(frame, app))?;
            handle_events(app)?;
        }
        Ok(())
    }

    fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend).map_err(Into::into)
    }

    fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor().map_err(Into::into)
    }
}
