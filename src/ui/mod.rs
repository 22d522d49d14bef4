pub mod header;
pub mod process_table;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;
use crate::system::source::ProcSource;

pub fn draw<S: ProcSource>(frame: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let header_data = header::HeaderData {
        host: &app.host,
        load: &app.load,
        memory: app.memory.as_ref(),
        refresh_secs: app.refresh_secs,
        considered: app.report.considered,
        now: &app.now,
    };
    header::render(frame, chunks[0], &header_data, &app.theme);

    process_table::render(
        frame,
        chunks[1],
        &app.report.ranked,
        app.collector.top_n(),
        app.paused,
        &app.theme,
    );

    statusbar::render(
        frame,
        chunks[2],
        &app.keybinds.hints(),
        app.paused,
        &app.theme,
    );
}
