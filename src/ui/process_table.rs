use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use crate::format::{format_percent, truncate_unicode};
use crate::system::rank::RankedEntry;
use crate::ui::theme::Theme;

const PID_WIDTH: u16 = 8;
const CPU_WIDTH: u16 = 8;

/// Renders the ranked processes, or a "Paused" notice in their place.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    ranked: &[RankedEntry],
    top_n: usize,
    paused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            format!(" Top {top_n} processes by CPU usage "),
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    if paused {
        let notice = Paragraph::new(Span::styled(
            " Paused ",
            Style::default()
                .fg(theme.paused_fg)
                .bg(theme.paused_bg)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(notice, area);
        return;
    }

    let name_width = area
        .width
        .saturating_sub(PID_WIDTH + CPU_WIDTH + 4)
        .max(1) as usize;

    let header = Row::new(vec![
        Cell::from("PID"),
        Cell::from("CPU%"),
        Cell::from("Name"),
    ])
    .style(
        Style::default()
            .fg(theme.text_secondary)
            .add_modifier(Modifier::BOLD),
    );

    let rows = ranked.iter().map(|entry| {
        Row::new(vec![
            Cell::from(entry.pid.to_string()),
            Cell::from(format_percent(entry.cpu_percent))
                .style(Style::default().fg(theme.heat(entry.cpu_percent))),
            Cell::from(truncate_unicode(&entry.name, name_width)),
        ])
        .style(Style::default().fg(theme.text_primary))
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(PID_WIDTH),
            Constraint::Length(CPU_WIDTH),
            Constraint::Min(1),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}
