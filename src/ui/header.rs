use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::format::{format_kb, format_uptime};
use crate::system::host::{HostInfo, HostLoad};
use crate::system::meminfo::MemInfo;
use crate::ui::theme::Theme;

pub struct HeaderData<'a> {
    pub host: &'a HostInfo,
    pub load: &'a HostLoad,
    pub memory: Option<&'a MemInfo>,
    pub refresh_secs: u64,
    pub considered: usize,
    pub now: &'a DateTime<Local>,
}

pub fn render(frame: &mut Frame, area: Rect, data: &HeaderData, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default().fg(theme.text_primary);

    let branding = Line::from(vec![
        Span::styled(
            " topcpu ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("CPU: ", label),
        Span::styled(data.host.cpu_model.as_str(), value),
        Span::styled("  Cores: ", label),
        Span::styled(data.host.logical_cores.to_string(), value),
        Span::raw("  "),
        Span::styled(data.now.format("%a %b %e %H:%M:%S %Y").to_string(), value),
    ]);

    let [one, five, fifteen] = data.load.load_average;
    let load = Line::from(vec![
        Span::styled("Uptime: ", label),
        Span::styled(format_uptime(data.load.uptime_secs), value),
        Span::styled("  Load Average (1,5,15 min): ", label),
        Span::styled(format!("{one:.2} {five:.2} {fifteen:.2}"), value),
    ]);

    let memory = match data.memory {
        Some(mem) => format!(
            "{:.2}% ({} / {})",
            mem.used_percent(),
            format_kb(mem.used_kb()),
            format_kb(mem.total_kb)
        ),
        None => "n/a".to_string(),
    };
    let usage = Line::from(vec![
        Span::styled("Memory Usage: ", label),
        Span::styled(memory, value),
        Span::styled("  Refresh: ", label),
        Span::styled(format!("{}s", data.refresh_secs), value),
        Span::styled("  Procs: ", label),
        Span::styled(data.considered.to_string(), value),
    ]);

    frame.render_widget(Paragraph::new(vec![branding, load, usage]), inner);
}
