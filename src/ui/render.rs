//! Dashboard rendering.
//!
//! Everything drawn is a function of [`DashboardView`]; the only UI-local
//! state is the table scroll position in [`TableState`].

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table, TableState, Wrap};

use super::format::{event_cells, format_count};
use crate::domain::{LiveState, PollState};
use crate::service::{DisplayList, reconcile};

/// Text shown instead of an empty table.
pub const EMPTY_TABLE_TEXT: &str = "No events yet. Start the producer.";

const COLUMNS: [&str; 5] = ["Order ID", "Status", "Payment type", "Amount", "Purchase time"];

/// Read-only inputs of one frame.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    /// Poller state: counters, fallback history, reachability error.
    pub poll: &'a PollState,
    /// Stream state: live buffer and connection badge.
    pub live: &'a LiveState,
    /// Configured API base, named in the error banner.
    pub api_base: &'a str,
}

impl<'a> DashboardView<'a> {
    /// Rows to display, per the live-over-snapshot precedence.
    #[must_use]
    pub fn display(&self) -> DisplayList<'a> {
        reconcile(&self.live.buffer, &self.poll.snapshot)
    }

    /// Banner text while the backend is unreachable.
    #[must_use]
    pub fn banner(&self) -> Option<String> {
        if !self.poll.is_failing() {
            return None;
        }
        self.poll.error.as_ref().map(|reason| {
            format!(
                "Cannot reach backend: {reason}. Is it running at {}?",
                self.api_base
            )
        })
    }
}

/// Draws the whole dashboard into `frame`.
pub fn render(frame: &mut Frame, view: &DashboardView<'_>, table_state: &mut TableState) {
    let banner = view.banner();
    let banner_height = if banner.is_some() { 3 } else { 0 };

    let [header, banner_area, stats, table, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(banner_height),
        Constraint::Length(4),
        Constraint::Min(5),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, view);
    if let Some(text) = banner {
        frame.render_widget(
            Paragraph::new(text)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Red))
                .block(Block::bordered().border_style(Style::default().fg(Color::Red))),
            banner_area,
        );
    }
    render_stats(frame, stats, view.poll);

    let display = view.display();
    render_events(frame, table, &display, table_state);
    let selected = table_state
        .selected()
        .and_then(|index| display.rows().nth(index))
        .map(|(key, _)| key.to_string());
    render_footer(frame, footer, view.poll, selected.as_deref());
}

fn render_header(frame: &mut Frame, area: Rect, view: &DashboardView<'_>) {
    let connection = view.live.connection;
    let (dot, color) = if connection.is_live() {
        ("● ", Color::Green)
    } else {
        ("○ ", Color::Yellow)
    };

    let [title, badge] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(16)]).areas(area);

    let heading = Line::from(vec![
        Span::styled(
            "Real-time Analytics",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            "Orders × Payments join stream",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(heading).block(Block::bordered()), title);

    let badge_line = Line::from(vec![
        Span::styled(dot, Style::default().fg(color)),
        Span::raw(connection.badge()),
    ]);
    frame.render_widget(
        Paragraph::new(badge_line)
            .centered()
            .block(Block::bordered()),
        badge,
    );
}

fn render_stats(frame: &mut Frame, area: Rect, poll: &PollState) {
    let snapshot = &poll.snapshot;
    let cards = [
        ("Orders seen", snapshot.orders_seen),
        ("Payments seen", snapshot.payments_seen),
        ("Joined events", snapshot.joined_count),
    ];
    let areas: [Rect; 3] = Layout::horizontal([Constraint::Ratio(1, 3); 3]).areas(area);

    for ((label, value), card) in cards.into_iter().zip(areas) {
        let text = vec![
            Line::from(format_count(value)).bold(),
            Line::from(label).fg(Color::DarkGray),
        ];
        frame.render_widget(Paragraph::new(text).block(Block::bordered()), card);
    }
}

fn render_events(
    frame: &mut Frame,
    area: Rect,
    display: &DisplayList<'_>,
    table_state: &mut TableState,
) {
    let block = Block::bordered().title(format!(
        " Joined events ({}) ",
        display.source().label()
    ));

    if display.is_empty() {
        table_state.select(None);
        frame.render_widget(
            Paragraph::new(EMPTY_TABLE_TEXT)
                .centered()
                .fg(Color::DarkGray)
                .block(block),
            area,
        );
        return;
    }

    if let Some(selected) = table_state.selected()
        && selected >= display.len()
    {
        table_state.select(display.len().checked_sub(1));
    }

    let rows = display.events().iter().map(|event| {
        let [id, status, payment_type, amount, purchased] = event_cells(event);
        Row::new(vec![
            Cell::from(id),
            Cell::from(status),
            Cell::from(payment_type),
            Cell::from(Line::from(amount).right_aligned()),
            Cell::from(purchased).fg(Color::DarkGray),
        ])
    });

    let header = Row::new(COLUMNS.map(Cell::from))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Min(19),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(table, area, table_state);
}

// `selected` is the row key of the highlighted row.
fn render_footer(frame: &mut Frame, area: Rect, poll: &PollState, selected: Option<&str>) {
    let updated = poll.last_success.map_or_else(
        || "never".to_string(),
        |at| at.with_timezone(&Local).format("%H:%M:%S").to_string(),
    );
    let mut spans = vec![Span::raw(format!(" updated {updated}"))];
    if let Some(key) = selected {
        spans.push(Span::raw(format!("  ·  row {key}")));
    }
    spans.push(Span::styled(
        "  ·  q quit  ·  ↑↓ PgUp PgDn Home scroll",
        Style::default().fg(Color::DarkGray),
    ));
    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line), area);
}
