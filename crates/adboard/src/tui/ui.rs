//! UI rendering for the TUI.

use adboard_dashboard::import::{ImportSnapshot, StepStatus, phase_steps};
use adboard_dashboard::{ChunkPager, Column, SummaryMetrics};
use adboard_report::{FilterField, FilterOptions, ReportQuery};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table};

use super::picker::Picker;
use super::state::DashboardState;

const HELP: &str =
    "n/p page  +/- size  d/m/f build  r reload  t range  R reset  x export  i import  q quit";

/// Widest a table column is drawn
const MAX_COLUMN_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, state: &DashboardState) {
    let import_open = state.import().is_some_and(|p| p.open);

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Length(3), // Summary cards
        Constraint::Length(1), // Query
        Constraint::Min(5),    // Table
    ];
    if import_open {
        constraints.push(Constraint::Length(10));
    }
    constraints.push(Constraint::Length(1)); // Status

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let header = Line::from(vec![
        Span::styled(" adboard ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(HELP, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    render_summary(frame, chunks[1], state.summary());
    frame.render_widget(
        Paragraph::new(query_text(state.query(), state.filter_options())),
        chunks[2],
    );
    render_table(frame, chunks[3], state.pager());
    if let Some(picker) = state.picker() {
        render_picker(frame, chunks[3], picker, state);
    }

    let mut next = 4;
    if import_open && let Some(panel) = state.import() {
        render_import(frame, chunks[next], &panel.snapshot());
        next += 1;
    }

    let status = match state.notice() {
        Some(notice) if notice.is_error => {
            Line::from(Span::styled(notice.text.clone(), Style::default().fg(Color::Red)))
        }
        Some(notice) => Line::from(notice.text.clone()),
        None => Line::from(status_text(state.pager())),
    };
    frame.render_widget(Paragraph::new(status), chunks[next]);
}

fn render_summary(frame: &mut Frame, area: Rect, summary: SummaryMetrics) {
    let cards = summary.cards();
    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), area) in cards.into_iter().zip(areas.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(Block::default().borders(Borders::ALL).title(label));
        frame.render_widget(card, *area);
    }
}

fn render_table(frame: &mut Frame, area: Rect, pager: &ChunkPager) {
    let columns = pager.columns();
    let page = pager.current_page();
    let size = pager.page_size();
    let rows = pager.page_rows();

    let cells: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| columns.iter().map(|c| c.render(row, page, size, i)).collect())
        .collect();

    let widths: Vec<Constraint> = column_widths(columns, &cells)
        .into_iter()
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let header = Row::new(columns.iter().map(|c| Cell::from(c.title.clone())))
        .style(Style::default().add_modifier(Modifier::BOLD));
    let body = cells.into_iter().map(|r| Row::new(r.into_iter().map(Cell::from)));

    let title = if pager.is_loading() {
        " Report (loading) ".to_string()
    } else if pager.is_appending() {
        " Report (loading more) ".to_string()
    } else {
        " Report ".to_string()
    };

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(table, area);
}

fn render_picker(frame: &mut Frame, area: Rect, picker: &Picker, state: &DashboardState) {
    let items = picker.items(state.query(), state.filter_options());
    let width = (area.width / 2).max(40).min(area.width);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    };
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(picker.title())
        .title_bottom(" space toggle  c clear  esc close ");
    let rows = popup.height.saturating_sub(2) as usize;

    let lines: Vec<Line> = if items.is_empty() {
        vec![Line::from(Span::styled(
            "  No values in this date range",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        items
            .iter()
            .enumerate()
            .skip(scroll_offset(picker.selected(), rows))
            .take(rows)
            .map(|(i, item)| {
                let current = i == picker.selected();
                let style = if current {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Line::from(Span::styled(
                    format!(
                        "{} [{}] {}",
                        if current { "▸" } else { " " },
                        if item.checked { "x" } else { " " },
                        item.label
                    ),
                    style,
                ))
            })
            .collect()
    };
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// First list row drawn so the highlighted one fits in `rows` lines
fn scroll_offset(selected: usize, rows: usize) -> usize {
    (selected + 1).saturating_sub(rows.max(1))
}

fn render_import(frame: &mut Frame, area: Rect, snapshot: &ImportSnapshot) {
    let block = Block::default().borders(Borders::ALL).title(format!(
        " Import {} ({:?}) ",
        snapshot.job_id.as_deref().unwrap_or("-"),
        snapshot.state
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(progress) = &snapshot.progress else {
        frame.render_widget(Paragraph::new("Uploading..."), inner);
        return;
    };

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let percent = progress.progress_percentage.clamp(0.0, 100.0) as u16;
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .percent(percent)
        .label(format!(
            "{}% {}/{} records, {} saved, {} errors",
            percent,
            progress.processed_records,
            progress.total_records,
            progress.saved_records,
            progress.error_records
        ));
    frame.render_widget(gauge, parts[0]);

    let steps: Vec<Line> = phase_steps(progress)
        .into_iter()
        .map(|step| {
            let (mark, style) = match step.status {
                StepStatus::Done => ("x", Style::default().fg(Color::Green)),
                StepStatus::Current => (">", Style::default().add_modifier(Modifier::BOLD)),
                StepStatus::Pending => (" ", Style::default().fg(Color::DarkGray)),
            };
            Line::from(Span::styled(format!("[{}] {}", mark, step.phase), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(steps), parts[1]);
}

/// One-line description of the query and the options known for its range
pub fn query_text(query: &ReportQuery, options: &FilterOptions) -> String {
    let range = match (query.date_range.start, query.date_range.end) {
        (Some(start), Some(end)) => format!("{} .. {}", start, end),
        (Some(start), None) => format!("{} ..", start),
        (None, Some(end)) => format!(".. {}", end),
        (None, None) => "-".to_string(),
    };
    let dims = if query.dimensions.is_empty() {
        "all".to_string()
    } else {
        query.dimensions.iter().map(|d| d.label()).collect::<Vec<_>>().join(", ")
    };
    let metrics = if query.metrics.is_empty() {
        "all".to_string()
    } else {
        query.metrics.iter().map(|m| m.label()).collect::<Vec<_>>().join(", ")
    };
    let filtered = FilterField::ALL
        .iter()
        .filter(|f| !query.filters.get(**f).is_empty())
        .count();

    format!(
        " {}  |  group by: {}  |  metrics: {}  |  filters: {}  |  {} apps, {} domains",
        range,
        dims,
        metrics,
        filtered,
        options.get(FilterField::AppNames).len(),
        options.get(FilterField::Domains).len()
    )
}

/// `page 3 of 12+  |  2000 rows loaded  |  total 2001`
pub fn status_text(pager: &ChunkPager) -> String {
    format!(
        " page {} of {}{}  |  {} rows loaded  |  total {}  |  {} per page",
        pager.current_page(),
        pager.page_count(),
        if pager.has_more() { "+" } else { "" },
        pager.rows().len(),
        pager.reported_total(),
        pager.page_size()
    )
}

/// Widest cell per column, capped
pub fn column_widths(columns: &[Column], cells: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .filter_map(|r| r.get(i))
                .map(|s| s.chars().count())
                .chain(std::iter::once(c.title.chars().count()))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect()
}
