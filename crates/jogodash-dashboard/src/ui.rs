//! Dashboard drawing

use crate::app::{App, NO_DISTRIBUTION_NOTICE, NO_GAMES_NOTICE, RATING_MAX};
use jogodash_library::{CatalogSource, DisplayMode, GameRecord};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, List, ListItem, Paragraph, Wrap},
};

/// Bar values are ratings scaled by this factor
const BAR_SCALE: f64 = 10.0;
const BAR_WIDTH: u16 = 9;
const BAR_GAP: u16 = 1;

/// Low-to-high rating colour stops (purple, teal, yellow)
const RATING_STOPS: [(u8, u8, u8); 3] = [(68, 1, 84), (33, 145, 140), (253, 231, 37)];

/// Colour for a rating on the 0..=5 scale
pub fn rating_color(rating: f64) -> Color {
    let t = if rating.is_finite() {
        (rating / RATING_MAX).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (lo, hi, local) = if t <= 0.5 {
        (RATING_STOPS[0], RATING_STOPS[1], t * 2.0)
    } else {
        (RATING_STOPS[1], RATING_STOPS[2], (t - 0.5) * 2.0)
    };
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * local).round() as u8;

    Color::Rgb(mix(lo.0, hi.0), mix(lo.1, hi.1), mix(lo.2, hi.2))
}

/// Cut `text` to `width` characters, marking the cut
pub fn truncate_label(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(width - 1).collect();
    out.push('…');
    out
}

/// Draw the UI
pub fn draw_ui<S: CatalogSource>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Footer
        ])
        .split(frame.size());

    draw_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(0)])
        .split(chunks[1]);

    draw_filters(frame, body[0], app);
    draw_dashboard(frame, body[1], app);

    draw_footer(frame, chunks[2], app);
}

fn draw_header<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let header = Paragraph::new(format!("🎮 {}", app.title))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Sidebar: genre list, minimum rating and display mode
fn draw_filters<S: CatalogSource>(frame: &mut Frame, area: Rect, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Genres
            Constraint::Length(3), // Minimum rating
            Constraint::Length(4), // Display mode
        ])
        .split(area);

    let items: Vec<ListItem> = app
        .genres
        .iter()
        .map(|genre| ListItem::new(genre.as_str()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("🔍 Filtrar por Gênero"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], &mut app.genre_state);

    let slider = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Nota mínima (rating)"),
        )
        .gauge_style(Style::default().fg(rating_color(app.min_rating)))
        .ratio((app.min_rating / RATING_MAX).clamp(0.0, 1.0))
        .label(format!("{:.1}", app.min_rating));
    frame.render_widget(slider, chunks[1]);

    let lines: Vec<Line> = [DisplayMode::All, DisplayMode::Top10]
        .iter()
        .map(|mode| {
            let marker = if *mode == app.mode { "(•) " } else { "( ) " };
            Line::from(format!("{}{}", marker, mode.label()))
        })
        .collect();
    let radio =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Mostrar:"));
    frame.render_widget(radio, chunks[2]);
}

fn draw_dashboard<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let notice = app.view.shortfall_notice();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if notice.is_some() { 1 } else { 0 }),
            Constraint::Length(4),  // Metrics
            Constraint::Min(8),     // Bar chart
            Constraint::Length(12), // Genre distribution
        ])
        .split(area);

    if let Some(notice) = notice {
        let line = Paragraph::new(notice).style(Style::default().fg(Color::Yellow));
        frame.render_widget(line, chunks[0]);
    }

    draw_metrics(frame, chunks[1], app);
    draw_ratings(frame, chunks[2], &app.view.outcome.games);
    draw_distribution(frame, chunks[3], app);
}

/// Two-metric summary row
fn draw_metrics<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let metric = |label: &str, value: String| {
        Paragraph::new(vec![
            Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL).title(label.to_string()))
    };

    frame.render_widget(
        metric("🎮 Jogos encontrados", app.view.summary.count.to_string()),
        cols[0],
    );
    frame.render_widget(
        metric("⭐ Nota média", app.view.summary.average.to_string()),
        cols[1],
    );
}

/// Rating ranking, one bar per game in filter order
fn draw_ratings(frame: &mut Frame, area: Rect, games: &[GameRecord]) {
    if games.is_empty() {
        let warning = Paragraph::new(NO_GAMES_NOTICE)
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title("⭐ Avaliação dos Jogos"))
            .wrap(Wrap { trim: true });
        frame.render_widget(warning, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let fits = (inner_width / (BAR_WIDTH + BAR_GAP)).max(1) as usize;
    let shown = &games[..games.len().min(fits)];

    let bars: Vec<Bar> = shown
        .iter()
        .map(|game| {
            let rating = game.rating.unwrap_or(0.0);
            Bar::default()
                .value((rating.max(0.0) * BAR_SCALE).round() as u64)
                .text_value(format!("{:.1}", rating))
                .label(Line::from(truncate_label(&game.title, BAR_WIDTH as usize)))
                .style(Style::default().fg(rating_color(rating)))
                .value_style(Style::default().fg(Color::Black).bg(rating_color(rating)))
        })
        .collect();

    let title = if shown.len() < games.len() {
        format!("⭐ Ranking dos Jogos ({} de {})", shown.len(), games.len())
    } else {
        "⭐ Ranking dos Jogos".to_string()
    };

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP)
        .max((RATING_MAX * BAR_SCALE) as u64)
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

/// Genre share of the filtered games, one gauge per genre
fn draw_distribution<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("🧩 Distribuição dos Gêneros");

    let distribution = &app.view.distribution;
    if distribution.is_insufficient() {
        let info = Paragraph::new(NO_DISTRIBUTION_NOTICE)
            .style(Style::default().fg(Color::Blue))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(info, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); distribution.slices().len()])
        .split(inner);

    for (i, (slice, row)) in distribution.slices().iter().zip(rows.iter()).enumerate() {
        let share = distribution.share(slice);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(SLICE_COLORS[i % SLICE_COLORS.len()]))
            .ratio(share.clamp(0.0, 1.0))
            .label(format!(
                "{} · {} ({:.0}%)",
                slice.genre,
                slice.count,
                share * 100.0
            ))
            .use_unicode(true);
        frame.render_widget(gauge, *row);
    }
}

const SLICE_COLORS: [Color; 10] = [
    Color::Rgb(99, 110, 250),
    Color::Rgb(239, 85, 59),
    Color::Rgb(0, 204, 150),
    Color::Rgb(171, 99, 250),
    Color::Rgb(255, 161, 90),
    Color::Rgb(25, 211, 243),
    Color::Rgb(255, 102, 146),
    Color::Rgb(182, 232, 128),
    Color::Rgb(255, 151, 255),
    Color::Rgb(254, 203, 82),
];

/// Draw footer
fn draw_footer<S>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let help_text = "[↑↓] Gênero  [←→] Nota  [Tab] Mostrar  [R] Recarregar  [Q] Sair";

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));

    let status = Paragraph::new(app.status.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(help, chunks[0]);
    frame.render_widget(status, chunks[1]);
}
