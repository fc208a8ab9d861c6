pub mod charting;
pub mod screen;

use bunnybash::{
    actor::{ActorKind, StrikeAnim},
    render::{ActorView, FrameView},
    session::Phase,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Axis, Chart, Dataset, GraphType, Paragraph, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

const BENIGN_SPRITE: [&str; 4] = [" (\\_/) ", " (o.o) ", " (> <) ", " /   \\ "];
const HOSTILE_SPRITE: [&str; 4] = [" (\\_/) ", " (>.<) ", " (# #) ", " /   \\ "];
const HOLE: &str = "(_______)";

pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let view = FrameView::capture(&self.game);
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        if self.flash_frames > 0 {
            buf.set_style(area, Style::default().bg(Color::Red));
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // status
                Constraint::Min(1),    // board
                Constraint::Length(1), // legend
            ])
            .split(area);

        let status = Paragraph::new(Span::styled(status_line(&view), bold_style))
            .alignment(Alignment::Center);
        status.render(chunks[0], buf);

        let (board_w, board_h) = self.game.board_size();
        for actor in &view.actors {
            draw_actor(actor, (board_w, board_h), chunks[1], buf);
        }

        let banner = match view.phase {
            Phase::Idle => Some("press enter to start"),
            Phase::Paused => Some("PAUSED - space to resume"),
            Phase::Running | Phase::Ended => None,
        };
        if let Some(text) = banner {
            let y = chunks[1].y + chunks[1].height / 3;
            let x = chunks[1].x + chunks[1].width / 2;
            put_centered(
                buf,
                chunks[1],
                x,
                y,
                text,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            );
        }

        let legend = Paragraph::new(Span::styled(
            "(1/j) (2/k) (3/l) bash / (space) pause / (r)eset / (esc)ape",
            dim_style.add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center);
        legend.render(chunks[2], buf);
    }
}

fn status_line(view: &FrameView) -> String {
    format!(
        "score {}   time {}s   level {}   {}",
        view.score,
        view.time_left,
        view.difficulty_tier + 1,
        view.phase
    )
}

/// Maps a board coordinate onto a column/row of the drawing area
fn to_cell(value: f64, board_extent: f64, origin: u16, extent: u16) -> u16 {
    if board_extent <= 0.0 {
        return origin;
    }
    let scaled = (value / board_extent * extent as f64).round() as u16;
    origin + scaled.min(extent.saturating_sub(1))
}

fn draw_actor(actor: &ActorView, board: (f64, f64), area: Rect, buf: &mut Buffer) {
    if area.height == 0 || area.width == 0 {
        return;
    }
    let x = to_cell(actor.position.x, board.0, area.x, area.width);
    let base = to_cell(actor.position.base_y, board.1, area.y, area.height);

    put_centered(buf, area, x, base, HOLE, Style::default().fg(Color::DarkGray));

    let sprite = match actor.kind {
        Some(ActorKind::Hostile) => HOSTILE_SPRITE,
        Some(ActorKind::Benign) | None => BENIGN_SPRITE,
    };
    let style = match (actor.struck, actor.kind) {
        (true, _) => Style::default().fg(Color::Yellow),
        (false, Some(ActorKind::Hostile)) => {
            Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD)
        }
        (false, _) => Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    };

    // the head clears the hole first, so show the top rows of the sprite
    let shown = actor.pop_height(sprite.len() as u16);
    for (row, line) in sprite.iter().take(shown as usize).enumerate() {
        if let Some(y) = base.checked_sub(shown - row as u16) {
            put_centered(buf, area, x, y, line, style);
        }
    }

    let overlay = match actor.strike_anim {
        StrikeAnim::None => None,
        StrikeAnim::Phase1 => Some("BONK!"),
        StrikeAnim::Phase2 => Some("* * *"),
    };
    if let Some(text) = overlay {
        if let Some(y) = base.checked_sub(shown + 1) {
            put_centered(
                buf,
                area,
                x,
                y,
                text,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            );
        }
    }
}

/// Writes `text` centred on column `x`, clipped to `area`
fn put_centered(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if y < area.y || y >= area.y + area.height {
        return;
    }
    let half = (text.width() / 2) as u16;
    let start = x.saturating_sub(half).max(area.x);
    let right = area.x + area.width;
    if start >= right {
        return;
    }
    buf.set_stringn(start, y, text, (right - start) as usize, style);
}

pub fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.game.session();
    let stats = &session.stats;
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN + 3)
        .vertical_margin(VERTICAL_MARGIN + 1)
        .constraints([
            Constraint::Min(1),    // chart
            Constraint::Length(1), // final score
            Constraint::Length(1), // hit breakdown
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let (duration, lowest, highest) = charting::compute_chart_params(&stats.score_series);
    let tuples: Vec<(f64, f64)> = stats
        .score_series
        .iter()
        .copied()
        .map(<(f64, f64)>::from)
        .collect();
    let datasets = vec![Dataset::default()
        .marker(ratatui::symbols::Marker::Braille)
        .style(Style::default().fg(Color::Magenta))
        .graph_type(GraphType::Line)
        .data(&tuples)];

    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .title("seconds")
                .bounds([0.0, duration])
                .labels(vec![
                    Span::styled("0", bold_style),
                    Span::styled(charting::format_label(duration), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("score")
                .bounds([lowest, highest])
                .labels(vec![
                    Span::styled(charting::format_label(lowest), bold_style),
                    Span::styled(charting::format_label(highest), bold_style),
                ]),
        );
    chart.render(chunks[0], buf);

    let headline = Paragraph::new(Span::styled(
        format!("final score {}", session.score),
        bold_style.fg(Color::Green),
    ))
    .alignment(Alignment::Center);
    headline.render(chunks[1], buf);

    let reaction = match (stats.mean_reaction_ms(), stats.reaction_spread_ms()) {
        (Some(avg), Some(sd)) => format!("{avg:.0} ms avg reaction ({sd:.0} sd)"),
        _ => "no hits".to_string(),
    };
    let hit_rate = stats
        .benign_hit_rate()
        .map(|r| format!("{r}% caught"))
        .unwrap_or_default();
    let breakdown = Paragraph::new(Span::styled(
        format!(
            "{} bunnies bashed   {} angry hits   {} escaped   {}   {}",
            stats.benign_hits, stats.hostile_hits, stats.escaped, hit_rate, reaction
        ),
        Style::default().fg(Color::Cyan),
    ))
    .alignment(Alignment::Center);
    breakdown.render(chunks[2], buf);

    let legend = Paragraph::new(Span::styled(
        "(enter) play again / (r)eset / (esc)ape",
        italic_style,
    ));
    legend.render(chunks[4], buf);
}
