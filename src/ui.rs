//! Layout and drawing: loading switch, overlay panel, shuffling blocks, fade-out ghost.

use crate::BlockMarker;
use crate::screen::{ScreenController, Visibility};
use crate::shuffle::{BLOCK_SIZE, BlockSample, ShuffleAnimator};
use crate::theme::Theme;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Block, Paragraph};
use std::time::{Duration, Instant};
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Rows above the overlay: padding, switch, padding, hint, padding.
const HEADER_HEIGHT: u16 = 5;
/// Canvas spans -CANVAS_EXTENT..CANVAS_EXTENT on both axes (a 100x100 box).
const CANVAS_EXTENT: f64 = 50.0;
/// Canvas height cap in rows; width is twice that to keep blocks square.
const MAX_CANVAS_ROWS: u16 = 18;
/// Caption lines plus the gap above them.
const CAPTION_HEIGHT: u16 = 4;
/// Sample pitch (layout units) when filling a block.
const FILL_STEP: f32 = 0.5;

/// Per-frame drawing options that come from the command line.
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    pub marker: BlockMarker,
    pub fade: Duration,
    /// Draw the fading backdrop after the overlay is hidden.
    pub fade_effect: bool,
}

/// Draw the whole screen. While hidden and still fading, renders the overlay backdrop
/// and runs a TachyonFX fade to the screen background over it, keeping the effect in
/// `ghost_effect` / `ghost_process_time` across frames.
pub fn draw(
    frame: &mut Frame,
    controller: &ScreenController,
    theme: &Theme,
    ghost_effect: &mut Option<Effect>,
    ghost_process_time: &mut Option<Instant>,
    options: DrawOptions,
    now: Instant,
) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.main_bg)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Fill(1)])
        .split(area);
    draw_header(frame, controller.is_loading(), theme, chunks[0]);
    let overlay_area = chunks[1];

    match (controller.visibility(), controller.animator()) {
        (Visibility::Visible, Some(animator)) => {
            draw_overlay(frame, animator, theme, overlay_area, options.marker, now);
        }
        (Visibility::Hidden, _) if options.fade_effect && controller.is_fading(now) => {
            apply_ghost_effect(
                frame,
                theme,
                overlay_area,
                options.fade,
                ghost_effect,
                ghost_process_time,
                now,
            );
        }
        _ => {}
    }
}

fn draw_header(frame: &mut Frame, loading: bool, theme: &Theme, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);

    let switch = Paragraph::new(switch_line(loading, theme)).alignment(Alignment::Center);
    frame.render_widget(switch, rows[1]);

    let hint = Paragraph::new(Line::from(Span::styled(
        "space: toggle   q: quit",
        Style::default().fg(theme.inactive_fg),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, rows[3]);
}

/// Label plus a pill-shaped track with the thumb at its left (off) or right (on) end.
fn switch_line(loading: bool, theme: &Theme) -> Line<'static> {
    let (track, thumb) = if loading {
        (theme.track_on, theme.thumb_on)
    } else {
        (theme.track_off, theme.thumb_off)
    };
    let thumb_span = Span::styled("●", Style::default().fg(thumb).bg(track));
    let gap = Span::styled("   ", Style::default().bg(track));
    let edge = Span::styled(" ", Style::default().bg(track));
    let label = Span::styled("Loading  ", Style::default().fg(theme.inactive_fg));
    if loading {
        Line::from(vec![label, edge.clone(), gap, thumb_span, edge])
    } else {
        Line::from(vec![label, edge.clone(), thumb_span, gap, edge])
    }
}

/// Canvas rect: as tall as fits (capped) and twice as wide, centred at the top of `area`.
fn canvas_rect(area: Rect) -> Rect {
    let rows = area
        .height
        .saturating_sub(CAPTION_HEIGHT)
        .min(MAX_CANVAS_ROWS)
        .min(area.width / 2);
    let cols = rows * 2;
    Rect {
        x: area.x + area.width.saturating_sub(cols) / 2,
        y: area.y + area.height.saturating_sub(rows + CAPTION_HEIGHT) / 2,
        width: cols,
        height: rows,
    }
}

fn draw_overlay(
    frame: &mut Frame,
    animator: &ShuffleAnimator,
    theme: &Theme,
    area: Rect,
    marker: BlockMarker,
    now: Instant,
) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.overlay_bg)), area);

    let canvas_area = canvas_rect(area);
    let samples = animator.samples(now);
    let marker = match marker {
        BlockMarker::HalfBlock => Marker::HalfBlock,
        BlockMarker::Braille => Marker::Braille,
    };
    let canvas = Canvas::default()
        .background_color(theme.overlay_bg)
        .marker(marker)
        .x_bounds([-CANVAS_EXTENT, CANVAS_EXTENT])
        .y_bounds([-CANVAS_EXTENT, CANVAS_EXTENT])
        .paint(|ctx| {
            for sample in &samples {
                let coords = block_points(sample);
                ctx.draw(&Points {
                    coords: &coords,
                    color: theme.block_color(sample.color),
                });
            }
        });
    frame.render_widget(canvas, canvas_area);

    let caption_area = Rect {
        x: area.x,
        y: (canvas_area.y + canvas_area.height + 1).min(area.y + area.height),
        width: area.width,
        height: 3.min(
            (area.y + area.height).saturating_sub(canvas_area.y + canvas_area.height + 1),
        ),
    };
    let caption = Paragraph::new(vec![
        Line::from(Span::styled("Loading...", Style::default().fg(theme.main_fg).bold())),
        Line::from(""),
        Line::from(Span::styled(
            "Please wait while we process your request",
            Style::default().fg(theme.inactive_fg),
        )),
    ])
    .alignment(Alignment::Center)
    .style(Style::default().bg(theme.overlay_bg));
    frame.render_widget(caption, caption_area);
}

/// Points filling one block: a BLOCK_SIZE square rotated (clockwise on screen) about
/// its centre and moved to its offset. Canvas y points up, layout y points down.
fn block_points(sample: &BlockSample) -> Vec<(f64, f64)> {
    let half = BLOCK_SIZE / 2.0;
    let (sin, cos) = sample.rotation.to_radians().sin_cos();
    let steps = (BLOCK_SIZE / FILL_STEP) as usize;
    let mut coords = Vec::with_capacity((steps + 1) * (steps + 1));
    for i in 0..=steps {
        let u = -half + i as f32 * FILL_STEP;
        for j in 0..=steps {
            let v = -half + j as f32 * FILL_STEP;
            let x = sample.position.x + u * cos - v * sin;
            let y = sample.position.y + u * sin + v * cos;
            coords.push((f64::from(x), f64::from(-y)));
        }
    }
    coords
}

/// Backdrop left behind after hiding: the overlay panel, faded to the screen background
/// by TachyonFX over the fade duration.
fn apply_ghost_effect(
    frame: &mut Frame,
    theme: &Theme,
    area: Rect,
    fade: Duration,
    ghost_effect: &mut Option<Effect>,
    ghost_process_time: &mut Option<Instant>,
    now: Instant,
) {
    frame.render_widget(Block::default().style(Style::default().bg(theme.overlay_bg)), area);

    let delta = ghost_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *ghost_process_time = Some(now);

    if ghost_effect.is_none() {
        let fade_ms = fade.as_millis().min(u32::MAX as u128) as u32;
        let bg = theme.main_bg;
        let effect =
            fx::fade_to(bg, bg, (fade_ms, Interpolation::QuadInOut)).with_area(area);
        *ghost_effect = Some(effect);
    }

    if let Some(effect) = ghost_effect {
        frame.render_effect(effect, area, TfxDuration::from_millis(delta_ms));
    }
}
