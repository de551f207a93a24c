pub mod canvas;
pub mod menu;
pub mod tabs;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::engine::{Overlay, PageChrome};

const KEY: Color = Color::Rgb(80, 200, 255);
const DIM: Color = Color::Rgb(100, 100, 130);

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),    // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    match app.current_tab {
        Tab::Home => menu::render_menu(
            frame,
            chunks[1],
            app.selected_game,
            app.show_best,
            app.session.bests(),
        ),
        Tab::Play(id) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(chunks[1]);
            render_status(frame, rows[0], id.title(), &app.chrome, app.session.bests().best(id));
            let viewport = canvas::render_surface(frame, rows[1], &app.canvas);
            app.input.set_viewport(viewport);
            if let Some(overlay) = &app.chrome.overlay {
                render_overlay(frame, viewport, overlay);
            }
        }
    }
}

fn render_status(frame: &mut Frame, area: Rect, title: &str, chrome: &PageChrome, best: u32) {
    let line = Line::from(vec![
        Span::styled(format!(" {title} "), Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
        Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))),
        Span::styled("Score ", Style::default().fg(DIM)),
        Span::styled(chrome.score.to_string(), Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD)),
        Span::styled("  Best ", Style::default().fg(DIM)),
        Span::styled(best.to_string(), Style::default().fg(Color::Rgb(200, 200, 220))),
        Span::styled(" │ ", Style::default().fg(Color::Rgb(60, 60, 80))),
        Span::styled("R", Style::default().fg(KEY).add_modifier(Modifier::BOLD)),
        Span::styled(" restart  ", Style::default().fg(DIM)),
        Span::styled("Esc", Style::default().fg(KEY).add_modifier(Modifier::BOLD)),
        Span::styled(" menu", Style::default().fg(DIM)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_overlay(frame: &mut Frame, area: Rect, overlay: &Overlay) {
    let message_w = overlay.message.chars().count().max(overlay.title.chars().count()) as u16;
    let overlay_w = (message_w + 6).max(30).min(area.width.saturating_sub(2));
    let overlay_h = 8u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 220, 80)))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            overlay.title.clone(),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(overlay.message.clone(), Style::default().fg(Color::Rgb(200, 200, 220)))),
        Line::from(""),
        Line::from(vec![
            Span::styled("R", Style::default().fg(KEY).add_modifier(Modifier::BOLD)),
            Span::styled(" play again  ", Style::default().fg(DIM)),
            Span::styled("Esc", Style::default().fg(KEY).add_modifier(Modifier::BOLD)),
            Span::styled(" menu", Style::default().fg(DIM)),
        ]),
    ];

    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}
