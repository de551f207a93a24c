use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};

const ACTIVE: Color = Color::Rgb(255, 220, 80);
const IDLE: Color = Color::Rgb(120, 120, 140);
const HINT: Color = Color::Rgb(80, 80, 100);

/// Game tabs carry their menu digit so the shortcut is visible everywhere.
fn tab_label(tab: Tab, active: bool) -> Line<'static> {
    let style = if active {
        Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(IDLE)
    };
    match tab {
        Tab::Home => Line::from(Span::styled("⌂ Home", style)),
        Tab::Play(id) => Line::from(vec![
            Span::styled(format!("{} ", id.index() + 1), Style::default().fg(HINT)),
            Span::styled(id.title(), style),
        ]),
    }
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all()
        .into_iter()
        .map(|t| tab_label(t, t == app.current_tab))
        .collect();

    let hint = match app.current_tab {
        Tab::Home => " q quit ",
        Tab::Play(_) => " Esc menu ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title_top(
            Line::from(" 🕹 Pixelcade ")
                .style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
        )
        .title_top(Line::from(Span::styled(hint, Style::default().fg(HINT))).right_aligned());

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.current_tab.index())
        .highlight_style(Style::default().fg(ACTIVE))
        .divider(Span::styled("·", Style::default().fg(Color::Rgb(60, 60, 80))))
        .padding(" ", " ");

    frame.render_widget(tabs, area);
}
