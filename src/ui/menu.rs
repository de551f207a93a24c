use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::games::GameId;
use crate::scores::SessionBests;

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════════════╗
 ║  ██████╗ ██╗██╗  ██╗███████╗██╗      ██████╗ █████╗ ██████╗ ███████╗  ║
 ║  ██╔══██╗██║╚██╗██╔╝██╔════╝██║     ██╔════╝██╔══██╗██╔══██╗██╔════╝  ║
 ║  ██████╔╝██║ ╚███╔╝ █████╗  ██║     ██║     ███████║██║  ██║█████╗    ║
 ║  ██╔═══╝ ██║ ██╔██╗ ██╔══╝  ██║     ██║     ██╔══██║██║  ██║██╔══╝    ║
 ║  ██║     ██║██╔╝ ██╗███████╗███████╗╚██████╗██║  ██║██████╔╝███████╗  ║
 ║  ╚═╝     ╚═╝╚═╝  ╚═╝╚══════╝╚══════╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝  ║
 ╚═══════════════════════════════════════════════════════════════════════╝"#;

const HIGHLIGHT: Color = Color::Rgb(255, 220, 80);
const KEY: Color = Color::Rgb(80, 200, 255);
const LABEL: Color = Color::Rgb(140, 140, 140);
const FRAME: Color = Color::Rgb(60, 150, 200);
const TITLE: Color = Color::Rgb(200, 120, 255);

struct GameTile {
    id: GameId,
    key: &'static str,
    icon: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 6] = [
    GameTile { id: GameId::Snake, key: "1", icon: "🐍", desc: "Eat food and\ngrow longer!", color: Color::Rgb(0, 255, 136), border_color: Color::Rgb(0, 120, 70) },
    GameTile { id: GameId::Pong, key: "2", icon: "🏓", desc: "Outplay the\ncomputer paddle!", color: Color::Rgb(255, 255, 255), border_color: Color::Rgb(110, 110, 130) },
    GameTile { id: GameId::Breakout, key: "3", icon: "🧱", desc: "Smash bricks\nwith the ball!", color: Color::Rgb(220, 80, 80), border_color: Color::Rgb(120, 40, 40) },
    GameTile { id: GameId::Tetris, key: "4", icon: "🟪", desc: "Stack pieces and\nclear lines!", color: Color::Rgb(160, 0, 240), border_color: Color::Rgb(80, 0, 120) },
    GameTile { id: GameId::Memory, key: "5", icon: "🃏", desc: "Flip cards and\nfind the pairs!", color: Color::Rgb(255, 160, 60), border_color: Color::Rgb(140, 80, 30) },
    GameTile { id: GameId::SpaceInvaders, key: "6", icon: "👾", desc: "Defend Earth\nfrom aliens!", color: Color::Rgb(80, 255, 80), border_color: Color::Rgb(40, 140, 40) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool, best: u32) {
    let border_color = if selected { HIGHLIGHT } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };

    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)),
        Span::styled(format!("{} ", tile.icon), Style::default()),
        Span::styled(tile.id.title(), Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];
    lines.extend(tile.desc.split('\n').map(|l| Line::from(Span::styled(l, Style::default().fg(desc_color)))));

    if best > 0 {
        lines.push(Line::from(Span::styled(format!("Best {best}"), Style::default().fg(Color::Rgb(255, 215, 0)))));
    }
    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn control(keys: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {keys:<17}"), Style::default().fg(KEY)),
        Span::styled(label, Style::default().fg(LABEL)),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(title, Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)))
}

fn game_controls(tile: &GameTile) -> Vec<Line<'static>> {
    let (blurb, keys): (&str, &[(&'static str, &'static str)]) = match tile.id {
        GameId::Snake => ("Eat the red food, avoid walls and yourself!", &[("↑ ↓ ← →", "Steer (first press starts)")]),
        GameId::Pong => ("First to outscore the right paddle!", &[("W / ↑", "Paddle up"), ("S / ↓", "Paddle down")]),
        GameId::Breakout => ("Clear every brick without dropping the ball!", &[("A / ←", "Paddle left"), ("D / →", "Paddle right")]),
        GameId::Tetris => (
            "Fill rows to clear them, every 10 lines speeds up!",
            &[("A / ←", "Move left"), ("D / →", "Move right"), ("S / ↓", "Soft drop"), ("W / ↑ / Space", "Rotate")],
        ),
        GameId::Memory => ("Match all eight pairs in as few moves as you can!", &[("Mouse click", "Flip a card")]),
        GameId::SpaceInvaders => (
            "Clear each wave before it lands!",
            &[("A / ←", "Move cannon left"), ("D / →", "Move cannon right"), ("Space / ↑", "Shoot")],
        ),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {} {}", tile.icon, tile.id.title()),
            Style::default().fg(tile.color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(format!("  {blurb}"), Style::default().fg(Color::Rgb(100, 100, 120)))),
        Line::from(""),
    ];
    lines.extend(keys.iter().map(|&(k, l)| control(k, l)));
    lines.push(control("R", "Restart"));
    lines
}

pub fn render_menu(frame: &mut Frame, area: Rect, selected_game: usize, show_best: bool, bests: &SessionBests) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),  // Banner
            Constraint::Length(2),  // Subtitle
            Constraint::Length(14), // Game tiles (2 rows)
            Constraint::Min(9),     // Controls area
            Constraint::Length(1),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(KEY))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let subtitle = Paragraph::new(Line::from(Span::styled(
        "  ⚡ Six Classics, One Canvas ⚡  ",
        Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD | Modifier::ITALIC),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(subtitle, chunks[1]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(FRAME))
        .title(" 🎮 Games: ↑↓←→ Select, Enter to Play ")
        .title_style(Style::default().fg(TITLE).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[2]);
    frame.render_widget(games_block, chunks[2]);

    let tile_rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(games_inner);

    for (row, row_area) in tile_rows.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
            .split(*row_area);
        for (col, cell) in cols.iter().enumerate() {
            let i = row * 3 + col;
            let tile = &GAME_TILES[i];
            render_game_tile(frame, *cell, tile, selected_game == i, bests.best(tile.id));
        }
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[3]);

    let controls = Paragraph::new(vec![
        Line::from(""),
        section("  🔧 Navigation"),
        control("Tab / Shift+Tab", "Switch tabs"),
        control("1-6", "Launch game"),
        control("↑ ↓ ← →", "Select game"),
        control("Enter", "Play selected"),
        control("Esc", "Return to Home"),
        control("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(FRAME))
            .title(" ⌨ Navigation Control ")
            .title_style(Style::default().fg(TITLE).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(controls, ctrl_cols[0]);

    let tile = &GAME_TILES[selected_game.min(GAME_TILES.len() - 1)];
    let game_ctrl = Paragraph::new(game_controls(tile)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(50, 100, 140)))
            .title(format!(" 🎮 {} Control ", tile.id.title()))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("  🦀 ", Style::default().fg(Color::Rgb(255, 100, 50))),
        Span::styled(concat!("v", env!("CARGO_PKG_VERSION")), Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))),
        Span::styled("H", Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)),
        Span::styled(" Best Scores", Style::default().fg(Color::Rgb(100, 100, 130))),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[4]);

    if show_best {
        render_best_overlay(frame, area, bests);
    }
}

fn render_best_overlay(frame: &mut Frame, area: Rect, bests: &SessionBests) {
    let overlay_w = 40u16.min(area.width.saturating_sub(4));
    let overlay_h = 12u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
    let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Rgb(255, 200, 80)))
        .title(" 🏆 Best This Session ")
        .title_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(Color::Rgb(15, 15, 25)));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let mut lines = vec![Line::from("")];
    for tile in &GAME_TILES {
        let best = bests.best(tile.id);
        let score = if best > 0 {
            Span::styled(best.to_string(), Style::default().fg(Color::Rgb(255, 215, 0)).add_modifier(Modifier::BOLD))
        } else {
            Span::styled("-", Style::default().fg(Color::Rgb(60, 60, 80)))
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {} ", tile.icon), Style::default()),
            Span::styled(format!("{:<16}", tile.id.title()), Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
            score,
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", Style::default().fg(Color::Rgb(80, 80, 100))),
        Span::styled("H", Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)),
        Span::styled(" to close", Style::default().fg(Color::Rgb(80, 80, 100))),
    ]));

    let p = Paragraph::new(lines).style(Style::default().bg(Color::Rgb(15, 15, 25)));
    frame.render_widget(p, inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(selected: usize, show_best: bool, bests: &SessionBests) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 48)).unwrap();
        terminal
            .draw(|f| render_menu(f, f.area(), selected, show_best, bests))
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn tiles_follow_the_selection_order() {
        for (i, tile) in GAME_TILES.iter().enumerate() {
            assert_eq!(tile.id.index(), i);
        }
    }

    #[test]
    fn selected_game_shows_its_controls() {
        let text = screen(3, false, &SessionBests::new());
        assert!(text.contains("Tetris Control"));
        assert!(text.contains("Soft drop"));
    }

    #[test]
    fn best_overlay_lists_recorded_scores() {
        let mut bests = SessionBests::new();
        bests.observe(GameId::Pong, true, 7);
        let text = screen(0, true, &bests);
        assert!(text.contains("Best This Session"));
        assert!(text.contains("Pong            7"));
    }
}
