//! Rendering for the stellar clicker: star art, HUD, upgrade panel, log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};

use super::actions;
use super::evolution::{Stage, SupernovaPhase, SUPERNOVA_DURATION_MS};
use super::logic::format_number;
use super::resources::ResourceKind;
use super::StellarGame;

/// Two-frame idle art per stage, 5 rows each.
fn stage_art(stage: Stage, frame: usize) -> &'static [&'static str] {
    match (stage, frame % 2) {
        (Stage::CosmicDust, 0) => &[
            "  . ·  .  ∙  ",
            " ∙  ░░░░  ·  ",
            "· ░░▒▒▒░░  ∙ ",
            " ∙  ░░░░  ·  ",
            "  ·  .  ∙ .  ",
        ],
        (Stage::CosmicDust, _) => &[
            "  ∙  .  · .  ",
            " ·  ░░░░  ∙  ",
            "∙ ░░▒▒▒░░  · ",
            " ·  ░░░░  ∙  ",
            "  .  ∙  · .  ",
        ],
        (Stage::Protostar, 0) => &[
            "   . ▒▒▒ .   ",
            "  ▒▒▓▓▓▓▒▒   ",
            " ▒▓▓▓██▓▓▓▒  ",
            "  ▒▒▓▓▓▓▒▒   ",
            "   . ▒▒▒ .   ",
        ],
        (Stage::Protostar, _) => &[
            "   · ▒▒▒ ·   ",
            "  ▒▒▓▓▓▓▒▒   ",
            " ▒▓▓██▓▓▓▓▒  ",
            "  ▒▒▓▓▓▓▒▒   ",
            "   · ▒▒▒ ·   ",
        ],
        (Stage::RedDwarf, 0) => &[
            "             ",
            "   ▗▟██▙▖    ",
            "   ▐████▌    ",
            "   ▝▜██▛▘    ",
            "             ",
        ],
        (Stage::RedDwarf, _) => &[
            "             ",
            "   ▗▟██▙▖    ",
            "   ▐█▓██▌    ",
            "   ▝▜██▛▘    ",
            "             ",
        ],
        (Stage::YellowStar, 0) => &[
            "    \\ │ /    ",
            "  ─ ▟███▙ ─  ",
            "  ──█████──  ",
            "  ─ ▜███▛ ─  ",
            "    / │ \\    ",
        ],
        (Stage::YellowStar, _) => &[
            "    ╲ ┃ ╱    ",
            "  ━ ▟███▙ ━  ",
            "  ──█████──  ",
            "  ━ ▜███▛ ━  ",
            "    ╱ ┃ ╲    ",
        ],
        (Stage::BlueGiant, 0) => &[
            "   ▄▟███▙▄   ",
            "  ▟███████▙  ",
            "  █████████  ",
            "  ▜███████▛  ",
            "   ▀▜███▛▀   ",
        ],
        (Stage::BlueGiant, _) => &[
            "   ▄▟███▙▄   ",
            "  ▟██▓████▙  ",
            "  ████▓████  ",
            "  ▜████▓██▛  ",
            "   ▀▜███▛▀   ",
        ],
        // Supernova art is phase-driven; see supernova_art.
        (Stage::Supernova, _) => supernova_art(SupernovaPhase::Expanding),
        (Stage::BlackHole, 0) => &[
            "   ▂▄▄▄▄▂    ",
            "  ▐░ ███ ░▌  ",
            "  ▐░ ███ ░▌  ",
            "   ▔▀▀▀▀▔    ",
            "  ·  ⌁  ·    ",
        ],
        (Stage::BlackHole, _) => &[
            "   ▂▄▄▄▄▂    ",
            "  ▐▒ ███ ▒▌  ",
            "  ▐▒ ███ ▒▌  ",
            "   ▔▀▀▀▀▔    ",
            "  ⌁  ·  ⌁    ",
        ],
    }
}

/// The supernova ring expands outward, then falls back in on itself.
fn supernova_art(phase: SupernovaPhase) -> &'static [&'static str] {
    match phase {
        SupernovaPhase::Expanding => &[
            "  ⟍  ╳  ⟋   ",
            " ══▓█████▓══ ",
            "╳ █████████ ╳",
            " ══▓█████▓══ ",
            "  ⟋  ╳  ⟍   ",
        ],
        SupernovaPhase::Collapsing => &[
            "   ⟍ ╳ ⟋    ",
            "  ═▓████▓═   ",
            " ╳ ██████ ╳  ",
            "  ═▓████▓═   ",
            "   ⟋ ╳ ⟍    ",
        ],
        SupernovaPhase::Complete => &[
            "    · ╳ ·    ",
            "   ═▓███▓═   ",
            "   ╳ ███ ╳   ",
            "   ═▓███▓═   ",
            "    · ╳ ·    ",
        ],
    }
}

/// Pressed-state art shown briefly after a click.
fn pressed_art(stage: Stage) -> &'static [&'static str] {
    match stage {
        Stage::CosmicDust => &[
            " ·∙ · ∙ ·∙ · ",
            "∙ ░▒░░▒░░ ∙ ·",
            "·░▒▓▓█▓▓▒░· ∙",
            "∙ ░▒░░▒░░ ∙ ·",
            " ·∙ · ∙ ·∙ · ",
        ],
        _ => &[
            "   ✦ ✧ ✦     ",
            " ✧ ▓███▓ ✧   ",
            "✦ ▓█████▓ ✦  ",
            " ✧ ▓███▓ ✧   ",
            "   ✦ ✧ ✦     ",
        ],
    }
}

fn stage_color(stage: Stage) -> Color {
    match stage {
        Stage::CosmicDust => Color::Gray,
        Stage::Protostar => Color::LightRed,
        Stage::RedDwarf => Color::Red,
        Stage::YellowStar => Color::Yellow,
        Stage::BlueGiant => Color::LightBlue,
        Stage::Supernova => Color::White,
        Stage::BlackHole => Color::Magenta,
    }
}

pub fn render(
    game: &StellarGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let narrow = is_narrow_layout(area.width);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // title
            Constraint::Min(10),    // content
            Constraint::Length(3),  // help bar
        ])
        .split(area);

    render_title(game, f, chunks[0]);

    if narrow {
        let content = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(4)])
            .split(chunks[1]);
        render_star_panel(game, f, content[0], click_state);
        if game.view.show_upgrades {
            render_upgrade_panel(game, f, content[1], click_state);
        } else {
            render_log(game, f, content[1]);
        }
    } else {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(12), Constraint::Min(4)])
            .split(content[0]);
        render_star_panel(game, f, left[0], click_state);
        render_upgrade_panel(game, f, left[1], click_state);
        render_log(game, f, content[1]);
    }

    render_help(game, f, chunks[2], click_state);
}

fn render_title(game: &StellarGame, f: &mut Frame, area: Rect) {
    // Notification banner takes over the title while active.
    let (text, style) = if let Some(n) = &game.view.notification {
        let fading = n.age_ms > super::state::NOTIFICATION_LIFE_MS * 0.75;
        let color = if fading { Color::DarkGray } else { Color::Yellow };
        (
            format!("★ {} ★", n.message),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            format!("Stellar Clicker — {}", game.engine.stage().name()),
            Style::default()
                .fg(stage_color(game.engine.stage()))
                .add_modifier(Modifier::BOLD),
        )
    };
    let title = Paragraph::new(Line::from(Span::styled(text, style)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn render_star_panel(
    game: &StellarGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let stage = game.engine.stage();
    let clicked = game.view.click_flash_ms > 0.0;
    let frame_idx = (game.view.anim_ms / 400.0) as usize;

    let art = if clicked {
        pressed_art(stage)
    } else if let Some(phase) = game.engine.supernova_phase() {
        supernova_art(phase)
    } else {
        stage_art(stage, frame_idx)
    };

    let border_color = if game.view.purchase_flash_ms > 0.0 {
        Color::White
    } else {
        stage_color(stage)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", stage.name()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let art_color = if clicked { Color::White } else { stage_color(stage) };
    let art_width = 13u16;
    let art_x = inner.x + inner.width.saturating_sub(art_width) / 2;

    let mut lines: Vec<Line> = Vec::new();
    for row in art {
        lines.push(Line::from(Span::styled(*row, Style::default().fg(art_color))));
    }
    let art_area = Rect::new(
        art_x,
        inner.y,
        art_width.min(inner.width),
        (art.len() as u16).min(inner.height),
    );
    f.render_widget(Paragraph::new(lines), art_area);

    // Supernova countdown bar under the art.
    let mut hud_y = inner.y + art.len() as u16;
    if let Some(phase) = game.engine.supernova_phase() {
        if hud_y < inner.y + inner.height {
            let fraction = (game.engine.supernova_elapsed_ms() / SUPERNOVA_DURATION_MS).min(1.0);
            let bar_width = 20usize;
            let filled = (fraction * bar_width as f64) as usize;
            let label = match phase {
                SupernovaPhase::Expanding => "expanding",
                SupernovaPhase::Collapsing => "collapsing",
                SupernovaPhase::Complete => "collapse imminent",
            };
            let bar: String = "█".repeat(filled) + &"░".repeat(bar_width - filled);
            let line = Line::from(vec![
                Span::styled(bar, Style::default().fg(Color::White)),
                Span::styled(format!(" {label}"), Style::default().fg(Color::DarkGray)),
            ]);
            f.render_widget(
                Paragraph::new(line),
                Rect::new(inner.x + 1, hud_y, inner.width.saturating_sub(2), 1),
            );
            hud_y += 1;
        }
    }

    // HUD: resource counters and rates.
    let rates = game.engine.rate_snapshot();
    let hydrogen = game.ledger.quantity(ResourceKind::Hydrogen).floor();
    let helium = game.ledger.quantity(ResourceKind::Helium).floor();
    let hud_lines = vec![
        Line::from(vec![
            Span::styled(
                format!(" H {}", format_number(hydrogen)),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  He {}", format_number(helium)),
                Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  clicks {}", game.total_clicks),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                " +{}/s H  +{}/s He  click +{} H",
                format_number(rates.passive_hydrogen),
                format_number(rates.passive_helium),
                format_number(rates.click_hydrogen),
            ),
            Style::default().fg(Color::White),
        )),
    ];
    let hud_height = (inner.y + inner.height).saturating_sub(hud_y);
    if hud_height > 0 {
        f.render_widget(
            Paragraph::new(hud_lines),
            Rect::new(inner.x, hud_y, inner.width, hud_height.min(2)),
        );
    }

    // Particles float above the star art.
    let center_col = art_x + art_width / 2;
    let center_row = inner.y + art.len() as u16 / 2;
    render_particles(game, f, area, center_col, center_row);

    let mut cs = click_state.borrow_mut();
    cs.star_center = Some((center_col, center_row));
}

fn render_particles(
    game: &StellarGame,
    f: &mut Frame,
    area: Rect,
    center_col: u16,
    center_row: u16,
) {
    for particle in &game.view.particles {
        let progress = particle.age_ms / particle.life_ms;
        let y = center_row.saturating_sub(particle.rise_rows());
        let x = (center_col as i16 + particle.col_offset).max(area.x as i16) as u16;
        let color = if progress < 0.33 {
            Color::White
        } else if progress < 0.66 {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        if y >= area.y && y < area.y + area.height && x < area.x + area.width {
            let text_len = particle.text.chars().count() as u16;
            let available = area.x + area.width - x;
            let display_width = text_len.min(available);
            if display_width > 0 {
                let particle_area = Rect::new(x, y, display_width, 1);
                let widget = Paragraph::new(Span::styled(
                    &particle.text,
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ));
                f.render_widget(widget, particle_area);
            }
        }
    }
}

fn render_upgrade_panel(
    game: &StellarGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let stage = game.engine.stage();
    let available: Vec<_> = game.catalog.available(stage).collect();

    let items: Vec<ListItem> = if available.is_empty() {
        vec![ListItem::new(Span::styled(
            "  (nothing for sale right now)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        available
            .iter()
            .enumerate()
            .map(|(i, def)| {
                let affordable = def
                    .cost
                    .iter()
                    .all(|(kind, amount)| game.ledger.quantity(*kind) >= *amount);
                let cost_str = def
                    .cost
                    .iter()
                    .map(|(kind, amount)| {
                        format!("{} {}", format_number(*amount), kind.symbol())
                    })
                    .collect::<Vec<_>>()
                    .join(" + ");
                let key = (b'1' + i as u8) as char;
                let name_style = if affordable {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                // One line per upgrade so row click targets stay aligned.
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" [{key}] "),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(def.name, name_style),
                    Span::styled(
                        format!("  {cost_str}"),
                        if affordable {
                            Style::default().fg(Color::Cyan)
                        } else {
                            Style::default().fg(Color::DarkGray)
                        },
                    ),
                    Span::styled(
                        format!("  {}", def.description),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect()
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Upgrades (tap to buy) "),
    );
    f.render_widget(list, area);

    // Each row is a click target mapped to its display index.
    let mut cs = click_state.borrow_mut();
    for (i, _) in available.iter().enumerate() {
        cs.add_row_target(
            area,
            area.y + 1 + i as u16,
            actions::BUY_UPGRADE_BASE + i as u16,
        );
    }
}

fn render_log(game: &StellarGame, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    let log_lines: Vec<Line> = game
        .view
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let is_recent = i < 3;
            if entry.is_important {
                let style = if is_recent {
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Yellow)
                };
                Line::from(Span::styled(&entry.text, style))
            } else if is_recent {
                Line::from(Span::styled(
                    &entry.text,
                    Style::default().fg(Color::White),
                ))
            } else {
                Line::from(Span::styled(
                    &entry.text,
                    Style::default().fg(Color::DarkGray),
                ))
            }
        })
        .collect();

    let widget = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_help(
    game: &StellarGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let upgrades_label = if game.view.show_upgrades {
        "[U] Close"
    } else {
        "[U] Upgrades"
    };
    let help = Paragraph::new(Line::from(vec![
        Span::styled("[C] Click star  ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{upgrades_label}  "),
            Style::default().fg(Color::Gray),
        ),
        Span::styled("[S] Save  ", Style::default().fg(Color::DarkGray)),
        Span::styled("[R] Reset", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(help, area);

    // Split the bar into four tap regions matching the labels.
    let mut cs = click_state.borrow_mut();
    let quarter = area.width / 4;
    let row = area.y + 1;
    cs.add_click_target(Rect::new(area.x, row, quarter, 1), actions::CLICK_STAR);
    cs.add_click_target(
        Rect::new(area.x + quarter, row, quarter, 1),
        actions::TOGGLE_UPGRADES,
    );
    cs.add_click_target(
        Rect::new(area.x + quarter * 2, row, quarter, 1),
        actions::SAVE_GAME,
    );
    cs.add_click_target(
        Rect::new(area.x + quarter * 3, row, area.width - quarter * 3, 1),
        actions::RESET_GAME,
    );
}
