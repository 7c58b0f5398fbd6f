mod game;
mod input;
mod time;

use std::{cell::RefCell, io, rc::Rc};

use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

use game::{actions, logic, save, StellarGame};
use time::FrameClock;

/// Query the grid container's bounding rect and convert pixel coordinates to
/// a terminal cell.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let click_x = mouse_x as f64 - rect.left();
    let click_y = mouse_y as f64 - rect.top();

    let col = pixel_x_to_col(click_x, rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(click_y, rect.height(), cs.terminal_rows)?;
    Some((col, row))
}

/// save/load/delete are wasm-only; these wrappers keep call sites clean on
/// native builds (used for tests).
fn persist(game: &StellarGame) {
    #[cfg(target_arch = "wasm32")]
    save::save_game(game);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = game;
}

fn restore(game: &mut StellarGame) {
    #[cfg(target_arch = "wasm32")]
    if save::load_game(game) {
        game.view.add_log("Save data loaded.", false);
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = game;
}

fn clear_save() {
    #[cfg(target_arch = "wasm32")]
    save::delete_save();
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    let game = Rc::new(RefCell::new(StellarGame::new()));
    restore(&mut game.borrow_mut());

    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let clock = Rc::new(RefCell::new(FrameClock::new()));
    let autosave_ms = Rc::new(RefCell::new(0.0f64));

    let backend = DomBackend::new()?;
    let mut terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.kind != MouseEventKind::ButtonDown(MouseButton::Left) {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }

            let (col, row) = (mouse_event.col, mouse_event.row);

            let mut g = game.borrow_mut();

            // The star itself is a radial target; everything else is rects.
            if let Some(center) = cs.star_center {
                if input::is_within_star(col, row, center, g.engine.clickable_radius()) {
                    drop(cs);
                    g.handle_input(&InputEvent::Click(actions::CLICK_STAR));
                    return;
                }
            }

            let action = cs.hit_test(col, row);
            drop(cs);

            if let Some(action) = action {
                match action {
                    actions::SAVE_GAME => {
                        persist(&g);
                        g.view.add_log("Game saved.", false);
                    }
                    actions::RESET_GAME => {
                        logic::reset(&mut g);
                        clear_save();
                    }
                    other => {
                        g.handle_input(&InputEvent::Click(other));
                    }
                }
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            let mut g = game.borrow_mut();
            match key_event.code {
                KeyCode::Char('s') => {
                    persist(&g);
                    g.view.add_log("Game saved.", false);
                }
                KeyCode::Char('r') => {
                    logic::reset(&mut g);
                    clear_save();
                }
                KeyCode::Char(c) => {
                    g.handle_input(&InputEvent::Key(c));
                }
                _ => {}
            }
        }
    });

    terminal.draw_web({
        let game = game.clone();
        let click_state = click_state.clone();
        move |f| {
            let now_ms = web_sys::window()
                .and_then(|w| w.performance())
                .map(|p| p.now())
                .unwrap_or(0.0);
            let delta_ms = clock.borrow_mut().update(now_ms);

            let mut g = game.borrow_mut();
            g.tick(delta_ms);

            {
                let mut acc = autosave_ms.borrow_mut();
                *acc += delta_ms;
                if *acc >= save::AUTOSAVE_INTERVAL_MS {
                    *acc = 0.0;
                    persist(&g);
                }
            }

            let size = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = size.width;
                cs.terminal_rows = size.height;
                cs.clear_targets();
            }

            g.render(f, size, &click_state);
        }
    });

    Ok(())
}
