//! Terminal runner (crossterm). The form is laid out in cells, the keyboard
//! is "shown" whenever a field is being edited.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use accessory_core::{
    FormConfig, InputEvent, Key, KeyEvent, Modifiers, PointerEventKind, Size, SourceField,
};
use accessory_ui::{AccessoryScreen, Tone};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use web_time::Instant;

use crate::common::{cell_center, pe_mouse};
use crate::grid::CellGrid;

const FRAME_POLL: Duration = Duration::from_millis(250);

/// Raw mode plus alternate screen for the lifetime of the guard.
struct TerminalGuard {
    out: Stdout,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            cursor::Hide
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self { out })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(
            self.out,
            ResetColor,
            cursor::Show,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        ) {
            log::error!("failed to restore terminal screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to leave raw mode: {e}");
        }
    }
}

/// Runs the form until Ctrl+C / Ctrl+Q and returns the final source fields.
pub fn run_terminal_app(config: &FormConfig) -> anyhow::Result<Vec<SourceField>> {
    let (cols, rows) = terminal::size()?;
    let mut screen = AccessoryScreen::new(config, Size::new(f32::from(cols), f32::from(rows)))?;
    let mut grid = CellGrid::new(cols, rows);
    let mut guard = TerminalGuard::enter()?;
    log::info!("terminal form started at {cols}x{rows}");

    loop {
        grid.paint(&screen.scene(Instant::now()));
        draw(&mut guard.out, &grid)?;

        if !event::poll(FRAME_POLL)? {
            continue;
        }
        let ev = event::read()?;
        if is_quit(&ev) {
            break;
        }
        if let Event::Resize(w, h) = ev {
            grid.resize(w, h);
        }
        let Some(input) = translate(&ev) else {
            continue;
        };
        match screen.handle(&input) {
            Ok(Some(commit)) => log::info!("committed {:?} to {}", commit.value, commit.field),
            Ok(None) => {}
            Err(e) => log::warn!("input {input:?} rejected: {e}"),
        }
    }

    drop(guard);
    let values = screen.synchronizer().fields().iter().cloned().collect();
    Ok(values)
}

pub fn is_quit(ev: &Event) -> bool {
    match ev {
        Event::Key(k) if k.kind != KeyEventKind::Release => {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(k.code, KeyCode::Char('c' | 'C' | 'q' | 'Q'))
        }
        _ => false,
    }
}

pub fn map_modifiers(m: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if m.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if m.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if m.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    if m.intersects(KeyModifiers::SUPER | KeyModifiers::META | KeyModifiers::HYPER) {
        out |= Modifiers::META;
    }
    out
}

/// Maps a crossterm event onto the screen's input model. Releases, focus
/// changes and unhandled keys yield `None`.
pub fn translate(ev: &Event) -> Option<InputEvent> {
    match ev {
        Event::Key(k) => {
            if k.kind == KeyEventKind::Release {
                return None;
            }
            let mods = map_modifiers(k.modifiers);
            let key = match k.code {
                KeyCode::Char(c) => Key::Character(c),
                KeyCode::Enter => Key::Enter,
                KeyCode::Tab => Key::Tab,
                KeyCode::BackTab => {
                    return Some(InputEvent::Key(KeyEvent::with_modifiers(
                        Key::Tab,
                        mods | Modifiers::SHIFT,
                    )));
                }
                KeyCode::Backspace => Key::Backspace,
                KeyCode::Delete => Key::Delete,
                KeyCode::Esc => Key::Escape,
                KeyCode::Left => Key::ArrowLeft,
                KeyCode::Right => Key::ArrowRight,
                KeyCode::Home => Key::Home,
                KeyCode::End => Key::End,
                _ => return None,
            };
            Some(InputEvent::Key(KeyEvent::with_modifiers(key, mods)))
        }
        Event::Mouse(m) => {
            let kind = match m.kind {
                MouseEventKind::Down(MouseButton::Left) => PointerEventKind::Down,
                MouseEventKind::Up(MouseButton::Left) => PointerEventKind::Up,
                MouseEventKind::Moved | MouseEventKind::Drag(_) => PointerEventKind::Move,
                _ => return None,
            };
            Some(InputEvent::Pointer(pe_mouse(
                kind,
                cell_center(m.column, m.row),
                map_modifiers(m.modifiers),
            )))
        }
        Event::Paste(text) => Some(InputEvent::Text(text.clone())),
        Event::Resize(w, h) => Some(InputEvent::Resize(Size::new(f32::from(*w), f32::from(*h)))),
        _ => None,
    }
}

fn tone_colors(tone: Tone) -> (Color, Color) {
    match tone {
        Tone::Normal => (Color::Reset, Color::Reset),
        Tone::Placeholder => (Color::DarkGrey, Color::Reset),
        Tone::Focused => (Color::Cyan, Color::Reset),
        Tone::Bar => (Color::Reset, Color::DarkGrey),
    }
}

fn draw(out: &mut impl Write, grid: &CellGrid) -> io::Result<()> {
    queue!(out, cursor::Hide)?;
    for y in 0..grid.height() {
        queue!(out, cursor::MoveTo(0, y))?;
        let mut current: Option<Tone> = None;
        for cell in grid.row(y) {
            // Trailing half of a wide grapheme.
            if cell.symbol.is_empty() {
                continue;
            }
            if current != Some(cell.tone) {
                let (fg, bg) = tone_colors(cell.tone);
                queue!(out, SetAttribute(Attribute::Reset), SetForegroundColor(fg), SetBackgroundColor(bg))?;
                if cell.tone == Tone::Focused {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                current = Some(cell.tone);
            }
            queue!(out, Print(&cell.symbol))?;
        }
    }
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    if let Some((x, y)) = grid.cursor() {
        queue!(out, cursor::MoveTo(x, y), cursor::Show)?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent as CtKeyEvent, KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(CtKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn quit_chords() {
        assert!(is_quit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(is_quit(&key(KeyCode::Char('q'), KeyModifiers::CONTROL)));
        assert!(!is_quit(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(!is_quit(&key(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn back_tab_is_shift_tab() {
        assert_eq!(
            translate(&key(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(InputEvent::Key(KeyEvent::with_modifiers(Key::Tab, Modifiers::SHIFT)))
        );
    }

    #[test]
    fn keys_map_with_modifiers() {
        assert_eq!(
            translate(&key(KeyCode::Char('a'), KeyModifiers::ALT)),
            Some(InputEvent::Key(KeyEvent::with_modifiers(
                Key::Character('a'),
                Modifiers::ALT
            )))
        );
        assert_eq!(
            translate(&key(KeyCode::Left, KeyModifiers::SHIFT)),
            Some(InputEvent::Key(KeyEvent::with_modifiers(Key::ArrowLeft, Modifiers::SHIFT)))
        );
        assert_eq!(translate(&key(KeyCode::F(5), KeyModifiers::NONE)), None);

        let mut release = CtKeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(translate(&Event::Key(release)), None);
    }

    #[test]
    fn left_click_is_a_pointer_down_at_cell_centre() {
        let ev = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: 18,
            modifiers: KeyModifiers::NONE,
        });
        let Some(InputEvent::Pointer(p)) = translate(&ev) else {
            panic!("expected pointer event");
        };
        assert_eq!(p.event, PointerEventKind::Down);
        assert_eq!((p.position.x, p.position.y), (4.5, 18.5));

        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(&scroll), None);
    }

    #[test]
    fn paste_and_resize() {
        assert_eq!(
            translate(&Event::Paste("Ada".into())),
            Some(InputEvent::Text("Ada".into()))
        );
        assert_eq!(
            translate(&Event::Resize(80, 24)),
            Some(InputEvent::Resize(Size::new(80.0, 24.0)))
        );
        assert_eq!(translate(&Event::FocusLost), None);
    }

    #[test]
    fn draw_skips_continuation_cells_and_places_cursor() {
        let mut grid = CellGrid::new(3, 1);
        let mut scene = accessory_ui::Scene::default();
        scene.push(accessory_ui::SceneNode::Text {
            rect: accessory_core::Rect::new(0.0, 0.0, 3.0, 1.0),
            text: "\u{4E2D}x".into(),
            tone: Tone::Normal,
        });
        scene.push(accessory_ui::SceneNode::Caret {
            pos: accessory_core::Vec2 { x: 2.0, y: 0.0 },
        });
        grid.paint(&scene);

        let mut out = Vec::new();
        draw(&mut out, &grid).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("\u{4E2D}x"));
        assert!(s.ends_with("\u{1b}[?25h"));
    }
}
