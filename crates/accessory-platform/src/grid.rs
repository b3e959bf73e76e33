//! Character-cell painter. Layout units map 1:1 to terminal cells.

use std::fmt;

use accessory_core::Rect;
use accessory_ui::{Scene, SceneNode, Tone};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// One grapheme; empty for the trailing half of a wide grapheme.
    pub symbol: String,
    pub tone: Tone,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: " ".to_string(),
            tone: Tone::Normal,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CellGrid {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    cursor: Option<(u16, u16)>,
}

/// Cell bounds `[x0, x1) x [y0, y1)` of a rect, clipped to the grid.
struct Span {
    x0: u16,
    y0: u16,
    x1: u16,
    y1: u16,
}

impl Span {
    fn w(&self) -> u16 {
        self.x1 - self.x0
    }
    fn h(&self) -> u16 {
        self.y1 - self.y0
    }
}

impl CellGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            cursor: None,
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
        self.cursor = None;
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(self.index(x, y))
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.cursor
    }

    pub fn row(&self, y: u16) -> &[Cell] {
        let start = usize::from(y.min(self.height)) * usize::from(self.width);
        let end = (start + usize::from(self.width)).min(self.cells.len());
        &self.cells[start..end]
    }

    /// Clears the grid and draws `scene` back to front.
    pub fn paint(&mut self, scene: &Scene) {
        self.clear();
        for node in &scene.nodes {
            match node {
                SceneNode::Fill { rect, tone } => self.fill(*rect, *tone),
                SceneNode::Border { rect, title, tone } => {
                    self.border(*rect, title.as_deref(), *tone)
                }
                SceneNode::Text { rect, text, tone } => {
                    if let Some(s) = self.span(*rect) {
                        if s.h() > 0 {
                            self.text(s.x0, s.y0, s.w(), text, *tone);
                        }
                    }
                }
                SceneNode::Caret { pos } => {
                    let (x, y) = (pos.x.round(), pos.y.round());
                    self.cursor = (x >= 0.0
                        && y >= 0.0
                        && x < f32::from(self.width)
                        && y < f32::from(self.height))
                    .then(|| (x as u16, y as u16));
                }
            }
        }
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    fn span(&self, r: Rect) -> Option<Span> {
        let clamp_x = |v: f32| v.round().clamp(0.0, f32::from(self.width)) as u16;
        let clamp_y = |v: f32| v.round().clamp(0.0, f32::from(self.height)) as u16;
        let s = Span {
            x0: clamp_x(r.x),
            y0: clamp_y(r.y),
            x1: clamp_x(r.right()),
            y1: clamp_y(r.bottom()),
        };
        (s.x1 > s.x0 && s.y1 > s.y0).then_some(s)
    }

    fn put(&mut self, x: u16, y: u16, symbol: &str, tone: Tone) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.cells[i] = Cell {
                symbol: symbol.to_string(),
                tone,
            };
        }
    }

    fn fill(&mut self, r: Rect, tone: Tone) {
        let Some(s) = self.span(r) else {
            return;
        };
        for y in s.y0..s.y1 {
            for x in s.x0..s.x1 {
                self.put(x, y, " ", tone);
            }
        }
    }

    fn border(&mut self, r: Rect, title: Option<&str>, tone: Tone) {
        let Some(s) = self.span(r) else {
            return;
        };
        if s.w() < 2 || s.h() < 2 {
            return;
        }
        let (right, bottom) = (s.x1 - 1, s.y1 - 1);
        for x in s.x0 + 1..right {
            self.put(x, s.y0, "─", tone);
            self.put(x, bottom, "─", tone);
        }
        for y in s.y0 + 1..bottom {
            self.put(s.x0, y, "│", tone);
            self.put(right, y, "│", tone);
        }
        self.put(s.x0, s.y0, "┌", tone);
        self.put(right, s.y0, "┐", tone);
        self.put(s.x0, bottom, "└", tone);
        self.put(right, bottom, "┘", tone);

        if let Some(title) = title {
            if s.w() > 4 {
                self.text(s.x0 + 2, s.y0, s.w() - 4, title, tone);
            }
        }
    }

    /// Writes one line of text, clipped to `max_w` cells.
    fn text(&mut self, x: u16, y: u16, max_w: u16, text: &str, tone: Tone) {
        let mut col = 0u16;
        for g in text.graphemes(true) {
            let w = g.width() as u16;
            if w == 0 {
                continue;
            }
            if col + w > max_w {
                break;
            }
            self.put(x + col, y, g, tone);
            for extra in 1..w {
                self.put(x + col + extra, y, "", tone);
            }
            col += w;
        }
    }
}

impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            if y > 0 {
                writeln!(f)?;
            }
            for cell in self.row(y) {
                f.write_str(&cell.symbol)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accessory_core::{FieldId, FormConfig, Key, KeyEvent, InputEvent, Size, Vec2};
    use accessory_ui::AccessoryScreen;

    fn framed(grid: &CellGrid) -> String {
        grid.to_string()
            .lines()
            .map(|l| format!("|{l}|"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn paints_routed_form() {
        let mut screen =
            AccessoryScreen::new(&FormConfig::default(), Size::new(24.0, 12.0)).unwrap();
        screen.focus_field(FieldId(1)).unwrap();
        for c in "Gr".chars() {
            screen
                .handle(&InputEvent::Key(KeyEvent::new(Key::Character(c))))
                .unwrap();
        }

        let mut grid = CellGrid::new(24, 12);
        grid.paint(&screen.scene(screen.editor().blink_start));

        insta::assert_snapshot!(framed(&grid), @r"
        |                        |
        | ┌─First Name─────────┐ |
        | │First Name          │ |
        | └────────────────────┘ |
        |                        |
        | ┌─Last Name──────────┐ |
        | │Last Name           │ |
        | └────────────────────┘ |
        |                        |
        | ┌─First Name · Enter─┐ |
        | │Gr                  │ |
        | └────────────────────┘ |
        ");
        assert_eq!(grid.cursor(), Some((4, 10)));
        assert_eq!(grid.cell(1, 9).map(|c| c.tone), Some(Tone::Focused));
        assert_eq!(grid.cell(3, 2).map(|c| c.tone), Some(Tone::Placeholder));
        assert_eq!(grid.cell(0, 10).map(|c| c.tone), Some(Tone::Bar));
    }

    #[test]
    fn text_is_clipped_and_wide_graphemes_take_two_cells() {
        let mut grid = CellGrid::new(6, 1);
        let mut scene = Scene::default();
        scene.push(SceneNode::Text {
            rect: Rect::new(0.0, 0.0, 5.0, 1.0),
            text: "a\u{4E2D}bcdef".into(),
            tone: Tone::Normal,
        });
        grid.paint(&scene);
        assert_eq!(grid.to_string(), "a\u{4E2D}bc ");
        assert_eq!(grid.cell(2, 0).map(|c| c.symbol.as_str()), Some(""));
    }

    #[test]
    fn out_of_bounds_nodes_are_ignored() {
        let mut grid = CellGrid::new(4, 2);
        let mut scene = Scene::default();
        scene.push(SceneNode::Border {
            rect: Rect::new(10.0, 10.0, 5.0, 5.0),
            title: None,
            tone: Tone::Normal,
        });
        scene.push(SceneNode::Caret {
            pos: Vec2 { x: 9.0, y: 0.0 },
        });
        grid.paint(&scene);
        assert_eq!(grid.to_string(), "    \n    ");
        assert_eq!(grid.cursor(), None);
        assert!(grid.cell(4, 0).is_none());
    }
}
