use accessory_core::{Modifiers, PointerEvent, PointerEventKind, PointerKind, Vec2};

pub fn pe_mouse(event: PointerEventKind, pos: Vec2, mods: Modifiers) -> PointerEvent {
    PointerEvent {
        kind: PointerKind::Mouse,
        event,
        position: pos,
        modifiers: mods,
    }
}

/// Terminal cells are addressed by their top-left corner; aim at the centre
/// so half-open rect tests land inside the cell.
pub fn cell_center(column: u16, row: u16) -> Vec2 {
    Vec2 {
        x: f32::from(column) + 0.5,
        y: f32::from(row) + 0.5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_pointer_at_cell_centre() {
        let at = cell_center(3, 4);
        assert_eq!(at, Vec2 { x: 3.5, y: 4.5 });
        let m = pe_mouse(PointerEventKind::Down, at, Modifiers::SHIFT);
        assert_eq!(m.kind, PointerKind::Mouse);
        assert_eq!(m.modifiers, Modifiers::SHIFT);
    }
}
