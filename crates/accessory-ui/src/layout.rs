//! Screen layout: a padded column of source fields, and the accessory bar
//! anchored to the bottom edge at full width.

use accessory_core::{BarMetrics, FieldId, FormConfig, Rect, Size, Vec2};
use taffy::prelude::{AvailableSpace, FlexDirection, NodeId, Style, TaffyTree, auto, length, percent};
use taffy::{Overflow, Point};

use crate::ScreenError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpec {
    pub field_height: f32,
    pub padding: f32,
    pub gap: f32,
    pub bar: BarMetrics,
}

impl From<&FormConfig> for LayoutSpec {
    fn from(cfg: &FormConfig) -> Self {
        Self {
            field_height: cfg.field_height,
            padding: cfg.padding,
            gap: cfg.gap,
            bar: cfg.bar,
        }
    }
}

/// What a pointer landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Source(FieldId),
    Accessory,
    Background,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScreenLayout {
    pub viewport: Rect,
    pub fields: Vec<(FieldId, Rect)>,
    /// Container anchored to the bottom of the viewport.
    pub bar: Rect,
    /// The accessory field inside the bar.
    pub accessory: Rect,
}

impl ScreenLayout {
    pub fn field_rect(&self, id: FieldId) -> Option<Rect> {
        self.fields.iter().find(|(f, _)| *f == id).map(|(_, r)| *r)
    }

    /// The accessory bar only takes hits while it is shown; it sits above the
    /// fields when they overlap.
    pub fn hit_test(&self, pos: Vec2, bar_visible: bool) -> Hit {
        if bar_visible && self.bar.contains(pos) {
            return if self.accessory.contains(pos) {
                Hit::Accessory
            } else {
                Hit::Background
            };
        }
        self.fields
            .iter()
            .rev()
            .find(|(_, r)| r.contains(pos))
            .map(|(id, _)| Hit::Source(*id))
            .unwrap_or(Hit::Background)
    }
}

pub fn layout_screen(
    spec: &LayoutSpec,
    ids: &[FieldId],
    viewport: Size,
) -> Result<ScreenLayout, ScreenError> {
    let mut taffy: TaffyTree<()> = TaffyTree::new();

    let field_nodes = ids
        .iter()
        .map(|_| {
            taffy.new_leaf(Style {
                size: taffy::geometry::Size {
                    width: auto(),
                    height: length(spec.field_height),
                },
                flex_shrink: 0.0,
                ..Default::default()
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let p = length(spec.padding);
    let content = taffy.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            flex_grow: 1.0,
            min_size: taffy::geometry::Size {
                width: auto(),
                height: length(0.0),
            },
            overflow: Point {
                x: Overflow::Hidden,
                y: Overflow::Hidden,
            },
            padding: taffy::geometry::Rect {
                left: p,
                right: p,
                top: p,
                bottom: p,
            },
            gap: taffy::geometry::Size {
                width: length(0.0),
                height: length(spec.gap),
            },
            ..Default::default()
        },
        &field_nodes,
    )?;

    let accessory = taffy.new_leaf(Style {
        flex_grow: 1.0,
        ..Default::default()
    })?;
    let bar = taffy.new_with_children(
        Style {
            flex_direction: FlexDirection::Row,
            flex_shrink: 0.0,
            size: taffy::geometry::Size {
                width: percent(1.0),
                height: length(spec.bar.height),
            },
            padding: taffy::geometry::Rect {
                left: length(spec.bar.inset_x),
                right: length(spec.bar.inset_x),
                top: length(spec.bar.inset_y),
                bottom: length(spec.bar.inset_y),
            },
            ..Default::default()
        },
        &[accessory],
    )?;

    let root = taffy.new_with_children(
        Style {
            flex_direction: FlexDirection::Column,
            size: taffy::geometry::Size {
                width: length(viewport.width),
                height: length(viewport.height),
            },
            ..Default::default()
        },
        &[content, bar],
    )?;

    taffy.compute_layout(
        root,
        taffy::geometry::Size {
            width: AvailableSpace::Definite(viewport.width),
            height: AvailableSpace::Definite(viewport.height),
        },
    )?;

    fn layout_of(node: NodeId, t: &TaffyTree<()>) -> Result<Rect, ScreenError> {
        let l = t.layout(node)?;
        Ok(Rect {
            x: l.location.x,
            y: l.location.y,
            w: l.size.width,
            h: l.size.height,
        })
    }

    // Locations are parent-relative.
    let content_rect = layout_of(content, &taffy)?;
    let bar_rect = layout_of(bar, &taffy)?;
    let accessory_rect = layout_of(accessory, &taffy)?.translate(bar_rect.x, bar_rect.y);

    let mut fields = Vec::with_capacity(ids.len());
    for (id, node) in ids.iter().zip(&field_nodes) {
        let r = layout_of(*node, &taffy)?.translate(content_rect.x, content_rect.y);
        fields.push((*id, r));
    }

    Ok(ScreenLayout {
        viewport: Rect::new(0.0, 0.0, viewport.width, viewport.height),
        fields,
        bar: bar_rect,
        accessory: accessory_rect,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<FieldId> {
        vec![FieldId(1), FieldId(2)]
    }

    fn terminal_spec() -> LayoutSpec {
        LayoutSpec::from(&FormConfig::default())
    }

    #[test]
    fn bar_is_anchored_to_bottom_at_full_width() {
        let l = layout_screen(&terminal_spec(), &ids(), Size::new(40.0, 20.0)).unwrap();
        assert_eq!(l.bar, Rect::new(0.0, 17.0, 40.0, 3.0));
        assert_eq!(l.accessory, Rect::new(1.0, 17.0, 38.0, 3.0));
    }

    #[test]
    fn fields_stack_with_padding_and_gap() {
        let l = layout_screen(&terminal_spec(), &ids(), Size::new(40.0, 20.0)).unwrap();
        assert_eq!(
            l.field_rect(FieldId(1)),
            Some(Rect::new(1.0, 1.0, 38.0, 3.0))
        );
        assert_eq!(
            l.field_rect(FieldId(2)),
            Some(Rect::new(1.0, 5.0, 38.0, 3.0))
        );
    }

    #[test]
    fn touch_metrics_inset_the_field() {
        let spec = LayoutSpec {
            field_height: 44.0,
            padding: 16.0,
            gap: 8.0,
            bar: BarMetrics::TOUCH,
        };
        let l = layout_screen(&spec, &ids(), Size::new(390.0, 844.0)).unwrap();
        assert_eq!(l.bar, Rect::new(0.0, 774.0, 390.0, 70.0));
        assert_eq!(l.accessory, Rect::new(16.0, 782.0, 358.0, 54.0));
    }

    #[test]
    fn hit_testing() {
        let l = layout_screen(&terminal_spec(), &ids(), Size::new(40.0, 20.0)).unwrap();
        let at = |x, y| Vec2 { x, y };
        assert_eq!(l.hit_test(at(5.0, 2.0), false), Hit::Source(FieldId(1)));
        assert_eq!(l.hit_test(at(5.0, 6.0), true), Hit::Source(FieldId(2)));
        assert_eq!(l.hit_test(at(5.0, 4.0), false), Hit::Background);
        assert_eq!(l.hit_test(at(5.0, 18.0), true), Hit::Accessory);
        assert_eq!(l.hit_test(at(0.0, 18.0), true), Hit::Background);
        assert_eq!(l.hit_test(at(5.0, 18.0), false), Hit::Background);
    }
}
