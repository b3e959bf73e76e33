use accessory_core::{Rect, Vec2};

/// How a node should be styled by the painter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Normal,
    Placeholder,
    /// Frame of the control that currently holds focus.
    Focused,
    Bar,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Fill {
        rect: Rect,
        tone: Tone,
    },
    Border {
        rect: Rect,
        title: Option<String>,
        tone: Tone,
    },
    Text {
        rect: Rect,
        text: String,
        tone: Tone,
    },
    Caret {
        pos: Vec2,
    },
}

/// Flat, back-to-front list of things to draw.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn push(&mut self, node: SceneNode) {
        self.nodes.push(node);
    }

    pub fn caret(&self) -> Option<Vec2> {
        self.nodes.iter().rev().find_map(|n| match n {
            SceneNode::Caret { pos } => Some(*pos),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}
