//! The form screen: source fields, the accessory bar, and the mapping from raw
//! input to synchronizer events.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use accessory_core::*;
use web_time::Instant;

use crate::layout::{Hit, LayoutSpec, ScreenLayout, layout_screen};
use crate::scene::{Scene, SceneNode, Tone};
use crate::textfield::{TF_PADDING_X, TextFieldState};
use crate::ScreenError;

const DONE_HINT: &str = "Enter: Done";

pub struct AccessoryScreen {
    sync: Rc<RefCell<AccessorySynchronizer<FocusState>>>,
    keyboard: Signal<KeyboardVisibility>,
    keyboard_sub: SubId,
    /// Editing buffer mirrored into the accessory field after every edit.
    editor: TextFieldState,
    spec: LayoutSpec,
    layout: ScreenLayout,
}

impl AccessoryScreen {
    pub fn new(config: &FormConfig, viewport: Size) -> Result<Self, ScreenError> {
        let fields = config.build_fields();
        let ids: Vec<FieldId> = fields.ids().collect();
        let spec = LayoutSpec::from(config);
        let layout = layout_screen(&spec, &ids, viewport)?;

        let sync = Rc::new(RefCell::new(AccessorySynchronizer::new(fields, FocusState::new())));
        let keyboard = signal(KeyboardVisibility::Hidden);
        let keyboard_sub = AccessorySynchronizer::bind_keyboard(&sync, &keyboard);

        Ok(Self {
            sync,
            keyboard,
            keyboard_sub,
            editor: TextFieldState::new(),
            spec,
            layout,
        })
    }

    pub fn synchronizer(&self) -> Ref<'_, AccessorySynchronizer<FocusState>> {
        self.sync.borrow()
    }

    pub fn keyboard(&self) -> &Signal<KeyboardVisibility> {
        &self.keyboard
    }

    pub fn keyboard_visible(&self) -> bool {
        self.keyboard.with(|v| *v == KeyboardVisibility::Shown)
    }

    pub fn route(&self) -> Route {
        self.sync.borrow().route()
    }

    pub fn field_text(&self, id: FieldId) -> Option<String> {
        self.sync.borrow().field(id).map(|f| f.text.clone())
    }

    pub fn editor(&self) -> &TextFieldState {
        &self.editor
    }

    pub fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    pub fn resize(&mut self, viewport: Size) -> Result<(), ScreenError> {
        log::trace!("viewport {}x{}", viewport.width, viewport.height);
        let ids: Vec<FieldId> = self.sync.borrow().fields().ids().collect();
        self.layout = layout_screen(&self.spec, &ids, viewport)?;
        self.editor.ensure_caret_visible(self.inner_width());
        Ok(())
    }

    /// Focuses a source field and raises the keyboard, which routes the
    /// accessory field to it. Text pending for a different field is written
    /// back to that field first.
    pub fn focus_field(&mut self, id: FieldId) -> Result<(), ScreenError> {
        {
            let mut sync = self.sync.borrow_mut();
            if !sync.fields().contains(id) {
                log::warn!("focus requested for unknown field {id}");
                return Err(SyncError::UnknownField(id).into());
            }
            if sync.route().field().is_some_and(|routed| routed != id) {
                sync.flush_pending();
            }
            if sync.should_begin_editing(ControlId::Source(id)) {
                sync.focus_mut().request_focus(ControlId::Source(id));
            }
        }
        self.keyboard.set(KeyboardVisibility::Shown);
        self.pull_accessory();
        Ok(())
    }

    /// Tab order: the field after (or before) the routed one.
    pub fn focus_next(&mut self, reverse: bool) -> Result<(), ScreenError> {
        let next = {
            let sync = self.sync.borrow();
            let current = sync.route().field();
            if reverse {
                sync.fields().prev_before(current)
            } else {
                sync.fields().next_after(current)
            }
        };
        match next {
            Some(id) => self.focus_field(id),
            None => Ok(()),
        }
    }

    pub fn submit(&mut self) -> Option<Commit> {
        self.push_accessory();
        let commit = self.sync.borrow_mut().on_accessory_submit();
        self.keyboard.set(KeyboardVisibility::Hidden);
        self.pull_accessory();
        commit
    }

    pub fn dismiss(&mut self) {
        self.sync.borrow_mut().on_background_tap();
        self.keyboard.set(KeyboardVisibility::Hidden);
        self.pull_accessory();
    }

    pub fn handle(&mut self, event: &InputEvent) -> Result<Option<Commit>, ScreenError> {
        match event {
            InputEvent::Resize(size) => self.resize(*size).map(|_| None),
            InputEvent::Text(text) => {
                self.edit(|e| e.insert_text(text));
                Ok(None)
            }
            InputEvent::Pointer(p) if p.event == PointerEventKind::Down => {
                match self.layout.hit_test(p.position, self.keyboard_visible()) {
                    Hit::Source(id) => self.focus_field(id).map(|_| None),
                    Hit::Accessory => {
                        let mut sync = self.sync.borrow_mut();
                        if sync.route().is_routed() && sync.should_begin_editing(ControlId::Accessory) {
                            sync.focus_mut().request_focus(ControlId::Accessory);
                        }
                        Ok(None)
                    }
                    Hit::Background => {
                        self.dismiss();
                        Ok(None)
                    }
                }
            }
            InputEvent::Pointer(_) => Ok(None),
            InputEvent::Key(key) => self.handle_key(*key),
        }
    }

    fn handle_key(&mut self, k: KeyEvent) -> Result<Option<Commit>, ScreenError> {
        let shift = k.modifiers.contains(Modifiers::SHIFT);
        match k.key {
            Key::Tab => return self.focus_next(shift).map(|_| None),
            Key::Enter => return Ok(self.submit()),
            Key::Escape => self.dismiss(),
            Key::Character(c) => {
                if !k.modifiers.intersects(Modifiers::CTRL | Modifiers::ALT | Modifiers::META) {
                    self.edit(|e| {
                        let mut buf = [0u8; 4];
                        e.insert_text(c.encode_utf8(&mut buf));
                    });
                }
            }
            Key::Backspace => self.edit(|e| e.delete_backward()),
            Key::Delete => self.edit(|e| e.delete_forward()),
            Key::ArrowLeft => self.edit(|e| e.move_cursor(-1, shift)),
            Key::ArrowRight => self.edit(|e| e.move_cursor(1, shift)),
            Key::Home => self.edit(|e| e.move_home(shift)),
            Key::End => self.edit(|e| e.move_end(shift)),
        }
        Ok(None)
    }

    pub fn scene(&self, now: Instant) -> Scene {
        let sync = self.sync.borrow();
        let route = sync.route();
        let mut scene = Scene::default();

        for (id, rect) in &self.layout.fields {
            let Some(field) = sync.field(*id) else {
                continue;
            };
            let tone = if route == Route::RoutedFrom(*id) {
                Tone::Focused
            } else {
                Tone::Normal
            };
            scene.push(SceneNode::Border {
                rect: *rect,
                title: Some(field.label.clone()),
                tone,
            });
            scene.push(SceneNode::Text {
                rect: rect.inset(TF_PADDING_X, 1.0),
                text: field.display_text().to_string(),
                tone: if field.text.is_empty() {
                    Tone::Placeholder
                } else {
                    Tone::Normal
                },
            });
        }

        if !self.keyboard_visible() {
            return scene;
        }

        let accessory_focused = sync.focus().is_focused(ControlId::Accessory);
        let title = match route.field().and_then(|id| sync.field(id)) {
            Some(f) => format!("{} \u{b7} {DONE_HINT}", f.label),
            None => DONE_HINT.to_string(),
        };
        let inner = self.layout.accessory.inset(TF_PADDING_X, 1.0);

        scene.push(SceneNode::Fill {
            rect: self.layout.bar,
            tone: Tone::Bar,
        });
        scene.push(SceneNode::Border {
            rect: self.layout.accessory,
            title: Some(title),
            tone: if accessory_focused {
                Tone::Focused
            } else {
                Tone::Normal
            },
        });

        let (visible, caret_dx) = self.editor.visible_slice(inner.w);
        if self.editor.text.is_empty() {
            scene.push(SceneNode::Text {
                rect: inner,
                text: sync.accessory().placeholder().to_string(),
                tone: Tone::Placeholder,
            });
        } else {
            scene.push(SceneNode::Text {
                rect: inner,
                text: visible.to_string(),
                tone: Tone::Normal,
            });
        }
        if accessory_focused && self.editor.caret_visible_at(now) {
            scene.push(SceneNode::Caret {
                pos: Vec2 {
                    x: inner.x + caret_dx,
                    y: inner.y,
                },
            });
        }
        scene
    }

    fn inner_width(&self) -> f32 {
        (self.layout.accessory.w - 2.0 * TF_PADDING_X).max(0.0)
    }

    /// Applies an edit to the accessory buffer; ignored while unrouted.
    fn edit(&mut self, f: impl FnOnce(&mut TextFieldState)) {
        if !self.sync.borrow().route().is_routed() {
            return;
        }
        f(&mut self.editor);
        self.editor.ensure_caret_visible(self.inner_width());
        self.push_accessory();
    }

    fn push_accessory(&mut self) {
        self.sync
            .borrow_mut()
            .accessory_mut()
            .set_text(self.editor.text.clone());
    }

    fn pull_accessory(&mut self) {
        let text = self.sync.borrow().accessory().text().to_string();
        self.editor.set_text(&text);
        self.editor.ensure_caret_visible(self.inner_width());
    }
}

impl Drop for AccessoryScreen {
    fn drop(&mut self) {
        self.keyboard.unsubscribe(self.keyboard_sub);
    }
}
