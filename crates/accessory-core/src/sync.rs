//! Accessory field synchronizer.
//!
//! Owns the single accessory field and the route that ties it to one source
//! field at a time:
//!
//! ```text
//! Unrouted --focus gained(f)--> RoutedFrom(f) --submit / background tap--> Unrouted
//! ```
//!
//! ```rust
//! use accessory_core::*;
//!
//! let fields = FieldSet::new()
//!     .with_field("First Name", "First Name", true)
//!     .with_field("Last Name", "Last Name", true);
//! let mut sync = AccessorySynchronizer::new(fields, FocusState::new());
//!
//! sync.on_source_focus_gained(FieldId(1)).unwrap();
//! sync.accessory_mut().set_text("Grace");
//! let commit = sync.on_accessory_submit();
//!
//! assert_eq!(commit.map(|c| c.value), Some("Grace".to_string()));
//! assert_eq!(sync.route(), Route::Unrouted);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::{ControlId, FieldId, FieldSet, FocusHost, Route, Signal, SourceField, SubId, SyncError};

/// The floating field shown above the keyboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessoryField {
    text: String,
    placeholder: String,
    route: Route,
}

impl AccessoryField {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn route(&self) -> Route {
        self.route
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyboardVisibility {
    #[default]
    Hidden,
    Shown,
}

/// Input events the synchronizer understands, as delivered by a host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncEvent {
    FocusGained(FieldId),
    /// Submit; `Some(text)` replaces the accessory text first.
    Submit(Option<String>),
    BackgroundTap,
    Keyboard(KeyboardVisibility),
}

/// A value written back into a source field by a submit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub field: FieldId,
    pub value: String,
}

pub struct AccessorySynchronizer<F: FocusHost> {
    fields: FieldSet,
    accessory: AccessoryField,
    focus: F,
}

impl<F: FocusHost> AccessorySynchronizer<F> {
    pub fn new(fields: FieldSet, focus: F) -> Self {
        Self {
            fields,
            accessory: AccessoryField::default(),
            focus,
        }
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&SourceField> {
        self.fields.get(id)
    }

    pub fn accessory(&self) -> &AccessoryField {
        &self.accessory
    }

    /// Mutable access for user edits. The route can only change through the
    /// event operations below.
    pub fn accessory_mut(&mut self) -> &mut AccessoryField {
        &mut self.accessory
    }

    pub fn route(&self) -> Route {
        self.accessory.route
    }

    pub fn focus(&self) -> &F {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut F {
        &mut self.focus
    }

    /// Direct write to a source field by the host (not through the accessory).
    pub fn set_source_text(&mut self, id: FieldId, text: impl Into<String>) -> Result<(), SyncError> {
        let field = self.fields.get_mut(id).ok_or(SyncError::UnknownField(id))?;
        field.text = text.into();
        Ok(())
    }

    /// Routes the accessory field to `id`: copies its current value and
    /// placeholder and moves focus to the accessory field.
    ///
    /// Pending text of a previous route is replaced, not written back; hosts
    /// that keep it call [`Self::flush_pending`] first. An unknown id is
    /// rejected and nothing changes.
    pub fn on_source_focus_gained(&mut self, id: FieldId) -> Result<(), SyncError> {
        if !self.fields.contains(id) {
            log::warn!("focus gained for unknown field {id}; ignoring");
            return Err(SyncError::UnknownField(id));
        }

        let field = self.fields.get(id).ok_or(SyncError::UnknownField(id))?;
        self.accessory.text = field.text.clone();
        self.accessory.placeholder = field.placeholder.clone();
        let from = std::mem::replace(&mut self.accessory.route, Route::RoutedFrom(id));
        log::trace!("route {from:?} -> {:?}", self.accessory.route);

        self.focus.request_focus(ControlId::Accessory);
        Ok(())
    }

    /// Writes the accessory text back to the routed source field, applies the
    /// field's clear-on-submit option, unroutes and releases focus.
    ///
    /// Returns the commit, or `None` when unrouted.
    pub fn on_accessory_submit(&mut self) -> Option<Commit> {
        let commit = match self.accessory.route {
            Route::Unrouted => None,
            Route::RoutedFrom(id) => match self.fields.get_mut(id) {
                Some(field) => {
                    field.text = self.accessory.text.clone();
                    if field.clear_on_submit {
                        self.accessory.text.clear();
                    }
                    log::debug!("submit {id}: {:?}", field.text);
                    Some(Commit {
                        field: id,
                        value: field.text.clone(),
                    })
                }
                None => {
                    log::warn!("route points at missing field {id}; dropping submit");
                    None
                }
            },
        };
        self.unroute();
        commit
    }

    /// Hook consulted before `control` begins editing. When `control` is the
    /// accessory field or the source field it is routed from, that source
    /// field is re-synced from the accessory's pending text so a missed or
    /// duplicated routing transition cannot lose an edit. Always allows.
    pub fn should_begin_editing(&mut self, control: ControlId) -> bool {
        log::trace!("begin editing {control:?} (route {:?})", self.accessory.route);
        let routed = self.accessory.route.field().map(ControlId::Source);
        if control == ControlId::Accessory || Some(control) == routed {
            self.flush_pending();
        }
        true
    }

    /// Dismisses the keyboard: releases focus and unroutes. Pending text is
    /// not written back. Idempotent.
    pub fn on_background_tap(&mut self) {
        self.unroute();
    }

    /// Keyboard is about to appear: route to the focused source field, if any,
    /// then make sure the accessory field holds focus while routed.
    pub fn on_keyboard_will_show(&mut self) -> Result<(), SyncError> {
        match self.focus.focused_control() {
            Some(ControlId::Source(id)) => self.on_source_focus_gained(id),
            Some(ControlId::Accessory) => Ok(()),
            None => {
                if self.accessory.route.is_routed() {
                    self.focus.request_focus(ControlId::Accessory);
                } else {
                    log::trace!("keyboard shown with nothing focused");
                }
                Ok(())
            }
        }
    }

    pub fn on_keyboard_will_hide(&mut self) {
        log::trace!("keyboard hidden (route {:?})", self.accessory.route);
    }

    pub fn handle(&mut self, event: SyncEvent) -> Result<Option<Commit>, SyncError> {
        match event {
            SyncEvent::FocusGained(id) => self.on_source_focus_gained(id).map(|_| None),
            SyncEvent::Submit(text) => {
                if let Some(text) = text {
                    self.accessory.text = text;
                }
                Ok(self.on_accessory_submit())
            }
            SyncEvent::BackgroundTap => {
                self.on_background_tap();
                Ok(None)
            }
            SyncEvent::Keyboard(KeyboardVisibility::Shown) => {
                self.on_keyboard_will_show().map(|_| None)
            }
            SyncEvent::Keyboard(KeyboardVisibility::Hidden) => {
                self.on_keyboard_will_hide();
                Ok(None)
            }
        }
    }

    /// Writes the accessory's pending text into the routed source field.
    /// Returns `true` if the field changed. The route is kept.
    pub fn flush_pending(&mut self) -> bool {
        let Route::RoutedFrom(id) = self.accessory.route else {
            return false;
        };
        match self.fields.get_mut(id) {
            Some(field) if field.text != self.accessory.text => {
                log::debug!("re-sync {id} from pending accessory text");
                field.text = self.accessory.text.clone();
                true
            }
            Some(_) => false,
            None => {
                log::warn!("route points at missing field {id}");
                false
            }
        }
    }

    fn unroute(&mut self) {
        let from = std::mem::take(&mut self.accessory.route);
        if from.is_routed() {
            log::trace!("route {from:?} -> Unrouted");
        }
        self.focus.resign_focus(ControlId::Accessory);
    }
}

impl<F: FocusHost + 'static> AccessorySynchronizer<F> {
    /// Subscribes the synchronizer to keyboard visibility changes. The
    /// subscription holds a weak reference; once the synchronizer is dropped
    /// notifications are ignored.
    pub fn bind_keyboard(this: &Rc<RefCell<Self>>, keyboard: &Signal<KeyboardVisibility>) -> SubId {
        let weak: Weak<RefCell<Self>> = Rc::downgrade(this);
        keyboard.subscribe(move |vis| {
            let Some(sync) = weak.upgrade() else {
                return;
            };
            let Ok(mut sync) = sync.try_borrow_mut() else {
                log::warn!("keyboard {vis:?} while synchronizer is busy; skipped");
                return;
            };
            if let Err(e) = sync.handle(SyncEvent::Keyboard(*vis)) {
                log::warn!("keyboard {vis:?}: {e}");
            }
        })
    }
}
