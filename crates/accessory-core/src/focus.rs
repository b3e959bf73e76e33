//! Focus capability.
//!
//! The synchronizer never asks a widget toolkit directly which control holds
//! input focus. Hosts implement [`FocusHost`] on top of whatever they have
//! (DOM focus, native responders, a terminal cursor) and hand it in.

use crate::FieldId;

/// A control that can hold input focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlId {
    Source(FieldId),
    Accessory,
}

pub trait FocusHost {
    /// The control currently receiving keyboard input, if any.
    fn focused_control(&self) -> Option<ControlId>;

    fn request_focus(&mut self, control: ControlId);

    /// Gives up focus if `control` holds it; otherwise does nothing.
    fn resign_focus(&mut self, control: ControlId);
}

impl<T: FocusHost + ?Sized> FocusHost for Box<T> {
    fn focused_control(&self) -> Option<ControlId> {
        (**self).focused_control()
    }
    fn request_focus(&mut self, control: ControlId) {
        (**self).request_focus(control)
    }
    fn resign_focus(&mut self, control: ControlId) {
        (**self).resign_focus(control)
    }
}

/// Plain in-memory focus, for hosts that own their focus model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusState {
    focused: Option<ControlId>,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_focused(&self, control: ControlId) -> bool {
        self.focused == Some(control)
    }
}

impl FocusHost for FocusState {
    fn focused_control(&self) -> Option<ControlId> {
        self.focused
    }

    fn request_focus(&mut self, control: ControlId) {
        if self.focused != Some(control) {
            log::trace!("focus {:?} -> {:?}", self.focused, control);
            self.focused = Some(control);
        }
    }

    fn resign_focus(&mut self, control: ControlId) {
        if self.focused == Some(control) {
            log::trace!("focus {:?} -> none", control);
            self.focused = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resign_only_clears_the_holder() {
        let mut f = FocusState::new();
        f.request_focus(ControlId::Source(FieldId(1)));
        f.resign_focus(ControlId::Accessory);
        assert_eq!(f.focused_control(), Some(ControlId::Source(FieldId(1))));

        f.request_focus(ControlId::Accessory);
        f.resign_focus(ControlId::Accessory);
        assert_eq!(f.focused_control(), None);
    }

    #[test]
    fn boxed_host_forwards() {
        let mut f: Box<dyn FocusHost> = Box::new(FocusState::new());
        f.request_focus(ControlId::Accessory);
        assert_eq!(f.focused_control(), Some(ControlId::Accessory));
    }
}
