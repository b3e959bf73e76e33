use std::fmt;

use smallvec::SmallVec;

/// Stable 1-based identity of a source field on the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(pub u8);

impl FieldId {
    fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the persistent input fields on the main screen.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceField {
    id: FieldId,
    pub label: String,
    pub text: String,
    pub placeholder: String,
    /// Clear the accessory field's text after a submit routed to this field.
    pub clear_on_submit: bool,
}

impl SourceField {
    pub fn id(&self) -> FieldId {
        self.id
    }

    /// Text to display: the value, or the placeholder while empty.
    pub fn display_text(&self) -> &str {
        if self.text.is_empty() {
            &self.placeholder
        } else {
            &self.text
        }
    }
}

/// The fixed set of source fields. Ids are assigned in insertion order,
/// starting at 1, and never change.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldSet {
    fields: SmallVec<[SourceField; 2]>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and returns its id. Returns `None` once 255 fields exist.
    pub fn push(
        &mut self,
        label: impl Into<String>,
        placeholder: impl Into<String>,
        clear_on_submit: bool,
    ) -> Option<FieldId> {
        let n = u8::try_from(self.fields.len() + 1).ok()?;
        let id = FieldId(n);
        self.fields.push(SourceField {
            id,
            label: label.into(),
            text: String::new(),
            placeholder: placeholder.into(),
            clear_on_submit,
        });
        Some(id)
    }

    pub fn with_field(
        mut self,
        label: impl Into<String>,
        placeholder: impl Into<String>,
        clear_on_submit: bool,
    ) -> Self {
        if self.push(label, placeholder, clear_on_submit).is_none() {
            log::warn!("field set is full; dropping extra field");
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: FieldId) -> Option<&SourceField> {
        self.fields.get(id.index()?)
    }

    pub fn get_mut(&mut self, id: FieldId) -> Option<&mut SourceField> {
        self.fields.get_mut(id.index()?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceField> {
        self.fields.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.iter().map(|f| f.id)
    }

    /// Next id in tab order, wrapping. `None` starts at the first field.
    pub fn next_after(&self, id: Option<FieldId>) -> Option<FieldId> {
        let n = self.fields.len();
        if n == 0 {
            return None;
        }
        let i = match id.and_then(|id| id.index()).filter(|i| *i < n) {
            Some(i) => (i + 1) % n,
            None => 0,
        };
        Some(self.fields[i].id)
    }

    /// Previous id in tab order, wrapping. `None` starts at the last field.
    pub fn prev_before(&self, id: Option<FieldId>) -> Option<FieldId> {
        let n = self.fields.len();
        if n == 0 {
            return None;
        }
        let i = match id.and_then(|id| id.index()).filter(|i| *i < n) {
            Some(i) => (i + n - 1) % n,
            None => n - 1,
        };
        Some(self.fields[i].id)
    }
}
