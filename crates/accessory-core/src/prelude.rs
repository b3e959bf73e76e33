pub use crate::{
    AccessorySynchronizer, ControlId, FieldId, FieldSet, FocusHost, FocusState, FormConfig,
    KeyboardVisibility, Route, Signal, SyncEvent, signal,
};
