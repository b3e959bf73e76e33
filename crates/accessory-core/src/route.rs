use crate::FieldId;

/// Which source field the accessory field is currently editing for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Route {
    #[default]
    Unrouted,
    RoutedFrom(FieldId),
}

impl Route {
    pub fn field(self) -> Option<FieldId> {
        match self {
            Route::Unrouted => None,
            Route::RoutedFrom(id) => Some(id),
        }
    }

    pub fn is_routed(self) -> bool {
        matches!(self, Route::RoutedFrom(_))
    }
}
