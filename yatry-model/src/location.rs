use std::fmt;

/// Generate a typed arena-index wrapper around `u32`.
///
/// Mirrors the teacher's `LocationIdx`/`CopyStr` typed-id convention: a
/// `Copy` newtype that is cheap to pass around and indexes directly into
/// `Vec`-backed arenas rather than holding a shared reference.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub(crate) u32);

        impl $name {
            #[inline(always)]
            pub fn new(value: u32) -> Self {
                $name(value)
            }

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

typed_id! {
    /// An opaque location identifier drawn from the atlas registered with a
    /// [`crate::MapGraph`]. Compared by identity (the wrapped arena index),
    /// never by name.
    pub struct LocationId;
}

typed_id! {
    /// An opaque passenger identifier; the index into the batch a
    /// [`crate::Passenger`] list was constructed from.
    pub struct PassengerId;
}
