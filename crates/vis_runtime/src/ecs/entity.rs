//! Entity implementation

use slotmap::Key;

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// The handle carries a version, so a handle to a destroyed entity never
    /// aliases an entity that later reuses the same slot.
    pub struct Entity;
}

impl Entity {
    /// Get the entity ID as a single integer
    pub fn id(self) -> u64 {
        self.data().as_ffi()
    }
}
