use derive_more::{Deref, Display};

/// Identifies an entity in a [`World`](crate::World).
///
/// Ids are never reused, so a stale id of a destroyed entity can't address a newer one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deref, Display)]
#[display("#{_0}")]
pub struct EntityId(u32);

#[derive(Debug, Default)]
pub struct Generator {
    next_id: u32,
}

impl Generator {
    pub fn acquire(&mut self) -> EntityId {
        let this_id = self.next_id;
        self.next_id += 1;
        EntityId(this_id)
    }
}
