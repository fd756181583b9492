//! Fixed-size hotbar inventory.

use delve_core::{ItemKind, HOTBAR_SLOTS};

/// Contents of a single hotbar slot.
///
/// A slot is empty exactly when its count is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InventorySlot {
    kind: ItemKind,
    count: u32,
}

impl InventorySlot {
    /// Unused slot.
    pub const EMPTY: Self = Self {
        kind: ItemKind::Empty,
        count: 0,
    };

    /// Creates a slot holding `count` items, or an empty slot when either
    /// argument describes nothing.
    #[must_use]
    pub const fn new(kind: ItemKind, count: u32) -> Self {
        if count == 0 || kind.is_empty() {
            return Self::EMPTY;
        }
        Self { kind, count }
    }

    /// Kind of item stored in the slot.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Number of items stored in the slot.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Reports whether the slot is unused.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Seven-slot hotbar with a selection cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Inventory {
    slots: [InventorySlot; HOTBAR_SLOTS],
    selected: usize,
}

impl Inventory {
    /// Empty hotbar with the first slot selected.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Hotbar the player starts with: a rusty sword in the first slot.
    #[must_use]
    pub fn starter() -> Self {
        Self::from_slots([InventorySlot::new(ItemKind::RustySword, 1)])
    }

    /// Builds a hotbar from leading slots; the rest stay empty.
    #[must_use]
    pub fn from_slots<const N: usize>(leading: [InventorySlot; N]) -> Self {
        let mut inventory = Self::empty();
        for (slot, contents) in inventory.slots.iter_mut().zip(leading) {
            *slot = contents;
        }
        inventory
    }

    /// All slots in hotbar order.
    #[must_use]
    pub fn slots(&self) -> &[InventorySlot; HOTBAR_SLOTS] {
        &self.slots
    }

    /// Index of the selected slot.
    #[must_use]
    pub const fn selected(&self) -> usize {
        self.selected
    }

    /// Item kind in the selected slot.
    #[must_use]
    pub fn selected_kind(&self) -> ItemKind {
        self.slots[self.selected].kind
    }

    /// Selects the provided slot, ignoring out-of-range indices.
    pub fn select(&mut self, slot: usize) -> bool {
        if slot >= HOTBAR_SLOTS {
            return false;
        }
        self.selected = slot;
        true
    }

    /// Moves the selection right, wrapping to the first slot.
    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % HOTBAR_SLOTS;
    }

    /// Moves the selection left, wrapping to the last slot.
    pub fn select_previous(&mut self) {
        self.selected = (self.selected + HOTBAR_SLOTS - 1) % HOTBAR_SLOTS;
    }

    /// Stores one item, returning the slot that received it.
    ///
    /// Stackable kinds merge into an existing stack first. Everything else
    /// occupies the first empty slot. `None` means the hotbar is full.
    pub fn insert(&mut self, kind: ItemKind) -> Option<usize> {
        if kind.is_empty() {
            return None;
        }
        if kind.is_stackable() {
            if let Some(index) = self.slots.iter().position(|slot| slot.kind == kind) {
                self.slots[index].count += 1;
                return Some(index);
            }
        }
        let index = self.slots.iter().position(InventorySlot::is_empty)?;
        self.slots[index] = InventorySlot::new(kind, 1);
        Some(index)
    }

    /// Uses up one item from the slot, leaving an emptied slot in place.
    pub fn consume(&mut self, slot: usize) -> Option<ItemKind> {
        let contents = self.slots.get_mut(slot)?;
        if contents.is_empty() {
            return None;
        }
        let kind = contents.kind;
        *contents = InventorySlot::new(kind, contents.count - 1);
        Some(kind)
    }

    /// Removes one item from the slot for dropping.
    ///
    /// An emptied slot is removed and every later slot shifts one to the left.
    pub fn take_for_drop(&mut self, slot: usize) -> Option<ItemKind> {
        let kind = self.consume(slot)?;
        if self.slots[slot].is_empty() {
            self.slots[slot..].rotate_left(1);
        }
        Some(kind)
    }
}
