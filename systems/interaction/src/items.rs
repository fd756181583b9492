//! Items lying on the dungeon floor.

use delve_core::{DroppedItem, Event, ItemId, ItemKind};
use glam::Vec2;

/// Floor items together with the identifier allocator that names them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DroppedItems {
    items: Vec<DroppedItem>,
    next_id: u32,
}

impl DroppedItems {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a new item on the floor and reports it.
    pub fn spawn(&mut self, kind: ItemKind, position: Vec2, out_events: &mut Vec<Event>) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        self.items.push(DroppedItem::new(id, kind, position));
        out_events.push(Event::ItemDropped {
            item: id,
            kind,
            position,
        });
        id
    }

    /// Items in placement order, including collected ones still fading out.
    #[must_use]
    pub fn as_slice(&self) -> &[DroppedItem] {
        &self.items
    }

    /// Number of tracked items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Reports whether no items are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Index of the closest uncollected item within `radius` of `position`.
    ///
    /// Ties keep the item placed first.
    #[must_use]
    pub fn nearest_uncollected(&self, position: Vec2, radius: f32) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, item) in self.items.iter().enumerate() {
            if item.collected {
                continue;
            }
            let distance = item.position.distance(position);
            if distance > radius {
                continue;
            }
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&DroppedItem> {
        self.items.get(index)
    }

    pub(crate) fn mark_collected(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.collected = true;
            item.collected_for = 0;
        }
    }

    /// Ages collected items and forgets those whose pickup fade finished.
    pub fn prune(&mut self, fade_ticks: u32) {
        for item in self.items.iter_mut().filter(|item| item.collected) {
            item.collected_for += 1;
        }
        self.items
            .retain(|item| !item.collected || item.collected_for < fade_ticks);
    }
}
