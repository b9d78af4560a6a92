use serde::Serialize;

use crate::interaction::{EntityId, ItemRetirement};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectResult {
    Collected { snapshot: Vec<String> },
    AlreadyCollected,
}

/// Append-only list of collected display names. Whether an item is still
/// collectable is decided by the world alone.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Inventory {
    entries: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retires `item` from `world` and records it. An item that is no longer
    /// in the world is a no-op.
    pub fn collect<W>(&mut self, world: &mut W, item: &EntityId, display_name: &str) -> CollectResult
    where
        W: ItemRetirement + ?Sized,
    {
        if !world.retire(item) {
            log::warn!("ignoring collection of `{item}`: not in the world");
            return CollectResult::AlreadyCollected;
        }
        self.entries.push(display_name.to_string());
        log::info!("collected `{item}` as {display_name}");
        CollectResult::Collected {
            snapshot: self.entries.clone(),
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use bracket_geometry::prelude::Point;

    use super::*;
    use crate::interaction::WorldView;

    fn world(ids: &[&str]) -> HashMap<EntityId, Point> {
        ids.iter()
            .map(|id| (EntityId::new(*id), Point::new(0, 0)))
            .collect()
    }

    #[test]
    fn collecting_appends_in_order_and_retires_the_item() {
        let mut world = world(&["crystal", "crown"]);
        let mut inventory = Inventory::new();
        inventory.collect(&mut world, &EntityId::new("crystal"), "Crystal");
        let result = inventory.collect(&mut world, &EntityId::new("crown"), "Crown");
        assert_eq!(
            result,
            CollectResult::Collected {
                snapshot: vec!["Crystal".to_string(), "Crown".to_string()],
            }
        );
        assert_eq!(world.position_of(&EntityId::new("crystal")), None);
    }

    #[test]
    fn collect_is_idempotent_per_item() {
        let mut world = world(&["crystal"]);
        let mut inventory = Inventory::new();
        let crystal = EntityId::new("crystal");
        assert!(matches!(
            inventory.collect(&mut world, &crystal, "Crystal"),
            CollectResult::Collected { .. }
        ));
        assert_eq!(
            inventory.collect(&mut world, &crystal, "Crystal"),
            CollectResult::AlreadyCollected
        );
        assert_eq!(inventory.entries(), ["Crystal".to_string()]);
    }

    #[test]
    fn item_missing_from_the_world_is_not_collected() {
        let mut world = world(&[]);
        let mut inventory = Inventory::new();
        assert_eq!(
            inventory.collect(&mut world, &EntityId::new("ghost"), "Ghost"),
            CollectResult::AlreadyCollected
        );
        assert!(inventory.is_empty());
    }

    #[test]
    fn same_display_name_from_distinct_items_is_kept_twice() {
        let mut world = world(&["crystal", "crystal_2"]);
        let mut inventory = Inventory::new();
        inventory.collect(&mut world, &EntityId::new("crystal"), "Crystal");
        inventory.collect(&mut world, &EntityId::new("crystal_2"), "Crystal");
        assert_eq!(inventory.entries().len(), 2);
    }
}
