use serde::{Deserialize, Serialize};

use ahash::RandomState;
use std::collections::HashMap;

/// Identifier of a single building block in the catalog.
pub type ChromosomeId = u32;

/// One raw building-block record, as loaded from a block list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromosomeBlock {
    pub id: ChromosomeId,
    /// Opaque payload handed to the generative function (e.g. a SMILES
    /// fragment). The engine never inspects it.
    pub payload: String,
    /// Number of connection points the block offers.
    pub connections: u32,
}

/// Static lookup of the building blocks genomes may be assembled from.
///
/// Immutable after load. Blocks with fewer than 2 connection points
/// cannot be linked into a chain and are dropped during construction.
///
/// # Examples
/// ```
/// use evoplanet::{ChromosomeBlock, ChromosomeCatalog};
///
/// let catalog = ChromosomeCatalog::from_blocks([
///     ChromosomeBlock { id: 1, payload: "A".into(), connections: 2 },
///     ChromosomeBlock { id: 2, payload: "B".into(), connections: 1 },
///     ChromosomeBlock { id: 3, payload: "C".into(), connections: 3 },
/// ]);
///
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.get(2).is_none());
/// assert_eq!(catalog.ids(), &[1, 3]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromosomeCatalog {
    blocks: HashMap<ChromosomeId, String, RandomState>,
    // Sorted, so uniform draws are reproducible under a fixed seed.
    ids: Vec<ChromosomeId>,
}

impl ChromosomeCatalog {
    /// Builds a catalog, keeping only structurally usable blocks
    /// (2 or more connection points).
    pub fn from_blocks(blocks: impl IntoIterator<Item = ChromosomeBlock>) -> ChromosomeCatalog {
        let blocks: HashMap<_, _, RandomState> = blocks
            .into_iter()
            .filter(|b| b.connections >= 2)
            .map(|b| (b.id, b.payload))
            .collect();
        let mut ids: Vec<ChromosomeId> = blocks.keys().copied().collect();
        ids.sort_unstable();
        ChromosomeCatalog { blocks, ids }
    }

    /// Returns the payload of a block, if the id is in the catalog.
    pub fn get(&self, id: ChromosomeId) -> Option<&str> {
        self.blocks.get(&id).map(String::as_str)
    }

    /// All usable block ids, in ascending order.
    pub fn ids(&self) -> &[ChromosomeId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: ChromosomeId, connections: u32) -> ChromosomeBlock {
        ChromosomeBlock {
            id,
            payload: format!("block-{}", id),
            connections,
        }
    }

    #[test]
    fn single_connection_blocks_are_dropped() {
        let catalog =
            ChromosomeCatalog::from_blocks([block(4, 2), block(7, 1), block(2, 0), block(9, 5)]);
        assert_eq!(catalog.ids(), &[4, 9]);
        assert!(catalog.get(7).is_none());
        assert_eq!(catalog.get(9), Some("block-9"));
    }

    #[test]
    fn catalog_survives_serialization() {
        let catalog = ChromosomeCatalog::from_blocks([block(1, 2), block(5, 3), block(2, 2)]);
        let json = serde_json::to_string(&catalog).unwrap();
        let back: ChromosomeCatalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ids(), catalog.ids());
        assert_eq!(back.get(5), Some("block-5"));
    }
}
