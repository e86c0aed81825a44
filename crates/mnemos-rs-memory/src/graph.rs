//! Bounded breadth-first subgraph extraction.

use crate::error::MemoryError;
use crate::model::{Subgraph, SubgraphEdge};
use crate::store::RecordStore;
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

impl RecordStore {
    /// Collect the nodes and edges reachable from `root` within `max_depth` hops.
    ///
    /// Nodes are emitted when first dequeued. Only nodes shallower than
    /// `max_depth` are expanded, and only expanded nodes contribute edges, so a
    /// depth of 0 yields the root alone.
    pub fn subgraph(&self, root: Uuid, max_depth: usize) -> Result<Subgraph, MemoryError> {
        if !self.contains(&root) {
            return Err(MemoryError::NotFound(root));
        }

        let mut result = Subgraph::default();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([(root, 0usize)]);

        while let Some((node_id, depth)) = queue.pop_front() {
            if !visited.insert(node_id) {
                continue;
            }
            let Some(record) = self.get(&node_id) else {
                continue;
            };
            result.nodes.insert(node_id, record.metadata.clone());

            if depth >= max_depth {
                continue;
            }
            for edge in &record.connections {
                result.edges.push(SubgraphEdge {
                    from: node_id,
                    to: edge.to,
                    relation: edge.relation.clone(),
                });
                if !visited.contains(&edge.to) {
                    queue.push_back((edge.to, depth + 1));
                }
            }
        }

        Ok(result)
    }
}
