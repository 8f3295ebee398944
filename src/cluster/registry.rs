use crate::client::{Config, LoadBalancingStrategy};
use crate::cluster::entry::{Entry, SharedEntry};
use crate::cluster::node::Address;
use crate::cluster::partition::Partition;
use crate::cluster::SlotRange;
use crate::network::ProbeConnection;
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// The manager's entire mutable state: the last partition snapshot reconciliation diffed
/// against, the live entries keyed by every slot range they currently serve, and a cache of
/// probe connections to seed nodes keyed by address.
///
/// All three maps share a single lock rather than one each. A reconciliation tick reads or
/// writes more than one of them in the course of a single diff (for instance, migrating a
/// slot range from one entry to another touches `entries` twice), and splitting the lock
/// would only invite the maps to observe each other mid-update. An [`Entry`] itself is an
/// `Arc<RwLock<..>>`: the same handle is cloned under every key its master currently serves,
/// so a master owning several disjoint ranges still gets exactly one connection.
pub struct Registry {
    state: RwLock<State>,
}

#[derive(Default)]
struct State {
    last_partitions: HashMap<SlotRange, Partition>,
    entries: HashMap<SlotRange, SharedEntry>,
    node_connections: HashMap<Address, ProbeConnection>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
        }
    }

    /// Returns the entry owning `slot`, if any partition currently covers it.
    pub async fn entry_for_slot(&self, slot: u16) -> Option<EntrySnapshot> {
        let state = self.state.read().await;
        for (range, entry) in &state.entries {
            if range.contains(slot) {
                return Some(EntrySnapshot::from(&*entry.read().await));
            }
        }
        None
    }

    /// Picks the address command dispatch should send a read to for `slot`: a replica
    /// chosen by `strategy` when the owning entry has one, falling back to the master when
    /// it has none. Returns `None` if no partition currently covers `slot`.
    pub async fn read_address_for_slot(&self, slot: u16, strategy: LoadBalancingStrategy) -> Option<Address> {
        let state = self.state.read().await;
        for (range, entry) in &state.entries {
            if range.contains(slot) {
                let guard = entry.read().await;
                return Some(match guard.next_slave(strategy) {
                    Some(slave) => slave.clone(),
                    None => guard.master_address().clone(),
                });
            }
        }
        None
    }

    /// Returns the entry whose master is bound to `address`, if any.
    pub async fn entry_for_address(&self, address: &Address) -> Option<EntrySnapshot> {
        let state = self.state.read().await;
        for entry in state.entries.values() {
            let guard = entry.read().await;
            if guard.master_address() == address {
                return Some(EntrySnapshot::from(&*guard));
            }
        }
        None
    }

    pub(crate) async fn last_partitions(&self) -> HashMap<SlotRange, Partition> {
        self.state.read().await.last_partitions.clone()
    }

    pub(crate) async fn record_partition(&self, key: SlotRange, partition: Partition) {
        self.state.write().await.last_partitions.insert(key, partition);
    }

    pub(crate) async fn drop_partition(&self, key: &SlotRange) {
        self.state.write().await.last_partitions.remove(key);
    }

    /// Looks up the entry already serving `address` as its master, by network address
    /// rather than node id: used by the additions diff, which must recognise "this is the
    /// same master I already have a connection to" even across a node-id change.
    pub(crate) async fn entry_by_master_address(&self, address: &Address) -> Option<SharedEntry> {
        let state = self.state.read().await;
        for entry in state.entries.values() {
            if entry.read().await.master_address() == address {
                return Some(Arc::clone(entry));
            }
        }
        None
    }

    /// `addEntry`: associates `range` with `entry`, inserting `range` into the entry's own
    /// slot-range set if it isn't already there.
    pub(crate) async fn add_entry(&self, range: SlotRange, entry: SharedEntry) {
        entry.write().await.add_slot_range(range);
        self.state.write().await.entries.insert(range, entry);
    }

    /// `removeMaster`: detaches `range` from both the entry it pointed at and the entry's
    /// own range set, returning the entry handle and whether it is now empty so the caller
    /// can decide whether to decommission it.
    pub(crate) async fn remove_master(&self, range: &SlotRange) -> Option<(SharedEntry, bool)> {
        let entry = self.state.write().await.entries.remove(range)?;
        let now_empty = entry.write().await.remove_slot_range(range);
        Some((entry, now_empty))
    }

    pub(crate) async fn get_entry(&self, range: &SlotRange) -> Option<SharedEntry> {
        self.state.read().await.entries.get(range).cloned()
    }

    /// `changeMaster`: retargets the entry currently bound to `range` to a new master
    /// endpoint. No-op if the entry has since disappeared (the slots diff may have already
    /// removed it this same tick).
    pub(crate) async fn change_master(
        &self,
        range: &SlotRange,
        node_id: String,
        master_address: Address,
        config: &Config,
    ) -> Result<()> {
        let entry = self.state.read().await.entries.get(range).cloned();
        if let Some(entry) = entry {
            entry.write().await.change_master(node_id, master_address, config).await?;
        }
        Ok(())
    }

    pub(crate) async fn add_slave(&self, range: &SlotRange, address: Address) {
        if let Some(entry) = self.state.read().await.entries.get(range).cloned() {
            entry.write().await.add_slave(address);
        }
    }

    pub(crate) async fn remove_slave_address(&self, range: &SlotRange, address: &Address) {
        if let Some(entry) = self.state.read().await.entries.get(range).cloned() {
            entry.write().await.remove_slave(address);
        }
    }

    pub(crate) async fn cache_connection(&self, address: Address, connection: ProbeConnection) {
        self.state
            .write()
            .await
            .node_connections
            .insert(address, connection);
    }

    pub(crate) async fn take_connection(&self, address: &Address) -> Option<ProbeConnection> {
        self.state.write().await.node_connections.remove(address)
    }

    /// Tears down every distinct entry and cached probe connection concurrently. Called
    /// once, from [`crate::cluster::ClusterManager::shutdown`], after the reconciler task
    /// has been cancelled. Entries are deduplicated by pointer identity first: the same
    /// master's `Entry` sits under every slot range it serves, and shutting it down twice
    /// would double-close an already-closed connection.
    pub(crate) async fn shutdown(&self) {
        let mut state = self.state.write().await;

        let entries = std::mem::take(&mut state.entries);
        let connections = std::mem::take(&mut state.node_connections);

        let mut distinct: Vec<SharedEntry> = Vec::new();
        for entry in entries.into_values() {
            if !distinct.iter().any(|e| Arc::ptr_eq(e, &entry)) {
                distinct.push(entry);
            }
        }

        let entry_shutdowns = distinct.into_iter().map(|entry| async move {
            entry.write().await.shutdown().await;
        });
        futures_util::future::join_all(entry_shutdowns).await;

        let connection_shutdowns = connections.into_values().map(ProbeConnection::close_async);
        futures_util::future::join_all(connection_shutdowns).await;
    }
}

/// A read-only, clonable snapshot of an entry's routing-relevant fields, returned from
/// [`Registry::entry_for_slot`] so callers never hold the registry lock past the lookup.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    pub node_id: String,
    pub master_address: Address,
    pub slave_addresses: Vec<Address>,
}

impl From<&Entry> for EntrySnapshot {
    fn from(entry: &Entry) -> Self {
        Self {
            node_id: entry.node_id().to_owned(),
            master_address: entry.master_address().clone(),
            slave_addresses: entry.slave_addresses().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entry_for_slot_returns_none_when_nothing_covers_it() {
        let registry = Registry::new();
        assert!(registry.entry_for_slot(42).await.is_none());
    }
}
