use crate::client::{Config, LoadBalancingStrategy};
use crate::cluster::node::Address;
use crate::cluster::SlotRange;
use crate::network::ProbeConnection;
use crate::Result;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The registry's live view of one master: its probe connection, the replica addresses
/// available for read routing, and the slot ranges it currently owns.
///
/// One `Entry` is shared, via [`SharedEntry`], under every slot range its master currently
/// serves: a master owning several disjoint ranges (common mid-migration) gets exactly one
/// connection, not one per range. Replicas are tracked as addresses only, not persistent
/// connections: this crate dials a replica lazily, the moment something asks to read from
/// one, rather than keeping a second connection pool warm for nodes the reconciler may
/// still be revising.
pub(crate) struct Entry {
    node_id: String,
    master_address: Address,
    master_connection: Option<ProbeConnection>,
    slave_addresses: Vec<Address>,
    slot_ranges: HashSet<SlotRange>,
    round_robin_cursor: AtomicUsize,
}

/// A handle to an [`Entry`] shared across every slot range it serves. Cloning is cheap: it
/// clones the `Arc`, not the connection underneath.
pub(crate) type SharedEntry = Arc<RwLock<Entry>>;

impl Entry {
    pub(crate) async fn connect(
        node_id: String,
        master_address: Address,
        slot_ranges: HashSet<SlotRange>,
        config: &Config,
    ) -> Result<Self> {
        let master_connection =
            ProbeConnection::connect(&master_address.host, master_address.port, config).await?;

        Ok(Self {
            node_id,
            master_address,
            master_connection: Some(master_connection),
            slave_addresses: Vec::new(),
            slot_ranges,
            round_robin_cursor: AtomicUsize::new(0),
        })
    }

    pub(crate) fn node_id(&self) -> &str {
        &self.node_id
    }

    pub(crate) fn master_address(&self) -> &Address {
        &self.master_address
    }

    pub(crate) fn slot_ranges(&self) -> &HashSet<SlotRange> {
        &self.slot_ranges
    }

    pub(crate) fn owns_slot(&self, slot: u16) -> bool {
        self.slot_ranges.iter().any(|range| range.contains(slot))
    }

    /// Associates `range` with this entry. Used by `addEntry` and by the slot-migration and
    /// addition diffs.
    pub(crate) fn add_slot_range(&mut self, range: SlotRange) {
        self.slot_ranges.insert(range);
    }

    /// Detaches `range` from this entry. Returns `true` if the entry now serves no slot
    /// range at all, the signal callers use to decommission the master connection.
    pub(crate) fn remove_slot_range(&mut self, range: &SlotRange) -> bool {
        self.slot_ranges.remove(range);
        self.slot_ranges.is_empty()
    }

    /// Replaces the master connection in place, closing the prior one. Used when the
    /// reconciler sees this partition's master address change: the old master is no longer
    /// authoritative for these slots the moment a new one is observed, so the stale
    /// connection is dropped immediately rather than left to linger. `node_id` is updated
    /// alongside the address so that a later tick's slot-migration diff, which matches
    /// partitions by node id, keeps recognising this entry as the one serving these ranges
    /// even after a failover promotes a replica under a fresh id.
    pub(crate) async fn change_master(&mut self, node_id: String, master_address: Address, config: &Config) -> Result<()> {
        let new_connection =
            ProbeConnection::connect(&master_address.host, master_address.port, config).await?;

        if let Some(old_connection) = self.master_connection.take() {
            old_connection.close_async().await;
        }

        self.node_id = node_id;
        self.master_address = master_address;
        self.master_connection = Some(new_connection);
        Ok(())
    }

    pub(crate) fn add_slave(&mut self, address: Address) {
        if !self.slave_addresses.contains(&address) {
            self.slave_addresses.push(address);
        }
    }

    pub(crate) fn remove_slave(&mut self, address: &Address) {
        self.slave_addresses.retain(|a| a != address);
    }

    pub(crate) fn slave_addresses(&self) -> &[Address] {
        &self.slave_addresses
    }

    /// Picks a replica address per the configured load-balancing strategy. Returns `None`
    /// when there are no replicas, in which case callers fall back to the master.
    pub(crate) fn next_slave(&self, strategy: LoadBalancingStrategy) -> Option<&Address> {
        if self.slave_addresses.is_empty() {
            return None;
        }

        let index = match strategy {
            LoadBalancingStrategy::RoundRobin => {
                self.round_robin_cursor.fetch_add(1, Ordering::Relaxed) % self.slave_addresses.len()
            }
            LoadBalancingStrategy::Random => {
                use rand::Rng;
                rand::rng().random_range(0..self.slave_addresses.len())
            }
        };

        self.slave_addresses.get(index)
    }

    pub(crate) async fn shutdown(&mut self) {
        if let Some(connection) = self.master_connection.take() {
            connection.close_async().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot_ranges() -> HashSet<SlotRange> {
        let mut set = HashSet::new();
        set.insert(SlotRange::new(0, 100));
        set
    }

    fn make_entry() -> Entry {
        Entry {
            node_id: "m1".to_owned(),
            master_address: Address::new("127.0.0.1", 7000),
            master_connection: None,
            slave_addresses: Vec::new(),
            slot_ranges: slot_ranges(),
            round_robin_cursor: AtomicUsize::new(0),
        }
    }

    #[test]
    fn owns_slot_reflects_current_ranges() {
        let entry = make_entry();
        assert!(entry.owns_slot(50));
        assert!(!entry.owns_slot(101));
    }

    #[test]
    fn removing_the_last_slot_range_reports_empty() {
        let mut entry = make_entry();
        assert!(entry.remove_slot_range(&SlotRange::new(0, 100)));
    }

    #[test]
    fn removing_one_of_several_ranges_stays_nonempty() {
        let mut entry = make_entry();
        entry.add_slot_range(SlotRange::new(200, 300));
        assert!(!entry.remove_slot_range(&SlotRange::new(0, 100)));
    }

    #[test]
    fn add_slave_is_idempotent() {
        let mut entry = make_entry();
        let addr = Address::new("127.0.0.1", 7001);
        entry.add_slave(addr.clone());
        entry.add_slave(addr.clone());
        assert_eq!(1, entry.slave_addresses().len());
    }

    #[test]
    fn remove_slave_drops_the_address() {
        let mut entry = make_entry();
        let addr = Address::new("127.0.0.1", 7001);
        entry.add_slave(addr.clone());
        entry.remove_slave(&addr);
        assert!(entry.slave_addresses().is_empty());
    }

    #[test]
    fn round_robin_cycles_through_slaves() {
        let mut entry = make_entry();
        let a = Address::new("127.0.0.1", 7001);
        let b = Address::new("127.0.0.1", 7002);
        entry.add_slave(a.clone());
        entry.add_slave(b.clone());

        let first = entry.next_slave(LoadBalancingStrategy::RoundRobin).cloned();
        let second = entry.next_slave(LoadBalancingStrategy::RoundRobin).cloned();
        assert_ne!(first, second);
    }

    #[test]
    fn next_slave_is_none_without_replicas() {
        let entry = make_entry();
        assert_eq!(None, entry.next_slave(LoadBalancingStrategy::RoundRobin));
    }
}
