use crate::cluster::node::{Address, NodeInfo};
use crate::cluster::SlotRange;
use std::collections::{HashMap, HashSet};

/// The reconciled view of one master and its replicas, built from a single `CLUSTER NODES`
/// listing. Keyed by the master's node id so it can be compared against the registry's
/// previous snapshot by identity rather than by address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub node_id: String,
    pub master_address: Address,
    pub slave_addresses: HashSet<Address>,
    pub slot_ranges: HashSet<SlotRange>,
    pub master_fail: bool,
}

/// Groups a flat node listing into partitions, one per master.
///
/// Nodes flagged `NOADDR` are skipped entirely: their address is unusable and, for slaves,
/// usually transient. A slave whose `master-id` does not resolve to any node in the listing
/// is dropped along with it: there is nothing to attach it to. `master_fail` is set only
/// when the `FAIL` flag sits on the master node itself; a failed slave does not fail its
/// partition.
pub fn build_partitions(nodes: &[NodeInfo]) -> Vec<Partition> {
    let live_nodes: Vec<&NodeInfo> = nodes.iter().filter(|n| !n.flags.noaddr).collect();

    let masters: HashMap<&str, &NodeInfo> = live_nodes
        .iter()
        .filter(|n| n.flags.is_master())
        .map(|n| (n.node_id.as_str(), *n))
        .collect();

    let mut builders: HashMap<&str, Partition> = HashMap::new();

    for node in &live_nodes {
        if node.flags.is_master() {
            let partition = builders.entry(&node.node_id).or_insert_with(|| Partition {
                node_id: node.node_id.clone(),
                master_address: node.address.clone(),
                slave_addresses: HashSet::new(),
                slot_ranges: HashSet::new(),
                master_fail: false,
            });
            partition.master_address = node.address.clone();
            partition.slot_ranges.extend(node.slot_ranges.iter().copied());
            partition.master_fail = node.flags.fail;
        } else if node.flags.is_slave() {
            let Some(master_id) = node.master_id.as_deref() else {
                continue;
            };
            let Some(master) = masters.get(master_id) else {
                continue;
            };

            let partition = builders.entry(master_id).or_insert_with(|| Partition {
                node_id: master.node_id.clone(),
                master_address: master.address.clone(),
                slave_addresses: HashSet::new(),
                slot_ranges: HashSet::new(),
                master_fail: false,
            });
            partition.slave_addresses.insert(node.address.clone());
        }
    }

    builders.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::node::NodeFlags;

    fn master(id: &str, port: u16, ranges: Vec<SlotRange>, fail: bool) -> NodeInfo {
        NodeInfo {
            node_id: id.to_owned(),
            address: Address::new("127.0.0.1", port),
            flags: NodeFlags {
                master: true,
                fail,
                ..Default::default()
            },
            master_id: None,
            slot_ranges: ranges,
        }
    }

    fn slave(id: &str, port: u16, master_id: &str) -> NodeInfo {
        NodeInfo {
            node_id: id.to_owned(),
            address: Address::new("127.0.0.1", port),
            flags: NodeFlags {
                slave: true,
                ..Default::default()
            },
            master_id: Some(master_id.to_owned()),
            slot_ranges: Vec::new(),
        }
    }

    #[test]
    fn groups_a_master_with_its_replicas() {
        let nodes = vec![
            master("m1", 7000, vec![SlotRange::new(0, 100)], false),
            slave("s1", 7001, "m1"),
            slave("s2", 7002, "m1"),
        ];

        let partitions = build_partitions(&nodes);
        assert_eq!(1, partitions.len());
        let partition = &partitions[0];
        assert_eq!("m1", partition.node_id);
        assert_eq!(2, partition.slave_addresses.len());
        assert!(!partition.master_fail);
    }

    #[test]
    fn master_fail_is_true_only_for_the_master_itself() {
        let nodes = vec![
            master("m1", 7000, vec![SlotRange::new(0, 100)], true),
            slave("s1", 7001, "m1"),
        ];

        let partitions = build_partitions(&nodes);
        assert!(partitions[0].master_fail);
    }

    #[test]
    fn a_failed_slave_does_not_fail_the_partition() {
        let mut s1 = slave("s1", 7001, "m1");
        s1.flags.fail = true;
        let nodes = vec![master("m1", 7000, vec![SlotRange::new(0, 100)], false), s1];

        let partitions = build_partitions(&nodes);
        assert!(!partitions[0].master_fail);
    }

    #[test]
    fn orphan_slave_with_unknown_master_is_dropped() {
        let nodes = vec![slave("s1", 7001, "missing-master")];
        assert!(build_partitions(&nodes).is_empty());
    }

    #[test]
    fn noaddr_nodes_are_ignored() {
        let mut m1 = master("m1", 7000, vec![SlotRange::new(0, 100)], false);
        m1.flags.noaddr = true;
        let nodes = vec![m1];
        assert!(build_partitions(&nodes).is_empty());
    }

    #[test]
    fn multiple_masters_yield_independent_partitions() {
        let nodes = vec![
            master("m1", 7000, vec![SlotRange::new(0, 100)], false),
            master("m2", 7001, vec![SlotRange::new(101, 200)], false),
        ];

        let mut partitions = build_partitions(&nodes);
        partitions.sort_by(|a, b| a.node_id.cmp(&b.node_id));
        assert_eq!(2, partitions.len());
        assert_eq!("m1", partitions[0].node_id);
        assert_eq!("m2", partitions[1].node_id);
    }
}
