/*!
Discovers and maintains the topology of a Redis Cluster deployment.

A [`ClusterManager`] is bootstrapped from a handful of seed addresses ([`crate::client::ClusterConfig::nodes`]).
It issues `CLUSTER NODES` against a seed, parses the gossip-protocol listing with [`node::parse_nodes`],
groups the result into one [`partition::Partition`] per master with [`partition::build_partitions`], and opens
a [`Registry`] entry for each. A background task then re-probes the cluster on [`crate::client::ClusterConfig::scan_interval`]
and reconciles the registry against whatever has changed.

Routing a key to its owning node is a pure function of the key: see [`slot::hash_slot`].
*/

mod entry;
mod manager;
mod node;
mod partition;
mod registry;
mod slot;

pub use manager::ClusterManager;
pub use node::{Address, NodeFlags, NodeInfo};
pub use partition::Partition;
pub use registry::{EntrySnapshot, Registry};
pub use slot::{hash_slot, SlotRange, TOTAL_SLOTS};
