use crate::client::{ClusterConfig, Config};
use crate::cluster::entry::{Entry, SharedEntry};
use crate::cluster::node::{parse_nodes, Address, NodeInfo};
use crate::cluster::partition::{build_partitions, Partition};
use crate::cluster::registry::Registry;
use crate::cluster::slot;
use crate::network::{spawn, sleep, JoinHandle, ProbeConnection};
use crate::resp::{cmd, FromValue};
use crate::{Error, Result};
use futures_util::{select, FutureExt};
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

/// Owns the discovery and reconciliation lifecycle for one cluster deployment: bootstraps a
/// [`Registry`] from a set of seed addresses, keeps it current with a background
/// reconciliation tick, and tears everything down on [`ClusterManager::shutdown`].
pub struct ClusterManager {
    registry: Arc<Registry>,
    reconciler: Option<JoinHandle<()>>,
    shutdown: Arc<Notify>,
}

impl ClusterManager {
    /// Discovers the cluster's initial topology by probing each configured seed in turn,
    /// stopping at the first seed that yields a non-empty partition set, then starts the
    /// periodic reconciler. Fails only if every seed is unreachable or unparseable.
    pub async fn bootstrap(cluster_config: ClusterConfig) -> Result<Self> {
        if cluster_config.nodes.is_empty() {
            return Err(Error::Client(
                "cluster bootstrap requires at least one seed node".to_owned(),
            ));
        }

        let probe_config = probe_config(&cluster_config);
        let registry = Arc::new(Registry::new());

        let mut partitions = None;
        for (host, port) in &cluster_config.nodes {
            let address = Address::new(host.clone(), *port);
            match fetch_partitions(&registry, &address, &probe_config).await {
                Ok(found) if !found.is_empty() => {
                    partitions = Some(found);
                    break;
                }
                Ok(_) => debug!("seed {address} reported an empty cluster topology"),
                Err(e) => warn!("seed {address} failed during bootstrap: {e}"),
            }
        }

        let partitions = partitions.ok_or_else(|| {
            Error::Client("no configured seed node produced a usable cluster topology".to_owned())
        })?;

        for partition in &partitions {
            if partition.slot_ranges.is_empty() {
                warn!("master {} owns no slots at bootstrap, skipping", partition.node_id);
                continue;
            }

            if let Err(e) = add_master_entry(&registry, partition, &probe_config).await {
                warn!("failed to connect to master {}: {e}", partition.node_id);
            }
        }

        // `add_master_entry` swallows its own admission failures (fail flag, unreachable,
        // cluster_state:fail) as a no-op `Ok(())`, since those are meant to be transient and
        // retried by the reconciler. At bootstrap there is no reconciler running yet, so the
        // only signal that anything actually got registered is the registry itself.
        if registry.last_partitions().await.is_empty() {
            return Err(Error::Client(
                "no configured seed node produced a usable cluster topology".to_owned(),
            ));
        }

        let shutdown = Arc::new(Notify::new());
        let reconciler = spawn(reconcile_loop(
            registry.clone(),
            cluster_config,
            probe_config,
            shutdown.clone(),
        ));

        Ok(Self {
            registry,
            reconciler: Some(reconciler),
            shutdown,
        })
    }

    /// Maps a key to its owning hash slot, including hash-tag handling.
    pub fn hash_slot(key: &str) -> u16 {
        slot::hash_slot(key)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Stops the reconciler and closes every connection the registry is holding: entry
    /// master connections and cached probe connections alike.
    pub async fn shutdown(mut self) {
        self.shutdown.notify_one();

        if let Some(reconciler) = self.reconciler.take() {
            if let Err(e) = reconciler.await {
                warn!("reconciler task did not shut down cleanly: {e}");
            }
        }

        self.registry.shutdown().await;
    }
}

fn probe_config(cluster_config: &ClusterConfig) -> Config {
    Config {
        password: cluster_config.password.clone(),
        database: cluster_config.database,
        connect_timeout: cluster_config.connect_timeout,
        command_timeout: cluster_config.timeout,
        connection_name: cluster_config.client_name.clone(),
        ..Default::default()
    }
}

async fn fetch_partitions(
    registry: &Registry,
    address: &Address,
    probe_config: &Config,
) -> Result<Vec<Partition>> {
    let text = fetch_nodes_text(registry, address, probe_config).await?;
    let nodes = parse_nodes(&text);
    Ok(build_partitions(&nodes))
}

/// Issues `CLUSTER NODES` against `address`, reusing a cached probe connection when one is
/// available and still alive. A fresh connection replaces a dead or missing one and is
/// cached for the next probe against the same address, so a healthy seed or reconciliation
/// target does not get redialed every tick.
async fn fetch_nodes_text(registry: &Registry, address: &Address, probe_config: &Config) -> Result<String> {
    let mut connection = match registry.take_connection(address).await {
        Some(connection) if connection.is_active() => connection,
        _ => ProbeConnection::connect(&address.host, address.port, probe_config).await?,
    };

    let result = connection.send(&cmd("CLUSTER").arg("NODES")).await;

    match result {
        Ok(value) => {
            let text = String::from_value(value)?;
            if connection.is_active() {
                registry.cache_connection(address.clone(), connection).await;
            } else {
                connection.close_async().await;
            }
            Ok(text)
        }
        Err(e) => {
            connection.close_async().await;
            Err(e)
        }
    }
}

/// Issues `CLUSTER INFO` against `address` and reports whether the node considers the
/// cluster healthy. Gates `addMasterEntry`: a master that reports `cluster_state:fail` is
/// not admitted, on the theory that the reconciler's next tick will get a better answer.
async fn cluster_state_ok(registry: &Registry, address: &Address, probe_config: &Config) -> Result<bool> {
    let mut connection = match registry.take_connection(address).await {
        Some(connection) if connection.is_active() => connection,
        _ => ProbeConnection::connect(&address.host, address.port, probe_config).await?,
    };

    let result = connection.send(&cmd("CLUSTER").arg("INFO")).await;

    match result {
        Ok(value) => {
            let text = String::from_value(value)?;
            let ok = !text.lines().any(|line| line.trim() == "cluster_state:fail");
            if connection.is_active() {
                registry.cache_connection(address.clone(), connection).await;
            } else {
                connection.close_async().await;
            }
            Ok(ok)
        }
        Err(e) => {
            connection.close_async().await;
            Err(e)
        }
    }
}

/// `addMasterEntry`: connects to a partition's master and registers an entry under every
/// slot range it owns, then adds every known replica address. A no-op (`Ok(())` without
/// registering anything) is returned whenever admission is refused for a reason the next
/// reconciliation tick might resolve on its own: the master is flagged failed, unreachable,
/// or reports `cluster_state:fail`. Mirrors what the reconciler's additions diff does for a
/// partition discovered after startup, so both paths share this one procedure.
async fn add_master_entry(registry: &Registry, partition: &Partition, probe_config: &Config) -> Result<()> {
    if partition.master_fail {
        debug!("master {} is flagged fail, deferring entry creation", partition.node_id);
        return Ok(());
    }

    if partition.slot_ranges.is_empty() {
        return Ok(());
    }

    match cluster_state_ok(registry, &partition.master_address, probe_config).await {
        Ok(true) => {}
        Ok(false) => {
            debug!("master {} reports cluster_state:fail, deferring entry creation", partition.node_id);
            return Ok(());
        }
        Err(e) => {
            debug!("could not reach master {} to check cluster state: {e}", partition.node_id);
            return Ok(());
        }
    }

    let mut entry = match Entry::connect(
        partition.node_id.clone(),
        partition.master_address.clone(),
        HashSet::new(),
        probe_config,
    )
    .await
    {
        Ok(entry) => entry,
        Err(e) => {
            debug!("failed to connect to master {}: {e}", partition.node_id);
            return Ok(());
        }
    };

    for slave_address in &partition.slave_addresses {
        entry.add_slave(slave_address.clone());
    }

    let shared: SharedEntry = Arc::new(RwLock::new(entry));
    for range in &partition.slot_ranges {
        registry.add_entry(*range, Arc::clone(&shared)).await;
        registry.record_partition(*range, partition.clone()).await;
    }

    Ok(())
}

async fn reconcile_loop(
    registry: Arc<Registry>,
    cluster_config: ClusterConfig,
    probe_config: Config,
    shutdown: Arc<Notify>,
) {
    loop {
        select! {
            _ = shutdown.notified().fuse() => {
                debug!("reconciler shutting down");
                return;
            }
            _ = sleep(cluster_config.scan_interval).fuse() => {}
        }

        reconcile_once(&registry, &cluster_config, &probe_config).await;
    }
}

/// Runs a single reconciliation pass: probes a live node, parses its `CLUSTER NODES`
/// listing, and applies the three diffs in order (master change, slave set, slot
/// migration/removal/addition). Every failure is logged and swallowed here: a tick that
/// can't complete this time around gets another chance at the next interval, and must never
/// take the background task down with it.
async fn reconcile_once(registry: &Registry, cluster_config: &ClusterConfig, probe_config: &Config) {
    let candidates = probe_candidates(registry, cluster_config).await;

    let mut text = None;
    for address in &candidates {
        match fetch_nodes_text(registry, address, probe_config).await {
            Ok(found) => {
                text = Some(found);
                break;
            }
            Err(e) => warn!("reconciliation probe against {address} failed: {e}"),
        }
    }

    let Some(text) = text else {
        warn!("reconciliation tick found no reachable node among {} candidates", candidates.len());
        return;
    };

    let nodes: Vec<NodeInfo> = parse_nodes(&text);
    let fresh_partitions = build_partitions(&nodes);
    if fresh_partitions.is_empty() {
        debug!("reconciliation tick produced an empty listing, treating as no update");
        return;
    }

    let previous_by_range = registry.last_partitions().await;
    let mut current_by_node = dedup_by_node_id(&previous_by_range);

    apply_master_change_diff(registry, &mut current_by_node, &fresh_partitions, probe_config).await;
    apply_slave_set_diff(registry, &current_by_node, &fresh_partitions).await;
    apply_slots_diff(registry, &current_by_node, &fresh_partitions, probe_config).await;
}

async fn probe_candidates(registry: &Registry, cluster_config: &ClusterConfig) -> Vec<Address> {
    let previous = registry.last_partitions().await;
    if !previous.is_empty() {
        let mut seen = HashSet::new();
        let mut addresses = Vec::new();
        for partition in previous.values() {
            for address in std::iter::once(&partition.master_address).chain(partition.slave_addresses.iter()) {
                if seen.insert(address.clone()) {
                    addresses.push(address.clone());
                }
            }
        }
        return addresses;
    }

    cluster_config
        .nodes
        .iter()
        .map(|(host, port)| Address::new(host.clone(), *port))
        .collect()
}

/// Collapses a range-keyed partition map into one entry per master, as seen at the end of
/// the previous tick.
fn dedup_by_node_id(by_range: &HashMap<slot::SlotRange, Partition>) -> HashMap<String, Partition> {
    let mut by_node = HashMap::new();
    for partition in by_range.values() {
        by_node
            .entry(partition.node_id.clone())
            .or_insert_with(|| partition.clone());
    }
    by_node
}

/// Diff 1 (`checkMasterNodesChange`): for each new partition matching a current one by
/// master address, a `masterFail` flag means the master behind that address has gone away.
/// Every slot range it used to serve is re-homed to whichever new partition now reports
/// owning it, provided that owner's address differs from the old one. A slot range that
/// disappeared from the new listing entirely (open question in the source: a null
/// dereference there) is left alone here rather than erred on.
async fn apply_master_change_diff(
    registry: &Registry,
    current_by_node: &mut HashMap<String, Partition>,
    fresh: &[Partition],
    probe_config: &Config,
) {
    let fresh_owner_of: HashMap<slot::SlotRange, &Partition> = fresh
        .iter()
        .flat_map(|p| p.slot_ranges.iter().map(move |r| (*r, p)))
        .collect();

    let stale_node_ids: Vec<String> = current_by_node
        .iter()
        .filter(|(_, cur)| fresh.iter().any(|p| p.master_address == cur.master_address && p.master_fail))
        .map(|(id, _)| id.clone())
        .collect();

    for node_id in stale_node_ids {
        let Some(cur) = current_by_node.get(&node_id) else { continue };
        let ranges: Vec<_> = cur.slot_ranges.iter().copied().collect();
        let old_master_address = cur.master_address.clone();

        for range in ranges {
            let Some(owner) = fresh_owner_of.get(&range) else { continue };
            if owner.master_address == old_master_address {
                continue;
            }

            info!(
                "master for slot range {range} failed over from {old_master_address} to {}",
                owner.master_address
            );

            if let Err(e) = registry
                .change_master(&range, owner.node_id.clone(), owner.master_address.clone(), probe_config)
                .await
            {
                warn!("failed to follow master change for slot range {range}: {e}");
                continue;
            }

            if owner.slave_addresses.contains(&old_master_address) {
                debug!("marking former master {old_master_address} down as a replica (reason=MANAGER)");
                registry.remove_slave_address(&range, &old_master_address).await;
            }

            registry.record_partition(range, (*owner).clone()).await;

            // `current_by_node` stays in use for the rest of this tick (the slave-set and
            // slots diffs read the same map), so the old node id's view has to drop `range`
            // here too: otherwise the slots diff still sees `range` under the stale node id,
            // diffs it against the fresh (now rangeless) partition reporting that id, and
            // re-removes the very entry this diff just repointed at its new master.
            if let Some(cur) = current_by_node.get_mut(&node_id) {
                cur.master_address = owner.master_address.clone();
                cur.slot_ranges.remove(&range);
            }
        }
    }
}

/// Diff 2 (`checkSlaveNodesChange`): for each new partition matching a current one by
/// master address, reconcile the replica address set independently of whether the master
/// itself changed this tick.
///
/// The fresh slave set is written back to every slot range this master currently serves
/// via `record_partition`, not just mutated on the entry: `current_by_node` is rebuilt from
/// `last_partitions` at the start of every tick (`dedup_by_node_id`), so a stored partition
/// that keeps the old slave set would make the very next tick recompute the same
/// `removed`/`added` pair and re-issue the same `slaveDown`/`slaveUp` calls forever,
/// violating the idempotency property in §8.
async fn apply_slave_set_diff(registry: &Registry, current_by_node: &HashMap<String, Partition>, fresh: &[Partition]) {
    for fresh_partition in fresh {
        let Some(cur) = current_by_node
            .values()
            .find(|p| p.master_address == fresh_partition.master_address)
        else {
            continue;
        };

        if cur.slave_addresses == fresh_partition.slave_addresses {
            continue;
        }

        let Some(any_range) = cur.slot_ranges.iter().next() else {
            continue;
        };

        let removed = cur.slave_addresses.difference(&fresh_partition.slave_addresses);
        for address in removed {
            debug!("replica {address} left the slave set (reason=MANAGER)");
            registry.remove_slave_address(any_range, address).await;
        }

        let added = fresh_partition.slave_addresses.difference(&cur.slave_addresses);
        for address in added {
            debug!("replica {address} joined the slave set (reason=MANAGER)");
            registry.add_slave(any_range, address.clone()).await;
        }

        let converged = Partition {
            node_id: cur.node_id.clone(),
            master_address: cur.master_address.clone(),
            slave_addresses: fresh_partition.slave_addresses.clone(),
            slot_ranges: cur.slot_ranges.clone(),
            master_fail: cur.master_fail,
        };
        for range in &cur.slot_ranges {
            registry.record_partition(*range, converged.clone()).await;
        }
    }
}

/// Diff 3 (`checkSlotsChange`): migration between partitions sharing a node id, then global
/// removals, then global additions — in that order, so additions never re-register a range
/// that migration already re-attached to its existing entry this tick.
async fn apply_slots_diff(
    registry: &Registry,
    current_by_node: &HashMap<String, Partition>,
    fresh: &[Partition],
    probe_config: &Config,
) {
    for fresh_partition in fresh {
        let Some(cur) = current_by_node.get(&fresh_partition.node_id) else {
            continue;
        };
        if cur.slot_ranges == fresh_partition.slot_ranges {
            continue;
        }
        let Some(&anchor) = cur.slot_ranges.iter().next() else {
            continue;
        };
        let Some(entry) = registry.get_entry(&anchor).await else {
            continue;
        };

        let added: Vec<_> = fresh_partition.slot_ranges.difference(&cur.slot_ranges).copied().collect();
        let removed: Vec<_> = cur.slot_ranges.difference(&fresh_partition.slot_ranges).copied().collect();

        for range in added {
            info!("slot range {range} migrated onto master {}", fresh_partition.node_id);
            registry.add_entry(range, Arc::clone(&entry)).await;
        }

        for range in removed {
            info!("slot range {range} migrated away from master {}", fresh_partition.node_id);
            registry.drop_partition(&range).await;
            if let Some((entry, now_empty)) = registry.remove_master(&range).await {
                if now_empty {
                    entry.write().await.shutdown().await;
                }
            }
        }

        // Write the fresh partition back under every range this master still serves, not
        // only the ones just added: a sibling range the migration didn't touch would
        // otherwise keep pointing at the pre-tick `Partition` object, whose `slot_ranges`
        // still includes the range that just moved away. `dedup_by_node_id`'s
        // `or_insert_with` would then pick up that stale value on some later tick and
        // recompute the same migration as if it had never applied.
        for range in &fresh_partition.slot_ranges {
            registry.record_partition(*range, fresh_partition.clone()).await;
        }
    }

    // Global removals and additions are computed against the registry's *live* state, which
    // the migration pass above has already mutated: a range it re-attached must not also be
    // treated as newly added below, and one it detached must not be treated as stale twice.
    let live = registry.last_partitions().await;
    let fresh_slots: HashSet<slot::SlotRange> = fresh.iter().flat_map(|p| p.slot_ranges.iter().copied()).collect();

    let removed_slots: Vec<slot::SlotRange> = live
        .keys()
        .filter(|key| !fresh_slots.contains(key))
        .copied()
        .collect();

    for range in &removed_slots {
        registry.drop_partition(range).await;
        if let Some((entry, now_empty)) = registry.remove_master(range).await {
            if now_empty {
                info!("master behind slot range {range} lost its last slot range, shutting it down");
                entry.write().await.shutdown().await;
            }
        }
    }

    let removed_set: HashSet<_> = removed_slots.into_iter().collect();
    let still_live: HashSet<slot::SlotRange> = live.keys().filter(|k| !removed_set.contains(k)).copied().collect();

    for fresh_partition in fresh {
        for &range in &fresh_partition.slot_ranges {
            if still_live.contains(&range) {
                continue;
            }

            info!("slot range {range} observed for the first time under master {}", fresh_partition.node_id);

            if let Some(existing) = registry.entry_by_master_address(&fresh_partition.master_address).await {
                registry.add_entry(range, existing).await;
                registry.record_partition(range, fresh_partition.clone()).await;
            } else if let Err(e) = add_master_entry_for_range(registry, fresh_partition, range, probe_config).await {
                warn!("failed to add entry for newly observed slot range {range}: {e}");
            }
        }
    }
}

/// Registers a brand-new master for a single newly observed slot range, deferring to
/// [`add_master_entry`]'s admission checks (fail flag, reachability, `cluster_state`). Used
/// by the additions diff rather than [`add_master_entry`] directly because only one range
/// of the owning partition is actually new; the rest were handled by an earlier iteration
/// or by the migration pass.
async fn add_master_entry_for_range(
    registry: &Registry,
    partition: &Partition,
    range: slot::SlotRange,
    probe_config: &Config,
) -> Result<()> {
    let mut single_range_partition = partition.clone();
    single_range_partition.slot_ranges = std::iter::once(range).collect();
    add_master_entry(registry, &single_range_partition, probe_config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::node::{render, NodeFlags};
    use crate::resp::{Array, Value, ValueDecoder};
    use bytes::BytesMut;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio_util::codec::Decoder;

    /// An in-process stand-in for a cluster node: accepts real TCP connections and answers
    /// `HELLO`/`SELECT` with `+OK`, `CLUSTER NODES` with a settable script, and
    /// `CLUSTER INFO` with `cluster_state:ok`. Lets `bootstrap`/`reconcile_once` dial a real
    /// socket without a live server, per the fake-responder approach used for
    /// multiplexing/stress coverage elsewhere in the pack.
    struct FakeNode {
        address: Address,
        script: Arc<RwLock<String>>,
        _accept: JoinHandle<()>,
    }

    impl FakeNode {
        async fn start(nodes_text: impl Into<String>) -> Self {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let address = Address::new("127.0.0.1", listener.local_addr().unwrap().port());
            let script = Arc::new(RwLock::new(nodes_text.into()));
            let accept_script = Arc::clone(&script);

            let accept = spawn(async move {
                loop {
                    let Ok((socket, _)) = listener.accept().await else {
                        return;
                    };
                    tokio::spawn(serve_connection(socket, Arc::clone(&accept_script)));
                }
            });

            Self {
                address,
                script,
                _accept: accept,
            }
        }

        async fn set_nodes_text(&self, nodes_text: impl Into<String>) {
            *self.script.write().await = nodes_text.into();
        }

        fn address(&self) -> Address {
            self.address.clone()
        }
    }

    async fn serve_connection(mut socket: TcpStream, script: Arc<RwLock<String>>) {
        let mut decoder = ValueDecoder;
        let mut buf = BytesMut::with_capacity(4096);
        let mut chunk = [0u8; 4096];

        loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);

            while let Ok(Some(value)) = decoder.decode(&mut buf) {
                let reply = match request_command(&value).as_str() {
                    "CLUSTER NODES" => encode_bulk_string(&script.read().await),
                    "CLUSTER INFO" => encode_bulk_string("cluster_state:ok\n"),
                    _ => "+OK\r\n".to_owned(),
                };

                if socket.write_all(reply.as_bytes()).await.is_err() {
                    return;
                }
            }
        }
    }

    fn request_command(value: &Value) -> String {
        match value {
            Value::Array(Array::Vec(items)) => items
                .iter()
                .map(|v| v.to_string().to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join(" "),
            _ => String::new(),
        }
    }

    fn encode_bulk_string(text: &str) -> String {
        format!("${}\r\n{}\r\n", text.len(), text)
    }

    fn master_node(id: &str, address: Address, ranges: Vec<slot::SlotRange>, fail: bool) -> NodeInfo {
        NodeInfo {
            node_id: id.to_owned(),
            address,
            flags: NodeFlags {
                master: true,
                fail,
                ..Default::default()
            },
            master_id: None,
            slot_ranges: ranges,
        }
    }

    fn slave_node(id: &str, address: Address, master_id: &str) -> NodeInfo {
        NodeInfo {
            node_id: id.to_owned(),
            address,
            flags: NodeFlags {
                slave: true,
                ..Default::default()
            },
            master_id: Some(master_id.to_owned()),
            slot_ranges: Vec::new(),
        }
    }

    /// A cluster config pointed at `nodes`, with the background reconciler effectively
    /// parked: every test drives reconciliation explicitly via `reconcile_once`.
    fn config_for(nodes: &[&FakeNode]) -> ClusterConfig {
        ClusterConfig {
            nodes: nodes.iter().map(|n| (n.address.host.clone(), n.address.port)).collect(),
            scan_interval: Duration::from_secs(3600),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn reapplying_an_unchanged_listing_is_idempotent() {
        let master = FakeNode::start("").await;
        let range = slot::SlotRange::new(0, 16383);
        let listing = render(&[
            master_node("m1", master.address(), vec![range], false),
            slave_node("s1", Address::new("127.0.0.1", 1), "m1"),
        ]);
        master.set_nodes_text(listing).await;

        let cluster_config = config_for(&[&master]);
        let manager = ClusterManager::bootstrap(cluster_config.clone()).await.unwrap();
        let probe_cfg = probe_config(&cluster_config);

        let after_bootstrap = manager.registry().last_partitions().await;
        assert_eq!(1, after_bootstrap.len());

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;
        let after_first_tick = manager.registry().last_partitions().await;
        assert_eq!(after_bootstrap, after_first_tick);

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;
        let after_second_tick = manager.registry().last_partitions().await;
        assert_eq!(after_first_tick, after_second_tick);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn failover_moves_the_entry_to_the_new_master_and_persists_it() {
        let node_a = FakeNode::start("").await;
        let node_b = FakeNode::start("").await;
        let range = slot::SlotRange::new(0, 16383);

        node_a
            .set_nodes_text(render(&[master_node("a", node_a.address(), vec![range], false)]))
            .await;

        let cluster_config = config_for(&[&node_a]);
        let manager = ClusterManager::bootstrap(cluster_config.clone()).await.unwrap();
        let probe_cfg = probe_config(&cluster_config);

        let slot = range.start;
        let before = manager.registry().entry_for_slot(slot).await.unwrap();
        assert_eq!("a", before.node_id);
        assert_eq!(node_a.address(), before.master_address);

        // `a` is still answering (so the tick can reach a node at all) but now reports
        // itself failed with no slots, while `b` reports ownership of the range instead.
        node_a
            .set_nodes_text(render(&[
                master_node("a", node_a.address(), Vec::new(), true),
                master_node("b", node_b.address(), vec![range], false),
            ]))
            .await;

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;

        let after = manager.registry().entry_for_slot(slot).await.unwrap();
        assert_eq!("b", after.node_id);
        assert_eq!(node_b.address(), after.master_address);

        let stored = manager.registry().last_partitions().await;
        let partition = &stored[&range];
        assert_eq!("b", partition.node_id);
        assert_eq!(node_b.address(), partition.master_address);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn slave_set_change_converges_both_the_entry_and_stored_partition() {
        let master = FakeNode::start("").await;
        let range = slot::SlotRange::new(0, 16383);
        let b1 = Address::new("127.0.0.1", 1);
        let b2 = Address::new("127.0.0.1", 2);

        master
            .set_nodes_text(render(&[
                master_node("m1", master.address(), vec![range], false),
                slave_node("s1", b1.clone(), "m1"),
            ]))
            .await;

        let cluster_config = config_for(&[&master]);
        let manager = ClusterManager::bootstrap(cluster_config.clone()).await.unwrap();
        let probe_cfg = probe_config(&cluster_config);

        let slot = range.start;
        let before = manager.registry().entry_for_slot(slot).await.unwrap();
        assert_eq!(vec![b1.clone()], before.slave_addresses);

        master
            .set_nodes_text(render(&[
                master_node("m1", master.address(), vec![range], false),
                slave_node("s2", b2.clone(), "m1"),
            ]))
            .await;

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;

        let after = manager.registry().entry_for_slot(slot).await.unwrap();
        assert_eq!(vec![b2.clone()], after.slave_addresses);

        // The bug this guards against: `last_partitions` must converge too, not just the
        // live entry, or the very next tick recomputes the same removed/added pair forever.
        let stored = manager.registry().last_partitions().await;
        let partition = &stored[&range];
        assert_eq!(HashSet::from([b2.clone()]), partition.slave_addresses);

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;
        let stored_again = manager.registry().last_partitions().await;
        assert_eq!(stored, stored_again);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn migration_leaves_the_untouched_sibling_range_correctly_recorded() {
        let master = FakeNode::start("").await;
        let new_master = FakeNode::start("").await;
        let kept = slot::SlotRange::new(0, 100);
        let migrating = slot::SlotRange::new(200, 300);

        master
            .set_nodes_text(render(&[master_node("m1", master.address(), vec![kept, migrating], false)]))
            .await;

        let cluster_config = config_for(&[&master]);
        let manager = ClusterManager::bootstrap(cluster_config.clone()).await.unwrap();
        let probe_cfg = probe_config(&cluster_config);

        let before = manager.registry().last_partitions().await;
        assert_eq!(2, before[&kept].slot_ranges.len());

        master
            .set_nodes_text(render(&[
                master_node("m1", master.address(), vec![kept], false),
                master_node("m2", new_master.address(), vec![migrating], false),
            ]))
            .await;

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;

        let stored = manager.registry().last_partitions().await;
        let kept_partition = &stored[&kept];
        assert_eq!(HashSet::from([kept]), kept_partition.slot_ranges);
        assert_eq!("m1", kept_partition.node_id);

        let migrated_partition = &stored[&migrating];
        assert_eq!("m2", migrated_partition.node_id);
        assert_eq!(new_master.address(), migrated_partition.master_address);

        let kept_entry = manager.registry().entry_for_slot(kept.start).await.unwrap();
        assert_eq!("m1", kept_entry.node_id);
        let migrated_entry = manager.registry().entry_for_slot(migrating.start).await.unwrap();
        assert_eq!("m2", migrated_entry.node_id);

        manager.shutdown().await;
    }

    #[tokio::test]
    async fn a_newly_observed_master_gets_its_own_entry() {
        let master = FakeNode::start("").await;
        let new_master = FakeNode::start("").await;
        let whole = slot::SlotRange::new(0, 16383);
        let shrunk = slot::SlotRange::new(0, 10000);
        let added = slot::SlotRange::new(10001, 16383);

        master
            .set_nodes_text(render(&[master_node("m1", master.address(), vec![whole], false)]))
            .await;

        let cluster_config = config_for(&[&master]);
        let manager = ClusterManager::bootstrap(cluster_config.clone()).await.unwrap();
        let probe_cfg = probe_config(&cluster_config);

        assert!(manager.registry().entry_for_slot(added.start).await.is_none());

        master
            .set_nodes_text(render(&[
                master_node("m1", master.address(), vec![shrunk], false),
                master_node("m2", new_master.address(), vec![added], false),
            ]))
            .await;

        reconcile_once(manager.registry(), &cluster_config, &probe_cfg).await;

        let new_entry = manager.registry().entry_for_slot(added.start).await.unwrap();
        assert_eq!("m2", new_entry.node_id);
        assert_eq!(new_master.address(), new_entry.master_address);

        let old_entry = manager.registry().entry_for_slot(whole.start).await.unwrap();
        assert_eq!("m1", old_entry.node_id);

        manager.shutdown().await;
    }

    #[test]
    fn dedup_by_node_id_collapses_repeated_ranges() {
        let mut by_range = HashMap::new();
        let p = Partition {
            node_id: "m1".to_owned(),
            master_address: Address::new("127.0.0.1", 7000),
            slave_addresses: HashSet::new(),
            slot_ranges: [slot::SlotRange::new(0, 100), slot::SlotRange::new(101, 200)]
                .into_iter()
                .collect(),
            master_fail: false,
        };
        by_range.insert(slot::SlotRange::new(0, 100), p.clone());
        by_range.insert(slot::SlotRange::new(101, 200), p);

        let by_node = dedup_by_node_id(&by_range);
        assert_eq!(1, by_node.len());
        assert_eq!(2, by_node["m1"].slot_ranges.len());
    }

    #[test]
    fn bootstrap_partitions_from_three_masters_cover_the_full_slot_space() {
        let text = "\
a 127.0.0.1:7000@17000 master - 0 0 1 connected 0-5460
b 127.0.0.1:7001@17001 master - 0 0 1 connected 5461-10922
c 127.0.0.1:7002@17002 master - 0 0 1 connected 10923-16383
";
        let nodes = parse_nodes(text);
        let partitions = build_partitions(&nodes);
        assert_eq!(3, partitions.len());

        let slot = slot::hash_slot("foo");
        let owner = partitions.iter().find(|p| p.slot_ranges.iter().any(|r| r.contains(slot)));
        assert!(owner.is_some());
        assert_eq!("b", owner.unwrap().node_id);
    }
}
