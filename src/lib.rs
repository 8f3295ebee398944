#![cfg_attr(docsrs, feature(doc_cfg))]
/*!
rustis-topology tracks the live shape of a Redis Cluster deployment: which nodes hold
which hash slots, which node is master for each range and which are its replicas.

# Philosophy
* Low allocations
* Full async library
* Rust idiomatic API

# Features
* Discover cluster topology from a set of seed addresses, the same way any cluster-aware
  client bootstraps itself, by issuing `CLUSTER NODES`/`CLUSTER INFO` against a seed and
  parsing the gossip-protocol node list.
* Keep that topology current with a periodic reconciliation tick that re-probes a live
  node, diffs the freshly parsed view against the last known one, and applies master
  failover, replica set and slot migration changes to a shared registry.
* Route a key to its owning hash slot with the same CRC16/XMODEM + hash-tag algorithm
  used by Redis Cluster clients.

# Optional Features
| Feature | Description |
| ------- | ----------- |
| `tokio-runtime` | [Tokio](https://tokio.rs/) runtime (default) |
| `async-std-runtime` | [async-std](https://async.rs/) runtime (optional) |
| `tokio-rustls` | Tokio + rustls TLS support (optional) |
| `tokio-native-tls` | Tokio + native-tls TLS support (optional) |

# Usage

```no_run
use rustis_topology::{client::ClusterConfig, cluster::ClusterManager, Result};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ClusterConfig {
        nodes: vec![("127.0.0.1".to_owned(), 7000), ("127.0.0.1".to_owned(), 7001)],
        ..Default::default()
    };

    let manager = ClusterManager::bootstrap(config).await?;
    let slot = ClusterManager::hash_slot("user:{42}:profile");
    let _entry = manager.registry().entry_for_slot(slot).await;

    manager.shutdown().await;
    Ok(())
}
```

# Configuration
See the module [`client`] for [`Config`](client::Config), the URI-based configuration
surface shared with the standalone and sentinel topologies, and [`ClusterConfig`](client::ClusterConfig)
for the cluster-specific knobs (scan interval, timeouts, pool sizing).

# RESP
RESP is the [Redis Serialization Protocol](https://redis.io/docs/reference/protocol-spec/).
See the module [`resp`] for the object model used to talk to cluster nodes.
*/

pub mod client;
pub mod cluster;
mod error;
mod network;
pub mod resp;

pub use error::*;

/// Library general result type.
pub type Result<T> = std::result::Result<T, Error>;
/// Library general future type.
pub type Future<'a, T> = futures_util::future::BoxFuture<'a, Result<T>>;

#[cfg(all(feature = "tokio-runtime", feature = "async-std-runtime"))]
compile_error!("feature \"tokio-runtime\" and feature \"async-std-runtime\" cannot be enabled at the same time");
