/*!
Defines the configuration surface shared by every connection this crate opens: a single
[`Config`] struct embedding a [`ServerConfig`] that selects between a standalone endpoint,
a [`SentinelConfig`] or a [`ClusterConfig`].

# Configuring a cluster topology manager

```
use rustis_topology::client::{ClusterConfig, Config, ServerConfig};

let config = Config {
    server: ServerConfig::Cluster(ClusterConfig {
        nodes: vec![("127.0.0.1".to_owned(), 7000), ("127.0.0.1".to_owned(), 7001)],
        ..Default::default()
    }),
    ..Default::default()
};
```

A cluster configuration can equally be built from a connection string:

```
use rustis_topology::client::{Config, IntoConfig};

let config = "redis+cluster://127.0.0.1:7000,127.0.0.1:7001,127.0.0.1:7002"
    .into_config()
    .unwrap();
```

`Config::username`, `Config::password` and `Config::tls_config` apply uniformly across
server kinds: they are forwarded to every probe and entry connection a
[`ClusterManager`](crate::cluster::ClusterManager) opens, rather than being duplicated
onto [`ClusterConfig`].
*/

mod config;

pub use config::*;
