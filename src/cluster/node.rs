use crate::cluster::SlotRange;
use std::fmt;

/// Host and port of a cluster node. Two addresses are equal iff both components match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub host: String,
    pub port: u16,
}

impl Address {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// The set of gossip flags carried by a node line, drawn from
/// `{MASTER, SLAVE, FAIL, FAIL?, HANDSHAKE, NOADDR, MYSELF}`. Unrecognised tokens are
/// dropped rather than rejecting the whole line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeFlags {
    pub myself: bool,
    pub master: bool,
    pub slave: bool,
    pub fail: bool,
    pub fail_possible: bool,
    pub handshake: bool,
    pub noaddr: bool,
}

impl NodeFlags {
    fn parse(field: &str) -> Self {
        let mut flags = Self::default();

        for token in field.split(',') {
            let (token, possible) = match token.strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (token, false),
            };

            match token.to_ascii_uppercase().as_str() {
                "MYSELF" => flags.myself = true,
                "MASTER" => flags.master = true,
                "SLAVE" => flags.slave = true,
                "FAIL" if possible => flags.fail_possible = true,
                "FAIL" => flags.fail = true,
                "HANDSHAKE" => flags.handshake = true,
                "NOADDR" => flags.noaddr = true,
                _ => {}
            }
        }

        flags
    }

    pub fn is_master(&self) -> bool {
        self.master
    }

    pub fn is_slave(&self) -> bool {
        self.slave
    }
}

impl fmt::Display for NodeFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = Vec::new();
        if self.myself {
            tokens.push("myself");
        }
        if self.master {
            tokens.push("master");
        }
        if self.slave {
            tokens.push("slave");
        }
        if self.fail {
            tokens.push("fail");
        }
        if self.fail_possible {
            tokens.push("fail?");
        }
        if self.handshake {
            tokens.push("handshake");
        }
        if self.noaddr {
            tokens.push("noaddr");
        }
        if tokens.is_empty() {
            tokens.push("noflags");
        }
        write!(f, "{}", tokens.join(","))
    }
}

/// One parsed line of a `CLUSTER NODES` response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_id: String,
    pub address: Address,
    pub flags: NodeFlags,
    /// Populated only when `flags.is_slave()`; the node id of the master it replicates.
    pub master_id: Option<String>,
    /// Populated only when `flags.is_master()`; the slot ranges this node currently owns.
    pub slot_ranges: Vec<SlotRange>,
}

/// Parses a `CLUSTER NODES` response body into node records, preserving input order.
///
/// Each non-empty line is whitespace-separated:
/// `id addr flags master-id ping-sent pong-recv config-epoch link-state [slot ...]`.
/// A malformed line is dropped silently; the rest of the listing is still processed.
/// Bracketed migration markers (`[slot-><-nodeid]`) are ignored.
pub fn parse_nodes(nodes: &str) -> Vec<NodeInfo> {
    nodes.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<NodeInfo> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let mut fields = line.split_whitespace();
    let node_id = fields.next()?.to_owned();
    let addr_field = fields.next()?;
    let flags_field = fields.next()?;
    let master_id_field = fields.next()?;
    // ping-sent, pong-recv, config-epoch, link-state: unused by this parser.
    fields.next()?;
    fields.next()?;
    fields.next()?;
    fields.next()?;

    let address = parse_address(addr_field)?;
    let flags = NodeFlags::parse(flags_field);

    let master_id = if flags.is_slave() && master_id_field != "-" {
        Some(master_id_field.to_owned())
    } else {
        None
    };

    let mut slot_ranges = Vec::new();
    if flags.is_master() {
        for token in fields {
            if token.starts_with('[') {
                continue;
            }
            if let Some(range) = parse_slot_range(token) {
                slot_ranges.push(range);
            }
        }
    }

    Some(NodeInfo {
        node_id,
        address,
        flags,
        master_id,
        slot_ranges,
    })
}

fn parse_address(field: &str) -> Option<Address> {
    let host_port = field.split('@').next()?;
    let host_port = host_port.split(',').next()?;
    let (host, port) = host_port.rsplit_once(':')?;
    let port = port.parse::<u16>().ok()?;
    Some(Address::new(host, port))
}

fn parse_slot_range(token: &str) -> Option<SlotRange> {
    match token.split_once('-') {
        Some((start, end)) => {
            let start = start.parse::<u16>().ok()?;
            let end = end.parse::<u16>().ok()?;
            Some(SlotRange::new(start, end))
        }
        None => {
            let slot = token.parse::<u16>().ok()?;
            Some(SlotRange::new(slot, slot))
        }
    }
}

/// Renders a node list back into `CLUSTER NODES` text, for round-trip testing. This is the
/// inverse of [`parse_nodes`] for inputs in canonical form; it is otherwise unused at
/// runtime since the cluster itself is the sole producer of this text.
pub fn render(nodes: &[NodeInfo]) -> String {
    let mut out = String::new();

    for node in nodes {
        let master_id = node.master_id.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{} {} {} {} 0 0 0 connected",
            node.node_id, node.address, node.flags, master_id
        ));

        for range in &node.slot_ranges {
            out.push(' ');
            out.push_str(&range.to_string());
        }

        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_master_line() {
        let line = "07c37dfeb235213a872192d90877d0cd55635b91 127.0.0.1:30004@31004 master - 0 1426238316232 4 connected 0-5460";
        let nodes = parse_nodes(line);
        assert_eq!(1, nodes.len());
        let node = &nodes[0];
        assert_eq!("07c37dfeb235213a872192d90877d0cd55635b91", node.node_id);
        assert_eq!(Address::new("127.0.0.1", 30004), node.address);
        assert!(node.flags.is_master());
        assert_eq!(None, node.master_id);
        assert_eq!(vec![SlotRange::new(0, 5460)], node.slot_ranges);
    }

    #[test]
    fn parses_a_slave_line_with_master_id() {
        let line = "67ed2db8d677e59ec4a4cefb06858cf2a1a89fa1 127.0.0.1:30002@31002 slave 07c37dfeb235213a872192d90877d0cd55635b91 0 1426238317000 2 connected";
        let nodes = parse_nodes(line);
        let node = &nodes[0];
        assert!(node.flags.is_slave());
        assert_eq!(
            Some("07c37dfeb235213a872192d90877d0cd55635b91".to_owned()),
            node.master_id
        );
        assert!(node.slot_ranges.is_empty());
    }

    #[test]
    fn strips_trailing_question_mark_from_fail_flag() {
        let line = "a b.c.d:1@2 master,fail? - 0 0 0 connected";
        let nodes = parse_nodes("id 127.0.0.1:7000@17000 master,fail? - 0 0 0 connected 0-1\n");
        assert!(nodes[0].flags.fail_possible);
        assert!(!nodes[0].flags.fail);
        let _ = line;
    }

    #[test]
    fn ignores_migration_markers() {
        let line = "id 127.0.0.1:7000@17000 master - 0 0 0 connected 0-100 [101-><-othernode]";
        let nodes = parse_nodes(line);
        assert_eq!(vec![SlotRange::new(0, 100)], nodes[0].slot_ranges);
    }

    #[test]
    fn skips_malformed_lines_but_keeps_the_rest() {
        let input = "garbage line\nid 127.0.0.1:7000@17000 master - 0 0 0 connected 0-100\n";
        let nodes = parse_nodes(input);
        assert_eq!(1, nodes.len());
    }

    #[test]
    fn unparseable_payload_yields_empty_list() {
        assert!(parse_nodes("\n\n   \n").is_empty());
    }

    #[test]
    fn slot_range_boundaries() {
        assert_eq!(Some(SlotRange::new(0, 0)), parse_slot_range("0"));
        assert_eq!(Some(SlotRange::new(0, 0)), parse_slot_range("0-0"));
        assert_eq!(
            Some(SlotRange::new(5460, 10922)),
            parse_slot_range("5460-10922")
        );
    }

    #[test]
    fn parse_then_render_round_trips_canonical_input() {
        let nodes = vec![
            NodeInfo {
                node_id: "master1".to_owned(),
                address: Address::new("127.0.0.1", 7000),
                flags: NodeFlags {
                    master: true,
                    ..Default::default()
                },
                master_id: None,
                slot_ranges: vec![SlotRange::new(0, 100)],
            },
            NodeInfo {
                node_id: "slave1".to_owned(),
                address: Address::new("127.0.0.1", 7001),
                flags: NodeFlags {
                    slave: true,
                    ..Default::default()
                },
                master_id: Some("master1".to_owned()),
                slot_ranges: Vec::new(),
            },
        ];

        let rendered = render(&nodes);
        let parsed = parse_nodes(&rendered);
        assert_eq!(nodes, parsed);
    }
}
