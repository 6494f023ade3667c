use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Remote records are keyed by plain numeric ids
pub type RemoteId = u64;

/// Local node identity: a type tag plus the server-assigned id.
/// Client-drafted ids never enter the graph; a node exists only once the
/// remote create returned its canonical id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    Stock(RemoteId),
    Variable(RemoteId),
    FlowRate(RemoteId),
}

/// Local edge identity. Flow edges are backed by a remote flow record; link
/// edges are visual-only and numbered from a client-local counter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeId {
    Flow(RemoteId),
    Link(u64),
}

/// The remote record behind a local entity. A flow edge and its rate node
/// resolve to the same `Flow` value, which is what makes delete
/// deduplication work.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RemoteEntity {
    Stock(RemoteId),
    Variable(RemoteId),
    Flow(RemoteId),
}

impl NodeId {
    pub fn remote_id(&self) -> RemoteId {
        match self {
            NodeId::Stock(id) | NodeId::Variable(id) | NodeId::FlowRate(id) => *id,
        }
    }

    /// The remote record this node directly owns. A rate node owns none: its
    /// backing flow record is reached through the paired edge.
    pub fn remote_entity(&self) -> Option<RemoteEntity> {
        match self {
            NodeId::Stock(id) => Some(RemoteEntity::Stock(*id)),
            NodeId::Variable(id) => Some(RemoteEntity::Variable(*id)),
            NodeId::FlowRate(_) => None,
        }
    }
}

impl EdgeId {
    pub fn remote_entity(&self) -> Option<RemoteEntity> {
        match self {
            EdgeId::Flow(id) => Some(RemoteEntity::Flow(*id)),
            EdgeId::Link(_) => None,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Stock(id) => write!(f, "stock-{}", id),
            NodeId::Variable(id) => write!(f, "variable-{}", id),
            NodeId::FlowRate(id) => write!(f, "flow-rate-{}", id),
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeId::Flow(id) => write!(f, "flow-{}", id),
            EdgeId::Link(n) => write!(f, "link-{}", n),
        }
    }
}

fn split_tagged(s: &str) -> Option<(&str, RemoteId)> {
    let (tag, num) = s.rsplit_once('-')?;
    let id = num.parse().ok()?;
    Some((tag, id))
}

impl FromStr for NodeId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_tagged(s) {
            Some(("stock", id)) => Ok(NodeId::Stock(id)),
            Some(("variable", id)) => Ok(NodeId::Variable(id)),
            Some(("flow-rate", id)) => Ok(NodeId::FlowRate(id)),
            _ => anyhow::bail!("not a node id: '{}'", s),
        }
    }
}

impl FromStr for EdgeId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match split_tagged(s) {
            Some(("flow", id)) => Ok(EdgeId::Flow(id)),
            Some(("link", n)) => Ok(EdgeId::Link(n)),
            _ => anyhow::bail!("not an edge id: '{}'", s),
        }
    }
}
