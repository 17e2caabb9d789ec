//! MetaKit Core Types
//!
//! Shared vocabulary used by every other crate in the workspace:
//! - Type identity ([`TypeKey`], [`ImplId`])
//! - The registry's view of a node ([`MetaNode`], [`NodeInfo`])
//! - Proposed values ([`Value`])
//! - Wildcard matching helpers

mod id;
mod node;
mod pattern;
mod value;

pub use id::{ImplId, ParseKeyError, TypeKey};
pub use node::{MetaNode, NodeInfo};
pub use pattern::{is_wildcard, segment_matches, WILDCARD};
pub use value::Value;
