//! Node visitors
//!
//!     A visitor is registered for one node kind and is handed every node of that kind right
//!     before it is rendered. It may rewrite the node in place; the dumper renders whatever the
//!     visitors leave behind.

use crate::ast::{NodeKind, NodeMut};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VisitError {
    #[error("{visitor} cannot visit {found} nodes")]
    UnsupportedNode {
        visitor: &'static str,
        found: NodeKind,
    },
}

pub trait Visitor: Send + Sync {
    fn visit(&self, node: NodeMut<'_>) -> Result<(), VisitError>;
}

impl<F> Visitor for F
where
    F: Fn(NodeMut<'_>) -> Result<(), VisitError> + Send + Sync,
{
    fn visit(&self, node: NodeMut<'_>) -> Result<(), VisitError> {
        self(node)
    }
}
