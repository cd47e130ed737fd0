//! Document tree
//!
//!     The parser produces a tree rooted at a [Block]. The set of node variants is closed
//!     ([Node]), and every consumer dispatches over it with an exhaustive `match`, so adding a
//!     variant is a compile error everywhere it is not handled.
//!
//! Lifecycle
//!
//!     Nodes are created once by the parser. The only later mutation comes from registered
//!     visitors, which the dumper hands each node right before rendering it (tag renames,
//!     injected attributes). A tree is rendered once and then dropped; nothing is cached
//!     between renders.

pub mod attributes;
pub mod node;

pub use attributes::{AttrValue, Attributes};
pub use node::{Block, Code, Comment, Doctype, Filter, Node, NodeKind, NodeMut, Tag, Text};
