//! Extension points
//!
//! The dumper can be extended in two ways:
//!
//!     - Visitors ([Visitor]) are registered per node kind and may rewrite a node right
//!       before it is rendered. [AutotagsVisitor] is the one shipped with the crate.
//!     - Filters ([TextFilter]) are registered under an alias and render the body of a
//!       `:alias` block. See [filters] for the built-in ones.
//!
//! Registration happens on the [Dumper](crate::dumping::Dumper).

pub mod autotags;
pub mod filter;
pub mod filters;
pub mod visitor;

pub use autotags::AutotagsVisitor;
pub use filter::{TextFilter, WrappingFilter};
pub use filters::BUILTIN_FILTERS;
pub use visitor::{VisitError, Visitor};
