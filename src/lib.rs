//! # slimc
//!
//! A compiler for an indentation-based markup template language that produces markup with
//! embedded PHP.
//!
//!     doctype 5                      <!DOCTYPE html>
//!     ul#items                       <ul id="items">
//!       - foreach ($items as $i):      <?php foreach ($items as $i): ?>
//!         li= $i                         <li><?= $i ?></li>
//!                                      <?php endforeach; ?>
//!                                    </ul>
//!
//! Structure:
//!     Compilation runs in three stages:
//!     1. [lexing]: source text to tokens, tracking indentation and verbatim regions.
//!     2. [parsing]: tokens to the document tree defined in [ast].
//!     3. [dumping]: tree to output, with the hooks defined in [extensions].
//!
//!     [Engine] wires the stages together, adds file rendering and the compiled-template
//!     cache, and reports errors with the name of the template they came from.

pub mod ast;
pub mod config;
pub mod dumping;
pub mod engine;
pub mod error;
pub mod extensions;
pub mod lexing;
pub mod options;
pub mod parsing;

pub use dumping::Dumper;
pub use engine::Engine;
pub use error::{Error, Result};
pub use lexing::{tokenize, Lexer};
pub use options::Options;
pub use parsing::{parse, Parser};

/// Compiles template source with the default options and the bundled extensions.
pub fn compile(source: &str) -> Result<String> {
    Engine::with_defaults(Options::default())?
        .render_str(source)
}
