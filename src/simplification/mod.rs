//*** START FILE: src/simplification/mod.rs ***//
pub mod dictionary;
pub mod humanizer;
pub mod lexical;
pub mod normalizer;
pub mod restructure;
pub mod rewriter;

pub use dictionary::{EasyWordDictionary, SimplificationRule};
pub use humanizer::humanize;
pub use lexical::LexicalSimplifier;
pub use normalizer::normalize;
pub use restructure::{reassemble, restructure, segment};
pub use rewriter::rewrite;
//*** END FILE: src/simplification/mod.rs ***//
