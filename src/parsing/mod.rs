//*** START FILE: src/parsing/mod.rs ***//
pub mod sentence_splitter;
pub mod tokenizer;

// Re-export the analyzers for convenience
pub use sentence_splitter::{split_sentences_by_rule, split_sentences_heuristic, RuleSegmenter};
pub use tokenizer::HeuristicAnalyzer;
//*** END FILE: src/parsing/mod.rs ***//
