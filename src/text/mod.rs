pub mod tokenizer;

pub use tokenizer::{RuleTokenizer, TokenizedTranscript, Tokenizer};
