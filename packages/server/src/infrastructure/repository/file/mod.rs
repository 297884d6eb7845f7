//! File-backed repositories.

mod jsonl;

pub use jsonl::JsonLinesMessageStore;
