#![allow(dead_code)]

pub mod database;
pub mod memory_store;

use game_rental::console::LineTerminal;
use std::io::Cursor;

#[allow(unused_imports)]
pub use database::{seed_store, test_pool, OrderCounts};
#[allow(unused_imports)]
pub use memory_store::MemoryCheckoutStore;

pub type ScriptedTerminal = LineTerminal<Cursor<String>, Vec<u8>>;

/// Terminal that answers prompts with `lines`, in order.
pub fn scripted(lines: &[&str]) -> ScriptedTerminal {
    let mut input = lines.join("\n");
    input.push('\n');
    LineTerminal::new(Cursor::new(input), Vec::new())
}

pub fn transcript(term: &ScriptedTerminal) -> String {
    String::from_utf8_lossy(term.output()).into_owned()
}
