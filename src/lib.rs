#![deny(missing_docs)]
// This is an HTML tokenizer. HTML can be untrusted input from the internet.
#![forbid(unsafe_code)]
#![doc = include_str!("../README.md")]

mod emitter;
mod entities;
mod machine;
mod names;
mod never;
mod read_helper;
mod reader;
mod state;
mod tokenizer;
mod utils;

pub use emitter::{Attribute, DefaultEmitter, Doctype, Emitter, Tag, Token};
pub use entities::EntityDecoder;
pub use names::{AttrId, Namespace, TagId};
pub use never::Never;
pub use reader::{BufReadReader, Readable, Reader, StringReader};
pub use state::State;
pub use tokenizer::{InfallibleTokenizer, Tokenizer};
