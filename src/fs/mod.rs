//! # Byte Streams
//!
//! Open/read/write/close handles the codec is driven through. The local
//! backend maps names onto a root directory; the memory backend keeps files
//! in a shared map.

mod backend;
mod errors;
mod local;
mod memory;

pub use backend::{FsHandler, ReadGuard, StreamReader, StreamWriter, WriteGuard};
pub use errors::{StreamError, StreamResult};
pub use local::{LocalStreamReader, LocalStreamWriter};
pub use memory::{MemoryStore, MemoryStreamReader, MemoryStreamWriter};
