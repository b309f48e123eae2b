//! Resource loading adapters.

mod file;
mod memory;

pub use file::{CLASSPATH_PREFIX, FILE_PREFIX, FileSystemResourceLoader};
pub use memory::InMemoryResourceLoader;
