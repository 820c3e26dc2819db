//! Registry client implementations.

pub mod langfuse;
pub mod memory;

pub use langfuse::LangfuseClient;
pub use memory::InMemoryRegistry;
