//! Concrete report sinks

pub mod filesystem;

pub use filesystem::{FilesystemSink, FilesystemSinkConfig};
