pub mod export;
pub mod formats;
pub mod init;
pub mod structure;

pub use export::{export, ExportArgs};
pub use formats::formats;
pub use init::{init, InitArgs};
pub use structure::{structure, StructureArgs};
