//! File system operations.

pub mod declaration;

pub use declaration::{DeclarationFile, load_declaration, save_declaration};
