pub mod binary;
pub mod classify;
pub mod config;
pub mod container;
pub mod header;
pub mod path_dirs;
pub mod scan;
pub mod script;
pub mod sections;
pub mod shadow;
mod types;

pub use binary::{detect_language, is_macho_magic, MachBinary};
pub use classify::{classify, resolve_symlink};
pub use config::*;
pub use container::detect_container;
pub use path_dirs::{directories_from_path, directory_records, list_executables};
pub use scan::scan;
pub use script::{detect_script, detect_script_language};
pub use sections::*;
pub use shadow::ShadowResolver;
pub use types::*;
