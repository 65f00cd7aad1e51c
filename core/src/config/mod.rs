//! Configuration is split into:
//! - `types.rs`     (data structures + defaults)
//! - `load.rs`      (IO: file + env overrides + validation)
//! - `platforms.rs` (the `PLATFORMS` env format)

pub mod load;
pub mod platforms;
pub mod types;

pub use load::load;
pub use platforms::parse_platforms;
pub use types::*;
