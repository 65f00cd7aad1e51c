pub mod r#trait;

pub use r#trait::{GradeService, LaunchVerifier, PlatformStore};
