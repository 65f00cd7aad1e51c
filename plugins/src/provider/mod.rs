pub mod local;
pub mod service;

pub use local::LocalProvider;
pub use service::ProviderClient;
