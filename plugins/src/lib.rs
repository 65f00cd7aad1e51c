pub mod factory;
pub mod provider;
pub mod services;

pub use services::PluginServicesFactory;
