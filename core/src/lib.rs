pub mod api;
pub mod config;
pub mod errors;
pub mod grade;
pub mod lti;
pub mod provider;
pub mod registry;
pub mod services;

pub use services::{Services, ServicesFactory};
