pub mod chat;
pub mod demo;
pub mod payload;
pub mod provider;
pub mod route;

pub use demo::DemoProviders;
pub use payload::*;
pub use provider::*;
