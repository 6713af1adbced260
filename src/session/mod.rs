pub mod bootstrap;
pub mod viewer_store;

pub use bootstrap::{AuthBootstrap, BootstrapState};
pub use viewer_store::ViewerStore;
