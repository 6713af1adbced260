pub mod operations;
pub mod viewer;

pub use operations::{
    ConnectStripeData, ConnectStripeInput, ConnectStripePayload, ConnectStripeVariables, LogInData,
};
pub use viewer::Viewer;
