use serde::{Deserialize, Serialize};

use super::viewer::Viewer;

/// `data` of the `logIn` mutation.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LogInData {
    #[serde(rename = "logIn")]
    pub log_in: Option<Viewer>,
}

/// Input of the `connectStripe` mutation: the authorization code handed back
/// by the payment provider.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectStripeInput {
    pub code: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectStripeVariables {
    pub input: ConnectStripeInput,
}

impl ConnectStripeVariables {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            input: ConnectStripeInput { code: code.into() },
        }
    }
}

/// `data` of the `connectStripe` mutation.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnectStripeData {
    #[serde(rename = "connectStripe")]
    pub connect_stripe: Option<ConnectStripePayload>,
}

/// Wallet linkage reported back after a successful connect.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectStripePayload {
    pub has_wallet: Option<bool>,
}
