//! # User accounts
//!
//! - `spec`: what the operator asked for ([`UserAccountSpec`], [`AuthMethod`])
//! - `keys`: where an authentication key comes from
//! - `credentials`: ownership and modes of SSH files
//! - `provisioner`: the create / delete / modify flows

pub mod credentials;
pub mod keys;
pub mod provisioner;
pub mod report;
pub mod spec;

pub use keys::{HttpKeyFetcher, IdentityProvider, KeySource};
pub use provisioner::AccountProvisioner;
pub use report::{AccountReport, StepRecord};
pub use spec::{AuthMethod, Secret, UserAccountSpec};
