//! Options for `TransactionDataBuilder::build`.
//!
//! These types deserialize from JavaScript-style camelCase objects; every
//! field is optional and falls back to the protocol defaults.

use std::sync::Arc;

use serde::Deserialize;

use crate::intent::{IntentResolver, IntentResolvers};

/// Protocol limits applied while building.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildLimits {
    /// Maximum number of coins used for gas payment
    pub max_gas_objects: usize,
    /// Maximum size in bytes of a single pure input
    pub max_pure_argument_size: usize,
    /// Object ids per `multiGetObjects` request
    pub max_objects_per_fetch: usize,
    /// Added to the estimated budget, in units of the gas price
    pub gas_safe_overhead: u64,
    /// Budget used for the estimation dry run
    pub max_gas_budget: u64,
}

impl Default for BuildLimits {
    fn default() -> Self {
        BuildLimits {
            max_gas_objects: 256,
            max_pure_argument_size: 16 * 1024,
            max_objects_per_fetch: 50,
            gas_safe_overhead: 1000,
            max_gas_budget: 50_000_000_000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Serialize only the `TransactionKind`; gas stages are skipped
    pub only_transaction_kind: bool,
    /// Intents left unresolved for a downstream signer
    pub supported_intents: Vec<String>,
    pub limits: BuildLimits,
    /// Resolvers added on top of the builder's own table
    #[serde(skip)]
    pub resolvers: IntentResolvers,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transaction_kind() -> Self {
        BuildOptions {
            only_transaction_kind: true,
            ..Default::default()
        }
    }

    pub fn with_resolver(mut self, name: impl Into<String>, resolver: Arc<dyn IntentResolver>) -> Self {
        self.resolvers.register(name, resolver);
        self
    }

    pub fn with_supported_intent(mut self, name: impl Into<String>) -> Self {
        self.supported_intents.push(name.into());
        self
    }

    pub fn with_limits(mut self, limits: BuildLimits) -> Self {
        self.limits = limits;
        self
    }

    pub(crate) fn is_supported(&self, name: &str) -> bool {
        self.supported_intents.iter().any(|s| s == name)
    }
}
