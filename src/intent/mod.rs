//! Deferred commands and the resolvers that expand them.
//!
//! An intent is a placeholder [`Command::Intent`](crate::transaction::Command)
//! carrying a name and opaque data. During build, the resolver registered
//! under that name runs once and replaces every intent of its name with
//! concrete commands.

mod coin_select;
mod coin_with_balance;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::client::SuiClient;
use crate::error::WasmSuiError;
use crate::transaction::TransactionData;

pub use coin_select::select_coins;
pub use coin_with_balance::{CoinType, CoinWithBalance, CoinWithBalanceResolver, COIN_WITH_BALANCE};

/// Expands all intents of one name within a transaction.
#[async_trait]
pub trait IntentResolver: Send + Sync {
    async fn resolve(
        &self,
        data: &mut TransactionData,
        client: &dyn SuiClient,
    ) -> Result<(), WasmSuiError>;
}

/// Resolver table keyed by intent name.
#[derive(Clone, Default)]
pub struct IntentResolvers {
    resolvers: BTreeMap<String, Arc<dyn IntentResolver>>,
}

impl IntentResolvers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in resolvers registered.
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.register(COIN_WITH_BALANCE, Arc::new(CoinWithBalanceResolver));
        table
    }

    /// Register `resolver` for `name`, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, resolver: Arc<dyn IntentResolver>) {
        self.resolvers.insert(name.into(), resolver);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn IntentResolver>> {
        self.resolvers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// Merge `other` into this table; entries in `other` win.
    pub fn extend(&mut self, other: &IntentResolvers) {
        for (name, resolver) in &other.resolvers {
            self.resolvers.insert(name.clone(), Arc::clone(resolver));
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resolvers.keys().map(String::as_str)
    }
}

impl fmt::Debug for IntentResolvers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.resolvers.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    #[async_trait]
    impl IntentResolver for Noop {
        async fn resolve(
            &self,
            _data: &mut TransactionData,
            _client: &dyn SuiClient,
        ) -> Result<(), WasmSuiError> {
            Ok(())
        }
    }

    #[test]
    fn test_table() {
        let mut table = IntentResolvers::with_defaults();
        assert!(table.contains(COIN_WITH_BALANCE));

        let mut extra = IntentResolvers::new();
        extra.register("Noop", Arc::new(Noop));
        table.extend(&extra);
        assert_eq!(table.names().collect::<Vec<_>>(), vec![COIN_WITH_BALANCE, "Noop"]);
        assert!(table.get("Noop").is_some());
        assert!(table.get("Missing").is_none());
        assert_eq!(format!("{:?}", table), r#"{"CoinWithBalance", "Noop"}"#);
    }
}
