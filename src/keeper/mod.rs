//! The committee keeper: the entry points a block runtime calls to submit
//! proposals, cast votes and close proposals at the end of each block.

pub mod genesis;
pub mod proposal;
pub mod querier;
pub mod store;
pub mod tally;

pub use proposal::ProposalCloseRecord;
pub use querier::Querier;

use std::sync::Arc;

use crate::bank::BankKeeper;
use crate::config::ProtocolLimits;
use crate::params::ParamKeeper;
use crate::router::Router;
use crate::store::KvStore;

pub struct Keeper {
    router: Router,
    param_keeper: Arc<ParamKeeper>,
    bank: Arc<dyn BankKeeper>,
    limits: ProtocolLimits,
}

impl Keeper {
    pub fn new(
        router: Router,
        param_keeper: Arc<ParamKeeper>,
        bank: Arc<dyn BankKeeper>,
        limits: ProtocolLimits,
    ) -> Self {
        Self {
            router,
            param_keeper,
            bank,
            limits,
        }
    }

    /// Keeper dispatching to the built-in handlers
    pub fn with_default_routes(
        param_keeper: Arc<ParamKeeper>,
        bank: Arc<dyn BankKeeper>,
        limits: ProtocolLimits,
    ) -> Self {
        let router = Router::with_default_routes(param_keeper.clone(), limits.clone());
        Self::new(router, param_keeper, bank, limits)
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn param_keeper(&self) -> &ParamKeeper {
        &self.param_keeper
    }

    pub fn bank(&self) -> &dyn BankKeeper {
        self.bank.as_ref()
    }

    pub fn limits(&self) -> &ProtocolLimits {
        &self.limits
    }

    /// Read-only view over `store`
    pub fn querier<'k>(&'k self, store: &'k dyn KvStore) -> Querier<'k> {
        Querier::new(self, store)
    }
}

#[cfg(test)]
mod tests;
