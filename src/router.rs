use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ProtocolLimits;
use crate::context::Context;
use crate::errors::CommitteeResult;
use crate::handlers::{CommitteeHandler, ParamsChangeHandler, TextHandler, UpgradeHandler};
use crate::params::ParamKeeper;
use crate::types::{PubProposal, ROUTE_COMMITTEE, ROUTE_GOV, ROUTE_PARAMS, ROUTE_UPGRADE};

/// Enacts one kind of proposal content
pub trait ProposalHandler: Send + Sync {
    fn handle(&self, ctx: &mut Context<'_>, content: &PubProposal) -> CommitteeResult<()>;
}

/// Dispatch table from content route to handler
#[derive(Default)]
pub struct Router {
    routes: BTreeMap<String, Box<dyn ProposalHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the built-in handler for every content kind
    pub fn with_default_routes(params: Arc<ParamKeeper>, limits: ProtocolLimits) -> Self {
        Router::new()
            .add_route(ROUTE_GOV, Box::new(TextHandler))
            .add_route(ROUTE_PARAMS, Box::new(ParamsChangeHandler::new(params)))
            .add_route(ROUTE_UPGRADE, Box::new(UpgradeHandler))
            .add_route(ROUTE_COMMITTEE, Box::new(CommitteeHandler::new(limits)))
    }

    /// # Panics
    ///
    /// Panics if `route` already has a handler.
    pub fn add_route(mut self, route: &str, handler: Box<dyn ProposalHandler>) -> Self {
        if self.routes.contains_key(route) {
            panic!("route {} has already been initialized", route);
        }
        self.routes.insert(route.to_string(), handler);
        self
    }

    pub fn has_route(&self, route: &str) -> bool {
        self.routes.contains_key(route)
    }

    pub fn get_route(&self, route: &str) -> Option<&dyn ProposalHandler> {
        self.routes.get(route).map(|h| h.as_ref())
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(|k| k.as_str())
    }
}
