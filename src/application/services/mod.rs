// src/application/services/mod.rs
pub mod flow;

pub use flow::{AuthFlowService, FlowConfig};

/// Bundle of application services injected into the HTTP layer.
pub struct ApplicationServices {
    flow: AuthFlowService,
}

impl ApplicationServices {
    pub fn new(flow: AuthFlowService) -> Self {
        Self { flow }
    }

    pub fn flow(&self) -> &AuthFlowService {
        &self.flow
    }
}
