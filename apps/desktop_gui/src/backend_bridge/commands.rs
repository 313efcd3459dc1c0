//! Backend commands queued from UI to backend worker.

use client_core::GatewayCall;

#[derive(Debug)]
pub enum BackendCommand {
    Gateway(GatewayCall),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Gateway(call) => call.name(),
        }
    }

    pub fn into_call(self) -> GatewayCall {
        match self {
            BackendCommand::Gateway(call) => call,
        }
    }
}

impl From<GatewayCall> for BackendCommand {
    fn from(call: GatewayCall) -> Self {
        BackendCommand::Gateway(call)
    }
}
