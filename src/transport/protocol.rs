use serde::{Deserialize, Serialize};

/// Outbound command sent to the simulation server over the WebSocket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data")]
pub enum ClientCommand {
    /// Start a new simulation run
    #[serde(rename = "start")]
    Start(StartData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartData {
    #[serde(rename = "customerCount")]
    pub customer_count: u32,
}

impl ClientCommand {
    pub fn start(customer_count: u32) -> Self {
        ClientCommand::Start(StartData { customer_count })
    }

    /// Command name, for logging
    pub fn action(&self) -> &'static str {
        match self {
            ClientCommand::Start(_) => "start",
        }
    }
}
