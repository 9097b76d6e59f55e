use crate::models::{Settings, Task};

/// Which persisted entry a successful mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Tasks,
    Clients,
    Settings,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct StatePayload {
    pub tasks: Vec<Task>,
    pub clients: Vec<String>,
    pub settings: Settings,
}
