use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::MarketRecord;

/// Messages pushed to WebSocket clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Full market snapshot, keyed by symbol. Sent on connect and on every
    /// feed tick.
    MarketUpdate { data: BTreeMap<String, MarketRecord> },
}
