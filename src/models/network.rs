// Network connection models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub local_address: String,
    pub remote_address: String,
    pub status: String,
}

impl ConnectionRecord {
    /// Sentinel row returned when the OS refuses the connection table.
    pub fn access_denied() -> Self {
        Self {
            local_address: "Access Denied".into(),
            remote_address: String::new(),
            status: "run with elevated privileges to list connections".into(),
        }
    }
}
