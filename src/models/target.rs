// Monitored targets: container name plus health-check URL

use serde::{Deserialize, Serialize};

/// One monitored service. `name` is the Docker container name, `url` its health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub url: String,
}

impl Target {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// Targets used when the config file does not list any.
pub fn default_targets() -> Vec<Target> {
    vec![
        Target::new("node-nextjs-app", "http://localhost:3001"),
        Target::new("deno-nextjs-app", "http://localhost:3002"),
        Target::new("bun-nextjs-app", "http://localhost:3003"),
    ]
}
