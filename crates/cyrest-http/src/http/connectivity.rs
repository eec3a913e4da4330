//! Decides once whether the command service is reached directly, through the
//! relay, or not at all.

use async_trait::async_trait;
use log::{info, warn};
use parking_lot::Mutex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityMode {
    #[default]
    Unknown,
    Direct,
    Relayed,
    Unreachable,
}

impl fmt::Display for ConnectivityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectivityMode::Unknown => "unknown",
            ConnectivityMode::Direct => "direct",
            ConnectivityMode::Relayed => "relayed",
            ConnectivityMode::Unreachable => "unreachable",
        };
        f.write_str(name)
    }
}

/// Reports whether this process runs inside an interactive session (a
/// notebook kernel, say) that may be network-isolated from the service.
pub trait EnvironmentProbe: Send + Sync {
    fn is_interactive(&self) -> bool;
}

/// An [`EnvironmentProbe`] with a fixed answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedEnvironment(pub bool);

impl EnvironmentProbe for FixedEnvironment {
    fn is_interactive(&self) -> bool {
        self.0
    }
}

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn direct_reachable(&self) -> bool;
    async fn relay_reachable(&self) -> bool;
}

/// Memoized connectivity mode.
///
/// `resolve` probes only while the mode is `Unknown`. `Unreachable` is sticky
/// like the other outcomes; only `reset` (or `force`) changes it. Concurrent
/// callers share one probe: the first resolves, the rest wait for its answer.
#[derive(Debug, Default)]
pub struct Connectivity {
    mode: Mutex<ConnectivityMode>,
    resolving: tokio::sync::Mutex<()>,
}

impl Connectivity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ConnectivityMode {
        *self.mode.lock()
    }

    pub fn reset(&self) {
        *self.mode.lock() = ConnectivityMode::Unknown;
    }

    pub fn force(&self, mode: ConnectivityMode) {
        *self.mode.lock() = mode;
    }

    pub async fn resolve(
        &self,
        environment: &dyn EnvironmentProbe,
        probe: &dyn ReachabilityProbe,
    ) -> ConnectivityMode {
        let current = self.mode();
        if current != ConnectivityMode::Unknown {
            return current;
        }

        let _resolving = self.resolving.lock().await;
        let current = self.mode();
        if current != ConnectivityMode::Unknown {
            return current;
        }

        let resolved = if !environment.is_interactive() {
            ConnectivityMode::Direct
        } else if probe.direct_reachable().await {
            ConnectivityMode::Direct
        } else if probe.relay_reachable().await {
            ConnectivityMode::Relayed
        } else {
            warn!("command service is reachable neither directly nor through the relay");
            ConnectivityMode::Unreachable
        };

        info!("connectivity resolved: {resolved}");
        self.force(resolved);
        resolved
    }
}
