//! Hub configuration

use tokio::runtime::Handle;

/// Hub configuration options
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Name reported in the `hub` field of every log line
    pub name: String,

    /// Runtime that resumes deliveries waiting on a deferred or nested result.
    /// Falls back to the ambient runtime of the producer's thread.
    pub runtime: Option<Handle>,

    /// Thread name used when no tokio runtime is reachable
    ///
    /// One such thread is started per `next` call that leaves work pending,
    /// shared by every listener of that call.
    pub fallback_thread_name: String,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name: "hub".to_string(),
            runtime: None,
            fallback_thread_name: "hubcast-delivery".to_string(),
        }
    }
}

impl HubConfig {
    /// Create a config with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the hub name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Resume deliveries on the given runtime
    pub fn runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Set the fallback delivery thread name
    pub fn fallback_thread_name(mut self, name: impl Into<String>) -> Self {
        self.fallback_thread_name = name.into();
        self
    }

    /// Resolve the runtime for resumed deliveries
    pub(crate) fn resolve_runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }
}
