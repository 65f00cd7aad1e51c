//! One-shot platform bootstrap against the trust store.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::errors::RegistryError;
use crate::lti::PlatformSpec;
use crate::provider::PlatformStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Registered,
    AlreadyRegistered,
}

/// Per-entry result of a bootstrap run, keyed by platform URL (or the raw
/// entry name when the URL is missing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub registered: Vec<String>,
    pub already_registered: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, String)>,
}

/// Registers the configured platforms, each exactly once.
///
/// Entries run strictly in order. A failing entry is logged and recorded; it
/// never stops the ones after it.
pub struct PlatformRegistry {
    store: Arc<dyn PlatformStore>,
}

impl PlatformRegistry {
    pub fn new(store: Arc<dyn PlatformStore>) -> Self {
        Self { store }
    }

    pub async fn bootstrap(&self, entries: &[PlatformSpec]) -> BootstrapReport {
        let mut report = BootstrapReport::default();

        if entries.is_empty() {
            info!("No platforms configured - relying on dynamic registration only");
            return report;
        }

        let mut seen: HashSet<String> = HashSet::new();
        for spec in entries {
            let key = entry_key(spec);

            if seen.contains(&key) {
                info!(name = %spec.name, url = %spec.url, "duplicate platform entry, already handled");
                report.already_registered.push(key);
                continue;
            }

            match self.register_one(spec).await {
                Ok(EntryOutcome::Registered) => {
                    info!(name = %spec.name, url = %spec.url, "Registered platform");
                    seen.insert(key.clone());
                    report.registered.push(key);
                }
                Ok(EntryOutcome::AlreadyRegistered) => {
                    info!(name = %spec.name, url = %spec.url, "Platform already registered");
                    seen.insert(key.clone());
                    report.already_registered.push(key);
                }
                Err(e @ RegistryError::IncompleteEntry { .. }) => {
                    warn!(name = %spec.name, url = %spec.url, "Skipping platform config: {e}");
                    report.skipped.push(key);
                }
                Err(e) => {
                    error!(name = %spec.name, url = %spec.url, error = %e, "Failed to register platform");
                    report.failed.push((key, e.to_string()));
                }
            }
        }

        info!(
            registered = report.registered.len(),
            already_registered = report.already_registered.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "platform bootstrap finished"
        );
        report
    }

    /// Query-then-register for a single entry. Not atomic against another
    /// writer registering the same URL in between.
    pub async fn register_one(&self, spec: &PlatformSpec) -> Result<EntryOutcome, RegistryError> {
        let missing = spec.missing_fields();
        if !missing.is_empty() {
            return Err(RegistryError::IncompleteEntry {
                missing: missing.join(", "),
            });
        }

        let registration = PlatformSpec {
            name: spec.name.trim().to_string(),
            url: spec.url.trim().to_string(),
            client_id: spec.client_id.trim().to_string(),
            ..spec.clone()
        }
        .to_registration();

        let wrap = |source| RegistryError::PlatformRegistration {
            url: registration.url.clone(),
            source,
        };

        if self.store.get_platform(&registration.url).await.map_err(wrap)?.is_some() {
            return Ok(EntryOutcome::AlreadyRegistered);
        }
        self.store.register_platform(&registration).await.map_err(wrap)?;
        Ok(EntryOutcome::Registered)
    }
}

fn entry_key(spec: &PlatformSpec) -> String {
    if spec.url.trim().is_empty() {
        spec.name.trim().to_string()
    } else {
        spec.url.trim().to_string()
    }
}
