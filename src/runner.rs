/// Sequential orchestration of the diagnostic probes
///
/// The runner owns the transport and the ordered probe list. Probes run one
/// at a time in a fixed order because the later checks are meant to observe
/// state the earlier ones may have touched (a freshly validated license
/// shows up in the usage check); a failure never short-circuits the rest of
/// the run.

use std::sync::Arc;

use tracing::{info, warn};

use crate::client::{ApiClient, ApiTransport};
use crate::config::DiagnosticConfig;
use crate::error::DiagError;
use crate::probes::{
    CheckUsageProbe, FreeTrialGenerateMetaProbe, Probe, SubscriberGenerateMetaProbe,
    ValidateLicenseProbe,
};
use crate::types::TestResult;

/// Runs the fixed probe sequence against one service origin.
pub struct DiagnosticRunner {
    transport: Arc<dyn ApiTransport>,
    probes: Vec<Box<dyn Probe>>,
}

impl DiagnosticRunner {
    /// Creates a runner with the production reqwest transport.
    pub fn new(config: &DiagnosticConfig) -> Result<Self, DiagError> {
        let client = ApiClient::new(&config.base_url, config.timeout_secs)?;
        Ok(Self::with_transport(config, Arc::new(client)))
    }

    /// Creates a runner over an arbitrary transport. Probe construction is
    /// the single place the run order is defined.
    pub fn with_transport(config: &DiagnosticConfig, transport: Arc<dyn ApiTransport>) -> Self {
        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(ValidateLicenseProbe::new(&config.license_key, &config.site_url)),
            Box::new(CheckUsageProbe::new(
                &config.license_key,
                &config.site_url,
                &config.product_slug,
            )),
            Box::new(SubscriberGenerateMetaProbe::new(
                &config.license_key,
                &config.site_url,
                &config.product_slug,
            )),
            Box::new(FreeTrialGenerateMetaProbe::new(
                &config.site_url,
                &config.product_slug,
            )),
        ];

        Self { transport, probes }
    }

    /// Executes every probe in order and returns one result per probe.
    ///
    /// Always yields exactly as many records as there are probes, in probe
    /// order, regardless of individual outcomes.
    pub async fn run_all(&self) -> Vec<TestResult> {
        let mut results = Vec::with_capacity(self.probes.len());

        for probe in &self.probes {
            info!("Running {}", probe.name());
            let result = probe.run(self.transport.as_ref()).await;

            if result.passed {
                info!("{}: passed", probe.name());
            } else {
                warn!("{}: failed", probe.name());
            }

            results.push(result);
        }

        results
    }

    /// Number of probes in the sequence.
    pub fn probe_count(&self) -> usize {
        self.probes.len()
    }
}
