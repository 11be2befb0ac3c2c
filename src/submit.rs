//! Submission pipeline
//!
//! validate → build → route → call → interpret, for one submission at a time.
//!
//! A `Submitter` tracks whether a request is in flight. A second submission
//! made while one is outstanding is rejected with
//! `CostctlError::SubmissionInProgress` and never reaches the optimizer. The
//! flag is released by a guard, so it clears on success, error, or a dropped
//! future alike.

use crate::client::OptimizerApi;
use crate::error::{CostctlError, Result};
use crate::interpret::{interpret, Interpreted};
use crate::model::{OptimizationRequest, SingleInstanceRequest};
use crate::provider::Provider;
use crate::validation::{build_fleet_request_with, FleetOptions};
use crate::workload::WorkloadForm;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

pub struct Submitter<A> {
    api: A,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<A: OptimizerApi> Submitter<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin(&self) -> Result<InFlightGuard<'_>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Rejected submission: another request is still in flight");
            return Err(CostctlError::SubmissionInProgress);
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    /// Validate the form and ask for fleet configurations.
    ///
    /// An incomplete form fails before any remote call.
    pub async fn submit_fleet(
        &self,
        provider: Provider,
        options: &FleetOptions,
        form: &WorkloadForm,
        limit: usize,
    ) -> Result<Interpreted> {
        let request = build_fleet_request_with(options, form.apps())?;
        self.dispatch(provider, OptimizationRequest::Fleet(request), limit)
            .await
    }

    /// Ask for single instances matching an already-built request.
    pub async fn submit_single(
        &self,
        provider: Provider,
        request: SingleInstanceRequest,
        limit: usize,
    ) -> Result<Interpreted> {
        self.dispatch(provider, OptimizationRequest::Single(request), limit)
            .await
    }

    async fn dispatch(
        &self,
        provider: Provider,
        request: OptimizationRequest,
        limit: usize,
    ) -> Result<Interpreted> {
        let _guard = self.begin()?;

        let submission_id = uuid::Uuid::new_v4();
        info!(%submission_id, "Submitting {:?} request to {}", request.operation(), provider);

        let results = self.api.optimize(provider, &request).await?;
        let interpreted = interpret(results, limit);
        if interpreted.is_no_matches() {
            info!(%submission_id, "No result satisfies the request");
        }
        Ok(interpreted)
    }
}
