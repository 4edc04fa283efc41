//! Request/response state machine for one segmentation cycle.
//!
//! The controller never performs I/O on its own: `submit` hands out a
//! [`RequestTicket`] and the caller reports the outcome back through
//! [`RequestController::complete`]. Every ticket carries a sequence number,
//! so a completion that arrives after a newer selection or submit is dropped
//! instead of overwriting the newer state.

use shared::{
    domain::{find_image, ImageOption},
    protocol::SegmentationResult,
};
use tracing::{debug, info, warn};

use crate::{error::RequestError, SegmentationBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Loading,
    Succeeded(SegmentationResult),
    Failed(String),
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub image_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The caller must issue exactly one request for this ticket.
    Started(RequestTicket),
    /// Validation failed; the controller is now `Failed` and nothing is sent.
    Rejected,
    /// A request is already in flight; nothing changed.
    Busy,
}

#[derive(Debug)]
pub struct RequestController {
    selected: Option<&'static ImageOption>,
    state: RequestState,
    last_seq: u64,
    in_flight: Option<u64>,
}

impl Default for RequestController {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestController {
    pub fn new() -> Self {
        Self {
            selected: None,
            state: RequestState::Idle,
            last_seq: 0,
            in_flight: None,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn selected_image(&self) -> Option<&'static ImageOption> {
        self.selected
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading)
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_loading()
    }

    /// Sequence number of the request currently awaited, if any.
    pub fn in_flight_seq(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn result(&self) -> Option<&SegmentationResult> {
        match &self.state {
            RequestState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            RequestState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Selects an image and clears any result or error. A request still in
    /// flight is abandoned: its completion will be ignored.
    ///
    /// Selecting while `Loading` deliberately returns the controller to
    /// `Idle`, since the abandoned request can no longer complete it.
    pub fn select_image(&mut self, name: &str) -> Result<&'static ImageOption, RequestError> {
        let option =
            find_image(name).ok_or_else(|| RequestError::UnknownImage(name.to_string()))?;

        if let Some(seq) = self.in_flight.take() {
            info!(
                seq,
                image_name = option.name,
                "segmentation: selection superseded in-flight request"
            );
        }
        self.selected = Some(option);
        self.state = RequestState::Idle;
        Ok(option)
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        if self.is_loading() {
            debug!(seq = ?self.in_flight, "segmentation: submit ignored while loading");
            return SubmitOutcome::Busy;
        }

        let Some(option) = self.selected else {
            self.state = RequestState::Failed(RequestError::NoImageSelected.to_string());
            return SubmitOutcome::Rejected;
        };

        self.last_seq += 1;
        let seq = self.last_seq;
        self.in_flight = Some(seq);
        self.state = RequestState::Loading;
        info!(seq, image_name = option.name, "segmentation: request started");

        SubmitOutcome::Started(RequestTicket {
            seq,
            image_name: option.name.to_string(),
        })
    }

    /// Applies a successful response. Returns `false` if the ticket is stale.
    pub fn on_resolved(&mut self, seq: u64, result: SegmentationResult) -> bool {
        if !self.take_if_current(seq) {
            return false;
        }
        info!(
            seq,
            image_name = %result.image_name,
            nuclei_count = result.nuclei_count,
            "segmentation: request succeeded"
        );
        self.state = RequestState::Succeeded(result);
        true
    }

    /// Applies a failed response. Returns `false` if the ticket is stale.
    pub fn on_rejected(&mut self, seq: u64, error: RequestError) -> bool {
        if !self.take_if_current(seq) {
            return false;
        }
        warn!(seq, category = ?error.category(), "segmentation: request failed: {error}");
        self.state = RequestState::Failed(error.to_string());
        true
    }

    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<SegmentationResult, RequestError>,
    ) -> bool {
        match outcome {
            Ok(result) => self.on_resolved(seq, result),
            Err(error) => self.on_rejected(seq, error),
        }
    }

    /// Runs one full cycle against `backend`: submit, a single request, complete.
    pub async fn submit_with<B>(&mut self, backend: &B) -> &RequestState
    where
        B: SegmentationBackend + ?Sized,
    {
        if let SubmitOutcome::Started(ticket) = self.submit() {
            let outcome = backend.segment(&ticket.image_name).await;
            self.complete(ticket.seq, outcome);
        }
        &self.state
    }

    fn take_if_current(&mut self, seq: u64) -> bool {
        if self.in_flight != Some(seq) {
            debug!(seq, current = ?self.in_flight, "segmentation: dropping stale completion");
            return false;
        }
        self.in_flight = None;
        true
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
