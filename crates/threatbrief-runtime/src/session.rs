//! Per-user session state.
//!
//! The session owns the current assessment, the simulation toggles, and the
//! attachment list. The current assessment has a single writer, a completed
//! analysis, and is published as an `Arc` that readers never mutate.
//!
//! Every analysis takes a [`RequestTicket`] carrying a sequence number. A
//! result is published only if its ticket is newer than the one behind the
//! current assessment, so a slow earlier request cannot overwrite the result
//! of a later one.

use chrono::NaiveDate;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use threatbrief_core::{
    action_item, report_filename, serialize_report, simulate, Assessment, Attachment,
    AttachmentError, AttachmentList, Excerpt, OrganizationProfile, SecurityControl,
    SimulationOutcome, SimulationToggleSet,
};

use crate::orchestrator::{AnalysisError, AnalysisOrchestrator};

/// An assessment together with the profile it was produced for.
#[derive(Debug, Clone)]
pub struct PublishedAssessment {
    /// Sequence number of the request that produced it
    pub seq: u64,
    pub profile: Arc<OrganizationProfile>,
    pub assessment: Arc<Assessment>,
}

/// What happened to a completed analysis.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Published as the current assessment
    Ready(Arc<Assessment>),
    /// Valid, but a later request had already published; discarded
    Superseded,
}

/// Marks one analysis request. Dropping it ends the request.
#[derive(Debug)]
pub struct RequestTicket<'a> {
    seq: u64,
    in_flight: &'a AtomicUsize,
}

impl RequestTicket<'_> {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for RequestTicket<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Default)]
struct SessionState {
    current: Option<PublishedAssessment>,
    toggles: SimulationToggleSet,
    attachments: AttachmentList,
}

/// State for one viewing session.
#[derive(Debug, Default)]
pub struct Session {
    state: RwLock<SessionState>,
    last_seq: AtomicU64,
    in_flight: AtomicUsize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, taking the next sequence number.
    pub fn begin_request(&self) -> RequestTicket<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let seq = self.last_seq.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!(request_seq = seq, "analysis request started");
        RequestTicket {
            seq,
            in_flight: &self.in_flight,
        }
    }

    /// Publish a validated assessment for `ticket`.
    ///
    /// Returns `None`, leaving the current assessment in place, when an
    /// assessment from the same or a later request is already published.
    pub fn publish(
        &self,
        ticket: &RequestTicket<'_>,
        profile: OrganizationProfile,
        assessment: Assessment,
    ) -> Option<Arc<Assessment>> {
        let mut state = self.state.write();
        if let Some(current) = &state.current {
            if current.seq >= ticket.seq {
                tracing::info!(
                    request_seq = ticket.seq,
                    published_seq = current.seq,
                    "discarding stale analysis result"
                );
                return None;
            }
        }

        let assessment = Arc::new(assessment);
        state.current = Some(PublishedAssessment {
            seq: ticket.seq,
            profile: Arc::new(profile),
            assessment: Arc::clone(&assessment),
        });
        tracing::debug!(request_seq = ticket.seq, "assessment published");
        Some(assessment)
    }

    /// Run one analysis and publish the result if it is still current.
    ///
    /// On any error the previously published assessment stays available.
    pub async fn analyze(
        &self,
        orchestrator: &AnalysisOrchestrator,
        profile: OrganizationProfile,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        let ticket = self.begin_request();
        let assessment = orchestrator.run_analysis(&profile).await?;

        Ok(match self.publish(&ticket, profile, assessment) {
            Some(published) => AnalysisOutcome::Ready(published),
            None => AnalysisOutcome::Superseded,
        })
    }

    /// An analysis is outstanding; callers should not start another.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    pub fn current(&self) -> Option<PublishedAssessment> {
        self.state.read().current.clone()
    }

    pub fn assessment(&self) -> Option<Arc<Assessment>> {
        self.state
            .read()
            .current
            .as_ref()
            .map(|c| Arc::clone(&c.assessment))
    }

    /// Flip one control, returning its new state.
    pub fn toggle(&self, control: SecurityControl) -> bool {
        self.state.write().toggles.toggle(control)
    }

    pub fn set_control(&self, control: SecurityControl, enabled: bool) {
        self.state.write().toggles.set(control, enabled);
    }

    pub fn toggles(&self) -> SimulationToggleSet {
        self.state.read().toggles
    }

    /// Simulate the current toggles against the current assessment.
    pub fn simulate(&self) -> Option<SimulationOutcome> {
        let state = self.state.read();
        state
            .current
            .as_ref()
            .map(|c| simulate(c.assessment.overall_risk_score, &state.toggles))
    }

    /// Attach a file by path; only its name is kept.
    pub fn add_attachment(&self, file: impl AsRef<Path>) -> Result<String, AttachmentError> {
        let mut state = self.state.write();
        let attachment = state.attachments.add(file)?;
        Ok(attachment.name.clone())
    }

    pub fn remove_attachment(&self, index: usize) -> Result<Attachment, AttachmentError> {
        self.state.write().attachments.remove(index)
    }

    pub fn attachment_names(&self) -> Vec<String> {
        self.state
            .read()
            .attachments
            .names()
            .map(str::to_string)
            .collect()
    }

    /// Report file name and text for the current assessment.
    pub fn report(&self, generated_on: NaiveDate) -> Option<(String, String)> {
        let current = self.current()?;
        Some((
            report_filename(&current.profile),
            serialize_report(&current.profile, &current.assessment, generated_on),
        ))
    }

    pub fn excerpt(&self, excerpt: Excerpt) -> Option<String> {
        self.assessment().map(|a| excerpt.render(&a))
    }

    pub fn action_item_excerpt(&self, position: usize) -> Option<String> {
        self.assessment().and_then(|a| action_item(&a, position))
    }
}
