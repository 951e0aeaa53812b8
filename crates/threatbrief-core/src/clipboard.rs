//! Copyable excerpts of an assessment.
//!
//! These are verbatim pass-throughs of assessment fields; only the list
//! excerpts join their items.

use std::fmt;
use std::str::FromStr;

use crate::assessment::{ActionItem, Assessment};

/// A part of the assessment that can be copied on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Excerpt {
    CompanySummary,
    KeyInitiatives,
    ActionPlan,
    DiscoveryQuestions,
    PreMeetingBrief,
    ExecutiveSummary,
}

impl Excerpt {
    pub const ALL: [Excerpt; 6] = [
        Excerpt::CompanySummary,
        Excerpt::KeyInitiatives,
        Excerpt::ActionPlan,
        Excerpt::DiscoveryQuestions,
        Excerpt::PreMeetingBrief,
        Excerpt::ExecutiveSummary,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Excerpt::CompanySummary => "summary",
            Excerpt::KeyInitiatives => "initiatives",
            Excerpt::ActionPlan => "action-plan",
            Excerpt::DiscoveryQuestions => "questions",
            Excerpt::PreMeetingBrief => "brief",
            Excerpt::ExecutiveSummary => "executive-summary",
        }
    }

    /// Text to place on the clipboard.
    pub fn render(&self, assessment: &Assessment) -> String {
        match self {
            Excerpt::CompanySummary => assessment.company_profile.summary.clone(),
            Excerpt::KeyInitiatives => assessment.company_profile.key_initiatives.join("\n"),
            Excerpt::ActionPlan => assessment
                .action_plan
                .iter()
                .map(action_item_text)
                .collect::<Vec<_>>()
                .join("\n\n"),
            Excerpt::DiscoveryQuestions => assessment.discovery_questions.join("\n"),
            Excerpt::PreMeetingBrief => assessment.pre_meeting_brief.clone(),
            Excerpt::ExecutiveSummary => assessment.executive_summary.clone(),
        }
    }
}

/// Copy text for the action-plan item at 1-based `position`, in given order.
pub fn action_item(assessment: &Assessment, position: usize) -> Option<String> {
    position
        .checked_sub(1)
        .and_then(|idx| assessment.action_plan.get(idx))
        .map(action_item_text)
}

fn action_item_text(item: &ActionItem) -> String {
    format!(
        "Priority {}: {}\nTimeline: {}\nResources: {}\nOutcome: {}",
        item.priority, item.action, item.timeline, item.resources, item.expected_outcome
    )
}

impl fmt::Display for Excerpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Excerpt {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|e| e.name()).collect();
                format!("unknown excerpt '{}', expected one of: {}", s, names.join(", "))
            })
    }
}
