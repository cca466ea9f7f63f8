//! Prompt builder
//!
//! Renders interview records, and optionally the previous summary, into a
//! single user prompt. Pure: no I/O, no clock.

use align_common::db::{InterviewRecord, InterviewResponses, Profile};
use align_common::summary::SECTIONS;
use align_common::AlignmentSummary;
use std::collections::HashMap;
use std::fmt::Write;
use uuid::Uuid;

/// Fixed system instruction for synthesis requests
pub const SYSTEM_INSTRUCTION: &str =
    "You are an expert at synthesizing group insights and creating actionable alignment summaries.";

/// Detail text for a "yes" choice answer with nothing written
const NO_DETAILS: &str = "No details";

/// Rendered prompt ready for the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub system: String,
    pub user: String,
}

/// Display name for the contributor at `position` (0-based)
///
/// Full name when present and not email-shaped, else the local part of the
/// email, else "Contributor N".
pub fn resolve_display_name(profile: Option<&Profile>, position: usize) -> String {
    let non_blank = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    if let Some(profile) = profile {
        if let Some(full_name) = non_blank(&profile.full_name).filter(|n| !n.contains('@')) {
            return full_name;
        }
        if let Some(email) = non_blank(&profile.email) {
            let local = email.split('@').next().unwrap_or_default();
            if !local.is_empty() {
                return local.to_string();
            }
        }
    }

    format!("Contributor {}", position + 1)
}

/// Build the synthesis prompt
pub fn build_prompt(
    interviews: &[InterviewRecord],
    profiles: &HashMap<Uuid, Profile>,
    previous: Option<&AlignmentSummary>,
) -> SummaryPrompt {
    let mut user = String::new();

    let _ = writeln!(
        user,
        "You are an expert facilitator synthesizing group alignment insights from {} contributors.",
        interviews.len()
    );
    user.push('\n');

    if let Some(previous) = previous {
        user.push_str(&render_previous(previous));
        user.push('\n');
        user.push_str(
            "Based on the previous analysis and following new interview responses, create an \
             updated unified alignment summary that captures the collective vision, commitments, \
             and action plan. Integrate the new insights with the previous analysis, maintaining \
             continuity while updating where new information changes the understanding.\n",
        );
    } else {
        user.push_str(
            "Based on the following interview responses, create a unified alignment summary that \
             captures the collective vision, commitments, and action plan.\n",
        );
    }
    user.push('\n');

    let blocks: Vec<String> = interviews
        .iter()
        .enumerate()
        .map(|(position, interview)| {
            let name = resolve_display_name(profiles.get(&interview.user_id), position);
            render_interview(&name, interview)
        })
        .collect();
    user.push_str(&blocks.join("\n"));
    user.push('\n');

    user.push_str("Please provide a structured summary with these sections:\n\n");
    for (index, section) in SECTIONS.iter().enumerate() {
        let _ = writeln!(user, "{}. {} - {}", index + 1, section.label, section.description);
    }
    user.push_str(
        "\nKeep each section concise (2-4 sentences) but comprehensive. Use collaborative \
         language that reflects the group's collective wisdom.",
    );

    SummaryPrompt { system: SYSTEM_INSTRUCTION.to_string(), user }
}

fn render_previous(previous: &AlignmentSummary) -> String {
    let mut block = String::from("Previous Analysis (for context and continuity):\n");
    for (section, text) in previous.sections() {
        let _ = writeln!(block, "- {}: {}", section.label, text);
    }
    block
}

fn render_interview(name: &str, interview: &InterviewRecord) -> String {
    let r: &InterviewResponses = &interview.responses;
    let mut block = String::new();

    let _ = writeln!(
        block,
        "Contributor {} (Completed: {}):",
        name,
        interview.completed_at.format("%-m/%-d/%Y")
    );
    let _ = writeln!(block, "- Purpose: {}", r.purpose);
    let _ = writeln!(
        block,
        "- Sponsorship: {}",
        render_choice(r.sponsorship.willing, r.sponsorship.how.as_deref())
    );
    let _ = writeln!(block, "- Resources: {}", r.resources);
    let _ = writeln!(
        block,
        "- Leadership: {}",
        render_choice(r.leadership.willing, r.leadership.how.as_deref())
    );
    let _ = writeln!(block, "- Deliverables: {}", r.deliverables);
    let _ = writeln!(block, "- Plan: {}", r.plan);
    let _ = writeln!(block, "- Change: {}", r.change);
    let _ = writeln!(block, "- Investment: {}", r.investment);
    let _ = writeln!(block, "- Benefits: {}", r.benefits);

    block
}

fn render_choice(willing: bool, how: Option<&str>) -> String {
    if !willing {
        return "No".to_string();
    }
    let detail = how.map(str::trim).filter(|h| !h.is_empty()).unwrap_or(NO_DETAILS);
    format!("Yes - {}", detail)
}
