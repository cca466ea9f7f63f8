//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::summary::AlignmentSummary;
use crate::Error;

/// Section tag for full ten-section summaries in `dashboard_summaries`
pub const FULL_SUMMARY_SECTION: &str = "full_summary";

/// Interview lifecycle: `completed` on submission, `reconciled` once synthesized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewStatus {
    Completed,
    Reconciled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Completed => "completed",
            InterviewStatus::Reconciled => "reconciled",
        }
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(InterviewStatus::Completed),
            "reconciled" => Ok(InterviewStatus::Reconciled),
            other => Err(Error::InvalidInput(format!("Unknown interview status: {}", other))),
        }
    }
}

/// How a contributor offers to sponsor the initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SponsorshipType {
    Investment,
    Work,
    Connections,
}

impl SponsorshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SponsorshipType::Investment => "investment",
            SponsorshipType::Work => "work",
            SponsorshipType::Connections => "connections",
        }
    }
}

/// Answer to the sponsorship choice question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sponsorship {
    pub willing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SponsorshipType>,
}

/// Answer to the leadership choice question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leadership {
    pub willing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how: Option<String>,
}

/// The nine interview answers, stored as one JSON column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewResponses {
    pub purpose: String,
    pub sponsorship: Sponsorship,
    pub resources: String,
    pub leadership: Leadership,
    pub deliverables: String,
    pub plan: String,
    pub change: String,
    pub investment: String,
    pub benefits: String,
}

/// One submitted interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub responses: InterviewResponses,
    pub status: InterviewStatus,
    pub completed_at: DateTime<Utc>,
}

/// Display identity for a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

/// Group with its cached latest summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub alignment_summary: Option<AlignmentSummary>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

/// Role of a user within a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Admin,
    Member,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }

    /// Parse a stored role; anything other than `admin` is an ordinary member
    pub fn from_stored(value: &str) -> Self {
        if value.eq_ignore_ascii_case("admin") {
            MemberRole::Admin
        } else {
            MemberRole::Member
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, MemberRole::Admin)
    }
}

/// One row of summary history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummaryRecord {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Option<Uuid>,
    pub section: String,
    pub summary_content: String,
    pub source_responses: String,
    pub generated_at: DateTime<Utc>,
}
