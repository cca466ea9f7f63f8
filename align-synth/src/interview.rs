//! Interview question catalog and wizard draft
//!
//! The interview is nine questions answered one per step. The UI carries an
//! [`InterviewDraft`] between steps and converts it to
//! [`InterviewResponses`] on submission.

use align_common::db::{InterviewResponses, Leadership, Sponsorship, SponsorshipType};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a question is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free text
    Text,
    /// Yes/no with an optional "how" detail
    Choice,
}

/// One interview question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub key: &'static str,
    pub question: &'static str,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(rename = "subQuestion", skip_serializing_if = "Option::is_none")]
    pub sub_question: Option<&'static str>,
    #[serde(skip_serializing_if = "no_choices")]
    pub choices: &'static [&'static str],
}

fn no_choices(choices: &&'static [&'static str]) -> bool {
    choices.is_empty()
}

/// The nine questions in wizard order
pub static QUESTIONS: [Question; 9] = [
    Question {
        key: "purpose",
        question: "Why do you want to create this initiative?",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
    Question {
        key: "sponsorship",
        question: "Are you open to sponsoring this initiative?",
        kind: QuestionKind::Choice,
        sub_question: Some("If yes, how would you like to sponsor?"),
        choices: &["investment", "work", "connections"],
    },
    Question {
        key: "resources",
        question: "Are there resources you have or are aware of that fit with this initiative that you're open to sharing?",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
    Question {
        key: "leadership",
        question: "Are you open to guiding the initiative in a leadership capacity?",
        kind: QuestionKind::Choice,
        sub_question: Some("If yes, how would you like to guide?"),
        choices: &[],
    },
    Question {
        key: "deliverables",
        question: "What are the important deliverables/assets that are important to this initiative in your mind?",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
    Question {
        key: "plan",
        question: "Sketch a rough draft plan for what/how to complete this initiative.",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
    Question {
        key: "change",
        question: "What processes will help adapt to changes/challenges when they come up?",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
    Question {
        key: "investment",
        question: "What investments outside of what you mentioned here will we need?",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
    Question {
        key: "benefits",
        question: "What value or benefits will investors get because of this initiative?",
        kind: QuestionKind::Text,
        sub_question: None,
        choices: &[],
    },
];

/// Question for a 1-based wizard step
pub fn question_for_step(step: usize) -> Option<&'static Question> {
    step.checked_sub(1).and_then(|index| QUESTIONS.get(index))
}

/// Answer to a single question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice {
        willing: bool,
        #[serde(default)]
        how: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<SponsorshipType>,
    },
    Text(String),
}

/// Draft validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Step {0} is out of range (1-9)")]
    StepOutOfRange(usize),

    #[error("Question '{key}' expects a {expected:?} answer")]
    WrongAnswerKind { key: &'static str, expected: QuestionKind },

    #[error("Question '{0}' does not take a sponsorship type")]
    UnexpectedChoiceType(&'static str),

    #[error("Interview incomplete, missing: {}", .0.join(", "))]
    Incomplete(Vec<&'static str>),

    #[error("Question '{0}' has no text answer slot")]
    UnknownTextQuestion(&'static str),
}

/// Partially answered interview carried between wizard steps
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDraft {
    pub purpose: Option<String>,
    pub sponsorship: Option<Sponsorship>,
    pub resources: Option<String>,
    pub leadership: Option<Leadership>,
    pub deliverables: Option<String>,
    pub plan: Option<String>,
    pub change: Option<String>,
    pub investment: Option<String>,
    pub benefits: Option<String>,
}

impl InterviewDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the answer for a 1-based step and return the updated draft
    pub fn apply(mut self, step: usize, answer: Answer) -> Result<Self, DraftError> {
        let question = question_for_step(step).ok_or(DraftError::StepOutOfRange(step))?;

        match (question.kind, answer) {
            (QuestionKind::Text, Answer::Text(text)) => {
                let slot = self
                    .text_slot(question.key)
                    .ok_or(DraftError::UnknownTextQuestion(question.key))?;
                *slot = Some(text);
            }
            (QuestionKind::Choice, Answer::Choice { willing, how, kind }) => {
                if question.key == "sponsorship" {
                    self.sponsorship = Some(Sponsorship { willing, how, kind });
                } else {
                    if kind.is_some() {
                        return Err(DraftError::UnexpectedChoiceType(question.key));
                    }
                    self.leadership = Some(Leadership { willing, how });
                }
            }
            (expected, _) => {
                return Err(DraftError::WrongAnswerKind { key: question.key, expected });
            }
        }

        Ok(self)
    }

    /// Keys of unanswered questions, in wizard order
    pub fn missing(&self) -> Vec<&'static str> {
        let answered = [
            self.purpose.is_some(),
            self.sponsorship.is_some(),
            self.resources.is_some(),
            self.leadership.is_some(),
            self.deliverables.is_some(),
            self.plan.is_some(),
            self.change.is_some(),
            self.investment.is_some(),
            self.benefits.is_some(),
        ];
        QUESTIONS
            .iter()
            .zip(answered)
            .filter(|(_, done)| !done)
            .map(|(q, _)| q.key)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Convert a complete draft into stored responses
    pub fn into_responses(self) -> Result<InterviewResponses, DraftError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(DraftError::Incomplete(missing));
        }

        Ok(InterviewResponses {
            purpose: self.purpose.unwrap_or_default(),
            sponsorship: self.sponsorship.unwrap_or_default(),
            resources: self.resources.unwrap_or_default(),
            leadership: self.leadership.unwrap_or_default(),
            deliverables: self.deliverables.unwrap_or_default(),
            plan: self.plan.unwrap_or_default(),
            change: self.change.unwrap_or_default(),
            investment: self.investment.unwrap_or_default(),
            benefits: self.benefits.unwrap_or_default(),
        })
    }

    fn text_slot(&mut self, key: &str) -> Option<&mut Option<String>> {
        match key {
            "purpose" => Some(&mut self.purpose),
            "resources" => Some(&mut self.resources),
            "deliverables" => Some(&mut self.deliverables),
            "plan" => Some(&mut self.plan),
            "change" => Some(&mut self.change),
            "investment" => Some(&mut self.investment),
            "benefits" => Some(&mut self.benefits),
            _ => None,
        }
    }
}
