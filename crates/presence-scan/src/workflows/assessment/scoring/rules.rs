use serde::{Deserialize, Serialize};

use super::super::domain::{AnswerValue, Category, ChoiceId, Question, QuestionId, QuestionInput};

/// Declarative mapping from one question's answer to points, category, and advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRule {
    pub question: QuestionId,
    pub category: Category,
    pub scoring: RuleScoring,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl ScoringRule {
    pub fn choices(question: &str, category: Category, points: Vec<ChoicePoints>) -> Self {
        Self {
            question: QuestionId::new(question),
            category,
            scoring: RuleScoring::Choices { points },
            recommendation: None,
        }
    }

    pub fn scale(
        question: &str,
        category: Category,
        points_per_unit: i32,
        recommend_below: i32,
    ) -> Self {
        Self {
            question: QuestionId::new(question),
            category,
            scoring: RuleScoring::Scale {
                points_per_unit,
                recommend_below,
            },
            recommendation: None,
        }
    }

    pub fn tally(
        question: &str,
        category: Category,
        points_per_selection: i32,
        cap: i32,
        recommend_below: usize,
    ) -> Self {
        Self {
            question: QuestionId::new(question),
            category,
            scoring: RuleScoring::Tally {
                points_per_selection,
                cap,
                recommend_below,
            },
            recommendation: None,
        }
    }

    pub fn recommending(mut self, text: &str) -> Self {
        self.recommendation = Some(text.to_string());
        self
    }

    /// Highest number of points this rule can award for the given question.
    pub fn max_points(&self, question: &Question) -> i32 {
        match (&self.scoring, &question.input) {
            (RuleScoring::Choices { points }, input) => {
                let listed = points.iter().map(|entry| entry.points).max();
                let has_unlisted = input
                    .choices()
                    .iter()
                    .any(|choice| !points.iter().any(|entry| entry.choice == choice.id));
                match (listed, has_unlisted) {
                    (Some(best), true) => best.max(0),
                    (Some(best), false) => best,
                    (None, _) => 0,
                }
            }
            (
                RuleScoring::Scale {
                    points_per_unit, ..
                },
                QuestionInput::Scale { min, max },
            ) => points_per_unit
                .saturating_mul(*max)
                .max(points_per_unit.saturating_mul(*min)),
            (
                RuleScoring::Tally {
                    points_per_selection,
                    cap,
                    ..
                },
                input,
            ) => {
                let count = i32::try_from(input.choices().len()).unwrap_or(i32::MAX);
                tally_points(count, *points_per_selection, *cap).max(0)
            }
            (RuleScoring::Scale { .. }, _) => 0,
        }
    }

    /// Apply the rule to an answer already checked against the question's input shape.
    pub(crate) fn apply<'a>(&'a self, question: &Question, answer: &AnswerValue) -> RuleOutcome<'a> {
        match (&self.scoring, answer) {
            (RuleScoring::Choices { points }, AnswerValue::Choice(chosen)) => {
                let entry = points.iter().find(|entry| &entry.choice == chosen);
                let awarded = entry.map(|entry| entry.points).unwrap_or(0);
                let recommendation = if awarded >= self.max_points(question) {
                    None
                } else {
                    match entry.map(|entry| &entry.advice) {
                        Some(ChoiceAdvice::Custom(text)) => Some(text.as_str()),
                        Some(ChoiceAdvice::Silent) => None,
                        Some(ChoiceAdvice::Inherit) | None => self.recommendation.as_deref(),
                    }
                };
                RuleOutcome {
                    points: awarded,
                    recommendation,
                }
            }
            (
                RuleScoring::Scale {
                    points_per_unit,
                    recommend_below,
                },
                AnswerValue::Scale(value),
            ) => RuleOutcome {
                points: points_per_unit.saturating_mul(*value),
                recommendation: if value < recommend_below {
                    self.recommendation.as_deref()
                } else {
                    None
                },
            },
            (
                RuleScoring::Tally {
                    points_per_selection,
                    cap,
                    recommend_below,
                },
                AnswerValue::Selections(selected),
            ) => {
                let count = i32::try_from(selected.len()).unwrap_or(i32::MAX);
                RuleOutcome {
                    points: tally_points(count, *points_per_selection, *cap),
                    recommendation: if selected.len() < *recommend_below {
                        self.recommendation.as_deref()
                    } else {
                        None
                    },
                }
            }
            _ => RuleOutcome {
                points: 0,
                recommendation: None,
            },
        }
    }

    pub(crate) fn fits(&self, input: &QuestionInput) -> bool {
        matches!(
            (&self.scoring, input),
            (RuleScoring::Choices { .. }, QuestionInput::SingleChoice { .. })
                | (RuleScoring::Scale { .. }, QuestionInput::Scale { .. })
                | (RuleScoring::Tally { .. }, QuestionInput::MultiSelect { .. })
        )
    }
}

fn tally_points(count: i32, points_per_selection: i32, cap: i32) -> i32 {
    count.saturating_mul(points_per_selection).min(cap)
}

/// How a rule converts an answer into points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum RuleScoring {
    /// Explicit points per choice; unlisted choices award nothing.
    Choices { points: Vec<ChoicePoints> },
    /// Chosen value multiplied by `points_per_unit`.
    Scale {
        points_per_unit: i32,
        recommend_below: i32,
    },
    /// Selection count multiplied by `points_per_selection`, capped.
    Tally {
        points_per_selection: i32,
        cap: i32,
        recommend_below: usize,
    },
}

impl RuleScoring {
    pub fn form(&self) -> &'static str {
        match self {
            RuleScoring::Choices { .. } => "choices",
            RuleScoring::Scale { .. } => "scale",
            RuleScoring::Tally { .. } => "tally",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicePoints {
    pub choice: ChoiceId,
    pub points: i32,
    #[serde(default)]
    pub advice: ChoiceAdvice,
}

impl ChoicePoints {
    pub fn new(choice: &str, points: i32) -> Self {
        Self {
            choice: ChoiceId::new(choice),
            points,
            advice: ChoiceAdvice::Inherit,
        }
    }

    pub fn advising(mut self, text: &str) -> Self {
        self.advice = ChoiceAdvice::Custom(text.to_string());
        self
    }

    pub fn silent(mut self) -> Self {
        self.advice = ChoiceAdvice::Silent;
        self
    }
}

/// Advice emitted when a non-maximal choice is picked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceAdvice {
    /// Use the rule's recommendation.
    #[default]
    Inherit,
    Custom(String),
    Silent,
}

pub(crate) struct RuleOutcome<'a> {
    pub points: i32,
    pub recommendation: Option<&'a str>,
}
