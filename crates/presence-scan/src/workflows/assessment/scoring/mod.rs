mod rules;

pub use rules::{ChoiceAdvice, ChoicePoints, RuleScoring, ScoringRule};

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerRecord, AnswerValue, Category, ChoiceId, Question, QuestionId, QuestionInput};
use super::questionnaire::{Questionnaire, QuestionnaireError};

/// Visible ceiling for the grand total.
pub const MAX_TOTAL_SCORE: i32 = 100;

/// Type and range failures detected before any points are awarded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("question '{0}' is not part of this questionnaire")]
    UnknownQuestion(QuestionId),
    #[error("question '{question}' expects a {expected} answer, received a {received} answer")]
    ShapeMismatch {
        question: QuestionId,
        expected: &'static str,
        received: &'static str,
    },
    #[error("'{choice}' is not a valid answer for question '{question}'")]
    UnknownChoice { question: QuestionId, choice: ChoiceId },
    #[error("answer {value} for question '{question}' is outside {min}..={max}")]
    OutOfRange {
        question: QuestionId,
        value: i32,
        min: i32,
        max: i32,
    },
    #[error("'{choice}' was selected more than once for question '{question}'")]
    DuplicateSelection { question: QuestionId, choice: ChoiceId },
}

impl AnswerError {
    /// Question the rejected answer belongs to.
    pub fn question(&self) -> &QuestionId {
        match self {
            AnswerError::UnknownQuestion(question)
            | AnswerError::ShapeMismatch { question, .. }
            | AnswerError::UnknownChoice { question, .. }
            | AnswerError::OutOfRange { question, .. }
            | AnswerError::DuplicateSelection { question, .. } => question,
        }
    }
}

/// Coarse maturity band derived from the clamped total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    MarketLeader,
    Growing,
    Invisible,
}

impl MaturityLevel {
    pub fn from_total(total: u8) -> Self {
        match total {
            80..=u8::MAX => MaturityLevel::MarketLeader,
            50..=79 => MaturityLevel::Growing,
            _ => MaturityLevel::Invisible,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            MaturityLevel::MarketLeader => "Market leader",
            MaturityLevel::Growing => "Growing",
            MaturityLevel::Invisible => "Invisible",
        }
    }
}

/// Engine output shared by the UI, the report, and the persistence row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub total: u8,
    pub raw_total: i32,
    pub category_scores: BTreeMap<Category, i32>,
    pub recommendations: Vec<String>,
    pub level: MaturityLevel,
}

impl ScoreResult {
    pub fn category_score(&self, category: Category) -> i32 {
        self.category_scores.get(&category).copied().unwrap_or(0)
    }
}

/// Stateless evaluator applying a questionnaire's rule table to answer records.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    questionnaire: Arc<Questionnaire>,
}

impl ScoringEngine {
    pub fn new(questionnaire: Questionnaire) -> Result<Self, QuestionnaireError> {
        Self::shared(Arc::new(questionnaire))
    }

    pub fn shared(questionnaire: Arc<Questionnaire>) -> Result<Self, QuestionnaireError> {
        questionnaire.validate()?;
        for mismatch in questionnaire.maxima_mismatches() {
            tracing::warn!(
                questionnaire = %questionnaire.slug,
                category = %mismatch.category,
                declared = mismatch.declared,
                attainable = mismatch.attainable,
                "declared category maximum differs from attainable rule points"
            );
        }
        Ok(Self { questionnaire })
    }

    pub fn questionnaire(&self) -> &Arc<Questionnaire> {
        &self.questionnaire
    }

    pub fn score(&self, answers: &AnswerRecord) -> Result<ScoreResult, AnswerError> {
        score(&self.questionnaire, answers)
    }
}

/// Score `answers` against the rule table of `questionnaire`.
///
/// Rules whose question was left unanswered are skipped. Recommendations keep
/// rule order and are never deduplicated; only the grand total is clamped.
pub fn score(
    questionnaire: &Questionnaire,
    answers: &AnswerRecord,
) -> Result<ScoreResult, AnswerError> {
    check_answers(questionnaire, answers)?;

    let mut category_scores: BTreeMap<Category, i32> = questionnaire
        .categories
        .iter()
        .map(|profile| (profile.category, 0))
        .collect();
    let mut recommendations = Vec::new();

    for rule in &questionnaire.rules {
        let (Some(question), Some(answer)) = (
            questionnaire.question(&rule.question),
            answers.get(&rule.question),
        ) else {
            continue;
        };

        let outcome = rule.apply(question, answer);
        let subtotal = category_scores.entry(rule.category).or_insert(0);
        *subtotal = subtotal.saturating_add(outcome.points);
        if let Some(text) = outcome.recommendation {
            recommendations.push(text.to_string());
        }
    }

    let raw_total = category_scores
        .values()
        .fold(0_i32, |acc, points| acc.saturating_add(*points));
    let total = u8::try_from(raw_total.clamp(0, MAX_TOTAL_SCORE)).unwrap_or(0);

    Ok(ScoreResult {
        total,
        raw_total,
        category_scores,
        recommendations,
        level: MaturityLevel::from_total(total),
    })
}

fn check_answers(questionnaire: &Questionnaire, answers: &AnswerRecord) -> Result<(), AnswerError> {
    for (id, answer) in answers.iter() {
        let question = questionnaire
            .question(id)
            .ok_or_else(|| AnswerError::UnknownQuestion(id.clone()))?;
        check_answer(question, answer)?;
    }
    Ok(())
}

fn check_answer(question: &Question, answer: &AnswerValue) -> Result<(), AnswerError> {
    let mismatch = || AnswerError::ShapeMismatch {
        question: question.id.clone(),
        expected: question.input.shape(),
        received: answer.shape(),
    };

    match (&question.input, answer) {
        (QuestionInput::SingleChoice { choices }, AnswerValue::Choice(chosen)) => {
            if choices.iter().any(|choice| &choice.id == chosen) {
                Ok(())
            } else {
                Err(AnswerError::UnknownChoice {
                    question: question.id.clone(),
                    choice: chosen.clone(),
                })
            }
        }
        (QuestionInput::Scale { min, max }, AnswerValue::Scale(value)) => {
            if (*min..=*max).contains(value) {
                Ok(())
            } else {
                Err(AnswerError::OutOfRange {
                    question: question.id.clone(),
                    value: *value,
                    min: *min,
                    max: *max,
                })
            }
        }
        (QuestionInput::MultiSelect { options }, AnswerValue::Selections(selected)) => {
            let mut seen = HashSet::new();
            for choice in selected {
                if !options.iter().any(|option| &option.id == choice) {
                    return Err(AnswerError::UnknownChoice {
                        question: question.id.clone(),
                        choice: choice.clone(),
                    });
                }
                if !seen.insert(choice) {
                    return Err(AnswerError::DuplicateSelection {
                        question: question.id.clone(),
                        choice: choice.clone(),
                    });
                }
            }
            Ok(())
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::questionnaire::CategoryProfile;
    use crate::workflows::assessment::domain::AnswerChoice;

    fn two_question_brand_audit() -> Questionnaire {
        Questionnaire {
            slug: "brand_pair".to_string(),
            title: "Brand pair".to_string(),
            categories: vec![CategoryProfile::new(Category::Brand, 20, 12)],
            questions: vec![
                Question {
                    id: QuestionId::new("identity"),
                    section: "Brand".to_string(),
                    prompt: "Is your visual identity defined?".to_string(),
                    input: QuestionInput::SingleChoice {
                        choices: vec![
                            AnswerChoice::new("manual", "Complete identity manual"),
                            AnswerChoice::new("logo_only", "Logo only"),
                            AnswerChoice::new("none", "Nothing defined"),
                        ],
                    },
                },
                Question {
                    id: QuestionId::new("clarity"),
                    section: "Brand".to_string(),
                    prompt: "Is your message clear in three seconds?".to_string(),
                    input: QuestionInput::SingleChoice {
                        choices: vec![
                            AnswerChoice::new("clear", "Clear in 3s"),
                            AnswerChoice::new("unclear", "Not really"),
                        ],
                    },
                },
            ],
            rules: vec![
                ScoringRule::choices(
                    "identity",
                    Category::Brand,
                    vec![ChoicePoints::new("manual", 10), ChoicePoints::new("logo_only", 5)],
                )
                .recommending("Brand: define official colors and typography."),
                ScoringRule::choices("clarity", Category::Brand, vec![ChoicePoints::new("clear", 10)])
                    .recommending("Brand: sharpen the headline message."),
            ],
        }
    }

    #[test]
    fn partial_identity_scores_fifteen_with_one_recommendation() {
        let questionnaire = two_question_brand_audit();
        let answers = AnswerRecord::new()
            .with_choice("identity", "logo_only")
            .with_choice("clarity", "clear");

        let result = score(&questionnaire, &answers).expect("answers are valid");

        assert_eq!(result.category_score(Category::Brand), 15);
        assert_eq!(result.total, 15);
        assert_eq!(
            result.recommendations,
            vec!["Brand: define official colors and typography.".to_string()]
        );
        assert_eq!(result.level, MaturityLevel::Invisible);
    }

    #[test]
    fn unlisted_choice_awards_zero_and_recommends() {
        let questionnaire = two_question_brand_audit();
        let answers = AnswerRecord::new().with_choice("clarity", "unclear");

        let result = score(&questionnaire, &answers).expect("answers are valid");

        assert_eq!(result.total, 0);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn unanswered_questions_are_skipped() {
        let questionnaire = two_question_brand_audit();

        let result = score(&questionnaire, &AnswerRecord::new()).expect("empty record is valid");

        assert_eq!(result.total, 0);
        assert!(result.recommendations.is_empty());
        assert_eq!(result.category_scores.get(&Category::Brand), Some(&0));
    }

    #[test]
    fn total_clamps_but_subtotals_do_not() {
        let mut questionnaire = two_question_brand_audit();
        questionnaire.rules.push(ScoringRule::choices(
            "clarity",
            Category::Brand,
            vec![ChoicePoints::new("clear", 95)],
        ));
        let answers = AnswerRecord::new()
            .with_choice("identity", "manual")
            .with_choice("clarity", "clear");

        let result = score(&questionnaire, &answers).expect("answers are valid");

        assert_eq!(result.category_score(Category::Brand), 115);
        assert_eq!(result.raw_total, 115);
        assert_eq!(result.total, 100);
        assert_eq!(result.level, MaturityLevel::MarketLeader);
    }

    #[test]
    fn negative_raw_total_clamps_to_zero() {
        let mut questionnaire = two_question_brand_audit();
        questionnaire.rules = vec![ScoringRule::choices(
            "clarity",
            Category::Brand,
            vec![ChoicePoints::new("clear", 0), ChoicePoints::new("unclear", -15)],
        )];
        let answers = AnswerRecord::new().with_choice("clarity", "unclear");

        let result = score(&questionnaire, &answers).expect("answers are valid");

        assert_eq!(result.raw_total, -15);
        assert_eq!(result.total, 0);
    }

    #[test]
    fn rejects_unknown_choice() {
        let questionnaire = two_question_brand_audit();
        let answers = AnswerRecord::new().with_choice("identity", "billboard");

        let err = score(&questionnaire, &answers).expect_err("unknown choice rejected");

        assert_eq!(
            err,
            AnswerError::UnknownChoice {
                question: QuestionId::new("identity"),
                choice: ChoiceId::new("billboard"),
            }
        );
    }

    #[test]
    fn rejects_shape_mismatch_and_unknown_question() {
        let questionnaire = two_question_brand_audit();

        let err = score(&questionnaire, &AnswerRecord::new().with_scale("identity", 3))
            .expect_err("scale answer for a choice question");
        assert!(matches!(err, AnswerError::ShapeMismatch { expected: "single choice", .. }));

        let err = score(&questionnaire, &AnswerRecord::new().with_choice("budget", "none"))
            .expect_err("unknown question");
        assert_eq!(err, AnswerError::UnknownQuestion(QuestionId::new("budget")));
    }

    #[test]
    fn maturity_bands_follow_thresholds() {
        assert_eq!(MaturityLevel::from_total(100), MaturityLevel::MarketLeader);
        assert_eq!(MaturityLevel::from_total(80), MaturityLevel::MarketLeader);
        assert_eq!(MaturityLevel::from_total(79), MaturityLevel::Growing);
        assert_eq!(MaturityLevel::from_total(50), MaturityLevel::Growing);
        assert_eq!(MaturityLevel::from_total(49), MaturityLevel::Invisible);
    }

    #[test]
    fn engine_refuses_weights_that_would_overflow() {
        let mut questionnaire = two_question_brand_audit();
        questionnaire.rules[0] = ScoringRule::choices(
            "identity",
            Category::Brand,
            vec![ChoicePoints::new("manual", i32::MAX)],
        );

        let err = ScoringEngine::new(questionnaire).expect_err("point value out of range");
        assert!(matches!(err, QuestionnaireError::PointsOutOfRange { .. }));
    }
}
