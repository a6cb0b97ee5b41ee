mod catalog;

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::{Category, ChoiceId, Question, QuestionId, QuestionInput};
use super::scoring::{RuleScoring, ScoringRule};

/// Largest magnitude accepted for any point value or category maximum.
pub const POINT_LIMIT: i32 = 10_000;

/// Declared maximum and reference value for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryProfile {
    pub category: Category,
    pub max_points: i32,
    pub benchmark: i32,
}

impl CategoryProfile {
    pub const fn new(category: Category, max_points: i32, benchmark: i32) -> Self {
        Self {
            category,
            max_points,
            benchmark,
        }
    }
}

/// A questionnaire variant: the form's questions plus the rule table that scores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub slug: String,
    pub title: String,
    pub categories: Vec<CategoryProfile>,
    pub questions: Vec<Question>,
    pub rules: Vec<ScoringRule>,
}

/// Declared category maximum that does not match what the rules can award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaximaMismatch {
    pub category: Category,
    pub declared: i32,
    pub attainable: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("unknown built-in questionnaire '{0}'")]
    UnknownBuiltin(String),
    #[error("failed to read questionnaire file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid questionnaire definition: {0}")]
    Json(#[from] serde_json::Error),
    #[error("question '{0}' is declared more than once")]
    DuplicateQuestion(QuestionId),
    #[error("question '{question}' declares choice '{choice}' more than once")]
    DuplicateChoice { question: QuestionId, choice: ChoiceId },
    #[error("question '{0}' offers no choices")]
    EmptyChoices(QuestionId),
    #[error("question '{question}' has an empty scale range {min}..={max}")]
    InvalidRange {
        question: QuestionId,
        min: i32,
        max: i32,
    },
    #[error("rule references unknown question '{0}'")]
    RuleForUnknownQuestion(QuestionId),
    #[error("rule for question '{question}' references unknown choice '{choice}'")]
    RuleForUnknownChoice { question: QuestionId, choice: ChoiceId },
    #[error("{form} rule cannot score {shape} question '{question}'")]
    IncompatibleRule {
        question: QuestionId,
        form: &'static str,
        shape: &'static str,
    },
    #[error("category {category} declares {field} {value} exceeding magnitude {POINT_LIMIT}")]
    CategoryOutOfRange {
        category: Category,
        field: &'static str,
        value: i32,
    },
    #[error("rule for question '{question}' uses {field} {value} exceeding magnitude {POINT_LIMIT}")]
    PointsOutOfRange {
        question: QuestionId,
        field: &'static str,
        value: i32,
    },
    #[error("rule for question '{question}' uses undeclared category {category}")]
    UndeclaredCategory {
        question: QuestionId,
        category: Category,
    },
}

impl Questionnaire {
    /// Look up one of the questionnaires shipped with the crate.
    pub fn builtin(slug: &str) -> Result<Self, QuestionnaireError> {
        match slug.trim() {
            catalog::BRAND_SCANNER_360 => Ok(catalog::brand_scanner_360()),
            catalog::DIGITAL_MATURITY => Ok(catalog::digital_maturity()),
            other => Err(QuestionnaireError::UnknownBuiltin(other.to_string())),
        }
    }

    pub fn brand_scanner_360() -> Self {
        catalog::brand_scanner_360()
    }

    pub fn digital_maturity() -> Self {
        catalog::digital_maturity()
    }

    pub fn builtin_slugs() -> [&'static str; 2] {
        [catalog::BRAND_SCANNER_360, catalog::DIGITAL_MATURITY]
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, QuestionnaireError> {
        let questionnaire: Self = serde_json::from_reader(reader)?;
        questionnaire.validate()?;
        Ok(questionnaire)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, QuestionnaireError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Resolve either a built-in slug or a path to a JSON definition.
    pub fn resolve(source: &str) -> Result<Self, QuestionnaireError> {
        if Self::builtin_slugs().contains(&source.trim()) {
            Self::builtin(source)
        } else {
            Self::from_path(source.trim())
        }
    }

    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| &question.id == id)
    }

    pub fn category_order(&self) -> Vec<Category> {
        self.categories.iter().map(|profile| profile.category).collect()
    }

    pub fn profile(&self, category: Category) -> Option<&CategoryProfile> {
        self.categories
            .iter()
            .find(|profile| profile.category == category)
    }

    /// Points each category can reach when every rule's best answer is chosen.
    pub fn attainable_maxima(&self) -> BTreeMap<Category, i32> {
        let mut maxima: BTreeMap<Category, i32> = self
            .categories
            .iter()
            .map(|profile| (profile.category, 0))
            .collect();
        for rule in &self.rules {
            if let Some(question) = self.question(&rule.question) {
                let subtotal = maxima.entry(rule.category).or_insert(0);
                *subtotal = subtotal.saturating_add(rule.max_points(question));
            }
        }
        maxima
    }

    pub fn raw_maximum(&self) -> i32 {
        self.attainable_maxima()
            .values()
            .fold(0_i32, |acc, points| acc.saturating_add(*points))
    }

    pub fn maxima_mismatches(&self) -> Vec<MaximaMismatch> {
        let attainable = self.attainable_maxima();
        self.categories
            .iter()
            .filter_map(|profile| {
                let reachable = attainable.get(&profile.category).copied().unwrap_or(0);
                (reachable != profile.max_points).then_some(MaximaMismatch {
                    category: profile.category,
                    declared: profile.max_points,
                    attainable: reachable,
                })
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), QuestionnaireError> {
        let mut question_ids = HashSet::new();
        for question in &self.questions {
            if !question_ids.insert(&question.id) {
                return Err(QuestionnaireError::DuplicateQuestion(question.id.clone()));
            }
            validate_input(question)?;
        }

        for profile in &self.categories {
            for (field, value) in [
                ("max_points", profile.max_points),
                ("benchmark", profile.benchmark),
            ] {
                if !within_limit(value) {
                    return Err(QuestionnaireError::CategoryOutOfRange {
                        category: profile.category,
                        field,
                        value,
                    });
                }
            }
        }

        let declared: HashSet<Category> = self
            .categories
            .iter()
            .map(|profile| profile.category)
            .collect();

        for rule in &self.rules {
            let question = self
                .question(&rule.question)
                .ok_or_else(|| QuestionnaireError::RuleForUnknownQuestion(rule.question.clone()))?;

            if !rule.fits(&question.input) {
                return Err(QuestionnaireError::IncompatibleRule {
                    question: question.id.clone(),
                    form: rule.scoring.form(),
                    shape: question.input.shape(),
                });
            }

            if !declared.contains(&rule.category) {
                return Err(QuestionnaireError::UndeclaredCategory {
                    question: question.id.clone(),
                    category: rule.category,
                });
            }

            if let Some((field, value)) = point_values(&rule.scoring)
                .into_iter()
                .find(|(_, value)| !within_limit(*value))
            {
                return Err(QuestionnaireError::PointsOutOfRange {
                    question: question.id.clone(),
                    field,
                    value,
                });
            }

            if let RuleScoring::Choices { points } = &rule.scoring {
                for entry in points {
                    if !question
                        .input
                        .choices()
                        .iter()
                        .any(|choice| choice.id == entry.choice)
                    {
                        return Err(QuestionnaireError::RuleForUnknownChoice {
                            question: question.id.clone(),
                            choice: entry.choice.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

fn within_limit(value: i32) -> bool {
    (-POINT_LIMIT..=POINT_LIMIT).contains(&value)
}

fn point_values(scoring: &RuleScoring) -> Vec<(&'static str, i32)> {
    match scoring {
        RuleScoring::Choices { points } => points
            .iter()
            .map(|entry| ("choice points", entry.points))
            .collect(),
        RuleScoring::Scale {
            points_per_unit, ..
        } => vec![("points_per_unit", *points_per_unit)],
        RuleScoring::Tally {
            points_per_selection,
            cap,
            ..
        } => vec![
            ("points_per_selection", *points_per_selection),
            ("cap", *cap),
        ],
    }
}

fn validate_input(question: &Question) -> Result<(), QuestionnaireError> {
    match &question.input {
        QuestionInput::Scale { min, max } => {
            if min > max {
                return Err(QuestionnaireError::InvalidRange {
                    question: question.id.clone(),
                    min: *min,
                    max: *max,
                });
            }
        }
        QuestionInput::SingleChoice { choices } | QuestionInput::MultiSelect { options: choices } => {
            if choices.is_empty() {
                return Err(QuestionnaireError::EmptyChoices(question.id.clone()));
            }
            let mut seen = HashSet::new();
            for choice in choices {
                if !seen.insert(&choice.id) {
                    return Err(QuestionnaireError::DuplicateChoice {
                        question: question.id.clone(),
                        choice: choice.id.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::assessment::scoring::ChoicePoints;

    #[test]
    fn builtin_questionnaires_validate() {
        for slug in Questionnaire::builtin_slugs() {
            let questionnaire = Questionnaire::builtin(slug).expect("builtin exists");
            questionnaire.validate().expect("builtin is well formed");
            assert_eq!(questionnaire.slug, slug);
        }
    }

    #[test]
    fn builtin_declared_maxima_match_rules() {
        for slug in Questionnaire::builtin_slugs() {
            let questionnaire = Questionnaire::builtin(slug).expect("builtin exists");
            assert!(
                questionnaire.maxima_mismatches().is_empty(),
                "{slug} declares maxima its rules cannot reach"
            );
            assert_eq!(questionnaire.raw_maximum(), 100);
        }
    }

    #[test]
    fn unknown_builtin_is_rejected() {
        let err = Questionnaire::builtin("legacy").expect_err("no such questionnaire");
        assert!(matches!(err, QuestionnaireError::UnknownBuiltin(slug) if slug == "legacy"));
    }

    #[test]
    fn rule_for_unknown_choice_is_rejected() {
        let mut questionnaire = Questionnaire::brand_scanner_360();
        questionnaire.rules.push(ScoringRule::choices(
            "website",
            Category::Web,
            vec![ChoicePoints::new("marketplace", 5)],
        ));

        let err = questionnaire.validate().expect_err("choice not offered");
        assert!(matches!(err, QuestionnaireError::RuleForUnknownChoice { .. }));
    }

    #[test]
    fn incompatible_rule_form_is_rejected() {
        let mut questionnaire = Questionnaire::brand_scanner_360();
        questionnaire
            .rules
            .push(ScoringRule::scale("website", Category::Web, 1, 0));

        let err = questionnaire.validate().expect_err("scale rule on a choice question");
        assert!(matches!(
            err,
            QuestionnaireError::IncompatibleRule {
                form: "scale",
                shape: "single choice",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_question_is_rejected() {
        let mut questionnaire = Questionnaire::digital_maturity();
        let first = questionnaire.questions[0].clone();
        questionnaire.questions.push(first);

        let err = questionnaire.validate().expect_err("duplicate id");
        assert!(matches!(err, QuestionnaireError::DuplicateQuestion(_)));
    }

    #[test]
    fn mismatched_maxima_are_reported() {
        let mut questionnaire = Questionnaire::brand_scanner_360();
        questionnaire.categories[0].max_points = 30;

        let mismatches = questionnaire.maxima_mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].declared, 30);
        assert_eq!(mismatches[0].attainable, 15);
    }

    fn with_content_quality_weight(points_per_unit: i32) -> Questionnaire {
        let mut questionnaire = Questionnaire::brand_scanner_360();
        let rule = questionnaire
            .rules
            .iter_mut()
            .find(|rule| rule.question.as_str() == "content_quality")
            .expect("content quality rule");
        rule.scoring = RuleScoring::Scale {
            points_per_unit,
            recommend_below: 6,
        };
        questionnaire
    }

    #[test]
    fn oversized_point_values_are_rejected() {
        let questionnaire = with_content_quality_weight(i32::MAX / 5);

        let err = questionnaire.validate().expect_err("weight out of range");
        assert!(matches!(
            err,
            QuestionnaireError::PointsOutOfRange {
                field: "points_per_unit",
                ..
            }
        ));
    }

    #[test]
    fn oversized_category_maximum_is_rejected() {
        let mut questionnaire = Questionnaire::digital_maturity();
        questionnaire.categories[1].max_points = i32::MAX / 2;

        let err = questionnaire.validate().expect_err("maximum out of range");
        assert!(matches!(
            err,
            QuestionnaireError::CategoryOutOfRange {
                category: Category::Web,
                field: "max_points",
                ..
            }
        ));
    }

    #[test]
    fn attainable_maxima_saturate_on_unvalidated_weights() {
        let questionnaire = with_content_quality_weight(i32::MAX / 5);

        let maxima = questionnaire.attainable_maxima();

        assert_eq!(maxima.get(&Category::Content), Some(&i32::MAX));
        assert_eq!(questionnaire.raw_maximum(), i32::MAX);
    }

    #[test]
    fn json_definition_round_trips_through_reader() {
        let questionnaire = Questionnaire::digital_maturity();
        let json = serde_json::to_vec(&questionnaire).expect("serializes");

        let loaded = Questionnaire::from_reader(json.as_slice()).expect("loads");

        assert_eq!(loaded, questionnaire);
    }
}
