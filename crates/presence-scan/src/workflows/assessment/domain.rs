use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for a survey question.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub String);

impl QuestionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for one selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub String);

impl ChoiceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed grouping buckets used for subtotals and benchmark comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Brand,
    Web,
    Content,
    Ads,
    Sales,
}

impl Category {
    pub const fn ordered() -> [Self; 5] {
        [Self::Brand, Self::Web, Self::Content, Self::Ads, Self::Sales]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Brand => "Brand",
            Self::Web => "Web",
            Self::Content => "Content",
            Self::Ads => "Ads",
            Self::Sales => "Sales",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One selectable value presented to the respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChoice {
    pub id: ChoiceId,
    pub label: String,
}

impl AnswerChoice {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: ChoiceId::new(id),
            label: label.to_string(),
        }
    }
}

/// Input shape of a question, mirroring how the form collects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionInput {
    SingleChoice { choices: Vec<AnswerChoice> },
    Scale { min: i32, max: i32 },
    MultiSelect { options: Vec<AnswerChoice> },
}

impl QuestionInput {
    pub fn shape(&self) -> &'static str {
        match self {
            QuestionInput::SingleChoice { .. } => "single choice",
            QuestionInput::Scale { .. } => "scale",
            QuestionInput::MultiSelect { .. } => "multi select",
        }
    }

    pub fn choices(&self) -> &[AnswerChoice] {
        match self {
            QuestionInput::SingleChoice { choices } => choices,
            QuestionInput::MultiSelect { options } => options,
            QuestionInput::Scale { .. } => &[],
        }
    }
}

/// A survey question as rendered by the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub section: String,
    pub prompt: String,
    pub input: QuestionInput,
}

/// Value chosen for a single question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(ChoiceId),
    Scale(i32),
    Selections(Vec<ChoiceId>),
}

impl AnswerValue {
    pub fn shape(&self) -> &'static str {
        match self {
            AnswerValue::Choice(_) => "single choice",
            AnswerValue::Scale(_) => "scale",
            AnswerValue::Selections(_) => "multi select",
        }
    }
}

/// One respondent's complete set of survey responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord {
    answers: BTreeMap<QuestionId, AnswerValue>,
}

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_choice(mut self, question: &str, choice: &str) -> Self {
        self.answers.insert(
            QuestionId::new(question),
            AnswerValue::Choice(ChoiceId::new(choice)),
        );
        self
    }

    pub fn with_scale(mut self, question: &str, value: i32) -> Self {
        self.answers
            .insert(QuestionId::new(question), AnswerValue::Scale(value));
        self
    }

    pub fn with_selections(mut self, question: &str, selections: &[&str]) -> Self {
        self.answers.insert(
            QuestionId::new(question),
            AnswerValue::Selections(selections.iter().copied().map(ChoiceId::new).collect()),
        );
        self
    }

    pub fn get(&self, question: &QuestionId) -> Option<&AnswerValue> {
        self.answers.get(question)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, &AnswerValue)> {
        self.answers.iter()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

impl FromIterator<(QuestionId, AnswerValue)> for AnswerRecord {
    fn from_iter<T: IntoIterator<Item = (QuestionId, AnswerValue)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Identity fields captured alongside the answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Respondent {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

/// Complete payload handed over by the form surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSubmission {
    pub respondent: Respondent,
    pub answers: AnswerRecord,
}
