use std::collections::BTreeMap;

use super::domain::Category;
use super::questionnaire::Questionnaire;

/// Fixed reference values per category, used only for side-by-side comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BenchmarkProvider {
    values: BTreeMap<Category, i32>,
}

impl BenchmarkProvider {
    pub fn new(values: BTreeMap<Category, i32>) -> Self {
        Self { values }
    }

    pub fn from_questionnaire(questionnaire: &Questionnaire) -> Self {
        Self::new(
            questionnaire
                .categories
                .iter()
                .map(|profile| (profile.category, profile.benchmark))
                .collect(),
        )
    }

    /// Reference value for each requested category; unconfigured categories map to 0.
    pub fn benchmarks(&self, categories: &[Category]) -> BTreeMap<Category, i32> {
        categories
            .iter()
            .map(|category| (*category, self.values.get(category).copied().unwrap_or(0)))
            .collect()
    }
}
