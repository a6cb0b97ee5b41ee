pub mod chart;
mod document;
mod pdf;

pub use chart::{BarChart, BarGroup};

use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};

use super::domain::Category;
use super::intake::VerifiedRespondent;
use super::questionnaire::CategoryProfile;
use super::scoring::ScoreResult;

/// 8-bit RGB color as used by the report theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn parse_hex(raw: &str) -> Option<Self> {
        let digits = raw.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    pub(crate) fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

/// Presentation settings passed explicitly to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTheme {
    pub organization: String,
    pub primary: Rgb,
    pub accent: Rgb,
    pub text: Rgb,
}

impl Default for ReportTheme {
    fn default() -> Self {
        Self {
            organization: "Your Company".to_string(),
            primary: Rgb(10, 42, 67),
            accent: Rgb(75, 183, 161),
            text: Rgb(51, 51, 51),
        }
    }
}

/// Everything the renderer needs about one scored submission.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub questionnaire_title: &'a str,
    pub respondent: &'a VerifiedRespondent,
    pub result: &'a ScoreResult,
    pub categories: &'a [CategoryProfile],
    pub benchmarks: &'a BTreeMap<Category, i32>,
    pub generated_at: DateTime<Utc>,
}

/// Chart and document artifacts for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub file_name: String,
    pub document: Vec<u8>,
    pub chart_svg: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("report has no categories to chart")]
    NoCategories,
    #[error("renderer unavailable: {0}")]
    Unavailable(String),
}

/// Seam between scoring and presentation so alternate renderers can be swapped in.
pub trait ReportRenderer: Debug + Send + Sync {
    fn render(&self, context: &ReportContext<'_>) -> Result<RenderedReport, RenderError>;
}

/// Renders an SVG chart and a PDF action-plan document.
#[derive(Debug, Clone, Default)]
pub struct PdfReportRenderer {
    theme: ReportTheme,
}

impl PdfReportRenderer {
    pub fn new(theme: ReportTheme) -> Self {
        Self { theme }
    }

    pub fn theme(&self) -> &ReportTheme {
        &self.theme
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn render(&self, context: &ReportContext<'_>) -> Result<RenderedReport, RenderError> {
        let chart = BarChart::build(context.categories, context.result, context.benchmarks)?;
        let chart_svg = chart.to_svg(&self.theme);
        let document = document::assemble(&self.theme, context, &chart);

        tracing::debug!(
            bytes = document.len(),
            categories = chart.groups.len(),
            "rendered presence report"
        );

        Ok(RenderedReport {
            file_name: document::file_name(context.generated_at),
            document,
            chart_svg,
        })
    }
}
