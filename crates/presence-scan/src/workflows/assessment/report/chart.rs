use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::Category;
use super::super::questionnaire::CategoryProfile;
use super::super::scoring::ScoreResult;
use super::pdf::{text_width, Content, REGULAR};
use super::{RenderError, ReportTheme};

/// One bar pair: the respondent's subtotal next to the category benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarGroup {
    pub category: Category,
    pub score: i32,
    pub benchmark: i32,
}

/// Category-vs-benchmark comparison with a fixed y-axis ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarChart {
    pub groups: Vec<BarGroup>,
    pub ceiling: i32,
}

impl BarChart {
    pub fn build(
        categories: &[CategoryProfile],
        result: &ScoreResult,
        benchmarks: &BTreeMap<Category, i32>,
    ) -> Result<Self, RenderError> {
        if categories.is_empty() {
            return Err(RenderError::NoCategories);
        }

        let groups = categories
            .iter()
            .map(|profile| BarGroup {
                category: profile.category,
                score: result.category_score(profile.category),
                benchmark: benchmarks.get(&profile.category).copied().unwrap_or(0),
            })
            .collect();

        Ok(Self {
            groups,
            ceiling: ceiling_for(categories),
        })
    }

    /// Bar height within `height`, clipped to the axis.
    fn scaled(&self, value: i32, height: f32) -> f32 {
        let ratio = value.clamp(0, self.ceiling) as f32 / self.ceiling as f32;
        ratio * height
    }

    pub fn to_svg(&self, theme: &ReportTheme) -> String {
        let (width, height) = (640.0_f32, 360.0_f32);
        let plot = Plot::new(width, height, self.groups.len());
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
        );
        svg.push_str(&format!(
            "<line x1=\"{left}\" y1=\"{top}\" x2=\"{left}\" y2=\"{bottom}\" stroke=\"{axis}\"/>\n<line x1=\"{left}\" y1=\"{bottom}\" x2=\"{right}\" y2=\"{bottom}\" stroke=\"{axis}\"/>\n",
            left = plot.left,
            right = plot.left + plot.width,
            top = height - plot.top(),
            bottom = height - plot.bottom,
            axis = theme.text.hex(),
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" text-anchor=\"end\">{}</text>\n",
            plot.left - 4.0,
            height - plot.top() + 4.0,
            self.ceiling
        ));

        for (index, group) in self.groups.iter().enumerate() {
            let (score_x, benchmark_x) = plot.bar_positions(index);
            for (x, value, color) in [
                (score_x, group.score, theme.primary),
                (benchmark_x, group.benchmark, theme.accent),
            ] {
                let bar = self.scaled(value, plot.height);
                svg.push_str(&format!(
                    "<rect x=\"{x:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{bar:.1}\" fill=\"{}\"/>\n",
                    height - plot.bottom - bar,
                    plot.bar_width,
                    color.hex()
                ));
                svg.push_str(&format!(
                    "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" text-anchor=\"middle\">{value}</text>\n",
                    x + plot.bar_width / 2.0,
                    height - plot.bottom - bar - 4.0
                ));
            }
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>\n",
                plot.group_center(index),
                height - plot.bottom + 16.0,
                group.category.label()
            ));
        }

        svg.push_str(&format!(
            "<rect x=\"{left}\" y=\"8\" width=\"10\" height=\"10\" fill=\"{}\"/><text x=\"{}\" y=\"17\" font-size=\"10\">You</text>\n<rect x=\"{}\" y=\"8\" width=\"10\" height=\"10\" fill=\"{}\"/><text x=\"{}\" y=\"17\" font-size=\"10\">Benchmark</text>\n",
            theme.primary.hex(),
            plot.left + 14.0,
            plot.left + 60.0,
            theme.accent.hex(),
            plot.left + 74.0,
            left = plot.left,
        ));
        svg.push_str("</svg>\n");
        svg
    }

    /// Drawing operators for a form XObject of the given size (PDF origin bottom-left).
    pub(crate) fn to_pdf_content(&self, theme: &ReportTheme, width: f32, height: f32) -> Vec<u8> {
        let plot = Plot::new(width, height, self.groups.len());
        let mut content = Content::new();

        content.stroke_color(theme.text);
        content.line(
            (plot.left, plot.bottom),
            (plot.left, plot.top()),
            0.8,
        );
        content.line(
            (plot.left, plot.bottom),
            (plot.left + plot.width, plot.bottom),
            0.8,
        );

        content.fill_color(theme.text);
        let ceiling_label = self.ceiling.to_string();
        content.text(
            REGULAR,
            8.0,
            plot.left - 4.0 - text_width(&ceiling_label, 8.0, false),
            plot.top() - 3.0,
            &ceiling_label,
        );
        content.text(REGULAR, 8.0, plot.left - 10.0, plot.bottom - 3.0, "0");

        for (index, group) in self.groups.iter().enumerate() {
            let (score_x, benchmark_x) = plot.bar_positions(index);
            for (x, value, color) in [
                (score_x, group.score, theme.primary),
                (benchmark_x, group.benchmark, theme.accent),
            ] {
                let bar = self.scaled(value, plot.height);
                content.fill_color(color);
                content.rect(x, plot.bottom, plot.bar_width, bar);

                let label = value.to_string();
                content.fill_color(theme.text);
                content.text(
                    REGULAR,
                    8.0,
                    x + (plot.bar_width - text_width(&label, 8.0, false)) / 2.0,
                    plot.bottom + bar + 3.0,
                    &label,
                );
            }

            let name = group.category.label();
            content.text(
                REGULAR,
                9.0,
                plot.group_center(index) - text_width(name, 9.0, false) / 2.0,
                plot.bottom - 14.0,
                name,
            );
        }

        let legend_y = height - 14.0;
        content.fill_color(theme.primary);
        content.rect(plot.left, legend_y, 8.0, 8.0);
        content.fill_color(theme.accent);
        content.rect(plot.left + 50.0, legend_y, 8.0, 8.0);
        content.fill_color(theme.text);
        content.text(REGULAR, 8.0, plot.left + 11.0, legend_y + 1.0, "You");
        content.text(REGULAR, 8.0, plot.left + 61.0, legend_y + 1.0, "Benchmark");

        content.into_bytes()
    }
}

/// Axis ceiling: ten percent above the largest declared category maximum, rounded up.
pub fn ceiling_for(categories: &[CategoryProfile]) -> i32 {
    let largest = categories
        .iter()
        .map(|profile| profile.max_points)
        .max()
        .unwrap_or(0)
        .max(1);
    let ceiling = (i64::from(largest) * 11 + 9) / 10;
    i32::try_from(ceiling).unwrap_or(i32::MAX)
}

struct Plot {
    left: f32,
    bottom: f32,
    width: f32,
    height: f32,
    group_width: f32,
    bar_width: f32,
}

impl Plot {
    fn new(width: f32, height: f32, groups: usize) -> Self {
        let (left, right, bottom, top) = (36.0, 12.0, 26.0, 28.0);
        let plot_width = width - left - right;
        let group_width = plot_width / groups.max(1) as f32;
        Self {
            left,
            bottom,
            width: plot_width,
            height: height - bottom - top,
            group_width,
            bar_width: group_width * 0.35,
        }
    }

    fn top(&self) -> f32 {
        self.bottom + self.height
    }

    fn group_center(&self, index: usize) -> f32 {
        self.left + self.group_width * (index as f32 + 0.5)
    }

    fn bar_positions(&self, index: usize) -> (f32, f32) {
        let center = self.group_center(index);
        (center - self.bar_width, center)
    }
}
