use chrono::{DateTime, Utc};

use super::chart::BarChart;
use super::pdf::{
    font_dictionary, text_width, Content, PdfWriter, BOLD, PAGE_HEIGHT, PAGE_WIDTH, REGULAR,
};
use super::{ReportContext, ReportTheme, Rgb};

const MARGIN: f32 = 50.0;
const CHART_HEIGHT: f32 = 230.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 15.0;
const CHART_FORM: &str = "Chart";

pub(super) fn file_name(generated_at: DateTime<Utc>) -> String {
    format!("presence-audit-{}.pdf", generated_at.format("%Y%m%d-%H%M%S"))
}

/// Lay out the action-plan report; recommendations overflow onto further pages.
pub(super) fn assemble(theme: &ReportTheme, context: &ReportContext<'_>, chart: &BarChart) -> Vec<u8> {
    let mut layout = Layout::new(theme, format!("Prepared by {}", theme.organization));
    let respondent = context.respondent;

    layout.centered(
        BOLD,
        16.0,
        theme.primary,
        &format!("Report: {}", respondent.report_label()),
    );
    layout.gap(4.0);
    layout.centered(
        REGULAR,
        10.0,
        theme.text,
        &format!(
            "{} | {}",
            context.questionnaire_title,
            context.generated_at.format("%B %d, %Y")
        ),
    );
    layout.gap(12.0);

    layout.line(REGULAR, 10.0, theme.text, &format!("Prepared for: {}", respondent.display_name));
    layout.line(REGULAR, 10.0, theme.text, &format!("Email: {}", respondent.email));
    if let Some(business) = &respondent.business_name {
        layout.line(REGULAR, 10.0, theme.text, &format!("Business: {business}"));
    }
    if let Some(phone) = &respondent.phone {
        layout.line(REGULAR, 10.0, theme.text, &format!("Phone: {phone}"));
    }
    if let Some(website) = &respondent.website {
        layout.line(REGULAR, 10.0, theme.text, &format!("Website: {website}"));
    }
    layout.gap(10.0);

    layout.line(
        BOLD,
        12.0,
        Rgb(0, 0, 0),
        &format!(
            "Final score: {}/100 - Status: {}",
            context.result.total,
            context.result.level.label()
        ),
    );
    layout.gap(8.0);

    let chart_width = PAGE_WIDTH - 2.0 * MARGIN;
    layout.chart(CHART_HEIGHT);
    layout.gap(16.0);

    layout.line(BOLD, 14.0, theme.accent, "Recommended action plan:");
    layout.gap(4.0);
    if context.result.recommendations.is_empty() {
        layout.line(
            REGULAR,
            BODY_SIZE,
            theme.text,
            "No urgent actions. Keep the current strategy and review it quarterly.",
        );
    }
    for recommendation in &context.result.recommendations {
        layout.wrapped(REGULAR, BODY_SIZE, theme.text, &format!("- {recommendation}"));
        layout.gap(4.0);
    }

    let chart_content = chart.to_pdf_content(theme, chart_width, CHART_HEIGHT);
    layout.finish(chart_content, chart_width)
}

struct Layout<'t> {
    theme: &'t ReportTheme,
    footer: String,
    pages: Vec<Content>,
    current: Content,
    cursor: f32,
}

impl<'t> Layout<'t> {
    fn new(theme: &'t ReportTheme, footer: String) -> Self {
        Self {
            theme,
            footer,
            pages: Vec::new(),
            current: Content::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn ensure_room(&mut self, height: f32) {
        if self.cursor - height < MARGIN {
            self.close_page();
            self.cursor = PAGE_HEIGHT - MARGIN;
        }
    }

    /// Stamp the footer on the current page and move it to the finished list.
    fn close_page(&mut self) {
        self.current.fill_color(self.theme.text);
        self.current
            .text(REGULAR, 8.0, MARGIN, MARGIN / 2.0, &self.footer);
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn line(&mut self, font: &str, size: f32, color: Rgb, text: &str) {
        self.ensure_room(size + 4.0);
        self.cursor -= size;
        self.current.fill_color(color);
        self.current.text(font, size, MARGIN, self.cursor, text);
        self.cursor -= 4.0;
    }

    fn centered(&mut self, font: &str, size: f32, color: Rgb, text: &str) {
        self.ensure_room(size + 4.0);
        self.cursor -= size;
        let width = text_width(text, size, font == BOLD);
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.current.fill_color(color);
        self.current.text(font, size, x, self.cursor, text);
        self.cursor -= 4.0;
    }

    fn wrapped(&mut self, font: &str, size: f32, color: Rgb, text: &str) {
        let per_char = text_width("n", size, font == BOLD);
        let max_chars = ((PAGE_WIDTH - 2.0 * MARGIN) / per_char).floor() as usize;
        for row in wrap(text, max_chars.max(10)) {
            self.ensure_room(LINE_HEIGHT);
            self.cursor -= LINE_HEIGHT;
            self.current.fill_color(color);
            self.current.text(font, size, MARGIN, self.cursor, &row);
        }
    }

    fn chart(&mut self, height: f32) {
        self.ensure_room(height);
        self.cursor -= height;
        self.current.place_form(CHART_FORM, MARGIN, self.cursor);
    }

    fn finish(mut self, chart_content: Vec<u8>, chart_width: f32) -> Vec<u8> {
        self.close_page();

        let mut writer = PdfWriter::new();
        let catalog = writer.reserve();
        let pages_root = writer.reserve();
        let regular = writer.add_dictionary(&font_dictionary("Helvetica"));
        let bold = writer.add_dictionary(&font_dictionary("Helvetica-Bold"));
        let chart = writer.add_stream(
            &format!(
                "/Type /XObject /Subtype /Form /BBox [0 0 {chart_width:.2} {CHART_HEIGHT:.2}] /Resources << /Font << /{REGULAR} {regular} 0 R >> >>"
            ),
            &chart_content,
        );

        let mut kids = Vec::with_capacity(self.pages.len());
        for page in self.pages {
            let contents = writer.add_stream("", &page.into_bytes());
            let page_id = writer.add_dictionary(&format!(
                "<< /Type /Page /Parent {pages_root} 0 R /MediaBox [0 0 {PAGE_WIDTH:.0} {PAGE_HEIGHT:.0}] /Resources << /Font << /{REGULAR} {regular} 0 R /{BOLD} {bold} 0 R >> /XObject << /{CHART_FORM} {chart} 0 R >> >> /Contents {contents} 0 R >>"
            ));
            kids.push(format!("{page_id} 0 R"));
        }

        writer.set(
            pages_root,
            format!(
                "<< /Type /Pages /Kids [{}] /Count {} >>",
                kids.join(" "),
                kids.len()
            )
            .into_bytes(),
        );
        writer.set(
            catalog,
            format!("<< /Type /Catalog /Pages {pages_root} 0 R >>").into_bytes(),
        );
        writer.finish(catalog)
    }
}

/// Greedy word wrap by character count; words longer than a row are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut row = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
            }
            let rest = word.split_off(max_chars);
            rows.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        let needed = if row.is_empty() {
            word.chars().count()
        } else {
            row.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
        }
        if !row.is_empty() {
            row.push(' ');
        }
        row.push_str(&word);
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}
