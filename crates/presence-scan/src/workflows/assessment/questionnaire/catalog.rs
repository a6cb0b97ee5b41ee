//! Questionnaires shipped with the crate.

use super::super::domain::{AnswerChoice, Category, Question, QuestionId, QuestionInput};
use super::super::scoring::{ChoicePoints, ScoringRule};
use super::{CategoryProfile, Questionnaire};

pub(super) const BRAND_SCANNER_360: &str = "brand_scanner_360";
pub(super) const DIGITAL_MATURITY: &str = "digital_maturity";

fn single_choice(id: &str, section: &str, prompt: &str, choices: &[(&str, &str)]) -> Question {
    Question {
        id: QuestionId::new(id),
        section: section.to_string(),
        prompt: prompt.to_string(),
        input: QuestionInput::SingleChoice {
            choices: choices
                .iter()
                .map(|(id, label)| AnswerChoice::new(id, label))
                .collect(),
        },
    }
}

fn multi_select(id: &str, section: &str, prompt: &str, options: &[(&str, &str)]) -> Question {
    Question {
        id: QuestionId::new(id),
        section: section.to_string(),
        prompt: prompt.to_string(),
        input: QuestionInput::MultiSelect {
            options: options
                .iter()
                .map(|(id, label)| AnswerChoice::new(id, label))
                .collect(),
        },
    }
}

fn scale(id: &str, section: &str, prompt: &str, min: i32, max: i32) -> Question {
    Question {
        id: QuestionId::new(id),
        section: section.to_string(),
        prompt: prompt.to_string(),
        input: QuestionInput::Scale { min, max },
    }
}

const IDENTITY: &str = "1. Identity and assets";
const CONTENT: &str = "2. Content strategy";
const INVESTMENT: &str = "3. Investment and management";

/// The seven-question 360° brand audit.
pub(super) fn brand_scanner_360() -> Questionnaire {
    let questions = vec![
        single_choice(
            "brand_identity",
            IDENTITY,
            "Is your visual identity defined?",
            &[
                ("manual", "Yes, complete identity manual"),
                ("logo_only", "Logo only"),
                ("none", "No, colors are picked at random"),
            ],
        ),
        single_choice(
            "website",
            IDENTITY,
            "What state is your website in?",
            &[
                ("none", "I don't have one"),
                ("basic", "Basic / informational"),
                ("optimized_store", "Optimized online store"),
            ],
        ),
        single_choice(
            "posting_frequency",
            CONTENT,
            "How often do you publish?",
            &[
                ("rarely", "Almost never"),
                ("weekly", "Once a week"),
                ("few_per_week", "2-3 times a week"),
                ("daily", "Daily"),
            ],
        ),
        scale(
            "content_quality",
            CONTENT,
            "Photo and video quality (1-10)",
            1,
            10,
        ),
        multi_select(
            "active_channels",
            CONTENT,
            "Active channels",
            &[
                ("instagram", "Instagram"),
                ("linkedin", "LinkedIn"),
                ("tiktok", "TikTok"),
                ("facebook", "Facebook"),
                ("youtube", "YouTube"),
                ("email", "Email marketing"),
            ],
        ),
        single_choice(
            "paid_ads",
            INVESTMENT,
            "Paid advertising (ads)",
            &[
                ("never", "Never"),
                ("sporadic", "Sporadic"),
                ("monthly", "Steady monthly budget"),
            ],
        ),
        single_choice(
            "crm",
            INVESTMENT,
            "Do you use a CRM or customer database?",
            &[("yes", "Yes"), ("no", "No")],
        ),
    ];

    let rules = vec![
        ScoringRule::choices(
            "brand_identity",
            Category::Brand,
            vec![
                ChoicePoints::new("manual", 15),
                ChoicePoints::new("logo_only", 5)
                    .advising("Identity: define fixed typography and colors."),
                ChoicePoints::new("none", 0)
                    .advising("URGENT: create a visual identity manual."),
            ],
        ),
        ScoringRule::choices(
            "website",
            Category::Web,
            vec![
                ChoicePoints::new("optimized_store", 10),
                ChoicePoints::new("basic", 5).silent(),
                ChoicePoints::new("none", 0)
                    .advising("Web: you need a website to build credibility."),
            ],
        ),
        ScoringRule::choices(
            "posting_frequency",
            Category::Content,
            vec![
                ChoicePoints::new("daily", 20),
                ChoicePoints::new("few_per_week", 15).silent(),
                ChoicePoints::new("weekly", 5)
                    .advising("Frequency: move up to three posts per week."),
                ChoicePoints::new("rarely", 0)
                    .advising("Consistency: posting 'almost never' kills your reach."),
            ],
        ),
        ScoringRule::scale("content_quality", Category::Content, 1, 6)
            .recommending("Content: improve lighting and audio."),
        ScoringRule::tally("active_channels", Category::Content, 4, 20, 2)
            .recommending("Diversification: don't depend on a single network."),
        ScoringRule::choices(
            "paid_ads",
            Category::Ads,
            vec![
                ChoicePoints::new("monthly", 20),
                ChoicePoints::new("sporadic", 10).silent(),
                ChoicePoints::new("never", 0),
            ],
        )
        .recommending("Ads: invest in advertising every month."),
        ScoringRule::choices(
            "crm",
            Category::Sales,
            vec![ChoicePoints::new("yes", 5), ChoicePoints::new("no", 0)],
        )
        .recommending("Management: implement a CRM."),
    ];

    Questionnaire {
        slug: BRAND_SCANNER_360.to_string(),
        title: "Brand Scanner 360°".to_string(),
        categories: vec![
            CategoryProfile::new(Category::Brand, 15, 10),
            CategoryProfile::new(Category::Web, 10, 7),
            CategoryProfile::new(Category::Content, 50, 30),
            CategoryProfile::new(Category::Ads, 20, 12),
            CategoryProfile::new(Category::Sales, 5, 3),
        ],
        questions,
        rules,
    }
}

/// Five categories worth 20 points each; `website` feeds both Web and Sales.
pub(super) fn digital_maturity() -> Questionnaire {
    let questions = vec![
        single_choice(
            "brand_identity",
            "Brand",
            "Is your visual identity defined?",
            &[
                ("manual", "Complete identity manual"),
                ("logo_only", "Logo only"),
                ("none", "Nothing defined"),
            ],
        ),
        single_choice(
            "message_clarity",
            "Brand",
            "Does a visitor understand what you offer within three seconds?",
            &[
                ("clear_3s", "Clear in 3 seconds"),
                ("partial", "Takes some reading"),
                ("unclear", "Not clear"),
            ],
        ),
        single_choice(
            "website",
            "Web",
            "What does your website do?",
            &[
                ("none", "No website"),
                ("informational", "Informational pages"),
                ("ecommerce", "Sells online"),
            ],
        ),
        single_choice(
            "mobile_speed",
            "Web",
            "How fast does your site load on mobile?",
            &[
                ("fast", "Under 3 seconds"),
                ("average", "3 to 6 seconds"),
                ("slow", "Slower than 6 seconds"),
            ],
        ),
        single_choice(
            "posting_frequency",
            "Content",
            "How often do you publish?",
            &[
                ("rarely", "Almost never"),
                ("weekly", "Once a week"),
                ("few_per_week", "2-3 times a week"),
                ("daily", "Daily"),
            ],
        ),
        scale(
            "content_quality",
            "Content",
            "Photo and video quality (1-10)",
            1,
            10,
        ),
        single_choice(
            "ad_budget",
            "Ads",
            "How do you invest in paid advertising?",
            &[
                ("none", "No budget"),
                ("sporadic", "Occasional campaigns"),
                ("monthly", "Fixed monthly budget"),
            ],
        ),
        single_choice(
            "ad_tracking",
            "Ads",
            "How do you measure campaign results?",
            &[
                ("pixel_and_goals", "Tracking pixel and conversion goals"),
                ("basic", "Platform reports only"),
                ("none", "We don't measure"),
            ],
        ),
        single_choice(
            "crm",
            "Sales",
            "Do you use a CRM or customer database?",
            &[("yes", "Yes"), ("no", "No")],
        ),
        single_choice(
            "follow_up",
            "Sales",
            "How quickly do you answer a new lead?",
            &[
                ("under_1h", "Within an hour"),
                ("same_day", "Same day"),
                ("later", "Later than a day"),
            ],
        ),
    ];

    let rules = vec![
        ScoringRule::choices(
            "brand_identity",
            Category::Brand,
            vec![
                ChoicePoints::new("manual", 10),
                ChoicePoints::new("logo_only", 5),
            ],
        )
        .recommending("Brand: define official colors and typography."),
        ScoringRule::choices(
            "message_clarity",
            Category::Brand,
            vec![
                ChoicePoints::new("clear_3s", 10),
                ChoicePoints::new("partial", 5),
            ],
        )
        .recommending("Brand: make your value proposition clear within three seconds."),
        ScoringRule::choices(
            "website",
            Category::Web,
            vec![
                ChoicePoints::new("ecommerce", 10),
                ChoicePoints::new("informational", 8),
            ],
        )
        .recommending("Web: publish a site that answers who you are and how to buy."),
        ScoringRule::choices(
            "website",
            Category::Sales,
            vec![ChoicePoints::new("ecommerce", 5)],
        )
        .recommending("Sales: enable online checkout or booking."),
        ScoringRule::choices(
            "mobile_speed",
            Category::Web,
            vec![ChoicePoints::new("fast", 10), ChoicePoints::new("average", 5)],
        )
        .recommending("Web: compress images and trim scripts to load in under 3 seconds."),
        ScoringRule::choices(
            "posting_frequency",
            Category::Content,
            vec![
                ChoicePoints::new("daily", 10),
                ChoicePoints::new("few_per_week", 8),
                ChoicePoints::new("weekly", 4),
            ],
        )
        .recommending("Content: publish at least three times per week."),
        ScoringRule::scale("content_quality", Category::Content, 1, 7)
            .recommending("Content: invest in lighting, audio, and editing."),
        ScoringRule::choices(
            "ad_budget",
            Category::Ads,
            vec![
                ChoicePoints::new("monthly", 10),
                ChoicePoints::new("sporadic", 5),
            ],
        )
        .recommending("Ads: commit a fixed monthly advertising budget."),
        ScoringRule::choices(
            "ad_tracking",
            Category::Ads,
            vec![
                ChoicePoints::new("pixel_and_goals", 10),
                ChoicePoints::new("basic", 5),
            ],
        )
        .recommending("Ads: install a tracking pixel and define conversion goals."),
        ScoringRule::choices("crm", Category::Sales, vec![ChoicePoints::new("yes", 10)])
            .recommending("Sales: centralize leads and customers in a CRM."),
        ScoringRule::choices(
            "follow_up",
            Category::Sales,
            vec![
                ChoicePoints::new("under_1h", 5),
                ChoicePoints::new("same_day", 3),
            ],
        )
        .recommending("Sales: answer new leads within the hour."),
    ];

    Questionnaire {
        slug: DIGITAL_MATURITY.to_string(),
        title: "Digital Maturity Audit".to_string(),
        categories: vec![
            CategoryProfile::new(Category::Brand, 20, 12),
            CategoryProfile::new(Category::Web, 20, 13),
            CategoryProfile::new(Category::Content, 20, 11),
            CategoryProfile::new(Category::Ads, 20, 9),
            CategoryProfile::new(Category::Sales, 20, 10),
        ],
        questions,
        rules,
    }
}
