//! Loading questionnaire definitions from disk the way the service does at startup.

use std::io::Write;

use presence_scan::assessment::{
    AnswerRecord, Category, Questionnaire, QuestionnaireError, ScoringEngine,
};

const SINGLE_CATEGORY: &str = r#"{
  "slug": "web_check",
  "title": "Web check",
  "categories": [
    { "category": "web", "max_points": 10, "benchmark": 6 }
  ],
  "questions": [
    {
      "id": "https",
      "section": "Web",
      "prompt": "Does your site use HTTPS?",
      "input": { "kind": "single_choice", "choices": [
        { "id": "yes", "label": "Yes" },
        { "id": "no", "label": "No" }
      ] }
    },
    {
      "id": "pages",
      "section": "Web",
      "prompt": "How complete are your pages? (0-5)",
      "input": { "kind": "scale", "min": 0, "max": 5 }
    }
  ],
  "rules": [
    {
      "question": "https",
      "category": "web",
      "scoring": { "form": "choices", "points": [ { "choice": "yes", "points": 5 } ] },
      "recommendation": "Web: enable HTTPS."
    },
    {
      "question": "pages",
      "category": "web",
      "scoring": { "form": "scale", "points_per_unit": 1, "recommend_below": 3 },
      "recommendation": "Web: finish the about and contact pages."
    }
  ]
}"#;

#[test]
fn resolve_loads_json_definitions_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(SINGLE_CATEGORY.as_bytes()).expect("write definition");

    let path = file.path().to_str().expect("utf-8 path").to_string();
    let questionnaire = Questionnaire::resolve(&path).expect("definition is valid");
    assert_eq!(questionnaire.slug, "web_check");
    assert!(questionnaire.maxima_mismatches().is_empty());

    let engine = ScoringEngine::new(questionnaire).expect("engine builds");
    let result = engine
        .score(
            &AnswerRecord::new()
                .with_choice("https", "no")
                .with_scale("pages", 2),
        )
        .expect("answers are valid");

    assert_eq!(result.category_score(Category::Web), 2);
    assert_eq!(
        result.recommendations,
        vec![
            "Web: enable HTTPS.".to_string(),
            "Web: finish the about and contact pages.".to_string(),
        ]
    );
}

#[test]
fn resolve_prefers_builtin_slugs() {
    let questionnaire = Questionnaire::resolve(" digital_maturity ").expect("builtin");
    assert_eq!(questionnaire.raw_maximum(), 100);
}

#[test]
fn structurally_broken_files_are_rejected() {
    let broken = SINGLE_CATEGORY.replace(r#""category": "web", "max_points""#, r#""category": "ads", "max_points""#);
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(broken.as_bytes()).expect("write definition");

    let error = Questionnaire::from_path(file.path()).expect_err("rules use an undeclared category");
    assert!(matches!(error, QuestionnaireError::UndeclaredCategory { .. }));
}

#[test]
fn missing_files_surface_io_errors() {
    let dir = tempfile::tempdir().expect("temp dir");
    let error = Questionnaire::resolve(dir.path().join("absent.json").to_str().expect("utf-8"))
        .expect_err("file does not exist");
    assert!(matches!(error, QuestionnaireError::Io(_)));
}
