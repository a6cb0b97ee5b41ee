use super::domain::Respondent;

/// Identity gating failures raised before the scoring engine runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("display name is required")]
    MissingDisplayName,
    #[error("contact email is required")]
    MissingEmail,
}

/// Respondent whose mandatory identity fields were checked and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedRespondent {
    pub display_name: String,
    pub email: String,
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

impl VerifiedRespondent {
    /// Name shown in the report title.
    pub fn report_label(&self) -> &str {
        self.business_name.as_deref().unwrap_or(&self.display_name)
    }
}

pub fn verify_respondent(respondent: Respondent) -> Result<VerifiedRespondent, ValidationError> {
    let display_name = respondent.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(ValidationError::MissingDisplayName);
    }

    let email = respondent.email.trim().to_string();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }

    Ok(VerifiedRespondent {
        display_name,
        email,
        business_name: non_blank(respondent.business_name),
        phone: non_blank(respondent.phone),
        website: non_blank(respondent.website),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
