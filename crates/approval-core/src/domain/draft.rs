use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::NewPost;
use crate::error::DomainError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated submission as filled in by the agency.
///
/// Every field is optional so that missing input surfaces as a validation
/// failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub image: Option<String>,
    pub text: Option<String>,
    pub date: Option<String>,
}

impl PostDraft {
    pub fn new(
        image: impl Into<String>,
        text: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            image: Some(image.into()),
            text: Some(text.into()),
            date: Some(date.into()),
        }
    }

    /// Check every field and collect all problems at once.
    pub fn validate(self, created_at: DateTime<Utc>) -> Result<NewPost, DomainError> {
        let mut errors = Vec::new();

        let image = match non_empty(self.image) {
            Some(image) if is_image_data_uri(&image) => Some(image),
            Some(_) => {
                errors.push("image must be a base64 data:image URI".to_string());
                None
            }
            None => {
                errors.push("image is required".to_string());
                None
            }
        };

        let text = non_empty(self.text);
        if text.is_none() {
            errors.push("text is required".to_string());
        }

        let date = match non_empty(self.date) {
            Some(raw) => match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.push(format!("date '{raw}' is not a YYYY-MM-DD calendar date"));
                    None
                }
            },
            None => {
                errors.push("date is required".to_string());
                None
            }
        };

        match (image, text, date) {
            (Some(image), Some(text), Some(date)) if errors.is_empty() => Ok(NewPost {
                image,
                text,
                date,
                created_at,
            }),
            _ => Err(DomainError::Validation(errors)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `data:image/<subtype>[;params];base64,<payload>` with a non-empty payload.
fn is_image_data_uri(value: &str) -> bool {
    let Some(rest) = value.strip_prefix("data:image/") else {
        return false;
    };
    match rest.split_once(',') {
        Some((header, payload)) => header.ends_with(";base64") && !payload.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

    fn errors_of(draft: PostDraft) -> Vec<String> {
        match draft.validate(Utc::now()) {
            Err(DomainError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_draft_becomes_new_post() {
        let now = Utc::now();
        let post = PostDraft::new(IMAGE, "Launch day", "2026-12-01")
            .validate(now)
            .unwrap();
        assert_eq!(post.text, "Launch day");
        assert_eq!(post.date, NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
        assert_eq!(post.created_at, now);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let errors = errors_of(PostDraft::default());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn empty_strings_count_as_missing() {
        let errors = errors_of(PostDraft::new(IMAGE, "", "2026-12-01"));
        assert_eq!(errors, vec!["text is required".to_string()]);
    }

    #[test]
    fn rejects_non_image_payloads() {
        for image in [
            "https://example.com/cat.png",
            "data:text/plain;base64,aGk=",
            "data:image/png;base64,",
            "data:image/png,raw",
        ] {
            let errors = errors_of(PostDraft::new(image, "caption", "2026-12-01"));
            assert_eq!(errors.len(), 1, "{image}");
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        let errors = errors_of(PostDraft::new(IMAGE, "caption", "01/12/2026"));
        assert!(errors[0].contains("01/12/2026"));
    }
}
