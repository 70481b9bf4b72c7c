// The recurring authorization rule: every entry endpoint is scoped to the
// slug owner, and mutations are only allowed on the current calendar date.
use chrono::{NaiveDate, Utc};

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;

/// Server-side "today", the reference date for the mutation gate.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// The authenticated user may only operate under their own slug. Runs before
/// anything else; no resource state is read on failure.
pub fn check_ownership(auth: &AuthUser, slug: &str, noun: &str) -> Result<(), ApiError> {
    if auth.slug != slug {
        tracing::warn!(
            user = %auth.slug,
            path_slug = %slug,
            "slug mismatch, rejecting request"
        );
        return Err(ApiError::forbidden(format!(
            "You are not allowed to access {} of other users.",
            noun
        )));
    }
    Ok(())
}

/// Parse the `date_request` path segment as `YYYY-MM-DD`.
pub fn parse_date_segment(date_request: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(date_request, "%Y-%m-%d").map_err(|_| ApiError::invalid_date())
}

/// Mutations (create, update, delete) must carry today's date in the path.
/// The comparison is always against the current date, never the entry's
/// stored creation date.
pub fn check_current_date(date: NaiveDate, noun: &str) -> Result<(), ApiError> {
    if date != today() {
        return Err(ApiError::forbidden(format!(
            "You are not allowed to change {} for past or future dates.",
            noun
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn auth_user(slug: &str) -> AuthUser {
        AuthUser {
            id: 1,
            email: "ada@example.com".to_string(),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn ownership_accepts_matching_slug() {
        let auth = auth_user("ada-lovelace-1234");
        assert!(check_ownership(&auth, "ada-lovelace-1234", "notes").is_ok());
    }

    #[test]
    fn ownership_rejects_foreign_slug() {
        let auth = auth_user("ada-lovelace-1234");
        let err = check_ownership(&auth, "grace-hopper-5678", "notes").unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.to_json(),
            serde_json::json!({ "error": "You are not allowed to access notes of other users." })
        );
    }

    #[test]
    fn date_segment_parses_iso_dates() {
        assert_eq!(
            parse_date_segment("2023-05-17").unwrap(),
            NaiveDate::from_ymd_opt(2023, 5, 17).unwrap()
        );
    }

    #[test]
    fn date_segment_rejects_garbage() {
        for bad in ["17-05-2023", "2023/05/17", "not-a-date", "2023-13-01", ""] {
            let err = parse_date_segment(bad).unwrap_err();
            assert_eq!(err.status_code(), 400);
            assert_eq!(
                err.to_json(),
                serde_json::json!({ "error": "Invalid date format. Please use YYYY-MM-DD." })
            );
        }
    }

    #[test]
    fn current_date_gate_allows_today_only() {
        assert!(check_current_date(today(), "emotions").is_ok());

        let yesterday = today() - Duration::days(1);
        let err = check_current_date(yesterday, "emotions").unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(
            err.to_json(),
            serde_json::json!({
                "error": "You are not allowed to change emotions for past or future dates."
            })
        );

        let tomorrow = today() + Duration::days(1);
        assert!(check_current_date(tomorrow, "wins").is_err());
    }
}
