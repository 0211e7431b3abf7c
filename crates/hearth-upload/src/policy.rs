//! Content-type admission policy.
//!
//! Decides whether a sniffed content type may be uploaded by a given user.
//! Per-user allowances are evaluated first, in configured order; once any
//! per-user pattern matches the uploader, the general allow list no longer
//! applies to that upload, even if none of the matching entries allowed the
//! type.

use hearth_core::constants::NO_APPLICABLE_UPLOAD_USER;
use hearth_core::UploadsConfig;
use wildmatch::WildMatch;

/// Returns whether `sniffed` may be uploaded by `user_id`.
///
/// `reported` is the uploader's declared content type; it carries no weight
/// in the decision and is logged for diagnosis only.
pub fn is_allowed(sniffed: &str, reported: &str, user_id: &str, config: &UploadsConfig) -> bool {
    let mut allowed = false;
    let mut user_matched = false;

    if user_id != NO_APPLICABLE_UPLOAD_USER {
        for entry in &config.per_user_allowed_types {
            if WildMatch::new(&entry.user_pattern).matches(user_id) {
                if !user_matched {
                    tracing::info!(user_id = %user_id, "Per-user allowed types policy found");
                    user_matched = true;
                }
                for pattern in &entry.allowed_types {
                    if WildMatch::new(pattern).matches(sniffed) {
                        allowed = true;
                        tracing::info!(
                            sniffed = %sniffed,
                            reported = %reported,
                            user_id = %user_id,
                            "Content type allowed by per-user policy"
                        );
                        break;
                    }
                }
            }

            if allowed {
                break;
            }
        }
    }

    if !user_matched && !allowed {
        tracing::debug!("Checking general allowed types; no matching per-user policy");
        allowed = config.allowed_types.is_empty()
            || config
                .allowed_types
                .iter()
                .any(|pattern| WildMatch::new(pattern).matches(sniffed));
    }

    allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::PerUserAllowance;

    fn config(
        allowed_types: &[&str],
        per_user: &[(&str, &[&str])],
    ) -> UploadsConfig {
        UploadsConfig {
            max_size_bytes: 0,
            allowed_types: allowed_types.iter().map(|s| s.to_string()).collect(),
            per_user_allowed_types: per_user
                .iter()
                .map(|(user, types)| PerUserAllowance {
                    user_pattern: user.to_string(),
                    allowed_types: types.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_lists_allow_everything() {
        let cfg = config(&[], &[]);
        assert!(is_allowed("application/zip", "image/png", "@alice:h", &cfg));
        assert!(is_allowed("image/png", "image/png", "", &cfg));
    }

    #[test]
    fn general_glob_allows_matching_type() {
        let cfg = config(&["image/*"], &[]);
        assert!(is_allowed("image/png", "image/png", "@alice:h", &cfg));
        assert!(!is_allowed("application/zip", "image/png", "@alice:h", &cfg));
    }

    #[test]
    fn decision_runs_on_sniffed_type_only() {
        let cfg = config(&["image/*"], &[]);
        // Reported claims an image but the bytes say otherwise.
        assert!(!is_allowed("application/zip", "image/png", "@alice:h", &cfg));
    }

    #[test]
    fn per_user_allowance_overrides_general_list() {
        let cfg = config(&[], &[("@alice:*", &["video/mp4"])]);
        assert!(is_allowed("video/mp4", "video/mp4", "@alice:h", &cfg));
        // Bob has no per-user entry; general list is empty, so open.
        assert!(is_allowed("video/mp4", "video/mp4", "@bob:h", &cfg));
    }

    #[test]
    fn per_user_match_with_no_globs_denies() {
        let cfg = config(&[], &[("@charlie:*", &[])]);
        // Charlie matched a per-user entry with zero globs: denied even
        // though the general list would have allowed anything.
        assert!(!is_allowed("video/mp4", "video/mp4", "@charlie:h", &cfg));
    }

    #[test]
    fn user_match_suppresses_general_list() {
        let cfg = config(&["image/*"], &[("@alice:*", &["video/mp4"])]);
        // Alice matched the per-user entry, so the general image/* rule no
        // longer applies to her uploads.
        assert!(!is_allowed("image/png", "image/png", "@alice:h", &cfg));
        assert!(is_allowed("video/mp4", "video/mp4", "@alice:h", &cfg));
        // Bob still goes through the general list.
        assert!(is_allowed("image/png", "image/png", "@bob:h", &cfg));
    }

    #[test]
    fn later_per_user_entry_can_still_allow() {
        let cfg = config(
            &[],
            &[("@alice:*", &["audio/*"]), ("@*:h", &["video/mp4"])],
        );
        // First entry matches alice but allows nothing for mp4; the second
        // matching entry grants it.
        assert!(is_allowed("video/mp4", "video/mp4", "@alice:h", &cfg));
    }

    #[test]
    fn sentinel_user_skips_per_user_policy() {
        let cfg = config(&["image/*"], &[("*", &["video/mp4"])]);
        // The sentinel never matches per-user entries, even a catch-all.
        assert!(is_allowed("image/png", "image/png", "", &cfg));
        assert!(!is_allowed("video/mp4", "video/mp4", "", &cfg));
    }
}
