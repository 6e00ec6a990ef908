//! Auto-title guards for action rows.
//!
//! When an author commits a resource-path link on an action row whose title
//! is still empty, the row's title is filled from the resolved page title.
//! Both ends of the round trip are guarded: nothing is issued for non-path
//! links or populated titles, and a late-arriving result re-checks emptiness
//! instead of overwriting text the author typed in the meantime.

/// Whether committing `link` should issue a title resolution at all.
pub fn should_autofill(link: &str, current_title: &str) -> bool {
    link.starts_with('/') && current_title.is_empty()
}

/// Whether a resolved title may still be written when its response arrives.
pub fn accept_resolved_title(current_title: &str) -> bool {
    current_title.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_resource_paths_with_empty_titles_qualify() {
        assert!(should_autofill("/content/page", ""));
        assert!(!should_autofill("https://example.com", ""));
        assert!(!should_autofill("", ""));
        assert!(!should_autofill("/content/page", "Already titled"));
    }

    #[test]
    fn late_results_are_rejected_once_a_title_exists() {
        assert!(accept_resolved_title(""));
        assert!(!accept_resolved_title("typed meanwhile"));
    }
}
