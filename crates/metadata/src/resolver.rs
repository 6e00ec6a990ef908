//! Resolution rules layered on top of the raw metadata fetch.
//!
//! The resolver decides whether a lookup happens at all: an absent target
//! falls back to the host's current page, only leading-`/` values are treated
//! as resource paths, and every transport failure degrades to "no data"
//! without surfacing to the author.

use std::sync::Arc;

use teaser_types::Resolution;
use tracing::debug;

use crate::MetadataFetch;

/// Applies the target-selection and failure-swallowing rules around a
/// [`MetadataFetch`] implementation.
///
/// There is deliberately no cancellation and no sequence token here: callers
/// apply completions in the order they arrive, and the last completion wins.
#[derive(Clone)]
pub struct MetadataResolver {
    fetch: Arc<dyn MetadataFetch>,
    current_page: Option<String>,
}

impl MetadataResolver {
    /// Build a resolver over a fetch implementation.
    ///
    /// # Arguments
    /// - `fetch`: the transport (or a test fake).
    /// - `current_page`: the host dialog's current page path, used when no
    ///   explicit target is in force.
    pub fn new(fetch: Arc<dyn MetadataFetch>, current_page: Option<String>) -> Self {
        Self { fetch, current_page }
    }

    /// Resolve title/description metadata for an effective target.
    ///
    /// An absent target falls back to the current page before giving up.
    /// Any value not starting with `/` is a literal text link, not a
    /// resource reference, and short-circuits without a request.
    pub async fn resolve(&self, target: Option<&str>) -> Resolution {
        let effective = match target {
            Some(value) => Some(value.to_string()),
            None => self.current_page.clone(),
        };
        let Some(path) = effective else {
            return Resolution::Skipped;
        };
        if !path.starts_with('/') {
            return Resolution::Skipped;
        }

        match self.fetch.fetch(&path).await {
            Ok(result) => Resolution::Data(result),
            Err(error) => {
                debug!(%path, %error, "metadata fetch failed, treating as no data");
                Resolution::NoData
            }
        }
    }

    /// Resolve just a title for one resource path.
    ///
    /// Used by the auto-title behavior of action rows; returns `None` for
    /// non-path values, fetch failures, and documents without a title.
    pub async fn title_for(&self, path: &str) -> Option<String> {
        if !path.starts_with('/') {
            return None;
        }
        match self.fetch.fetch(path).await {
            Ok(result) => result.title,
            Err(error) => {
                debug!(%path, %error, "auto-title fetch failed, leaving title empty");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use teaser_types::MetadataResult;

    struct CountingFetch {
        calls: AtomicUsize,
        response: Result<MetadataResult, ()>,
    }

    #[async_trait]
    impl MetadataFetch for CountingFetch {
        async fn fetch(&self, _path: &str) -> Result<MetadataResult, MetadataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(result) => Ok(result.clone()),
                Err(()) => Err(MetadataError::Malformed(serde_json::from_str::<serde_json::Value>("{").unwrap_err())),
            }
        }
    }

    fn page_metadata() -> MetadataResult {
        MetadataResult {
            title: Some("Page Title".into()),
            description: Some("Page description".into()),
        }
    }

    #[tokio::test]
    async fn non_path_targets_short_circuit_without_a_request() {
        let fetch = Arc::new(CountingFetch {
            calls: AtomicUsize::new(0),
            response: Ok(page_metadata()),
        });
        let resolver = MetadataResolver::new(fetch.clone(), None);

        assert_eq!(resolver.resolve(Some("https://example.com")).await, Resolution::Skipped);
        assert_eq!(resolver.resolve(Some("")).await, Resolution::Skipped);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn absent_target_falls_back_to_current_page() {
        let fetch = Arc::new(CountingFetch {
            calls: AtomicUsize::new(0),
            response: Ok(page_metadata()),
        });
        let resolver = MetadataResolver::new(fetch.clone(), Some("/content/current".into()));

        assert_eq!(resolver.resolve(None).await, Resolution::Data(page_metadata()));
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn absent_target_without_current_page_is_skipped() {
        let fetch = Arc::new(CountingFetch {
            calls: AtomicUsize::new(0),
            response: Ok(page_metadata()),
        });
        let resolver = MetadataResolver::new(fetch.clone(), None);

        assert_eq!(resolver.resolve(None).await, Resolution::Skipped);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fetch_failure_is_swallowed_as_no_data() {
        let fetch = Arc::new(CountingFetch {
            calls: AtomicUsize::new(0),
            response: Err(()),
        });
        let resolver = MetadataResolver::new(fetch, None);

        assert_eq!(resolver.resolve(Some("/content/a")).await, Resolution::NoData);
        assert_eq!(resolver.title_for("/content/a").await, None);
    }

    #[tokio::test]
    async fn title_for_gates_on_resource_paths() {
        let fetch = Arc::new(CountingFetch {
            calls: AtomicUsize::new(0),
            response: Ok(page_metadata()),
        });
        let resolver = MetadataResolver::new(fetch.clone(), None);

        assert_eq!(resolver.title_for("mailto:someone@example.com").await, None);
        assert_eq!(fetch.calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.title_for("/content/a").await, Some("Page Title".into()));
    }
}
