/// Title-prefix filter for the synthetic aggregation folders some servers
/// inject (MiniDLNA's "All Artists", "All Albums", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderFilter {
    skip_prefixes: Vec<String>,
}

pub const DEFAULT_SKIP_PREFIX: &str = "All ";

impl Default for FolderFilter {
    fn default() -> Self {
        Self::new([DEFAULT_SKIP_PREFIX])
    }
}

impl FolderFilter {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skip_prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// A filter that keeps every folder.
    pub fn keep_all() -> Self {
        Self {
            skip_prefixes: Vec::new(),
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.skip_prefixes
    }

    pub fn skips(&self, title: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|prefix| title.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skips_all_prefix() {
        let filter = FolderFilter::default();
        assert!(filter.skips("All Music"));
        assert!(filter.skips("All "));
        assert!(!filter.skips("Rock"));
        assert!(!filter.skips("Allman Brothers"));
        assert!(!filter.skips("all music"));
    }

    #[test]
    fn test_custom_prefixes() {
        let filter = FolderFilter::new(["Tous ", "-", ""]);
        assert_eq!(filter.prefixes().len(), 2);
        assert!(filter.skips("Tous les albums"));
        assert!(filter.skips("-recent-"));
        assert!(!filter.skips("All Music"));
    }

    #[test]
    fn test_keep_all() {
        assert!(!FolderFilter::keep_all().skips("All Music"));
    }
}
