//! Well-known cache keys used by the market application.

use std::fmt;

/// Keys the application caches under. The cache accepts any key; these are
/// the ones with an agreed meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Market rates per species
    Rates,
    /// Harbour list
    Harbours,
    /// Species list
    Species,
    /// Most recent AI market analysis
    LastAnalysisResult,
}

impl CacheKey {
    pub const ALL: [CacheKey; 4] = [
        CacheKey::Rates,
        CacheKey::Harbours,
        CacheKey::Species,
        CacheKey::LastAnalysisResult,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKey::Rates => "rates",
            CacheKey::Harbours => "harbours",
            CacheKey::Species => "species",
            CacheKey::LastAnalysisResult => "last_analysis_result",
        }
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_key_names_are_unique() {
        let names: HashSet<&str> = CacheKey::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names.len(), CacheKey::ALL.len());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(CacheKey::LastAnalysisResult.to_string(), "last_analysis_result");
        assert_eq!(CacheKey::Rates.as_ref(), "rates");
    }
}
