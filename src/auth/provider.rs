//! Typed Git provider names and alias handling.

use std::fmt;

/// Git hosting providers a token can be stored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GitProviderName {
    GitHub,
    GitLab,
}

impl GitProviderName {
    pub const ALL: [Self; 2] = [Self::GitHub, Self::GitLab];

    /// Canonical provider name, also used as the token store key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "GitHub",
            Self::GitLab => "GitLab",
        }
    }

    /// Parse user-facing provider aliases into a typed provider name.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "github" | "gh" | "github.com" => Some(Self::GitHub),
            "gitlab" | "gl" | "gitlab.com" => Some(Self::GitLab),
            _ => None,
        }
    }
}

impl fmt::Display for GitProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_case_insensitively() {
        assert_eq!(GitProviderName::parse("GitHub"), Some(GitProviderName::GitHub));
        assert_eq!(GitProviderName::parse("gh"), Some(GitProviderName::GitHub));
        assert_eq!(GitProviderName::parse(" gitlab "), Some(GitProviderName::GitLab));
        assert_eq!(GitProviderName::parse("bitbucket"), None);
    }

    #[test]
    fn display_uses_canonical_name() {
        assert_eq!(GitProviderName::GitHub.to_string(), "GitHub");
    }
}
