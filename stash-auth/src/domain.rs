/// Email domains admitted by default.
pub const DEFAULT_ALLOWED_DOMAINS: [&str; 2] = ["peerplay.com", "peerplay.io"];

/// Set of email domains allowed through the gate, stored lower-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedDomains {
    domains: Vec<String>,
}

impl AllowedDomains {
    pub fn new<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            domains: domains
                .into_iter()
                .map(|d| d.as_ref().trim().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }

    /// True iff the part of `email` after the last `@`, lower-cased, is one
    /// of the allowed domains.
    pub fn permits(&self, email: &str) -> bool {
        let Some((_, domain)) = email.rsplit_once('@') else {
            return false;
        };
        let domain = domain.to_ascii_lowercase();
        self.domains.iter().any(|allowed| *allowed == domain)
    }
}

impl Default for AllowedDomains {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_DOMAINS)
    }
}

/// Check an email against the default allowlist.
pub fn check_authorization(email: &str) -> bool {
    AllowedDomains::default().permits(email)
}
