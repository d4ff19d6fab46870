use url::Url;
use watchlist_models::Platform;

use crate::descriptor::PLATFORMS;

/// Result of classifying a URL against the supported-site set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteStatus {
    Unsupported,
    Supported {
        platform: Platform,
        on_watchlist_page: bool,
        watchlist_url: &'static str,
    },
}

impl SiteStatus {
    pub fn platform(&self) -> Option<Platform> {
        match self {
            SiteStatus::Supported { platform, .. } => Some(*platform),
            SiteStatus::Unsupported => None,
        }
    }

    pub fn is_watchlist_page(&self) -> bool {
        matches!(
            self,
            SiteStatus::Supported {
                on_watchlist_page: true,
                ..
            }
        )
    }
}

/// True when `hostname` is the registrable domain itself or any subdomain
/// of it. Hosts that merely contain the domain elsewhere in the name
/// ("notnetflix.com.evil.example") do not match.
fn hostname_matches(hostname: &str, domain: &str) -> bool {
    hostname == domain || hostname.ends_with(&format!(".{}", domain))
}

/// Classify an absolute URL. Pure: no network or DOM access; malformed
/// URLs classify as Unsupported rather than erroring.
pub fn classify(raw_url: &str) -> SiteStatus {
    let url = match Url::parse(raw_url) {
        Ok(url) => url,
        Err(_) => return SiteStatus::Unsupported,
    };
    let hostname = match url.host_str() {
        Some(host) => host,
        None => return SiteStatus::Unsupported,
    };

    for descriptor in PLATFORMS {
        if descriptor
            .domains
            .iter()
            .any(|domain| hostname_matches(hostname, domain))
        {
            let path = url.path();
            let on_watchlist_page = descriptor
                .watchlist_fragments
                .iter()
                .any(|fragment| path.contains(fragment));
            return SiteStatus::Supported {
                platform: descriptor.platform,
                on_watchlist_page,
                watchlist_url: descriptor.watchlist_url,
            };
        }
    }

    SiteStatus::Unsupported
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_watchlist_pages() {
        let cases = [
            ("https://www.netflix.com/browse/my-list", Platform::Netflix),
            ("https://www.primevideo.com/watchlist", Platform::PrimeVideo),
            ("https://www.amazon.com/gp/video/watchlist", Platform::PrimeVideo),
            ("https://www.hulu.com/my-stuff", Platform::Hulu),
            ("https://www.disneyplus.com/watchlist", Platform::DisneyPlus),
            ("https://tv.apple.com/us/library", Platform::AppleTv),
            ("https://play.max.com/lists/watchlist", Platform::Max),
            ("https://www.peacocktv.com/watch/my-stuff", Platform::Peacock),
            (
                "https://www.paramountplus.com/account/watchlist",
                Platform::ParamountPlus,
            ),
        ];
        for (url, platform) in cases {
            let status = classify(url);
            assert_eq!(status.platform(), Some(platform), "{}", url);
            assert!(status.is_watchlist_page(), "{}", url);
        }
    }

    #[test]
    fn test_supported_site_off_watchlist_page() {
        let status = classify("https://www.netflix.com/browse/genre/83");
        assert_eq!(status.platform(), Some(Platform::Netflix));
        assert!(!status.is_watchlist_page());
        match status {
            SiteStatus::Supported { watchlist_url, .. } => {
                assert_eq!(watchlist_url, "https://www.netflix.com/browse/my-list");
            }
            SiteStatus::Unsupported => panic!("expected supported"),
        }
    }

    #[test]
    fn test_bare_domain_and_subdomains_match() {
        assert_eq!(
            classify("https://netflix.com/browse/my-list").platform(),
            Some(Platform::Netflix)
        );
        assert_eq!(
            classify("https://beta.www.netflix.com/browse/my-list").platform(),
            Some(Platform::Netflix)
        );
    }

    #[test]
    fn test_lookalike_domains_rejected() {
        assert_eq!(classify("https://notnetflix.com/browse/my-list"), SiteStatus::Unsupported);
        assert_eq!(
            classify("https://notnetflix.com.evil.example/browse/my-list"),
            SiteStatus::Unsupported
        );
        assert_eq!(
            classify("https://netflix.com.evil.example/browse/my-list"),
            SiteStatus::Unsupported
        );
    }

    #[test]
    fn test_malformed_urls_are_unsupported() {
        assert_eq!(classify(""), SiteStatus::Unsupported);
        assert_eq!(classify("not a url"), SiteStatus::Unsupported);
        assert_eq!(classify("mailto:user@netflix.com"), SiteStatus::Unsupported);
    }

    #[test]
    fn test_unsupported_streaming_site() {
        assert_eq!(classify("https://www.crunchyroll.com/watchlist"), SiteStatus::Unsupported);
    }
}
