use watchlist_models::Platform;

/// Static routing data for one supported platform. Never mutated at runtime.
#[derive(Debug, Clone, Copy)]
pub struct PlatformDescriptor {
    pub platform: Platform,
    /// Registrable domains owned by the platform. A hostname matches when it
    /// equals the domain or is a subdomain of it.
    pub domains: &'static [&'static str],
    /// Path substrings identifying the watchlist page on that platform.
    pub watchlist_fragments: &'static [&'static str],
    /// Canonical watchlist URL to navigate to when not already on it.
    pub watchlist_url: &'static str,
}

/// The supported-site set. Selector breadth lives in the extractors; this
/// table only routes URLs.
pub const PLATFORMS: &[PlatformDescriptor] = &[
    PlatformDescriptor {
        platform: Platform::Netflix,
        domains: &["netflix.com"],
        watchlist_fragments: &["/browse/my-list"],
        watchlist_url: "https://www.netflix.com/browse/my-list",
    },
    PlatformDescriptor {
        platform: Platform::PrimeVideo,
        domains: &["primevideo.com", "amazon.com"],
        watchlist_fragments: &["/watchlist", "/wl"],
        watchlist_url: "https://www.primevideo.com/watchlist",
    },
    PlatformDescriptor {
        platform: Platform::Hulu,
        domains: &["hulu.com"],
        watchlist_fragments: &["/my-stuff"],
        watchlist_url: "https://www.hulu.com/my-stuff",
    },
    PlatformDescriptor {
        platform: Platform::DisneyPlus,
        domains: &["disneyplus.com"],
        watchlist_fragments: &["/watchlist"],
        watchlist_url: "https://www.disneyplus.com/watchlist",
    },
    PlatformDescriptor {
        platform: Platform::AppleTv,
        domains: &["apple.com"],
        watchlist_fragments: &["/library"],
        watchlist_url: "https://tv.apple.com/us/library",
    },
    PlatformDescriptor {
        platform: Platform::Max,
        domains: &["max.com"],
        watchlist_fragments: &["/lists/watchlist"],
        watchlist_url: "https://play.max.com/lists/watchlist",
    },
    PlatformDescriptor {
        platform: Platform::Peacock,
        domains: &["peacocktv.com"],
        watchlist_fragments: &["/watch/my-stuff"],
        watchlist_url: "https://www.peacocktv.com/watch/my-stuff",
    },
    PlatformDescriptor {
        platform: Platform::ParamountPlus,
        domains: &["paramountplus.com"],
        watchlist_fragments: &["/account/watchlist"],
        watchlist_url: "https://www.paramountplus.com/account/watchlist",
    },
];

pub fn descriptor_for(platform: Platform) -> &'static PlatformDescriptor {
    // Completeness is pinned by test_every_platform_has_a_descriptor;
    // a gap here is a routing table bug, never something to paper over.
    PLATFORMS
        .iter()
        .find(|d| d.platform == platform)
        .expect("every Platform variant has a PLATFORMS entry")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_platform_has_a_descriptor() {
        for platform in Platform::ALL {
            assert_eq!(descriptor_for(platform).platform, platform);
        }
    }

    #[test]
    fn test_watchlist_urls_are_on_own_domains() {
        for descriptor in PLATFORMS {
            let url = url::Url::parse(descriptor.watchlist_url).unwrap();
            let host = url.host_str().unwrap();
            assert!(
                descriptor
                    .domains
                    .iter()
                    .any(|d| host == *d || host.ends_with(&format!(".{}", d))),
                "{} not under {:?}",
                descriptor.watchlist_url,
                descriptor.domains
            );
        }
    }
}
