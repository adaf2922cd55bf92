// Product branding: which logo, name and favicon a page shows, keyed on the
// product id the Keycloak realm exposes.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Product {
    HyprEdge,
    Trellix,
}

impl Default for Product {
    fn default() -> Self {
        Product::HyprEdge
    }
}

impl Product {
    /// Case-insensitive; unknown or empty ids fall back to the default product.
    pub fn from_id(id: &str) -> Product {
        match id.trim().to_ascii_lowercase().as_str() {
            "trellix" => Product::Trellix,
            _ => Product::HyprEdge,
        }
    }

    pub fn as_id(&self) -> &'static str {
        match self {
            Product::HyprEdge => "hypredge",
            Product::Trellix => "trellix",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Product::HyprEdge => "HyprEdge",
            Product::Trellix => "Trellix",
        }
    }

    pub fn logo_asset(&self) -> &'static str {
        match self {
            Product::HyprEdge => "hypredge_logo.svg",
            Product::Trellix => "trellix_logo.svg",
        }
    }
}

/// Icon path for a raw product id, case preserved.
pub fn favicon_path(product_id: &str) -> String {
    format!("/favicon-{}.svg", product_id)
}

/// Joins URL path segments so that exactly one `/` separates each pair.
/// A leading slash on the first segment and a trailing one on the last are kept.
pub fn join_path(segments: &[&str]) -> String {
    let last = segments.len().saturating_sub(1);
    segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| {
            let mut segment: &str = segment;
            if idx != 0 {
                segment = segment.strip_prefix('/').unwrap_or(segment);
            }
            if idx != last {
                segment = segment.strip_suffix('/').unwrap_or(segment);
            }
            segment
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Image source for the masthead brand. A realm-supplied logo wins; one that
/// starts with `/` is served from the theme's resource URL.
pub fn brand_logo_src(custom_logo: Option<&str>, resource_url: &str, product: Product) -> String {
    match custom_logo.filter(|logo| !logo.is_empty()) {
        Some(logo) if logo.starts_with('/') => join_path(&[resource_url, logo]),
        Some(logo) => logo.to_owned(),
        None => join_path(&[resource_url, product.logo_asset()]),
    }
}

/// Where the masthead brand links to. A configured URL starting with `/` is
/// internal and resolves against the app's base path, other URLs are used
/// as-is. Nothing configured means the app root.
pub fn brand_href(logo_url: Option<&str>, base_path: &str) -> String {
    match logo_url.filter(|url| !url.is_empty()) {
        Some(url) if url.starts_with('/') => join_path(&[base_path, url]),
        Some(url) => url.to_owned(),
        None => join_path(&[base_path, "/"]),
    }
}

// Keycloak escapes `#` in referrer URLs as `_hash_`
const REFERRER_HASH: &str = "_hash_";

pub fn referrer_href(referrer_url: &str) -> String {
    referrer_url.replace(REFERRER_HASH, "#")
}
