/// Extract the host from a link for display.
/// Example: "https://www.bbc.com/news/123" -> Some("bbc.com")
pub fn link_domain(url: &str) -> Option<String> {
    let url = url.trim();

    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };

    let host = without_scheme
        .split(['/', '?', '#'])
        .next()?
        .rsplit('@')
        .next()?;
    let domain = host.split(':').next()?;
    let domain = domain.strip_prefix("www.").unwrap_or(domain);

    match domain.is_empty() {
        true => None,
        false => Some(domain.to_lowercase()),
    }
}

/// Only absolute web links are handed to the system browser.
pub fn is_openable(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    (lower.starts_with("http://") || lower.starts_with("https://")) && link_domain(url).is_some()
}
