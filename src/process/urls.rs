use std::borrow::Cow;

/// Known prefixes and their short tokens. Order matters: the twitter-specific
/// prefix of each scheme must be tried before the bare scheme.
const PREFIX_TOKENS: &[(&str, &str)] = &[
    ("https://twitter.com/", "@T/"),
    ("https://", "@H/"),
    ("http://twitter.com/", "@t/"),
    ("http://", "@h/"),
];

/// Rewrite a known URL prefix to its short token. Matching is exact and
/// case-sensitive; everything after the prefix is kept as-is.
pub fn shorten_url_prefix(url: &str) -> Cow<'_, str> {
    for (prefix, token) in PREFIX_TOKENS {
        if let Some(rest) = url.strip_prefix(prefix) {
            return Cow::Owned(format!("{token}{rest}"));
        }
    }
    Cow::Borrowed(url)
}

/// Join the non-empty entries with a single space, keeping input order.
pub fn combine_tco<I, S>(urls: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for url in urls {
        let url = url.as_ref();
        if url.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(url);
    }
    out
}
