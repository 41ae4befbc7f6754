//! Inline style filtering
//!
//! A `style` attribute is treated as a flat list of `property:value`
//! declarations separated by `;`. No CSS grammar is applied beyond that:
//! declarations are kept or dropped whole, by property whitelist and by the
//! URL whitelist for any embedded `url(...)`.

use std::collections::HashSet;

/// Result of filtering one `style` attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOutcome {
    /// Rebuilt declaration list, or `None` when nothing survived
    pub style: Option<String>,
    /// At least one declaration was dropped
    pub removed: bool,
    /// At least one `url(...)` failed the URL whitelist
    pub blocked_url: bool,
}

/// Filters a `style` attribute value
///
/// Each declaration is split on its first `:`. Declarations without a colon,
/// or with a further colon outside a `url(...)` segment, are dropped. A
/// declaration survives when its property (trimmed, inner spaces removed) is
/// in `allow_style` and every embedded `url(...)` starts with an entry of
/// `allow_url`. An empty `allow_url` disables the URL check.
///
/// Blank candidates, such as the one after a trailing `;`, are ignored.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use html_tailor::style::filter_style;
///
/// let allow: HashSet<String> = ["color".to_string()].into();
/// let outcome = filter_style("color:red;display:flex", &allow, &[]);
/// assert_eq!(outcome.style.as_deref(), Some("color:red"));
/// assert!(outcome.removed);
/// ```
pub fn filter_style(style: &str, allow_style: &HashSet<String>, allow_url: &[String]) -> StyleOutcome {
    let mut kept: Vec<String> = Vec::new();
    let mut removed = false;
    let mut blocked_url = false;

    for candidate in style.trim().split(';') {
        if candidate.trim().is_empty() {
            continue;
        }
        let Some((property, value)) = candidate.split_once(':') else {
            removed = true;
            continue;
        };
        if has_stray_colon(value) {
            removed = true;
            continue;
        }

        let property = property.trim().replace(' ', "");
        let value = value.trim();
        let url_ok = url_allowed(value, allow_url);
        if !url_ok {
            blocked_url = true;
        }

        if url_ok && allow_style.contains(&property) {
            kept.push(format!("{}:{}", property, value));
        } else {
            removed = true;
        }
    }

    StyleOutcome {
        style: if kept.is_empty() {
            None
        } else {
            Some(kept.join(";"))
        },
        removed,
        blocked_url,
    }
}

/// Returns true if `value` has a `:` outside every `url(...)` segment
fn has_stray_colon(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    let mut rest = lower.as_str();
    loop {
        let Some(start) = rest.find("url(") else {
            return rest.contains(':');
        };
        if rest[..start].contains(':') {
            return true;
        }
        let inside = &rest[start + 4..];
        match inside.find(')') {
            Some(end) => rest = &inside[end + 1..],
            // Unterminated url( runs to the end of the value
            None => return false,
        }
    }
}

/// Checks every `url(...)` target in a declaration value against the whitelist
///
/// The comparison runs on a lowercased copy with spaces, carriage returns,
/// newlines and quotes removed. The kept declaration retains its original
/// spelling.
fn url_allowed(value: &str, allow_url: &[String]) -> bool {
    if allow_url.is_empty() {
        return true;
    }
    let normalized: String = value
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\r' | '\n'))
        .collect();

    normalized.split("url(").skip(1).all(|target| {
        let target: String = target.chars().filter(|c| !matches!(c, '"' | '\'')).collect();
        allow_url
            .iter()
            .any(|prefix| target.starts_with(prefix.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn urls(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_keeps_whitelisted_properties_in_order() {
        let outcome = filter_style(
            "display:flex;color:red;float:left;margin:0",
            &set(&["margin", "color"]),
            &[],
        );
        assert_eq!(outcome.style.as_deref(), Some("color:red;margin:0"));
        assert!(outcome.removed);
        assert!(!outcome.blocked_url);
    }

    #[test]
    fn test_nothing_dropped_leaves_flag_clear() {
        let outcome = filter_style(" color : red ; ", &set(&["color"]), &[]);
        assert_eq!(outcome.style.as_deref(), Some("color:red"));
        assert!(!outcome.removed);
    }

    #[test]
    fn test_property_inner_spaces_removed() {
        let outcome = filter_style("font - size: 12px", &set(&["font-size"]), &[]);
        assert_eq!(outcome.style.as_deref(), Some("font-size:12px"));
    }

    #[test]
    fn test_empty_result_is_none() {
        let outcome = filter_style("position:fixed", &set(&["color"]), &[]);
        assert_eq!(outcome.style, None);
        assert!(outcome.removed);
    }

    #[test]
    fn test_declaration_without_colon_dropped() {
        let outcome = filter_style("color red;color:blue", &set(&["color"]), &[]);
        assert_eq!(outcome.style.as_deref(), Some("color:blue"));
        assert!(outcome.removed);
    }

    #[test]
    fn test_extra_colon_outside_url_dropped() {
        let outcome = filter_style("color:red:blue", &set(&["color"]), &[]);
        assert_eq!(outcome.style, None);
        assert!(outcome.removed);
    }

    #[test]
    fn test_colon_inside_url_tolerated() {
        let outcome = filter_style(
            "background:url(http://host:8080/x.png)",
            &set(&["background"]),
            &urls(&["http://host"]),
        );
        assert_eq!(
            outcome.style.as_deref(),
            Some("background:url(http://host:8080/x.png)")
        );
        assert!(!outcome.removed);
    }

    #[test]
    fn test_url_outside_whitelist_blocked() {
        let outcome = filter_style(
            "background-image: url('https://evil.example/a.png')",
            &set(&["background-image"]),
            &urls(&["https://cdn.example/"]),
        );
        assert_eq!(outcome.style, None);
        assert!(outcome.removed);
        assert!(outcome.blocked_url);
    }

    #[test]
    fn test_url_check_is_case_and_whitespace_insensitive() {
        let outcome = filter_style(
            "background: URL( \"HTTPS://CDN.example/a.png\" )",
            &set(&["background"]),
            &urls(&["https://cdn.example/"]),
        );
        assert_eq!(
            outcome.style.as_deref(),
            Some("background:URL( \"HTTPS://CDN.example/a.png\" )")
        );
    }

    #[test]
    fn test_every_url_is_checked() {
        let outcome = filter_style(
            "background:url(https://cdn.example/a.png),url(https://evil.example/b.png)",
            &set(&["background"]),
            &urls(&["https://cdn.example/"]),
        );
        assert_eq!(outcome.style, None);
        assert!(outcome.blocked_url);
    }

    #[test]
    fn test_no_url_whitelist_skips_url_check() {
        let outcome = filter_style(
            "background:url(https://anywhere.example/a.png)",
            &set(&["background"]),
            &[],
        );
        assert!(outcome.style.is_some());
        assert!(!outcome.blocked_url);
    }

    #[test]
    fn test_has_stray_colon() {
        assert!(!has_stray_colon("red"));
        assert!(has_stray_colon("a:b"));
        assert!(!has_stray_colon("url(http://x:1/)"));
        assert!(has_stray_colon("url(http://x:1/) x:y"));
        assert!(!has_stray_colon("url(data:image/png"));
    }
}
