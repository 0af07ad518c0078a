//! Inline `style` attribute helpers for show/hide

/// True if an inline style declares `display: none`
pub fn is_display_none(style: &str) -> bool {
    declarations(style).any(|(prop, value)| prop == "display" && value == "none")
}

/// Rewrite an inline style so that the element is shown or hidden.
///
/// Any existing `display` declaration is dropped; hiding appends
/// `display: none`. Returns `None` when nothing is left of the style.
pub fn with_display(style: Option<&str>, visible: bool) -> Option<String> {
    let mut kept: Vec<String> = style
        .map(|s| {
            declarations(s)
                .filter(|(prop, _)| *prop != "display")
                .map(|(prop, value)| format!("{prop}: {value}"))
                .collect()
        })
        .unwrap_or_default();

    if !visible {
        kept.push("display: none".to_string());
    }

    if kept.is_empty() {
        None
    } else {
        Some(format!("{};", kept.join("; ")))
    }
}

/// Display value an element of `tag` takes when a stylesheet rule keeps it
/// hidden after its inline `display` is cleared
pub fn default_display(tag: &str) -> &'static str {
    match tag {
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "table" => "table",
        "thead" | "tbody" | "tfoot" => "table-row-group",
        "a" | "b" | "i" | "img" | "input" | "label" | "select" | "span" => "inline",
        _ => "block",
    }
}

fn declarations(style: &str) -> impl Iterator<Item = (&str, &str)> {
    style.split(';').filter_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        Some((prop.trim(), value.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_display_none() {
        assert!(is_display_none("display: none;"));
        assert!(is_display_none("color: red;display:none"));
        assert!(!is_display_none("display: block;"));
        assert!(!is_display_none(""));
    }

    #[test]
    fn test_default_display_by_tag() {
        assert_eq!(default_display("tr"), "table-row");
        assert_eq!(default_display("td"), "table-cell");
        assert_eq!(default_display("input"), "inline");
        assert_eq!(default_display("div"), "block");
    }

    #[test]
    fn test_with_display_keeps_other_declarations() {
        assert_eq!(with_display(None, false).as_deref(), Some("display: none;"));
        assert_eq!(with_display(Some("display: none;"), true), None);
        assert_eq!(
            with_display(Some("color: red; display: none;"), true).as_deref(),
            Some("color: red;")
        );
        assert_eq!(
            with_display(Some("color: red"), false).as_deref(),
            Some("color: red; display: none;")
        );
    }
}
