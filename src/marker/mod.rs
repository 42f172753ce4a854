//! Provenance markers
//!
//! A marker is the single comment line recording that a named review was
//! applied to a file, e.g. `// performed "modernize" review on 2024-03-01`.
//! Recognition is plain substring containment on raw file content, so the
//! sweep can skip files without parsing them.

/// Build the marker line for a review.
///
/// With a date: `// performed "<name>" review on <date>`.
/// Without: `// performed "<name>" review`.
///
/// `name` is interpolated verbatim inside the double quotes — callers must
/// not pass names containing `"`. The date string is the caller's concern;
/// no format is enforced here (the CLI passes `YYYY-MM-DD`).
pub fn build_marker(name: &str, date: Option<&str>) -> String {
    match date {
        Some(date) => format!("// performed \"{name}\" review on {date}"),
        None => format!("// performed \"{name}\" review"),
    }
}

/// Whether `content` already carries `marker`.
///
/// Substring search, nothing more. Note the dateless marker is a prefix of
/// every dated one, so a dateless check also matches files marked in dated
/// mode; two markers dated differently never match each other.
pub fn has_marker(content: &str, marker: &str) -> bool {
    content.contains(marker)
}

#[cfg(test)]
mod tests {
    use super::{build_marker, has_marker};

    #[test]
    fn dateless_marker_format() {
        assert_eq!(build_marker("example", None), "// performed \"example\" review");
    }

    #[test]
    fn dated_marker_format() {
        assert_eq!(
            build_marker("example", Some("2023-10-01")),
            "// performed \"example\" review on 2023-10-01"
        );
    }

    #[test]
    fn marker_contains_name_and_date_literally() {
        let marker = build_marker("tighten-docs", Some("2024-12-31"));
        assert!(marker.contains("tighten-docs"));
        assert!(marker.contains("2024-12-31"));

        let dateless = build_marker("tighten-docs", None);
        assert!(dateless.contains("tighten-docs"));
    }

    #[test]
    fn multi_dot_names_are_not_truncated() {
        // Name derivation happens upstream; the tagger must embed whatever
        // it is handed, dots included.
        let marker = build_marker("a.b.c", Some("2023-10-01"));
        assert_eq!(marker, "// performed \"a.b.c\" review on 2023-10-01");
    }

    #[test]
    fn differently_dated_markers_do_not_match_each_other() {
        let yesterday = build_marker("example", Some("2023-10-01"));
        let today = build_marker("example", Some("2023-10-02"));
        let content = format!("{yesterday}\nfn main() {{}}\n");

        assert!(has_marker(&content, &yesterday));
        assert!(!has_marker(&content, &today));
    }

    #[test]
    fn dateless_marker_matches_dated_content() {
        // Prefix relation: an undated check treats any dated marker for the
        // same name as already applied. Intentional.
        let dated = build_marker("example", Some("2023-10-01"));
        let content = format!("{dated}\nfn main() {{}}\n");
        assert!(has_marker(&content, &build_marker("example", None)));
    }

    #[test]
    fn dated_marker_does_not_match_dateless_content() {
        let content = format!("{}\nfn main() {{}}\n", build_marker("example", None));
        assert!(!has_marker(&content, &build_marker("example", Some("2023-10-01"))));
    }

    #[test]
    fn unrelated_names_never_match() {
        let content = format!("{}\n", build_marker("modernize", Some("2023-10-01")));
        assert!(!has_marker(&content, &build_marker("security", Some("2023-10-01"))));
        assert!(!has_marker(&content, &build_marker("security", None)));
    }

    #[test]
    fn marker_is_found_anywhere_in_content() {
        let marker = build_marker("example", None);
        let content = format!("fn main() {{}}\n{marker}\n// trailing\n");
        assert!(has_marker(&content, &marker));
    }
}
