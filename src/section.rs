//! Section-oriented access to outline and article documents.
//!
//! An outline names its sections with `### ` headings, grouped under `## `
//! container headings. The article places the same section names under `## `
//! or `### ` headings. Everything here is a pure text transform: parsing an
//! outline into named sections, locating a section's line span inside an
//! article, and replacing or appending that span while leaving every other
//! line untouched.
//!
//! The store holds no state and performs no I/O. Concurrent read-modify-write
//! against the same file is the caller's problem; a correct caller treats
//! "read text, transform, write text" as a single critical section.

/// A named section parsed from an outline document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineSection {
    /// Heading text after the `### ` marker, trimmed.
    pub name: String,
    /// Non-blank body lines joined with newlines and trimmed.
    pub content: String,
}

/// Parse an outline into its `### `-headed sections, in document order.
///
/// `## ` container headings (and any other heading line) close the open
/// section without opening a new one. Non-blank lines between headings
/// accumulate into the open section; lines before the first `### ` heading
/// are discarded. Duplicate names all appear; deduplication is a lookup-time
/// concern, where the first match wins.
///
/// Input with no `### ` headings yields an empty vector; there are no error
/// conditions.
pub fn parse_outline_sections(outline: &str) -> Vec<OutlineSection> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in outline.lines() {
        if let Some(heading) = line.strip_prefix("### ") {
            flush(&mut sections, &mut current);
            current = Some((heading.trim().to_string(), Vec::new()));
        } else if line.starts_with('#') {
            // Container heading or document title: ends the open section.
            flush(&mut sections, &mut current);
        } else if !line.trim().is_empty() {
            if let Some((_, body)) = current.as_mut() {
                body.push(line);
            }
        }
    }

    flush(&mut sections, &mut current);
    sections
}

fn flush(sections: &mut Vec<OutlineSection>, current: &mut Option<(String, Vec<&str>)>) {
    if let Some((name, body)) = current.take() {
        sections.push(OutlineSection {
            name,
            content: body.join("\n").trim().to_string(),
        });
    }
}

/// Find a section's body in an article.
///
/// Returns the lines between the first matching `## ` or `### ` heading and
/// the next heading line of any depth, joined and trimmed. Returns `None`
/// when no heading matches; an absent section is not an error.
pub fn find_section(article: &str, name: &str) -> Option<String> {
    let lines: Vec<&str> = article.split('\n').collect();
    let (start, end) = section_span(&lines, name)?;
    Some(lines[start..end].join("\n").trim().to_string())
}

/// Replace a section's body with `new_content`, or append the section.
///
/// When the section is found, the entire span between its heading and the
/// next heading becomes a single line holding `new_content` verbatim
/// (embedded newlines survive the re-join). Every line before the span and
/// at or after the original span end is preserved byte-for-byte.
///
/// When the section is missing, the original text is kept unmodified and a
/// blank line, a `## {name}` heading, and `new_content` are appended at the
/// document tail. Missing sections are never inserted in outline order.
pub fn update_section(article: &str, name: &str, new_content: &str) -> String {
    let lines: Vec<&str> = article.split('\n').collect();

    match section_span(&lines, name) {
        Some((start, end)) => {
            let mut out: Vec<&str> = Vec::with_capacity(lines.len());
            out.extend_from_slice(&lines[..start]);
            out.push(new_content);
            out.extend_from_slice(&lines[end..]);
            out.join("\n")
        }
        None => {
            let heading = format!("## {}", name);
            let mut out = lines;
            out.push("");
            out.push(&heading);
            out.push(new_content);
            out.join("\n")
        }
    }
}

/// Locate the half-open line range `[start, end)` of a section's body.
///
/// The heading match is an ordered scan stopping at the first hit, so
/// duplicate section names resolve to the topmost occurrence.
fn section_span(lines: &[&str], name: &str) -> Option<(usize, usize)> {
    let heading = lines.iter().position(|line| heading_matches(line, name))?;
    let start = heading + 1;
    let end = lines
        .iter()
        .skip(start)
        .position(|line| line.starts_with('#'))
        .map(|offset| start + offset)
        .unwrap_or(lines.len());
    Some((start, end))
}

/// Case-insensitive prefix match against a depth-2 or depth-3 heading.
///
/// The heading text only needs to *start with* the target name, so a lookup
/// for "Intro" also hits a heading "Introduction". Deliberately loose; see
/// DESIGN.md.
fn heading_matches(line: &str, name: &str) -> bool {
    let lower = line.to_lowercase();
    let target = name.to_lowercase();
    lower
        .strip_prefix("### ")
        .or_else(|| lower.strip_prefix("## "))
        .map(|text| text.starts_with(&target))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTLINE: &str = "\
# My Article - Outline

## Introduction
- Hook
- Background

## Main Points
### Point 1
- Key idea
- Supporting evidence

### Point 2
- Another idea

## Conclusion
- Summary
";

    const ARTICLE: &str = "\
# Title
## Point 1
Old text.
## Point 2
More.";

    #[test]
    fn test_parse_outline_sections() {
        let sections = parse_outline_sections(OUTLINE);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].name, "Point 1");
        assert_eq!(sections[0].content, "- Key idea\n- Supporting evidence");
        assert_eq!(sections[1].name, "Point 2");
        assert_eq!(sections[1].content, "- Another idea");
    }

    #[test]
    fn test_parse_minimal_outline() {
        let outline = "## Main Points\n### Point 1\n- Key idea\n";
        let sections = parse_outline_sections(outline);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].name, "Point 1");
        assert_eq!(sections[0].content, "- Key idea");
    }

    #[test]
    fn test_parse_container_heading_closes_section() {
        // "- Summary" belongs to the Conclusion container, not Point 2.
        let sections = parse_outline_sections(OUTLINE);
        assert_eq!(sections[1].content, "- Another idea");
    }

    #[test]
    fn test_parse_no_sections_yields_empty() {
        assert!(parse_outline_sections("").is_empty());
        assert!(parse_outline_sections("# Title\nprose only\n").is_empty());
        assert!(parse_outline_sections("## Container\n- stray bullet\n").is_empty());
    }

    #[test]
    fn test_parse_keeps_duplicate_names() {
        let outline = "### Point 1\n- first\n### Point 1\n- second\n";
        let sections = parse_outline_sections(outline);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "- first");
        assert_eq!(sections[1].content, "- second");
    }

    #[test]
    fn test_parse_skips_blank_lines_in_body() {
        let outline = "### Point 1\n- a\n\n- b\n";
        let sections = parse_outline_sections(outline);
        assert_eq!(sections[0].content, "- a\n- b");
    }

    #[test]
    fn test_reparse_of_reconstructed_outline_is_identical() {
        let sections = parse_outline_sections(OUTLINE);
        let rebuilt: String = sections
            .iter()
            .map(|s| format!("### {}\n{}\n", s.name, s.content))
            .collect();
        assert_eq!(parse_outline_sections(&rebuilt), sections);
    }

    #[test]
    fn test_find_section() {
        assert_eq!(find_section(ARTICLE, "Point 1").as_deref(), Some("Old text."));
        assert_eq!(find_section(ARTICLE, "Point 2").as_deref(), Some("More."));
    }

    #[test]
    fn test_find_section_case_insensitive() {
        assert_eq!(find_section(ARTICLE, "point 1").as_deref(), Some("Old text."));
        assert_eq!(find_section(ARTICLE, "POINT 2").as_deref(), Some("More."));
    }

    #[test]
    fn test_find_section_prefix_match() {
        let article = "## Introduction\nBody.\n";
        assert_eq!(find_section(article, "Intro").as_deref(), Some("Body."));
    }

    #[test]
    fn test_find_section_absent_returns_none() {
        assert_eq!(find_section(ARTICLE, "Point 9"), None);
        assert_eq!(find_section("", "Anything"), None);
    }

    #[test]
    fn test_find_section_heading_at_end_of_document() {
        let article = "# Title\n## Point 1";
        assert_eq!(find_section(article, "Point 1").as_deref(), Some(""));
    }

    #[test]
    fn test_find_section_first_match_wins() {
        let article = "## Point 1\nfirst body\n## Point 1\nsecond body\n";
        assert_eq!(find_section(article, "Point 1").as_deref(), Some("first body"));
    }

    #[test]
    fn test_find_section_runs_to_document_end() {
        let article = "## Point 1\nline one\nline two\n";
        assert_eq!(
            find_section(article, "Point 1").as_deref(),
            Some("line one\nline two")
        );
    }

    #[test]
    fn test_update_section_replaces_span() {
        let updated = update_section(ARTICLE, "Point 1", "New text.");
        assert_eq!(updated, "# Title\n## Point 1\nNew text.\n## Point 2\nMore.");
    }

    #[test]
    fn test_update_preserves_surrounding_lines() {
        let updated = update_section(ARTICLE, "Point 1", "New text.");
        assert!(updated.starts_with("# Title\n## Point 1\n"));
        assert!(updated.ends_with("\n## Point 2\nMore."));
    }

    #[test]
    fn test_update_then_find_returns_fresh_content() {
        let updated = update_section(ARTICLE, "Point 1", "New text.");
        assert_eq!(find_section(&updated, "Point 1").as_deref(), Some("New text."));
        // Unrelated section untouched.
        assert_eq!(find_section(&updated, "Point 2").as_deref(), Some("More."));
    }

    #[test]
    fn test_update_missing_section_appends_at_tail() {
        let updated = update_section(ARTICLE, "Point 3", "Brand new.");
        assert!(updated.starts_with(ARTICLE));
        assert!(updated.ends_with("\n\n## Point 3\nBrand new."));
    }

    #[test]
    fn test_update_missing_section_on_empty_document() {
        let updated = update_section("", "Point 1", "Body.");
        assert_eq!(updated, "\n\n## Point 1\nBody.");
    }

    #[test]
    fn test_update_multiline_content_becomes_embedded_newlines() {
        let updated = update_section(ARTICLE, "Point 1", "Line a.\n\nLine b.");
        assert_eq!(
            find_section(&updated, "Point 1").as_deref(),
            Some("Line a.\n\nLine b.")
        );
        assert_eq!(find_section(&updated, "Point 2").as_deref(), Some("More."));
    }

    #[test]
    fn test_update_collapses_multi_line_span_to_content() {
        let article = "## Point 1\nold one\nold two\nold three\n## Point 2\nMore.";
        let updated = update_section(article, "Point 1", "fresh");
        assert_eq!(updated, "## Point 1\nfresh\n## Point 2\nMore.");
    }

    #[test]
    fn test_update_duplicate_headings_touches_first_only() {
        let article = "## Point 1\nfirst\n## Point 1\nsecond";
        let updated = update_section(article, "Point 1", "replaced");
        assert_eq!(updated, "## Point 1\nreplaced\n## Point 1\nsecond");
    }
}
