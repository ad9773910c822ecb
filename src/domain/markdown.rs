//! Section-level access to the Markdown documents vibeprompt stores.
//!
//! Documents follow a fixed convention: an H1 title line and a series of H2
//! sections (`## Role`, `## Constraints`, ...). Only H2 lines delimit
//! sections, so H3 and deeper headings stay part of a section body.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

static H2_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^##[ \t]+(.*?)[ \t]*$").expect("H2 heading pattern must be valid")
});

/// Convert CRLF line endings to LF and trim surrounding whitespace.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").trim().to_string()
}

/// Return the trimmed body of the first H2 section matching `heading`.
///
/// Matching ignores case and whitespace, and a heading with a parenthetical
/// suffix matches its base name (`## Prompt Blueprint (optional)` is found by
/// `"Prompt Blueprint"`). A missing section yields an empty string.
pub fn extract_section(markdown: &str, heading: &str) -> String {
    let text = normalize_newlines(markdown);
    let wanted = heading_key(heading);

    let headings: Vec<(usize, usize, &str)> = H2_HEADING
        .captures_iter(&text)
        .filter_map(|caps| {
            let line = caps.get(0)?;
            let title = caps.get(1)?;
            Some((line.start(), line.end(), title.as_str()))
        })
        .collect();

    let Some(index) = headings.iter().position(|(_, _, title)| heading_matches(title, &wanted))
    else {
        return String::new();
    };

    let body_start = headings[index].1;
    let body_end = headings.get(index + 1).map(|(start, _, _)| *start).unwrap_or(text.len());
    text[body_start..body_end].trim().to_string()
}

/// Return the text after `# <prefix>:` on the first matching H1 line.
pub fn extract_title(markdown: &str, prefix: &str) -> Option<String> {
    let pattern = format!(r"(?m)^#[ \t]*{}:[ \t]*(.+?)[ \t]*$", regex::escape(prefix));
    let re = RegexBuilder::new(&pattern).case_insensitive(true).build().ok()?;
    let text = normalize_newlines(markdown);
    let title = re.captures(&text)?.get(1)?.as_str().trim();
    if title.is_empty() { None } else { Some(title.to_string()) }
}

/// Split a leading `---` fenced frontmatter block from the document body.
///
/// Returns `None` when the document does not open with a frontmatter fence
/// or the fence is never closed.
pub fn split_frontmatter(text: &str) -> Option<(String, String)> {
    let text = normalize_newlines(text);
    let rest = text.strip_prefix("---\n")?;
    let (frontmatter, body) = match rest.strip_prefix("---") {
        Some(body) => ("", body),
        None => {
            let close = rest.find("\n---")?;
            (&rest[..close], &rest[close + "\n---".len()..])
        }
    };
    Some((frontmatter.to_string(), body.trim().to_string()))
}

fn heading_key(heading: &str) -> String {
    heading.chars().filter(|c| !c.is_whitespace()).flat_map(char::to_lowercase).collect()
}

fn heading_matches(title: &str, wanted: &str) -> bool {
    let key = heading_key(title);
    match key.strip_prefix(wanted) {
        Some("") => true,
        Some(rest) => rest.starts_with('('),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const AGENT_DOC: &str = "# Sub-Agent: Reviewer\n\n\
        ## Role\n- Review pull requests\n\n\
        ## Design Decisions\n- Prefer small diffs\n### Notes\n- nested heading stays\n\n\
        ## Constraints\n\n\
        ## Prompt Blueprint (optional)\nCheck {{file}} first.\n";

    #[test]
    fn extracts_section_until_next_h2() {
        assert_eq!(extract_section(AGENT_DOC, "Role"), "- Review pull requests");
    }

    #[test]
    fn deeper_headings_stay_inside_section() {
        assert_eq!(
            extract_section(AGENT_DOC, "Design Decisions"),
            "- Prefer small diffs\n### Notes\n- nested heading stays"
        );
    }

    #[test]
    fn empty_and_missing_sections_yield_empty_string() {
        assert_eq!(extract_section(AGENT_DOC, "Constraints"), "");
        assert_eq!(extract_section(AGENT_DOC, "Purpose"), "");
    }

    #[test]
    fn parenthetical_suffix_matches_base_name() {
        assert_eq!(extract_section(AGENT_DOC, "Prompt Blueprint"), "Check {{file}} first.");
        assert_eq!(
            extract_section("## Prompt Blueprint (옵션)\nlegacy", "Prompt Blueprint"),
            "legacy"
        );
    }

    #[test]
    fn heading_match_ignores_case_and_spacing() {
        let doc = "## philosophy/principles\n- Keep it simple\n";
        assert_eq!(extract_section(doc, "Philosophy / Principles"), "- Keep it simple");
    }

    #[test]
    fn prefix_of_another_word_does_not_match() {
        let doc = "## Roles\nplural\n\n## Role\nsingular";
        assert_eq!(extract_section(doc, "Role"), "singular");
    }

    #[test]
    fn crlf_documents_are_normalized() {
        let doc = "## Purpose\r\nShip it\r\n\r\n## Long-term Direction\r\nLater\r\n";
        assert_eq!(extract_section(doc, "Purpose"), "Ship it");
        assert_eq!(extract_section(doc, "Long-term Direction"), "Later");
    }

    #[test]
    fn first_matching_heading_wins() {
        let doc = "## Role\nfirst\n## Role\nsecond";
        assert_eq!(extract_section(doc, "Role"), "first");
    }

    #[test]
    fn title_is_read_from_h1_prefix() {
        assert_eq!(extract_title(AGENT_DOC, "Sub-Agent"), Some("Reviewer".to_string()));
        assert_eq!(extract_title("# sub-agent:   Spaced  \n", "Sub-Agent"), Some("Spaced".into()));
        assert_eq!(extract_title("## Sub-Agent: Not H1", "Sub-Agent"), None);
        assert_eq!(extract_title("# Project Core", "Sub-Agent"), None);
    }

    #[test]
    fn frontmatter_is_split_from_body() {
        let doc = "---\ntemplateId: reviewer\nname: Reviewer\n---\n\n# Sub-Agent: {{AGENT_NAME}}\n";
        let (frontmatter, body) = split_frontmatter(doc).unwrap();
        assert_eq!(frontmatter, "templateId: reviewer\nname: Reviewer");
        assert_eq!(body, "# Sub-Agent: {{AGENT_NAME}}");
    }

    #[test]
    fn documents_without_frontmatter_are_not_split() {
        assert!(split_frontmatter("# Sub-Agent: X").is_none());
        assert!(split_frontmatter("---\nunterminated: true\n").is_none());
    }

    #[test]
    fn empty_frontmatter_splits() {
        assert_eq!(split_frontmatter("---\n---\nbody"), Some((String::new(), "body".to_string())));
    }

    proptest! {
        #[test]
        fn section_body_survives_extraction(body in "[a-zA-Z0-9 \\n-]{0,80}") {
            let doc = format!("# Project Core\n\n## Purpose\n{}\n\n## Long-term Direction\nx", body);
            prop_assert_eq!(extract_section(&doc, "Purpose"), body.trim().to_string());
        }

        #[test]
        fn extraction_never_panics(doc in "\\PC{0,200}", heading in "\\PC{0,20}") {
            let _ = extract_section(&doc, &heading);
            let _ = extract_title(&doc, &heading);
            let _ = split_frontmatter(&doc);
        }
    }
}
