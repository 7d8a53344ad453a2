//! Markup normalization for entity blocks.

use regex::Regex;
use std::sync::LazyLock;

use super::segment::RawEntityBlock;
use super::util::html_to_text;

/// An entity block with all markup removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBlock {
    pub name: String,
    /// Prose paragraphs; an empty entry marks a paragraph break.
    pub description: Vec<String>,
    /// One tab-separated line per table row.
    pub table: Vec<String>,
    /// One bare item per line.
    pub list: Vec<String>,
}

impl NormalizedBlock {
    /// Description joined into one string for sentence scanning.
    pub fn description_text(&self) -> String {
        self.description
            .iter()
            .filter(|line| !line.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// SAFETY: These regexes are compile-time constants and are validated by tests.
static PARAGRAPH_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</p>|</blockquote>|</div>|</h[1-6]>").expect("static regex must compile")
});
static LINE_END_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</li>|</tr>").expect("static regex must compile")
});
static ITEM_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</li>").expect("static regex must compile"));
static BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("static regex must compile"));
static THEAD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<thead[^>]*>.*?</thead>").expect("static regex must compile"));
static CELL_BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</t[dh]>\s*<t[dh](?:\s[^>]*)?>").expect("static regex must compile")
});
static ROW_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</tr>").expect("static regex must compile"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("static regex must compile"));

/// Normalizes all three fragments of a block.
pub fn normalize_block(block: &RawEntityBlock) -> NormalizedBlock {
    NormalizedBlock {
        name: block.name.clone(),
        description: normalize_description(&block.description),
        table: block.table.as_deref().map(normalize_table).unwrap_or_default(),
        list: block.list.as_deref().map(normalize_list).unwrap_or_default(),
    }
}

/// Strips markup from prose, keeping paragraph breaks as single blank lines.
pub fn normalize_description(html: &str) -> Vec<String> {
    let flat = html.replace('\n', " ");
    let with_paragraphs = PARAGRAPH_END_RE.replace_all(&flat, "\n\n");
    let with_lines = LINE_END_RE.replace_all(&with_paragraphs, "\n");
    let text = html_to_text(&with_lines);

    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let cleaned = collapse_whitespace(line);
        if cleaned.is_empty() && lines.last().is_none_or(|prev| prev.is_empty()) {
            continue;
        }
        lines.push(cleaned);
    }
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Turns a table into tab-separated rows, header excluded.
pub fn normalize_table(html: &str) -> Vec<String> {
    let body = THEAD_RE.replace_all(html, "");
    // A row stays one line even when a cell contains line breaks.
    let flat = BREAK_RE.replace_all(&body, " ").replace('\n', " ");
    let cells = CELL_BOUNDARY_RE.replace_all(&flat, "\t");
    let rows = ROW_END_RE.replace_all(&cells, "\n");
    let text = html_to_text(&rows);

    text.lines()
        .map(|row| {
            row.split('\t')
                .map(collapse_whitespace)
                .collect::<Vec<_>>()
                .join("\t")
        })
        .filter(|row| !row.trim().is_empty())
        .collect()
}

/// Turns a list into one item per line.
pub fn normalize_list(html: &str) -> Vec<String> {
    let flat = BREAK_RE.replace_all(html, " ").replace('\n', " ");
    let items = ITEM_END_RE.replace_all(&flat, "\n");
    html_to_text(&items)
        .lines()
        .map(collapse_whitespace)
        .filter(|item| !item.is_empty())
        .collect()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_keeps_single_paragraph_breaks() {
        let html = "<p>First  <em>para</em>.</p>\n<p></p>\n<p>Second &amp; last.</p>";
        assert_eq!(
            normalize_description(html),
            vec!["First para.", "", "Second & last."]
        );
    }

    #[test]
    fn test_description_drops_media_and_trailing_blanks() {
        let html = r#"<p>Look:</p><div class="img"><img src="x.png"/></div>"#;
        assert_eq!(normalize_description(html), vec!["Look:"]);
    }

    #[test]
    fn test_table_rows_become_tab_lines() {
        let html = r##"<table class="table">
<thead>
<tr>
<th>Parameter</th>
<th>Type</th>
</tr>
</thead>
<tbody>
<tr>
<td>chat_id</td>
<td>Integer or String</td>
<td>Yes</td>
<td>Unique identifier for the <a href="#chat">chat</a></td>
</tr>
<tr>
<td>text</td>
<td>String</td>
<td>Optional</td>
<td>Text &lt;b&gt;</td>
</tr>
</tbody>
</table>"##;
        assert_eq!(
            normalize_table(html),
            vec![
                "chat_id\tInteger or String\tYes\tUnique identifier for the chat",
                "text\tString\tOptional\tText <b>",
            ]
        );
    }

    #[test]
    fn test_line_break_inside_cell_keeps_row_whole() {
        let html = "<table><tr><td>kind</td><td>String</td><td>Optional. Kind<br>Notes</td></tr>\n<tr><td>note</td><td>String</td><td>First line<br/>Second</td></tr></table>";
        assert_eq!(
            normalize_table(html),
            vec![
                "kind\tString\tOptional. Kind Notes",
                "note\tString\tFirst line Second",
            ]
        );
    }

    #[test]
    fn test_line_break_inside_list_item_keeps_item_whole() {
        let html = "<ul><li>ChatMemberOwner<br></li><li>Chat<br />Member</li></ul>";
        assert_eq!(normalize_list(html), vec!["ChatMemberOwner", "Chat Member"]);
    }

    #[test]
    fn test_list_items_one_per_line() {
        let html = "<ul>\n<li><a href=\"#a\">MessageOriginUser</a></li>\n<li>MessageOriginChat</li>\n</ul>";
        assert_eq!(
            normalize_list(html),
            vec!["MessageOriginUser", "MessageOriginChat"]
        );
    }

    #[test]
    fn test_description_text_joins_paragraphs() {
        let block = NormalizedBlock {
            name: "getMe".into(),
            description: vec!["A.".into(), "".into(), "B.".into()],
            table: vec![],
            list: vec![],
        };
        assert_eq!(block.description_text(), "A. B.");
    }
}
