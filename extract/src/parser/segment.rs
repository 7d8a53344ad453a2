//! Entity segmentation.
//!
//! Splits the raw documentation into [`RawEntityBlock`]s. The document is
//! first regrouped so every structural tag sits on its own line, then a state
//! machine walks the lines: heading, description, optional table, optional
//! list.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use super::util::{html_to_text, is_identifier};

/// One entity's raw HTML fragments in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntityBlock {
    pub name: String,
    pub description: String,
    pub table: Option<String>,
    pub list: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Description,
    Table,
    AfterTable,
    List,
    AfterList,
}

struct BlockBuilder {
    name: String,
    state: State,
    description: Vec<String>,
    table: Option<Vec<String>>,
    list: Option<Vec<String>>,
    list_depth: usize,
}

impl BlockBuilder {
    fn new(name: String) -> Self {
        Self {
            name,
            state: State::Description,
            description: Vec::new(),
            table: None,
            list: None,
            list_depth: 0,
        }
    }

    fn push_line(&mut self, line: &str) {
        let opens_table = starts_with_tag(line, "table");
        let opens_list = starts_with_tag(line, "ul");

        match self.state {
            State::Description if opens_table => self.open_table(line),
            State::Description if opens_list => self.open_list(line),
            State::Description => self.description.push(line.to_string()),
            State::Table => {
                self.table.get_or_insert_with(Vec::new).push(line.to_string());
                if closes_tag(line, "table") {
                    self.state = State::AfterTable;
                }
            }
            State::AfterTable if opens_list => self.open_list(line),
            State::AfterTable => self.description.push(line.to_string()),
            State::List => self.continue_list(line),
            State::AfterList if self.table.is_some() => self.description.push(line.to_string()),
            State::AfterList => {
                // A list followed by more prose was part of the description.
                self.demote_list();
                self.state = State::Description;
                self.push_line(line);
            }
        }
    }

    fn open_table(&mut self, line: &str) {
        self.table = Some(vec![line.to_string()]);
        self.state = if closes_tag(line, "table") {
            State::AfterTable
        } else {
            State::Table
        };
    }

    fn open_list(&mut self, line: &str) {
        self.list = Some(Vec::new());
        self.list_depth = 0;
        self.state = State::List;
        self.continue_list(line);
    }

    fn continue_list(&mut self, line: &str) {
        self.list_depth += count_tag(line, "<ul");
        self.list_depth = self.list_depth.saturating_sub(count_tag(line, "</ul>"));
        self.list.get_or_insert_with(Vec::new).push(line.to_string());
        if self.list_depth == 0 {
            self.state = State::AfterList;
        }
    }

    fn demote_list(&mut self) {
        if let Some(list) = self.list.take() {
            self.description.extend(list);
        }
    }

    fn finish(self) -> RawEntityBlock {
        RawEntityBlock {
            name: self.name,
            description: self.description.join("\n"),
            table: self.table.map(|lines| lines.join("\n")),
            list: self.list.map(|lines| lines.join("\n")),
        }
    }
}

/// Splits a documentation page into ordered entity blocks.
///
/// A block starts at an `<h4>` heading whose text is a single identifier and
/// runs until the next `<h3>`/`<h4>` heading or the end of the document.
/// A document with no such heading yields no blocks.
pub fn segment_document(document: &str) -> Vec<RawEntityBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<BlockBuilder> = None;

    for line in group_lines(document) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(level) = heading_level(line) {
            if let Some(builder) = current.take() {
                blocks.push(builder.finish());
            }
            let title = html_to_text(line);
            let title = title.trim();
            if level == 4 && is_identifier(title) {
                current = Some(BlockBuilder::new(title.to_string()));
            } else {
                debug!(heading = %title, level, "Skipping non-entity heading");
            }
            continue;
        }

        if let Some(builder) = current.as_mut() {
            builder.push_line(line);
        }
    }

    if let Some(builder) = current {
        blocks.push(builder.finish());
    }

    debug!(blocks = blocks.len(), "Segmented documentation");
    blocks
}

/// Puts every structural open tag at the start of a line and every structural
/// close tag at the end of one.
fn group_lines(document: &str) -> Vec<String> {
    // SAFETY: These regexes are compile-time constants and are validated by tests.
    static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(<(?:h3|h4|table|ul)(?:\s[^>]*)?>)").expect("static regex must compile")
    });
    static CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?i)(</(?:h3|h4|table|ul)>)").expect("static regex must compile")
    });

    let normalized = document.replace("\r\n", "\n").replace('\r', "\n");
    let opened = OPEN_RE.replace_all(&normalized, "\n$1");
    let closed = CLOSE_RE.replace_all(&opened, "$1\n");
    closed.lines().map(str::to_string).collect()
}

fn heading_level(line: &str) -> Option<u8> {
    if starts_with_tag(line, "h3") {
        Some(3)
    } else if starts_with_tag(line, "h4") {
        Some(4)
    } else {
        None
    }
}

fn starts_with_tag(line: &str, tag: &str) -> bool {
    let Some(rest) = line.strip_prefix('<') else {
        return false;
    };
    rest.get(..tag.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(tag))
        && rest
            .get(tag.len()..)
            .and_then(|after| after.chars().next())
            .is_some_and(|ch| ch == '>' || ch.is_ascii_whitespace())
}

fn closes_tag(line: &str, tag: &str) -> bool {
    line.to_ascii_lowercase().contains(&format!("</{tag}>"))
}

fn count_tag(line: &str, needle: &str) -> usize {
    let lower = line.to_ascii_lowercase();
    if needle == "<ul" {
        lower
            .match_indices("<ul")
            .filter(|(idx, _)| {
                lower[idx + 3..]
                    .chars()
                    .next()
                    .is_some_and(|ch| ch == '>' || ch.is_ascii_whitespace())
            })
            .count()
    } else {
        lower.matches(needle).count()
    }
}
