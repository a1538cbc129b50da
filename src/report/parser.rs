/// Markdown parser for improvement reports
///
/// Walks the CommonMark event stream and records every piece of the report
/// layout it recognizes. Parsing never fails: missing or malformed parts are
/// left empty so the validator can report all of them at once.

use crate::error::{ReportError, Result};
use crate::report::model::{Confidence, Improvement, ImprovementKind, ImprovementReport};
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;
use tracing::debug;

const DESCRIPTION_LABEL: &str = "description";
const CONFIDENCE_LABEL: &str = "confidence";
const SUGGESTIONS_LABEL: &str = "suggested changes";
const GENERATED_LABEL: &str = "generated";
const GENERATED_PREFIX: &str = "Generated:";

pub(crate) fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| {
        Regex::new(r"^Improvement\s+(\d+)\s*:\s*(.*)$").expect("heading regex is valid")
    })
}

/// Everything recognized in a report document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Text of every level-1 heading, in order
    pub titles: Vec<String>,
    /// Value of the first `Generated:` line before any section
    pub generated: Option<String>,
    pub sections: Vec<ParsedSection>,
}

/// One level-2 section, expected to be an improvement block
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSection {
    /// Raw heading text
    pub heading: String,
    pub number: Option<u32>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Raw confidence text, e.g. `80.00%`
    pub confidence: Option<String>,
    pub suggestions_label: bool,
    pub suggestions: Vec<String>,
    /// 1-based line of the heading
    pub line: usize,
}

impl ParsedDocument {
    /// Convert into a report
    ///
    /// Fails on the first missing or malformed field. Run the validator
    /// first for a complete list of problems.
    pub fn into_report(self) -> Result<ImprovementReport> {
        let generated = self
            .generated
            .ok_or_else(|| ReportError::Validation("missing Generated line".to_string()))?;

        let improvements = self
            .sections
            .into_iter()
            .map(ParsedSection::into_improvement)
            .collect::<Result<Vec<_>>>()?;

        Ok(ImprovementReport::with_generated(generated, improvements))
    }
}

impl ParsedSection {
    fn into_improvement(self) -> Result<Improvement> {
        let missing =
            |what: &str| ReportError::Validation(format!("line {}: missing {}", self.line, what));

        let title = self
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| missing("title"))?;
        let description = self.description.clone().ok_or_else(|| missing("description"))?;
        let confidence_text = self.confidence.as_deref().ok_or_else(|| missing("confidence"))?;
        let confidence = Confidence::parse_percent(confidence_text)?;

        if self.suggestions.is_empty() {
            return Err(missing("suggested changes"));
        }

        Ok(Improvement {
            kind: ImprovementKind::from_title(title),
            description,
            confidence,
            suggested_changes: self.suggestions,
        })
    }
}

#[derive(Default)]
struct ParagraphState {
    span: Range<usize>,
    label: Option<String>,
    capturing_label: bool,
    label_end: Option<usize>,
}

/// Parse a Markdown document into its report parts
///
/// Field values are sliced out of the source rather than rebuilt from
/// inline events, so characters CommonMark treats as markup survive as
/// written.
pub fn parse(markdown: &str) -> ParsedDocument {
    let mut document = ParsedDocument::default();

    let mut heading: Option<(HeadingLevel, String, usize)> = None;
    let mut paragraph: Option<ParagraphState> = None;
    let mut item_depth = 0usize;
    let mut item_span: Range<usize> = 0..0;

    for (event, range) in Parser::new_ext(markdown, Options::empty()).into_offset_iter() {
        match event {
            // A heading inside a list item is suggestion text
            Event::Start(Tag::Heading { level, .. }) if item_depth == 0 => {
                heading = Some((level, String::new(), range.start));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text, offset)) = heading.take() {
                    finish_heading(&mut document, level, text.trim(), line_of(markdown, offset));
                }
            }
            Event::Start(Tag::Item) => {
                if item_depth == 0 {
                    item_span = range;
                }
                item_depth += 1;
            }
            Event::End(TagEnd::Item) => {
                item_depth = item_depth.saturating_sub(1);
                if item_depth == 0 {
                    let raw = markdown.get(item_span.clone()).unwrap_or_default();
                    finish_item(&mut document, &fold_lines(strip_list_marker(raw)));
                }
            }
            Event::Start(Tag::Paragraph) if item_depth == 0 && heading.is_none() => {
                paragraph = Some(ParagraphState {
                    span: range,
                    ..ParagraphState::default()
                });
            }
            Event::End(TagEnd::Paragraph) if item_depth == 0 => {
                if let Some(state) = paragraph.take() {
                    finish_paragraph(&mut document, markdown, state);
                }
            }
            Event::Start(Tag::Strong) => {
                if let Some(state) = paragraph.as_mut() {
                    let leading = markdown.get(state.span.start..range.start).unwrap_or_default();
                    if state.label.is_none() && leading.trim().is_empty() {
                        state.label = Some(String::new());
                        state.capturing_label = true;
                    }
                }
            }
            Event::End(TagEnd::Strong) => {
                if let Some(state) = paragraph.as_mut() {
                    if state.capturing_label {
                        state.capturing_label = false;
                        state.label_end = Some(range.end);
                    }
                }
            }
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                push_inline(&mut heading, &mut paragraph, &text);
            }
            Event::Code(code) => {
                let quoted = format!("`{}`", code);
                push_inline(&mut heading, &mut paragraph, &quoted);
            }
            Event::SoftBreak | Event::HardBreak => {
                push_inline(&mut heading, &mut paragraph, " ");
            }
            _ => {}
        }
    }

    document
}

// Only heading text and bold labels are rebuilt from inline events.
fn push_inline(
    heading: &mut Option<(HeadingLevel, String, usize)>,
    paragraph: &mut Option<ParagraphState>,
    text: &str,
) {
    if let Some((_, heading_text, _)) = heading.as_mut() {
        heading_text.push_str(text);
    } else if let Some(state) = paragraph.as_mut() {
        if state.capturing_label {
            if let Some(label) = state.label.as_mut() {
                label.push_str(text);
            }
        }
    }
}

fn finish_heading(document: &mut ParsedDocument, level: HeadingLevel, text: &str, line: usize) {
    match level {
        HeadingLevel::H1 => document.titles.push(text.to_string()),
        HeadingLevel::H2 => {
            let mut section = ParsedSection {
                heading: text.to_string(),
                line,
                ..ParsedSection::default()
            };

            match heading_regex().captures(text) {
                Some(captures) => {
                    section.number = captures[1].parse().ok();
                    if section.number.is_none() {
                        debug!(line, number = &captures[1], "improvement number out of range");
                    }
                    let title = captures[2].trim();
                    section.title = (!title.is_empty()).then(|| title.to_string());
                }
                None => {
                    debug!(line, heading = text, "section heading is not an improvement heading");
                    section.title = (!text.is_empty()).then(|| text.to_string());
                }
            }

            document.sections.push(section);
        }
        _ => debug!(line, heading = text, "ignoring nested heading"),
    }
}

fn finish_item(document: &mut ParsedDocument, text: &str) {
    match document.sections.last_mut() {
        Some(section) => section.suggestions.push(text.to_string()),
        None => debug!(item = text, "ignoring list item outside any improvement section"),
    }
}

fn finish_paragraph(document: &mut ParsedDocument, markdown: &str, state: ParagraphState) {
    let body_start = state.label_end.unwrap_or(state.span.start);
    let body = fold_lines(markdown.get(body_start..state.span.end).unwrap_or_default());
    let body = body.strip_prefix(':').unwrap_or(body.as_str()).trim().to_string();

    let before_sections = document.sections.is_empty();

    let Some(label) = state.label else {
        if before_sections && document.generated.is_none() {
            if let Some(stamp) = body.strip_prefix(GENERATED_PREFIX) {
                document.generated = Some(stamp.trim().to_string());
            }
        }
        return;
    };

    let label = label.trim().trim_end_matches(':').trim().to_lowercase();

    if label == GENERATED_LABEL && before_sections {
        if document.generated.is_none() {
            document.generated = Some(body);
        }
        return;
    }

    let Some(section) = document.sections.last_mut() else {
        debug!(label = %label, "ignoring labelled paragraph before the first section");
        return;
    };

    match label.as_str() {
        DESCRIPTION_LABEL => section.description = Some(body),
        CONFIDENCE_LABEL => section.confidence = Some(body),
        SUGGESTIONS_LABEL => section.suggestions_label = true,
        other => debug!(label = other, line = section.line, "unknown label in improvement section"),
    }
}

// Drop the bullet or `N.` / `N)` marker of a list item.
fn strip_list_marker(item: &str) -> &str {
    let item = item.trim_start();
    if let Some(rest) = item.strip_prefix(&['-', '*', '+'][..]) {
        return rest;
    }

    let digits = item.len() - item.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    item[digits..].strip_prefix(&['.', ')'][..]).unwrap_or(item)
}

// Line breaks inside a block become single spaces.
fn fold_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset.min(text.len())].matches('\n').count() + 1
}
