//! WordprocessingML part parsing and text write-back.
//!
//! Parts are tokenized tag by tag rather than fully deserialized: every
//! byte outside the `<w:t>` elements we rewrite is carried over verbatim.

use crate::error::{Error, Result};
use crate::model::{Block, Paragraph, RunFormat, Table, TableCell, TableRow, TextRun, TextSlotId};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::OnceLock;

/// Tags, plus comments / processing instructions / CDATA that are skipped.
fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)<!--.*?-->|<\?.*?\?>|<!\[CDATA\[.*?\]\]>|<(/)?([A-Za-z_][\w.:\-]*)((?:[^>"'/]|"[^"]*"|'[^']*')*)(/)?>"#,
        )
        .expect("tag pattern is valid")
    })
}

fn attr_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"([\w.:\-]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("attribute pattern is valid")
    })
}

/// One tag occurrence in a part.
#[derive(Debug, Clone)]
pub(crate) struct Tag<'a> {
    /// Qualified element name, e.g. `w:t`
    pub name: &'a str,
    /// Raw attribute text, leading whitespace included
    pub attrs: &'a str,
    /// Byte range of the whole tag
    pub range: Range<usize>,
    pub kind: TagKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TagKind {
    Open,
    Close,
    Empty,
}

/// Iterate the element tags of an XML fragment in document order.
pub(crate) fn tags(xml: &str) -> impl Iterator<Item = Tag<'_>> {
    tag_regex().captures_iter(xml).filter_map(|caps: Captures<'_>| {
        let name = caps.get(2)?;
        let whole = caps.get(0)?;
        let kind = if caps.get(1).is_some() {
            TagKind::Close
        } else if caps.get(4).is_some() {
            TagKind::Empty
        } else {
            TagKind::Open
        };
        Some(Tag {
            name: name.as_str(),
            attrs: caps.get(3).map_or("", |m| m.as_str()),
            range: whole.range(),
            kind,
        })
    })
}

/// Look up an attribute value (entity-decoded) in raw attribute text.
pub(crate) fn attr(attrs: &str, key: &str) -> Option<String> {
    attr_regex().captures_iter(attrs).find_map(|caps| {
        if caps.get(1)?.as_str() != key {
            return None;
        }
        let value = caps.get(2).or_else(|| caps.get(3))?;
        Some(unescape(value.as_str()))
    })
}

/// Decode the predefined and numeric character entities.
///
/// Unknown or malformed references are kept as written.
pub(crate) fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let decoded = candidate.find(';').and_then(|semi| {
            let entity = &candidate[1..semi];
            let ch = match entity {
                "lt" => Some('<'),
                "gt" => Some('>'),
                "amp" => Some('&'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, semi + 1))
        });
        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape text content for an element body.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A `<w:t>` element that backs one model run.
#[derive(Debug, Clone)]
pub(crate) struct TextSlot {
    /// Byte range of the element, start tag to end tag
    pub element: Range<usize>,
    /// Raw attribute text of the start tag
    pub attrs: String,
    /// Decoded text as loaded
    pub original: String,
}

impl TextSlot {
    /// Render the element with new text.
    fn render(&self, text: &str) -> String {
        let mut attrs = self.attrs.trim_end().to_string();
        let needs_preserve = text.starts_with(char::is_whitespace)
            || text.ends_with(char::is_whitespace);
        if needs_preserve && !attrs.contains("xml:space") {
            attrs.push_str(r#" xml:space="preserve""#);
        }
        if text.is_empty() {
            format!("<w:t{}/>", attrs)
        } else {
            format!("<w:t{}>{}</w:t>", attrs, escape(text))
        }
    }
}

/// Header / footer references of one `<w:sectPr>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SectionRefs {
    /// `(type, relationship id)` of each header reference
    pub headers: Vec<(String, String)>,
    /// `(type, relationship id)` of each footer reference
    pub footers: Vec<(String, String)>,
}

/// Result of parsing one part.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParsedPart {
    pub blocks: Vec<Block>,
    pub slots: Vec<TextSlot>,
    pub sections: Vec<SectionRefs>,
}

enum Frame {
    Table(Table),
    Row(TableRow),
    Cell(Vec<Block>),
    Paragraph(Paragraph),
}

struct PendingText {
    tag_start: usize,
    content_start: usize,
    attrs: String,
}

/// Parse a document, header or footer part into blocks.
///
/// `part` is stamped into every run's slot id so edits can be routed back
/// to this part.
pub(crate) fn parse_part(xml: &str, part: usize) -> Result<ParsedPart> {
    let mut parsed = ParsedPart::default();
    let mut root: Vec<Block> = Vec::new();
    let mut frames: Vec<Frame> = Vec::new();
    let mut elements: Vec<&str> = Vec::new();
    // One entry per open `<w:r>`: its formatting once `<w:rPr>` is seen.
    let mut runs: Vec<RunFormat> = Vec::new();
    let mut rpr_start: Option<usize> = None;
    let mut text: Option<PendingText> = None;
    let mut section: Option<SectionRefs> = None;

    for tag in tags(xml) {
        let parent = elements.last().copied();
        match tag.kind {
            TagKind::Open => {
                match tag.name {
                    "w:tbl" => frames.push(Frame::Table(Table::new())),
                    "w:tr" => frames.push(Frame::Row(TableRow::default())),
                    "w:tc" => frames.push(Frame::Cell(Vec::new())),
                    "w:p" => frames.push(Frame::Paragraph(Paragraph::new())),
                    "w:r" => runs.push(RunFormat::default()),
                    "w:rPr" if parent == Some("w:r") => rpr_start = Some(tag.range.start),
                    "w:t" if parent == Some("w:r") => {
                        text = Some(PendingText {
                            tag_start: tag.range.start,
                            content_start: tag.range.end,
                            attrs: tag.attrs.to_string(),
                        });
                    }
                    "w:sectPr" if parent != Some("w:sectPrChange") => {
                        section = Some(SectionRefs::default());
                    }
                    _ => {}
                }
                elements.push(tag.name);
            }
            TagKind::Close => {
                match elements.pop() {
                    Some(open) if open == tag.name => {}
                    Some(open) => {
                        return Err(Error::Xml(format!(
                            "expected </{}> but found </{}> at byte {}",
                            open, tag.name, tag.range.start
                        )));
                    }
                    None => {
                        return Err(Error::Xml(format!(
                            "unexpected </{}> at byte {}",
                            tag.name, tag.range.start
                        )));
                    }
                }
                match tag.name {
                    "w:tbl" | "w:tr" | "w:tc" | "w:p" => close_frame(&mut frames, &mut root)?,
                    "w:r" => {
                        runs.pop();
                    }
                    "w:rPr" => {
                        if let Some(start) = rpr_start.take() {
                            let raw = &xml[start..tag.range.end];
                            if let Some(format) = runs.last_mut() {
                                *format = parse_run_format(raw);
                            }
                        }
                    }
                    "w:t" => {
                        if let Some(pending) = text.take() {
                            let content = &xml[pending.content_start..tag.range.start];
                            push_text(
                                &mut parsed,
                                &mut frames,
                                runs.last(),
                                part,
                                pending.tag_start..tag.range.end,
                                pending.attrs,
                                unescape(content),
                            );
                        }
                    }
                    "w:sectPr" => {
                        if let Some(refs) = section.take() {
                            parsed.sections.push(refs);
                        }
                    }
                    _ => {}
                }
            }
            TagKind::Empty => match tag.name {
                "w:t" if parent == Some("w:r") => push_text(
                    &mut parsed,
                    &mut frames,
                    runs.last(),
                    part,
                    tag.range.clone(),
                    tag.attrs.to_string(),
                    String::new(),
                ),
                "w:p" => {
                    frames.push(Frame::Paragraph(Paragraph::new()));
                    close_frame(&mut frames, &mut root)?;
                }
                "w:pStyle" if parent == Some("w:pPr") => {
                    if let Some(Frame::Paragraph(paragraph)) = frames.last_mut() {
                        paragraph.style = attr(tag.attrs, "w:val");
                    }
                }
                "w:headerReference" | "w:footerReference" => {
                    if let (Some(refs), Some(id)) = (section.as_mut(), attr(tag.attrs, "r:id")) {
                        let kind = attr(tag.attrs, "w:type").unwrap_or_else(|| "default".into());
                        if tag.name == "w:headerReference" {
                            refs.headers.push((kind, id));
                        } else {
                            refs.footers.push((kind, id));
                        }
                    }
                }
                "w:sectPr" if parent != Some("w:sectPrChange") => {
                    parsed.sections.push(SectionRefs::default());
                }
                _ => {}
            },
        }
    }

    if let Some(open) = elements.last() {
        return Err(Error::Xml(format!("unclosed <{}> at end of part", open)));
    }

    parsed.blocks = root;
    Ok(parsed)
}

fn push_text(
    parsed: &mut ParsedPart,
    frames: &mut [Frame],
    format: Option<&RunFormat>,
    part: usize,
    element: Range<usize>,
    attrs: String,
    text: String,
) {
    let Some(Frame::Paragraph(paragraph)) = frames.last_mut() else {
        return;
    };
    let index = parsed.slots.len();
    let mut run = TextRun::formatted(text.clone(), format.cloned().unwrap_or_default());
    run.slot = Some(TextSlotId { part, index });
    paragraph.add_run(run);
    parsed.slots.push(TextSlot {
        element,
        attrs,
        original: text,
    });
}

/// Pop the innermost structural frame and attach it to its parent.
///
/// Paragraphs and tables attach to the nearest cell or the root. Content
/// nested inside a paragraph (text boxes) is not exposed.
fn close_frame(frames: &mut Vec<Frame>, root: &mut Vec<Block>) -> Result<()> {
    let frame = frames
        .pop()
        .ok_or_else(|| Error::Xml("structural close without matching open".into()))?;

    let block = match frame {
        Frame::Paragraph(p) => Block::Paragraph(p),
        Frame::Table(t) => Block::Table(t),
        Frame::Row(row) => {
            if let Some(Frame::Table(table)) = frames.last_mut() {
                table.add_row(row);
            }
            return Ok(());
        }
        Frame::Cell(blocks) => {
            if let Some(Frame::Row(row)) = frames.last_mut() {
                row.cells.push(TableCell { blocks });
            }
            return Ok(());
        }
    };

    match frames.last_mut() {
        None => root.push(block),
        Some(Frame::Cell(blocks)) => blocks.push(block),
        Some(_) => {}
    }
    Ok(())
}

/// Decode the informational flags of a `<w:rPr>` fragment.
pub(crate) fn parse_run_format(raw: &str) -> RunFormat {
    let mut format = RunFormat {
        raw: Some(raw.to_string()),
        ..Default::default()
    };

    for tag in tags(raw) {
        if tag.kind == TagKind::Close {
            continue;
        }
        let val = attr(tag.attrs, "w:val");
        let on = !matches!(val.as_deref(), Some("0" | "false" | "off"));
        match tag.name {
            "w:b" => format.bold = on,
            "w:i" => format.italic = on,
            "w:strike" => format.strikethrough = on,
            "w:u" => format.underline = !matches!(val.as_deref(), Some("none")),
            "w:rFonts" => format.font_name = attr(tag.attrs, "w:ascii"),
            "w:sz" => {
                format.font_size = val
                    .as_deref()
                    .and_then(|v| v.parse::<f32>().ok())
                    .map(|half_points| half_points / 2.0);
            }
            "w:color" => format.color = val.filter(|v| v != "auto"),
            "w:highlight" => format.highlight = val.filter(|v| v != "none"),
            _ => {}
        }
    }

    format
}

/// Re-emit a part with some of its text elements replaced.
///
/// `edits` maps slot index to new decoded text. Bytes outside edited
/// elements are copied unchanged.
pub(crate) fn write_back(xml: &str, slots: &[TextSlot], edits: &BTreeMap<usize, String>) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut cursor = 0;
    for (&index, text) in edits {
        let Some(slot) = slots.get(index) else {
            continue;
        };
        if slot.element.start < cursor {
            continue;
        }
        out.push_str(&xml[cursor..slot.element.start]);
        out.push_str(&slot.render(text));
        cursor = slot.element.end;
    }
    out.push_str(&xml[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:pPr><w:pStyle w:val="Heading1"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:t xml:space="preserve">Dear </w:t></w:r><w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>{{na</w:t></w:r><w:r><w:t>me}} &amp; co</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>{{cell}}</w:t></w:r></w:p><w:p/></w:tc></w:tr></w:tbl><w:sectPr><w:headerReference w:type="default" r:id="rId7"/><w:footerReference w:type="first" r:id="rId8"/></w:sectPr></w:body></w:document>"#;

    #[test]
    fn test_tags_in_order() {
        let xml = r#"<w:p><w:r><w:t a="x>y">hi</w:t><w:tab/></w:r></w:p>"#;
        let found: Vec<Tag<'_>> = tags(xml).collect();
        let kinds: Vec<(&str, TagKind)> = found.iter().map(|t| (t.name, t.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("w:p", TagKind::Open),
                ("w:r", TagKind::Open),
                ("w:t", TagKind::Open),
                ("w:t", TagKind::Close),
                ("w:tab", TagKind::Empty),
                ("w:r", TagKind::Close),
                ("w:p", TagKind::Close),
            ]
        );
        let text = found[2].clone();
        assert_eq!(text.attrs, r#" a="x>y""#);
        assert_eq!(&xml[text.range.end..found[3].range.start], "hi");
    }

    #[test]
    fn test_parse_structure() {
        let parsed = parse_part(BODY, 0).unwrap();
        assert_eq!(parsed.blocks.len(), 2);

        let paragraph = parsed.blocks[0].as_paragraph().unwrap();
        assert_eq!(paragraph.full_text(), "Dear {{name}} & co");
        assert_eq!(paragraph.run_count(), 3);
        assert_eq!(paragraph.style.as_deref(), Some("Heading1"));
        assert!(!paragraph.runs[0].format.bold);
        assert!(paragraph.runs[1].format.bold);
        assert_eq!(paragraph.runs[1].format.font_size, Some(14.0));

        let table = parsed.blocks[1].as_table().unwrap();
        let cell = &table.rows[0].cells[0];
        assert_eq!(cell.paragraphs().count(), 2);
        assert_eq!(cell.plain_text(), "{{cell}} ");

        assert_eq!(parsed.slots.len(), 4);
        assert_eq!(parsed.slots[2].original, "me}} & co");
    }

    #[test]
    fn test_parse_section_refs() {
        let parsed = parse_part(BODY, 0).unwrap();
        assert_eq!(
            parsed.sections,
            vec![SectionRefs {
                headers: vec![("default".into(), "rId7".into())],
                footers: vec![("first".into(), "rId8".into())],
            }]
        );
    }

    #[test]
    fn test_unbalanced_part_is_rejected() {
        let result = parse_part("<w:body><w:p></w:body>", 0);
        assert!(matches!(result, Err(Error::Xml(_))));

        let result = parse_part("<w:body><w:p>", 0);
        assert!(matches!(result, Err(Error::Xml(_))));
    }

    #[test]
    fn test_text_box_paragraphs_not_exposed() {
        let xml = "<w:body><w:p><w:r><w:t>outer</w:t><w:txbxContent><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:txbxContent></w:r></w:p></w:body>";
        let parsed = parse_part(xml, 0).unwrap();
        assert_eq!(parsed.blocks.len(), 1);
        assert_eq!(parsed.blocks[0].as_paragraph().unwrap().full_text(), "outer");
    }

    #[test]
    fn test_write_back_only_touches_edits() {
        let parsed = parse_part(BODY, 0).unwrap();
        let mut edits = BTreeMap::new();
        edits.insert(1, "Ada <3".to_string());
        edits.insert(2, " & co".to_string());

        let out = write_back(BODY, &parsed.slots, &edits);
        assert!(out.contains("<w:t>Ada &lt;3</w:t>"));
        assert!(out.contains(r#"<w:t xml:space="preserve"> &amp; co</w:t>"#));
        assert!(out.contains("<w:t>{{cell}}</w:t>"));
        assert!(out.starts_with("<?xml"));

        let reparsed = parse_part(&out, 0).unwrap();
        let paragraph = reparsed.blocks[0].as_paragraph().unwrap();
        assert_eq!(paragraph.full_text(), "Dear Ada <3 & co");
    }

    #[test]
    fn test_write_back_empty_text() {
        let xml = "<w:p><w:r><w:t>gone</w:t></w:r></w:p>";
        let parsed = parse_part(xml, 0).unwrap();
        let edits = BTreeMap::from([(0, String::new())]);
        assert_eq!(write_back(xml, &parsed.slots, &edits), "<w:p><w:r><w:t/></w:r></w:p>");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a &lt;b&gt; &amp; &quot;c&apos;"), "a <b> & \"c'");
        assert_eq!(unescape("&#65;&#x42;"), "AB");
        assert_eq!(unescape("&unknown; & lone"), "&unknown; & lone");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("{{a}} & <b>"), "{{a}} &amp; &lt;b&gt;");
    }

    #[test]
    fn test_run_format_toggles() {
        let format = parse_run_format(
            r#"<w:rPr><w:b w:val="0"/><w:i/><w:u w:val="single"/><w:rFonts w:ascii="Arial"/><w:color w:val="FF0000"/></w:rPr>"#,
        );
        assert!(!format.bold);
        assert!(format.italic);
        assert!(format.underline);
        assert_eq!(format.font_name.as_deref(), Some("Arial"));
        assert_eq!(format.color.as_deref(), Some("FF0000"));
        assert!(format.raw.is_some());
    }

    #[test]
    fn test_attr() {
        assert_eq!(attr(r#" w:type="first" r:id='rId3'"#, "r:id").as_deref(), Some("rId3"));
        assert_eq!(attr(r#" w:type="first""#, "r:id"), None);
    }
}
