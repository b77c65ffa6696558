// file: src/parser/document.rs
// description: docx container loading into ordered body paragraphs with hyperlink references
// reference: https://docs.rs/quick-xml, https://docs.rs/zip

use crate::error::{ReportError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

const DOCUMENT_PART: &str = "word/document.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

/// Index of a paragraph within its `WordDocument`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParagraphId(pub usize);

/// A `w:hyperlink` element as it appears in the paragraph, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HyperlinkRef {
    pub rel_id: Option<String>,
    pub text: String,
}

impl HyperlinkRef {
    pub fn new(rel_id: &str, text: &str) -> Self {
        Self {
            rel_id: Some(rel_id.to_string()),
            text: text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    pub hyperlinks: Vec<HyperlinkRef>,
}

impl Paragraph {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            hyperlinks: Vec::new(),
        }
    }

    pub fn with_hyperlinks(text: impl Into<String>, hyperlinks: Vec<HyperlinkRef>) -> Self {
        Self {
            text: text.into(),
            hyperlinks,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WordDocument {
    paragraphs: Vec<Paragraph>,
    relationships: HashMap<String, String>,
}

impl WordDocument {
    pub fn new(paragraphs: Vec<Paragraph>, relationships: HashMap<String, String>) -> Self {
        Self {
            paragraphs,
            relationships,
        }
    }

    /// Document of plain paragraphs with no hyperlinks.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            texts.into_iter().map(Paragraph::plain).collect(),
            HashMap::new(),
        )
    }

    /// Opens a `.docx` file. Every failure is reported as a single load error.
    pub fn open(path: &Path) -> Result<Self> {
        let load_error = |message: String| ReportError::Load {
            path: path.to_path_buf(),
            message,
        };

        let file = File::open(path).map_err(|e| load_error(e.to_string()))?;
        let document = Self::from_reader(BufReader::new(file)).map_err(|e| load_error(e.to_string()))?;

        debug!(
            "Loaded {} paragraphs and {} relationships from {}",
            document.paragraphs.len(),
            document.relationships.len(),
            path.display()
        );
        Ok(document)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;

        let document_xml = read_entry(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| ReportError::Xml(format!("{} not found in container", DOCUMENT_PART)))?;
        let relationships = match read_entry(&mut archive, RELATIONSHIPS_PART)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let paragraphs = parse_document_xml(&document_xml)?;
        Ok(Self::new(paragraphs, relationships))
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn paragraph(&self, id: ParagraphId) -> Option<&Paragraph> {
        self.paragraphs.get(id.0)
    }

    pub fn relationship_target(&self, rel_id: &str) -> Option<&str> {
        self.relationships.get(rel_id).map(String::as_str)
    }
}

fn read_entry<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .and_then(|attr| attr.unescape_value().ok().map(|v| v.into_owned()))
}

/// Maps relationship ids (`rId7`) to their targets.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    let mut relationships = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attribute(&e, b"Id"), attribute(&e, b"Target")) {
                    relationships.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ReportError::Xml(format!(
                    "Error parsing relationships at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(relationships)
}

#[derive(Default)]
struct ParagraphBuilder {
    paragraph: Paragraph,
    open_link: Option<HyperlinkRef>,
}

impl ParagraphBuilder {
    fn push_text(&mut self, text: &str) {
        self.paragraph.text.push_str(text);
        if let Some(link) = self.open_link.as_mut() {
            link.text.push_str(text);
        }
    }

    fn push_break(&mut self, ch: char) {
        self.paragraph.text.push(ch);
    }

    fn close_link(&mut self) {
        if let Some(link) = self.open_link.take() {
            self.paragraph.hyperlinks.push(link);
        }
    }
}

/// Collects top-level body paragraphs. Tables and text boxes are skipped.
fn parse_document_xml(xml: &str) -> Result<Vec<Paragraph>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut current: Option<ParagraphBuilder> = None;
    let mut skip_depth = 0usize;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => skip_depth += 1,
                _ if skip_depth > 0 => {}
                b"w:p" => current = Some(ParagraphBuilder::default()),
                b"w:hyperlink" => {
                    if let Some(builder) = current.as_mut() {
                        builder.open_link = Some(HyperlinkRef {
                            rel_id: attribute(&e, b"r:id"),
                            text: String::new(),
                        });
                    }
                }
                b"w:r" => in_run = true,
                b"w:t" => in_text = in_run,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                _ if skip_depth > 0 => {}
                b"w:p" => paragraphs.push(Paragraph::default()),
                b"w:tab" if in_run => {
                    if let Some(builder) = current.as_mut() {
                        builder.push_break('\t');
                    }
                }
                b"w:br" | b"w:cr" if in_run => {
                    let line_break = attribute(&e, b"w:type")
                        .is_none_or(|kind| kind == "textWrapping");
                    if line_break && let Some(builder) = current.as_mut() {
                        builder.push_break('\n');
                    }
                }
                _ => {}
            },
            Ok(Event::Text(t)) => {
                if in_text
                    && skip_depth == 0
                    && let Some(builder) = current.as_mut()
                {
                    let text = t.unescape().map_err(|e| ReportError::Xml(e.to_string()))?;
                    builder.push_text(&text);
                }
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:tbl" | b"w:txbxContent" => skip_depth = skip_depth.saturating_sub(1),
                _ if skip_depth > 0 => {}
                b"w:t" => in_text = false,
                b"w:r" => in_run = false,
                b"w:hyperlink" => {
                    if let Some(builder) = current.as_mut() {
                        builder.close_link();
                    }
                }
                b"w:p" => {
                    if let Some(mut builder) = current.take() {
                        builder.close_link();
                        paragraphs.push(builder.paragraph);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ReportError::Xml(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    pub(crate) fn build_docx(document_xml: &str, rels_xml: Option<&str>) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        writer.start_file(DOCUMENT_PART, options).unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        if let Some(rels) = rels_xml {
            writer.start_file(RELATIONSHIPS_PART, options).unwrap();
            writer.write_all(rels.as_bytes()).unwrap();
        }

        writer.finish().unwrap().into_inner()
    }

    pub(crate) fn wrap_body(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}</w:body></w:document>"#,
            body
        )
    }

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://eeuroparts.com/p/123?utm=a&amp;b=c" TargetMode="External"/>
</Relationships>"#;

    #[test]
    fn test_parse_runs_and_breaks() {
        let xml = wrap_body(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Fault Codes: P0300</w:t><w:br/><w:t xml:space="preserve">Why it happens: </w:t></w:r><w:r><w:t>coil wear</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t></w:r></w:p>"#,
        );

        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].text, "Fault Codes: P0300\nWhy it happens: coil wear");
        assert_eq!(paragraphs[1].text, "");
        assert_eq!(paragraphs[2].text, "A\tB");
    }

    #[test]
    fn test_hyperlinks_are_recorded_in_order() {
        let xml = wrap_body(
            r#"<w:p><w:hyperlink r:id="rId5"><w:r><w:t>Brake </w:t></w:r><w:r><w:t>Pad Set</w:t></w:r></w:hyperlink><w:r><w:t xml:space="preserve"> for the front axle</w:t></w:r><w:hyperlink w:anchor="top"><w:r><w:t>top</w:t></w:r></w:hyperlink></w:p>"#,
        );

        let paragraphs = parse_document_xml(&xml).unwrap();
        assert_eq!(paragraphs[0].text, "Brake Pad Set for the front axletop");
        assert_eq!(paragraphs[0].hyperlinks.len(), 2);
        assert_eq!(paragraphs[0].hyperlinks[0], HyperlinkRef::new("rId5", "Brake Pad Set"));
        assert_eq!(paragraphs[0].hyperlinks[1].rel_id, None);
    }

    #[test]
    fn test_tables_and_text_boxes_are_skipped() {
        let xml = wrap_body(
            r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:p><w:r><w:t>After</w:t></w:r></w:p>"#,
        );

        let paragraphs = parse_document_xml(&xml).unwrap();
        let texts: Vec<&str> = paragraphs.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["Before", "After"]);
    }

    #[test]
    fn test_relationship_targets_are_unescaped() {
        let rels = parse_relationships(RELS).unwrap();
        assert_eq!(
            rels.get("rId5").map(String::as_str),
            Some("https://eeuroparts.com/p/123?utm=a&b=c")
        );
    }

    #[test]
    fn test_open_docx_container() {
        let xml = wrap_body(
            r#"<w:p><w:r><w:t>Vehicle Platform Guide: Audi Q5</w:t></w:r></w:p><w:p><w:hyperlink r:id="rId5"><w:r><w:t>Brake Pad Set</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let bytes = build_docx(&xml, Some(RELS));

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("guide.docx");
        std::fs::write(&path, bytes).unwrap();

        let document = WordDocument::open(&path).unwrap();
        assert_eq!(document.paragraphs().len(), 2);
        assert_eq!(document.paragraphs()[0].text, "Vehicle Platform Guide: Audi Q5");
        assert!(document.relationship_target("rId5").is_some());
    }

    #[test]
    fn test_missing_relationships_part_is_not_fatal() {
        let xml = wrap_body(r#"<w:p><w:r><w:t>Only text</w:t></w:r></w:p>"#);
        let document = WordDocument::from_reader(Cursor::new(build_docx(&xml, None))).unwrap();
        assert_eq!(document.paragraphs().len(), 1);
        assert!(document.relationship_target("rId1").is_none());
    }

    #[test]
    fn test_load_failures() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.docx");
        assert!(matches!(
            WordDocument::open(&missing),
            Err(ReportError::Load { .. })
        ));

        let garbage = temp.path().join("garbage.docx");
        std::fs::write(&garbage, b"not a zip archive").unwrap();
        assert!(matches!(
            WordDocument::open(&garbage),
            Err(ReportError::Load { .. })
        ));

        let no_body = build_docx("", None);
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/styles.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<w:styles/>").unwrap();
        let without_document = writer.finish().unwrap().into_inner();
        assert!(WordDocument::from_reader(Cursor::new(without_document)).is_err());
        assert!(WordDocument::from_reader(Cursor::new(no_body)).is_ok());
    }
}
