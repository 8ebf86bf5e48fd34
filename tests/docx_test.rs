//! End-to-end tests over real DOCX packages built in memory.

use std::io::{Cursor, Read, Write};

use docfill::{
    detect_format_from_bytes, extract_placeholders, fill_bytes, fill_file, fill_file_with_options,
    generate_file_name, DocxTemplate, Error, FillOptions, PlaceholderValues, TemplateLibrary,
};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships""#;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/><Relationship Id="rId8" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/header" Target="header1.xml"/><Relationship Id="rId9" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer" Target="footer1.xml"/></Relationships>"#;

fn document_xml() -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<w:document {ns}><w:body>"#,
            r#"<w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr>"#,
            r#"<w:r><w:t xml:space="preserve">Offer for </w:t></w:r>"#,
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t>{{{{cli</w:t></w:r>"#,
            r#"<w:proofErr w:type="spellStart"/>"#,
            r#"<w:r><w:rPr><w:b/><w:i/></w:rPr><w:t>ent_name}}}}</w:t></w:r>"#,
            r#"<w:proofErr w:type="spellEnd"/></w:p>"#,
            r#"<w:tbl><w:tblPr/><w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>Amount</w:t></w:r></w:p></w:tc>"#,
            r#"<w:tc><w:p><w:r><w:t>{{{{amount}}}} EUR</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            r#"<w:p><w:r><w:t>Keep {{{{unknown}}}} &amp; {{{{open</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:drawing><wp:inline/></w:drawing></w:r></w:p>"#,
            r#"<w:sectPr><w:headerReference w:type="default" r:id="rId8"/>"#,
            r#"<w:footerReference w:type="default" r:id="rId9"/><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
            r#"</w:body></w:document>"#
        ),
        ns = NS
    )
}

fn header_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:hdr {NS}><w:p><w:r><w:t>{{{{company}}}}</w:t></w:r></w:p></w:hdr>"#
    )
}

fn footer_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:ftr {NS}><w:tbl><w:tr><w:tc><w:p><w:r><w:t>Ref {{{{ref</w:t></w:r><w:r><w:t>erence}}}}</w:t></w:r></w:p></w:tc></w:tr></w:tbl></w:ftr>"#
    )
}

const STYLES: &str = r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;

const IMAGE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];

fn build_docx() -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let entries: Vec<(&str, Vec<u8>)> = vec![
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec()),
        ("word/document.xml", document_xml().into_bytes()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes().to_vec()),
        ("word/styles.xml", STYLES.as_bytes().to_vec()),
        ("word/header1.xml", header_xml().into_bytes()),
        ("word/footer1.xml", footer_xml().into_bytes()),
        ("word/media/image1.png", IMAGE.to_vec()),
    ];
    for (name, data) in entries {
        zip.start_file(name, options).unwrap();
        zip.write_all(&data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

fn read_entry(data: &[u8], name: &str) -> Vec<u8> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = Vec::new();
    entry.read_to_end(&mut out).unwrap();
    out
}

fn read_text(data: &[u8], name: &str) -> String {
    String::from_utf8(read_entry(data, name)).unwrap()
}

fn values() -> PlaceholderValues {
    PlaceholderValues::new()
        .with("client_name", "Smith & <Sons>")
        .with("amount", "1 200")
        .with("company", "Initech")
        .with("reference", " R-7 ")
}

#[test]
fn test_detect() {
    let format = detect_format_from_bytes(&build_docx()).unwrap();
    assert_eq!(format.part_count, 7);
    assert!(format.has_headers);
    assert!(format.has_footers);
}

#[test]
fn test_placeholders_everywhere() {
    let template = DocxTemplate::from_bytes(&build_docx()).unwrap();
    assert_eq!(
        template.placeholders(),
        vec!["amount", "client_name", "company", "reference", "unknown"]
    );
    let parts: Vec<&str> = template.part_names().collect();
    assert_eq!(
        parts,
        vec!["word/document.xml", "word/header1.xml", "word/footer1.xml"]
    );
}

#[test]
fn test_fill_round_trip() {
    let (bytes, report) = fill_bytes(&build_docx(), &values(), &FillOptions::default()).unwrap();
    assert_eq!(report.placeholders_replaced, 4);
    assert_eq!(
        report.unknown_placeholders.iter().collect::<Vec<_>>(),
        vec!["unknown"]
    );

    let document = read_text(&bytes, "word/document.xml");
    assert!(document.contains(r#"<w:r><w:rPr><w:b/></w:rPr><w:t>Smith &amp; &lt;Sons&gt;</w:t></w:r>"#));
    assert!(document.contains(r#"<w:r><w:rPr><w:b/><w:i/></w:rPr><w:t/></w:r>"#));
    assert!(document.contains("<w:t>1 200 EUR</w:t>"));
    assert!(document.contains("<w:t>Keep {{unknown}} &amp; {{open</w:t>"));
    assert!(document.contains(r#"<w:proofErr w:type="spellStart"/>"#));
    assert!(document.contains("<w:drawing><wp:inline/></w:drawing>"));

    let footer = read_text(&bytes, "word/footer1.xml");
    assert!(footer.contains(r#"<w:t xml:space="preserve">Ref  R-7 </w:t>"#));

    let reloaded = DocxTemplate::from_bytes(&bytes).unwrap();
    assert_eq!(reloaded.placeholders(), vec!["unknown"]);
    assert_eq!(
        reloaded.document().body[0].as_paragraph().unwrap().full_text(),
        "Offer for Smith & <Sons>"
    );
}

#[test]
fn test_untouched_parts_are_preserved() {
    let original = build_docx();
    let (bytes, _) = fill_bytes(&original, &values(), &FillOptions::default()).unwrap();

    assert_eq!(read_entry(&bytes, "word/styles.xml"), read_entry(&original, "word/styles.xml"));
    assert_eq!(read_entry(&bytes, "word/media/image1.png"), IMAGE);
    assert_eq!(
        read_entry(&bytes, "[Content_Types].xml"),
        read_entry(&original, "[Content_Types].xml")
    );
}

#[test]
fn test_no_values_keeps_document_bytes() {
    let original = build_docx();
    let (bytes, report) =
        fill_bytes(&original, &PlaceholderValues::new(), &FillOptions::default()).unwrap();
    assert!(!report.changed());
    assert_eq!(
        read_entry(&bytes, "word/document.xml"),
        read_entry(&original, "word/document.xml")
    );
}

#[test]
fn test_fill_file_writes_target() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("offer.docx");
    std::fs::write(&source, build_docx()).unwrap();

    let target = dir.path().join(generate_file_name("offer.docx"));
    let report = fill_file(&source, &target, &values()).unwrap();
    assert!(report.changed());
    assert_eq!(extract_placeholders(&target).unwrap(), vec!["unknown"]);
    assert_eq!(
        extract_placeholders(&source).unwrap().len(),
        5,
        "source template must not change"
    );
}

#[test]
fn test_strict_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("offer.docx");
    std::fs::write(&source, build_docx()).unwrap();
    let target = dir.path().join("out.docx");

    let result = fill_file_with_options(&source, &target, &values(), &FillOptions::new().strict());
    assert!(matches!(result, Err(Error::MissingValues(ref names)) if names == &["unknown"]));
    assert!(!target.exists());
}

#[test]
fn test_invalid_inputs() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.docx");
    assert!(matches!(extract_placeholders(&missing), Err(Error::Io(_))));

    let text = dir.path().join("notes.docx");
    std::fs::write(&text, "not a zip").unwrap();
    assert!(matches!(extract_placeholders(&text), Err(Error::UnknownFormat)));
}

#[test]
fn test_library_lists_generated_templates() {
    let dir = TempDir::new().unwrap();
    let group = dir.path().join("acme");
    std::fs::create_dir(&group).unwrap();
    std::fs::write(group.join("offer.docx"), build_docx()).unwrap();

    let library = TemplateLibrary::scan(dir.path()).unwrap();
    let path = library.template_path("acme", "offer.docx").unwrap();
    assert_eq!(DocxTemplate::open(path).unwrap().placeholders().len(), 5);
}
