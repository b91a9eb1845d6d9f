use resume_nlu::{
    DocumentFormat, Error, Extractor,
    engine::{NativeEngine, OfficeHost, docx::paragraphs_from_xml},
    config::Legacy,
};
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;

fn body(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006"><w:body>{inner}</w:body></w:document>"#
    )
}

fn para(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

fn write_docx(path: &Path, document_xml: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let opts = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", opts).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file("word/document.xml", opts).unwrap();
    zip.write_all(document_xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

fn extractor() -> Extractor<NativeEngine<OfficeHost>> {
    Extractor::new(NativeEngine::new(OfficeHost::new(&Legacy::default())))
}

#[test]
fn paragraphs_in_document_order() {
    let xml = body(&[para("A"), para("B"), para("C")].concat());
    assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["A", "B", "C"]);
}

#[test]
fn runs_tabs_breaks_and_entities() {
    let xml = body(
        r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t>Skills</w:t></w:r><w:r><w:tab/><w:t>C &amp; Rust</w:t></w:r><w:r><w:br/><w:t>&lt;more&gt;</w:t></w:r></w:p>"#,
    );
    assert_eq!(
        paragraphs_from_xml(&xml).unwrap(),
        vec!["Skills\tC & Rust\n<more>"]
    );
}

#[test]
fn empty_paragraphs_are_kept() {
    let xml = body(&format!("{}<w:p/><w:p></w:p>{}", para("Top"), para("Bottom")));
    assert_eq!(
        paragraphs_from_xml(&xml).unwrap(),
        vec!["Top", "", "", "Bottom"]
    );
}

#[test]
fn fallback_content_is_not_duplicated() {
    let xml = body(&format!(
        r#"<w:p><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:t>box</w:t></mc:Choice><mc:Fallback>{}</mc:Fallback></mc:AlternateContent></w:r></w:p>"#,
        para("box")
    ));
    assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["box"]);
}

#[test]
fn instruction_text_is_ignored() {
    let xml = body(
        r#"<w:p><w:r><w:instrText> PAGE </w:instrText></w:r><w:r><w:t>Visible</w:t></w:r></w:p>"#,
    );
    assert_eq!(paragraphs_from_xml(&xml).unwrap(), vec!["Visible"]);
}

#[test]
fn malformed_xml_is_an_error() {
    let xml = body("<w:p><w:r><w:t>oops</w:r></w:p>");
    assert!(paragraphs_from_xml(&xml).is_err());
}

#[test]
fn extracts_docx_package_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.docx");
    write_docx(&path, &body(&[para("Jane Doe"), para("Rust engineer"), para("Bucharest")].concat()));

    let text = extractor().extract(&path).unwrap();
    assert_eq!(text, "Jane Doe\nRust engineer\nBucharest");
}

#[test]
fn package_without_document_part_fails_as_docx() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.docx");
    let file = std::fs::File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("word/styles.xml", SimpleFileOptions::default()).unwrap();
    zip.write_all(b"<w:styles/>").unwrap();
    zip.finish().unwrap();

    let err = extractor().extract(&path).unwrap_err();
    assert_eq!(err.format(), Some(DocumentFormat::WordPackage));
}

#[test]
fn non_zip_docx_fails_as_docx() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fake.docx");
    std::fs::write(&path, "plain text, not a package").unwrap();

    let err = extractor().extract(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Extraction {
            format: DocumentFormat::WordPackage,
            ..
        }
    ));
}

#[test]
fn missing_file_is_an_extraction_failure() {
    let dir = tempfile::tempdir().unwrap();
    let err = extractor().extract(&dir.path().join("nope.docx")).unwrap_err();
    assert_eq!(err.format(), Some(DocumentFormat::WordPackage));
}

#[test]
fn corrupt_pdf_fails_as_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.pdf");
    std::fs::write(&path, b"this is not a pdf at all").unwrap();

    let err = extractor().extract(&path).unwrap_err();
    assert_eq!(err.format(), Some(DocumentFormat::Pdf));
}
