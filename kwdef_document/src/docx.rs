use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::{Read, Seek};
use std::sync::OnceLock;
use tracing::debug;
use zip::ZipArchive;

use crate::{DocumentError, Result};

const MAIN_PART: &str = "word/document.xml";

static HEADER_PART: OnceLock<regex::Regex> = OnceLock::new();
static FOOTER_PART: OnceLock<regex::Regex> = OnceLock::new();

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn header_part() -> &'static regex::Regex {
    HEADER_PART.get_or_init(|| {
        regex::Regex::new(r"^word/header[0-9]*\.xml$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

#[expect(
    clippy::expect_used,
    reason = "Static regex pattern validated at compile time"
)]
fn footer_part() -> &'static regex::Regex {
    FOOTER_PART.get_or_init(|| {
        regex::Regex::new(r"^word/footer[0-9]*\.xml$")
            .expect("Static regex pattern is guaranteed to be valid")
    })
}

/// Extract the plain text of a `.docx` archive.
pub fn docx_to_text<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader)?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();

    if !names.iter().any(|name| name == MAIN_PART) {
        return Err(DocumentError::MissingPart(MAIN_PART.to_string()));
    }

    let mut text = String::new();
    for name in names.iter().filter(|name| header_part().is_match(name)) {
        text.push_str(&part_text(&mut archive, name)?);
    }
    text.push_str(&part_text(&mut archive, MAIN_PART)?);
    for name in names.iter().filter(|name| footer_part().is_match(name)) {
        text.push_str(&part_text(&mut archive, name)?);
    }

    Ok(text.trim().to_string())
}

fn part_text<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<String> {
    let mut part = archive.by_name(name)?;
    let mut xml = Vec::new();
    part.read_to_end(&mut xml)?;
    debug!("Reading document part {name} ({} bytes)", xml.len());
    xml_to_text(&xml)
}

/// Convert one WordprocessingML part to text.
///
/// Each `w:p` contributes a leading blank line, `w:t` contributes its text,
/// `w:tab` a tab, `w:br` and `w:cr` a newline.
pub fn xml_to_text(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut text = String::new();
    let mut buf = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                name => push_marker(&mut text, name),
            },
            Event::Empty(ref e) => push_marker(&mut text, e.name().as_ref()),
            Event::End(ref e) => {
                if e.name().as_ref() == b"w:t" {
                    in_text = false;
                }
            }
            Event::Text(e) if in_text => text.push_str(&e.unescape()?),
            Event::CData(e) if in_text => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

fn push_marker(text: &mut String, name: &[u8]) {
    match name {
        b"w:p" => text.push_str("\n\n"),
        b"w:tab" => text.push('\t'),
        b"w:br" | b"w:cr" => text.push('\n'),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[test]
    fn test_paragraphs_get_blank_line_prefix() {
        let xml = wrap(
            "<w:p><w:r><w:t>Apple: A fruit.</w:t></w:r></w:p><w:p><w:r><w:t>Banana: B</w:t></w:r></w:p>",
        );
        assert_eq!(
            xml_to_text(xml.as_bytes()).unwrap(),
            "\n\nApple: A fruit.\n\nBanana: B"
        );
    }

    #[test]
    fn test_runs_are_concatenated_with_spaces_kept() {
        let xml = wrap(
            r#"<w:p><w:r><w:t xml:space="preserve">Apple: </w:t></w:r><w:r><w:t>A fruit.</w:t></w:r></w:p>"#,
        );
        assert_eq!(xml_to_text(xml.as_bytes()).unwrap(), "\n\nApple: A fruit.");
    }

    #[test]
    fn test_tabs_breaks_and_entities() {
        let xml = wrap(
            "<w:p><w:r><w:t>A</w:t><w:tab/><w:t>B</w:t><w:br/><w:t>C &amp; D</w:t><w:cr/></w:r></w:p>",
        );
        assert_eq!(xml_to_text(xml.as_bytes()).unwrap(), "\n\nA\tB\nC & D\n");
    }

    #[test]
    fn test_empty_paragraph_and_non_text_elements() {
        let xml = wrap(
            "<w:p/><w:p><w:pPr><w:pStyle w:val=\"Heading1\"/></w:pPr><w:r><w:instrText>TOC</w:instrText><w:t>Title</w:t></w:r></w:p>",
        );
        assert_eq!(xml_to_text(xml.as_bytes()).unwrap(), "\n\n\n\nTitle");
    }

    #[test]
    fn test_malformed_xml_is_error() {
        let err = xml_to_text(b"<w:p><w:t>open</w:p>").unwrap_err();
        assert!(matches!(err, DocumentError::Xml(_)));
    }
}
