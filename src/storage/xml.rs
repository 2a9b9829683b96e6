//! Element-tree formats for record lists and string resources.

use quick_xml::escape::{partial_escape, resolve_xml_entity};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;

use crate::error::{Result, ScrapeError};
use crate::localization::Term;
use crate::models::{Record, RecordList, RECORD_LIST_TAG, RECORD_TAG, UID_TAG};

const RESOURCES_TAG: &str = "resources";
const STRING_TAG: &str = "string";
const NAME_ATTR: &str = "name";

fn xml_err<E: Display>(err: E) -> ScrapeError {
    ScrapeError::Xml(err.to_string())
}

fn new_writer() -> Result<Writer<Vec<u8>>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(xml_err)?;
    Ok(writer)
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(tag)))
            .map_err(xml_err);
    }
    writer.write_event(Event::Start(BytesStart::new(tag))).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
        .map_err(xml_err)?;
    writer.write_event(Event::End(BytesEnd::new(tag))).map_err(xml_err)?;
    Ok(())
}

fn write_record(writer: &mut Writer<Vec<u8>>, record: &Record) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(RECORD_TAG))).map_err(xml_err)?;
    write_text_element(writer, UID_TAG, &record.id().to_string())?;
    for (name, value) in record.fields() {
        write_text_element(writer, name, &value.to_string())?;
    }
    writer.write_event(Event::End(BytesEnd::new(RECORD_TAG))).map_err(xml_err)?;
    Ok(())
}

/// `<RecordList><Record><id>..</id><field>..</field>..</Record>..</RecordList>`
pub fn render_record_list(records: &RecordList) -> Result<Vec<u8>> {
    let mut writer = new_writer()?;
    writer
        .write_event(Event::Start(BytesStart::new(RECORD_LIST_TAG)))
        .map_err(xml_err)?;
    for record in records {
        write_record(&mut writer, record)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(RECORD_LIST_TAG)))
        .map_err(xml_err)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

/// Android string escaping: apostrophes need a backslash.
pub fn escape_android(text: &str) -> String {
    text.replace('\'', "\\'")
}

pub fn unescape_android(text: &str) -> String {
    text.replace("\\'", "'")
}

/// `<resources><string name="key">text</string>..</resources>`
pub fn render_strings(terms: &[Term]) -> Result<Vec<u8>> {
    let mut writer = new_writer()?;
    writer
        .write_event(Event::Start(BytesStart::new(RESOURCES_TAG)))
        .map_err(xml_err)?;

    for term in terms {
        let start = BytesStart::new(STRING_TAG).with_attributes([(NAME_ATTR, term.key.as_str())]);
        let text = escape_android(&term.text);
        if text.is_empty() {
            writer.write_event(Event::Empty(start)).map_err(xml_err)?;
            continue;
        }
        writer.write_event(Event::Start(start)).map_err(xml_err)?;
        writer
            .write_event(Event::Text(BytesText::from_escaped(partial_escape(&text))))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new(STRING_TAG)))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(RESOURCES_TAG)))
        .map_err(xml_err)?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn name_attribute(start: &BytesStart) -> Result<String> {
    let attr = start
        .try_get_attribute(NAME_ATTR)
        .map_err(xml_err)?
        .ok_or_else(|| ScrapeError::Xml("string element without a name".to_string()))?;
    Ok(attr.unescape_value().map_err(xml_err)?.into_owned())
}

fn push_entity(text: &mut String, raw: &str) -> Result<()> {
    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse(),
        }
        .map_err(xml_err)?;
        if let Some(ch) = char::from_u32(code) {
            text.push(ch);
        }
    } else if let Some(entity) = resolve_xml_entity(raw) {
        text.push_str(entity);
    } else {
        return Err(ScrapeError::Xml(format!("unknown entity '{}'", raw)));
    }
    Ok(())
}

/// Read back a string resource file written by [`render_strings`].
pub fn parse_strings(xml: &str) -> Result<Vec<Term>> {
    let mut reader = Reader::from_str(xml);
    let mut terms = Vec::new();
    let mut current: Option<Term> = None;

    loop {
        match reader.read_event().map_err(xml_err)? {
            Event::Start(e) if e.name().as_ref() == STRING_TAG.as_bytes() => {
                current = Some(Term::new(name_attribute(&e)?, String::new()));
            }
            Event::Empty(e) if e.name().as_ref() == STRING_TAG.as_bytes() => {
                terms.push(Term::new(name_attribute(&e)?, String::new()));
            }
            Event::Text(e) => {
                if let Some(term) = current.as_mut() {
                    term.text.push_str(&e.xml_content().map_err(xml_err)?);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(term) = current.as_mut() {
                    push_entity(&mut term.text, &e.xml_content().map_err(xml_err)?)?;
                }
            }
            Event::CData(e) => {
                if let Some(term) = current.as_mut() {
                    term.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Event::End(e) if e.name().as_ref() == STRING_TAG.as_bytes() => {
                if let Some(mut term) = current.take() {
                    term.text = unescape_android(&term.text);
                    terms.push(term);
                }
            }
            Event::Eof => break,
            _ => (),
        }
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, FieldValue};
    use pretty_assertions::assert_eq;

    #[test]
    fn record_list_layout() {
        let mut availability = Availability::default();
        availability.set(0, true);
        let list = RecordList::new(vec![Record::new(
            101,
            vec![
                ("name".into(), FieldValue::text("sea_bass")),
                ("price".into(), FieldValue::Integer(1200)),
                ("shadow".into(), FieldValue::text("")),
                ("availability".into(), FieldValue::Bitmask(availability)),
            ],
        )]);

        let xml = String::from_utf8(render_record_list(&list).unwrap()).unwrap();
        let expected = r#"<?xml version="1.0" encoding="utf-8"?>
<RecordList>
  <Record>
    <id>101</id>
    <name>sea_bass</name>
    <price>1200</price>
    <shadow/>
    <availability>100000000000</availability>
  </Record>
</RecordList>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn strings_escape_and_read_back() {
        let terms = vec![
            Term::new("k_k_s_song", "K.K.'s Song"),
            Term::new("fish_bait", "Fish <bait> & more"),
        ];
        let xml = String::from_utf8(render_strings(&terms).unwrap()).unwrap();

        assert!(xml.contains(r#"<string name="k_k_s_song">K.K.\'s Song</string>"#));
        assert!(xml.contains("Fish &lt;bait&gt; &amp; more"));
        assert_eq!(parse_strings(&xml).unwrap(), terms);
    }

    #[test]
    fn empty_resources() {
        let xml = String::from_utf8(render_strings(&[]).unwrap()).unwrap();
        assert!(parse_strings(&xml).unwrap().is_empty());
    }

    #[test]
    fn parses_character_references() {
        let xml = r#"<resources><string name="a">caf&#233; &#x41;</string><string name="b"/></resources>"#;
        assert_eq!(
            parse_strings(xml).unwrap(),
            vec![Term::new("a", "café A"), Term::new("b", "")]
        );
    }
}
