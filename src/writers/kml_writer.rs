use crate::error::{ProcessingError, Result};
use crate::models::{Document, Placemark, StyleId};
use crate::utils::constants::KML_NAMESPACE;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// Which rendered block goes into `<description>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    #[default]
    Html,
    Text,
}

impl DescriptionFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "plain" => Ok(Self::Text),
            _ => Err(ProcessingError::Config(format!(
                "Unsupported description format: {}",
                value
            ))),
        }
    }
}

impl fmt::Display for DescriptionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Text => write!(f, "text"),
        }
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn xml_err(err: impl fmt::Display) -> ProcessingError {
    ProcessingError::Xml(err.to_string())
}

/// Serialises a [`Document`] as a KML 2.2 document
pub struct KmlWriter {
    description_format: DescriptionFormat,
    indent: usize,
}

impl KmlWriter {
    pub fn new() -> Self {
        Self {
            description_format: DescriptionFormat::Html,
            indent: 2,
        }
    }

    pub fn with_description_format(mut self, format: DescriptionFormat) -> Self {
        self.description_format = format;
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn description_format(&self) -> DescriptionFormat {
        self.description_format
    }

    /// Styles first, then placemarks, both in the order the document holds them
    pub fn to_bytes(&self, document: &Document) -> Result<Vec<u8>> {
        let mut writer = if self.indent > 0 {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.indent)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_err)?;

        let mut kml = BytesStart::new("kml");
        kml.push_attribute(("xmlns", KML_NAMESPACE));
        writer.write_event(Event::Start(kml)).map_err(xml_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("Document")))
            .map_err(xml_err)?;

        write_text_element(&mut writer, "name", document.name())?;

        for style in document.styles() {
            write_style(&mut writer, style)?;
        }

        for placemark in document.placemarks() {
            self.write_placemark(&mut writer, placemark)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("Document")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("kml")))
            .map_err(xml_err)?;

        let mut bytes = writer.into_inner().into_inner();
        bytes.push(b'\n');
        Ok(bytes)
    }

    fn write_placemark(&self, writer: &mut XmlWriter, placemark: &Placemark) -> Result<()> {
        writer
            .write_event(Event::Start(BytesStart::new("Placemark")))
            .map_err(xml_err)?;

        write_text_element(writer, "name", &placemark.name)?;
        write_text_element(writer, "styleUrl", &format!("#{}", placemark.style))?;

        let description = match self.description_format {
            DescriptionFormat::Html => &placemark.description.html,
            DescriptionFormat::Text => &placemark.description.text,
        };
        writer
            .write_event(Event::Start(BytesStart::new("description")))
            .map_err(xml_err)?;
        for segment in cdata_segments(description) {
            writer
                .write_event(Event::CData(BytesCData::new(segment.as_str())))
                .map_err(xml_err)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("description")))
            .map_err(xml_err)?;

        writer
            .write_event(Event::Start(BytesStart::new("Point")))
            .map_err(xml_err)?;
        write_text_element(writer, "coordinates", &placemark.coordinates())?;
        writer
            .write_event(Event::End(BytesEnd::new("Point")))
            .map_err(xml_err)?;

        writer
            .write_event(Event::End(BytesEnd::new("Placemark")))
            .map_err(xml_err)?;
        Ok(())
    }
}

impl Default for KmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn write_style(writer: &mut XmlWriter, style: &StyleId) -> Result<()> {
    let id = style.to_string();
    let mut start = BytesStart::new("Style");
    start.push_attribute(("id", id.as_str()));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("IconStyle")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("Icon")))
        .map_err(xml_err)?;
    write_text_element(writer, "href", &style.icon_href())?;
    writer
        .write_event(Event::End(BytesEnd::new("Icon")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("IconStyle")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("Style")))
        .map_err(xml_err)?;
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(xml_err)?;
    Ok(())
}

/// Split text so no section contains the CDATA terminator.
///
/// `a]]>b` becomes `a]]` and `>b`, which concatenate back to the original.
fn cdata_segments(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut segment = String::with_capacity(part.len() + 3);
            if i > 0 {
                segment.push('>');
            }
            segment.push_str(part);
            if i < last {
                segment.push_str("]]");
            }
            segment
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Description, StatusSuffix, StyleBase};

    fn placemark(name: &str, style: StyleId, html: &str) -> Placemark {
        Placemark {
            name: name.to_string(),
            style,
            description: Description {
                html: html.to_string(),
                text: format!("Name: {}\n", name),
            },
            longitude: -99.015,
            latitude: 19.74,
            altitude: 2240.0,
        }
    }

    fn sample_document() -> Document {
        let mut doc = Document::new("Mexican Airports");
        doc.add_placemark(placemark(
            "XNLU",
            StyleId::new(StyleBase::SeaplaneBase, StatusSuffix::Inactive),
            "<b>NLU</b>",
        ));
        doc.add_placemark(placemark(
            "A & B",
            StyleId::new(StyleBase::Aerodrome, StatusSuffix::Active),
            "<p>two</p>",
        ));
        doc
    }

    fn render(writer: &KmlWriter, doc: &Document) -> String {
        String::from_utf8(writer.to_bytes(doc).unwrap()).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let kml = render(&KmlWriter::new(), &sample_document());

        assert!(kml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(kml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
        assert!(kml.contains("<name>Mexican Airports</name>"));
        assert!(kml.contains("<Style id=\"aerodrome_active\">"));
        assert!(kml.contains("<href>files/seaplane_base_inactive.png</href>"));
        assert!(kml.contains("<styleUrl>#seaplane_base_inactive</styleUrl>"));
        assert!(kml.contains("<coordinates>-99.015,19.74,2240</coordinates>"));
        assert!(kml.contains("<name>A &amp; B</name>"));
        assert!(kml.contains("<![CDATA[<b>NLU</b>]]>"));
        assert!(kml.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn test_styles_precede_placemarks_in_sorted_order() {
        let kml = render(&KmlWriter::new(), &sample_document());

        let aerodrome = kml.find("<Style id=\"aerodrome_active\">").unwrap();
        let seaplane = kml.find("<Style id=\"seaplane_base_inactive\">").unwrap();
        let first_placemark = kml.find("<Placemark>").unwrap();
        assert!(aerodrome < seaplane);
        assert!(seaplane < first_placemark);

        let first = kml.find("<name>XNLU</name>").unwrap();
        let second = kml.find("<name>A &amp; B</name>").unwrap();
        assert!(first < second);
        assert_eq!(kml.matches("<Style id=").count(), 2);
    }

    #[test]
    fn test_text_description_format() {
        let writer = KmlWriter::new().with_description_format(DescriptionFormat::Text);
        let kml = render(&writer, &sample_document());

        assert!(kml.contains("<![CDATA[Name: XNLU\n]]>"));
        assert!(!kml.contains("<b>NLU</b>"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let writer = KmlWriter::new();
        let doc = sample_document();
        assert_eq!(writer.to_bytes(&doc).unwrap(), writer.to_bytes(&doc).unwrap());
    }

    #[test]
    fn test_cdata_terminator_is_split() {
        assert_eq!(cdata_segments("plain"), vec!["plain".to_string()]);
        assert_eq!(
            cdata_segments("a]]>b"),
            vec!["a]]".to_string(), ">b".to_string()]
        );
        assert_eq!(cdata_segments("a]]>b").concat(), "a]]>b");
    }

    #[test]
    fn test_parse_description_format() {
        assert_eq!(DescriptionFormat::parse("HTML").unwrap(), DescriptionFormat::Html);
        assert_eq!(DescriptionFormat::parse("text").unwrap(), DescriptionFormat::Text);
        assert!(DescriptionFormat::parse("markdown").is_err());
    }
}
