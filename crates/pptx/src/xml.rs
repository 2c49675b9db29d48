//! Minimal streaming XML builder over `quick_xml::Writer`.

use deck_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Builds one XML part in memory.
pub(crate) struct XmlPart {
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    /// Start a standalone UTF-8 document.
    pub fn new() -> Result<Self> {
        let mut part = Self {
            writer: Writer::new(Vec::new()),
        };
        part.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(part)
    }

    /// Open an element.
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Start(start))?;
        Ok(self)
    }

    /// Close an element.
    pub fn close(&mut self, name: &str) -> Result<&mut Self> {
        self.write(Event::End(BytesEnd::new(name)))?;
        Ok(self)
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<&mut Self> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Empty(start))?;
        Ok(self)
    }

    /// Write an element containing only escaped text.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<&mut Self> {
        self.open(name, attrs)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    /// The finished document bytes.
    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(format!("Failed to write XML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_escaped_document() {
        let mut part = XmlPart::new().unwrap();
        part.open("a:p", &[("algn", "l")]).unwrap();
        part.text_element("a:t", &[], "R&D <ok>").unwrap();
        part.empty("a:endParaRPr", &[("lang", "en-US")]).unwrap();
        part.close("a:p").unwrap();

        let xml = String::from_utf8(part.finish()).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains(r#"<a:p algn="l"><a:t>R&amp;D &lt;ok&gt;</a:t><a:endParaRPr lang="en-US"/></a:p>"#));
    }
}
