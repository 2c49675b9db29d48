//! PPTX template reader.
//!
//! Loads the canvas size and slide layout catalogue of a `.pptx`/`.potx`
//! file into a [`SlideDocument`]. Slides, masters and theme artwork of the
//! template are not carried over.

use crate::package::{
    extract_part_number, local_name, parse_relationships, read_part, rels_path_for,
    resolve_target,
};
use deck_core::document::{Emu, PlaceholderDef, PlaceholderKind, Rect, SlideLayout};
use deck_core::{Error, Result, SlideDocument};
use log::{debug, info, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const LAYOUT_DIR: &str = "ppt/slideLayouts/";

/// Reader for PPTX templates.
pub struct TemplateReader;

impl TemplateReader {
    /// Create a new template reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a template file from disk.
    pub fn read_path(&self, path: &Path) -> Result<SlideDocument> {
        let file = File::open(path)?;
        let document = self.read(BufReader::new(file))?;
        info!(
            "Loaded template {} ({} layouts)",
            path.display(),
            document.layouts.len()
        );
        Ok(document)
    }

    /// Read a template from any seekable reader.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<SlideDocument> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let presentation = read_part(&mut archive, PRESENTATION_PART)?;
        let (width, height) = parse_slide_size(&presentation)?
            .unwrap_or((SlideDocument::DEFAULT_WIDTH, SlideDocument::DEFAULT_HEIGHT));

        let master_path = self.find_master(&mut archive)?;
        let (master, layout_paths) = match &master_path {
            Some(path) => {
                let master = parse_part(&read_part(&mut archive, path)?)?;
                let ordered = self.ordered_layouts_from_master(&mut archive, path, &master)?;
                (Some(master), ordered)
            }
            None => (None, Vec::new()),
        };

        let layout_paths = if layout_paths.is_empty() {
            debug!("No layout list on the slide master, ordering layouts by part number");
            layouts_by_part_number(&archive)
        } else {
            layout_paths
        };

        if layout_paths.is_empty() {
            return Err(Error::TemplateError("template has no slide layouts".to_string()));
        }

        let defaults = DefaultFrames::for_canvas(width, height);
        let inherited = master
            .as_ref()
            .map(|m| m.frames_by_role())
            .unwrap_or_default();

        let mut layouts = Vec::with_capacity(layout_paths.len());
        for (position, path) in layout_paths.iter().enumerate() {
            let part = parse_part(&read_part(&mut archive, path)?)?;
            let name = part
                .name
                .clone()
                .unwrap_or_else(|| format!("Layout {}", position + 1));
            let placeholders = part
                .placeholders
                .iter()
                .enumerate()
                .map(|(i, raw)| raw.resolve(i, &inherited, &defaults))
                .collect();
            debug!("Template layout {}: {}", position, name);
            layouts.push(SlideLayout::new(name, placeholders));
        }

        Ok(SlideDocument::new(width, height, layouts))
    }

    /// Locate the first slide master through the presentation relationships.
    fn find_master<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Option<String>> {
        let rels_path = rels_path_for(PRESENTATION_PART);
        let rels = match read_part(archive, &rels_path) {
            Ok(xml) => parse_relationships(&xml)?,
            Err(e) => {
                warn!("Template has no presentation relationships: {}", e);
                return Ok(None);
            }
        };

        let mut masters: Vec<_> = rels.into_iter().filter(|r| r.is("slideMaster")).collect();
        masters.sort_by_key(|r| extract_part_number(&r.id));
        Ok(masters
            .first()
            .map(|r| resolve_target(PRESENTATION_PART, &r.target)))
    }

    /// Layout part paths in the order the master's `sldLayoutIdLst` gives.
    fn ordered_layouts_from_master<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        master_path: &str,
        master: &ParsedPart,
    ) -> Result<Vec<String>> {
        if master.layout_rel_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rels = match read_part(archive, &rels_path_for(master_path)) {
            Ok(xml) => parse_relationships(&xml)?,
            Err(_) => return Ok(Vec::new()),
        };
        let targets: HashMap<&str, String> = rels
            .iter()
            .filter(|r| r.is("slideLayout"))
            .map(|r| (r.id.as_str(), resolve_target(master_path, &r.target)))
            .collect();

        Ok(master
            .layout_rel_ids
            .iter()
            .filter_map(|id| targets.get(id.as_str()).cloned())
            .filter(|path| archive.by_name(path).is_ok())
            .collect())
    }
}

impl Default for TemplateReader {
    fn default() -> Self {
        Self::new()
    }
}

/// All `ppt/slideLayouts/slideLayoutN.xml` parts, ordered by N.
fn layouts_by_part_number<R: Read + Seek>(archive: &ZipArchive<R>) -> Vec<String> {
    let mut layouts: Vec<(String, Option<usize>)> = archive
        .file_names()
        .filter(|name| {
            name.starts_with(LAYOUT_DIR)
                && name.ends_with(".xml")
                && !name[LAYOUT_DIR.len()..].contains('/')
        })
        .map(|name| (name.to_string(), extract_part_number(name)))
        .collect();

    layouts.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    layouts.into_iter().map(|(path, _)| path).collect()
}

/// Read `<p:sldSz cx cy>` from the presentation part.
fn parse_slide_size(xml: &str) -> Result<Option<(Emu, Emu)>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldSz" =>
            {
                let cx = attr_i64(e, b"cx");
                let cy = attr_i64(e, b"cy");
                return Ok(match (cx, cy) {
                    (Some(cx), Some(cy)) if cx > 0 && cy > 0 => Some((Emu(cx), Emu(cy))),
                    _ => None,
                });
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }
}

/// Broad placeholder role used for geometry inheritance from the master.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FrameRole {
    Title,
    Body,
    Date,
    Footer,
    SlideNumber,
}

impl FrameRole {
    fn of(kind: PlaceholderKind) -> Self {
        match kind {
            PlaceholderKind::Title | PlaceholderKind::CenterTitle => Self::Title,
            PlaceholderKind::Date => Self::Date,
            PlaceholderKind::Footer => Self::Footer,
            PlaceholderKind::SlideNumber => Self::SlideNumber,
            _ => Self::Body,
        }
    }
}

/// Canvas-relative frames used when neither the layout nor the master
/// declares geometry.
struct DefaultFrames {
    width: i64,
    height: i64,
}

impl DefaultFrames {
    fn for_canvas(width: Emu, height: Emu) -> Self {
        Self {
            width: width.0,
            height: height.0,
        }
    }

    fn frame(&self, role: FrameRole) -> Rect {
        let (w, h) = (self.width, self.height);
        match role {
            FrameRole::Title => Rect::emu(w / 20, h / 25, w * 9 / 10, h / 6),
            FrameRole::Body => Rect::emu(w / 20, h * 7 / 30, w * 9 / 10, h * 2 / 3),
            FrameRole::Date => Rect::emu(w / 20, h * 27 / 29, w * 2 / 9, h / 20),
            FrameRole::Footer => Rect::emu(w / 3, h * 27 / 29, w / 3, h / 20),
            FrameRole::SlideNumber => Rect::emu(w * 13 / 18, h * 27 / 29, w * 2 / 9, h / 20),
        }
    }
}

/// A placeholder as declared in a layout or master part.
#[derive(Debug, Clone, Default)]
struct RawPlaceholder {
    name: String,
    ph_type: Option<String>,
    idx: Option<u32>,
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
}

impl RawPlaceholder {
    fn kind(&self) -> PlaceholderKind {
        PlaceholderKind::from_ooxml(self.ph_type.as_deref())
    }

    fn frame(&self) -> Option<Rect> {
        match (self.offset, self.extent) {
            (Some((x, y)), Some((cx, cy))) => Some(Rect::emu(x, y, cx, cy)),
            _ => None,
        }
    }

    fn resolve(
        &self,
        position: usize,
        inherited: &HashMap<FrameRole, Rect>,
        defaults: &DefaultFrames,
    ) -> PlaceholderDef {
        let kind = self.kind();
        let role = FrameRole::of(kind);
        let frame = self
            .frame()
            .or_else(|| inherited.get(&role).copied())
            .unwrap_or_else(|| defaults.frame(role));
        // Title placeholders carry no idx attribute; it defaults to 0.
        let idx = self.idx.unwrap_or(if role == FrameRole::Title { 0 } else { position as u32 });
        let name = if self.name.is_empty() {
            format!("Placeholder {}", position + 1)
        } else {
            self.name.clone()
        };
        PlaceholderDef::new(idx, kind, name, frame)
    }
}

/// What the reader extracts from a master or layout part.
#[derive(Debug, Default)]
struct ParsedPart {
    /// `<p:cSld name>`.
    name: Option<String>,
    placeholders: Vec<RawPlaceholder>,
    /// `r:id` values of `<p:sldLayoutId>` in document order (masters only).
    layout_rel_ids: Vec<String>,
}

impl ParsedPart {
    fn frames_by_role(&self) -> HashMap<FrameRole, Rect> {
        let mut frames = HashMap::new();
        for raw in &self.placeholders {
            if let Some(frame) = raw.frame() {
                frames.entry(FrameRole::of(raw.kind())).or_insert(frame);
            }
        }
        frames
    }
}

/// Parse the layout name, placeholders and layout id list of a part.
fn parse_part(xml: &str) -> Result<ParsedPart> {
    let mut part = ParsedPart::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current: Option<(RawPlaceholder, bool)> = None; // (shape, is placeholder)
    let mut in_xfrm = false;

    loop {
        let event = reader.read_event();
        let (element, is_empty) = match &event {
            Ok(Event::Start(e)) => (Some(e.clone()), false),
            Ok(Event::Empty(e)) => (Some(e.clone()), true),
            _ => (None, false),
        };

        if let Some(e) = element {
            let name = e.name();
            match local_name(name.as_ref()) {
                b"cSld" => part.name = attr_string(&e, b"name"),
                b"sldLayoutId" => {
                    let rel_id = e.attributes().flatten().find_map(|attr| {
                        let key = attr.key.as_ref();
                        (key.contains(&b':') && local_name(key) == b"id")
                            .then(|| String::from_utf8_lossy(&attr.value).to_string())
                    });
                    part.layout_rel_ids.extend(rel_id);
                }
                b"sp" if !is_empty => current = Some((RawPlaceholder::default(), false)),
                b"cNvPr" => {
                    if let Some((shape, _)) = current.as_mut() {
                        shape.name = attr_string(&e, b"name").unwrap_or_default();
                    }
                }
                b"ph" => {
                    if let Some((shape, is_placeholder)) = current.as_mut() {
                        *is_placeholder = true;
                        shape.ph_type = attr_string(&e, b"type");
                        shape.idx = attr_i64(&e, b"idx").and_then(|v| u32::try_from(v).ok());
                    }
                }
                b"xfrm" if !is_empty => in_xfrm = true,
                b"off" if in_xfrm => {
                    if let Some((shape, _)) = current.as_mut() {
                        if let (Some(x), Some(y)) = (attr_i64(&e, b"x"), attr_i64(&e, b"y")) {
                            shape.offset = Some((x, y));
                        }
                    }
                }
                b"ext" if in_xfrm => {
                    if let Some((shape, _)) = current.as_mut() {
                        if let (Some(cx), Some(cy)) = (attr_i64(&e, b"cx"), attr_i64(&e, b"cy")) {
                            shape.extent = Some((cx, cy));
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    if let Some((shape, true)) = current.take() {
                        part.placeholders.push(shape);
                    }
                    in_xfrm = false;
                }
                b"xfrm" => in_xfrm = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing template part: {}", e)));
            }
            _ => {}
        }
    }

    Ok(part)
}

fn attr_string(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

fn attr_i64(e: &BytesStart, key: &[u8]) -> Option<i64> {
    attr_string(e, key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const LAYOUT_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    const MASTER_REL: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    fn archive(parts: &[(&str, String)]) -> Cursor<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn presentation(cx: i64, cy: i64) -> String {
        format!(
            r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldSz cx="{cx}" cy="{cy}"/></p:presentation>"#
        )
    }

    fn layout(name: &str, shapes: &str) -> String {
        format!(
            r#"<p:sldLayout xmlns:p="p" xmlns:a="a"><p:cSld name="{name}"><p:spTree>
<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>
{shapes}</p:spTree></p:cSld></p:sldLayout>"#
        )
    }

    fn placeholder(id: u32, name: &str, ph: &str, xfrm: &str) -> String {
        format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr>{xfrm}</p:spPr></p:sp>"#
        )
    }

    fn rels(entries: &[(&str, &str, &str)]) -> String {
        let body: String = entries
            .iter()
            .map(|(id, ty, target)| format!(r#"<Relationship Id="{id}" Type="{ty}" Target="{target}"/>"#))
            .collect();
        format!(r#"<Relationships xmlns="x">{body}</Relationships>"#)
    }

    #[test]
    fn test_layout_order_follows_master_id_list() {
        let master = format!(
            r#"<p:sldMaster xmlns:p="p" xmlns:a="a" xmlns:r="r"><p:cSld><p:spTree>{}</p:spTree></p:cSld>
<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId2"/><p:sldLayoutId id="2147483650" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
            placeholder(
                2,
                "Title Placeholder 1",
                r#"<p:ph type="title"/>"#,
                r#"<a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm>"#
            )
        );
        let cursor = archive(&[
            ("ppt/presentation.xml", presentation(12_192_000, 6_858_000)),
            (
                "ppt/_rels/presentation.xml.rels",
                rels(&[("rId1", MASTER_REL, "slideMasters/slideMaster1.xml")]),
            ),
            ("ppt/slideMasters/slideMaster1.xml", master),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels",
                rels(&[
                    ("rId1", LAYOUT_REL, "../slideLayouts/slideLayout1.xml"),
                    ("rId2", LAYOUT_REL, "../slideLayouts/slideLayout2.xml"),
                ]),
            ),
            (
                "ppt/slideLayouts/slideLayout1.xml",
                layout(
                    "Title and Content",
                    &placeholder(2, "Title 1", r#"<p:ph type="title"/>"#, ""),
                ),
            ),
            ("ppt/slideLayouts/slideLayout2.xml", layout("Title Slide", "")),
        ]);

        let doc = TemplateReader::new().read(cursor).unwrap();
        assert_eq!(doc.width, Emu(12_192_000));
        let names: Vec<&str> = doc.layouts.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Title Slide", "Title and Content"]);

        // Geometry missing on the layout is inherited from the master title.
        let title = &doc.layouts[1].placeholders[0];
        assert_eq!(title.kind, PlaceholderKind::Title);
        assert_eq!(title.idx, 0);
        assert_eq!(title.frame, Rect::emu(100, 200, 300, 400));
    }

    #[test]
    fn test_layouts_fall_back_to_part_number_order() {
        let body = placeholder(
            3,
            "Content Placeholder 2",
            r#"<p:ph idx="1"/>"#,
            r#"<a:xfrm><a:off x="1" y="2"/><a:ext cx="3" cy="4"/></a:xfrm>"#,
        );
        let cursor = archive(&[
            ("ppt/presentation.xml", presentation(9_144_000, 6_858_000)),
            ("ppt/slideLayouts/slideLayout10.xml", layout("Ten", "")),
            ("ppt/slideLayouts/slideLayout2.xml", layout("Two", &body)),
            ("ppt/slideLayouts/_rels/slideLayout2.xml.rels", rels(&[])),
        ]);

        let doc = TemplateReader::new().read(cursor).unwrap();
        let names: Vec<&str> = doc.layouts.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Two", "Ten"]);

        let content = &doc.layouts[0].placeholders[0];
        assert_eq!(content.kind, PlaceholderKind::Object);
        assert_eq!(content.idx, 1);
        assert_eq!(content.name, "Content Placeholder 2");
        assert_eq!(content.frame, Rect::emu(1, 2, 3, 4));
    }

    #[test]
    fn test_missing_geometry_uses_canvas_default() {
        let cursor = archive(&[
            ("ppt/presentation.xml", presentation(9_144_000, 6_858_000)),
            (
                "ppt/slideLayouts/slideLayout1.xml",
                layout("Only", &placeholder(2, "Text 1", r#"<p:ph type="body" idx="1"/>"#, "")),
            ),
        ]);

        let doc = TemplateReader::new().read(cursor).unwrap();
        let frame = doc.layouts[0].placeholders[0].frame;
        assert_eq!(frame.x, Emu(9_144_000 / 20));
        assert!(frame.width.0 > 0 && frame.height.0 > 0);
    }

    #[test]
    fn test_template_without_layouts_is_an_error() {
        let cursor = archive(&[("ppt/presentation.xml", presentation(9_144_000, 6_858_000))]);
        let err = TemplateReader::new().read(cursor).unwrap_err();
        assert!(matches!(err, Error::TemplateError(_)));
    }

    #[test]
    fn test_not_a_zip() {
        let err = TemplateReader::new()
            .read(Cursor::new(b"not a zip".to_vec()))
            .unwrap_err();
        assert!(matches!(err, Error::ZipError(_)));
    }
}
