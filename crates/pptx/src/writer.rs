//! PPTX package writer.
//!
//! Serializes a [`SlideDocument`] into a complete Office Open XML package:
//! one slide master, one layout part per catalogue layout, a theme derived
//! from the document palette, the slides themselves, notes when present and
//! any embedded picture media.

use crate::package::{
    NS_CONTENT_TYPES, NS_DRAWING, NS_PACKAGE_RELATIONSHIPS, NS_PRESENTATION, NS_RELATIONSHIPS,
    REL_CORE_PROPERTIES, REL_EXTENDED_PROPERTIES, REL_IMAGE, REL_NOTES_MASTER, REL_NOTES_SLIDE,
    REL_OFFICE_DOCUMENT, REL_PRES_PROPS, REL_SLIDE, REL_SLIDE_LAYOUT, REL_SLIDE_MASTER,
    REL_TABLE_STYLES, REL_THEME, REL_VIEW_PROPS,
};
use crate::xml::XmlPart;
use deck_core::document::{
    DocumentTheme, Paragraph, PlaceholderDef, PlaceholderKind, Rect, Rgb, Shape, ShapeKind,
    SlideLayout, TextFrame, TextRun,
};
use deck_core::{Error, Result, Slide, SlideDocument};
use log::{debug, info};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CT_PRESENTATION: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
const CT_SLIDE_MASTER: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
const CT_SLIDE_LAYOUT: &str = "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
const CT_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
const CT_THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
const CT_NOTES_MASTER: &str = "application/vnd.openxmlformats-officedocument.presentationml.notesMaster+xml";
const CT_NOTES_SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml";
const CT_PRES_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
const CT_VIEW_PROPS: &str = "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
const CT_TABLE_STYLES: &str = "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_APP: &str = "application/vnd.openxmlformats-officedocument.extended-properties+xml";
const CT_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Notes page size (portrait 7.5x10 inches).
const NOTES_WIDTH: i64 = 6_858_000;
const NOTES_HEIGHT: i64 = 9_144_000;

/// First id of `<p:sldMasterId>`; layout ids continue from here.
const MASTER_ID: u64 = 2_147_483_648;

/// First id of `<p:sldId>`.
const FIRST_SLIDE_ID: u32 = 256;

const APPLICATION_NAME: &str = "deck-forge";

/// Writer for PPTX packages.
pub struct PptxWriter;

impl PptxWriter {
    /// Create a new PPTX writer.
    pub fn new() -> Self {
        Self
    }

    /// Write the document to a file, replacing any existing file.
    pub fn save(&self, document: &SlideDocument, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = self.write(document, BufWriter::new(file))?;
        writer.flush()?;
        info!(
            "Wrote {} slides to {}",
            document.slides.len(),
            path.display()
        );
        Ok(())
    }

    /// Write the document as a PPTX package into any seekable writer.
    ///
    /// Returns the writer once the archive is finished.
    pub fn write<W: Write + Seek>(&self, document: &SlideDocument, writer: W) -> Result<W> {
        let parts = build_package(document)?;

        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        for (name, bytes) in &parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(bytes)?;
        }
        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parts of the package in archive order, content types first.
fn build_package(document: &SlideDocument) -> Result<Vec<(String, Vec<u8>)>> {
    for (i, slide) in document.slides.iter().enumerate() {
        if slide.layout_index >= document.layouts.len() {
            return Err(Error::LayoutUnavailable(format!(
                "slide {} refers to layout {} but the document has {}",
                i + 1,
                slide.layout_index,
                document.layouts.len()
            )));
        }
    }

    let media = MediaCatalog::collect(&document.slides)?;
    let has_notes = document.slides.iter().any(|s| s.notes.is_some());
    let mut package = PackageParts::default();

    package.add("_rels/.rels", None, package_rels()?);
    package.add("docProps/core.xml", Some(CT_CORE), core_properties(document)?);
    package.add("docProps/app.xml", Some(CT_APP), app_properties(document)?);
    package.add("ppt/presentation.xml", Some(CT_PRESENTATION), presentation(document, has_notes)?);
    package.add("ppt/_rels/presentation.xml.rels", None, presentation_rels(document, has_notes)?);
    package.add("ppt/presProps.xml", Some(CT_PRES_PROPS), presentation_properties()?);
    package.add("ppt/viewProps.xml", Some(CT_VIEW_PROPS), view_properties()?);
    package.add("ppt/tableStyles.xml", Some(CT_TABLE_STYLES), table_styles()?);
    package.add("ppt/theme/theme1.xml", Some(CT_THEME), theme(&document.theme)?);
    package.add(
        "ppt/slideMasters/slideMaster1.xml",
        Some(CT_SLIDE_MASTER),
        slide_master(document)?,
    );
    package.add(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        None,
        slide_master_rels(document.layouts.len())?,
    );

    for (i, layout) in document.layouts.iter().enumerate() {
        let n = i + 1;
        package.add(
            format!("ppt/slideLayouts/slideLayout{}.xml", n),
            Some(CT_SLIDE_LAYOUT),
            slide_layout(layout)?,
        );
        package.add(
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n),
            None,
            relationships(&[("rId1", REL_SLIDE_MASTER, "../slideMasters/slideMaster1.xml")])?,
        );
    }

    if has_notes {
        package.add("ppt/theme/theme2.xml", Some(CT_THEME), theme(&document.theme)?);
        package.add("ppt/notesMasters/notesMaster1.xml", Some(CT_NOTES_MASTER), notes_master()?);
        package.add(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            None,
            relationships(&[("rId1", REL_THEME, "../theme/theme2.xml")])?,
        );
    }

    for (i, slide) in document.slides.iter().enumerate() {
        let n = i + 1;
        let rels = SlideRels::for_slide(slide, n, &media);
        package.add(format!("ppt/slides/slide{}.xml", n), Some(CT_SLIDE), slide_part(slide, &rels)?);
        package.add(format!("ppt/slides/_rels/slide{}.xml.rels", n), None, rels.to_xml()?);

        if let Some(notes) = &slide.notes {
            package.add(
                format!("ppt/notesSlides/notesSlide{}.xml", n),
                Some(CT_NOTES_SLIDE),
                notes_slide(notes)?,
            );
            let slide_target = format!("../slides/slide{}.xml", n);
            package.add(
                format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", n),
                None,
                relationships(&[
                    ("rId1", REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
                    ("rId2", REL_SLIDE, slide_target.as_str()),
                ])?,
            );
        }
    }

    for entry in &media.entries {
        package.defaults.insert(entry.extension.clone(), image_content_type(&entry.extension));
        package.add(entry.part_name.clone(), None, entry.bytes.clone());
    }

    debug!(
        "Built package with {} parts ({} media)",
        package.parts.len(),
        media.entries.len()
    );
    package.into_parts()
}

#[derive(Default)]
struct PackageParts {
    parts: Vec<(String, Vec<u8>)>,
    overrides: Vec<(String, &'static str)>,
    defaults: BTreeMap<String, &'static str>,
}

impl PackageParts {
    fn add(&mut self, name: impl Into<String>, content_type: Option<&'static str>, bytes: Vec<u8>) {
        let name = name.into();
        if let Some(content_type) = content_type {
            self.overrides.push((format!("/{}", name), content_type));
        }
        self.parts.push((name, bytes));
    }

    fn into_parts(mut self) -> Result<Vec<(String, Vec<u8>)>> {
        self.defaults.insert("rels".to_string(), CT_RELATIONSHIPS);
        self.defaults.insert("xml".to_string(), "application/xml");

        let mut x = XmlPart::new()?;
        x.open("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        for (extension, content_type) in &self.defaults {
            x.empty("Default", &[("Extension", extension), ("ContentType", content_type)])?;
        }
        for (part_name, content_type) in &self.overrides {
            x.empty("Override", &[("PartName", part_name), ("ContentType", content_type)])?;
        }
        x.close("Types")?;

        let mut parts = Vec::with_capacity(self.parts.len() + 1);
        parts.push(("[Content_Types].xml".to_string(), x.finish()));
        parts.append(&mut self.parts);
        Ok(parts)
    }
}

/// One embedded image file.
struct MediaEntry {
    source: PathBuf,
    part_name: String,
    extension: String,
    bytes: Vec<u8>,
}

/// Distinct picture files used by the slides, in first-use order.
struct MediaCatalog {
    entries: Vec<MediaEntry>,
}

impl MediaCatalog {
    fn collect(slides: &[Slide]) -> Result<Self> {
        let mut entries: Vec<MediaEntry> = Vec::new();
        for slide in slides {
            for (_, picture) in slide.pictures() {
                if entries.iter().any(|e| e.source == picture.path) {
                    continue;
                }
                let extension = picture
                    .path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase())
                    .unwrap_or_else(|| "png".to_string());
                let bytes = fs::read(&picture.path)?;
                entries.push(MediaEntry {
                    source: picture.path.clone(),
                    part_name: format!("ppt/media/image{}.{}", entries.len() + 1, extension),
                    extension,
                    bytes,
                });
            }
        }
        Ok(Self { entries })
    }

    fn part_for(&self, path: &Path) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source == path)
            .map(|e| e.part_name.as_str())
    }
}

fn image_content_type(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "tif" | "tiff" => "image/tiff",
        _ => "image/png",
    }
}

/// Relationship ids of one slide part.
struct SlideRels {
    layout_target: String,
    /// Relationship id per picture shape id.
    pictures: HashMap<u32, String>,
    picture_targets: Vec<(String, String)>,
    notes_target: Option<String>,
}

impl SlideRels {
    fn for_slide(slide: &Slide, number: usize, media: &MediaCatalog) -> Self {
        let mut pictures = HashMap::new();
        let mut picture_targets: Vec<(String, String)> = Vec::new();
        for (shape, picture) in slide.pictures() {
            let Some(part) = media.part_for(&picture.path) else {
                continue;
            };
            let target = format!("../media/{}", part.rsplit('/').next().unwrap_or(part));
            let id = match picture_targets.iter().find(|(_, t)| *t == target) {
                Some((id, _)) => id.clone(),
                None => {
                    let id = format!("rId{}", picture_targets.len() + 2);
                    picture_targets.push((id.clone(), target));
                    id
                }
            };
            pictures.insert(shape.id, id);
        }

        Self {
            layout_target: format!("../slideLayouts/slideLayout{}.xml", slide.layout_index + 1),
            pictures,
            picture_targets,
            notes_target: slide
                .notes
                .as_ref()
                .map(|_| format!("../notesSlides/notesSlide{}.xml", number)),
        }
    }

    fn notes_id(&self) -> String {
        format!("rId{}", self.picture_targets.len() + 2)
    }

    fn to_xml(&self) -> Result<Vec<u8>> {
        let mut entries: Vec<(String, &str, &str)> =
            vec![("rId1".to_string(), REL_SLIDE_LAYOUT, self.layout_target.as_str())];
        for (id, target) in &self.picture_targets {
            entries.push((id.clone(), REL_IMAGE, target.as_str()));
        }
        if let Some(target) = &self.notes_target {
            entries.push((self.notes_id(), REL_NOTES_SLIDE, target.as_str()));
        }
        let borrowed: Vec<(&str, &str, &str)> = entries
            .iter()
            .map(|(id, ty, target)| (id.as_str(), *ty, *target))
            .collect();
        relationships(&borrowed)
    }
}

fn relationships(entries: &[(&str, &str, &str)]) -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.open("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
    for (id, rel_type, target) in entries {
        x.empty("Relationship", &[("Id", id), ("Type", rel_type), ("Target", target)])?;
    }
    x.close("Relationships")?;
    Ok(x.finish())
}

fn package_rels() -> Result<Vec<u8>> {
    relationships(&[
        ("rId1", REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        ("rId2", REL_CORE_PROPERTIES, "docProps/core.xml"),
        ("rId3", REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ])
}

fn core_properties(document: &SlideDocument) -> Result<Vec<u8>> {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let props = &document.properties;

    let mut x = XmlPart::new()?;
    x.open(
        "cp:coreProperties",
        &[
            ("xmlns:cp", "http://schemas.openxmlformats.org/package/2006/metadata/core-properties"),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:dcmitype", "http://purl.org/dc/dcmitype/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    x.text_element("dc:title", &[], props.title.as_deref().unwrap_or_default())?;
    x.text_element("dc:creator", &[], props.author.as_deref().unwrap_or(APPLICATION_NAME))?;
    x.text_element("cp:lastModifiedBy", &[], APPLICATION_NAME)?;
    x.text_element("cp:revision", &[], "1")?;
    x.text_element("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &now)?;
    x.text_element("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &now)?;
    x.close("cp:coreProperties")?;
    Ok(x.finish())
}

fn app_properties(document: &SlideDocument) -> Result<Vec<u8>> {
    let slides = document.slides.len().to_string();
    let notes = document
        .slides
        .iter()
        .filter(|s| s.notes.is_some())
        .count()
        .to_string();

    let mut x = XmlPart::new()?;
    x.open(
        "Properties",
        &[
            ("xmlns", "http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"),
            ("xmlns:vt", "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes"),
        ],
    )?;
    x.text_element("Application", &[], APPLICATION_NAME)?;
    x.text_element("Slides", &[], &slides)?;
    x.text_element("Notes", &[], &notes)?;
    x.close("Properties")?;
    Ok(x.finish())
}

const PML_NAMESPACES: [(&str, &str); 3] = [
    ("xmlns:a", NS_DRAWING),
    ("xmlns:r", NS_RELATIONSHIPS),
    ("xmlns:p", NS_PRESENTATION),
];

/// Presentation relationship ids: master, theme, three property parts,
/// the notes master when present, then one per slide.
fn presentation_slide_rel_id(index: usize, has_notes: bool) -> String {
    let first = if has_notes { 7 } else { 6 };
    format!("rId{}", first + index)
}

fn presentation(document: &SlideDocument, has_notes: bool) -> Result<Vec<u8>> {
    let mut root: Vec<(&str, &str)> = PML_NAMESPACES.to_vec();
    root.push(("saveSubsetFonts", "1"));

    let mut x = XmlPart::new()?;
    x.open("p:presentation", &root)?;

    x.open("p:sldMasterIdLst", &[])?;
    x.empty("p:sldMasterId", &[("id", &MASTER_ID.to_string()), ("r:id", "rId1")])?;
    x.close("p:sldMasterIdLst")?;

    if has_notes {
        x.open("p:notesMasterIdLst", &[])?;
        x.empty("p:notesMasterId", &[("r:id", "rId6")])?;
        x.close("p:notesMasterIdLst")?;
    }

    if !document.slides.is_empty() {
        x.open("p:sldIdLst", &[])?;
        for i in 0..document.slides.len() {
            let id = (FIRST_SLIDE_ID + i as u32).to_string();
            let rel_id = presentation_slide_rel_id(i, has_notes);
            x.empty("p:sldId", &[("id", &id), ("r:id", &rel_id)])?;
        }
        x.close("p:sldIdLst")?;
    }

    x.empty(
        "p:sldSz",
        &[("cx", &document.width.0.to_string()), ("cy", &document.height.0.to_string())],
    )?;
    x.empty(
        "p:notesSz",
        &[("cx", &NOTES_WIDTH.to_string()), ("cy", &NOTES_HEIGHT.to_string())],
    )?;
    x.close("p:presentation")?;
    Ok(x.finish())
}

fn presentation_rels(document: &SlideDocument, has_notes: bool) -> Result<Vec<u8>> {
    let mut entries: Vec<(String, &str, String)> = vec![
        ("rId1".into(), REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml".into()),
        ("rId2".into(), REL_THEME, "theme/theme1.xml".into()),
        ("rId3".into(), REL_PRES_PROPS, "presProps.xml".into()),
        ("rId4".into(), REL_VIEW_PROPS, "viewProps.xml".into()),
        ("rId5".into(), REL_TABLE_STYLES, "tableStyles.xml".into()),
    ];
    if has_notes {
        entries.push(("rId6".into(), REL_NOTES_MASTER, "notesMasters/notesMaster1.xml".into()));
    }
    for i in 0..document.slides.len() {
        entries.push((
            presentation_slide_rel_id(i, has_notes),
            REL_SLIDE,
            format!("slides/slide{}.xml", i + 1),
        ));
    }

    let borrowed: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
        .collect();
    relationships(&borrowed)
}

fn presentation_properties() -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.empty("p:presentationPr", &PML_NAMESPACES)?;
    Ok(x.finish())
}

fn view_properties() -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.empty("p:viewPr", &PML_NAMESPACES)?;
    Ok(x.finish())
}

fn table_styles() -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.empty(
        "a:tblStyleLst",
        &[("xmlns:a", NS_DRAWING), ("def", "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}")],
    )?;
    Ok(x.finish())
}

fn theme(theme: &DocumentTheme) -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.open("a:theme", &[("xmlns:a", NS_DRAWING), ("name", &theme.name)])?;
    x.open("a:themeElements", &[])?;

    x.open("a:clrScheme", &[("name", &theme.name)])?;
    let scheme: [(&str, Rgb); 12] = [
        ("a:dk1", theme.dark),
        ("a:lt1", theme.light),
        ("a:dk2", theme.dark),
        ("a:lt2", theme.secondary),
        ("a:accent1", theme.primary),
        ("a:accent2", theme.secondary),
        ("a:accent3", theme.accent),
        ("a:accent4", theme.primary),
        ("a:accent5", theme.accent),
        ("a:accent6", theme.dark),
        ("a:hlink", theme.accent),
        ("a:folHlink", theme.primary),
    ];
    for (slot, color) in scheme {
        x.open(slot, &[])?;
        x.empty("a:srgbClr", &[("val", &color.to_hex())])?;
        x.close(slot)?;
    }
    x.close("a:clrScheme")?;

    x.open("a:fontScheme", &[("name", &theme.name)])?;
    for (slot, typeface) in [("a:majorFont", &theme.heading_font), ("a:minorFont", &theme.body_font)] {
        x.open(slot, &[])?;
        x.empty("a:latin", &[("typeface", typeface)])?;
        x.empty("a:ea", &[("typeface", "")])?;
        x.empty("a:cs", &[("typeface", "")])?;
        x.close(slot)?;
    }
    x.close("a:fontScheme")?;

    x.open("a:fmtScheme", &[("name", &theme.name)])?;
    x.open("a:fillStyleLst", &[])?;
    for _ in 0..3 {
        write_scheme_fill(&mut x)?;
    }
    x.close("a:fillStyleLst")?;
    x.open("a:lnStyleLst", &[])?;
    for width in ["9525", "25400", "38100"] {
        x.open("a:ln", &[("w", width)])?;
        write_scheme_fill(&mut x)?;
        x.close("a:ln")?;
    }
    x.close("a:lnStyleLst")?;
    x.open("a:effectStyleLst", &[])?;
    for _ in 0..3 {
        x.open("a:effectStyle", &[])?;
        x.empty("a:effectLst", &[])?;
        x.close("a:effectStyle")?;
    }
    x.close("a:effectStyleLst")?;
    x.open("a:bgFillStyleLst", &[])?;
    for _ in 0..3 {
        write_scheme_fill(&mut x)?;
    }
    x.close("a:bgFillStyleLst")?;
    x.close("a:fmtScheme")?;

    x.close("a:themeElements")?;
    x.empty("a:objectDefaults", &[])?;
    x.empty("a:extraClrSchemeLst", &[])?;
    x.close("a:theme")?;
    Ok(x.finish())
}

fn write_scheme_fill(x: &mut XmlPart) -> Result<()> {
    x.open("a:solidFill", &[])?;
    x.empty("a:schemeClr", &[("val", "phClr")])?;
    x.close("a:solidFill")?;
    Ok(())
}

fn write_color_map(x: &mut XmlPart) -> Result<()> {
    x.empty(
        "p:clrMap",
        &[
            ("bg1", "lt1"),
            ("tx1", "dk1"),
            ("bg2", "lt2"),
            ("tx2", "dk2"),
            ("accent1", "accent1"),
            ("accent2", "accent2"),
            ("accent3", "accent3"),
            ("accent4", "accent4"),
            ("accent5", "accent5"),
            ("accent6", "accent6"),
            ("hlink", "hlink"),
            ("folHlink", "folHlink"),
        ],
    )?;
    Ok(())
}

fn write_master_background(x: &mut XmlPart) -> Result<()> {
    x.open("p:bg", &[])?;
    x.open("p:bgRef", &[("idx", "1001")])?;
    x.empty("a:schemeClr", &[("val", "bg1")])?;
    x.close("p:bgRef")?;
    x.close("p:bg")?;
    Ok(())
}

/// Title and body frames for the master, taken from the first layout that
/// declares each role.
fn master_frames(document: &SlideDocument) -> (Rect, Rect) {
    let find = |pred: fn(&PlaceholderDef) -> bool| {
        document
            .layouts
            .iter()
            .flat_map(|l| l.placeholders.iter())
            .find(|p| pred(p))
            .map(|p| p.frame)
    };
    let (w, h) = (document.width.0, document.height.0);
    let title = find(|p| p.kind == PlaceholderKind::Title)
        .unwrap_or_else(|| Rect::emu(w / 20, h / 25, w * 9 / 10, h / 6));
    let body = find(|p| p.kind.is_body())
        .unwrap_or_else(|| Rect::emu(w / 20, h * 7 / 30, w * 9 / 10, h * 2 / 3));
    (title, body)
}

fn slide_master(document: &SlideDocument) -> Result<Vec<u8>> {
    let (title_frame, body_frame) = master_frames(document);

    let mut x = XmlPart::new()?;
    x.open("p:sldMaster", &PML_NAMESPACES)?;
    x.open("p:cSld", &[])?;
    write_master_background(&mut x)?;
    x.open("p:spTree", &[])?;
    write_group_header(&mut x)?;
    write_placeholder_def(
        &mut x,
        &PlaceholderDef::new(0, PlaceholderKind::Title, "Title Placeholder 1", title_frame),
        2,
    )?;
    write_placeholder_def(
        &mut x,
        &PlaceholderDef::new(1, PlaceholderKind::Body, "Text Placeholder 2", body_frame),
        3,
    )?;
    x.close("p:spTree")?;
    x.close("p:cSld")?;
    write_color_map(&mut x)?;

    x.open("p:sldLayoutIdLst", &[])?;
    for i in 0..document.layouts.len() {
        let id = (MASTER_ID + 1 + i as u64).to_string();
        let rel_id = format!("rId{}", i + 1);
        x.empty("p:sldLayoutId", &[("id", &id), ("r:id", &rel_id)])?;
    }
    x.close("p:sldLayoutIdLst")?;

    x.open("p:txStyles", &[])?;
    x.open("p:titleStyle", &[])?;
    x.open("a:lvl1pPr", &[("algn", "l")])?;
    write_default_run_props(&mut x, "4400", "+mj-lt")?;
    x.close("a:lvl1pPr")?;
    x.close("p:titleStyle")?;

    x.open("p:bodyStyle", &[])?;
    x.open("a:lvl1pPr", &[("marL", "342900"), ("indent", "-342900")])?;
    x.empty("a:buFont", &[("typeface", "Arial")])?;
    x.empty("a:buChar", &[("char", "\u{2022}")])?;
    write_default_run_props(&mut x, "2800", "+mn-lt")?;
    x.close("a:lvl1pPr")?;
    x.close("p:bodyStyle")?;

    x.open("p:otherStyle", &[])?;
    x.open("a:lvl1pPr", &[])?;
    write_default_run_props(&mut x, "1800", "+mn-lt")?;
    x.close("a:lvl1pPr")?;
    x.close("p:otherStyle")?;
    x.close("p:txStyles")?;

    x.close("p:sldMaster")?;
    Ok(x.finish())
}

fn write_default_run_props(x: &mut XmlPart, size: &str, typeface: &str) -> Result<()> {
    x.open("a:defRPr", &[("sz", size)])?;
    x.open("a:solidFill", &[])?;
    x.empty("a:schemeClr", &[("val", "tx1")])?;
    x.close("a:solidFill")?;
    x.empty("a:latin", &[("typeface", typeface)])?;
    x.close("a:defRPr")?;
    Ok(())
}

fn slide_master_rels(layout_count: usize) -> Result<Vec<u8>> {
    let mut entries: Vec<(String, &str, String)> = (0..layout_count)
        .map(|i| {
            (
                format!("rId{}", i + 1),
                REL_SLIDE_LAYOUT,
                format!("../slideLayouts/slideLayout{}.xml", i + 1),
            )
        })
        .collect();
    entries.push((format!("rId{}", layout_count + 1), REL_THEME, "../theme/theme1.xml".into()));

    let borrowed: Vec<(&str, &str, &str)> = entries
        .iter()
        .map(|(id, ty, target)| (id.as_str(), *ty, target.as_str()))
        .collect();
    relationships(&borrowed)
}

fn slide_layout(layout: &SlideLayout) -> Result<Vec<u8>> {
    let mut root: Vec<(&str, &str)> = PML_NAMESPACES.to_vec();
    root.push(("preserve", "1"));

    let mut x = XmlPart::new()?;
    x.open("p:sldLayout", &root)?;
    x.open("p:cSld", &[("name", &layout.name)])?;
    x.open("p:spTree", &[])?;
    write_group_header(&mut x)?;
    for (i, def) in layout.placeholders.iter().enumerate() {
        write_placeholder_def(&mut x, def, i as u32 + 2)?;
    }
    x.close("p:spTree")?;
    x.close("p:cSld")?;
    write_master_color_mapping(&mut x)?;
    x.close("p:sldLayout")?;
    Ok(x.finish())
}

fn write_master_color_mapping(x: &mut XmlPart) -> Result<()> {
    x.open("p:clrMapOvr", &[])?;
    x.empty("a:masterClrMapping", &[])?;
    x.close("p:clrMapOvr")?;
    Ok(())
}

fn write_group_header(x: &mut XmlPart) -> Result<()> {
    x.open("p:nvGrpSpPr", &[])?;
    x.empty("p:cNvPr", &[("id", "1"), ("name", "")])?;
    x.empty("p:cNvGrpSpPr", &[])?;
    x.empty("p:nvPr", &[])?;
    x.close("p:nvGrpSpPr")?;
    x.open("p:grpSpPr", &[])?;
    x.open("a:xfrm", &[])?;
    x.empty("a:off", &[("x", "0"), ("y", "0")])?;
    x.empty("a:ext", &[("cx", "0"), ("cy", "0")])?;
    x.empty("a:chOff", &[("x", "0"), ("y", "0")])?;
    x.empty("a:chExt", &[("cx", "0"), ("cy", "0")])?;
    x.close("a:xfrm")?;
    x.close("p:grpSpPr")?;
    Ok(())
}

fn write_placeholder_def(x: &mut XmlPart, def: &PlaceholderDef, shape_id: u32) -> Result<()> {
    x.open("p:sp", &[])?;
    write_placeholder_properties(x, shape_id, &def.name, def.idx, def.kind)?;
    x.open("p:spPr", &[])?;
    write_xfrm(x, &def.frame)?;
    x.close("p:spPr")?;
    write_text_body(x, &TextFrame::new(), false)?;
    x.close("p:sp")?;
    Ok(())
}

fn write_placeholder_properties(
    x: &mut XmlPart,
    shape_id: u32,
    name: &str,
    idx: u32,
    kind: PlaceholderKind,
) -> Result<()> {
    x.open("p:nvSpPr", &[])?;
    x.empty("p:cNvPr", &[("id", &shape_id.to_string()), ("name", name)])?;
    x.open("p:cNvSpPr", &[])?;
    x.empty("a:spLocks", &[("noGrp", "1")])?;
    x.close("p:cNvSpPr")?;
    x.open("p:nvPr", &[])?;
    let idx_value = idx.to_string();
    let mut ph: Vec<(&str, &str)> = Vec::new();
    if let Some(ty) = kind.ooxml_type() {
        ph.push(("type", ty));
    }
    if idx != 0 {
        ph.push(("idx", &idx_value));
    }
    x.empty("p:ph", &ph)?;
    x.close("p:nvPr")?;
    x.close("p:nvSpPr")?;
    Ok(())
}

fn write_xfrm(x: &mut XmlPart, frame: &Rect) -> Result<()> {
    x.open("a:xfrm", &[])?;
    x.empty(
        "a:off",
        &[("x", &frame.x.0.to_string()), ("y", &frame.y.0.to_string())],
    )?;
    x.empty(
        "a:ext",
        &[("cx", &frame.width.0.to_string()), ("cy", &frame.height.0.to_string())],
    )?;
    x.close("a:xfrm")?;
    Ok(())
}

fn write_rect_geometry(x: &mut XmlPart) -> Result<()> {
    x.open("a:prstGeom", &[("prst", "rect")])?;
    x.empty("a:avLst", &[])?;
    x.close("a:prstGeom")?;
    Ok(())
}

fn write_solid_fill(x: &mut XmlPart, color: Rgb) -> Result<()> {
    x.open("a:solidFill", &[])?;
    x.empty("a:srgbClr", &[("val", &color.to_hex())])?;
    x.close("a:solidFill")?;
    Ok(())
}

fn slide_part(slide: &Slide, rels: &SlideRels) -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.open("p:sld", &PML_NAMESPACES)?;
    x.open("p:cSld", &[])?;
    if let Some(color) = slide.background {
        x.open("p:bg", &[])?;
        x.open("p:bgPr", &[])?;
        write_solid_fill(&mut x, color)?;
        x.empty("a:effectLst", &[])?;
        x.close("p:bgPr")?;
        x.close("p:bg")?;
    }
    x.open("p:spTree", &[])?;
    write_group_header(&mut x)?;
    for shape in &slide.shapes {
        write_shape(&mut x, shape, rels)?;
    }
    x.close("p:spTree")?;
    x.close("p:cSld")?;
    write_master_color_mapping(&mut x)?;
    x.close("p:sld")?;
    Ok(x.finish())
}

fn write_shape(x: &mut XmlPart, shape: &Shape, rels: &SlideRels) -> Result<()> {
    let id = shape.id.to_string();
    match &shape.kind {
        ShapeKind::Picture(picture) => {
            let Some(rel_id) = rels.pictures.get(&shape.id) else {
                return Err(Error::TemplateError(format!(
                    "picture '{}' has no embedded media",
                    picture.path.display()
                )));
            };
            x.open("p:pic", &[])?;
            x.open("p:nvPicPr", &[])?;
            x.empty(
                "p:cNvPr",
                &[("id", &id), ("name", &shape.name), ("descr", &picture.description)],
            )?;
            x.open("p:cNvPicPr", &[])?;
            x.empty("a:picLocks", &[("noChangeAspect", "1")])?;
            x.close("p:cNvPicPr")?;
            x.empty("p:nvPr", &[])?;
            x.close("p:nvPicPr")?;
            x.open("p:blipFill", &[])?;
            x.empty("a:blip", &[("r:embed", rel_id)])?;
            x.open("a:stretch", &[])?;
            x.empty("a:fillRect", &[])?;
            x.close("a:stretch")?;
            x.close("p:blipFill")?;
            x.open("p:spPr", &[])?;
            write_xfrm(x, &shape.frame)?;
            write_rect_geometry(x)?;
            x.close("p:spPr")?;
            x.close("p:pic")?;
        }
        ShapeKind::Placeholder { idx, kind } => {
            x.open("p:sp", &[])?;
            write_placeholder_properties(x, shape.id, &shape.name, *idx, *kind)?;
            x.open("p:spPr", &[])?;
            write_xfrm(x, &shape.frame)?;
            if let Some(fill) = shape.fill {
                write_rect_geometry(x)?;
                write_solid_fill(x, fill)?;
            }
            x.close("p:spPr")?;
            let empty = TextFrame::new();
            write_text_body(x, shape.text.as_ref().unwrap_or(&empty), false)?;
            x.close("p:sp")?;
        }
        ShapeKind::TextBox | ShapeKind::Rectangle => {
            let is_text_box = shape.kind == ShapeKind::TextBox;
            x.open("p:sp", &[])?;
            x.open("p:nvSpPr", &[])?;
            x.empty("p:cNvPr", &[("id", &id), ("name", &shape.name)])?;
            if is_text_box {
                x.empty("p:cNvSpPr", &[("txBox", "1")])?;
            } else {
                x.empty("p:cNvSpPr", &[])?;
            }
            x.empty("p:nvPr", &[])?;
            x.close("p:nvSpPr")?;
            x.open("p:spPr", &[])?;
            write_xfrm(x, &shape.frame)?;
            write_rect_geometry(x)?;
            match shape.fill {
                Some(fill) => write_solid_fill(x, fill)?,
                None => {
                    x.empty("a:noFill", &[])?;
                }
            }
            if !is_text_box {
                x.open("a:ln", &[])?;
                x.empty("a:noFill", &[])?;
                x.close("a:ln")?;
            }
            x.close("p:spPr")?;
            if let Some(text) = &shape.text {
                write_text_body(x, text, true)?;
            }
            x.close("p:sp")?;
        }
    }
    Ok(())
}

/// `<p:txBody>`; free-standing shapes get explicit wrap settings.
fn write_text_body(x: &mut XmlPart, frame: &TextFrame, free_standing: bool) -> Result<()> {
    x.open("p:txBody", &[])?;
    let mut body_pr: Vec<(&str, &str)> = Vec::new();
    if free_standing {
        body_pr.push(("wrap", if frame.word_wrap { "square" } else { "none" }));
        body_pr.push(("rtlCol", "0"));
    }
    if let Some(anchor) = frame.anchor {
        body_pr.push(("anchor", anchor.ooxml()));
    }
    x.empty("a:bodyPr", &body_pr)?;
    x.empty("a:lstStyle", &[])?;
    if frame.paragraphs.is_empty() {
        x.open("a:p", &[])?;
        x.empty("a:endParaRPr", &[("lang", "en-US")])?;
        x.close("a:p")?;
    }
    for paragraph in &frame.paragraphs {
        write_paragraph(x, paragraph)?;
    }
    x.close("p:txBody")?;
    Ok(())
}

fn write_paragraph(x: &mut XmlPart, paragraph: &Paragraph) -> Result<()> {
    x.open("a:p", &[])?;

    let mut p_pr: Vec<(&str, &str)> = Vec::new();
    if paragraph.no_bullet {
        p_pr.push(("marL", "0"));
        p_pr.push(("indent", "0"));
    }
    if let Some(alignment) = paragraph.alignment {
        p_pr.push(("algn", alignment.ooxml()));
    }
    if paragraph.no_bullet {
        x.open("a:pPr", &p_pr)?;
        x.empty("a:buNone", &[])?;
        x.close("a:pPr")?;
    } else if !p_pr.is_empty() {
        x.empty("a:pPr", &p_pr)?;
    }

    for run in &paragraph.runs {
        write_run(x, run)?;
    }
    if paragraph.runs.is_empty() {
        x.empty("a:endParaRPr", &[("lang", "en-US")])?;
    }
    x.close("a:p")?;
    Ok(())
}

/// Write a run; embedded newlines become soft line breaks.
fn write_run(x: &mut XmlPart, run: &TextRun) -> Result<()> {
    let text = sanitize_text(&run.text);
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            x.open("a:br", &[])?;
            write_run_properties(x, run, "a:rPr")?;
            x.close("a:br")?;
        }
        if line.is_empty() && i > 0 {
            continue;
        }
        x.open("a:r", &[])?;
        write_run_properties(x, run, "a:rPr")?;
        x.text_element("a:t", &[], line)?;
        x.close("a:r")?;
    }
    Ok(())
}

fn write_run_properties(x: &mut XmlPart, run: &TextRun, tag: &str) -> Result<()> {
    let style = &run.style;
    let size = style.size_pt.map(|pt| ((pt * 100.0).round() as i64).to_string());
    let mut attrs: Vec<(&str, &str)> = vec![("lang", "en-US")];
    if let Some(size) = &size {
        attrs.push(("sz", size));
    }
    if style.bold {
        attrs.push(("b", "1"));
    }
    attrs.push(("dirty", "0"));

    if style.color.is_none() && style.font.is_none() {
        x.empty(tag, &attrs)?;
        return Ok(());
    }
    x.open(tag, &attrs)?;
    if let Some(color) = style.color {
        write_solid_fill(x, color)?;
    }
    if let Some(font) = &style.font {
        x.empty("a:latin", &[("typeface", font)])?;
    }
    x.close(tag)?;
    Ok(())
}

/// Drop control characters XML 1.0 cannot carry and normalize line endings.
fn sanitize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect()
}

fn notes_master() -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.open("p:notesMaster", &PML_NAMESPACES)?;
    x.open("p:cSld", &[])?;
    write_master_background(&mut x)?;
    x.open("p:spTree", &[])?;
    write_group_header(&mut x)?;
    write_notes_placeholder(&mut x, 2, "Slide Image Placeholder 1", "sldImg", None, Some(Rect::emu(1_143_000, 685_800, 4_572_000, 3_429_000)))?;
    write_notes_placeholder(&mut x, 3, "Notes Placeholder 2", "body", Some("1"), Some(Rect::emu(685_800, 4_343_400, 5_486_400, 4_114_800)))?;
    x.close("p:spTree")?;
    x.close("p:cSld")?;
    write_color_map(&mut x)?;
    x.close("p:notesMaster")?;
    Ok(x.finish())
}

fn notes_slide(notes: &str) -> Result<Vec<u8>> {
    let mut x = XmlPart::new()?;
    x.open("p:notes", &PML_NAMESPACES)?;
    x.open("p:cSld", &[])?;
    x.open("p:spTree", &[])?;
    write_group_header(&mut x)?;
    write_notes_placeholder(&mut x, 2, "Slide Image Placeholder 1", "sldImg", None, None)?;

    x.open("p:sp", &[])?;
    write_notes_placeholder_properties(&mut x, 3, "Notes Placeholder 2", "body", Some("1"))?;
    x.empty("p:spPr", &[])?;
    let mut frame = TextFrame::new();
    for line in notes.lines() {
        frame.paragraphs.push(Paragraph::plain(line, Default::default()));
    }
    write_text_body(&mut x, &frame, false)?;
    x.close("p:sp")?;

    x.close("p:spTree")?;
    x.close("p:cSld")?;
    write_master_color_mapping(&mut x)?;
    x.close("p:notes")?;
    Ok(x.finish())
}

fn write_notes_placeholder(
    x: &mut XmlPart,
    shape_id: u32,
    name: &str,
    ph_type: &str,
    idx: Option<&str>,
    frame: Option<Rect>,
) -> Result<()> {
    x.open("p:sp", &[])?;
    write_notes_placeholder_properties(x, shape_id, name, ph_type, idx)?;
    match frame {
        Some(frame) => {
            x.open("p:spPr", &[])?;
            write_xfrm(x, &frame)?;
            x.close("p:spPr")?;
        }
        None => {
            x.empty("p:spPr", &[])?;
        }
    }
    if ph_type != "sldImg" {
        write_text_body(x, &TextFrame::new(), false)?;
    }
    x.close("p:sp")?;
    Ok(())
}

fn write_notes_placeholder_properties(
    x: &mut XmlPart,
    shape_id: u32,
    name: &str,
    ph_type: &str,
    idx: Option<&str>,
) -> Result<()> {
    x.open("p:nvSpPr", &[])?;
    x.empty("p:cNvPr", &[("id", &shape_id.to_string()), ("name", name)])?;
    x.open("p:cNvSpPr", &[])?;
    x.empty("a:spLocks", &[("noGrp", "1")])?;
    x.close("p:cNvSpPr")?;
    x.open("p:nvPr", &[])?;
    let mut ph: Vec<(&str, &str)> = vec![("type", ph_type)];
    if let Some(idx) = idx {
        ph.push(("idx", idx));
    }
    x.empty("p:ph", &ph)?;
    x.close("p:nvPr")?;
    x.close("p:nvSpPr")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateReader;
    use deck_core::document::{PictureData, RunStyle};
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn write(document: &SlideDocument) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut cursor = PptxWriter::new()
            .write(document, Cursor::new(Vec::new()))
            .unwrap();
        cursor.set_position(0);
        ZipArchive::new(cursor).unwrap()
    }

    fn part(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    fn titled_slide(document: &SlideDocument, title: &str) -> Slide {
        let mut slide = document.new_slide(1).unwrap();
        slide.shapes[0].text = Some(
            TextFrame::new().with_paragraph(Paragraph::plain(title, RunStyle::new().bold(true))),
        );
        slide
    }

    #[test]
    fn test_package_contains_core_parts() {
        let mut document = SlideDocument::new_default();
        let slide = titled_slide(&document, "Hello & welcome");
        document.push_slide(slide);

        let mut archive = write(&document);
        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout11.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/_rels/slide1.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
        assert!(archive.by_name("ppt/notesMasters/notesMaster1.xml").is_err());

        let slide = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(slide.contains("<a:t>Hello &amp; welcome</a:t>"));
        assert!(slide.contains(r#"b="1""#));
        assert!(slide.contains(r#"<p:ph type="title"/>"#));

        let types = part(&mut archive, "[Content_Types].xml");
        assert!(types.contains(r#"PartName="/ppt/slides/slide1.xml""#));
    }

    #[test]
    fn test_written_package_reads_back_as_template() {
        let mut document = SlideDocument::new_default();
        let slide = titled_slide(&document, "One");
        document.push_slide(slide);

        let mut cursor = PptxWriter::new()
            .write(&document, Cursor::new(Vec::new()))
            .unwrap();
        cursor.set_position(0);
        let reread = TemplateReader::new().read(cursor).unwrap();

        assert_eq!(reread.width, document.width);
        assert_eq!(reread.height, document.height);
        assert_eq!(reread.layouts, document.layouts);
    }

    #[test]
    fn test_background_and_shapes() {
        let mut document = SlideDocument::new_default();
        let mut slide = document.new_slide(6).unwrap();
        slide.background = Some(Rgb::new(0xE3, 0x34, 0x2F));
        slide.add_rectangle(Rect::inches(0.0, 0.0, 10.0, 1.0), Rgb::new(0x1C, 0xCB, 0xD0));
        slide.add_text_box(
            Rect::inches(0.5, 0.2, 9.0, 0.6),
            TextFrame::new().with_paragraph(Paragraph::plain(
                "line one\nline two",
                RunStyle::new().font("Courier New").size(12.0),
            )),
        );
        document.push_slide(slide);

        let mut archive = write(&document);
        let xml = part(&mut archive, "ppt/slides/slide1.xml");
        assert!(xml.contains(r#"<p:bgPr><a:solidFill><a:srgbClr val="E3342F"/>"#));
        assert!(xml.contains(r#"<a:srgbClr val="1CCBD0"/>"#));
        assert!(xml.contains(r#"txBox="1""#));
        assert!(xml.contains(r#"sz="1200""#));
        assert!(xml.contains(r#"<a:latin typeface="Courier New"/>"#));
        assert!(xml.contains("<a:br>"));

        let rels = part(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("../slideLayouts/slideLayout7.xml"));
    }

    #[test]
    fn test_notes_parts_are_written() {
        let mut document = SlideDocument::new_default();
        let mut first = titled_slide(&document, "One");
        first.notes = Some("Remember the demo".to_string());
        document.push_slide(first);
        let second = titled_slide(&document, "Two");
        document.push_slide(second);

        let mut archive = write(&document);
        assert!(archive.by_name("ppt/notesMasters/notesMaster1.xml").is_ok());
        assert!(archive.by_name("ppt/notesSlides/notesSlide2.xml").is_err());
        let notes = part(&mut archive, "ppt/notesSlides/notesSlide1.xml");
        assert!(notes.contains("Remember the demo"));

        let presentation = part(&mut archive, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:notesMasterId r:id="rId6"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId8"/>"#));

        let rels = part(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains("../notesSlides/notesSlide1.xml"));
    }

    #[test]
    fn test_theme_carries_palette() {
        let mut document = SlideDocument::new_default();
        document.theme.primary = Rgb::new(0xE3, 0x34, 0x2F);
        document.theme.body_font = "Tahoma".to_string();

        let mut archive = write(&document);
        let theme = part(&mut archive, "ppt/theme/theme1.xml");
        assert!(theme.contains(r#"<a:accent1><a:srgbClr val="E3342F"/></a:accent1>"#));
        assert!(theme.contains(r#"<a:minorFont><a:latin typeface="Tahoma"/>"#));

        let presentation = part(&mut archive, "ppt/presentation.xml");
        assert!(!presentation.contains("sldIdLst"));
    }

    #[test]
    fn test_pictures_are_embedded_once() {
        let dir = tempfile::tempdir().unwrap();
        let logo = dir.path().join("logo.PNG");
        std::fs::write(&logo, [0x89, b'P', b'N', b'G']).unwrap();

        let mut document = SlideDocument::new_default();
        for _ in 0..2 {
            let mut slide = document.new_slide(6).unwrap();
            slide.add_picture(
                Rect::inches(8.5, 0.5, 1.5, 1.5),
                PictureData {
                    path: logo.clone(),
                    description: "Logo".to_string(),
                },
            );
            document.push_slide(slide);
        }

        let mut archive = write(&document);
        assert!(archive.by_name("ppt/media/image1.png").is_ok());
        assert!(archive.by_name("ppt/media/image2.png").is_err());
        let slide = part(&mut archive, "ppt/slides/slide2.xml");
        assert!(slide.contains(r#"<a:blip r:embed="rId2"/>"#));
        let types = part(&mut archive, "[Content_Types].xml");
        assert!(types.contains(r#"Extension="png" ContentType="image/png""#));
    }

    #[test]
    fn test_slide_with_unknown_layout_is_rejected() {
        let mut document = SlideDocument::new_default();
        let mut slide = document.new_slide(0).unwrap();
        slide.layout_index = 99;
        document.push_slide(slide);

        let result = PptxWriter::new().write(&document, Cursor::new(Vec::new()));
        assert!(matches!(result, Err(Error::LayoutUnavailable(_))));
    }
}
