//! Shape-based slide document model.
//!
//! This is the canvas the renderer draws on and the structure the PPTX
//! backend reads templates into and serializes. Geometry is kept in EMU
//! (English Metric Units) like the OOXML parts it maps to.

use std::fmt;
use std::ops::{Add, Sub};
use std::path::PathBuf;

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// EMU per typographic point.
pub const EMU_PER_POINT: i64 = 12_700;

/// A length in English Metric Units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Emu(pub i64);

impl Emu {
    /// Convert inches to EMU, rounding to the nearest unit.
    pub fn inches(value: f64) -> Self {
        Emu((value * EMU_PER_INCH as f64).round() as i64)
    }

    /// Convert points to EMU.
    pub fn points(value: f64) -> Self {
        Emu((value * EMU_PER_POINT as f64).round() as i64)
    }

    /// Value in inches.
    pub fn to_inches(self) -> f64 {
        self.0 as f64 / EMU_PER_INCH as f64
    }
}

impl Add for Emu {
    type Output = Emu;

    fn add(self, rhs: Emu) -> Emu {
        Emu(self.0 + rhs.0)
    }
}

impl Sub for Emu {
    type Output = Emu;

    fn sub(self, rhs: Emu) -> Emu {
        Emu(self.0 - rhs.0)
    }
}

/// Position and size of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: Emu,
    pub y: Emu,
    pub width: Emu,
    pub height: Emu,
}

impl Rect {
    /// Build a rectangle from raw EMU values.
    pub const fn emu(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x: Emu(x),
            y: Emu(y),
            width: Emu(width),
            height: Emu(height),
        }
    }

    /// Build a rectangle from inch values.
    pub fn inches(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x: Emu::inches(x),
            y: Emu::inches(y),
            width: Emu::inches(width),
            height: Emu::inches(height),
        }
    }

    /// Right edge.
    pub fn right(&self) -> Emu {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> Emu {
        self.y + self.height
    }
}

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without a leading `#`, as OOXML expects.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// Semantic type of a placeholder, as declared by `<p:ph type="...">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    /// A generic content placeholder (no `type` attribute).
    Object,
    Picture,
    Date,
    Footer,
    SlideNumber,
    Other,
}

impl PlaceholderKind {
    /// Map an OOXML `type` attribute; a missing attribute means `obj`.
    pub fn from_ooxml(value: Option<&str>) -> Self {
        match value {
            None | Some("obj") => Self::Object,
            Some("title") => Self::Title,
            Some("ctrTitle") => Self::CenterTitle,
            Some("subTitle") => Self::Subtitle,
            Some("body") => Self::Body,
            Some("pic") => Self::Picture,
            Some("dt") => Self::Date,
            Some("ftr") => Self::Footer,
            Some("sldNum") => Self::SlideNumber,
            Some(_) => Self::Other,
        }
    }

    /// The OOXML `type` attribute, `None` for generic content.
    pub fn ooxml_type(&self) -> Option<&'static str> {
        match self {
            Self::Object | Self::Other => None,
            Self::Title => Some("title"),
            Self::CenterTitle => Some("ctrTitle"),
            Self::Subtitle => Some("subTitle"),
            Self::Body => Some("body"),
            Self::Picture => Some("pic"),
            Self::Date => Some("dt"),
            Self::Footer => Some("ftr"),
            Self::SlideNumber => Some("sldNum"),
        }
    }

    /// Title-like placeholders.
    pub fn is_title(&self) -> bool {
        matches!(self, Self::Title | Self::CenterTitle)
    }

    /// Placeholders that accept body text.
    pub fn is_body(&self) -> bool {
        matches!(self, Self::Body | Self::Object)
    }
}

/// A placeholder region declared by a slide layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderDef {
    /// Placeholder index (`idx`), unique within the layout.
    pub idx: u32,
    pub kind: PlaceholderKind,
    /// Shape name, e.g. "Title 1" or "Content Placeholder 2".
    pub name: String,
    pub frame: Rect,
}

impl PlaceholderDef {
    pub fn new(idx: u32, kind: PlaceholderKind, name: impl Into<String>, frame: Rect) -> Self {
        Self {
            idx,
            kind,
            name: name.into(),
            frame,
        }
    }
}

/// A named slide layout with its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideLayout {
    pub name: String,
    pub placeholders: Vec<PlaceholderDef>,
}

impl SlideLayout {
    pub fn new(name: impl Into<String>, placeholders: Vec<PlaceholderDef>) -> Self {
        Self {
            name: name.into(),
            placeholders,
        }
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub fn ooxml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
        }
    }
}

/// Vertical anchoring of text inside its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

impl Anchor {
    pub fn ooxml(&self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
            Self::Bottom => "b",
        }
    }
}

/// Character formatting of a run. Unset fields inherit from the layout.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunStyle {
    pub font: Option<String>,
    pub size_pt: Option<f64>,
    pub bold: bool,
    pub color: Option<Rgb>,
}

impl RunStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    pub fn size(mut self, size_pt: f64) -> Self {
        self.size_pt = Some(size_pt);
        self
    }

    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn color(mut self, color: Rgb) -> Self {
        self.color = Some(color);
        self
    }
}

/// A contiguous span of uniformly formatted text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub style: RunStyle,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A paragraph of runs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
    pub alignment: Option<Alignment>,
    /// Suppress the bullet a body placeholder would otherwise inherit.
    pub no_bullet: bool,
}

impl Paragraph {
    /// A paragraph with a single run.
    pub fn plain(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            runs: vec![TextRun::new(text, style)],
            ..Self::default()
        }
    }

    pub fn with_run(mut self, run: TextRun) -> Self {
        self.runs.push(run);
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    pub fn without_bullet(mut self) -> Self {
        self.no_bullet = true;
        self
    }

    /// Concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// Text content of a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
    pub word_wrap: bool,
    pub anchor: Option<Anchor>,
}

impl Default for TextFrame {
    fn default() -> Self {
        Self {
            paragraphs: Vec::new(),
            word_wrap: true,
            anchor: None,
        }
    }
}

impl TextFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.paragraphs.push(paragraph);
        self
    }

    pub fn anchored(mut self, anchor: Anchor) -> Self {
        self.anchor = Some(anchor);
        self
    }

    /// Whether the frame holds any visible text.
    pub fn is_empty(&self) -> bool {
        self.paragraphs
            .iter()
            .all(|p| p.runs.iter().all(|r| r.text.is_empty()))
    }

    /// All paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// An image embedded from a local file.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureData {
    pub path: PathBuf,
    pub description: String,
}

/// What a shape is.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    Placeholder { idx: u32, kind: PlaceholderKind },
    TextBox,
    Rectangle,
    Picture(PictureData),
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Shape id, unique within the slide (1 is the slide's group).
    pub id: u32,
    pub name: String,
    pub kind: ShapeKind,
    pub frame: Rect,
    pub fill: Option<Rgb>,
    pub text: Option<TextFrame>,
}

impl Shape {
    /// Placeholder index and kind, if this shape is a placeholder.
    pub fn placeholder(&self) -> Option<(u32, PlaceholderKind)> {
        match self.kind {
            ShapeKind::Placeholder { idx, kind } => Some((idx, kind)),
            _ => None,
        }
    }

    /// Text of the shape, empty when it has no text frame.
    pub fn text(&self) -> String {
        self.text.as_ref().map(TextFrame::text).unwrap_or_default()
    }
}

/// One slide of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    /// Index into [`SlideDocument::layouts`].
    pub layout_index: usize,
    pub background: Option<Rgb>,
    pub shapes: Vec<Shape>,
    pub notes: Option<String>,
    next_shape_id: u32,
}

impl Slide {
    /// Instantiate a slide whose placeholders mirror the layout's.
    pub fn from_layout(layout_index: usize, layout: &SlideLayout) -> Self {
        let mut slide = Self {
            layout_index,
            background: None,
            shapes: Vec::with_capacity(layout.placeholders.len()),
            notes: None,
            next_shape_id: 2,
        };
        for def in &layout.placeholders {
            let id = slide.allocate_id();
            slide.shapes.push(Shape {
                id,
                name: def.name.clone(),
                kind: ShapeKind::Placeholder {
                    idx: def.idx,
                    kind: def.kind,
                },
                frame: def.frame,
                fill: None,
                text: None,
            });
        }
        slide
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    /// Placeholder shapes in document order.
    pub fn placeholders(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(|s| s.placeholder().is_some())
    }

    /// Find a shape by id.
    pub fn shape(&self, id: u32) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Find a shape by id, mutably.
    pub fn shape_mut(&mut self, id: u32) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Add a free-standing text box; returns its id.
    pub fn add_text_box(&mut self, frame: Rect, text: TextFrame) -> u32 {
        let id = self.allocate_id();
        self.shapes.push(Shape {
            id,
            name: format!("TextBox {}", id - 1),
            kind: ShapeKind::TextBox,
            frame,
            fill: None,
            text: Some(text),
        });
        id
    }

    /// Add a solid rectangle; returns its id.
    pub fn add_rectangle(&mut self, frame: Rect, fill: Rgb) -> u32 {
        let id = self.allocate_id();
        self.shapes.push(Shape {
            id,
            name: format!("Rectangle {}", id - 1),
            kind: ShapeKind::Rectangle,
            frame,
            fill: Some(fill),
            text: None,
        });
        id
    }

    /// Add a picture from a local file; returns its id.
    pub fn add_picture(&mut self, frame: Rect, picture: PictureData) -> u32 {
        let id = self.allocate_id();
        self.shapes.push(Shape {
            id,
            name: format!("Picture {}", id - 1),
            kind: ShapeKind::Picture(picture),
            frame,
            fill: None,
            text: None,
        });
        id
    }

    /// Remove a shape by id; returns whether it existed.
    pub fn remove_shape(&mut self, id: u32) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() != before
    }

    /// Drop placeholders that never received text.
    pub fn remove_empty_placeholders(&mut self) -> usize {
        let before = self.shapes.len();
        self.shapes.retain(|s| {
            s.placeholder().is_none() || s.text.as_ref().is_some_and(|t| !t.is_empty())
        });
        before - self.shapes.len()
    }

    /// Pictures embedded on this slide, in shape order.
    pub fn pictures(&self) -> impl Iterator<Item = (&Shape, &PictureData)> {
        self.shapes.iter().filter_map(|s| match &s.kind {
            ShapeKind::Picture(data) => Some((s, data)),
            _ => None,
        })
    }
}

/// Colors and fonts written into the document's theme part.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTheme {
    pub name: String,
    pub dark: Rgb,
    pub light: Rgb,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub heading_font: String,
    pub body_font: String,
}

impl Default for DocumentTheme {
    fn default() -> Self {
        Self {
            name: "Office Theme".to_string(),
            dark: Rgb::BLACK,
            light: Rgb::WHITE,
            primary: Rgb::new(0x1F, 0x49, 0x7D),
            secondary: Rgb::new(0xEE, 0xEC, 0xE1),
            accent: Rgb::new(0x4F, 0x81, 0xBD),
            heading_font: "Calibri".to_string(),
            body_font: "Calibri".to_string(),
        }
    }
}

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentProperties {
    pub title: Option<String>,
    pub author: Option<String>,
}

/// A whole presentation: canvas, layout catalogue and slides.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideDocument {
    pub width: Emu,
    pub height: Emu,
    pub layouts: Vec<SlideLayout>,
    pub slides: Vec<Slide>,
    pub theme: DocumentTheme,
    pub properties: DocumentProperties,
}

impl SlideDocument {
    /// Default canvas width (10 inches).
    pub const DEFAULT_WIDTH: Emu = Emu(9_144_000);

    /// Default canvas height (7.5 inches).
    pub const DEFAULT_HEIGHT: Emu = Emu(6_858_000);

    /// An empty document with the given canvas and layout catalogue.
    pub fn new(width: Emu, height: Emu, layouts: Vec<SlideLayout>) -> Self {
        Self {
            width,
            height,
            layouts,
            slides: Vec::new(),
            theme: DocumentTheme::default(),
            properties: DocumentProperties::default(),
        }
    }

    /// A 10x7.5 inch document with the conventional built-in layouts.
    pub fn new_default() -> Self {
        Self::new(Self::DEFAULT_WIDTH, Self::DEFAULT_HEIGHT, default_layouts())
    }

    /// Create a slide for the layout at `layout_index` without adding it.
    pub fn new_slide(&self, layout_index: usize) -> Option<Slide> {
        self.layouts
            .get(layout_index)
            .map(|layout| Slide::from_layout(layout_index, layout))
    }

    /// Append a finished slide.
    pub fn push_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }
}

fn title_placeholder(frame: Rect) -> PlaceholderDef {
    PlaceholderDef::new(0, PlaceholderKind::Title, "Title 1", frame)
}

const STANDARD_TITLE: Rect = Rect::emu(457_200, 274_638, 8_229_600, 1_143_000);
const STANDARD_BODY: Rect = Rect::emu(457_200, 1_600_200, 8_229_600, 4_525_963);

/// The eleven layouts of the stock 4:3 template, in their conventional order.
fn default_layouts() -> Vec<SlideLayout> {
    use PlaceholderKind::{Body, CenterTitle, Object, Picture, Subtitle};

    vec![
        SlideLayout::new(
            "Title Slide",
            vec![
                PlaceholderDef::new(
                    0,
                    CenterTitle,
                    "Title 1",
                    Rect::emu(685_800, 2_130_425, 7_772_400, 1_470_025),
                ),
                PlaceholderDef::new(
                    1,
                    Subtitle,
                    "Subtitle 2",
                    Rect::emu(1_371_600, 3_886_200, 6_400_800, 1_752_600),
                ),
            ],
        ),
        SlideLayout::new(
            "Title and Content",
            vec![
                title_placeholder(STANDARD_TITLE),
                PlaceholderDef::new(1, Object, "Content Placeholder 2", STANDARD_BODY),
            ],
        ),
        SlideLayout::new(
            "Section Header",
            vec![
                title_placeholder(Rect::emu(722_313, 4_406_900, 7_772_400, 1_362_075)),
                PlaceholderDef::new(
                    1,
                    Body,
                    "Text Placeholder 2",
                    Rect::emu(722_313, 2_906_713, 7_772_400, 1_500_187),
                ),
            ],
        ),
        SlideLayout::new(
            "Two Content",
            vec![
                title_placeholder(STANDARD_TITLE),
                PlaceholderDef::new(
                    1,
                    Object,
                    "Content Placeholder 2",
                    Rect::emu(457_200, 1_600_200, 4_038_600, 4_525_963),
                ),
                PlaceholderDef::new(
                    2,
                    Object,
                    "Content Placeholder 3",
                    Rect::emu(4_648_200, 1_600_200, 4_038_600, 4_525_963),
                ),
            ],
        ),
        SlideLayout::new(
            "Comparison",
            vec![
                title_placeholder(Rect::emu(457_200, 274_638, 8_229_600, 1_143_000)),
                PlaceholderDef::new(
                    1,
                    Body,
                    "Text Placeholder 2",
                    Rect::emu(457_200, 1_535_113, 4_040_188, 639_762),
                ),
                PlaceholderDef::new(
                    2,
                    Object,
                    "Content Placeholder 3",
                    Rect::emu(457_200, 2_174_875, 4_040_188, 3_951_288),
                ),
                PlaceholderDef::new(
                    3,
                    Body,
                    "Text Placeholder 4",
                    Rect::emu(4_645_025, 1_535_113, 4_041_775, 639_762),
                ),
                PlaceholderDef::new(
                    4,
                    Object,
                    "Content Placeholder 5",
                    Rect::emu(4_645_025, 2_174_875, 4_041_775, 3_951_288),
                ),
            ],
        ),
        SlideLayout::new("Title Only", vec![title_placeholder(STANDARD_TITLE)]),
        SlideLayout::new("Blank", Vec::new()),
        SlideLayout::new(
            "Content with Caption",
            vec![
                title_placeholder(Rect::emu(457_200, 273_050, 3_008_313, 1_162_050)),
                PlaceholderDef::new(
                    1,
                    Object,
                    "Content Placeholder 2",
                    Rect::emu(3_575_050, 273_050, 5_111_750, 5_853_113),
                ),
                PlaceholderDef::new(
                    2,
                    Body,
                    "Text Placeholder 3",
                    Rect::emu(457_200, 1_435_100, 3_008_313, 4_691_063),
                ),
            ],
        ),
        SlideLayout::new(
            "Picture with Caption",
            vec![
                title_placeholder(Rect::emu(1_792_288, 4_800_600, 5_486_400, 566_738)),
                PlaceholderDef::new(
                    1,
                    Picture,
                    "Picture Placeholder 2",
                    Rect::emu(1_792_288, 612_775, 5_486_400, 4_114_800),
                ),
                PlaceholderDef::new(
                    2,
                    Body,
                    "Text Placeholder 3",
                    Rect::emu(1_792_288, 5_367_338, 5_486_400, 804_862),
                ),
            ],
        ),
        SlideLayout::new(
            "Title and Vertical Text",
            vec![
                title_placeholder(STANDARD_TITLE),
                PlaceholderDef::new(1, Body, "Vertical Text Placeholder 2", STANDARD_BODY),
            ],
        ),
        SlideLayout::new(
            "Vertical Title and Text",
            vec![
                PlaceholderDef::new(
                    0,
                    PlaceholderKind::Title,
                    "Vertical Title 1",
                    Rect::emu(6_629_400, 274_638, 2_057_400, 5_851_525),
                ),
                PlaceholderDef::new(
                    1,
                    Body,
                    "Vertical Text Placeholder 2",
                    Rect::emu(457_200, 274_638, 6_019_800, 5_851_525),
                ),
            ],
        ),
    ]
}
