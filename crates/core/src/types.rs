//! Domain types shared by the spreadsheet reader, the presentation
//! backend, and the command-line tools.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Column headers every student spreadsheet must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = ["name", "usn", "photo_path"];

/// One student record loaded from the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRow {
    /// Student's display name, as written in the sheet.
    pub name: String,

    /// University seat number (unique student number).
    pub usn: String,

    /// Path to the student's photo, used as given.
    pub photo_path: PathBuf,
}

impl StudentRow {
    /// Create a new row.
    pub fn new(name: impl Into<String>, usn: impl Into<String>, photo_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            usn: usn.into(),
            photo_path: photo_path.into(),
        }
    }
}

/// The content a placeholder is meant to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaceholderKind {
    Title,
    Body,
    CenterTitle,
    Subtitle,
    Date,
    SlideNumber,
    Footer,
    Header,
    Object,
    Chart,
    Table,
    ClipArt,
    OrgChart,
    MediaClip,
    Picture,
    SlideImage,
    /// A type token this tool does not recognise.
    Unknown,
}

impl PlaceholderKind {
    /// Parse the `type` attribute of a `<p:ph>` element.
    ///
    /// A missing attribute means `obj` per the file format.
    pub fn from_type_attr(value: Option<&str>) -> Self {
        match value.unwrap_or("obj") {
            "title" => Self::Title,
            "body" => Self::Body,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "dt" => Self::Date,
            "sldNum" => Self::SlideNumber,
            "ftr" => Self::Footer,
            "hdr" => Self::Header,
            "obj" => Self::Object,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::OrgChart,
            "media" => Self::MediaClip,
            "pic" => Self::Picture,
            "sldImg" => Self::SlideImage,
            _ => Self::Unknown,
        }
    }

    /// The `type` attribute token, or `None` for the default (`obj`)
    /// and for unknown kinds.
    pub fn type_attr(self) -> Option<&'static str> {
        match self {
            Self::Title => Some("title"),
            Self::Body => Some("body"),
            Self::CenterTitle => Some("ctrTitle"),
            Self::Subtitle => Some("subTitle"),
            Self::Date => Some("dt"),
            Self::SlideNumber => Some("sldNum"),
            Self::Footer => Some("ftr"),
            Self::Header => Some("hdr"),
            Self::Chart => Some("chart"),
            Self::Table => Some("tbl"),
            Self::ClipArt => Some("clipArt"),
            Self::OrgChart => Some("dgm"),
            Self::MediaClip => Some("media"),
            Self::Picture => Some("pic"),
            Self::SlideImage => Some("sldImg"),
            Self::Object | Self::Unknown => None,
        }
    }

    /// Human-readable label used in inspection reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::Body => "BODY",
            Self::CenterTitle => "CENTER_TITLE",
            Self::Subtitle => "SUBTITLE",
            Self::Date => "DATE",
            Self::SlideNumber => "SLIDE_NUMBER",
            Self::Footer => "FOOTER",
            Self::Header => "HEADER",
            Self::Object => "OBJECT",
            Self::Chart => "CHART",
            Self::Table => "TABLE",
            Self::ClipArt => "CLIP_ART",
            Self::OrgChart => "ORG_CHART",
            Self::MediaClip => "MEDIA_CLIP",
            Self::Picture => "PICTURE",
            Self::SlideImage => "SLIDE_IMAGE",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether a slide placeholder of this kind takes a picture rather than text.
    pub fn holds_picture(self) -> bool {
        matches!(self, Self::Picture)
    }

    /// Kinds that are not copied from a layout onto new slides.
    pub fn is_layout_only(self) -> bool {
        matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }

    /// Kinds that start with an empty text body when cloned onto a slide.
    pub fn has_text_frame(self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }
}

/// Attributes of a `<p:ph>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderFormat {
    /// Placeholder index, unique within one slide or layout.
    pub idx: u32,

    /// What the placeholder holds.
    pub kind: PlaceholderKind,

    /// Raw `type` token when it was not recognised.
    pub raw_type: Option<String>,

    /// `orient` attribute, when present.
    pub orient: Option<String>,

    /// `sz` attribute, when present.
    pub size: Option<String>,
}

impl PlaceholderFormat {
    /// Create a format with just an index and kind.
    pub fn new(idx: u32, kind: PlaceholderKind) -> Self {
        Self {
            idx,
            kind,
            raw_type: None,
            orient: None,
            size: None,
        }
    }
}

/// Size of a shape in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub cx: i64,
    pub cy: i64,
}

impl Extent {
    /// Width over height, or `None` for degenerate extents.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.cx <= 0 || self.cy <= 0 {
            return None;
        }
        Some(self.cx as f64 / self.cy as f64)
    }
}
