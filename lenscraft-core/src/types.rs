use crate::line::{Line, Paragraph};
use serde::{Deserialize, Serialize};

// ===== GEOMETRY =====
// Pixel units, top-left origin, y grows downward.

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// One OCR-detected text region. Immutable after construction; the center
/// coordinates are always derived from the box, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    text: String,
    bounding_box: BoundingBox,
}

impl Fragment {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bounding_box,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    /// Left edge; the within-line ordering key.
    pub fn x(&self) -> f64 {
        self.bounding_box.x
    }

    pub fn center_x(&self) -> f64 {
        self.bounding_box.center_x()
    }

    pub fn center_y(&self) -> f64 {
        self.bounding_box.center_y()
    }
}

// ===== RAW INPUT RECORDS =====
// What an OCR front end hands us. Two bounding-box shapes are accepted:
// a flat {x, y, width, height} and the lens shape that nests the pixel box
// under `pixelCoords` next to percentage-based fields we ignore.

#[derive(Debug, Clone, Deserialize)]
pub struct RawFragment {
    pub text: String,
    #[serde(rename = "boundingBox", alias = "bounding_box")]
    pub bounding_box: RawBoundingBox,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawBoundingBox {
    Lens {
        #[serde(rename = "pixelCoords", alias = "pixel_coords")]
        pixel_coords: BoundingBox,
    },
    Plain(BoundingBox),
}

impl RawBoundingBox {
    pub fn pixel_box(&self) -> BoundingBox {
        match self {
            RawBoundingBox::Lens { pixel_coords } => *pixel_coords,
            RawBoundingBox::Plain(bounding_box) => *bounding_box,
        }
    }
}

impl From<RawFragment> for Fragment {
    fn from(raw: RawFragment) -> Self {
        let bounding_box = raw.bounding_box.pixel_box();
        Fragment::new(raw.text, bounding_box)
    }
}

// ===== PIPELINE RESULT =====

/// Two independent views of the same fragment set. Paragraphs hold their own
/// copies of the fragments, not references into `lines`.
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    pub lines: Vec<Line>,
    pub paragraphs: Vec<Paragraph>,
}

impl LayoutResult {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn fragment_count(&self) -> usize {
        self.lines.iter().map(Line::len).sum()
    }
}
