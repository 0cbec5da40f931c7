//! Thumbkit renders social-media thumbnails from declarative layouts.
//!
//! A render combines three inputs:
//!
//! - a [`LayoutDefinition`] from a [`LayoutCatalog`] (where things go)
//! - a [`ContentConfig`] (what the texts say, which images to use, how the background looks)
//! - [`ResolvedAssets`] (decoded images, keyed by element id)
//!
//! [`LayoutEngine::render`] draws them onto any [`Surface`]: the raster [`CpuSurface`] for real
//! output or the [`RecordingSurface`] for inspecting draw calls. [`encode_frame`] turns the
//! finished frame into PNG or JPEG bytes. Client requests go through [`validate_request`] first.
#![forbid(unsafe_code)]

mod assets;
mod foundation;

pub(crate) mod content;
pub(crate) mod layout;
pub(crate) mod render;
pub(crate) mod request;
pub(crate) mod text;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{Canvas, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{ThumbError, ThumbResult};

pub use crate::layout::anchor::{Anchor, HAnchor, VAnchor};
pub use crate::layout::catalog::{LayoutCatalog, LayoutFile};
pub use crate::layout::model::{
    GradientDirection, ImageElementDef, ImageSizing, LayoutDefinition, LayoutElement,
    OverlayElementDef, OverlayGradient, OverlaySizing, OverlayStyling, Position, TextAlign,
    TextElementDef, TextSizing, TextStyling,
};
pub use crate::layout::units::{Length, ROOT_FONT_SIZE_PX, VerticalPosition, resolve_length_str};

pub use crate::content::config::{
    BackgroundKind, BackgroundSpec, ContentConfig, ImageContent, ImageFit, OverlayContent,
    TextContent,
};
pub use crate::content::gradients::{GradientCatalog, GradientDef};
pub use crate::content::presets::{Preset, PresetCatalog};

pub use crate::assets::decode::{ImageHandle, decode_image};
pub use crate::assets::store::{ResolvedAssets, normalize_rel_path};

pub use crate::text::fonts::{FontWeight, font_files_in_dir, resolve_font_family};
pub use crate::text::wrap::{TextMeasure, wrap_text};

pub use crate::render::background::{cover_image_rect, paint_background, scaled_image_rect};
pub use crate::render::cpu::{CpuSurface, CpuSurfaceOpts, FONT_DIR_ENV};
pub use crate::render::engine::{AUTO_FLOW_GAP, BoundsMap, ElementBounds, LayoutEngine};
pub use crate::render::recording::{DrawOp, RecordingSurface};
pub use crate::render::surface::{FontSpec, FrameRGBA, Paint, Surface, TextStyle};

pub use crate::request::encode::{DEFAULT_JPEG_QUALITY, OutputFormat, encode_frame};
pub use crate::request::validate::{
    BackgroundRequest, Catalogs, ImageRequest, MAX_TEXT_CHARS, OverlayRequest, RenderRequest,
    SCALE_PERCENT_RANGE, TextRequest, ValidatedRequest, expand_hex_color, parse_color,
    validate_request,
};
