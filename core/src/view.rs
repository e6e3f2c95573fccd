//! Snapshots of individual nodes in a mounted view tree.
//!
//! A [`ShadowView`] is an immutable, by-value picture of a single node at one point in time. The
//! scheduler never holds references into the host tree; every mutation carries its own copies of
//! the snapshots it describes, so that animating one mutation can never affect another.

use crate::interpolation::Lerp;
use std::fmt::{self, Debug};

/// Identity of a node within its surface.
pub type Tag = u32;

/// Identity of an independently mounted root (window, screen, embedded view, etc.).
pub type SurfaceId = u32;

/// Bound required of application-defined view props carried by a [`ShadowView`].
///
/// Blanket-implemented; any type that can be interpolated, compared and cloned qualifies. The
/// [`Lerp`](../../relayout_macros/derive.Lerp.html) derive is the usual way to satisfy it.
pub trait Props: Lerp + Clone + Debug + PartialEq + Send + 'static {}

impl<T: Lerp + Clone + Debug + PartialEq + Send + 'static> Props for T {}

/// Axis-aligned rectangle in layout coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

impl Lerp for Rect {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        Self {
            x: self.x.lerp(&y1.x, x),
            y: self.y.lerp(&y1.y, x),
            width: self.width.lerp(&y1.width, x),
            height: self.height.lerp(&y1.height, x),
        }
    }
}

/// How a node participates in layout. Not interpolable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum DisplayType {
    None,
    #[default]
    Flex,
    Inline,
}

/// Result of layout for a single node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutMetrics {
    /// Position and size relative to the parent. This is the only interpolated part of the
    /// metrics; everything else is taken from the destination snapshot.
    pub frame: Rect,
    pub display: DisplayType,
    pub point_scale_factor: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            frame: Rect::default(),
            display: DisplayType::default(),
            point_scale_factor: 1.0,
        }
    }
}

impl Lerp for LayoutMetrics {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        Self {
            frame: self.frame.lerp(&y1.frame, x),
            display: y1.display,
            point_scale_factor: y1.point_scale_factor,
        }
    }
}

/// Visual properties that enter and exit animations collapse to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub opacity: f32,
    pub scale_x: f32,
    pub scale_y: f32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl Lerp for Appearance {
    fn lerp(&self, y1: &Self, x: f32) -> Self {
        Self {
            opacity: self.opacity.lerp(&y1.opacity, x),
            scale_x: self.scale_x.lerp(&y1.scale_x, x),
            scale_y: self.scale_y.lerp(&y1.scale_y, x),
        }
    }
}

/// Snapshot of a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct ShadowView<P = ()> {
    pub tag: Tag,
    /// Name of the component type, used to look up its
    /// [`ComponentDescriptor`](crate::registry::ComponentDescriptor).
    pub component_name: &'static str,
    pub surface_id: SurfaceId,
    pub layout: LayoutMetrics,
    pub appearance: Appearance,
    pub props: P,
}

impl<P: Default> ShadowView<P> {
    /// Creates a snapshot with default layout, appearance and props.
    pub fn new(tag: Tag, component_name: &'static str, surface_id: SurfaceId) -> Self {
        Self {
            tag,
            component_name,
            surface_id,
            layout: LayoutMetrics::default(),
            appearance: Appearance::default(),
            props: P::default(),
        }
    }
}

impl<P> ShadowView<P> {
    pub fn with_frame(mut self, frame: Rect) -> Self {
        self.layout.frame = frame;
        self
    }

    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    pub fn with_props(mut self, props: P) -> Self {
        self.props = props;
        self
    }
}
