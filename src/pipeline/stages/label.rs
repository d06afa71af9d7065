use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;

/// A connected blob of foreground pixels with its bounding box and shape
/// statistics. Immutable once produced by [`find_components`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Label id in the map this component came from.
    pub label: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Number of member pixels. Always `<= width * height`.
    pub area: u32,
}

impl Component {
    /// Bounding-box width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Fraction of the bounding box covered by member pixels.
    pub fn solidity(&self) -> f32 {
        self.area as f32 / (self.width as f32 * self.height as f32)
    }
}

/// Label map plus per-label components for one binary mask.
///
/// The map is kept so a component's exact pixel set can be re-extracted
/// later; the bounding box alone would pick up pixels of neighboring
/// components that overlap it.
pub struct ComponentMap {
    labels: ImageBuffer<Luma<u32>, Vec<u32>>,
    pub components: Vec<Component>,
}

/// Extract 8-connected components from a binary mask (foreground = 255).
///
/// O(W*H) time and auxiliary space.
pub fn find_components(mask: &GrayImage) -> ComponentMap {
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut stats: HashMap<u32, (u32, u32, u32, u32, u32)> = HashMap::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let id = label.0[0];
        if id == 0 {
            continue; // background
        }

        stats
            .entry(id)
            .and_modify(|(min_x, min_y, max_x, max_y, count)| {
                *min_x = (*min_x).min(x);
                *min_y = (*min_y).min(y);
                *max_x = (*max_x).max(x);
                *max_y = (*max_y).max(y);
                *count += 1;
            })
            .or_insert((x, y, x, y, 1));
    }

    let mut components: Vec<Component> = stats
        .into_iter()
        .map(|(label, (min_x, min_y, max_x, max_y, count))| Component {
            label,
            x: min_x,
            y: min_y,
            width: max_x - min_x + 1,
            height: max_y - min_y + 1,
            area: count,
        })
        .collect();

    // HashMap iteration order is arbitrary; give callers a stable starting
    // order before any filtering happens.
    components.sort_by_key(|c| (c.x, c.y, c.label));

    ComponentMap { labels, components }
}

impl ComponentMap {
    /// Cut the component's ROI out of the mask, keeping only pixels that
    /// carry the component's own label.
    pub fn extract(&self, component: &Component) -> GrayImage {
        GrayImage::from_fn(component.width, component.height, |x, y| {
            let id = self.labels.get_pixel(component.x + x, component.y + y).0[0];
            if id == component.label {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        })
    }
}
