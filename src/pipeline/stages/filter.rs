use crate::pipeline::profile::ProcessingProfile;
use crate::pipeline::stages::label::Component;

/// Keep the components that look like digits and fix their reading order.
///
/// Survivors are sorted ascending by x with a stable sort; that ordering is
/// what turns a bag of blobs into a left-to-right digit string.
pub fn select_regions(
    components: &[Component],
    frame_width: u32,
    frame_height: u32,
    profile: &ProcessingProfile,
) -> Vec<Component> {
    let mut regions: Vec<Component> = components
        .iter()
        .filter(|c| accepts(c, frame_width, frame_height, profile))
        .copied()
        .collect();

    regions.sort_by_key(|c| c.x);
    regions
}

fn accepts(
    c: &Component,
    frame_width: u32,
    frame_height: u32,
    profile: &ProcessingProfile,
) -> bool {
    if c.area < profile.min_area {
        return false;
    }

    let aspect = c.aspect_ratio();
    if aspect < profile.min_aspect_ratio || aspect > profile.max_aspect_ratio {
        return false;
    }

    if c.solidity() < profile.min_solidity {
        return false;
    }

    if touches_border(c, frame_width, frame_height, profile.border_margin)
        && c.area < profile.border_bypass_area
    {
        return false;
    }

    true
}

fn touches_border(c: &Component, frame_width: u32, frame_height: u32, margin: u32) -> bool {
    c.x < margin
        || c.y < margin
        || c.x + c.width > frame_width.saturating_sub(margin)
        || c.y + c.height > frame_height.saturating_sub(margin)
}
