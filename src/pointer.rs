#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Maps a client coordinate onto [-1, 1] on both axes, centred on the
/// viewport middle.
pub fn viewport_fraction(
    client_x: f64,
    client_y: f64,
    viewport_width: f64,
    viewport_height: f64,
) -> PointerPosition {
    PointerPosition {
        x: centred_fraction(client_x, viewport_width),
        y: centred_fraction(client_y, viewport_height),
    }
}

fn centred_fraction(value: f64, extent: f64) -> f64 {
    if extent <= 0.0 || !extent.is_finite() {
        return 0.0;
    }

    (value / extent - 0.5) * 2.0
}

pub fn element_relative(
    client_x: f64,
    client_y: f64,
    element_left: f64,
    element_top: f64,
) -> PointerPosition {
    PointerPosition {
        x: client_x - element_left,
        y: client_y - element_top,
    }
}
