const FALLBACK_VIEWPORT_WIDTH: f64 = 1280.0;
const FALLBACK_VIEWPORT_HEIGHT: f64 = 720.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: FALLBACK_VIEWPORT_WIDTH,
            height: FALLBACK_VIEWPORT_HEIGHT,
        }
    }
}

impl ViewportSize {
    pub fn from_dimensions(width: Option<f64>, height: Option<f64>) -> Self {
        let fallback = Self::default();

        Self {
            width: width.unwrap_or(fallback.width),
            height: height.unwrap_or(fallback.height),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn viewport_size() -> ViewportSize {
    let Some(win) = web_sys::window() else {
        return ViewportSize::default();
    };

    ViewportSize::from_dimensions(
        win.inner_width().ok().and_then(|value| value.as_f64()),
        win.inner_height().ok().and_then(|value| value.as_f64()),
    )
}
