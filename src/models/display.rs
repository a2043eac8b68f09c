use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// `None` when the panel does not report its physical size.
    pub dpi: Option<f32>,
}

impl Default for DisplayInfo {
    fn default() -> Self {
        Self {
            name: String::new(),
            width: 0,
            height: 0,
            dpi: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrightnessInfo {
    pub display_index: usize,
    pub level_percent: u8,
    pub device: String,
}
