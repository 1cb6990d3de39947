use egui::Pos2;

/// Tunable puzzle parameters.
///
/// Passed by value into the factory and session at construction so the core
/// never touches the display surface. Persisted with the rest of the app
/// settings between runs.
#[derive(Clone, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub rows: u32,
    pub cols: u32,
    /// Max per-axis distance (in points) at which a released piece snaps home.
    pub snap_tolerance: f32,
    /// Longest side the source image is downscaled to before slicing.
    pub max_dimension: u32,
    /// Top-left corner of the assembled puzzle on the canvas.
    pub origin: [f32; 2],
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            cols: 3,
            snap_tolerance: 20.0,
            max_dimension: 400,
            origin: [50.0, 50.0],
        }
    }
}

impl PuzzleConfig {
    pub fn origin(&self) -> Pos2 {
        Pos2::new(self.origin[0], self.origin[1])
    }
}
