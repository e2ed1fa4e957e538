// Rasterize chart paths to PNG with tiny-skia
use crate::domain::chart::{PathCommand, SmoothPath};
use thiserror::Error;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} canvas")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("path has no drawable area")]
    EmptyPath,
    #[error("png encoding failed: {0}")]
    Encode(String),
}

#[derive(Debug, Clone)]
pub struct ChartRasterizer {
    fill_rgba: [u8; 4],
}

impl ChartRasterizer {
    pub fn new(fill_rgba: [u8; 4]) -> Self {
        Self { fill_rgba }
    }

    /// Fill the path onto a transparent canvas and encode it as PNG
    pub fn render_png(
        &self,
        path: &SmoothPath,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(RenderError::InvalidCanvas { width, height })?;

        let skia_path = to_skia_path(path).ok_or(RenderError::EmptyPath)?;

        let [r, g, b, a] = self.fill_rgba;
        let mut paint = Paint::default();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;

        pixmap.fill_path(&skia_path, &paint, FillRule::Winding, Transform::identity(), None);

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

fn to_skia_path(path: &SmoothPath) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for command in &path.commands {
        match *command {
            PathCommand::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathCommand::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathCommand::QuadTo { control, to } => {
                pb.quad_to(control.x as f32, control.y as f32, to.x as f32, to.y as f32)
            }
            PathCommand::Close => pb.close(),
        }
    }
    pb.finish()
}
