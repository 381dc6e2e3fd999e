use crate::app::{Align, HudText};
use ab_glyph::{Font, FontArc, InvalidFont, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};

/// Rasterizes HUD text into a transparent overlay image.
pub struct TextRenderer {
    font: FontArc,
}

impl TextRenderer {
    pub fn new(font_data: Vec<u8>) -> Result<Self, InvalidFont> {
        Ok(Self {
            font: FontArc::try_from_vec(font_data)?,
        })
    }

    /// Width and height of a single line at `px` pixels.
    pub fn measure(&self, text: &str, px: f32) -> (f32, f32) {
        let scaled_font = self.font.as_scaled(PxScale::from(px));
        let width = text
            .chars()
            .filter(|c| !c.is_control())
            .map(|c| scaled_font.h_advance(self.font.glyph_id(c)))
            .sum();
        (width, scaled_font.height())
    }

    /// Draws one line with its top-left corner at `pos`, blending over
    /// whatever is already in `image`.
    pub fn draw(
        &self,
        image: &mut RgbaImage,
        text: &str,
        pos: (f32, f32),
        px: f32,
        color: Rgba<u8>,
    ) {
        let scale = PxScale::from(px);
        let scaled_font = self.font.as_scaled(scale);
        let (width, height) = image.dimensions();
        let baseline = pos.1 + scaled_font.ascent();

        let mut x_pos = pos.0;
        for c in text.chars() {
            if c.is_control() {
                continue;
            }

            let glyph_id = self.font.glyph_id(c);
            let h_advance = scaled_font.h_advance(glyph_id);

            let glyph = glyph_id.with_scale_and_position(scale, point(x_pos, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();

                outlined.draw(|x, y, coverage| {
                    let ix = bounds.min.x as i64 + x as i64;
                    let iy = bounds.min.y as i64 + y as i64;
                    if ix < 0 || iy < 0 || ix >= width as i64 || iy >= height as i64 {
                        return;
                    }
                    let alpha = (coverage.clamp(0.0, 1.0) * color[3] as f32) as u8;
                    if alpha > 0 {
                        blend(image.get_pixel_mut(ix as u32, iy as u32), color, alpha);
                    }
                });
            }
            x_pos += h_advance;
        }
    }

    /// Renders a full HUD frame into a `width` x `height` overlay.
    pub fn render_hud(&self, items: &[HudText], width: u32, height: u32) -> RgbaImage {
        let mut image = RgbaImage::new(width, height);
        for item in items {
            let pos = match item.align {
                Align::TopLeft => item.position,
                Align::Center => {
                    let (w, h) = self.measure(&item.text, item.size);
                    (item.position.0 - w / 2.0, item.position.1 - h / 2.0)
                }
            };
            self.draw(&mut image, &item.text, pos, item.size, item.color);
        }
        image
    }
}

/// Source-over blend of `color` at `alpha` onto `dst`.
fn blend(dst: &mut Rgba<u8>, color: Rgba<u8>, alpha: u8) {
    let a = alpha as f32 / 255.0;
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = a + dst_a * (1.0 - a);
    if out_a <= 0.0 {
        return;
    }
    for i in 0..3 {
        let c = (color[i] as f32 * a + dst[i] as f32 * dst_a * (1.0 - a)) / out_a;
        dst[i] = c.round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}
