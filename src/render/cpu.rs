use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::PreparedImage;
use crate::assets::fonts::{FontFamily, FontRegistry, TextBrushRgba8, TextLayoutEngine};
use crate::foundation::core::{Affine, HexColor, Rect};
use crate::foundation::error::{OvertextError, OvertextResult};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::scene::{BackgroundLayer, Handles, Scene, TextNode};

/// Outline and anchor stroke color of the transform handles.
const HANDLE_STROKE: [u8; 4] = [0, 161, 255, 255];
/// Anchor fill color.
const HANDLE_FILL: [u8; 4] = [255, 255, 255, 255];

/// CPU backend powered by `vello_cpu` for image, vector and text rasterization.
pub struct CpuBackend {
    settings: RenderSettings,
    fonts: Arc<FontRegistry>,
    text_engine: TextLayoutEngine,
    image_cache: Option<(Arc<PreparedImage>, vello_cpu::Image)>,
    /// Requested family to the family actually drawn and its font data.
    font_cache: HashMap<FontFamily, (FontFamily, vello_cpu::peniko::FontData)>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings, fonts: Arc<FontRegistry>) -> Self {
        Self {
            settings,
            fonts,
            text_engine: TextLayoutEngine::new(),
            image_cache: None,
            font_cache: HashMap::new(),
        }
    }

    fn image_paint_for(&mut self, image: &Arc<PreparedImage>) -> OvertextResult<vello_cpu::Image> {
        if let Some((cached, paint)) = &self.image_cache
            && Arc::ptr_eq(cached, image)
        {
            return Ok(paint.clone());
        }

        let pixmap = image_premul_bytes_to_pixmap(
            image.rgba8_premul.as_slice(),
            image.width,
            image.height,
        )?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache = Some((Arc::clone(image), paint.clone()));
        Ok(paint)
    }

    fn font_for(
        &mut self,
        family: FontFamily,
    ) -> OvertextResult<(FontFamily, vello_cpu::peniko::FontData)> {
        if let Some(entry) = self.font_cache.get(&family) {
            return Ok(entry.clone());
        }
        let (resolved, bytes) = self
            .fonts
            .resolve(family)
            .ok_or_else(|| OvertextError::render(format!("no font registered for {family}")))?;
        if resolved != family {
            tracing::warn!(
                %family,
                fallback = %resolved,
                "font not registered; drawing with fallback"
            );
        }
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(bytes.as_slice().to_vec()),
            0,
        );
        self.font_cache.insert(family, (resolved, font.clone()));
        Ok((resolved, font))
    }

    fn draw_background(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        layer: &BackgroundLayer,
    ) -> OvertextResult<()> {
        let img = &layer.image;
        if img.width == 0 || img.height == 0 {
            return Ok(());
        }
        let paint = self.image_paint_for(img)?;
        let sx = layer.dest.width() / f64::from(img.width);
        let sy = layer.dest.height() / f64::from(img.height);
        let tr = Affine::translate(layer.dest.origin().to_vec2()) * Affine::scale_non_uniform(sx, sy);

        ctx.set_transform(affine_to_cpu(tr));
        ctx.set_paint(paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(img.width),
            f64::from(img.height),
        ));
        Ok(())
    }

    fn draw_text(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        node: &TextNode,
    ) -> OvertextResult<()> {
        let (family, font) = self.font_for(node.font_family)?;
        let bytes = self
            .fonts
            .get(family)
            .cloned()
            .ok_or_else(|| OvertextError::render(format!("no font registered for {family}")))?;
        let fill = node.fill;
        let layout = self.text_engine.layout_plain(
            &node.text,
            family,
            &bytes,
            node.font_size_px as f32,
            TextBrushRgba8 {
                r: fill.r,
                g: fill.g,
                b: fill.b,
                a: 255,
            },
        )?;

        ctx.set_transform(affine_to_cpu(node.transform()));
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(node.stroke_width));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = || {
                    run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                };
                let font_size = run.run().font_size();

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                ctx.glyph_run(&font).font_size(font_size).fill_glyphs(glyphs());

                if node.stroke_width > 0.0 {
                    ctx.set_paint(hex_to_cpu(node.stroke));
                    ctx.glyph_run(&font)
                        .font_size(font_size)
                        .stroke_glyphs(glyphs());
                }
            }
        }
        Ok(())
    }

    fn draw_handles(&mut self, ctx: &mut vello_cpu::RenderContext, handles: &Handles) {
        let [r, g, b, a] = HANDLE_STROKE;
        let stroke = vello_cpu::peniko::Color::from_rgba8(r, g, b, a);
        let [fr, fg, fb, fa] = HANDLE_FILL;
        let fill = vello_cpu::peniko::Color::from_rgba8(fr, fg, fb, fa);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
        ctx.set_paint(stroke);
        ctx.stroke_rect(&rect_to_cpu(handles.border));

        for anchor in [handles.left, handles.right] {
            ctx.set_paint(fill);
            ctx.fill_rect(&rect_to_cpu(anchor));
            ctx.set_paint(stroke);
            ctx.stroke_rect(&rect_to_cpu(anchor));
        }
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(level = "debug", skip_all, fields(w = scene.canvas.width, h = scene.canvas.height))]
    fn render_scene(&mut self, scene: &Scene) -> OvertextResult<FrameRGBA> {
        let width: u16 = scene
            .canvas
            .width
            .try_into()
            .map_err(|_| OvertextError::render("canvas width exceeds u16"))?;
        let height: u16 = scene
            .canvas
            .height
            .try_into()
            .map_err(|_| OvertextError::render("canvas height exceeds u16"))?;

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some([r, g, b, a]) = self.settings.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&rect_to_cpu(scene.canvas.rect()));
        }
        if let Some(layer) = &scene.background {
            self.draw_background(&mut ctx, layer)?;
        }
        if let Some(node) = &scene.text {
            self.draw_text(&mut ctx, node)?;
        }
        if let Some(handles) = &scene.handles {
            self.draw_handles(&mut ctx, handles);
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: scene.canvas.width,
            height: scene.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn hex_to_cpu(c: HexColor) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> OvertextResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| OvertextError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| OvertextError::render("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(OvertextError::render("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
