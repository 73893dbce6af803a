use std::sync::Arc;

use crate::{
    bitmap::Bitmap,
    foundation::core::{Affine, Color, Rect, surface_rect},
    foundation::error::{FrameError, FrameResult},
    pixel::LockedFramebuffer,
    render::composite::over_in_place,
};

/// Drawing operations issued against a locked render target.
///
/// Everything drawn is committed to the target's memory no later than [`DrawingContext::finish`]
/// or, failing that, when the context is dropped.
pub trait DrawingContext {
    /// Multiply everything drawn until the matching pop by `opacity` (clamped to `[0, 1]`).
    fn push_opacity(&mut self, opacity: f64);

    /// Close the innermost opacity group.
    fn pop_opacity(&mut self) -> FrameResult<()>;

    /// Fill `rect` (logical units) with a solid color.
    fn fill_rectangle(&mut self, brush: Color, rect: Rect);

    /// Draw the `source_rect` region of `source` scaled into `dest_rect`.
    fn draw_image(
        &mut self,
        source: &Bitmap,
        opacity: f64,
        source_rect: Rect,
        dest_rect: Rect,
    ) -> FrameResult<()>;

    /// Close any open groups and write the result into the target.
    fn finish(self: Box<Self>) -> FrameResult<()>;
}

/// [`DrawingContext`] rasterizing with `vello_cpu` into a transparent layer, which is blended
/// over the locked target's existing pixels on commit.
pub struct CpuDrawingContext<'t> {
    target: LockedFramebuffer<'t>,
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
    base: Affine,
    open_layers: usize,
    committed: bool,
}

impl<'t> CpuDrawingContext<'t> {
    pub fn new(target: LockedFramebuffer<'t>) -> FrameResult<Self> {
        let width: u16 = target
            .width()
            .try_into()
            .map_err(|_| FrameError::validation("render target width exceeds u16"))?;
        let height: u16 = target
            .height()
            .try_into()
            .map_err(|_| FrameError::validation("render target height exceeds u16"))?;
        let (sx, sy) = target.dpi().scale();

        Ok(Self {
            target,
            ctx: vello_cpu::RenderContext::new(width, height),
            width,
            height,
            base: Affine::scale_non_uniform(sx, sy),
            open_layers: 0,
            committed: false,
        })
    }

    fn commit(&mut self) -> FrameResult<()> {
        if self.committed {
            return Ok(());
        }
        self.committed = true;

        while self.open_layers > 0 {
            self.ctx.pop_layer();
            self.open_layers -= 1;
        }
        self.ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.render_to_pixmap(&mut layer);

        let mut pixels = self.target.to_rgba8_premul();
        over_in_place(&mut pixels, layer.data_as_u8_slice())?;
        self.target.copy_from_rgba8_premul(&pixels)?;

        tracing::debug!(
            width = self.width,
            height = self.height,
            format = %self.target.format(),
            "committed drawing session"
        );
        Ok(())
    }
}

impl DrawingContext for CpuDrawingContext<'_> {
    fn push_opacity(&mut self, opacity: f64) {
        self.ctx.push_opacity_layer(opacity.clamp(0.0, 1.0) as f32);
        self.open_layers += 1;
    }

    fn pop_opacity(&mut self) -> FrameResult<()> {
        if self.open_layers == 0 {
            return Err(FrameError::drawing("pop_opacity without matching push_opacity"));
        }
        self.ctx.pop_layer();
        self.open_layers -= 1;
        Ok(())
    }

    fn fill_rectangle(&mut self, brush: Color, rect: Rect) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(brush.r, brush.g, brush.b, brush.a));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    fn draw_image(
        &mut self,
        source: &Bitmap,
        opacity: f64,
        source_rect: Rect,
        dest_rect: Rect,
    ) -> FrameResult<()> {
        let bounds = surface_rect(source.width(), source.height());
        if source_rect.area() <= 0.0 || bounds.intersect(source_rect) != source_rect {
            return Err(FrameError::validation(format!(
                "source rect {source_rect:?} is empty or outside the {}x{} bitmap",
                source.width(),
                source.height()
            )));
        }
        if dest_rect.area() <= 0.0 {
            return Err(FrameError::validation(format!(
                "destination rect {dest_rect:?} is empty"
            )));
        }

        let image = bitmap_to_image(source)?;
        let transform = self.base
            * Affine::translate(dest_rect.origin().to_vec2())
            * Affine::scale_non_uniform(
                dest_rect.width() / source_rect.width(),
                dest_rect.height() / source_rect.height(),
            )
            * Affine::translate(-source_rect.origin().to_vec2());

        let opacity = opacity.clamp(0.0, 1.0);
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(image);
        if opacity < 1.0 {
            self.ctx.push_opacity_layer(opacity as f32);
        }
        self.ctx.fill_rect(&rect_to_cpu(source_rect));
        if opacity < 1.0 {
            self.ctx.pop_layer();
        }
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> FrameResult<()> {
        self.commit()
    }
}

impl Drop for CpuDrawingContext<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.commit() {
            tracing::error!(%err, "drawing session failed to commit on drop");
        }
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bitmap_to_image(bitmap: &Bitmap) -> FrameResult<vello_cpu::Image> {
    let w: u16 = bitmap
        .width()
        .try_into()
        .map_err(|_| FrameError::validation("bitmap width exceeds u16"))?;
    let h: u16 = bitmap
        .height()
        .try_into()
        .map_err(|_| FrameError::validation("bitmap height exceeds u16"))?;

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(bitmap.width() as usize * bitmap.height() as usize);
    for px in bitmap.rgba8_premul().chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, may_have_opacities);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/context.rs"]
mod tests;
