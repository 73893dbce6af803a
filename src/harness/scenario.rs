use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    bitmap::{Bitmap, WritableBitmap},
    foundation::core::{Color, Rect},
    foundation::error::{FrameError, FrameResult},
    harness::{
        compare::{ComparisonReport, compare_images},
        opts::HarnessOpts,
    },
    pixel::PixelFormat,
    render::{RenderBackend, RenderTargetBitmap},
    surface::{Framebuffer, FramebufferSurface, Lockable},
};

/// A deterministic drawing procedure with a golden image per pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scenario {
    /// Draw into a caller-owned framebuffer, reuse its pixels as a paint source in a second target.
    FramebufferAsBitmap,
    /// Poke a 256x256 gradient straight into a writable bitmap's memory.
    WritableBitmap,
    /// Three solid bands written pixel by pixel in every format.
    FormatBands,
}

impl Scenario {
    pub const ALL: [Scenario; 3] = [
        Scenario::FramebufferAsBitmap,
        Scenario::WritableBitmap,
        Scenario::FormatBands,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Scenario::FramebufferAsBitmap => "framebuffer_as_bitmap",
            Scenario::WritableBitmap => "writable_bitmap",
            Scenario::FormatBands => "format_bands",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Formats this scenario is registered for.
    pub const fn formats(self) -> &'static [PixelFormat] {
        match self {
            Scenario::FramebufferAsBitmap => &PixelFormat::ALL,
            Scenario::WritableBitmap => &[PixelFormat::Bgra8888, PixelFormat::Rgba8888],
            Scenario::FormatBands => &PixelFormat::ALL,
        }
    }

    pub fn cases(self) -> impl Iterator<Item = ScenarioCase> {
        self.formats().iter().map(move |&format| ScenarioCase {
            scenario: self,
            format,
        })
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the scenario table: a scenario bound to a pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScenarioCase {
    pub scenario: Scenario,
    pub format: PixelFormat,
}

impl ScenarioCase {
    pub fn new(scenario: Scenario, format: PixelFormat) -> Self {
        Self { scenario, format }
    }

    /// `<scenario>_<format>`, the stem shared by output and reference files.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.scenario.name(), self.format.name())
    }

    pub fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.out.png", self.file_stem()))
    }

    pub fn reference_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.png", self.file_stem()))
    }
}

impl fmt::Display for ScenarioCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.scenario.name(), self.format)
    }
}

/// Every registered `(scenario, format)` pair, in a stable order.
pub fn scenario_table() -> Vec<ScenarioCase> {
    Scenario::ALL.into_iter().flat_map(Scenario::cases).collect()
}

/// Result of running one case.
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub case: ScenarioCase,
    pub result: FrameResult<ComparisonReport>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Renders scenario cases with an injected backend, persists them, and checks them against
/// their references.
pub struct ScenarioRunner<'b> {
    backend: &'b dyn RenderBackend,
    opts: HarnessOpts,
}

impl<'b> ScenarioRunner<'b> {
    pub fn new(backend: &'b dyn RenderBackend, opts: HarnessOpts) -> Self {
        Self { backend, opts }
    }

    pub fn opts(&self) -> &HarnessOpts {
        &self.opts
    }

    /// Render `case` and persist it to its output path, without comparing.
    pub fn render(&self, case: ScenarioCase) -> FrameResult<PathBuf> {
        let output = case.output_path(&self.opts.output_dir);
        match case.scenario {
            Scenario::FramebufferAsBitmap => {
                let target = framebuffer_as_bitmap(self.backend, case.format)?;
                target.save(&output)?;
                target.release();
            }
            Scenario::WritableBitmap => {
                let bitmap = writable_gradient(case.format)?;
                bitmap.save(&output)?;
                bitmap.release();
            }
            Scenario::FormatBands => {
                let bitmap = format_bands(case.format)?;
                bitmap.save(&output)?;
                bitmap.release();
            }
        }
        Ok(output)
    }

    /// Render, persist, optionally bless, then compare against the reference.
    #[tracing::instrument(skip(self), fields(backend = self.backend.name()))]
    pub fn run(&self, case: ScenarioCase) -> FrameResult<ComparisonReport> {
        self.run_case(case)
            .map_err(|err| err.in_scenario(case.scenario.name(), case.format))
    }

    /// Run every case, collecting each outcome instead of stopping at the first failure.
    pub fn run_all(&self, cases: &[ScenarioCase]) -> Vec<ScenarioOutcome> {
        cases
            .iter()
            .map(|&case| {
                let result = self.run(case);
                match &result {
                    Ok(report) => tracing::info!(
                        %case,
                        max_channel_diff = report.max_channel_diff,
                        "scenario passed"
                    ),
                    Err(err) => tracing::error!(%case, %err, "scenario failed"),
                }
                ScenarioOutcome { case, result }
            })
            .collect()
    }

    fn run_case(&self, case: ScenarioCase) -> FrameResult<ComparisonReport> {
        let actual = self.render(case)?;
        let reference = case.reference_path(&self.opts.output_dir);

        if self.opts.bless {
            std::fs::copy(&actual, &reference).with_context(|| {
                format!("bless {} -> {}", actual.display(), reference.display())
            })?;
            tracing::warn!(reference = %reference.display(), "reference blessed from output");
        }

        compare_images(&actual, &reference, self.opts.tolerance_for(case.format))
    }
}

/// Draw three translucent bands into an 80x80 framebuffer, then paint its top-left 60x60 over a
/// blue target crossed by a pink band.
pub fn framebuffer_as_bitmap(
    backend: &dyn RenderBackend,
    format: PixelFormat,
) -> FrameResult<RenderTargetBitmap> {
    let framebuffer = Framebuffer::new(format, 80, 80)?;
    {
        let mut target = backend.create_render_target(&[&framebuffer])?;
        let mut ctx = backend.create_drawing_context(&mut target)?;
        ctx.push_opacity(0.8);
        ctx.fill_rectangle(Color::CHARTREUSE, Rect::new(0.0, 0.0, 20.0, 100.0));
        ctx.fill_rectangle(Color::CRIMSON, Rect::new(20.0, 0.0, 40.0, 100.0));
        ctx.fill_rectangle(Color::GOLD, Rect::new(40.0, 0.0, 60.0, 100.0));
        ctx.pop_opacity()?;
        ctx.finish()?;
    }

    let source = {
        let lock = framebuffer.lock_framebuffer()?;
        let bitmap = Bitmap::from_pixels(
            lock.format(),
            lock.data(),
            lock.width(),
            lock.height(),
            lock.row_stride(),
        )?;
        lock.unlock();
        bitmap
    };
    framebuffer.deallocate();

    let mut target = backend.create_render_target_bitmap(100, 100)?;
    {
        let mut ctx = backend.create_drawing_context(&mut target)?;
        ctx.fill_rectangle(Color::BLUE, Rect::new(0.0, 0.0, 100.0, 100.0));
        ctx.fill_rectangle(Color::PINK, Rect::new(0.0, 20.0, 100.0, 30.0));
        let rc = Rect::new(0.0, 0.0, 60.0, 60.0);
        ctx.draw_image(&source, 1.0, rc, rc)?;
        ctx.finish()?;
    }
    Ok(target)
}

/// Raw word at `(x, y)` of the 256x256 gradient: red/blue carries `x`, green carries `y`.
pub fn gradient_word(x: u32, y: u32) -> u32 {
    (x + (y << 8)) | 0xFF00_0000
}

/// Write the 256x256 gradient row by row, one lock session per row.
pub fn writable_gradient(format: PixelFormat) -> FrameResult<WritableBitmap> {
    if format.bytes_per_pixel() != 4 {
        return Err(FrameError::validation(format!(
            "gradient words need a 32-bit format, got {format}"
        )));
    }
    const SIZE: u32 = 256;
    let words: Vec<u32> = (0..SIZE)
        .flat_map(|y| (0..SIZE).map(move |x| gradient_word(x, y)))
        .collect();

    let mut bitmap = WritableBitmap::new(SIZE, SIZE, format)?;
    for (y, row) in (0..SIZE).zip(words.chunks_exact(SIZE as usize)) {
        let mut lock = bitmap.lock()?;
        lock.write_row(y, row)?;
        lock.unlock();
    }
    Ok(bitmap)
}

/// Band colors and their `[x0, x1)` columns in [`format_bands`].
pub const BANDS: [(Color, u32, u32); 3] = [
    (Color::CHARTREUSE, 0, 20),
    (Color::CRIMSON, 20, 40),
    (Color::GOLD, 40, 60),
];

/// An 80x80 bitmap with [`BANDS`] written directly; everything right of the bands stays zero.
pub fn format_bands(format: PixelFormat) -> FrameResult<WritableBitmap> {
    let mut bitmap = WritableBitmap::new(80, 80, format)?;
    let mut lock = bitmap.lock()?;
    for (color, x0, x1) in BANDS {
        lock.fill_rgba8(x0, 0, x1, 80, color.to_premul());
    }
    lock.unlock();
    Ok(bitmap)
}

#[cfg(test)]
#[path = "../../tests/unit/harness/scenario.rs"]
mod tests;
