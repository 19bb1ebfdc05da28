//! JSON pointer scripts and their replay through the engine.

use inkboard_core::geometry::rgba;
use inkboard_core::{Engine, EngineConfig, LayerStats, PointerEvent, SurfaceError};
use inkboard_render::{RasterSurface, RendererError, compose_onto_page, render_page};
use image::RgbaImage;
use kurbo::Point;
use peniko::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or replaying a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse script: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid engine config: {0}")]
    Config(#[from] inkboard_core::ConfigError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Render(#[from] RendererError),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("Step {index}: {message}")]
    Step { index: usize, message: String },
}

/// A color given as floating point channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorSpec {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl From<ColorSpec> for Color {
    fn from(color: ColorSpec) -> Self {
        rgba(color.r, color.g, color.b, color.a)
    }
}

/// One scripted host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Tool { name: String },
    Pointer(PointerEvent),
    /// Press at the first point, move through the rest, release at the last.
    Drag { points: Vec<[f64; 2]> },
    /// Hover without pressing.
    Hover { x: f64, y: f64 },
    StrokeWidth { width: f64 },
    StrokeColor(ColorSpec),
    StrokeOpacity { opacity: f64 },
    RectangleColor(ColorSpec),
    CircleColor(ColorSpec),
    SelectAt {
        x: f64,
        y: f64,
        #[serde(default)]
        multi: bool,
    },
    SelectAll,
    ClearSelection,
    DeleteSelected,
    Undo,
    Clear,
    PagePattern { name: String },
    PageScale { scale: f64 },
    /// Render an intermediate frame at a new viewport size.
    Resize { width: u32, height: u32 },
}

/// A replayable script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        script.config.validate()?;
        Ok(script)
    }

    /// A short built-in sketch exercising every tool.
    pub fn demo() -> Self {
        let wave: Vec<[f64; 2]> = (0..=40)
            .map(|i| {
                let x = 60.0 + f64::from(i) * 12.0;
                [x, 120.0 + (f64::from(i) * 0.4).sin() * 40.0]
            })
            .collect();
        let mut config = EngineConfig::default();
        config.page.pattern = inkboard_core::PagePattern::Lined;
        Self {
            config,
            steps: vec![
                Step::Tool { name: "pen".into() },
                Step::StrokeWidth { width: 4.0 },
                Step::Drag { points: wave },
                Step::Tool { name: "rectangle".into() },
                Step::RectangleColor(ColorSpec {
                    r: 0.9,
                    g: 0.3,
                    b: 0.1,
                    a: 1.0,
                }),
                Step::Drag {
                    points: vec![[420.0, 260.0], [140.0, 420.0]],
                },
                Step::Tool { name: "circle".into() },
                Step::CircleColor(ColorSpec {
                    r: 0.1,
                    g: 0.6,
                    b: 0.3,
                    a: 1.0,
                }),
                Step::Drag {
                    points: vec![[600.0, 360.0], [670.0, 400.0]],
                },
                Step::Drag {
                    points: vec![[650.0, 150.0], [680.0, 150.0]],
                },
                Step::Tool { name: "eraser".into() },
                Step::Drag {
                    points: vec![[650.0, 120.0], [650.0, 125.0]],
                },
                Step::Tool { name: "select".into() },
                Step::SelectAt {
                    x: 280.0,
                    y: 340.0,
                    multi: false,
                },
                Step::Drag {
                    points: vec![[140.0, 420.0], [100.0, 480.0]],
                },
            ],
        }
    }
}

/// What a replay produced.
#[derive(Debug)]
pub struct ReplayOutcome {
    /// The final frame flattened over the page backdrop.
    pub image: RgbaImage,
    pub objects: usize,
    pub selected: usize,
    pub stats: LayerStats,
}

/// Replay `script` and render the final frame.
pub fn replay(script: &Script) -> Result<ReplayOutcome, ScriptError> {
    let mut engine = Engine::with_config(RasterSurface::unallocated(), script.config.clone())?;
    let mut viewport = (script.config.width, script.config.height);

    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("Step {index}: {step:?}");
        apply_step(&mut engine, step, &mut viewport)
            .map_err(|message| ScriptError::Step { index, message })?;
    }

    let mut frame = RasterSurface::new(viewport.0, viewport.1)?;
    engine.render_frame(&mut frame)?;
    let page = render_page(&engine.page_settings(), viewport.0, viewport.1)?;
    let image = compose_onto_page(&page, &frame)?;

    Ok(ReplayOutcome {
        image,
        objects: engine.document().len(),
        selected: engine.selection().len(),
        stats: engine.stats(),
    })
}

fn apply_step(
    engine: &mut Engine<RasterSurface>,
    step: &Step,
    viewport: &mut (u32, u32),
) -> Result<(), String> {
    match step {
        Step::Tool { name } => {
            engine.set_active_tool(name);
        }
        Step::Pointer(event) => {
            engine.handle_event(*event);
        }
        Step::Drag { points } => {
            let Some((first, rest)) = points.split_first() else {
                return Err("drag needs at least one point".into());
            };
            let first = Point::new(first[0], first[1]);
            engine.pointer_down(first);
            let mut last = first;
            for p in rest {
                last = Point::new(p[0], p[1]);
                engine.pointer_move(last);
            }
            engine.pointer_up(last);
        }
        Step::Hover { x, y } => {
            engine.pointer_move(Point::new(*x, *y));
        }
        Step::StrokeWidth { width } => engine.set_stroke_width(*width),
        Step::StrokeColor(color) => engine.set_stroke_color((*color).into()),
        Step::StrokeOpacity { opacity } => engine.set_stroke_opacity(*opacity),
        Step::RectangleColor(color) => engine.set_rectangle_color((*color).into()),
        Step::CircleColor(color) => engine.set_circle_color((*color).into()),
        Step::SelectAt { x, y, multi } => {
            engine.select_at(Point::new(*x, *y), *multi);
        }
        Step::SelectAll => {
            engine.select_all();
        }
        Step::ClearSelection => engine.clear_selection(),
        Step::DeleteSelected => {
            engine.delete_selected();
        }
        Step::Undo => {
            engine.undo();
        }
        Step::Clear => engine.clear_canvas(),
        Step::PagePattern { name } => {
            if !engine.set_page_pattern(name) {
                return Err(format!("unknown page pattern '{name}'"));
            }
        }
        Step::PageScale { scale } => engine.set_page_scale(*scale),
        Step::Resize { width, height } => {
            let mut frame = RasterSurface::new(*width, *height).map_err(|e| e.to_string())?;
            engine.render_frame(&mut frame).map_err(|e| e.to_string())?;
            *viewport = (*width, *height);
        }
    }
    Ok(())
}
