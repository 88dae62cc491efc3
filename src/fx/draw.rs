//! Draw commands produced by the scenes and the canvas executor that replays them.

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Bounds, Color, Paint};

/// Shadow glow around a filled disc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Glow {
    pub blur: f64,
    pub color: Color,
}

/// Outlines drawn centered on a point and rotated around it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Figure {
    Square,
    Triangle,
    /// Rectangle twice as wide as it is tall (confetti).
    Strip,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCmd {
    /// Cover the whole canvas. An alpha below 1 leaves a fading trail of older frames.
    Fill(Paint),
    Disc {
        x: f64,
        y: f64,
        radius: f64,
        paint: Paint,
        glow: Option<Glow>,
    },
    Segment {
        from: (f64, f64),
        to: (f64, f64),
        paint: Paint,
        width: f64,
    },
    /// Stroked arc between two absolute angles (radians).
    Arc {
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        paint: Paint,
        width: f64,
    },
    /// Stroked full circle.
    Ring {
        x: f64,
        y: f64,
        radius: f64,
        paint: Paint,
        width: f64,
    },
    Outline {
        x: f64,
        y: f64,
        size: f64,
        rotation: f64,
        figure: Figure,
        paint: Paint,
        width: f64,
        filled: bool,
    },
}

impl DrawCmd {
    pub fn paint(&self) -> Paint {
        match *self {
            DrawCmd::Fill(paint)
            | DrawCmd::Disc { paint, .. }
            | DrawCmd::Segment { paint, .. }
            | DrawCmd::Arc { paint, .. }
            | DrawCmd::Ring { paint, .. }
            | DrawCmd::Outline { paint, .. } => paint,
        }
    }
}

/// Replay `cmds` onto `ctx` in order.
pub fn paint_commands(
    ctx: &CanvasRenderingContext2d,
    bounds: Bounds,
    cmds: &[DrawCmd],
) -> Result<(), JsValue> {
    for cmd in cmds {
        // shadows only ever belong to the disc that asked for them
        ctx.set_shadow_blur(0.0);
        match *cmd {
            DrawCmd::Fill(paint) => {
                ctx.set_fill_style(&JsValue::from_str(&paint.css()));
                ctx.fill_rect(0.0, 0.0, bounds.width, bounds.height);
            }
            DrawCmd::Disc {
                x,
                y,
                radius,
                paint,
                glow,
            } => {
                if let Some(glow) = glow {
                    ctx.set_shadow_blur(glow.blur);
                    ctx.set_shadow_color(&glow.color.css());
                }
                ctx.begin_path();
                ctx.arc(x, y, radius.max(0.0), 0.0, TAU)?;
                ctx.set_fill_style(&JsValue::from_str(&paint.css()));
                ctx.fill();
            }
            DrawCmd::Segment {
                from,
                to,
                paint,
                width,
            } => {
                ctx.begin_path();
                ctx.move_to(from.0, from.1);
                ctx.line_to(to.0, to.1);
                stroke(ctx, paint, width);
            }
            DrawCmd::Arc {
                cx,
                cy,
                radius,
                start,
                end,
                paint,
                width,
            } => {
                ctx.begin_path();
                ctx.arc(cx, cy, radius.max(0.0), start, end)?;
                stroke(ctx, paint, width);
            }
            DrawCmd::Ring {
                x,
                y,
                radius,
                paint,
                width,
            } => {
                ctx.begin_path();
                ctx.arc(x, y, radius.max(0.0), 0.0, TAU)?;
                stroke(ctx, paint, width);
            }
            DrawCmd::Outline {
                x,
                y,
                size,
                rotation,
                figure,
                paint,
                width,
                filled,
            } => {
                ctx.save();
                ctx.translate(x, y)?;
                ctx.rotate(rotation)?;
                let half = size / 2.0;
                ctx.begin_path();
                match figure {
                    Figure::Square => ctx.rect(-half, -half, size, size),
                    Figure::Strip => ctx.rect(-half, -half / 2.0, size, half),
                    Figure::Triangle => {
                        ctx.move_to(0.0, -half);
                        ctx.line_to(half, half);
                        ctx.line_to(-half, half);
                        ctx.close_path();
                    }
                }
                if filled {
                    ctx.set_fill_style(&JsValue::from_str(&paint.css()));
                    ctx.fill();
                } else {
                    stroke(ctx, paint, width);
                }
                ctx.restore();
            }
        }
    }
    Ok(())
}

fn stroke(ctx: &CanvasRenderingContext2d, paint: Paint, width: f64) {
    ctx.set_stroke_style(&JsValue::from_str(&paint.css()));
    ctx.set_line_width(width);
    ctx.stroke();
}
