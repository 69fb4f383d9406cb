//! Drawing boundary between the compositor and an output surface.
//!
//! The compositor emits [`DrawCommand`] values; anything implementing
//! [`Canvas`] can execute them, either directly or by replaying a recorded
//! command list.

use crate::camera::VideoFrame;
use crate::utils::color::Color;
use serde::Serialize;

/// A point in surface pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A line segment in surface pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub from: Point2,
    pub to: Point2,
}

/// A 2D drawable output target
pub trait Canvas {
    /// Reset the whole surface to transparent at the given pixel size
    fn clear(&mut self, width: u32, height: u32);

    /// Blit a video frame over the full surface
    fn draw_video(&mut self, frame: &VideoFrame, mirrored: bool);

    /// Stroke one connector set
    fn stroke_connectors(&mut self, segments: &[Segment], color: Color, width: f32);

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Point2, radius: f32, color: Color, width: f32);

    /// Radial gradient disc from `color` at the center to fully transparent at `radius`
    fn radial_glow(&mut self, center: Point2, radius: f32, color: Color);
}

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        width: u32,
        height: u32,
    },
    DrawVideo {
        width: u32,
        height: u32,
        mirrored: bool,
    },
    StrokeConnectors {
        segments: Vec<Segment>,
        color: Color,
        width: f32,
    },
    FillCircle {
        center: Point2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Point2,
        radius: f32,
        color: Color,
        width: f32,
    },
    RadialGlow {
        center: Point2,
        radius: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// Execute this command on a canvas; `frame` backs any video blit
    pub fn apply(&self, canvas: &mut dyn Canvas, frame: &VideoFrame) {
        match self {
            Self::Clear { width, height } => canvas.clear(*width, *height),
            Self::DrawVideo { mirrored, .. } => canvas.draw_video(frame, *mirrored),
            Self::StrokeConnectors { segments, color, width } => canvas.stroke_connectors(segments, *color, *width),
            Self::FillCircle { center, radius, color } => canvas.fill_circle(*center, *radius, *color),
            Self::StrokeCircle {
                center,
                radius,
                color,
                width,
            } => canvas.stroke_circle(*center, *radius, *color, *width),
            Self::RadialGlow { center, radius, color } => canvas.radial_glow(*center, *radius, *color),
        }
    }
}

/// Replay a command list onto a canvas
pub fn replay(commands: &[DrawCommand], canvas: &mut dyn Canvas, frame: &VideoFrame) {
    for command in commands {
        command.apply(canvas, frame);
    }
}

/// Canvas that records commands instead of rasterizing them
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Number of connector-set strokes recorded
    #[must_use]
    pub fn connector_calls(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::StrokeConnectors { .. }))
    }

    /// Number of filled shapes recorded (discs and glows)
    #[must_use]
    pub fn fill_calls(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::FillCircle { .. } | DrawCommand::RadialGlow { .. }))
    }

    fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl Canvas for CommandRecorder {
    fn clear(&mut self, width: u32, height: u32) {
        self.commands.push(DrawCommand::Clear { width, height });
    }

    fn draw_video(&mut self, frame: &VideoFrame, mirrored: bool) {
        self.commands.push(DrawCommand::DrawVideo {
            width: frame.width(),
            height: frame.height(),
            mirrored,
        });
    }

    fn stroke_connectors(&mut self, segments: &[Segment], color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeConnectors {
            segments: segments.to_vec(),
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Point2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle { center, radius, color });
    }

    fn stroke_circle(&mut self, center: Point2, radius: f32, color: Color, width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            width,
        });
    }

    fn radial_glow(&mut self, center: Point2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::RadialGlow { center, radius, color });
    }
}
