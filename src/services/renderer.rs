//! QR renderer boundary and the styled SVG renderer.
//!
//! Symbol encoding, error correction and module placement come from the
//! `qrcode` crate. [`StyledQrRenderer`] lays the module matrix out on the
//! fixed 1024 unit canvas and draws dots, eye frames, eye balls and the
//! optional logo according to [`RenderOptions`].

use qrcode::{EcLevel, QrCode};
use thiserror::Error;

use super::drawing::{Drawing, escape_xml};
use super::render::RenderOptions;
use super::session::DisplayTarget;
use crate::models::{Color, CornerDotType, CornerSquareType, DotType, ErrorCorrectionLevel};

/// Finder pattern edge in modules
const FINDER_SIZE: usize = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("QR encoding failed: {0}")]
    Encode(String),

    #[error("{modules} modules do not fit a {canvas} unit canvas with margin {margin}")]
    CanvasTooSmall {
        modules: usize,
        canvas: u32,
        margin: u32,
    },
}

/// Construct-from-config, update-in-place and attach-to-target.
pub trait QrRenderer: Send {
    fn create(options: &RenderOptions) -> Result<Self, RenderError>
    where
        Self: Sized;

    fn update(&mut self, options: &RenderOptions) -> Result<(), RenderError>;

    /// Place a copy of the current drawing into `target`
    fn append(&self, target: &mut DisplayTarget);
}

/// Renders styled QR codes as SVG drawings
#[derive(Debug, Clone)]
pub struct StyledQrRenderer {
    options: RenderOptions,
    drawing: Drawing,
}

impl StyledQrRenderer {
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }
}

impl QrRenderer for StyledQrRenderer {
    fn create(options: &RenderOptions) -> Result<Self, RenderError> {
        Ok(Self {
            drawing: draw(options)?,
            options: options.clone(),
        })
    }

    fn update(&mut self, options: &RenderOptions) -> Result<(), RenderError> {
        if *options == self.options {
            return Ok(());
        }
        self.drawing = draw(options)?;
        self.options = options.clone();
        Ok(())
    }

    fn append(&self, target: &mut DisplayTarget) {
        target.attach(self.drawing.clone());
    }
}

fn ec_level(level: ErrorCorrectionLevel) -> EcLevel {
    match level {
        ErrorCorrectionLevel::L => EcLevel::L,
        ErrorCorrectionLevel::M => EcLevel::M,
        ErrorCorrectionLevel::Q => EcLevel::Q,
        ErrorCorrectionLevel::H => EcLevel::H,
    }
}

/// Share of codewords each level can recover
fn recoverable_fraction(level: ErrorCorrectionLevel) -> f64 {
    match level {
        ErrorCorrectionLevel::L => 0.07,
        ErrorCorrectionLevel::M => 0.15,
        ErrorCorrectionLevel::Q => 0.25,
        ErrorCorrectionLevel::H => 0.30,
    }
}

/// Square block of modules set aside for the logo, as `(start, edge)`.
///
/// The block covers `image_size` of the symbol area, capped by what the
/// error-correction level can recover. It never reaches the finder
/// patterns or their separators, and its edge has the same parity as the
/// symbol so it is centred.
pub fn logo_block(
    modules: usize,
    image_size: f32,
    level: ErrorCorrectionLevel,
) -> Option<(usize, usize)> {
    let coverage = f64::from(image_size).min(recoverable_fraction(level));
    let wanted = (coverage * (modules * modules) as f64).sqrt().floor() as usize;
    let limit = modules.saturating_sub(2 * (FINDER_SIZE + 1));
    let mut edge = wanted.min(limit);
    if (modules - edge) % 2 != 0 {
        edge = edge.saturating_sub(1);
    }
    if edge == 0 {
        return None;
    }
    Some(((modules - edge) / 2, edge))
}

/// Grid geometry on the canvas
#[derive(Debug, Clone, Copy)]
struct Layout {
    modules: usize,
    cell: f64,
    origin: f64,
}

impl Layout {
    fn x(&self, column: usize) -> f64 {
        self.origin + column as f64 * self.cell
    }

    fn y(&self, row: usize) -> f64 {
        self.origin + row as f64 * self.cell
    }
}

fn draw(options: &RenderOptions) -> Result<Drawing, RenderError> {
    let code = QrCode::with_error_correction_level(
        options.data.as_bytes(),
        ec_level(options.qr_options.error_correction_level),
    )
    .map_err(|e| RenderError::Encode(e.to_string()))?;

    let modules = code.width();
    let canvas = options.width.min(options.height);
    let drawable = canvas.saturating_sub(2 * options.margin) as usize;
    let cell = drawable / modules;
    if cell == 0 {
        return Err(RenderError::CanvasTooSmall {
            modules,
            canvas,
            margin: options.margin,
        });
    }

    let layout = Layout {
        modules,
        cell: cell as f64,
        origin: ((canvas as usize - modules * cell) / 2) as f64,
    };

    let dark = code
        .to_colors()
        .into_iter()
        .map(|c| c == qrcode::Color::Dark)
        .collect::<Vec<_>>();
    let is_dark = |column: usize, row: usize| dark[row * modules + column];

    let level = options.qr_options.error_correction_level;
    let block = options
        .image
        .as_ref()
        .and_then(|_| logo_block(modules, options.image_options.image_size, level));
    let hidden = block.filter(|_| options.image_options.hide_background_dots);
    let in_logo = |column: usize, row: usize| {
        hidden.is_some_and(|(start, edge)| {
            (start..start + edge).contains(&column) && (start..start + edge).contains(&row)
        })
    };

    let frame_overlay = options.corners_square_options.is_some();
    let ball_overlay = options.corners_dot_options.is_some();

    let mut drawing = Drawing::new();
    drawing.set_attribute("width", options.width.to_string());
    drawing.set_attribute("height", options.height.to_string());
    drawing.set_attribute("viewBox", format!("0 0 {} {}", options.width, options.height));

    let background = options.background_options.color;
    if !background.is_transparent() {
        drawing.push(&format!(
            r#"<rect x="0" y="0" width="{}" height="{}" fill="{}"{}/>"#,
            options.width,
            options.height,
            background.to_hex(),
            opacity_attr("fill-opacity", background)
        ));
    }

    // Data modules
    let dots = &options.dots_options;
    let mut body = String::new();
    for row in 0..modules {
        for column in 0..modules {
            if !is_dark(column, row) || in_logo(column, row) {
                continue;
            }
            match finder_part(modules, column, row) {
                Some(FinderPart::Frame) if frame_overlay => continue,
                Some(FinderPart::Ball) if ball_overlay => continue,
                _ => {}
            }
            body.push_str(&dot_shape(dots.dot_type, layout.x(column), layout.y(row), layout.cell));
        }
    }
    push_group(&mut drawing, dots.color, &body);

    // Eye frames and balls
    for (column, row) in finder_origins(modules) {
        if let Some(frame) = &options.corners_square_options {
            let markup = frame_shape(frame.corner_type, frame.color, &layout, column, row, &is_dark);
            push_group(&mut drawing, frame.color, &markup);
        }
        if let Some(ball) = &options.corners_dot_options {
            let markup = ball_shape(ball.corner_type, &layout, column + 2, row + 2);
            push_group(&mut drawing, ball.color, &markup);
        }
    }

    if let (Some(href), Some((start, edge))) = (&options.image, block) {
        let inset = f64::from(options.image_options.margin);
        let size = edge as f64 * layout.cell - 2.0 * inset;
        if size > 0.0 {
            drawing.push(&format!(
                r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
                layout.x(start) + inset,
                layout.y(start) + inset,
                size,
                size,
                escape_xml(href)
            ));
        }
    }

    tracing::debug!(
        "Rendered {}x{} modules, cell {} units, logo block {:?}",
        layout.modules,
        layout.modules,
        layout.cell,
        hidden
    );

    Ok(drawing)
}

fn opacity_attr(name: &str, color: Color) -> String {
    if color.is_opaque() {
        String::new()
    } else {
        format!(r#" {}="{}""#, name, color.opacity())
    }
}

fn push_group(drawing: &mut Drawing, color: Color, body: &str) {
    if body.is_empty() {
        return;
    }
    drawing.push(&format!(
        r#"<g fill="{}"{}>{}</g>"#,
        color.to_hex(),
        opacity_attr("fill-opacity", color),
        body
    ));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FinderPart {
    Frame,
    Ball,
}

fn finder_origins(modules: usize) -> [(usize, usize); 3] {
    let far = modules - FINDER_SIZE;
    [(0, 0), (far, 0), (0, far)]
}

fn finder_part(modules: usize, column: usize, row: usize) -> Option<FinderPart> {
    finder_origins(modules).into_iter().find_map(|(x0, y0)| {
        let inside = (x0..x0 + FINDER_SIZE).contains(&column) && (y0..y0 + FINDER_SIZE).contains(&row);
        if !inside {
            return None;
        }
        let (dx, dy) = (column - x0, row - y0);
        if (2..5).contains(&dx) && (2..5).contains(&dy) {
            Some(FinderPart::Ball)
        } else {
            Some(FinderPart::Frame)
        }
    })
}

fn dot_shape(dot_type: DotType, x: f64, y: f64, s: f64) -> String {
    match dot_type {
        DotType::Square => format!(r#"<rect x="{x}" y="{y}" width="{s}" height="{s}"/>"#),
        DotType::Dots => format!(
            r#"<circle cx="{}" cy="{}" r="{}"/>"#,
            x + s / 2.0,
            y + s / 2.0,
            s / 2.0
        ),
        DotType::Rounded => rounded_rect(x, y, s, s / 4.0),
        DotType::ExtraRounded => rounded_rect(x, y, s, s * 0.4),
        DotType::Classy => leaf(x, y, s, s * 0.35),
        DotType::ClassyRounded => leaf(x, y, s, s * 0.5),
    }
}

fn rounded_rect(x: f64, y: f64, s: f64, r: f64) -> String {
    format!(r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" rx="{r}" ry="{r}"/>"#)
}

/// Square with the top-left and bottom-right corners rounded
fn leaf(x: f64, y: f64, s: f64, r: f64) -> String {
    format!(
        r#"<path d="M{},{} H{} V{} A{r},{r} 0 0 1 {},{} H{} V{} A{r},{r} 0 0 1 {},{} Z"/>"#,
        x + r,
        y,
        x + s,
        y + s - r,
        x + s - r,
        y + s,
        x,
        y + r,
        x + r,
        y
    )
}

fn frame_shape(
    corner_type: CornerSquareType,
    color: Color,
    layout: &Layout,
    column: usize,
    row: usize,
    is_dark: &impl Fn(usize, usize) -> bool,
) -> String {
    let s = layout.cell;
    let (x, y) = (layout.x(column), layout.y(row));
    let stroke = format!(
        r#"fill="none" stroke="{}"{} stroke-width="{s}""#,
        color.to_hex(),
        opacity_attr("stroke-opacity", color)
    );
    let ring = |rx: f64| {
        format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{rx}" ry="{rx}" {stroke}/>"#,
            x + s / 2.0,
            y + s / 2.0,
            6.0 * s,
            6.0 * s
        )
    };

    match corner_type {
        CornerSquareType::Square => ring(0.0),
        CornerSquareType::Rounded => ring(s),
        CornerSquareType::ExtraRounded => ring(2.5 * s),
        CornerSquareType::Dot => format!(
            r#"<circle cx="{}" cy="{}" r="{}" {stroke}/>"#,
            x + 3.5 * s,
            y + 3.5 * s,
            3.0 * s
        ),
        CornerSquareType::Dots | CornerSquareType::Classy | CornerSquareType::ClassyRounded => {
            let dot_type = match corner_type {
                CornerSquareType::Dots => DotType::Dots,
                CornerSquareType::Classy => DotType::Classy,
                _ => DotType::ClassyRounded,
            };
            let mut out = String::new();
            for dy in 0..FINDER_SIZE {
                for dx in 0..FINDER_SIZE {
                    let on_ring = dx == 0 || dy == 0 || dx == FINDER_SIZE - 1 || dy == FINDER_SIZE - 1;
                    if on_ring && is_dark(column + dx, row + dy) {
                        out.push_str(&dot_shape(
                            dot_type,
                            layout.x(column + dx),
                            layout.y(row + dy),
                            s,
                        ));
                    }
                }
            }
            out
        }
    }
}

fn ball_shape(corner_type: CornerDotType, layout: &Layout, column: usize, row: usize) -> String {
    let s = layout.cell;
    let (x, y) = (layout.x(column), layout.y(row));
    match corner_type {
        CornerDotType::Square => {
            format!(r#"<rect x="{x}" y="{y}" width="{}" height="{}"/>"#, 3.0 * s, 3.0 * s)
        }
        CornerDotType::Dot => format!(
            r#"<circle cx="{}" cy="{}" r="{}"/>"#,
            x + 1.5 * s,
            y + 1.5 * s,
            1.5 * s
        ),
    }
}
