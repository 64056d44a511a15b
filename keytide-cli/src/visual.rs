use std::{f64::consts::TAU, time::Instant};

use keytide::{sink::VisualSink, Palette, VisualParams};
use ratatui::{
    style::Color,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context, Points},
        Block,
    },
};

// Phase advance per second at speed `1`.
const SPEED_SCALE: f64 = 6.;
const POINTS_PER_LAYER: usize = 240;
const MAX_EXTRA_LAYERS: f32 = 4.;

/// Renders layered waves onto a terminal canvas.
///
/// Keeps only the latest parameters. After [VisualSink::dispose] it draws nothing
/// until it receives parameters again.
#[derive(Debug)]
pub struct TerminalVisual {
    params: Option<VisualParams>,
    light: f32,

    phase: f64,
    last_frame: Option<Instant>,
}

impl TerminalVisual {
    /// Starts with `initial` until the first parameters arrive.
    pub fn new(initial: VisualParams) -> Self {
        Self {
            params: Some(initial),
            light: 1.,
            phase: 0.,
            last_frame: None,
        }
    }

    /// Moves the animation forward by the time since the previous frame.
    pub fn advance(&mut self, now: Instant) {
        if let (Some(params), Some(last)) = (self.params, self.last_frame) {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            self.phase = (self.phase + f64::from(params.speed) * SPEED_SCALE * elapsed).fract();
        }

        self.last_frame = Some(now);
    }

    pub fn params(&self) -> Option<&VisualParams> {
        self.params.as_ref()
    }

    pub fn widget<'a>(&self, block: Block<'a>) -> Canvas<'a, impl Fn(&mut Context)> {
        let params = self.params;
        let light = self.light;
        let phase = self.phase;

        Canvas::default()
            .block(block)
            .marker(Marker::Braille)
            .x_bounds([0., 1.])
            .y_bounds([0., 1.])
            .paint(move |ctx| {
                let Some(params) = params else {
                    return;
                };

                let layers = layer_count(params.detail);
                for layer in 0..layers {
                    let coords: Vec<(f64, f64)> = (0..POINTS_PER_LAYER)
                        .map(|i| {
                            let x = i as f64 / (POINTS_PER_LAYER - 1) as f64;
                            (x, wave(layer, layers, params.detail, phase, x))
                        })
                        .collect();

                    ctx.draw(&Points {
                        coords: &coords,
                        color: layer_color(&params, light, layer, layers),
                    });
                }
            })
    }
}

impl VisualSink for TerminalVisual {
    fn set_params(&mut self, params: &VisualParams, light: f32) {
        self.params = Some(*params);
        self.light = light.clamp(0., 1.);
    }

    fn dispose(&mut self) {
        self.params = None;
        self.last_frame = None;
    }
}

/// `2` layers without detail, up to `6` with full detail.
fn layer_count(detail: f32) -> usize {
    2 + (detail.clamp(0., 1.) * MAX_EXTRA_LAYERS).round() as usize
}

/// Height of `layer` at `x`, always within `[0, 1]`.
fn wave(layer: usize, layers: usize, detail: f32, phase: f64, x: f64) -> f64 {
    let offset = (layer as f64 + 1.) / (layers as f64 + 1.);
    let frequency = 1. + layer as f64 * (0.5 + f64::from(detail));
    let amplitude = 0.45 / layers as f64;

    let value = offset
        + amplitude * (TAU * (frequency * x + phase * (1. + 0.3 * layer as f64))).sin();

    value.clamp(0., 1.)
}

/// Deeper layers are darker. `saturation` blends between grey and the palette colour,
/// `light` dims everything.
fn layer_color(params: &VisualParams, light: f32, layer: usize, layers: usize) -> Color {
    let base: [f32; 3] = match params.palette {
        Palette::Day => [255., 176., 64.],
        Palette::Night => [96., 112., 255.],
    };

    let grey = base.iter().sum::<f32>() / 3.;
    let depth = layer as f32 / layers.max(1) as f32;
    let brightness = (0.35 + 0.65 * light) * (1. - 0.4 * depth);

    let [r, g, b] = base.map(|channel| {
        let saturated = grey + (channel - grey) * params.saturation.clamp(0., 1.);
        (saturated * brightness).round().clamp(0., 255.) as u8
    });

    Color::Rgb(r, g, b)
}
