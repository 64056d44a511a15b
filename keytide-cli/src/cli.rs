use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use keytide::{mapping::VisualPreset, Palette};

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// How strongly your typing shapes sound and animation, from 0 (not at all) to 1.
    #[arg(short, long, default_value_t = 1.0, value_parser = parse_intensity)]
    pub intensity: f32,

    /// How the animation speed reacts to your typing.
    #[arg(long, value_enum, default_value_t = Preset::Calm)]
    pub preset: Preset,

    /// The colour family of the animation.
    #[arg(short, long, value_enum, default_value_t = PaletteArg::Day)]
    pub palette: PaletteArg,

    /// A WAV file which is played in a loop instead of the noise.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Where to write the logs to. Set `RUST_LOG` to choose the level.
    ///
    /// Defaults to `keytide.log` in the temporary directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Don't play any audio.
    #[arg(short, long)]
    pub mute: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Slow typing lets the animation move a bit faster.
    Calm,

    /// Fast typing drives a fast animation.
    Desktop,
}

impl From<Preset> for VisualPreset {
    fn from(preset: Preset) -> Self {
        match preset {
            Preset::Calm => VisualPreset::Calm,
            Preset::Desktop => VisualPreset::Desktop,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteArg {
    Day,
    Night,
}

impl From<PaletteArg> for Palette {
    fn from(palette: PaletteArg) -> Self {
        match palette {
            PaletteArg::Day => Palette::Day,
            PaletteArg::Night => Palette::Night,
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

fn parse_intensity(value: &str) -> Result<f32, String> {
    let intensity: f32 = value
        .parse()
        .map_err(|_| format!("`{value}` isn't a number"))?;

    if !(0.0..=1.0).contains(&intensity) {
        return Err(format!("{intensity} isn't within [0, 1]"));
    }

    Ok(intensity)
}
