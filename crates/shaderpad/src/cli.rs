use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "shaderpad",
    author,
    version,
    about = "Interactive fragment-shader playground"
)]
pub struct Cli {
    /// Fragment shader file to render; a bundled shader is picked at random
    /// when omitted. Press `r` in the window to reload the file.
    #[arg(value_name = "SHADER")]
    pub shader: Option<PathBuf>,

    /// Window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap (0=uncapped); omitted = render every frame.
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Image to upload as the `u_texture` channel.
    #[arg(long, value_name = "PATH")]
    pub texture: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let trimmed = value.trim();
    let (w, h) = trimmed
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width in '{trimmed}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height in '{trimmed}'"))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}
