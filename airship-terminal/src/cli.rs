/// Command line options for the terminal demo
use clap::Parser;
use std::path::PathBuf;

use airship_core::{stl, text, AssetError, ConfigError, Mesh, OscillationConfig, TextSettings};

#[derive(Parser, Debug, Clone)]
#[clap(name = "airship", version, about = "Swaying airship rendered in the terminal")]
pub struct Args {
    /// Sweep amplitude in degrees on each side of centre
    #[clap(long, default_value_t = OscillationConfig::DEFAULT_MAX_ANGLE)]
    pub max_angle: f32,

    /// Slowest step near the turning points, in radians per frame
    #[clap(long, default_value_t = OscillationConfig::DEFAULT_MIN_SPEED)]
    pub min_speed: f32,

    /// Fastest step through the centre, in radians per frame
    #[clap(long, default_value_t = OscillationConfig::DEFAULT_MAX_SPEED)]
    pub max_speed: f32,

    /// Target frame rate
    #[clap(long, default_value_t = 60)]
    pub fps: u32,

    /// Word extruded into the label beside the hull
    #[clap(long, default_value = text::DEFAULT_TEXT)]
    pub text: String,

    /// TrueType font for the label text instead of the bundled one
    #[clap(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// STL mesh to use as the label instead of the text
    #[clap(long, value_name = "PATH")]
    pub label: Option<PathBuf>,
}

impl Args {
    /// The label mesh: the STL file when given, otherwise the extruded text
    pub fn label_mesh(&self) -> Result<Mesh, AssetError> {
        if let Some(path) = &self.label {
            return stl::load_label(path);
        }
        let font = match &self.font {
            Some(path) => text::load_font(path)?,
            None => text::default_font()?,
        };
        Ok(text::text_mesh(&font, &self.text, &TextSettings::default())?)
    }

    pub fn oscillation(&self) -> Result<OscillationConfig, ConfigError> {
        OscillationConfig::new(self.max_angle, self.min_speed, self.max_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let args = Args::parse_from(["airship"]);
        assert_eq!(args.oscillation().unwrap(), OscillationConfig::default());
        assert_eq!(args.fps, 60);
        assert!(args.label.is_none());
        assert!(args.font.is_none());
        assert_eq!(args.text, "kelluu");
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "airship",
            "--max-angle",
            "35",
            "--max-speed",
            "0.02",
            "--label",
            "assets/label.stl",
            "--text",
            "hei",
        ]);
        let config = args.oscillation().unwrap();
        assert_eq!(config.max_angle(), 35.0);
        assert_eq!(config.max_speed(), 0.02);
        assert_eq!(args.label, Some(PathBuf::from("assets/label.stl")));
        assert_eq!(args.text, "hei");
    }

    #[test]
    fn test_stl_label_overrides_text() {
        let plaque = concat!(env!("CARGO_MANIFEST_DIR"), "/../assets/plaque.stl");
        let args = Args::parse_from(["airship", "--label", plaque]);
        assert_eq!(args.label_mesh().unwrap().triangles.len(), 12);

        let args = Args::parse_from(["airship"]);
        assert!(args.label_mesh().unwrap().triangles.len() > 12);

        let args = Args::parse_from(["airship", "--font", plaque]);
        assert!(matches!(args.label_mesh(), Err(AssetError::Font)));
    }

    #[test]
    fn test_inverted_speeds_rejected() {
        let args = Args::parse_from(["airship", "--min-speed", "0.5", "--max-speed", "0.1"]);
        assert!(matches!(
            args.oscillation(),
            Err(ConfigError::SpeedRange { .. })
        ));
    }
}
