//! Render settings: JSON file defaults overridden by command-line flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use ember_renderer::{Background, RenderConfig, DEFAULT_BUCKET_SIZE};
use serde::{Deserialize, Serialize};

/// Demo scenes the binary knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    RandomSpheres,
    TwoSpheres,
    TwoPerlinSpheres,
    RefractiveDielectrics,
    CameraFovTest,
    SimpleLight,
    CornellBox,
    CornellSmoke,
    TriangleTest,
    Earth,
}

impl SceneKind {
    pub const ALL: [SceneKind; 10] = [
        SceneKind::RandomSpheres,
        SceneKind::TwoSpheres,
        SceneKind::TwoPerlinSpheres,
        SceneKind::RefractiveDielectrics,
        SceneKind::CameraFovTest,
        SceneKind::SimpleLight,
        SceneKind::CornellBox,
        SceneKind::CornellSmoke,
        SceneKind::TriangleTest,
        SceneKind::Earth,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::RandomSpheres => "random_spheres",
            SceneKind::TwoSpheres => "two_spheres",
            SceneKind::TwoPerlinSpheres => "two_perlin_spheres",
            SceneKind::RefractiveDielectrics => "refractive_dielectrics",
            SceneKind::CameraFovTest => "camera_fov_test",
            SceneKind::SimpleLight => "simple_light",
            SceneKind::CornellBox => "cornell_box",
            SceneKind::CornellSmoke => "cornell_smoke",
            SceneKind::TriangleTest => "triangle_test",
            SceneKind::Earth => "earth",
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow!("unknown scene '{s}', expected one of: {}", scene_names()))
    }
}

/// Comma-separated list of every scene name.
pub fn scene_names() -> String {
    SceneKind::ALL.map(SceneKind::name).join(", ")
}

/// Everything needed to produce one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub scene: SceneKind,
    pub width: u32,
    pub aspect_ratio: f32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
    pub bucket_size: u32,
    pub output: PathBuf,
    /// Texture for the `earth` scene
    pub image: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scene: SceneKind::TwoPerlinSpheres,
            width: 600,
            aspect_ratio: 16.0 / 9.0,
            samples_per_pixel: 20,
            max_depth: 20,
            seed: 0,
            bucket_size: DEFAULT_BUCKET_SIZE,
            output: PathBuf::from("output.ppm"),
            image: None,
        }
    }
}

impl RenderSettings {
    /// Read settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;

        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Replace every field the command line set.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(scene) = overrides.scene {
            self.scene = scene;
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(spp) = overrides.samples_per_pixel {
            self.samples_per_pixel = spp;
        }
        if let Some(depth) = overrides.max_depth {
            self.max_depth = depth;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(output) = &overrides.output {
            self.output = output.clone();
        }
        if let Some(image) = &overrides.image {
            self.image = Some(image.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            bail!("image width must be at least 1");
        }
        if self.samples_per_pixel == 0 {
            bail!("samples per pixel must be at least 1");
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            bail!("aspect ratio must be positive, got {}", self.aspect_ratio);
        }
        Ok(())
    }

    pub fn render_config(&self, background: Background) -> RenderConfig {
        let mut config = RenderConfig::default()
            .with_width(self.width, self.aspect_ratio)
            .with_quality(self.samples_per_pixel, self.max_depth)
            .with_background(background)
            .with_seed(self.seed);
        config.bucket_size = self.bucket_size;
        config
    }
}

/// Values given on the command line, applied on top of the settings file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub scene: Option<SceneKind>,
    pub width: Option<u32>,
    pub samples_per_pixel: Option<u32>,
    pub max_depth: Option<u32>,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
    pub image: Option<PathBuf>,
}

/// Parsed command line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliArgs {
    pub settings: Option<PathBuf>,
    pub overrides: Overrides,
    pub help: bool,
}

pub const USAGE: &str = "\
Usage: ember [OPTIONS]

Options:
  --settings <PATH>   JSON render settings file
  --scene <NAME>      demo scene to render
  --width <PIXELS>    image width
  --spp <N>           samples per pixel
  --depth <N>         maximum bounces per path
  --seed <N>          random seed
  --output <PATH>     PPM file to write
  --image <PATH>      texture for the earth scene
  -h, --help          print this message";

impl CliArgs {
    /// Parse arguments, not including the program name.
    pub fn parse<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            if flag == "-h" || flag == "--help" {
                parsed.help = true;
                continue;
            }

            let value = args
                .next()
                .with_context(|| format!("missing value for {flag}"))?;
            let overrides = &mut parsed.overrides;

            match flag.as_str() {
                "--settings" => parsed.settings = Some(PathBuf::from(value)),
                "--scene" => overrides.scene = Some(value.parse()?),
                "--width" => overrides.width = Some(parse_number(&flag, &value)?),
                "--spp" => overrides.samples_per_pixel = Some(parse_number(&flag, &value)?),
                "--depth" => overrides.max_depth = Some(parse_number(&flag, &value)?),
                "--seed" => overrides.seed = Some(parse_number(&flag, &value)?),
                "--output" => overrides.output = Some(PathBuf::from(value)),
                "--image" => overrides.image = Some(PathBuf::from(value)),
                _ => bail!("unknown option {flag}\n\n{USAGE}"),
            }
        }

        Ok(parsed)
    }

    /// Settings file (or defaults) with the command-line overrides applied.
    pub fn resolve(&self) -> Result<RenderSettings> {
        let mut settings = match &self.settings {
            Some(path) => RenderSettings::load(path)?,
            None => RenderSettings::default(),
        };
        settings.apply(&self.overrides);
        settings.validate()?;
        Ok(settings)
    }
}

fn parse_number<T>(flag: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("invalid value '{value}' for {flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scene_names_round_trip() {
        for kind in SceneKind::ALL {
            assert_eq!(kind.name().parse::<SceneKind>().expect("known name"), kind);
        }
        assert!("teapot".parse::<SceneKind>().is_err());
    }

    #[test]
    fn test_parse_flags() {
        let cli = CliArgs::parse(args(&[
            "--scene",
            "cornell_box",
            "--width",
            "320",
            "--spp",
            "64",
            "--depth",
            "8",
            "--seed",
            "42",
            "--output",
            "box.ppm",
        ]))
        .expect("valid arguments");

        assert_eq!(cli.overrides.scene, Some(SceneKind::CornellBox));
        assert_eq!(cli.overrides.width, Some(320));
        assert_eq!(cli.overrides.samples_per_pixel, Some(64));
        assert_eq!(cli.overrides.max_depth, Some(8));
        assert_eq!(cli.overrides.seed, Some(42));
        assert_eq!(cli.overrides.output, Some(PathBuf::from("box.ppm")));
        assert!(!cli.help);
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliArgs::parse(args(&["--width"])).is_err());
        assert!(CliArgs::parse(args(&["--width", "wide"])).is_err());
        assert!(CliArgs::parse(args(&["--bogus", "1"])).is_err());
        assert!(CliArgs::parse(args(&["--scene", "teapot"])).is_err());

        let help = CliArgs::parse(args(&["--help"])).expect("help needs no value");
        assert!(help.help);
    }

    #[test]
    fn test_settings_json_partial_uses_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "scene": "cornell_smoke", "width": 200 }"#)
                .expect("valid JSON");

        assert_eq!(settings.scene, SceneKind::CornellSmoke);
        assert_eq!(settings.width, 200);
        assert_eq!(settings.samples_per_pixel, RenderSettings::default().samples_per_pixel);
    }

    #[test]
    fn test_flags_override_settings_file() {
        let path = std::env::temp_dir().join("ember_settings_test.json");
        let file_settings = RenderSettings {
            scene: SceneKind::TwoSpheres,
            width: 100,
            seed: 1,
            ..RenderSettings::default()
        };
        std::fs::write(&path, serde_json::to_string_pretty(&file_settings).expect("serializable"))
            .expect("temp dir is writable");

        let cli = CliArgs::parse(args(&[
            "--settings",
            path.to_str().expect("utf-8 temp path"),
            "--seed",
            "9",
        ]))
        .expect("valid arguments");
        let settings = cli.resolve().expect("settings resolve");

        assert_eq!(settings.scene, SceneKind::TwoSpheres);
        assert_eq!(settings.width, 100);
        assert_eq!(settings.seed, 9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_settings_file_is_an_error() {
        let cli = CliArgs {
            settings: Some(PathBuf::from("/nonexistent/ember.json")),
            ..CliArgs::default()
        };
        let err = cli.resolve().expect_err("file does not exist");
        assert!(err.to_string().contains("failed to read settings file"));
    }

    #[test]
    fn test_render_config_from_settings() {
        let settings = RenderSettings {
            width: 160,
            aspect_ratio: 2.0,
            samples_per_pixel: 8,
            max_depth: 4,
            seed: 3,
            bucket_size: 16,
            ..RenderSettings::default()
        };
        let config = settings.render_config(Background::sky());

        assert_eq!((config.image_width, config.image_height), (160, 80));
        assert_eq!(config.samples_per_pixel, 8);
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.seed, 3);
        assert_eq!(config.bucket_size, 16);
        assert!(settings.validate().is_ok());

        let invalid = RenderSettings {
            samples_per_pixel: 0,
            ..settings
        };
        assert!(invalid.validate().is_err());
    }
}
