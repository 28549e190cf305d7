use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use sentinel_lighting::{Elevation, HslColor, LightUpdate};
use serde::Deserialize;

/// Contents of a showcase TOML file. Every section and key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShowcaseConfig {
    pub light: LightSection,
    pub output: OutputSection,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightSection {
    pub azimuth: Option<f64>,
    pub altitude: Option<f64>,
    pub intensity: Option<f64>,
    pub temperature: Option<f64>,
    pub color: Option<String>,
}

impl LightSection {
    /// Values set in `other` win.
    pub fn merge(self, other: LightSection) -> Self {
        Self {
            azimuth: other.azimuth.or(self.azimuth),
            altitude: other.altitude.or(self.altitude),
            intensity: other.intensity.or(self.intensity),
            temperature: other.temperature.or(self.temperature),
            color: other.color.or(self.color),
        }
    }

    pub fn to_update(&self) -> Result<LightUpdate> {
        let mut update = LightUpdate {
            azimuth: self.azimuth,
            altitude: self.altitude,
            intensity: self.intensity,
            temperature: self.temperature,
            color: None,
        };
        if let Some(color) = &self.color {
            update = update.color(
                color
                    .parse::<HslColor>()
                    .context("Invalid light color")?,
            );
        }
        Ok(update)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A stylesheet: `:root` variables plus example rules.
    #[default]
    Css,
    /// A JSON report of every computed value.
    Json,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub format: Option<OutputFormat>,
    pub element_color: Option<String>,
    pub elevation: Option<u32>,
}

impl OutputSection {
    pub fn merge(self, other: OutputSection) -> Self {
        Self {
            format: other.format.or(self.format),
            element_color: other.element_color.or(self.element_color),
            elevation: other.elevation.or(self.elevation),
        }
    }
}

/// Fully resolved run settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub light: LightUpdate,
    pub element_color: HslColor,
    pub elevations: Vec<Elevation>,
    pub format: OutputFormat,
}

/// Surface color used for the glass and element examples when none is set.
const DEFAULT_ELEMENT_COLOR: HslColor = HslColor::new(210.0, 40.0, 60.0);

impl Settings {
    /// Layers command line values over file values.
    pub fn resolve(
        config: ShowcaseConfig,
        light: LightSection,
        output: OutputSection,
    ) -> Result<Self> {
        let light = config.light.merge(light);
        let output = config.output.merge(output);

        let element_color = match &output.element_color {
            Some(color) => color
                .parse::<HslColor>()
                .context("Invalid element color")?,
            None => DEFAULT_ELEMENT_COLOR,
        };
        let elevations = match output.elevation {
            Some(level) => {
                let elevation = Elevation::try_from(level).context("Invalid elevation")?;
                if elevation == Elevation::Level0 {
                    bail!("Invalid elevation: level 0 casts no shadow, expected 1, 2, 4, 8, 16 or 32");
                }
                vec![elevation]
            }
            None => Elevation::RAISED.to_vec(),
        };

        Ok(Self {
            light: light.to_update()?,
            element_color,
            elevations,
            format: output.format.unwrap_or_default(),
        })
    }
}

pub fn load(path: &Path) -> Result<ShowcaseConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse(contents: &str) -> Result<ShowcaseConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[light]
azimuth = 120.0
altitude = 50.0
color = "hsl(210, 30%, 95%)"

[output]
format = "json"
element_color = "hsl(200, 60%, 50%)"
"#;

    #[test]
    fn parses_full_file() {
        let config = parse(SAMPLE).unwrap();
        assert_eq!(config.light.azimuth, Some(120.0));
        assert_eq!(config.light.intensity, None);
        assert_eq!(config.output.format, Some(OutputFormat::Json));

        let settings =
            Settings::resolve(config, LightSection::default(), OutputSection::default()).unwrap();
        assert_eq!(settings.light.azimuth, Some(120.0));
        assert_eq!(settings.light.color, Some(HslColor::new(210.0, 30.0, 95.0)));
        assert_eq!(settings.element_color, HslColor::new(200.0, 60.0, 50.0));
        assert_eq!(settings.elevations, Elevation::RAISED.to_vec());
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::resolve(
            parse("").unwrap(),
            LightSection::default(),
            OutputSection::default(),
        )
        .unwrap();
        assert!(settings.light.is_empty());
        assert_eq!(settings.element_color, DEFAULT_ELEMENT_COLOR);
        assert_eq!(settings.format, OutputFormat::Css);
    }

    #[test]
    fn command_line_overrides_file() {
        let overrides = LightSection {
            azimuth: Some(0.0),
            ..LightSection::default()
        };
        let output = OutputSection {
            elevation: Some(8),
            ..OutputSection::default()
        };
        let settings = Settings::resolve(parse(SAMPLE).unwrap(), overrides, output).unwrap();
        assert_eq!(settings.light.azimuth, Some(0.0));
        assert_eq!(settings.light.altitude, Some(50.0));
        assert_eq!(settings.elevations, vec![Elevation::Level8]);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(parse("[light]\nbrightness = 1.0\n").is_err());

        let bad_color = LightSection {
            color: Some("bright".to_string()),
            ..LightSection::default()
        };
        assert!(
            Settings::resolve(ShowcaseConfig::default(), bad_color, OutputSection::default())
                .is_err()
        );

        let bad_level = OutputSection {
            elevation: Some(3),
            ..OutputSection::default()
        };
        let error =
            Settings::resolve(ShowcaseConfig::default(), LightSection::default(), bad_level)
                .unwrap_err();
        assert!(format!("{error:#}").contains("3 is not a canonical elevation level"));
    }

    #[test]
    fn rejects_flat_elevation() {
        let flat = OutputSection {
            elevation: Some(0),
            ..OutputSection::default()
        };
        let error = Settings::resolve(ShowcaseConfig::default(), LightSection::default(), flat)
            .unwrap_err();
        assert!(error.to_string().contains("level 0 casts no shadow"));

        let from_file = parse("[output]\nelevation = 0\n").unwrap();
        assert!(
            Settings::resolve(from_file, LightSection::default(), OutputSection::default())
                .is_err()
        );
    }
}
