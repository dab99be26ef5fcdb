//! Purkinje cable parameters.
//!
//! The simulator needs three scalars for every cable of a `.pkje` file. They
//! live in a small text file, one value per line, each optionally followed by
//! a `#` comment:
//!
//! ```text
//! 75 #Relative cable size: number of parallel fibres or cross-section.
//! 100 #Gap junction resistance in kOhm.
//! 0.0006 #Fibre conductivity in Ohm per cm.
//!          #Line order matters.
//! ```
//!
//! If the file does not exist it is created with the defaults above. A line
//! that is missing or does not parse keeps its default.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.cfg";

/// Scalars written to every cable block of a `.pkje` file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PurkinjeConfig {
    /// Relative cable size (number of parallel fibres or cross-section).
    pub cable_size: u32,
    /// Gap junction resistance in kOhm.
    pub gap_resistance: f64,
    /// Longitudinal conductivity in Ohm per cm.
    pub conductivity: f64,
}

impl Default for PurkinjeConfig {
    fn default() -> Self {
        Self {
            cable_size: 75,
            gap_resistance: 100.0,
            conductivity: 0.0006,
        }
    }
}

impl PurkinjeConfig {
    /// Read the config file at `path`, creating it with defaults first if it
    /// does not exist.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("creating default config file {}", path.display());
            Self::default().save(path)?;
        }
        let text = std::fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Parse config text. Missing or malformed values keep their defaults.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        let mut values = text.lines().map(strip_comment);

        if let Some(v) = parse_value(values.next(), "cable size") {
            config.cable_size = v;
        }
        if let Some(v) = parse_value(values.next(), "gap resistance") {
            config.gap_resistance = v;
        }
        if let Some(v) = parse_value(values.next(), "conductivity") {
            config.conductivity = v;
        }
        config
    }

    /// Write this config in the commented file layout.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writeln!(
            writer,
            "{} #Relative cable size: number of parallel fibres or cross-section.",
            self.cable_size
        )?;
        writeln!(writer, "{} #Gap junction resistance in kOhm.", self.gap_resistance)?;
        writeln!(writer, "{} #Fibre conductivity in Ohm per cm.", self.conductivity)?;
        writeln!(writer, "         #Line order matters.")?;
        Ok(())
    }

    /// Write this config to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or("").trim()
}

fn parse_value<T: std::str::FromStr>(value: Option<&str>, what: &str) -> Option<T> {
    match value {
        None => {
            log::warn!("config: no {} line, using default", what);
            None
        }
        Some(v) => match v.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                log::warn!("config: cannot parse {} from '{}', using default", what, v);
                None
            }
        },
    }
}
