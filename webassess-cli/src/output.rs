//! Output formatting abstraction for text vs JSON rendering
//!
//! All subcommand output flows through [`OutputWriter`], so command handlers
//! never branch on the output format themselves.

use std::io::Write;

use colored::{ColoredString, Colorize};
use serde::Serialize;
use webassess_core::types::AvailabilityRating;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes CLI payloads as text or JSON.
///
/// Payloads implement both `Serialize` (for JSON) and [`Render`] (for text).
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(&mut handle, payload)
    }

    /// Render a payload to an arbitrary writer.
    pub fn render_to<T: Render + Serialize>(
        &self,
        w: &mut dyn Write,
        payload: &T,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        Ok(())
    }
}

/// Human-readable text rendering.
pub trait Render {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

/// Availability rating with its meaning, colored by strength.
pub fn rating_label(rating: AvailabilityRating) -> ColoredString {
    let meaning = match rating {
        AvailabilityRating::NONE => "no redundancy",
        AvailabilityRating::SINGLE_ZONE => "single zone",
        AvailabilityRating::MULTI_ZONE => "multi zone",
        _ => "multi region",
    };
    let label = format!("{rating} ({meaning})");
    match rating {
        AvailabilityRating::NONE => label.red().bold(),
        AvailabilityRating::SINGLE_ZONE => label.yellow().bold(),
        _ => label.green().bold(),
    }
}
