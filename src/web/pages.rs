//! HTML page rendering.
//!
//! Templates are compiled into the binary and rendered with minijinja.
//! Auto-escaping is on for `.html` template names, so user-controlled
//! values like file names come out HTML-escaped.

use minijinja::{context, Environment};

use crate::auth::Flash;
use crate::db::FileMetadata;
use crate::{FiledropError, Result};

/// Format a byte count for display.
fn format_size(bytes: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let value = bytes as f64;
    if value >= MB {
        format!("{:.1} MB", value / MB)
    } else if value >= KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{} B", bytes)
    }
}

fn template_error(e: minijinja::Error) -> FiledropError {
    FiledropError::Template(e.to_string())
}

/// Template environment with the page renderers.
pub struct Pages {
    env: Environment<'static>,
}

impl Pages {
    /// Compile the embedded templates.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template("index.html", include_str!("../../templates/index.html"))
            .map_err(template_error)?;
        env.add_template("login.html", include_str!("../../templates/login.html"))
            .map_err(template_error)?;
        Ok(Self { env })
    }

    /// Render the file listing page.
    pub fn index(&self, files: &[FileMetadata], flashes: &[Flash]) -> Result<String> {
        let rows: Vec<_> = files
            .iter()
            .map(|file| {
                context! {
                    id => file.id,
                    name => file.name,
                    uploaded_at => file.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
                    size => format_size(file.size),
                }
            })
            .collect();

        let template = self.env.get_template("index.html").map_err(template_error)?;
        template
            .render(context! { files => rows, flashes => flashes })
            .map_err(template_error)
    }

    /// Render the login page.
    pub fn login(&self, flashes: &[Flash]) -> Result<String> {
        let template = self.env.get_template("login.html").map_err(template_error)?;
        template
            .render(context! { flashes => flashes })
            .map_err(template_error)
    }
}
