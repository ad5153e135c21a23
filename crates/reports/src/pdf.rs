//! HTML-to-PDF conversion.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::thread;

use serde::Serialize;

use crate::error::RenderError;

/// Page and footer options passed to the converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfOptions {
    pub margin_top: String,
    pub margin_bottom: String,
    pub margin_left: String,
    pub margin_right: String,
    pub footer_font_size: u8,
    /// Company name, or empty.
    pub footer_left: String,
    pub footer_right: String,
    pub footer_line: bool,
    pub footer_spacing: u8,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self::with_margin("0.50in")
    }
}

impl PdfOptions {
    pub fn with_margin(margin: &str) -> Self {
        Self {
            margin_top: margin.to_string(),
            margin_bottom: margin.to_string(),
            margin_left: margin.to_string(),
            margin_right: margin.to_string(),
            footer_font_size: 8,
            footer_left: String::new(),
            footer_right: "[page]/[toPage]".to_string(),
            footer_line: true,
            footer_spacing: 5,
        }
    }

    pub fn footer_company(mut self, company: Option<&str>) -> Self {
        self.footer_left = company.unwrap_or_default().to_string();
        self
    }

    /// Command-line flags understood by `wkhtmltopdf`.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "--margin-bottom".to_string(),
            self.margin_bottom.clone(),
            "--margin-left".to_string(),
            self.margin_left.clone(),
            "--margin-right".to_string(),
            self.margin_right.clone(),
            "--margin-top".to_string(),
            self.margin_top.clone(),
            "--footer-font-size".to_string(),
            self.footer_font_size.to_string(),
        ];
        if !self.footer_left.is_empty() {
            args.push("--footer-left".to_string());
            args.push(self.footer_left.clone());
        }
        if self.footer_line {
            args.push("--footer-line".to_string());
        }
        args.push("--footer-right".to_string());
        args.push(self.footer_right.clone());
        args.push("--footer-spacing".to_string());
        args.push(self.footer_spacing.to_string());
        args
    }
}

/// Converts rendered report HTML into PDF bytes.
pub trait DocumentRenderer: Send + Sync {
    fn render_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError>;
}

impl<R> DocumentRenderer for Arc<R>
where
    R: DocumentRenderer + ?Sized,
{
    fn render_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        (**self).render_pdf(html, options)
    }
}

/// Runs the `wkhtmltopdf` binary, HTML on stdin and PDF on stdout.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfRenderer {
    binary: PathBuf,
}

impl WkhtmltopdfRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self { binary: binary.into() }
    }

    fn command(&self, options: &PdfOptions) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("--quiet")
            .args(options.to_args())
            .arg("-")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

impl Default for WkhtmltopdfRenderer {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl DocumentRenderer for WkhtmltopdfRenderer {
    fn render_pdf(&self, html: &str, options: &PdfOptions) -> Result<Vec<u8>, RenderError> {
        let binary = self.binary.display().to_string();
        let spawn_err = |source| RenderError::Spawn {
            binary: binary.clone(),
            source,
        };

        let mut child = self.command(options).spawn().map_err(spawn_err)?;
        let stdin = child.stdin.take();

        // stdin is fed while stdout and stderr drain; either pipe filling up
        // would otherwise block the converter before it reads all its input.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(html.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });
        let output = output.map_err(spawn_err)?;

        if !output.status.success() {
            return Err(RenderError::Converter {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        written.map_err(spawn_err)?;
        if output.stdout.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        tracing::debug!(bytes = output.stdout.len(), "pdf converted");
        Ok(output.stdout)
    }
}
