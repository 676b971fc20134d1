//! Renderer module — trait-based format dispatch.

pub mod check;
pub mod json;
pub mod report;
pub mod rust;

use crate::pipeline::Generation;
use anyhow::{anyhow, Result};

/// Trait for rendering a generation run into a specific output format.
pub trait Renderer {
    fn render(&self, generation: &Generation) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "report" => Ok(Box::new(report::ReportRenderer)),
        "check" => Ok(Box::new(check::CheckRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        "rust" | "rs" => Ok(Box::new(rust::RustRenderer)),
        _ => Err(anyhow!(
            "unknown format: {}. Use report, check, json, or rust",
            format
        )),
    }
}
