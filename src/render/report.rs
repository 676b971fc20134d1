//! Plain prototype listing, one normalized declaration per line.

use crate::pipeline::Generation;
use crate::render::Renderer;
use anyhow::Result;

pub struct ReportRenderer;

impl Renderer for ReportRenderer {
    fn render(&self, generation: &Generation) -> Result<String> {
        let mut out = String::new();
        for entry in &generation.entries {
            out.push_str(&entry.signature.to_string());
            out.push('\n');
        }
        Ok(out)
    }
}
