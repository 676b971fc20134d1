//! Documentation coverage check.
//!
//! Lists every function whose arguments are not all documented. A function
//! missing only its layout selector passes, since that argument never has a
//! card entry.

use crate::parser::reconcile;
use crate::pipeline::{DocStatus, Generation};
use crate::render::Renderer;
use anyhow::Result;

pub struct CheckRenderer;

impl Renderer for CheckRenderer {
    fn render(&self, generation: &Generation) -> Result<String> {
        let family = generation.family;
        let reconciler = reconcile::reconciler_for(family);
        let mut out = String::new();

        for entry in &generation.entries {
            if let DocStatus::Missing(ref reason) = entry.status {
                out.push_str(&format!("{} -> {}\n\n", entry.signature.name, reason));
                continue;
            }

            let params =
                reconcile::reconcile(reconciler.as_ref(), &entry.signature, &entry.description);
            let missing: Vec<&str> = params
                .iter()
                .filter(|p| p.doc.is_none())
                .map(|p| p.argument.name.as_str())
                .collect();
            let covered = missing.is_empty()
                || (missing.len() == 1 && family.is_layout_argument(missing[0]));
            if covered {
                continue;
            }

            out.push_str(&entry.signature.name);
            out.push('\n');
            for param in &params {
                let state = if param.doc.is_some() { "OK" } else { "Not found!" };
                out.push_str(&format!("    {}: {}\n", param.argument.name, state));
            }
            out.push('\n');
        }

        Ok(out)
    }
}
