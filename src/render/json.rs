//! JSON renderer — structured output for tooling integration.
//!
//! One record per function: the parsed prototype, the mapped binding types,
//! and whatever documentation was joined to each argument.

use crate::model::{Family, ParamDoc};
use crate::pipeline::Generation;
use crate::render::Renderer;
use anyhow::Result;
use serde::Serialize;

pub struct JsonRenderer;

#[derive(Serialize)]
struct JsonGeneration<'a> {
    family: Family,
    header: String,
    functions: Vec<JsonFunction<'a>>,
}

#[derive(Serialize)]
struct JsonFunction<'a> {
    name: &'a str,
    return_type: &'a str,
    return_binding: &'static str,
    status: String,
    purpose: &'a [String],
    arguments: Vec<JsonArgument<'a>>,
    remarks: &'a [String],
}

#[derive(Serialize)]
struct JsonArgument<'a> {
    name: &'a str,
    #[serde(rename = "type")]
    ty: &'a str,
    binding: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    doc: Option<&'a ParamDoc>,
}

impl Renderer for JsonRenderer {
    fn render(&self, generation: &Generation) -> Result<String> {
        let bindings = generation.bindings()?;
        let functions = generation
            .entries
            .iter()
            .zip(&bindings)
            .map(|(entry, binding)| JsonFunction {
                name: &entry.signature.name,
                return_type: &entry.signature.return_type,
                return_binding: binding.return_type,
                status: entry.status.to_string(),
                purpose: &entry.description.purpose,
                arguments: binding
                    .parameters
                    .iter()
                    .map(|p| JsonArgument {
                        name: &p.param.argument.name,
                        ty: &p.param.argument.ty,
                        binding: p.target_type,
                        doc: p.param.doc,
                    })
                    .collect(),
                remarks: &entry.description.remarks,
            })
            .collect();

        let out = JsonGeneration {
            family: generation.family,
            header: generation.header.display().to_string(),
            functions,
        };
        let mut json = serde_json::to_string_pretty(&out)?;
        json.push('\n');
        Ok(json)
    }
}
