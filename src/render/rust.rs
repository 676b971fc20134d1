//! Rust FFI binding emitter.
//!
//! Renders one `extern "C"` block with a doc comment per function. The
//! numeric and enum types it names (`Complex64`, `MatrixLayout`,
//! `Transpose`, ...) are expected from the parent module.

use crate::model::{Binding, BoundParameter, FunctionDescription};
use crate::parser::reconcile::{fallback_description, NO_DESCRIPTION};
use crate::pipeline::Generation;
use crate::render::Renderer;
use anyhow::Result;

pub struct RustRenderer;

/// Words that cannot name a parameter without `r#`.
const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do", "dyn",
    "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static",
    "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual",
    "where", "while", "yield",
];

/// Keywords that are not valid raw identifiers either.
const RESERVED: &[&str] = &["crate", "self", "Self", "super"];

/// Documented parameter whose text becomes the `# Returns` section.
const RETURN_PARAM: &str = "info";

impl Renderer for RustRenderer {
    fn render(&self, generation: &Generation) -> Result<String> {
        let bindings = generation.bindings()?;
        let source = generation
            .header
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| generation.header.display().to_string());

        let mut out = String::new();
        out.push_str(&format!("// Generated by blasgen from {}. Do not edit.\n\n", source));
        out.push_str("#![allow(non_snake_case, unused_imports, clippy::too_many_arguments)]\n\n");
        out.push_str("use std::os::raw::{c_char, c_void};\n\n");
        out.push_str("use super::*;\n\n");
        out.push_str("extern \"C\" {\n");
        for (i, binding) in bindings.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            render_function(&mut out, binding);
        }
        out.push_str("}\n");
        Ok(out)
    }
}

fn render_function(out: &mut String, binding: &Binding<'_>) {
    let desc = binding.description;
    let mut doc: Vec<String> = Vec::new();

    // Summary
    if desc.purpose.is_empty() {
        doc.push(NO_DESCRIPTION.to_string());
    } else {
        doc.extend(dedent(&desc.purpose).iter().map(|l| escape(l)));
    }

    // Arguments
    doc.push(String::new());
    doc.push("# Arguments".to_string());
    doc.push(String::new());
    for param in &binding.parameters {
        render_parameter(&mut doc, binding, param);
    }

    // Returns
    if let Some(info) = desc.param(RETURN_PARAM) {
        let lines: Vec<&String> = info.description.iter().skip(1).collect();
        if !lines.is_empty() {
            doc.push(String::new());
            doc.push("# Returns".to_string());
            doc.push(String::new());
            doc.extend(lines.into_iter().map(|l| escape(l)));
        }
    }

    // Remarks
    if !desc.remarks.is_empty() {
        render_remarks(&mut doc, desc);
    }

    for line in &doc {
        if line.is_empty() {
            out.push_str("    ///\n");
        } else {
            out.push_str(&format!("    /// {}\n", line));
        }
    }

    let signature = binding.signature;
    out.push_str(&format!("    pub fn {}(\n", signature.name));
    for param in &binding.parameters {
        out.push_str(&format!(
            "        {}: {},\n",
            identifier(param.name()),
            param.target_type
        ));
    }
    if binding.return_type == "()" {
        out.push_str("    );\n");
    } else {
        out.push_str(&format!("    ) -> {};\n", binding.return_type));
    }
}

/// `* `name` - [dir] First line.` followed by indented continuation lines.
fn render_parameter(doc: &mut Vec<String>, binding: &Binding<'_>, param: &BoundParameter<'_>) {
    let name = param.name();
    let Some(param_doc) = param.param.doc else {
        let fallback = fallback_description(binding.family, param.param.argument);
        doc.push(format!("* `{}` - {}", name, fallback));
        return;
    };

    let mut lines = param_doc.description.iter();
    let tag = escape(param_doc.direction.tag());
    match lines.next() {
        Some(first) if !first.is_empty() => {
            doc.push(format!("* `{}` - {} {}", name, tag, escape(&with_period(first))))
        }
        _ => doc.push(format!("* `{}` - {}", name, tag)),
    }
    for line in lines {
        if line.is_empty() {
            doc.push(String::new());
        } else {
            doc.push(format!("  {}", escape(line)));
        }
    }
}

/// Further details keep their layout inside a text fence.
fn render_remarks(doc: &mut Vec<String>, desc: &FunctionDescription) {
    doc.push(String::new());
    doc.push("# Remarks".to_string());
    doc.push(String::new());
    doc.push("```text".to_string());
    doc.extend(dedent(&desc.remarks));
    doc.push("```".to_string());
}

fn with_period(line: &str) -> String {
    if line.is_empty() || line.ends_with('.') {
        line.to_string()
    } else {
        format!("{}.", line)
    }
}

/// Remove the indentation shared by every non-blank line. Counted in
/// chars, since cards may indent with non-ASCII whitespace.
fn dedent(lines: &[String]) -> Vec<String> {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                String::new()
            } else {
                l.chars().skip(indent).collect::<String>().trim_end().to_string()
            }
        })
        .collect()
}

/// Escape characters rustdoc would read as markdown or links.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '[' | ']' | '*' | '_' | '`' | '<' | '>') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn identifier(name: &str) -> String {
    if RESERVED.contains(&name) {
        format!("{}_", name)
    } else if KEYWORDS.contains(&name) {
        format!("r#{}", name)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;
    use crate::pipeline::{DocStatus, Entry};
    use std::path::PathBuf;

    fn param(name: &str, direction: Direction, lines: &[&str]) -> ParamDoc {
        ParamDoc {
            name: name.to_string(),
            direction,
            description: lines.iter().map(|l| l.to_string()).collect(),
        }
    }

    fn dpotrf() -> Generation {
        Generation {
            family: Family::Lapack,
            header: PathBuf::from("/usr/include/lapacke.h"),
            entries: vec![Entry {
                signature: Signature {
                    name: "LAPACKE_dpotrf".to_string(),
                    return_type: "lapack_int".to_string(),
                    arguments: vec![
                        Argument::new("int", "matrix_layout"),
                        Argument::new("char", "uplo"),
                        Argument::new("lapack_int", "n"),
                        Argument::new("double*", "a"),
                        Argument::new("lapack_int", "lda"),
                    ],
                },
                description: FunctionDescription {
                    purpose: vec![" DPOTRF computes the Cholesky factorization".to_string()],
                    parameters: vec![
                        param("UPLO", Direction::In, &["UPLO is CHARACTER*1", "= 'U':  Upper triangle of A is stored;"]),
                        param("A", Direction::InOut, &["A is DOUBLE PRECISION array."]),
                        param("INFO", Direction::Out, &["INFO is INTEGER", "= 0:  successful exit"]),
                    ],
                    remarks: vec![],
                },
                status: DocStatus::Ok,
            }],
        }
    }

    #[test]
    fn renders_extern_block() {
        let out = RustRenderer.render(&dpotrf()).unwrap();
        assert!(out.starts_with("// Generated by blasgen from lapacke.h. Do not edit.\n"));
        assert!(out.contains("extern \"C\" {\n"));
        assert!(out.contains("    /// DPOTRF computes the Cholesky factorization\n"));
        assert!(out.contains("    /// * `matrix_layout` - Specifies the matrix layout.\n"));
        assert!(out.contains("    /// * `uplo` - \\[in\\] UPLO is CHARACTER\\*1.\n"));
        assert!(out.contains("    ///   = 'U':  Upper triangle of A is stored;\n"));
        assert!(out.contains("    /// * `a` - \\[in,out\\] A is DOUBLE PRECISION array.\n"));
        assert!(out.contains("    /// * `n` - No description available.\n"));
        assert!(out.contains("    /// # Returns\n    ///\n    /// = 0:  successful exit\n"));
        assert!(out.contains("    pub fn LAPACKE_dpotrf(\n        matrix_layout: MatrixLayout,\n"));
        assert!(out.contains("        a: *mut f64,\n        lda: i32,\n    ) -> LapackInfo;\n"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn void_return_has_no_arrow() {
        let generation = Generation {
            family: Family::Blas,
            header: PathBuf::from("cblas.h"),
            entries: vec![Entry {
                signature: Signature {
                    name: "cblas_dscal".to_string(),
                    return_type: "void".to_string(),
                    arguments: vec![Argument::new("blasint", "N"), Argument::new("double*", "X")],
                },
                description: FunctionDescription::default(),
                status: DocStatus::Missing("file not found: dscal.c".to_string()),
            }],
        };
        let out = RustRenderer.render(&generation).unwrap();
        assert!(out.contains("    /// No description available.\n"));
        assert!(out.contains("        X: *mut f64,\n    );\n"));
    }

    fn with_description(description: FunctionDescription) -> Generation {
        let mut generation = dpotrf();
        generation.entries[0].description = description;
        generation
    }

    #[test]
    fn remarks_are_fenced_and_dedented() {
        let generation = with_description(FunctionDescription {
            purpose: vec!["DPOTRF computes the Cholesky factorization".to_string()],
            parameters: vec![param("INFO", Direction::Out, &["INFO is INTEGER", "= 0:  successful exit"])],
            remarks: vec![
                "    A = U**T * U".to_string(),
                String::new(),
                "      where U is upper triangular".to_string(),
            ],
        });
        let out = RustRenderer.render(&generation).unwrap();
        assert!(out.contains(
            "    /// = 0:  successful exit\n\
             \x20   ///\n\
             \x20   /// # Remarks\n\
             \x20   ///\n\
             \x20   /// ```text\n\
             \x20   /// A = U**T * U\n\
             \x20   ///\n\
             \x20   ///   where U is upper triangular\n\
             \x20   /// ```\n\
             \x20   pub fn LAPACKE_dpotrf(\n"
        ));
    }

    #[test]
    fn purpose_keeps_relative_indent() {
        let generation = with_description(FunctionDescription {
            purpose: vec![
                "   DPOTRF computes".to_string(),
                "      A = U**T * U".to_string(),
            ],
            ..Default::default()
        });
        let out = RustRenderer.render(&generation).unwrap();
        assert!(out.contains("    /// DPOTRF computes\n    ///    A = U\\*\\*T \\* U\n"));
    }

    #[test]
    fn unicode_indent_does_not_panic() {
        let card = "*> \\par Purpose:\n*> \\verbatim\n*>\n*>  a\n*> \u{2003}b\n*> \\endverbatim\n";
        let description = crate::parser::doc::parse(card).unwrap();
        let out = RustRenderer.render(&with_description(description)).unwrap();
        assert!(out.contains("    /// a\n    /// b\n"));
    }

    #[test]
    fn empty_first_line_gets_no_period() {
        let generation = with_description(FunctionDescription {
            purpose: vec!["DPOTRF".to_string()],
            parameters: vec![param("UPLO", Direction::In, &["", "UPLO is CHARACTER*1"])],
            remarks: vec![],
        });
        let out = RustRenderer.render(&generation).unwrap();
        assert!(out.contains("    /// * `uplo` - \\[in\\]\n"));
        assert!(!out.contains("\\[in\\] .\n"));
        assert!(out.contains("    ///   UPLO is CHARACTER\\*1\n"));
        assert_eq!(with_period(""), "");
    }

    #[test]
    fn keywords_become_raw_identifiers() {
        assert_eq!(identifier("type"), "r#type");
        assert_eq!(identifier("self"), "self_");
        assert_eq!(identifier("lda"), "lda");
    }

    #[test]
    fn dedent_keeps_relative_indent() {
        let lines: Vec<String> = ["    A = U * S", "", "      where"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dedent(&lines), vec!["A = U * S", "", "  where"]);

        let mixed: Vec<String> = ["  a", "\u{2003}\u{2003}b"].iter().map(|s| s.to_string()).collect();
        assert_eq!(dedent(&mixed), vec!["a", "b"]);
    }
}
