//! Prototype parser for cblas.h and lapacke.h.
//!
//! Declarations may wrap across lines; lines are buffered from a
//! family-specific start line until one ends with `;`, then joined by plain
//! concatenation and picked apart with three independent patterns.

use crate::error::{Error, Result};
use crate::model::{Argument, Family, Signature};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

// -- Regex patterns -----------------------------------------------------------

static RE_BLAS_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+\s+cblas_\w+\s*\(").unwrap());

static RE_FUNCTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z_]\w*)\s*\(").unwrap());

static RE_ARGUMENTS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\((.*)\)").unwrap());

static RE_RETURN_TYPE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+").unwrap());

// -- Grammar constants --------------------------------------------------------

const LAPACK_START: &str = "lapack_int LAPACKE_";

/// cblas.h prototypes of interest sit between these two lines.
const BLAS_REGION_START: &str = "typedef CBLAS_ORDER CBLAS_LAYOUT;";
const BLAS_REGION_END: &str = "/*** BFLOAT16 and INT8 extensions ***/";
const BLAS_BANNER: &str = "/***";

/// Trimmed-line concatenation glues `float` onto `*b` in one cblas.h prototype.
const JOIN_ARTIFACT: &str = "float*b";
const JOIN_REPAIR: &str = "float *b";

const QUALIFIERS: &[&str] = &["const", "OPENBLAS_CONST"];
const VARIADIC: &str = "...";

/// LAPACKE variants that need hand-written bindings.
const WORK_SUFFIX: &str = "_work";
const CALLBACK_MARKER: &str = "SELECT";

// -- Public API ---------------------------------------------------------------

/// Parse every supported prototype of `family` in header order.
///
/// Variadic functions, `_work` variants and functions taking a `SELECT`
/// callback are dropped without error. A malformed declaration aborts the
/// whole header.
pub fn parse(family: Family, input: &str) -> Result<Vec<Signature>> {
    let mut functions = Vec::new();
    let mut seen = HashSet::new();
    let mut buffer: Vec<&str> = Vec::new();

    for line in declaration_lines(family, input) {
        if buffer.is_empty() && !starts_declaration(family, line) {
            continue;
        }
        buffer.push(line);

        if line.trim_end().ends_with(';') {
            let signature = parse_declaration(&buffer)?;
            buffer.clear();

            if !is_supported(family, &signature) {
                debug!(function = %signature.name, "skipping unsupported declaration");
                continue;
            }
            if !seen.insert(signature.name.clone()) {
                debug!(function = %signature.name, "skipping duplicate declaration");
                continue;
            }
            functions.push(signature);
        }
    }

    if !buffer.is_empty() {
        return Err(Error::UnterminatedDeclaration {
            text: buffer.concat(),
        });
    }

    Ok(functions)
}

/// Parse one logical declaration from its (possibly wrapped) lines.
pub fn parse_declaration(lines: &[&str]) -> Result<Signature> {
    let joined = lines.concat().replace(JOIN_ARTIFACT, JOIN_REPAIR);
    let data = joined.trim();

    if !data.ends_with(';') {
        return Err(Error::UnterminatedDeclaration {
            text: data.to_string(),
        });
    }

    let name = RE_FUNCTION_NAME
        .captures(data)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| malformed("function name", data))?;
    let raw_arguments = RE_ARGUMENTS
        .captures(data)
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| malformed("argument list", data))?;
    let return_type = RE_RETURN_TYPE
        .find(data)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| malformed("return type", data))?;

    let arguments = raw_arguments
        .split(',')
        .map(|raw| parse_argument(raw.trim(), &name))
        .collect::<Result<Vec<_>>>()?;

    Ok(Signature {
        name,
        return_type,
        arguments,
    })
}

// -- Helpers ------------------------------------------------------------------

/// Lines of the header that may hold prototypes, prepared for buffering.
fn declaration_lines(family: Family, input: &str) -> Vec<&str> {
    match family {
        Family::Blas => {
            let has_region = input.lines().any(|l| l.trim() == BLAS_REGION_START);
            input
                .lines()
                .map(str::trim)
                .skip_while(|l| has_region && *l != BLAS_REGION_START)
                .take_while(|l| *l != BLAS_REGION_END)
                .filter(|l| !l.starts_with(BLAS_BANNER))
                .collect()
        }
        Family::Lapack => input.lines().collect(),
    }
}

fn starts_declaration(family: Family, line: &str) -> bool {
    match family {
        Family::Blas => RE_BLAS_START.is_match(line),
        Family::Lapack => line.starts_with(LAPACK_START),
    }
}

/// Split `const double *x` into `{ty: "double*", name: "x"}`.
fn parse_argument(raw: &str, function: &str) -> Result<Argument> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    let Some((last, type_tokens)) = tokens.split_last() else {
        return Err(Error::EmptyArgument {
            function: function.to_string(),
        });
    };

    let name = last.trim_start_matches('*');
    let stars = last.len() - name.len();
    if name.is_empty() {
        return Err(malformed("argument name", raw));
    }

    let mut ty = type_tokens
        .iter()
        .filter(|t| !QUALIFIERS.contains(t))
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    ty.push_str(&"*".repeat(stars));

    Ok(Argument::new(ty.replace(" *", "*"), name))
}

fn is_supported(family: Family, signature: &Signature) -> bool {
    if signature.arguments.iter().any(|arg| arg.name == VARIADIC) {
        return false;
    }
    match family {
        Family::Blas => true,
        Family::Lapack => {
            !signature.name.ends_with(WORK_SUFFIX)
                && !signature
                    .arguments
                    .iter()
                    .any(|arg| arg.ty.contains(CALLBACK_MARKER))
        }
    }
}

fn malformed(part: &'static str, text: &str) -> Error {
    Error::MalformedDeclaration {
        part,
        text: text.to_string(),
    }
}
