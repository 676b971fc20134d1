//! Data model for parsed signatures and documentation — emitter-agnostic.

use serde::Serialize;
use std::fmt;

/// One of the two function namespaces handled by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// `cblas_*` from cblas.h, documented by the reference BLAS C sources.
    Blas,
    /// `LAPACKE_*` from lapacke.h, documented by the reference LAPACK Fortran sources.
    Lapack,
}

impl Family {
    /// Prefix every function name of the family starts with.
    pub fn prefix(self) -> &'static str {
        match self {
            Family::Blas => "cblas_",
            Family::Lapack => "LAPACKE_",
        }
    }

    /// Extension of the documentation source for one function.
    pub fn doc_extension(self) -> &'static str {
        match self {
            Family::Blas => "c",
            Family::Lapack => "f",
        }
    }

    /// Documentation file name for a function: prefix stripped, family extension.
    /// "LAPACKE_dgesvd" → "dgesvd.f"
    pub fn doc_file_name(self, function: &str, ext: Option<&str>) -> String {
        let stem = function.strip_prefix(self.prefix()).unwrap_or(function);
        format!("{}.{}", stem, ext.unwrap_or(self.doc_extension()))
    }

    /// Whether `name` is the conventional matrix-layout selector argument.
    pub fn is_layout_argument(self, name: &str) -> bool {
        match self {
            Family::Blas => {
                name.eq_ignore_ascii_case("order") || name.eq_ignore_ascii_case("layout")
            }
            Family::Lapack => name == "matrix_layout",
        }
    }

    /// Infer the family from a header file name ("cblas.h", "lapacke.h").
    pub fn from_header_name(file_name: &str) -> Option<Family> {
        let lower = file_name.to_ascii_lowercase();
        if lower.starts_with("cblas") {
            Some(Family::Blas)
        } else if lower.starts_with("lapacke") {
            Some(Family::Lapack)
        } else {
            None
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Blas => f.write_str("blas"),
            Family::Lapack => f.write_str("lapack"),
        }
    }
}

/// A function prototype extracted from a header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub name: String,
    pub return_type: String,
    /// Never empty.
    pub arguments: Vec<Argument>,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        f.write_str(");")
    }
}

/// One prototype parameter. `ty` carries no const qualifiers and owns any
/// pointer sigil.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Argument {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

impl Argument {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Argument {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// Documentation extracted from one reference source file.
///
/// The default value means "no documentation available".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FunctionDescription {
    pub purpose: Vec<String>,
    pub parameters: Vec<ParamDoc>,
    pub remarks: Vec<String>,
}

impl FunctionDescription {
    pub fn is_empty(&self) -> bool {
        self.purpose.is_empty() && self.parameters.is_empty() && self.remarks.is_empty()
    }

    /// Case-insensitive lookup of a documented parameter.
    pub fn param(&self, name: &str) -> Option<&ParamDoc> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// A `\param[dir] NAME` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamDoc {
    pub name: String,
    pub direction: Direction,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    /// Parse the bracketed tag text: exactly `in`, `out` or `in,out`.
    pub fn from_tag(tag: &str) -> Option<Direction> {
        match tag {
            "in" => Some(Direction::In),
            "out" => Some(Direction::Out),
            "in,out" => Some(Direction::InOut),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Direction::In => "[in]",
            Direction::Out => "[out]",
            Direction::InOut => "[in,out]",
        }
    }
}

/// A signature argument joined with its documentation, if any was found.
#[derive(Debug, Clone, Copy)]
pub struct ReconciledParameter<'a> {
    pub argument: &'a Argument,
    pub doc: Option<&'a ParamDoc>,
}

/// Reconciled and type-mapped view of one function, ready for emission.
#[derive(Debug)]
pub struct Binding<'a> {
    pub family: Family,
    pub signature: &'a Signature,
    pub description: &'a FunctionDescription,
    pub return_type: &'static str,
    pub parameters: Vec<BoundParameter<'a>>,
}

#[derive(Debug)]
pub struct BoundParameter<'a> {
    pub param: ReconciledParameter<'a>,
    pub target_type: &'static str,
}

impl BoundParameter<'_> {
    pub fn name(&self) -> &str {
        &self.param.argument.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_file_name_strips_prefix() {
        assert_eq!(Family::Lapack.doc_file_name("LAPACKE_dgesvd", None), "dgesvd.f");
        assert_eq!(Family::Blas.doc_file_name("cblas_ddot", None), "ddot.c");
        assert_eq!(Family::Blas.doc_file_name("cblas_ddot", Some("f")), "ddot.f");
    }

    #[test]
    fn family_from_header_name() {
        assert_eq!(Family::from_header_name("cblas.h"), Some(Family::Blas));
        assert_eq!(Family::from_header_name("lapacke.h"), Some(Family::Lapack));
        assert_eq!(Family::from_header_name("openblas_config.h"), None);
    }

    #[test]
    fn direction_tags() {
        assert_eq!(Direction::from_tag("in,out"), Some(Direction::InOut));
        assert_eq!(Direction::from_tag("inout"), None);
        assert_eq!(Direction::Out.tag(), "[out]");
    }

    #[test]
    fn signature_display() {
        let sig = Signature {
            name: "cblas_dscal".to_string(),
            return_type: "void".to_string(),
            arguments: vec![
                Argument::new("blasint", "N"),
                Argument::new("double", "alpha"),
                Argument::new("double*", "X"),
            ],
        };
        assert_eq!(
            sig.to_string(),
            "void cblas_dscal(blasint N, double alpha, double* X);"
        );
    }

    #[test]
    fn param_lookup_ignores_case() {
        let desc = FunctionDescription {
            parameters: vec![ParamDoc {
                name: "LDA".to_string(),
                direction: Direction::In,
                description: vec![],
            }],
            ..Default::default()
        };
        assert!(desc.param("lda").is_some());
        assert!(desc.param("ldb").is_none());
    }
}
