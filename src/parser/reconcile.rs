//! Cross-match signature arguments with documented parameters.
//!
//! cblas.h names vector arguments `x`/`y` while the reference BLAS cards
//! document them as `DX`/`SY`/`ZX`..., with the data-type letter of the
//! routine in front. That heuristic lives in [`PrefixedMatch`] only.

use crate::model::{Argument, Family, FunctionDescription, ParamDoc, ReconciledParameter, Signature};
use tracing::debug;

pub const LAYOUT_FALLBACK: &str = "Specifies the matrix layout.";
pub const NO_DESCRIPTION: &str = "No description available.";

/// Policy for finding the documentation of one argument.
pub trait Reconciler {
    fn find<'d>(
        &self,
        function: &str,
        argument: &Argument,
        doc: &'d FunctionDescription,
    ) -> Option<&'d ParamDoc>;
}

/// Case-insensitive exact name match.
pub struct ExactMatch;

impl Reconciler for ExactMatch {
    fn find<'d>(
        &self,
        _function: &str,
        argument: &Argument,
        doc: &'d FunctionDescription,
    ) -> Option<&'d ParamDoc> {
        doc.param(&argument.name)
    }
}

/// Exact match, then the argument name prefixed with the function-name
/// letter at each offset in turn.
pub struct PrefixedMatch {
    pub offsets: &'static [usize],
}

/// `cblas_ddot` → 'd' at 6; `cblas_idamax` → 'd' at 7.
const BLAS_PREFIX_OFFSETS: &[usize] = &[6, 7];

impl Reconciler for PrefixedMatch {
    fn find<'d>(
        &self,
        function: &str,
        argument: &Argument,
        doc: &'d FunctionDescription,
    ) -> Option<&'d ParamDoc> {
        if let Some(param) = doc.param(&argument.name) {
            return Some(param);
        }
        self.offsets.iter().find_map(|&offset| {
            let letter = function.chars().nth(offset)?;
            let candidate = format!("{}{}", letter, argument.name);
            let found = doc.param(&candidate);
            if found.is_some() {
                debug!(function, argument = %argument.name, %candidate, "matched by type-letter prefix");
            }
            found
        })
    }
}

/// Reconciliation policy for a family.
pub fn reconciler_for(family: Family) -> Box<dyn Reconciler> {
    match family {
        Family::Blas => Box::new(PrefixedMatch {
            offsets: BLAS_PREFIX_OFFSETS,
        }),
        Family::Lapack => Box::new(ExactMatch),
    }
}

/// Join every argument of `signature` with its documentation.
pub fn reconcile<'a>(
    reconciler: &dyn Reconciler,
    signature: &'a Signature,
    doc: &'a FunctionDescription,
) -> Vec<ReconciledParameter<'a>> {
    signature
        .arguments
        .iter()
        .map(|argument| ReconciledParameter {
            argument,
            doc: reconciler.find(&signature.name, argument, doc),
        })
        .collect()
}

/// Description to emit for an argument that has no documentation.
pub fn fallback_description(family: Family, argument: &Argument) -> &'static str {
    if family.is_layout_argument(&argument.name) {
        LAYOUT_FALLBACK
    } else {
        NO_DESCRIPTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Direction;

    fn doc_with(names: &[&str]) -> FunctionDescription {
        FunctionDescription {
            parameters: names
                .iter()
                .map(|n| ParamDoc {
                    name: n.to_string(),
                    direction: Direction::In,
                    description: vec![format!("{} docs", n)],
                })
                .collect(),
            ..Default::default()
        }
    }

    fn arg(name: &str) -> Argument {
        Argument::new("double*", name)
    }

    #[test]
    fn exact_match_ignores_case() {
        let doc = doc_with(&["N", "LDA"]);
        let found = ExactMatch.find("LAPACKE_dpotrf", &arg("lda"), &doc).unwrap();
        assert_eq!(found.name, "LDA");
        assert!(ExactMatch.find("LAPACKE_dpotrf", &arg("x"), &doc).is_none());
    }

    #[test]
    fn prefix_at_first_offset() {
        let doc = doc_with(&["N", "DX", "INCX"]);
        let r = reconciler_for(Family::Blas);
        assert_eq!(r.find("cblas_ddot", &arg("x"), &doc).unwrap().name, "DX");
        assert_eq!(r.find("cblas_ddot", &arg("incx"), &doc).unwrap().name, "INCX");
    }

    #[test]
    fn prefix_at_second_offset() {
        let doc = doc_with(&["N", "DX"]);
        let r = reconciler_for(Family::Blas);
        assert_eq!(r.find("cblas_idamax", &arg("x"), &doc).unwrap().name, "DX");
    }

    #[test]
    fn prefix_no_match() {
        let doc = doc_with(&["N", "ZX"]);
        let r = reconciler_for(Family::Blas);
        assert!(r.find("cblas_ddot", &arg("x"), &doc).is_none());
    }

    #[test]
    fn lapack_has_no_prefix_fallback() {
        let doc = doc_with(&["DX"]);
        let r = reconciler_for(Family::Lapack);
        assert!(r.find("cblas_ddot", &arg("x"), &doc).is_none());
    }

    #[test]
    fn reconcile_keeps_argument_order() {
        let sig = Signature {
            name: "cblas_ddot".to_string(),
            return_type: "double".to_string(),
            arguments: vec![arg("n"), arg("x"), arg("incx")],
        };
        let doc = doc_with(&["INCX", "DX"]);
        let params = reconcile(reconciler_for(Family::Blas).as_ref(), &sig, &doc);
        assert_eq!(params.len(), 3);
        assert!(params[0].doc.is_none());
        assert_eq!(params[1].doc.unwrap().name, "DX");
        assert_eq!(params[2].argument.name, "incx");
    }

    #[test]
    fn fallback_texts() {
        let layout = Argument::new("int", "matrix_layout");
        assert_eq!(fallback_description(Family::Lapack, &layout), LAYOUT_FALLBACK);
        let order = Argument::new("enum CBLAS_ORDER", "Order");
        assert_eq!(fallback_description(Family::Blas, &order), LAYOUT_FALLBACK);
        assert_eq!(fallback_description(Family::Blas, &arg("x")), NO_DESCRIPTION);
    }
}
