//! C type token → Rust FFI type token.
//!
//! One closed table per family. Keys are the normalized tokens the header
//! parser produces (no const qualifiers, `*` glued to the type). A token
//! outside the table is an error, never a guess.

use crate::error::{Error, Result};
use crate::model::Family;

/// lapacke.h argument vocabulary: pointers, logicals and characters.
const LAPACK_ARGUMENTS: &[(&str, &str)] = &[
    ("int", "i32"),
    ("lapack_int", "i32"),
    ("lapack_int*", "*mut i32"),
    ("lapack_logical", "i32"),
    ("lapack_logical*", "*mut i32"),
    ("float", "f32"),
    ("float*", "*mut f32"),
    ("double", "f64"),
    ("double*", "*mut f64"),
    ("lapack_complex_float", "Complex32"),
    ("lapack_complex_float*", "*mut Complex32"),
    ("lapack_complex_double", "Complex64"),
    ("lapack_complex_double*", "*mut Complex64"),
    ("char", "c_char"),
    ("char*", "*mut c_char"),
];

const LAPACK_RETURNS: &[(&str, &str)] = &[("lapack_int", "LapackInfo")];

/// cblas.h argument vocabulary: enums, scalars and untyped complex pointers.
const BLAS_ARGUMENTS: &[(&str, &str)] = &[
    ("enum CBLAS_ORDER", "Layout"),
    ("CBLAS_ORDER", "Layout"),
    ("CBLAS_LAYOUT", "Layout"),
    ("enum CBLAS_TRANSPOSE", "Transpose"),
    ("CBLAS_TRANSPOSE", "Transpose"),
    ("enum CBLAS_UPLO", "Uplo"),
    ("CBLAS_UPLO", "Uplo"),
    ("enum CBLAS_DIAG", "Diag"),
    ("CBLAS_DIAG", "Diag"),
    ("enum CBLAS_SIDE", "Side"),
    ("CBLAS_SIDE", "Side"),
    ("blasint", "i32"),
    ("blasint*", "*mut i32"),
    ("int", "i32"),
    ("int*", "*mut i32"),
    ("float", "f32"),
    ("float*", "*mut f32"),
    ("double", "f64"),
    ("double*", "*mut f64"),
    ("void*", "*mut c_void"),
    ("openblas_complex_float", "Complex32"),
    ("openblas_complex_float*", "*mut Complex32"),
    ("openblas_complex_double", "Complex64"),
    ("openblas_complex_double*", "*mut Complex64"),
];

const BLAS_RETURNS: &[(&str, &str)] = &[
    ("void", "()"),
    ("float", "f32"),
    ("double", "f64"),
    ("openblas_complex_float", "Complex32"),
    ("openblas_complex_double", "Complex64"),
    ("CBLAS_INDEX", "usize"),
    ("size_t", "usize"),
];

/// Layout selector of LAPACKE, declared as a plain `int`.
const LAPACK_LAYOUT: (&str, &str) = ("matrix_layout", "MatrixLayout");

/// Binding type of an argument.
pub fn map_argument(family: Family, ty: &str, name: &str) -> Result<&'static str> {
    if family == Family::Lapack && ty == "int" && name == LAPACK_LAYOUT.0 {
        return Ok(LAPACK_LAYOUT.1);
    }
    let table = match family {
        Family::Blas => BLAS_ARGUMENTS,
        Family::Lapack => LAPACK_ARGUMENTS,
    };
    lookup(table, ty).ok_or_else(|| Error::UnknownType {
        ty: ty.to_string(),
        name: name.to_string(),
    })
}

/// Binding type of a function's return value.
pub fn map_return(family: Family, ty: &str, function: &str) -> Result<&'static str> {
    let table = match family {
        Family::Blas => BLAS_RETURNS,
        Family::Lapack => LAPACK_RETURNS,
    };
    lookup(table, ty).ok_or_else(|| Error::UnknownType {
        ty: ty.to_string(),
        name: format!("return value of {}", function),
    })
}

fn lookup(table: &[(&str, &'static str)], ty: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(source, _)| *source == ty)
        .map(|(_, target)| *target)
}
