//! Comment-card dialects understood by the documentation parser.
//!
//! The reference LAPACK Fortran sources carry doxygen cards as `*> ` lines;
//! the f2c-translated C sources wrap every card line in `/* > ... */`. Both
//! feed the same state machine in [`super::doc`]; only line decoding and
//! marker recognition differ.

use crate::error::{Error, Result};
use std::ops::Range;

/// Documentation sections the parser tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Purpose,
    Arguments,
    FurtherDetails,
}

pub trait DocCommentDialect {
    fn name(&self) -> &'static str;

    /// Line indices that belong to the documentation block.
    fn region(&self, lines: &[&str]) -> Range<usize> {
        0..lines.len()
    }

    /// Remove the comment column from a raw source line.
    fn strip(&self, raw: &str, line_no: usize) -> Result<String>;

    /// Section started by this (stripped) line, if any.
    fn section(&self, line: &str) -> Option<Section>;

    fn is_verbatim_open(&self, line: &str) -> bool;

    fn is_verbatim_close(&self, line: &str) -> bool;

    fn is_param_tag(&self, line: &str) -> bool;

    /// Whether a file without purpose text counts as a failure.
    fn requires_purpose(&self) -> bool;
}

static FORTRAN_CARD: FortranCard = FortranCard;
static C_CARD: CCard = CCard;

/// Pick the dialect from the section-header literal present in the file.
pub fn detect(content: &str) -> &'static dyn DocCommentDialect {
    if content.lines().any(|l| l.trim_end() == C_PURPOSE_LINE) {
        &C_CARD
    } else {
        &FORTRAN_CARD
    }
}

// -- Fortran `*>` cards -------------------------------------------------------

/// Width of the `*> ` comment column.
const FORTRAN_COLUMN: usize = 3;

/// Lenient dialect: substring markers, fixed-column strip, empty purpose allowed.
pub struct FortranCard;

impl DocCommentDialect for FortranCard {
    fn name(&self) -> &'static str {
        "fortran"
    }

    fn strip(&self, raw: &str, _line_no: usize) -> Result<String> {
        Ok(match raw.char_indices().nth(FORTRAN_COLUMN) {
            Some((start, _)) => raw[start..].to_string(),
            None => String::new(),
        })
    }

    fn section(&self, line: &str) -> Option<Section> {
        if line.contains("Purpose:") {
            Some(Section::Purpose)
        } else if line.contains("Arguments:") {
            Some(Section::Arguments)
        } else if line.contains("Further Details:") {
            Some(Section::FurtherDetails)
        } else {
            None
        }
    }

    fn is_verbatim_open(&self, line: &str) -> bool {
        line.contains(r"\verbatim")
    }

    fn is_verbatim_close(&self, line: &str) -> bool {
        line.contains(r"\endverbatim")
    }

    fn is_param_tag(&self, line: &str) -> bool {
        line.contains(r"\param[")
    }

    fn requires_purpose(&self) -> bool {
        false
    }
}

// -- f2c `/* > */` cards ------------------------------------------------------

const C_PURPOSE_LINE: &str = r"/* > \par Purpose: */";
const C_DOC_OPEN: &str = "/* > ";
const C_DOC_EMPTY: &str = "/* > */";
const C_COMMENT_OPEN: &str = "/*";
const C_COMMENT_CLOSE: &str = "*/";

/// One decoded line of an f2c comment card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLine<'a> {
    Blank,
    /// `/* > */`
    EmptyDoc,
    /// `/* > text */`, text kept as-is
    Doc(&'a str),
    /// `/*  text */`, e.g. section underlines and the `Arguments:` heading
    Comment(&'a str),
}

impl<'a> CardLine<'a> {
    pub fn text(self) -> &'a str {
        match self {
            CardLine::Blank | CardLine::EmptyDoc => "",
            CardLine::Doc(text) | CardLine::Comment(text) => text,
        }
    }
}

/// Decode one line of an f2c documentation block. Anything other than the
/// four known shapes is an error.
pub fn decode_line(raw: &str, line_no: usize) -> Result<CardLine<'_>> {
    let line = raw.trim_end();
    if line.is_empty() {
        return Ok(CardLine::Blank);
    }
    if line == C_DOC_EMPTY {
        return Ok(CardLine::EmptyDoc);
    }
    if let Some(text) = line
        .strip_prefix(C_DOC_OPEN)
        .and_then(|rest| rest.strip_suffix(" */"))
    {
        return Ok(CardLine::Doc(text));
    }
    if !line.starts_with("/* >") {
        if let Some(text) = line
            .strip_prefix(C_COMMENT_OPEN)
            .and_then(|rest| rest.strip_suffix(C_COMMENT_CLOSE))
        {
            return Ok(CardLine::Comment(text.trim()));
        }
    }
    Err(Error::UndecodableLine {
        line_no,
        text: raw.to_string(),
    })
}

/// Strict dialect: full-line markers, decoded lines, purpose required.
pub struct CCard;

impl DocCommentDialect for CCard {
    fn name(&self) -> &'static str {
        "f2c"
    }

    /// From the first to the last `/* >` line; code around it is ignored.
    fn region(&self, lines: &[&str]) -> Range<usize> {
        let is_card = |l: &&str| l.starts_with("/* >");
        match (
            lines.iter().position(is_card),
            lines.iter().rposition(is_card),
        ) {
            (Some(first), Some(last)) => first..last + 1,
            _ => 0..0,
        }
    }

    fn strip(&self, raw: &str, line_no: usize) -> Result<String> {
        decode_line(raw, line_no).map(|line| line.text().to_string())
    }

    fn section(&self, line: &str) -> Option<Section> {
        match line.trim() {
            r"\par Purpose:" => Some(Section::Purpose),
            "Arguments:" => Some(Section::Arguments),
            r"\par Further Details:" => Some(Section::FurtherDetails),
            _ => None,
        }
    }

    fn is_verbatim_open(&self, line: &str) -> bool {
        line.trim() == r"\verbatim"
    }

    fn is_verbatim_close(&self, line: &str) -> bool {
        line.trim() == r"\endverbatim"
    }

    fn is_param_tag(&self, line: &str) -> bool {
        line.trim_start().starts_with(r"\param[")
    }

    fn requires_purpose(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fortran_strip_fixed_column() {
        let d = FortranCard;
        assert_eq!(d.strip("*> DDOT forms", 1).unwrap(), "DDOT forms");
        assert_eq!(d.strip("*>          N is INTEGER", 1).unwrap(), "         N is INTEGER");
        assert_eq!(d.strip("*>", 1).unwrap(), "");
        assert_eq!(d.strip("", 1).unwrap(), "");
    }

    #[test]
    fn fortran_markers_are_substrings() {
        let d = FortranCard;
        assert_eq!(d.section(r"\par Purpose:"), Some(Section::Purpose));
        assert_eq!(d.section("  Arguments:"), Some(Section::Arguments));
        assert_eq!(d.section(r"\par Further Details:"), Some(Section::FurtherDetails));
        assert!(d.is_verbatim_open(r" \verbatim"));
        assert!(!d.is_verbatim_open(r"\endverbatim"));
        assert!(d.is_verbatim_close(r"\endverbatim"));
    }

    #[test]
    fn decode_four_shapes() {
        assert_eq!(decode_line("", 1).unwrap(), CardLine::Blank);
        assert_eq!(decode_line("   ", 1).unwrap(), CardLine::Blank);
        assert_eq!(decode_line("/* > */", 1).unwrap(), CardLine::EmptyDoc);
        assert_eq!(
            decode_line("/* >          N is INTEGER */", 1).unwrap(),
            CardLine::Doc("         N is INTEGER")
        );
        assert_eq!(
            decode_line("/*  Arguments: */", 1).unwrap(),
            CardLine::Comment("Arguments:")
        );
    }

    #[test]
    fn decode_rejects_other_shapes() {
        for bad in [
            "static integer c__1 = 1;",
            "/* > unterminated",
            "/* >no space */",
            "/* Subroutine */ int ddot_(integer *n,",
        ] {
            let err = decode_line(bad, 7).unwrap_err();
            assert!(matches!(err, Error::UndecodableLine { line_no: 7, .. }), "{bad}");
        }
    }

    #[test]
    fn c_markers_are_full_lines() {
        let d = CCard;
        assert_eq!(d.section(r"\par Purpose:"), Some(Section::Purpose));
        assert_eq!(d.section(r"see \par Purpose: below"), None);
        assert!(d.is_verbatim_open(r"\verbatim"));
        assert!(!d.is_verbatim_open(r"\verbatim text"));
    }

    #[test]
    fn c_region_spans_card_lines() {
        let lines = [
            "#include \"f2c.h\"",
            "/* > \\brief \\b DDOT */",
            "",
            "/*  Arguments: */",
            "/* > \\ingroup dot */",
            "doublereal ddot_(integer *n)",
        ];
        assert_eq!(CCard.region(&lines), 1..5);
        assert_eq!(CCard.region(&["int x;"]), 0..0);
    }

    #[test]
    fn detect_by_purpose_literal() {
        assert_eq!(detect("/* > \\par Purpose: */\n").name(), "f2c");
        assert_eq!(detect("*> \\par Purpose:\n").name(), "fortran");
        assert_eq!(detect("").name(), "fortran");
    }
}
