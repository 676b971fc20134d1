//! Reference-source documentation parser — line-by-line state machine.
//!
//! Walks the doxygen comment card of one BLAS/LAPACK routine and collects
//! the purpose text, the `\param[...]` entries and the further details.
//! Section headers always win: seeing one switches state mid-block.

use super::dialect::{self, DocCommentDialect, Section};
use crate::error::{Error, Result};
use crate::model::{Direction, FunctionDescription, ParamDoc};
use regex::Regex;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static RE_PARAM_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"param\[([^\]]*)\]\s*([A-Za-z0-9_]*)").unwrap());

// -- Parser state -------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ReadState {
    #[default]
    None,
    Purpose,
    Arguments,
    FurtherDetails,
}

impl From<Section> for ReadState {
    fn from(section: Section) -> Self {
        match section {
            Section::Purpose => ReadState::Purpose,
            Section::Arguments => ReadState::Arguments,
            Section::FurtherDetails => ReadState::FurtherDetails,
        }
    }
}

/// Phases inside a verbatim block.
/// Purpose/details: waiting for open → waiting for first blank → capturing.
/// Arguments: waiting for tag → waiting for open → capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Start,
    Opened,
    Capturing,
}

struct PendingParam {
    name: String,
    direction: Direction,
    description: Vec<String>,
}

#[derive(Default)]
struct ParserState {
    state: ReadState,
    phase: Phase,
    purpose: Vec<String>,
    parameters: Vec<ParamDoc>,
    remarks: Vec<String>,
    pending: Option<PendingParam>,
}

// -- Public API ---------------------------------------------------------------

/// Parse a documentation source, picking the dialect from its contents.
pub fn parse(input: &str) -> Result<FunctionDescription> {
    let dialect = dialect::detect(input);
    debug!(dialect = dialect.name(), "parsing documentation card");
    parse_with(dialect, input)
}

/// Parse a documentation source with an explicit dialect.
pub fn parse_with(dialect: &dyn DocCommentDialect, input: &str) -> Result<FunctionDescription> {
    let lines: Vec<&str> = input.lines().collect();
    let region = dialect.region(&lines);
    let mut s = ParserState::default();

    for (index, raw) in lines
        .iter()
        .enumerate()
        .take(region.end)
        .skip(region.start)
    {
        let line = dialect.strip(raw, index + 1)?;
        process_line(&mut s, dialect, line)?;
    }

    let purpose = normalize(&s.purpose);
    if dialect.requires_purpose() && purpose.is_empty() {
        return Err(Error::MissingPurpose);
    }

    Ok(FunctionDescription {
        purpose,
        parameters: s.parameters,
        remarks: normalize(&s.remarks),
    })
}

/// Read and parse one documentation file.
///
/// A missing file is reported as [`Error::DocumentNotFound`] so callers can
/// tell it apart from a malformed card.
pub fn load(path: &Path) -> Result<FunctionDescription> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::DocumentNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(source) => {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    parse(&String::from_utf8_lossy(&bytes))
}

/// Collapse blank-line runs to one blank, drop leading and trailing blanks.
/// Whitespace-only lines count as blank and are stored empty.
pub fn normalize(lines: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(lines.len());
    let mut prev_blank = true;
    for line in lines {
        let blank = line.trim().is_empty();
        if blank && prev_blank {
            continue;
        }
        result.push(if blank { String::new() } else { line.clone() });
        prev_blank = blank;
    }
    while result.last().is_some_and(|l| l.is_empty()) {
        result.pop();
    }
    result
}

// -- Line processing ----------------------------------------------------------

fn process_line(s: &mut ParserState, dialect: &dyn DocCommentDialect, line: String) -> Result<()> {
    if let Some(section) = dialect.section(&line) {
        s.state = section.into();
        s.phase = Phase::Start;
        s.pending = None;
        return Ok(());
    }

    match s.state {
        ReadState::None => {}
        ReadState::Purpose => {
            if let Some(text) = capture_block(s, dialect, line) {
                s.purpose.push(text);
            }
        }
        ReadState::FurtherDetails => {
            if let Some(text) = capture_block(s, dialect, line) {
                s.remarks.push(text);
            }
        }
        ReadState::Arguments => process_argument_line(s, dialect, &line)?,
    }
    Ok(())
}

/// Two-phase verbatim capture shared by Purpose and Further Details.
/// Returns the line when it is content.
fn capture_block(
    s: &mut ParserState,
    dialect: &dyn DocCommentDialect,
    line: String,
) -> Option<String> {
    match s.phase {
        Phase::Start => {
            if dialect.is_verbatim_open(&line) {
                s.phase = Phase::Opened;
            }
            None
        }
        Phase::Opened => {
            if line.trim().is_empty() {
                s.phase = Phase::Capturing;
            } else if dialect.is_verbatim_close(&line) {
                s.state = ReadState::None;
            }
            None
        }
        Phase::Capturing => {
            if dialect.is_verbatim_close(&line) {
                s.state = ReadState::None;
                None
            } else {
                Some(line)
            }
        }
    }
}

fn process_argument_line(
    s: &mut ParserState,
    dialect: &dyn DocCommentDialect,
    line: &str,
) -> Result<()> {
    match s.phase {
        Phase::Start => {
            if dialect.is_param_tag(line) {
                s.pending = Some(parse_param_tag(line)?);
                s.phase = Phase::Opened;
            }
        }
        Phase::Opened => {
            if dialect.is_verbatim_open(line) {
                s.phase = Phase::Capturing;
            }
        }
        Phase::Capturing => {
            if dialect.is_verbatim_close(line) {
                if let Some(param) = s.pending.take() {
                    s.parameters.push(ParamDoc {
                        name: param.name,
                        direction: param.direction,
                        description: param.description,
                    });
                }
                s.phase = Phase::Start;
            } else if let Some(ref mut param) = s.pending {
                param.description.push(line.trim().to_string());
            }
        }
    }
    Ok(())
}

/// `\param[in,out] A` → (A, InOut)
fn parse_param_tag(line: &str) -> Result<PendingParam> {
    let malformed = || Error::MalformedParamTag {
        line: line.trim().to_string(),
    };
    let caps = RE_PARAM_TAG.captures(line).ok_or_else(malformed)?;
    let tag = &caps[1];
    let name = &caps[2];
    if tag.is_empty() || name.is_empty() {
        return Err(malformed());
    }
    let direction = Direction::from_tag(tag).ok_or_else(|| Error::InvalidDirection {
        direction: tag.to_string(),
        name: name.to_string(),
    })?;
    Ok(PendingParam {
        name: name.to_string(),
        direction,
        description: Vec::new(),
    })
}
