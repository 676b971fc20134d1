//! Generation run: header → signatures → documentation → bindings.
//!
//! Header problems abort the run. Documentation problems never do: the
//! function keeps an empty description and its status records why.

use crate::error::Error;
use crate::model::{Binding, BoundParameter, Family, FunctionDescription, Signature};
use crate::parser::{doc, header, reconcile};
use crate::types;
use anyhow::{Context, Result};
use glob::Pattern;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs of one run.
#[derive(Debug)]
pub struct Config {
    pub header: PathBuf,
    pub doc_dir: Option<PathBuf>,
    pub family: Family,
    /// Overrides the family's documentation extension.
    pub doc_ext: Option<String>,
    /// Keep only functions matching one of these patterns (all when empty).
    pub filters: Vec<Pattern>,
}

/// Outcome of the documentation lookup for one function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocStatus {
    Ok,
    Missing(String),
}

impl fmt::Display for DocStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocStatus::Ok => f.write_str("OK"),
            DocStatus::Missing(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug)]
pub struct Entry {
    pub signature: Signature,
    pub description: FunctionDescription,
    pub status: DocStatus,
}

impl Entry {
    /// `<name> ... OK` or `<name> ... <reason>`
    pub fn status_line(&self) -> String {
        format!("{} ... {}", self.signature.name, self.status)
    }

    /// Reconcile arguments with their docs and map every type.
    pub fn bind(&self, family: Family) -> crate::error::Result<Binding<'_>> {
        let reconciler = reconcile::reconciler_for(family);
        let mut parameters = Vec::with_capacity(self.signature.arguments.len());
        for param in reconcile::reconcile(reconciler.as_ref(), &self.signature, &self.description) {
            let target_type = types::map_argument(family, &param.argument.ty, &param.argument.name)?;
            parameters.push(BoundParameter { param, target_type });
        }

        Ok(Binding {
            family,
            signature: &self.signature,
            description: &self.description,
            return_type: types::map_return(family, &self.signature.return_type, &self.signature.name)?,
            parameters,
        })
    }
}

/// Every supported function of one header, in declaration order.
#[derive(Debug)]
pub struct Generation {
    pub family: Family,
    pub header: PathBuf,
    pub entries: Vec<Entry>,
}

impl Generation {
    /// Bind every entry; the first unknown type aborts.
    pub fn bindings(&self) -> Result<Vec<Binding<'_>>> {
        self.entries
            .iter()
            .map(|entry| {
                entry
                    .bind(self.family)
                    .with_context(|| format!("failed to map types of {}", entry.signature.name))
            })
            .collect()
    }
}

/// Run the parser over the header and the documentation directory.
pub fn generate(config: &Config) -> Result<Generation> {
    let content = fs::read_to_string(&config.header)
        .with_context(|| format!("failed to read {}", config.header.display()))?;
    let signatures = header::parse(config.family, &content)
        .with_context(|| format!("failed to parse {}", config.header.display()))?;
    info!(
        header = %config.header.display(),
        family = %config.family,
        count = signatures.len(),
        "parsed header"
    );

    let entries = signatures
        .into_iter()
        .filter(|sig| matches_filters(&config.filters, &sig.name))
        .map(|signature| {
            let (description, status) = describe(config, &signature.name);
            Entry {
                signature,
                description,
                status,
            }
        })
        .collect();

    Ok(Generation {
        family: config.family,
        header: config.header.clone(),
        entries,
    })
}

/// Documentation path of one function under `doc_dir`.
pub fn doc_path(config: &Config, doc_dir: &Path, function: &str) -> PathBuf {
    doc_dir.join(
        config
            .family
            .doc_file_name(function, config.doc_ext.as_deref()),
    )
}

fn describe(config: &Config, function: &str) -> (FunctionDescription, DocStatus) {
    let Some(doc_dir) = config.doc_dir.as_deref() else {
        return (
            FunctionDescription::default(),
            DocStatus::Missing("no documentation directory".to_string()),
        );
    };
    let path = doc_path(config, doc_dir, function);
    match doc::load(&path) {
        Ok(description) => {
            if description.is_empty() {
                debug!(function, path = %path.display(), "documentation card is empty");
            }
            (description, DocStatus::Ok)
        }
        Err(e) => {
            if !matches!(e, Error::DocumentNotFound { .. }) {
                debug!(function, path = %path.display(), error = %e, "documentation rejected");
            }
            (FunctionDescription::default(), DocStatus::Missing(e.to_string()))
        }
    }
}

fn matches_filters(filters: &[Pattern], name: &str) -> bool {
    filters.is_empty() || filters.iter().any(|p| p.matches(name))
}
