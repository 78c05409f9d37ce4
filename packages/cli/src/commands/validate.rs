use super::print_issues;
use crate::store::read_document_value;
use anyhow::{bail, Context, Result};
use catalog_editor::{validate as validate_document, RuleSet};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Query file or bare document to check
    pub input: PathBuf,
}

pub fn validate(args: ValidateArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.input);
    let document =
        read_document_value(&path).with_context(|| format!("Loading {}", args.input.display()))?;

    println!("🔍 {} {}", "Validating".green().bold(), args.input.display());
    let issues = validate_document(&document, &RuleSet::new());
    print_issues(&issues);

    if !issues.is_empty() {
        bail!("{} validation issue(s)", issues.len());
    }
    Ok(())
}
