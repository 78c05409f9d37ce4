use super::{print_changes, print_plan};
use crate::store::read_query;
use anyhow::{ensure, Context, Result};
use catalog_editor::{diff_values, plan_document_save, Value};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Document as loaded
    pub original: PathBuf,

    /// Document after editing
    pub edited: PathBuf,
}

pub fn diff(args: DiffArgs, cwd: &str) -> Result<()> {
    let load = |path: &PathBuf| {
        read_query(&PathBuf::from(cwd).join(path))
            .map(|query| query.document)
            .with_context(|| format!("Loading {}", path.display()))
    };
    let original = load(&args.original)?;
    let edited = load(&args.edited)?;

    ensure!(
        original.id == edited.id,
        "Documents differ in identity: {} vs {}",
        original.id,
        edited.id
    );

    let changes = diff_values(&Value::from_entity(&original)?, &Value::from_entity(&edited)?);

    println!("🔀 {} {}", "Comparing".green().bold(), original.id);
    println!();
    println!("   {}", "Changes".bold());
    print_changes(&changes);
    println!();
    println!("   {}", "Save plan".bold());
    print_plan(&plan_document_save(&edited, &original));

    Ok(())
}
