use super::{print_changes, print_issues, print_plan};
use crate::config::Config;
use crate::store::{JsonFileSink, JsonFileSource};
use anyhow::{anyhow, bail, Context, Result};
use catalog_editor::{plan_document_save, DocumentSession, Mutation, QueryCollaborator, RuleSet};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Query file or bare document to edit
    pub input: PathBuf,

    /// JSON array of mutations to apply
    #[arg(short, long)]
    pub script: PathBuf,

    /// Write the edited document to this file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Save even when validation reports issues. Values the document model
    /// cannot hold (such as a non-numeric `published`) are never saved.
    #[arg(long)]
    pub force: bool,
}

pub fn edit(args: EditArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;

    let mut source = JsonFileSource::open(&PathBuf::from(cwd).join(&args.input))
        .with_context(|| format!("Loading {}", args.input.display()))?;
    let id = source.document_id().to_string();
    let status = source.fetch(&id);

    let mut session = DocumentSession::new(id.as_str());
    session.poll(status.as_ref().map(|query| &query.document))?;
    let original = status
        .data()
        .map(|query| query.document.clone())
        .ok_or_else(|| anyhow!("Document {} did not load", id))?;

    let script_path = config.resolve_script(cwd, &args.script);
    let script = fs::read_to_string(&script_path)
        .with_context(|| format!("Reading script {}", script_path.display()))?;
    let mutations: Vec<Mutation> = serde_json::from_str(&script)
        .with_context(|| format!("Parsing script {}", script_path.display()))?;

    println!("✏️  {} {}", "Editing".green().bold(), id);
    for (index, mutation) in mutations.into_iter().enumerate() {
        let label = format!("#{} {} at '{}'", index, mutation.name(), mutation.target());
        session
            .dispatch(mutation)
            .with_context(|| format!("Mutation {} failed", label))?;
        println!("   {} {}", "✓".green(), label);
    }

    println!();
    println!(
        "   Dirty: {}",
        if session.is_dirty() {
            "yes".yellow()
        } else {
            "no".normal()
        }
    );

    println!();
    println!("   {}", "Validation".bold());
    let issues = session.issues(&RuleSet::new())?;
    print_issues(&issues);

    println!();
    println!("   {}", "Changes".bold());
    print_changes(&session.changes()?);

    println!();
    println!("   {}", "Save plan".bold());
    let typed = match session.document() {
        Ok(edited) => {
            print_plan(&plan_document_save(&edited, &original));
            true
        }
        Err(err) => {
            tracing::debug!(error = %err, "edited document does not fit the model");
            println!(
                "   {} Unavailable: edited values do not fit the document model ({})",
                "⚠".yellow(),
                err
            );
            false
        }
    };

    let Some(out) = args.save else {
        return Ok(());
    };

    if !issues.is_empty() && config.require_valid_to_save && !args.force {
        bail!(
            "Refusing to save with {} validation issue(s); pass --force to override",
            issues.len()
        );
    }
    if !typed {
        bail!("Cannot save: fix the fields reported above, --force does not apply to them");
    }
    if !session.can_save() {
        println!();
        println!("   Nothing to save");
        return Ok(());
    }

    let out_path = PathBuf::from(cwd).join(&out);
    let mut sink = JsonFileSink::new(out_path, config.pretty_output);
    let receipt = session.save(&mut sink)?;

    println!();
    println!(
        "💾 {} {} (version {}, {})",
        "Saved".green().bold(),
        out.display(),
        receipt.version,
        receipt.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(())
}
