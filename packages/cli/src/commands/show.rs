use crate::store::read_query;
use anyhow::{Context, Result};
use catalog_editor::picker_options;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Query file (`{document, selectableDocuments}`) or bare document
    pub input: PathBuf,
}

pub fn show(args: ShowArgs, cwd: &str) -> Result<()> {
    let path = PathBuf::from(cwd).join(&args.input);
    let query = read_query(&path).with_context(|| format!("Loading {}", args.input.display()))?;
    let doc = &query.document;

    println!("📖 {} {}", doc.title.bold(), format!("({})", doc.id).dimmed());
    println!("   Author:   {} [{}]", doc.friend.name, doc.friend.lang.label());
    println!("   Slug:     {}", doc.slug);
    println!("   Filename: {}", doc.filename);
    println!(
        "   {} Version Document ID: {}",
        doc.friend.lang.alternate().label(),
        doc.alt_language_id.as_deref().unwrap_or("-")
    );
    if let Some(year) = doc.published {
        println!("   Published: {}", year);
    }
    if doc.incomplete {
        println!("   {}", "Incomplete".yellow());
    }

    let tags: Vec<&str> = doc.tags.iter().map(|tag| tag.tag_type.label()).collect();
    println!("   Tags:     {}", if tags.is_empty() { "-".to_string() } else { tags.join(", ") });

    println!();
    println!("   {} ({})", "Editions".bold(), doc.editions.len());
    for (index, edition) in doc.editions.iter().enumerate() {
        println!(
            "     [{}] {}{}{}",
            index,
            edition.edition_type,
            edition
                .editor
                .as_deref()
                .map(|editor| format!(", ed. {}", editor))
                .unwrap_or_default(),
            if edition.is_draft { " (draft)" } else { "" }
        );
    }

    println!();
    println!("   {} ({})", "Related documents".bold(), doc.related_documents.len());
    for (index, related) in doc.related_documents.iter().enumerate() {
        let title = query
            .selectable_documents
            .iter()
            .find(|candidate| candidate.id == related.document_id)
            .map(|candidate| candidate.title.as_str())
            .unwrap_or("?");
        println!("     [{}] {} {}", index, related.document_id, title.dimmed());
    }

    let options = picker_options(&query.selectable_documents, doc.friend.lang);
    if !options.is_empty() {
        println!();
        println!("   {} ({})", "Selectable documents".bold(), options.len());
        for (id, label) in options {
            println!("     {} {}", id.cyan(), label);
        }
    }

    Ok(())
}
