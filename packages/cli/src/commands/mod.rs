pub mod diff;
pub mod edit;
pub mod show;
pub mod validate;

pub use diff::{diff, DiffArgs};
pub use edit::{edit, EditArgs};
pub use show::{show, ShowArgs};
pub use validate::{validate, ValidateArgs};

use catalog_editor::{EntityOp, SavePlan, ValidationIssue, ValueChange};
use colored::Colorize;

pub(crate) fn print_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        println!("   {} No validation issues", "✓".green());
        return;
    }
    for issue in issues {
        println!("   {} {}: {}", "✗".red(), issue.field.bold(), issue.message);
    }
}

pub(crate) fn print_changes(changes: &[ValueChange]) {
    if changes.is_empty() {
        println!("   No changes");
        return;
    }
    for change in changes {
        match change {
            ValueChange::Added { path, value } => {
                println!("   {} {} = {}", "+".green(), path, value)
            }
            ValueChange::Removed { path, value } => {
                println!("   {} {} = {}", "-".red(), path, value)
            }
            ValueChange::Changed { path, from, to } => {
                println!("   {} {}: {} → {}", "~".yellow(), path, from, to)
            }
        }
    }
}

pub(crate) fn print_plan(plan: &SavePlan) {
    if plan.is_empty() {
        println!("   Nothing to save");
        return;
    }
    for op in &plan.ops {
        println!("   {} {}", "•".cyan(), describe_op(op));
    }
}

fn describe_op(op: &EntityOp) -> String {
    match op {
        EntityOp::UpdateDocument { fields } => format!("update document ({})", fields.join(", ")),
        EntityOp::CreateEdition { edition_type } => format!("create {} edition", edition_type),
        EntityOp::UpdateEdition { edition_type } => format!("update {} edition", edition_type),
        EntityOp::DeleteEdition { edition_type } => format!("delete {} edition", edition_type),
        EntityOp::CreateRelatedDocument { document_id } => {
            format!("link related document {}", document_id)
        }
        EntityOp::UpdateRelatedDocument { document_id } => {
            format!("update related document {}", document_id)
        }
        EntityOp::DeleteRelatedDocument { document_id } => {
            format!("unlink related document {}", document_id)
        }
        EntityOp::CreateTag { tag_type } => format!("add tag {}", tag_type.label()),
        EntityOp::DeleteTag { tag_type } => format!("remove tag {}", tag_type.label()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_editor::{EditionType, TagType};

    #[test]
    fn test_describe_op() {
        assert_eq!(
            describe_op(&EntityOp::UpdateDocument {
                fields: vec!["title", "slug"]
            }),
            "update document (title, slug)"
        );
        assert_eq!(
            describe_op(&EntityOp::DeleteEdition {
                edition_type: EditionType::Original
            }),
            "delete original edition"
        );
        assert_eq!(
            describe_op(&EntityOp::CreateTag {
                tag_type: TagType::SpiritualLife
            }),
            "add tag spiritual life"
        );
    }
}
