//! Seed command - demo reps and their house-card tags

use std::sync::Arc;

use colored::Colorize;
use tracing::debug;

use crate::interfaces::cli::CliError;
use crate::storage::{NewRep, NewTag, SeaOrmStorage, TagType};

const DEMO_COMPANY: &str = "Swany Roofing";
const DEMO_TAG_NOTES: &str = "38mm NTAG216 wet inlay - test phase";

/// 四个测试 rep（id 1..=4）
pub fn demo_reps() -> Vec<NewRep> {
    [(1, "One"), (2, "Two"), (3, "Three"), (4, "Four")]
        .into_iter()
        .map(|(id, word)| {
            let digit = id.to_string();
            NewRep {
                id,
                name: format!("Rep {}", word),
                phone: Some(format!("555-{0}{0}{0}-{0}{0}{0}{0}", digit)),
                email: Some(format!("rep{}@example.com", id)),
                title: Some(if id == 1 { "Project Manager" } else { "Sales Rep" }.to_string()),
                company: Some(DEMO_COMPANY.to_string()),
                ..Default::default()
            }
        })
        .collect()
}

fn demo_tag(rep: &NewRep) -> NewTag {
    NewTag {
        uid: Some(format!("test-rep-{}", rep.id)),
        label: Some(format!("{} House Card", rep.name)),
        tag_type: TagType::Rep,
        rep_id: Some(rep.id),
        notes: Some(DEMO_TAG_NOTES.to_string()),
        ..Default::default()
    }
}

/// Upsert the demo reps, then register any missing tags
///
/// Safe to run repeatedly: reps are overwritten, existing tags are left alone.
pub async fn seed_demo_data(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    println!("{}", "Seeding database...".yellow());

    let reps = demo_reps();
    for rep in &reps {
        let saved = storage.upsert_rep(rep.clone()).await?;
        println!(
            "  {} Rep #{}: {} {} /r/{}",
            "✓".green(),
            saved.id,
            saved.name.cyan(),
            "→".dimmed(),
            saved.id
        );
    }

    for rep in &reps {
        let tag = demo_tag(rep);
        let uid = tag.uid.clone().unwrap_or_default();
        if storage.find_tag_by_uid(&uid).await?.is_some() {
            debug!("Tag {} already registered, skipping", uid);
            continue;
        }
        storage.insert_tag(tag).await?;
        println!("  {} Tag {}", "✓".green(), uid.cyan());
    }

    println!();
    println!("{}", "NFC tag URLs:".bold());
    let urls: Vec<String> = reps.iter().map(|r| format!("/r/{}", r.id)).collect();
    println!("  {}", urls.join("  "));
    Ok(())
}
