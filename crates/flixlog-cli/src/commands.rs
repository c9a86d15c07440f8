//! Subcommand handlers. Each one maps onto a single journal operation and
//! prints a plain-text or JSON result to stdout.

use std::io::Read;

use anyhow::{bail, Context};
use flixlog_shared::time::{format_date, format_time};
use flixlog_shared::{AnnotationId, ShowId};
use flixlog_store::{parse_rating, Journal, ShowRecord};
use tracing::info;

use crate::{Commands, FriendAction, GlobalFriendAction, NicknameAction};

pub async fn run(journal: &Journal, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::List => {
            let shows = journal.get_journal().await;
            if shows.is_empty() {
                println!("Journal is empty");
            }
            for show in &shows {
                println!(
                    "{}  {}  [{}/5]  {} annotation(s)",
                    show.id,
                    show.title,
                    show.rating,
                    show.annotations.len()
                );
            }
        }
        Commands::Show { title } => match journal.get_show_by_title(&title).await {
            Some(show) => print_show(journal, &show).await,
            None => bail!("No show titled '{title}'"),
        },
        Commands::Open { title } => {
            let show = journal.get_or_create_show(&title).await?;
            println!("{}", show.id);
        }
        Commands::Review {
            show_id,
            text,
            rating,
        } => {
            let show = journal
                .update_show_review(&ShowId::from(show_id), &text, parse_rating(&rating).into())
                .await?;
            println!("{} rated {}/5", show.title, show.rating);
        }
        Commands::Annotate {
            show_id,
            position,
            text,
        } => {
            let seconds = parse_position(&position)?;
            let show = journal
                .add_annotation(&ShowId::from(show_id), seconds, &text.join(" "))
                .await?;
            println!("{} now has {} annotation(s)", show.title, show.annotations.len());
        }
        Commands::Unannotate {
            show_id,
            annotation_id,
        } => {
            journal
                .remove_annotation(&ShowId::from(show_id), &AnnotationId::from(annotation_id))
                .await?;
        }
        Commands::Delete { show_id } => {
            journal.delete_show(&ShowId::from(show_id)).await?;
        }
        Commands::Friend { action } => run_friend(journal, action).await?,
        Commands::GlobalFriend { action } => run_global_friend(journal, action).await?,
        Commands::Nickname { action } => run_nickname(journal, action).await?,
        Commands::ExportShow { show_id, out } => {
            let json = journal.export_show(&ShowId::from(show_id)).await?;
            write_output(&out, &json).await?;
        }
        Commands::ImportShow { show_id, input } => {
            let json = read_input(&input).await?;
            let stats = journal
                .import_show_annotations(&ShowId::from(show_id), &json)
                .await?;
            println!(
                "Added {} annotation(s) to {}",
                stats.added_count, stats.show.title
            );
        }
        Commands::Export { out } => {
            let json = journal.export_journal().await?;
            write_output(&out, &json).await?;
        }
        Commands::Import { input } => {
            let json = read_input(&input).await?;
            let shows = journal.import_journal(&json).await?;
            println!("Imported {} show(s)", shows.len());
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear the journal without --yes");
            }
            journal.clear_journal().await?;
        }
        Commands::DeviceId => {
            println!("{}", journal.device_id().await?);
        }
    }
    Ok(())
}

async fn run_friend(journal: &Journal, action: FriendAction) -> anyhow::Result<()> {
    match action {
        FriendAction::Add { show_id, friend_id } => {
            journal.add_friend(&ShowId::from(show_id), &friend_id).await?;
        }
        FriendAction::Remove { show_id, friend_id } => {
            journal
                .remove_friend(&ShowId::from(show_id), &friend_id)
                .await?;
        }
        FriendAction::List { show_id } => {
            for friend in journal.get_friends(&ShowId::from(show_id)).await? {
                println!("{friend}  {}", journal.get_friend_nickname(&friend).await?);
            }
        }
    }
    Ok(())
}

async fn run_global_friend(journal: &Journal, action: GlobalFriendAction) -> anyhow::Result<()> {
    match action {
        GlobalFriendAction::Add { friend_id } => journal.add_global_friend(&friend_id).await?,
        GlobalFriendAction::Remove { friend_id } => {
            journal.remove_global_friend(&friend_id).await?
        }
        GlobalFriendAction::List => {
            for friend in journal.get_global_friends().await? {
                println!("{friend}");
            }
        }
    }
    Ok(())
}

async fn run_nickname(journal: &Journal, action: NicknameAction) -> anyhow::Result<()> {
    match action {
        NicknameAction::Set {
            friend_id,
            nickname,
        } => journal.set_friend_nickname(&friend_id, &nickname).await?,
        NicknameAction::Get { friend_id } => {
            println!("{}", journal.get_friend_nickname(&friend_id).await?);
        }
        NicknameAction::List => {
            let mut all: Vec<_> = journal.get_all_friend_nicknames().await?.into_iter().collect();
            all.sort();
            for (friend, nickname) in all {
                println!("{friend}  {nickname}");
            }
        }
    }
    Ok(())
}

async fn print_show(journal: &Journal, show: &ShowRecord) {
    println!("{}  ({})", show.title, show.id);
    println!("Rating: {}/5", show.rating);
    if !show.review.is_empty() {
        println!("Review: {}", show.review);
    }
    println!(
        "Added {}, last modified {}",
        format_date(show.added_date),
        format_date(show.last_modified)
    );
    if !show.friends.is_empty() {
        let mut names = Vec::with_capacity(show.friends.len());
        for friend in &show.friends {
            // Nickname lookup is cosmetic here.
            names.push(
                journal
                    .get_friend_nickname(friend)
                    .await
                    .unwrap_or_else(|_| friend.clone()),
            );
        }
        println!("Shared with: {}", names.join(", "));
    }
    for a in &show.annotations {
        println!(
            "  {}  {}  [{}] {}",
            format_time(a.timestamp as f64),
            a.text,
            a.device_id,
            a.id
        );
    }
}

/// Accept a playback position as plain seconds (`754`, `754.5`) or as
/// `mm:ss` / `hh:mm:ss`.
fn parse_position(input: &str) -> anyhow::Result<f64> {
    let input = input.trim();
    if !input.contains(':') {
        return input
            .parse::<f64>()
            .with_context(|| format!("Invalid position '{input}'"));
    }

    let mut seconds = 0.0;
    for part in input.split(':') {
        let value: f64 = part
            .parse()
            .with_context(|| format!("Invalid position '{input}'"))?;
        seconds = seconds * 60.0 + value;
    }
    Ok(seconds)
}

async fn read_input(path: &str) -> anyhow::Result<String> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {path}"))
}

async fn write_output(path: &str, contents: &str) -> anyhow::Result<()> {
    if path == "-" {
        println!("{contents}");
        return Ok(());
    }
    tokio::fs::write(path, contents.as_bytes())
        .await
        .with_context(|| format!("Failed to write {path}"))?;
    info!(path = %path, "wrote export");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_seconds() {
        assert_eq!(parse_position("754").unwrap(), 754.0);
        assert_eq!(parse_position(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn parses_clock_positions() {
        assert_eq!(parse_position("12:34").unwrap(), 754.0);
        assert_eq!(parse_position("1:02:03").unwrap(), 3723.0);
    }

    #[test]
    fn rejects_garbage_positions() {
        assert!(parse_position("soon").is_err());
        assert!(parse_position("1:xx").is_err());
    }

    #[tokio::test]
    async fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let path = path.to_str().unwrap();

        write_output(path, "[]").await.unwrap();
        assert_eq!(read_input(path).await.unwrap(), "[]");
    }
}
