//! Pending-list management: `add`, `list`, `remove` and `clear`.
//!
//! Every edit is refused while a batch is running, because the batch is
//! working from a copy of the list and reconciles against it by link.

use crate::Context;
use anyhow::{Result, bail};
use console::style;
use feedlm_core::WorkItem;
use serde_json::json;

pub fn add(ctx: &Context, link: &str, title: Option<String>) -> Result<()> {
    let title = title.unwrap_or_else(|| link.to_string());
    let item = WorkItem::new(title, link)?;
    let preview = item.title_preview();

    let mut controller = ctx.controller()?;
    let added = controller.add(item)?;
    let total = controller.pending().len();

    if ctx.is_json() {
        println!("{}", json!({ "added": added, "total": total }));
    } else if added {
        println!("✅ Added \"{}\". Total: {}.", preview, total);
    } else {
        println!("\"{}\" is already in the list.", preview);
    }
    Ok(())
}

pub fn list(ctx: &Context) -> Result<()> {
    let controller = ctx.controller()?;
    let items = controller.pending().items();

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No videos in the list. Use 'feedlm extract' or 'feedlm add' to collect some.");
        return Ok(());
    }

    println!("Pending videos ({}):", items.len());
    println!();
    for (i, item) in items.iter().enumerate() {
        println!("{:>4}. {}", i + 1, style(&item.title).bold());
        println!("      {}", style(&item.link).dim());
    }
    if controller.is_running() {
        println!();
        println!("⏳ A batch is running; this list shrinks as videos are added.");
    }
    Ok(())
}

/// Remove the `position`-th item, counting from 1 as `list` does
pub fn remove(ctx: &Context, position: usize) -> Result<()> {
    if position == 0 {
        bail!("Positions start at 1");
    }
    let mut controller = ctx.controller()?;
    let removed = controller.remove(position - 1)?;

    if ctx.is_json() {
        println!("{}", serde_json::to_string(&removed)?);
    } else {
        println!("🗑️  Removed \"{}\".", removed.title_preview());
    }
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<()> {
    let mut controller = ctx.controller()?;
    let count = controller.pending().len();
    controller.clear()?;

    if ctx.is_json() {
        println!("{}", json!({ "removed": count }));
    } else {
        println!("🗑️  Cleared {} videos.", count);
    }
    Ok(())
}
