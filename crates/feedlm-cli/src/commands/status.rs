use crate::Context;
use anyhow::Result;
use console::style;

pub fn execute(ctx: &Context, clear: bool) -> Result<()> {
    let mut controller = ctx.controller()?;

    if clear {
        let had_record = controller.session().is_some();
        controller.discard_session()?;
        if !ctx.is_json() {
            if had_record {
                println!("🗑️  Discarded the session record.");
            } else {
                println!("No session record to discard.");
            }
        }
        return Ok(());
    }

    let pending = controller.pending().len();
    let Some(session) = controller.session() else {
        if ctx.is_json() {
            println!("null");
        } else {
            println!("No batch in progress. {} videos pending.", pending);
        }
        return Ok(());
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }

    let state = if session.running {
        style("running").green()
    } else {
        style("failed").red()
    };
    println!("Batch:     {}", state);
    println!("Notebook:  {}", session.target);
    println!(
        "Progress:  {} of {} added, {} remaining",
        session.processed,
        session.total,
        session.remaining()
    );
    println!("Last:      {}", session.last_message);
    println!(
        "Updated:   {}",
        session.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("Pending:   {} videos", pending);

    if session.running {
        println!();
        println!(
            "If no 'feedlm run' is active any more, clear this record with 'feedlm status --clear'."
        );
    }
    Ok(())
}
