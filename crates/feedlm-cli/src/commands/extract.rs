use crate::Context;
use anyhow::{Result, bail};
use feedlm_browser::{CdpSession, Scraper};
use feedlm_core::source::Extraction;
use feedlm_core::target::UrlPattern;
use serde_json::json;

/// Read the YouTube tab matching `tab` into the pending list
pub fn execute(ctx: &Context, port: u16, tab: &str) -> Result<()> {
    let pattern = UrlPattern::parse(tab)?;
    let mut controller = ctx.controller()?;
    if controller.is_running() {
        bail!("Cannot change the list while a batch is running");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let extraction = runtime.block_on(async {
        let session = CdpSession::connect(port).await?;
        let (page, _) = session.find_tab(&pattern).await?;
        Scraper::new(page).extract().await
    });
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));
    let extraction = extraction?;

    let failed = matches!(extraction, Extraction::Failed { .. });
    let message = controller.apply_extraction(extraction)?;
    if failed {
        bail!(message);
    }

    if ctx.is_json() {
        println!(
            "{}",
            json!({ "message": message, "total": controller.pending().len() })
        );
    } else {
        println!("✅ {}", message);
    }
    Ok(())
}
