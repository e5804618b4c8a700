use crate::Context;
use anyhow::Result;
use feedlm_browser::{ChromeFinder, ChromeLauncher, ProfileManager};
use std::path::PathBuf;

const START_PAGES: &[&str] = &["https://notebooklm.google.com", "https://www.youtube.com"];

/// Kill a process by PID (cross-platform)
fn kill_process_by_pid(pid: u32) {
    #[cfg(unix)]
    {
        use std::process::Command;
        let _ = Command::new("kill").arg(pid.to_string()).output();
    }

    #[cfg(windows)]
    {
        use std::process::Command;
        let _ = Command::new("taskkill")
            .args(["/PID", &pid.to_string(), "/F"])
            .output();
    }
}

/// Launch Chrome for `extract` and `run` to attach to, and wait for it to close
pub fn execute(
    ctx: &Context,
    chrome_path: Option<PathBuf>,
    profile: Option<String>,
    port: u16,
    urls: Vec<String>,
) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let result = runtime.block_on(async {
        println!("🔍 Locating Chrome...");
        let finder = ChromeFinder::new(chrome_path);
        let chrome = finder.find()?;
        println!("✅ Found Chrome ({}) at: {}", chrome.source, chrome.path.display());

        let profile_manager = match profile {
            Some(name) => {
                let manager = ProfileManager::named(&ctx.store.profiles_dir(), &name)?;
                println!("📁 Using profile: {}", manager.path().display());
                manager
            }
            None => {
                println!("📁 Using temporary profile (sign-in is not kept)");
                let saved = ProfileManager::list(&ctx.store.profiles_dir())?;
                if !saved.is_empty() {
                    println!("   Saved profiles: {}", saved.join(", "));
                }
                ProfileManager::temporary()?
            }
        };

        let urls = if urls.is_empty() {
            START_PAGES.iter().map(|u| u.to_string()).collect()
        } else {
            urls
        };
        let launcher = ChromeLauncher::new(
            chrome.path,
            profile_manager.path().to_path_buf(),
            urls,
        )
        .with_debugging_port(port);

        println!("🚀 Launching Chrome...");
        let mut chrome_process = launcher.launch()?;
        let chrome_pid = chrome_process.id();
        println!(
            "✅ Chrome started with remote debugging on port {}",
            launcher.debugging_port()
        );
        println!();
        println!("Open a YouTube playlist or video and run 'feedlm extract',");
        println!("then open your notebook and run 'feedlm run'.");
        println!("Close Chrome or press Ctrl+C here when you are done.");

        let mut wait_task = tokio::task::spawn_blocking(move || chrome_process.wait());

        tokio::select! {
            result = &mut wait_task => {
                let status = result??;
                println!("\n🛑 Chrome closed (exit code: {})", status.code().unwrap_or(-1));
            }
            _ = tokio::signal::ctrl_c() => {
                println!("\n🛑 Stopping Chrome...");
                kill_process_by_pid(chrome_pid);
                let _ = wait_task.await;
            }
        }

        // The temporary profile is removed here, after Chrome has exited.
        drop(profile_manager);
        Ok(())
    });

    // Explicitly shutdown runtime with timeout to prevent hanging on blocking tasks
    runtime.shutdown_timeout(std::time::Duration::from_millis(100));

    result
}
