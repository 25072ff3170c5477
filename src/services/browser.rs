//! Web page launching through the desktop's default browser

use super::PageLauncher;

/// Opens URLs with the platform's URL handler
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBrowser;

impl PageLauncher for SystemBrowser {
    fn open(&self, url: &str) {
        tracing::info!(url, "opening page");
        if let Err(e) = open_url(url) {
            tracing::warn!(url, error = %e, "failed to launch browser");
        }
    }
}

/// Open a URL in the default browser
///
/// Only spawns the handler; the page loading is not observed.
///
/// # Errors
///
/// Returns error if the handler process cannot be spawned
pub fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = std::process::Command::new("open");
        c.arg(url);
        c
    };

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    };

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = std::process::Command::new("xdg-open");
        c.arg(url);
        c
    };

    command
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()
        .map(drop)
}
