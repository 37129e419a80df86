//! Chart presenter — builds the TradingView URL for a pick and hands it to
//! the platform browser opener. Selection logic never depends on this.

use std::io;
use std::process::Command;

pub fn chart_url(exchange: &str, symbol: &str) -> String {
    format!("https://www.tradingview.com/chart/?symbol={exchange}:{symbol}")
}

/// Launch the platform opener for `url`. Spawns and returns; the browser's
/// fate is not our problem, but a failure to spawn is reported so the
/// caller can fall back to printing the URL.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg(url);
        c
    } else if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };
    command.spawn().map(|_| ())
}
