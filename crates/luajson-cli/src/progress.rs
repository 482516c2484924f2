//! Progress bars for the load and export phases

use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{prefix:>8} [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}";

/// A bar over `len` items. Hidden automatically when stderr is not a terminal.
pub fn bar(len: usize, prefix: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template(TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_prefix(prefix);
    pb
}
