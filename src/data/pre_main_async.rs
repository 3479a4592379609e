// Async code to run in main before egui starts up

use crate::Cli;
use crate::data::source::{SourceDescriptor, load_source};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// The source named on the command line, `--url` taking precedence over `--file`.
pub fn initial_source(args: &Cli) -> Option<SourceDescriptor> {
    match (&args.url, &args.file) {
        (Some(url), _) => Some(SourceDescriptor::Url(url.clone())),
        (None, Some(path)) => Some(SourceDescriptor::File(path.clone())),
        (None, None) => None,
    }
}

// The async function to run before the GUI starts at all (so can't rely on gui app state).
// A failed load is not fatal: the window still opens, empty, and the user can pick another source.
pub async fn fetch_initial_table(args: &Cli) -> Option<(SourceDescriptor, String)> {
    let source = initial_source(args)?;

    match load_source(&source).await {
        Ok(text) => {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Initial table fetched from {}.", source);
            }
            Some((source, text))
        }
        Err(e) => {
            log::error!("⚠️  Initial load failed: {:#}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn url_wins_over_file() {
        let args = Cli {
            file: Some(PathBuf::from("a.csv")),
            url: Some("https://example.com/b.csv".to_string()),
        };
        assert_eq!(
            initial_source(&args),
            Some(SourceDescriptor::Url("https://example.com/b.csv".to_string()))
        );

        let args = Cli { file: None, url: None };
        assert_eq!(initial_source(&args), None);
    }
}
