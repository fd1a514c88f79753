//! CLI command for iterative-deepening tree search.

use std::path::Path;
use std::time::Duration;

use obelisk::{search, SearchConfig};

use crate::cli::output::format_search;
use crate::cli::{load_roster, CliError};

/// Execute the search command.
///
/// Searches every depth from 0 to `max_depth`; the deadline applies to each
/// depth separately and deepening stops after the first incomplete depth.
pub(crate) fn execute(
    roster: Option<&Path>,
    max_depth: usize,
    deadline_secs: Option<f64>,
    sequential: bool,
) -> Result<(), CliError> {
    let players = load_roster(roster)?;
    let deadline = deadline_secs
        .map(Duration::try_from_secs_f64)
        .transpose()
        .map_err(|e| CliError::new(format!("invalid deadline: {e}")))?;

    for depth in 0..=max_depth {
        let config = SearchConfig {
            depth,
            parallel: !sequential,
            deadline,
        };
        let result = search(&players, &config)?;
        print!("{}", format_search(depth, &result));

        if !result.complete {
            println!("(deadline reached after {} leaves; best plan so far)", result.nodes);
            break;
        }
    }

    Ok(())
}
