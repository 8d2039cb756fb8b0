use crate::{IngestPath, MergeState, PlayMutation, PlayTotals};

/// Decide what to do with one observation of `observed` plays.
///
/// `existing` is the stored record for the same (date, game), if any.
///
/// | path     | existing state | observed vs stored | mutation                          |
/// |----------|----------------|--------------------|-----------------------------------|
/// | any      | none           | -                  | insert, `Unmerged`                |
/// | creation | any            | -                  | add, `MergedOnce`                 |
/// | update   | `MergedOnce`   | -                  | add, `MergedTwice`                |
/// | update   | `MergedTwice`  | -                  | add, `MergedOnce`                 |
/// | update   | `Unmerged`     | larger             | overwrite, stays `Unmerged`       |
/// | update   | `Unmerged`     | equal or smaller   | unchanged                         |
pub fn plan(path: IngestPath, existing: Option<&PlayTotals>, observed: i64) -> PlayMutation {
    let current = match existing {
        Some(c) => c,
        None => {
            return PlayMutation::Insert {
                play_count: observed,
                merge_state: MergeState::Unmerged,
            }
        }
    };

    match path {
        // Both pages of a first pass can list the same game; fold them.
        IngestPath::Creation => PlayMutation::Increment {
            by: observed,
            merge_state: MergeState::MergedOnce,
        },
        IngestPath::Update => match current.merge_state {
            MergeState::MergedOnce => PlayMutation::Increment {
                by: observed,
                merge_state: MergeState::MergedTwice,
            },
            MergeState::MergedTwice => PlayMutation::Increment {
                by: observed,
                merge_state: MergeState::MergedOnce,
            },
            MergeState::Unmerged if observed > current.play_count => PlayMutation::Overwrite {
                play_count: observed,
            },
            MergeState::Unmerged => PlayMutation::Unchanged,
        },
    }
}
