//! Batched duration lookup.

use std::collections::HashMap;

use tubemirror_core::{naming, PlaylistSource};

use crate::error::SyncError;

/// Most video ids sent in one duration lookup.
pub const DURATION_BATCH_SIZE: usize = 20;

/// Resolve durations, in seconds, for `video_ids`.
///
/// Ids the source does not return are absent from the map; callers treat them
/// as 0.
pub fn resolve_durations<S>(source: &S, video_ids: &[String]) -> Result<HashMap<String, u64>, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    resolve_in_batches(source, video_ids, DURATION_BATCH_SIZE)
}

pub(crate) fn resolve_in_batches<S>(
    source: &S,
    video_ids: &[String],
    batch_size: usize,
) -> Result<HashMap<String, u64>, SyncError>
where
    S: PlaylistSource + ?Sized,
{
    let mut durations = HashMap::with_capacity(video_ids.len());
    for batch in video_ids.chunks(batch_size.max(1)) {
        for entry in source.video_durations(batch)? {
            durations.insert(entry.video_id, naming::parse_duration(&entry.duration));
        }
    }
    if durations.len() < video_ids.len() {
        tracing::debug!(
            "no duration for {} of {} videos",
            video_ids.len() - durations.len(),
            video_ids.len()
        );
    }
    Ok(durations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubemirror_core::{MemorySource, SourceRequest};

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("v{i}")).collect()
    }

    #[test]
    fn splits_into_fixed_size_batches() {
        let source = MemorySource::new();
        resolve_durations(&source, &ids(45)).unwrap();

        let sizes: Vec<usize> = source
            .requests()
            .into_iter()
            .map(|r| match r {
                SourceRequest::Durations { video_ids } => video_ids.len(),
                other => panic!("unexpected request {other:?}"),
            })
            .collect();
        assert_eq!(sizes, vec![20, 20, 5]);
    }

    #[test]
    fn no_ids_means_no_requests() {
        let source = MemorySource::new();
        let found = resolve_durations(&source, &[]).unwrap();
        assert!(found.is_empty());
        assert!(source.requests().is_empty());
    }

    #[test]
    fn parses_and_merges_across_batches() {
        let source = MemorySource::new()
            .with_duration("v0", "PT1M")
            .with_duration("v3", "PT1H45M29S")
            .with_duration("v4", "nonsense");
        let found = resolve_in_batches(&source, &ids(5), 2).unwrap();

        assert_eq!(found.get("v0"), Some(&60));
        assert_eq!(found.get("v3"), Some(&6329));
        assert_eq!(found.get("v4"), Some(&0));
        assert_eq!(found.get("v1"), None);
        assert_eq!(source.requests().len(), 3);
    }
}
