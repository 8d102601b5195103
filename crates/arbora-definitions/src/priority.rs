// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Label priority ordering.

Labels are ranked by their registration index in a definition. Labels that were
never registered rank after every registered label; ties break alphabetically.
The last label in priority order has the final say when merging.
*/

/// Registration index of `label`, or `registered.len()` for unknown labels.
pub fn priority_index<S: AsRef<str>>(registered: &[S], label: &str) -> usize {
    registered
        .iter()
        .position(|candidate| candidate.as_ref() == label)
        .unwrap_or(registered.len())
}

/// Deduplicated `labels` in ascending priority.
pub fn sort_by_priority<'a, S, L>(registered: &[S], labels: &'a [L]) -> Vec<&'a str>
where
    S: AsRef<str>,
    L: AsRef<str>,
{
    let mut sorted: Vec<&str> = labels.iter().map(AsRef::as_ref).collect();
    sorted.sort_by_cached_key(|label| (priority_index(registered, label), *label));
    sorted.dedup();
    sorted
}
