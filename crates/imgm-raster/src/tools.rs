// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Small numeric helpers shared by the filters.

/// Median of `values`, sorting the slice in place.
///
/// Odd counts return the middle element; even counts return the truncated
/// average of the two middle elements. An empty slice yields 0.
pub fn median(values: &mut [u8]) -> u8 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        ((u16::from(values[mid - 1]) + u16::from(values[mid])) / 2) as u8
    } else {
        values[mid]
    }
}
