//! Level-to-bar lookup tables
//!
//! Forty ascending thresholds split the level range into forty-one
//! buckets. Bucket `i` covers `[THRESHOLDS[i - 1], THRESHOLDS[i])`;
//! levels below the first threshold land in bucket 0 and levels at or
//! above the last one in bucket 40. Buckets are inclusive-low and
//! exclusive-high, so a level equal to a threshold opens the next bucket.
//!
//! Each bar is `\r[` + 20 characters + `]` with no newline, so a
//! terminal redraws it in place. Bucket `k` shows `k / 2` full cells
//! (`|`) plus a half cell (`:`) when `k` is odd.

use crate::filter::Level;

/// Number of buckets
pub const BUCKETS: usize = 41;

/// Number of cells between the brackets
pub const BAR_WIDTH: usize = 20;

/// Length of every bar in bytes (`\r`, brackets, cells)
pub const BAR_LEN: usize = BAR_WIDTH + 3;

/// Lower bounds of buckets 1..=40
pub const THRESHOLDS: [Level; BUCKETS - 1] = [
    19, 38, 56, 75, 94, 113, 131, 150, 169, 188,
    206, 225, 244, 263, 281, 300, 319, 338, 356, 375,
    394, 413, 431, 450, 469, 488, 506, 525, 544, 563,
    581, 600, 619, 638, 656, 675, 694, 713, 731, 750,
];

/// Bar for each bucket
pub const BARS: [&str; BUCKETS] = [
    "\r[....................]",
    "\r[:...................]",
    "\r[|...................]",
    "\r[|:..................]",
    "\r[||..................]",
    "\r[||:.................]",
    "\r[|||.................]",
    "\r[|||:................]",
    "\r[||||................]",
    "\r[||||:...............]",
    "\r[|||||...............]",
    "\r[|||||:..............]",
    "\r[||||||..............]",
    "\r[||||||:.............]",
    "\r[|||||||.............]",
    "\r[|||||||:............]",
    "\r[||||||||............]",
    "\r[||||||||:...........]",
    "\r[|||||||||...........]",
    "\r[|||||||||:..........]",
    "\r[||||||||||..........]",
    "\r[||||||||||:.........]",
    "\r[|||||||||||.........]",
    "\r[|||||||||||:........]",
    "\r[||||||||||||........]",
    "\r[||||||||||||:.......]",
    "\r[|||||||||||||.......]",
    "\r[|||||||||||||:......]",
    "\r[||||||||||||||......]",
    "\r[||||||||||||||:.....]",
    "\r[|||||||||||||||.....]",
    "\r[|||||||||||||||:....]",
    "\r[||||||||||||||||....]",
    "\r[||||||||||||||||:...]",
    "\r[|||||||||||||||||...]",
    "\r[|||||||||||||||||:..]",
    "\r[||||||||||||||||||..]",
    "\r[||||||||||||||||||:.]",
    "\r[|||||||||||||||||||.]",
    "\r[|||||||||||||||||||:]",
    "\r[||||||||||||||||||||]",
];

/// Bucket index for a level
pub fn bucket_for(level: Level) -> usize {
    THRESHOLDS.partition_point(|&threshold| threshold <= level)
}

/// Bar for a level
pub fn bar_for(level: Level) -> &'static str {
    BARS[bucket_for(level)]
}
