// Copyright (C) 2022 Michael Herstine <sp1ff@pobox.com>
//
// This file is part of syslog-header.
//
// syslog-header is free software: you can redistribute it and/or modify it under the terms of the
// GNU General Public License as published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// syslog-header is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without
// even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU
// General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with syslog-header.  If
// not, see <http://www.gnu.org/licenses/>.

//! RFC 3164 timestamps, cached to the second.
//!
//! # Introduction
//!
//! RFC [3164] timestamps look like `Mmm dd hh:mm:ss`: an English month abbreviation, the day of
//! the month padded with a space (not a zero) to width two, and a 24-hour clock. Since the
//! finest granularity is the second, any two instants within the same second render identically,
//! so [`TimestampCache`] remembers the last second it formatted & the resulting text, and only
//! does the date arithmetic when an event lands in a new second.
//!
//! [3164]: https://datatracker.ietf.org/doc/html/rfc3164#section-4.1.2
//!
//! # Examples
//!
//! ```rust
//! use syslog_header::timestamp::{TimestampCache, Zone};
//! let cache = TimestampCache::new(Zone::Utc).unwrap();
//! assert_eq!(cache.format(1_678_349_107_250), "Mar  9 08:05:07");
//! ```

use crate::error::{Error, Result};

use backtrace::Backtrace;
use chrono::format::{Item, StrftimeItems};
use chrono::prelude::*;
use tracing::warn;

use std::sync::{Mutex, PoisonError};

/// `%b` is always English in chrono (absent the `unstable-locales` feature), and `%e` is the
/// space-padded day of month.
pub const RFC3164_PATTERN: &str = "%b %e %H:%M:%S";

/// The time zone in which timestamps are rendered
///
/// RFC 3164 doesn't say; in practice senders use their local time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Zone {
    /// Whatever zone the host process is running in
    #[default]
    Local,
    /// Coordinated Universal Time
    Utc,
    /// A fixed offset from UTC
    Fixed(FixedOffset),
}

struct State {
    /// The epoch second `text` was computed for; `None` until the first call
    last_second: Option<i64>,
    text: String,
    recomputations: u64,
}

/// Thread-safe, per-second cache of formatted RFC 3164 timestamps
///
/// The (second, text) pair sits behind a single [`Mutex`] held only for the check-and-maybe-
/// recompute sequence in [`TimestampCache::format`], so callers never see text belonging to a
/// different second, and of several callers arriving within the same new second only the first
/// does the formatting.
pub struct TimestampCache {
    items: Vec<Item<'static>>,
    zone: Zone,
    state: Mutex<State>,
}

impl TimestampCache {
    pub fn new(zone: Zone) -> Result<TimestampCache> {
        TimestampCache::with_pattern(RFC3164_PATTERN, zone)
    }
    /// Build a cache formatting with an arbitrary [strftime]-style `pattern`
    ///
    /// Fails with [`Error::PatternInit`] if `pattern` doesn't compile. The pattern must not
    /// contain anything finer than seconds, or cached results will be wrong.
    ///
    /// [strftime]: https://docs.rs/chrono/latest/chrono/format/strftime/index.html
    pub fn with_pattern(pattern: &'static str, zone: Zone) -> Result<TimestampCache> {
        let items: Vec<Item<'static>> = StrftimeItems::new(pattern).collect();
        if items.iter().any(|item| matches!(item, Item::Error)) {
            return Err(Error::PatternInit {
                pattern,
                back: Backtrace::new(),
            });
        }
        Ok(TimestampCache {
            items,
            zone,
            state: Mutex::new(State {
                last_second: None,
                text: String::new(),
                recomputations: 0,
            }),
        })
    }
    pub fn zone(&self) -> Zone {
        self.zone
    }
    /// Format `epoch_millis` (milliseconds since the Unix epoch) to second precision
    ///
    /// A timestamp chrono can't represent is rendered as the current time, and is not cached.
    pub fn format(&self, epoch_millis: i64) -> String {
        let utc = match Utc.timestamp_millis_opt(epoch_millis).single() {
            Some(utc) => utc,
            None => {
                warn!(
                    "Timestamp {}ms is out of range; formatting the current time instead",
                    epoch_millis
                );
                return self.render(Utc::now());
            }
        };
        let second = epoch_millis.div_euclid(1000);
        // The pair is only ever written together, so a panic elsewhere can't leave it torn.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.last_second != Some(second) {
            state.text = self.render(utc);
            state.last_second = Some(second);
            state.recomputations += 1;
        }
        state.text.clone()
    }
    /// Number of times the cache has actually formatted a timestamp
    pub fn recomputations(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recomputations
    }
    fn render(&self, utc: DateTime<Utc>) -> String {
        match self.zone {
            Zone::Local => utc
                .with_timezone(&Local)
                .format_with_items(self.items.iter())
                .to_string(),
            Zone::Utc => utc.format_with_items(self.items.iter()).to_string(),
            Zone::Fixed(offset) => utc
                .with_timezone(&offset)
                .format_with_items(self.items.iter())
                .to_string(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> i64 {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_format() {
        let cache = TimestampCache::new(Zone::Utc).unwrap();
        assert_eq!(cache.format(millis(2023, 3, 9, 8, 5, 7)), "Mar  9 08:05:07");
        assert_eq!(cache.format(millis(2023, 3, 19, 8, 5, 7)), "Mar 19 08:05:07");
        assert_eq!(cache.format(millis(2022, 12, 31, 23, 59, 59)), "Dec 31 23:59:59");
        assert_eq!(cache.format(0), "Jan  1 00:00:00");
        // Floor, not truncation toward zero
        assert_eq!(cache.format(-1), "Dec 31 23:59:59");

        let _local = TimestampCache::new(Zone::default()).unwrap(); // At least exercise it
    }

    #[test]
    fn test_fixed_offset() {
        let cache =
            TimestampCache::new(Zone::Fixed(FixedOffset::east_opt(8 * 3600).unwrap())).unwrap();
        assert_eq!(cache.format(millis(2023, 3, 9, 20, 5, 7)), "Mar 10 04:05:07");
    }

    #[test]
    fn test_cache_hits() {
        let cache = TimestampCache::new(Zone::Utc).unwrap();
        let base = millis(2023, 3, 9, 8, 5, 7);
        let first = cache.format(base);
        for ms in [1, 250, 999] {
            assert_eq!(cache.format(base + ms), first);
        }
        assert_eq!(cache.recomputations(), 1);

        // A new second is never served stale text...
        assert_eq!(cache.format(base + 1000), "Mar  9 08:05:08");
        assert_eq!(cache.recomputations(), 2);
        // and only the last second is remembered.
        assert_eq!(cache.format(base), first);
        assert_eq!(cache.recomputations(), 3);
    }

    #[test]
    fn test_out_of_range() {
        let cache = TimestampCache::new(Zone::Utc).unwrap();
        let base = millis(2023, 3, 9, 8, 5, 7);
        assert_eq!(cache.format(base), "Mar  9 08:05:07");
        let _x = cache.format(i64::MAX);
        let _x = cache.format(i64::MAX);
        // Nothing was cached for the bad timestamp, and the good second is still in place.
        assert_eq!(cache.recomputations(), 1);
        assert_eq!(cache.format(base + 500), "Mar  9 08:05:07");
        assert_eq!(cache.recomputations(), 1);
    }

    /// A subscriber that, like a syslog sink, formats a timestamp for every event it receives
    struct TimestampingSubscriber {
        cache: Arc<TimestampCache>,
        events: Arc<AtomicUsize>,
    }

    impl tracing::Subscriber for TimestampingSubscriber {
        fn enabled(&self, _metadata: &tracing::Metadata<'_>) -> bool {
            true
        }
        fn new_span(&self, _span: &tracing::span::Attributes<'_>) -> tracing::span::Id {
            tracing::span::Id::from_u64(1)
        }
        fn record(&self, _span: &tracing::span::Id, _values: &tracing::span::Record<'_>) {}
        fn record_follows_from(&self, _span: &tracing::span::Id, _follows: &tracing::span::Id) {}
        fn event(&self, _event: &tracing::Event<'_>) {
            let _x = self.cache.format(0);
            self.events.fetch_add(1, Ordering::SeqCst);
        }
        fn enter(&self, _span: &tracing::span::Id) {}
        fn exit(&self, _span: &tracing::span::Id) {}
    }

    #[test]
    fn test_warning_reenters_cache() {
        let cache = Arc::new(TimestampCache::new(Zone::Utc).unwrap());
        let events = Arc::new(AtomicUsize::new(0));
        let subscriber = TimestampingSubscriber {
            cache: cache.clone(),
            events: events.clone(),
        };
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let text = tracing::subscriber::with_default(subscriber, || cache.format(i64::MAX));
            let _x = tx.send(text);
        });
        let text = rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .expect("formatting an out-of-range timestamp under a subscriber hung");
        assert!(!text.is_empty());
        assert_eq!(events.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_bad_pattern() {
        assert!(matches!(
            TimestampCache::with_pattern("%b %Q", Zone::Utc),
            Err(Error::PatternInit { .. })
        ));
    }

    #[test]
    fn test_concurrent_same_second() {
        let cache = TimestampCache::new(Zone::Utc).unwrap();
        let base = millis(2023, 3, 9, 8, 5, 7);
        let results: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let cache = &cache;
                    s.spawn(move || {
                        (0..100)
                            .map(|j| cache.format(base + (i * 37 + j) % 1000))
                            .collect::<Vec<String>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        assert_eq!(results.len(), 1600);
        assert!(results.iter().all(|x| x == "Mar  9 08:05:07"));
        assert_eq!(cache.recomputations(), 1);
    }

    #[test]
    fn test_concurrent_changing_seconds() {
        // Callers racing across second boundaries must always get text matching their own second.
        let cache = TimestampCache::new(Zone::Utc).unwrap();
        let base = millis(2023, 3, 9, 8, 5, 0);
        std::thread::scope(|s| {
            for i in 0..8i64 {
                let cache = &cache;
                s.spawn(move || {
                    for j in 0..200i64 {
                        let sec = (i + j) % 10;
                        let got = cache.format(base + sec * 1000 + j % 1000);
                        assert_eq!(got, format!("Mar  9 08:05:{:02}", sec));
                    }
                });
            }
        });
    }
}
