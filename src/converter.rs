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

//! Assembling RFC 3164 headers
//! ===========================
//!
//! # Introduction
//!
//! An RFC [3164] packet begins with a header: the PRI value in angle brackets, a timestamp, and
//! the name of the source. This module produces that header, leaving the message body to the
//! caller, who appends it directly (the header ends in a space):
//!
//! ```text
//! <131> Mar  9 08:05:07 host-42 
//! ```
//!
//! [3164]: https://datatracker.ietf.org/doc/html/rfc3164
//!
//! # Lifecycle
//!
//! A [`HeaderAssembler`] is configured with a facility name and then [started]; starting resolves
//! the facility & compiles the timestamp pattern, and any failure there is permanent for that
//! instance. Once started the facility is fixed; the source name, on the other hand, is read
//! afresh from the [`SourceName`] handle on every event.
//!
//! [started]: Converter::start
//!
//! ```rust
//! use syslog_header::converter::{Converter, HeaderAssembler, LogEvent};
//! use syslog_header::facility::Level;
//! use syslog_header::source::SourceName;
//! use syslog_header::timestamp::Zone;
//!
//! let source = SourceName::new("host-42");
//! let mut conv = HeaderAssembler::builder()
//!     .facility("LOCAL0")
//!     .zone(Zone::Utc)
//!     .source(source.clone())
//!     .build();
//! conv.start().unwrap();
//!
//! let event = LogEvent::new(Level::LOG_ERR, 1_678_349_107_000);
//! assert_eq!(conv.convert(&event).unwrap(), "<131> Mar  9 08:05:07 host-42 ");
//!
//! source.set("host-43");
//! assert_eq!(conv.convert(&event).unwrap(), "<131> Mar  9 08:05:07 host-43 ");
//! ```

use crate::error::{Error, Result};
use crate::facility::{priority, Facility, Level};
use crate::source::SourceName;
use crate::timestamp::{TimestampCache, Zone};

use backtrace::Backtrace;
use tracing::{debug, error};

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                            events                                              //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// What a header needs to know about a log event
pub trait SyslogEvent {
    fn level(&self) -> Level;
    /// Milliseconds since the Unix epoch
    fn timestamp_millis(&self) -> i64;
}

/// A plain [`SyslogEvent`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LogEvent {
    pub level: Level,
    pub timestamp_millis: i64,
}

impl LogEvent {
    pub fn new(level: Level, timestamp_millis: i64) -> LogEvent {
        LogEvent {
            level,
            timestamp_millis,
        }
    }
    /// An event at `level`, stamped with the current time
    pub fn now(level: Level) -> LogEvent {
        LogEvent::new(level, chrono::Utc::now().timestamp_millis())
    }
}

impl SyslogEvent for LogEvent {
    fn level(&self) -> Level {
        self.level
    }
    fn timestamp_millis(&self) -> i64 {
        self.timestamp_millis
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
//                                          converters                                            //
////////////////////////////////////////////////////////////////////////////////////////////////////

/// Operations all header converters must support
pub trait Converter {
    /// Validate configuration & prepare to convert events; failures are permanent
    fn start(&mut self) -> Result<()>;
    /// Produce the header for `event`
    fn convert(&self, event: &dyn SyslogEvent) -> Result<String>;
    fn stop(&mut self);
    fn is_started(&self) -> bool;
}

/// A validated configuration, ready to format headers
pub struct Ready {
    facility: Facility,
    cache: TimestampCache,
}

impl Ready {
    /// Resolve `facility_option` & compile the timestamp pattern for `zone`
    ///
    /// An absent or blank option fails with [`Error::MissingFacility`], a name that isn't a
    /// syslog facility with [`Error::UnknownFacility`].
    pub fn initialize(facility_option: Option<&str>, zone: Zone) -> Result<Ready> {
        let facility = facility_option
            .ok_or_else(|| Error::MissingFacility {
                back: Backtrace::new(),
            })?
            .parse::<Facility>()?;
        Ok(Ready {
            facility,
            cache: TimestampCache::new(zone)?,
        })
    }
    pub fn facility(&self) -> Facility {
        self.facility
    }
    /// Format `<PRI> Mmm dd hh:mm:ss SOURCE ` for an event at `level` & `epoch_millis`
    pub fn format_header(&self, level: Level, epoch_millis: i64, source: &str) -> String {
        format!(
            "<{}> {} {} ",
            priority(self.facility, level),
            self.cache.format(epoch_millis),
            source
        )
    }
}

/// Where a [`HeaderAssembler`] is in its lifecycle
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Uninitialized,
    Ready,
    Failed,
    Stopped,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Status {
    fn name(self) -> &'static str {
        match self {
            Status::Uninitialized => "Uninitialized",
            Status::Ready => "Ready",
            Status::Failed => "Failed",
            Status::Stopped => "Stopped",
        }
    }
}

enum State {
    Uninitialized,
    Ready(Ready),
    Failed,
    Stopped,
}

/// A [`Converter`] producing RFC 3164 headers
///
/// Once started, a [`HeaderAssembler`] may be shared between threads; the only state it mutates
/// per event is its [`TimestampCache`].
pub struct HeaderAssembler {
    facility_option: Option<String>,
    zone: Zone,
    source: SourceName,
    state: State,
}

impl HeaderAssembler {
    pub fn new<S: Into<String>>(facility: S, source: SourceName) -> HeaderAssembler {
        HeaderAssembler::builder()
            .facility(facility)
            .source(source)
            .build()
    }
    pub fn builder() -> HeaderAssemblerBuilder {
        HeaderAssemblerBuilder {
            imp: HeaderAssembler {
                facility_option: None,
                zone: Zone::default(),
                source: SourceName::default(),
                state: State::Uninitialized,
            },
        }
    }
    pub fn status(&self) -> Status {
        match self.state {
            State::Uninitialized => Status::Uninitialized,
            State::Ready(_) => Status::Ready,
            State::Failed => Status::Failed,
            State::Stopped => Status::Stopped,
        }
    }
    /// The handle through which this converter reads its source name
    pub fn source(&self) -> &SourceName {
        &self.source
    }
    fn ready(&self) -> Result<&Ready> {
        match &self.state {
            State::Ready(ready) => Ok(ready),
            _ => Err(Error::NotReady {
                state: self.status().name(),
                back: Backtrace::new(),
            }),
        }
    }
    /// Format the header for an event at `level` & `epoch_millis` from `source`
    ///
    /// Fails with [`Error::NotReady`] unless this converter has been successfully started.
    pub fn format_header(&self, level: Level, epoch_millis: i64, source: &str) -> Result<String> {
        Ok(self.ready()?.format_header(level, epoch_millis, source))
    }
}

impl Converter for HeaderAssembler {
    fn start(&mut self) -> Result<()> {
        match self.state {
            State::Ready(_) => return Ok(()),
            State::Uninitialized => (),
            State::Failed | State::Stopped => {
                return Err(Error::NotReady {
                    state: self.status().name(),
                    back: Backtrace::new(),
                })
            }
        }
        match Ready::initialize(self.facility_option.as_deref(), self.zone) {
            Ok(ready) => {
                debug!(
                    "Started syslog header converter with facility {}",
                    ready.facility()
                );
                self.state = State::Ready(ready);
                Ok(())
            }
            Err(err) => {
                error!("Syslog header converter failed to start: {}", err);
                self.state = State::Failed;
                Err(err)
            }
        }
    }
    fn convert(&self, event: &dyn SyslogEvent) -> Result<String> {
        let ready = self.ready()?;
        Ok(ready.format_header(
            event.level(),
            event.timestamp_millis(),
            &self.source.get(),
        ))
    }
    fn stop(&mut self) {
        if let State::Ready(_) = self.state {
            debug!("Stopped syslog header converter");
            self.state = State::Stopped;
        }
    }
    fn is_started(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }
}

pub struct HeaderAssemblerBuilder {
    imp: HeaderAssembler,
}

impl HeaderAssemblerBuilder {
    /// Name the syslog facility (e.g. "LOCAL0"); resolved when the converter is started
    pub fn facility<S: Into<String>>(mut self, facility: S) -> Self {
        self.imp.facility_option = Some(facility.into());
        self
    }
    pub fn zone(mut self, zone: Zone) -> Self {
        self.imp.zone = zone;
        self
    }
    pub fn source(mut self, source: SourceName) -> Self {
        self.imp.source = source;
        self
    }
    pub fn build(self) -> HeaderAssembler {
        self.imp
    }
}
