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

//! syslog facility & level definitions, and the PRI computation.
//!
//! [`Facility`] and [`Level`] replicate the names used in `<syslog.h>`. Unlike `<syslog.h>`,
//! [`Facility`] values are the bare facility codes (0-23) rather than codes pre-multiplied by 8;
//! [`encode`] does the multiplication when the PRI value is formed.

use crate::error::{Error, Result};

use backtrace::Backtrace;

type StdResult<T, E> = std::result::Result<T, E>;

/// RFC [3164] defines twenty-four facilities for messages, numbered zero through
/// twenty-three. The enumeration names duplicate the constants defined in `<syslog.h>`.
///
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164#section-4.1.1
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Facility {
    /// kernel messages
    LOG_KERN = 0,
    /// random user-level messages
    LOG_USER = 1,
    /// mail system
    LOG_MAIL = 2,
    /// system daemons
    LOG_DAEMON = 3,
    /// security/authorization messages
    LOG_AUTH = 4,
    /// messages generated internally by syslogd
    LOG_SYSLOG = 5,
    /// line printer subsystem
    LOG_LPR = 6,
    /// network news subsystem
    LOG_NEWS = 7,
    /// UUCP subsystem
    LOG_UUCP = 8,
    /// clock daemon
    LOG_CRON = 9,
    /// security/authorization messages (private)
    LOG_AUTHPRIV = 10,
    /// ftp daemon
    LOG_FTP = 11,
    /// NTP subsystem
    LOG_NTP = 12,
    /// log audit
    LOG_AUDIT = 13,
    /// log alert
    LOG_ALERT = 14,
    /// clock daemon (note 2)
    LOG_CLOCK = 15,
    /// reserved for local use
    LOG_LOCAL0 = 16,
    /// reserved for local use
    LOG_LOCAL1 = 17,
    /// reserved for local use
    LOG_LOCAL2 = 18,
    /// reserved for local use
    LOG_LOCAL3 = 19,
    /// reserved for local use
    LOG_LOCAL4 = 20,
    /// reserved for local use
    LOG_LOCAL5 = 21,
    /// reserved for local use
    LOG_LOCAL6 = 22,
    /// reserved for local use
    LOG_LOCAL7 = 23,
}

/// Facility names as they appear in configuration, without the `LOG_` prefix.
const FACILITY_NAMES: [(&str, Facility); 24] = [
    ("KERN", Facility::LOG_KERN),
    ("USER", Facility::LOG_USER),
    ("MAIL", Facility::LOG_MAIL),
    ("DAEMON", Facility::LOG_DAEMON),
    ("AUTH", Facility::LOG_AUTH),
    ("SYSLOG", Facility::LOG_SYSLOG),
    ("LPR", Facility::LOG_LPR),
    ("NEWS", Facility::LOG_NEWS),
    ("UUCP", Facility::LOG_UUCP),
    ("CRON", Facility::LOG_CRON),
    ("AUTHPRIV", Facility::LOG_AUTHPRIV),
    ("FTP", Facility::LOG_FTP),
    ("NTP", Facility::LOG_NTP),
    ("AUDIT", Facility::LOG_AUDIT),
    ("ALERT", Facility::LOG_ALERT),
    ("CLOCK", Facility::LOG_CLOCK),
    ("LOCAL0", Facility::LOG_LOCAL0),
    ("LOCAL1", Facility::LOG_LOCAL1),
    ("LOCAL2", Facility::LOG_LOCAL2),
    ("LOCAL3", Facility::LOG_LOCAL3),
    ("LOCAL4", Facility::LOG_LOCAL4),
    ("LOCAL5", Facility::LOG_LOCAL5),
    ("LOCAL6", Facility::LOG_LOCAL6),
    ("LOCAL7", Facility::LOG_LOCAL7),
];

impl Facility {
    /// The facility code, in the range 0-23
    pub fn code(self) -> u8 {
        self as u8
    }
    /// The configuration name of this facility (e.g. "LOCAL0")
    pub fn name(self) -> &'static str {
        FACILITY_NAMES[self as usize].0
    }
}

impl std::default::Default for Facility {
    /// The default facility is `LOG_USER`.
    fn default() -> Self {
        Facility::LOG_USER
    }
}

impl std::fmt::Display for Facility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(f, "LOG_{}", self.name())
    }
}

/// Resolve a facility name, as it would appear in configuration.
///
/// Matching is case-insensitive & accepts either the RFC name ("local0") or the `<syslog.h>`
/// name ("LOG_LOCAL0"). A name that matches nothing is rejected rather than defaulted.
impl std::str::FromStr for Facility {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::MissingFacility {
                back: Backtrace::new(),
            });
        }
        let upper = s.to_ascii_uppercase();
        let bare = upper.strip_prefix("LOG_").unwrap_or(&upper);
        FACILITY_NAMES
            .iter()
            .find(|(name, _)| *name == bare)
            .map(|(_, facility)| *facility)
            .ok_or_else(|| Error::UnknownFacility {
                name: s.to_string(),
                back: Backtrace::new(),
            })
    }
}

/// RFC [3164] defines eight severity levels for messages. The enumeration values duplicate the
/// constants documented as per the `syslog()` manual [page] & defined in `<syslog.h>`.
///
/// [3164]: https://datatracker.ietf.org/doc/html/rfc3164
/// [page]: https://man7.org/linux/man-pages/man3/syslog.3.html
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    /// system is unusable
    LOG_EMERG,
    /// action must be take immediately
    LOG_ALERT,
    /// critical conditions
    LOG_CRIT,
    /// error conditions
    LOG_ERR,
    /// warning conditions
    LOG_WARNING,
    /// normal, but significant condition
    LOG_NOTICE,
    /// informational message
    LOG_INFO,
    /// debug-level message
    LOG_DEBUG,
}

impl Level {
    /// The severity code, in the range 0-7
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> StdResult<(), std::fmt::Error> {
        write!(
            f,
            "{}",
            match self {
                Level::LOG_EMERG => "LOG_EMERG",
                Level::LOG_ALERT => "LOG_ALERT",
                Level::LOG_CRIT => "LOG_CRIT",
                Level::LOG_ERR => "LOG_ERR",
                Level::LOG_WARNING => "LOG_WARNING",
                Level::LOG_NOTICE => "LOG_NOTICE",
                Level::LOG_INFO => "LOG_INFO",
                Level::LOG_DEBUG => "LOG_DEBUG",
            }
        )
    }
}

impl std::convert::TryFrom<u8> for Level {
    type Error = u8;
    fn try_from(x: u8) -> StdResult<Self, Self::Error> {
        Ok(match x {
            0 => Level::LOG_EMERG,
            1 => Level::LOG_ALERT,
            2 => Level::LOG_CRIT,
            3 => Level::LOG_ERR,
            4 => Level::LOG_WARNING,
            5 => Level::LOG_NOTICE,
            6 => Level::LOG_INFO,
            7 => Level::LOG_DEBUG,
            _ => return Err(x),
        })
    }
}

/// Map [`tracing`] levels onto syslog severities
///
/// [`tracing`]: https://docs.rs/tracing/latest/tracing/index.html
impl std::convert::From<&tracing::Level> for Level {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::LOG_DEBUG,
            tracing::Level::INFO => Level::LOG_INFO,
            tracing::Level::WARN => Level::LOG_WARNING,
            tracing::Level::ERROR => Level::LOG_ERR,
        }
    }
}

/// Form a PRI value from a facility code & a severity.
///
/// No range checking is done here: facility codes are validated when the facility is resolved &
/// severities are the caller's responsibility.
pub fn encode(facility_code: u8, severity: u8) -> u16 {
    facility_code as u16 * 8 + severity as u16
}

/// Form the PRI value for `facility` & `level`; always fits in a `u8` (at most 191).
pub fn priority(facility: Facility, level: Level) -> u8 {
    encode(facility.code(), level.code()) as u8
}
