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

//! [syslog-header](crate) errors

use backtrace::Backtrace;

/// [syslog-header](crate) error type
///
/// Like its sibling crates, [syslog-header](crate) eschews libraries like [thiserror] & [anyhow]
/// in favor of a straightforward enumeration with a few match arms chosen on the basis what the
/// caller will need to respond. Every configuration failure is permanent for the converter
/// instance that produced it; the caller may build a new one with corrected configuration.
///
/// [thiserror]: https://docs.rs/thiserror
/// [anyhow]: https://docs.rs/anyhow
#[non_exhaustive]
pub enum Error {
    /// No facility option was supplied at startup
    MissingFacility { back: Backtrace },
    /// The facility option named no known syslog facility
    UnknownFacility { name: String, back: Backtrace },
    /// The timestamp pattern could not be compiled
    PatternInit {
        pattern: &'static str,
        back: Backtrace,
    },
    /// A header was requested from a converter that isn't started
    NotReady {
        state: &'static str,
        back: Backtrace,
    },
    /// Neither a hostname nor a local IP address could be had for the source name
    NoSourceName {
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        back: Backtrace,
    },
}

impl std::fmt::Display for Error {
    // `Error` is non-exhaustive so that adding variants won't be a breaking change to our
    // callers. That means the compiler won't catch us if we miss a variant here, so we
    // always include a `_` arm.
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingFacility { .. } => {
                write!(f, "Was expecting a facility string as an option")
            }
            Error::UnknownFacility { name, .. } => {
                write!(f, "{:?} is not a known syslog facility", name)
            }
            Error::PatternInit { pattern, .. } => {
                write!(f, "Could not compile the timestamp pattern {:?}", pattern)
            }
            Error::NotReady { state, .. } => write!(
                f,
                "Header requested from a converter in state {}; it must be started first",
                state
            ),
            Error::NoSourceName { source, .. } => write!(
                f,
                "While attempting to derive a source name for this host, got {}",
                source
            ),
            _ => write!(f, "Other syslog-header error"),
        }
    }
}

impl std::fmt::Debug for Error {
    #[allow(unreachable_patterns)]
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::MissingFacility { back } => write!(f, "{}\n{:?}", self, back),
            Error::UnknownFacility { name: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::PatternInit { pattern: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::NotReady { state: _, back } => write!(f, "{}\n{:?}", self, back),
            Error::NoSourceName { source: _, back } => write!(f, "{}\n{:?}", self, back),
            err => write!(f, "syslog-header error: {}", err),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
