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
//! Formatting the header of [RFC 3164] syslog messages
//!
//! [RFC 3164]: https://datatracker.ietf.org/doc/html/rfc3164
//!
//! # Introduction
//!
//! A BSD-style syslog packet opens with a short header: a priority value combining the
//! "facility" (which subsystem is talking) with the "severity" of the message, a timestamp to the
//! second, and the name of the source host or application. Everything after that is the message
//! body. This crate produces exactly that header, and nothing else: capturing events, formatting
//! their bodies & shipping the result to a daemon are left to the surrounding logging setup.
//!
//! ```text
//! <131> Mar  9 08:05:07 host-42 
//! ```
//!
//! Two details make it a little more than a `format!` call:
//!
//! 1. Formatting a date is comparatively expensive, and a busy application will log many events
//!    within the same second. [`timestamp::TimestampCache`] remembers the last second it
//!    rendered and is safe to share among any number of logging threads.
//!
//! 2. The source name may legitimately change while the application runs (a device learning its
//!    own name, for instance). Rather than fix it at startup, the header reads it from a
//!    [`source::SourceName`] handle on every event.
//!
//! # Usage
//!
//! ```rust
//! use syslog_header::converter::{Converter, HeaderAssembler, LogEvent};
//! use syslog_header::facility::Level;
//! use syslog_header::source::SourceName;
//!
//! let source = SourceName::try_default().unwrap_or_default();
//! let mut conv = HeaderAssembler::new("USER", source.clone());
//! conv.start().unwrap();
//!
//! let header = conv.convert(&LogEvent::now(Level::LOG_INFO)).unwrap();
//! assert!(header.starts_with("<14> "));
//! ```
//!
//! Timestamps are rendered in the host's local time zone unless the converter is built with
//! another [`timestamp::Zone`].

pub mod converter;
pub mod error;
pub mod facility;
pub mod source;
pub mod timestamp;
