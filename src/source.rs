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

//! The source name that follows the timestamp in each header.
//!
//! The source name is owned by the application, which may change it at any time (when the device
//! learns its name, say). [`SourceName`] is a shared handle on that value: the application keeps
//! one clone & calls [`SourceName::set`], the converter keeps another & reads the current value
//! on every event.

use crate::error::{Error, Result};

use backtrace::Backtrace;

use std::sync::{Arc, PoisonError, RwLock};

/// Shared, live-updatable source name
#[derive(Clone, Debug)]
pub struct SourceName(Arc<RwLock<String>>);

impl SourceName {
    pub fn new<S: Into<String>>(name: S) -> SourceName {
        SourceName(Arc::new(RwLock::new(name.into())))
    }
    /// Replace the source name; every header formatted afterward will carry `name`
    pub fn set<S: Into<String>>(&self, name: S) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = name.into();
    }
    pub fn get(&self) -> String {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
    /// Remove the domain (if any) from a host name
    fn strip_domain(mut name: String) -> String {
        if let Some(idx) = name.find('.') {
            name.truncate(idx);
        }
        name
    }
    /// Derive a source name from this host: its hostname, sans domain, or failing that one of its
    /// IP addresses.
    pub fn try_default() -> Result<SourceName> {
        let hostname = hostname::get()
            .ok()
            .map(|hn| SourceName::strip_domain(hn.to_string_lossy().into_owned()))
            .filter(|hn| !hn.is_empty() && !hn.contains(' '));
        match hostname {
            Some(hn) => Ok(SourceName::new(hn)),
            None => local_ip_address::local_ip()
                .map(|ip| SourceName::new(ip.to_string()))
                .map_err(|err| Error::NoSourceName {
                    source: err.to_string().into(),
                    back: Backtrace::new(),
                }),
        }
    }
}

impl std::default::Default for SourceName {
    fn default() -> Self {
        SourceName::new("localhost")
    }
}

impl std::fmt::Display for SourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.read().unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_source_name() {
        let _x = SourceName::try_default(); // At least _exercise_ it

        assert_eq!(SourceName::default().get(), "localhost");

        let app = SourceName::new("host-1");
        let converter = app.clone();
        assert_eq!(converter.get(), "host-1");
        app.set("host-42");
        assert_eq!(converter.get(), "host-42");
        assert_eq!(format!("{}", converter), "host-42");

        assert_eq!(
            SourceName::strip_domain("staging.pwpinfra.com".to_string()),
            "staging"
        );
    }
}
