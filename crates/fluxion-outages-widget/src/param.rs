// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::fmt;
use std::str::FromStr;

use fluxion_outages::OutageError;

/// Suffix requesting power-on hours instead of outages
pub const INVERT_SUFFIX: char = 'є';

pub const DEFAULT_SUBQUEUE: &str = "1.1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetParameter {
    pub subqueue: String,
    pub inverted: bool,
}

impl Default for WidgetParameter {
    fn default() -> Self {
        Self {
            subqueue: DEFAULT_SUBQUEUE.to_owned(),
            inverted: false,
        }
    }
}

impl FromStr for WidgetParameter {
    type Err = OutageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::default());
        }

        let (subqueue, inverted) = match s.strip_suffix(INVERT_SUFFIX) {
            Some(rest) => (rest.trim_end(), true),
            None => (s, false),
        };
        if subqueue.is_empty() || subqueue.chars().any(char::is_whitespace) {
            return Err(OutageError::Config(format!("Invalid widget parameter: {s:?}")));
        }

        Ok(Self {
            subqueue: subqueue.to_owned(),
            inverted,
        })
    }
}

impl fmt::Display for WidgetParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subqueue)?;
        if self.inverted {
            write!(f, "{INVERT_SUFFIX}")?;
        }
        Ok(())
    }
}
