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

//! Error types for the outage pipeline

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutageError {
    /// Page or image could not be fetched, or the payload was unusable
    #[error("schedule source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("no schedule image with alt text containing {marker:?}")]
    ScheduleImageNotFound { marker: String },

    /// Grid geometry does not fit the decoded image, usually a layout change upstream
    #[error("sample point ({x}, {y}) outside {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("malformed schedule date: {0}")]
    MalformedDate(String),

    #[error("invalid slot: {0}")]
    InvalidSlot(String),

    #[error("unknown schedule freshness: {0:?}")]
    UnknownFreshness(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("cache persistence error: {0}")]
    Store(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OutageError>;
