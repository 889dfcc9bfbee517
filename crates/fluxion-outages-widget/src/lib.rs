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

//! Terminal rendition of the outage widget
//!
//! Shows one subqueue: a header with the schedule date followed by one line
//! per slot. The parameter `1.1є` asks for the hours with power instead of
//! the outage hours.

pub mod param;
pub mod view;

pub use param::WidgetParameter;
pub use view::{WidgetView, load_view};
