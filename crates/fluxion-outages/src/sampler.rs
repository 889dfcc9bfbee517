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

//! Grid sampling of the decoded schedule image

use crate::classifier::Rgb;
use crate::config::GridConfig;
use crate::error::{OutageError, Result};
use image::RgbImage;

/// Center pixel of cell (`row`, `col`). `None` on arithmetic overflow.
fn cell_center(grid: &GridConfig, row: u32, col: u32) -> Option<(u32, u32)> {
    let x = grid
        .left
        .checked_add(col.checked_mul(grid.cell_width)?)?
        .checked_add(grid.cell_width / 2)?;
    let y = grid
        .top
        .checked_add(row.checked_mul(grid.cell_height)?)?
        .checked_add(grid.cell_height / 2)?;
    Some((x, y))
}

/// One pixel per cell, indexed `[row][hour]`.
///
/// Fails with [`OutOfBounds`](OutageError::OutOfBounds) as soon as a sample
/// point falls outside the image; a partial grid is never returned.
pub fn sample(image: &RgbImage, grid: &GridConfig) -> Result<Vec<Vec<Rgb>>> {
    let (width, height) = image.dimensions();
    let out_of_bounds = |x, y| OutageError::OutOfBounds {
        x,
        y,
        width,
        height,
    };

    let mut rows = Vec::with_capacity(grid.rows());
    for row in 0..grid.rows() as u32 {
        let mut cells = Vec::with_capacity(grid.hours as usize);
        for col in 0..grid.hours {
            let (x, y) = cell_center(grid, row, col)
                .ok_or_else(|| out_of_bounds(u32::MAX, u32::MAX))?;
            if x >= width || y >= height {
                return Err(out_of_bounds(x, y));
            }
            let [r, g, b] = image.get_pixel(x, y).0;
            cells.push(Rgb::new(r, g, b));
        }
        rows.push(cells);
    }
    Ok(rows)
}
