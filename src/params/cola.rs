//! Applying and removing benefit increases
//!
//! Increases effective 1982 and later round the result down to the dime;
//! earlier increases round up. Removal rounds the other way, which makes it
//! the exact inverse for any dime amount.

use crate::rounding::{ceil_dime, floor_dime, mfb_floor};

/// First year increases round down instead of up
pub const YEAR_ROUND_DOWN: i32 = 1982;

/// Increase `amount` by `percent`, effective in `year`
pub fn apply_cola(amount: f64, percent: f64, year: i32) -> f64 {
    let raised = amount * (1.0 + percent / 100.0);
    if year >= YEAR_ROUND_DOWN {
        floor_dime(raised)
    } else {
        ceil_dime(raised)
    }
}

/// Undo `apply_cola` for the same `percent` and `year`
pub fn unapply_cola(amount: f64, percent: f64, year: i32) -> f64 {
    let lowered = amount / (1.0 + percent / 100.0);
    if year >= YEAR_ROUND_DOWN {
        ceil_dime(lowered)
    } else {
        floor_dime(lowered)
    }
}

/// Increase an MFB, never letting it fall below 150% of the increased PIA
pub fn apply_cola_mfb(mfb: f64, percent: f64, year: i32, pia: f64) -> f64 {
    apply_cola(mfb, percent, year).max(mfb_floor(pia))
}

/// Undo `apply_cola_mfb`, keeping the floor for the PIA before the increase
pub fn unapply_cola_mfb(mfb: f64, percent: f64, year: i32, pia: f64) -> f64 {
    unapply_cola(mfb, percent, year).max(mfb_floor(pia))
}
