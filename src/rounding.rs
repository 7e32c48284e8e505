//! Legislated rounding rules
//!
//! The dime and cent helpers carry a small tolerance so that a product that
//! should land exactly on a boundary (e.g. 105.9 computed as 105.89999999)
//! is not pushed to the neighbouring dime by binary floating point.

const TOLERANCE: f64 = 1e-6;

/// Round down to the next lower dime
pub fn floor_dime(x: f64) -> f64 {
    (x * 10.0 + TOLERANCE).floor() / 10.0
}

/// Round up to the next higher dime
pub fn ceil_dime(x: f64) -> f64 {
    (x * 10.0 - TOLERANCE).ceil() / 10.0
}

/// Round to the nearest cent
pub fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round up to the next higher cent
pub fn ceil_cents(x: f64) -> f64 {
    (x * 100.0 - TOLERANCE).ceil() / 100.0
}

/// Round to the nearest multiple of `step`, halves up
pub fn round_to_multiple(x: f64, step: f64) -> f64 {
    (x / step + 0.5).floor() * step
}

/// Round a bend point to the nearest dollar
pub fn round_dollar(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Round a monthly exempt amount to a multiple of $10
pub fn round_exempt_amount(x: f64) -> f64 {
    10.0 * ((x + 4.99) / 10.0).floor()
}

/// Lowest MFB allowed for a PIA: 150% of the PIA, rounded up to the cent
pub fn mfb_floor(pia: f64) -> f64 {
    ceil_cents(1.5 * pia)
}
