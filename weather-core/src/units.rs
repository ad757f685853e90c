/// 1 m/s expressed in mph.
pub const MPH_PER_MS: f64 = 2.23694;

/// Nearest integer, with halves rounded towards positive infinity (`-2.5` becomes `-2`).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Celsius to Fahrenheit, rounded to the nearest whole degree.
pub fn c_to_f(celsius: i32) -> i32 {
    round_half_up(f64::from(celsius) * 9.0 / 5.0 + 32.0) as i32
}

/// Metres per second to miles per hour, rounded to one decimal.
pub fn ms_to_mph(ms: f64) -> f64 {
    round_half_up(ms * MPH_PER_MS * 10.0) / 10.0
}
