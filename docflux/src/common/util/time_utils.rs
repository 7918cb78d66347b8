use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current time in milliseconds since the Unix epoch.
///
/// Returns an error only if the system clock reports a time before the epoch.
pub fn get_current_time() -> Result<u128, std::time::SystemTimeError> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis())
}

/// Returns the current time in milliseconds since the Unix epoch, or zero if
/// the system clock is unavailable.
pub fn get_current_time_or_zero() -> u128 {
    get_current_time().unwrap_or_else(|err| {
        log::warn!("Failed to read system time: {}. Defaulting to zero.", err);
        0
    })
}
