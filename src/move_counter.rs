/// Counts moves this process has issued itself so that the matching `move`
/// events coming back from sway can be recognised as echoes and dropped.
#[derive(Debug, Default)]
pub struct MoveCounter {
    value: u32,
}

impl MoveCounter {
    pub fn increment(&mut self) {
        self.value += 1;
        log::debug!("incremented move counter to {}", self.value);
    }

    /// Saturates at zero: a stray decrement must never turn a later user
    /// move into a suppressed echo.
    pub fn decrement(&mut self) {
        self.value = self.value.saturating_sub(1);
        log::debug!("decremented move counter to {}", self.value);
    }

    pub fn value(&self) -> u32 {
        self.value
    }
}
