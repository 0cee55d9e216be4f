use std::time::Duration;

/// Lower clamp applied to bond values during normalization and editing.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum BondFloor {
    /// Bond may go negative (hostile relations); only the upper sentinel cap applies.
    Unbounded,
    /// Clamp into `[0, 101]`.
    Zero,
}

/// How meters whose maximum is infinite are shown.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum UnboundedMeter {
    /// Draw the bar full.
    Full,
    /// Leave the meter out of the view.
    Hidden,
}

#[derive(Clone, Debug)]
pub struct Options {
    /// Lower bound for bond values.
    pub bond_floor: BondFloor,
    /// Rendering policy for meters with an infinite maximum.
    pub unbounded_meter: UnboundedMeter,
    /// Write the normalized state back after an automatic scan that needed repair.
    /// Manual scans always write back.
    pub rewrite_on_auto_repair: bool,
    /// Quiet period after the last chat mutation before an automatic scan runs.
    pub scan_delay: Duration,
    /// Characters shown on each side of a diagnosed parse error.
    pub snippet_radius: usize,
    /// Enable repair logging. Use `repair_with_log` to retrieve logs.
    pub logging: bool,
    /// Context window size used when building log context snippets.
    pub log_context_window: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bond_floor: BondFloor::Unbounded,
            unbounded_meter: UnboundedMeter::Full,
            rewrite_on_auto_repair: false,
            scan_delay: Duration::from_millis(1200),
            snippet_radius: 200,
            logging: false,
            log_context_window: 10,
        }
    }
}

impl Options {
    pub(crate) fn bond_min(&self) -> f64 {
        match self.bond_floor {
            BondFloor::Unbounded => f64::NEG_INFINITY,
            BondFloor::Zero => 0.0,
        }
    }
}
