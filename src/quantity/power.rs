quantity!(Watts, i32, "W");

impl Watts {
    /// Positive when the flow goes into the measured device.
    ///
    /// For the battery this means charging, for the grid this means import.
    #[must_use]
    pub const fn is_inbound(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_outbound(self) -> bool {
        self.0 < 0
    }
}
