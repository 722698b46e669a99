quantity!(Percent, u16, "%");

impl Percent {
    pub const MAX: Self = Self(100);

    /// Whether the value is a sensible percentage.
    ///
    /// The device is trusted to report 0–100, values outside are not rejected.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 <= Self::MAX.0
    }
}

impl From<u8> for Percent {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}
