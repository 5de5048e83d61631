use bitflags::bitflags;

bitflags! {
    /// Modifier keys that participate in hotkey matching.
    ///
    /// The bit positions are the CoreGraphics `CGEventFlags` masks:
    /// - Shift (1 << 17)
    /// - Control (1 << 18)
    /// - Option/Alternate (1 << 19)
    /// - Command (1 << 20)
    ///
    /// Any other flag bits (caps lock, fn, numeric pad, device-dependent
    /// bits) are dropped when converting from raw OS flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u64 {
        /// Either Shift key.
        const SHIFT = 1 << 17;
        /// Either Control key.
        const CONTROL = 1 << 18;
        /// Either Option (Alternate) key.
        const OPTION = 1 << 19;
        /// Either Command key.
        const COMMAND = 1 << 20;
    }
}

impl Modifiers {
    /// Construct a modifier set from raw `CGEventFlags` bits, keeping only
    /// the four tracked modifiers.
    pub const fn from_cg_flags(flags: u64) -> Self {
        Self::from_bits_truncate(flags)
    }

    /// Readable modifier names in display order: Shift, Control, Option, Command.
    pub fn names(self) -> Vec<&'static str> {
        let mut out = Vec::with_capacity(4);
        if self.contains(Self::SHIFT) {
            out.push("Shift");
        }
        if self.contains(Self::CONTROL) {
            out.push("Control");
        }
        if self.contains(Self::OPTION) {
            out.push("Option");
        }
        if self.contains(Self::COMMAND) {
            out.push("Command");
        }
        out
    }
}
