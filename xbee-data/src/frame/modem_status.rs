extended_enum!(
    /// Modem status reported by the module in frame 0x8a
    ModemStatus, u8,
    /// Hardware reset
    HardwareReset => 0x00,
    /// Watchdog timer reset
    WatchdogReset => 0x01,
    /// Joined a network
    Joined => 0x02,
    /// Left the network
    Disassociated => 0x03,
    /// Started as coordinator
    CoordinatorStarted => 0x06,
    /// The network security key was updated
    NetworkKeyUpdated => 0x07,
    /// Woke up from sleep
    WokeUp => 0x0b,
    /// Going to sleep
    Sleeping => 0x0c,
    /// Key establishment completed
    KeyEstablished => 0x10,
    /// Stack error
    StackError => 0x80,
);

impl ModemStatus {
    /// Parse the status from the content of a modem status frame
    pub fn from_frame(frame: &[u8]) -> Result<Self, crate::Error> {
        use core::convert::TryFrom;
        if frame.len() < 2 {
            return Err(crate::Error::WrongNumberOfBytes);
        }
        Self::try_from(frame[1])
    }

    /// Does the status mean that the module is no longer part of a network
    pub fn is_reset(self) -> bool {
        matches!(
            self,
            ModemStatus::HardwareReset | ModemStatus::WatchdogReset | ModemStatus::Disassociated
        )
    }
}
