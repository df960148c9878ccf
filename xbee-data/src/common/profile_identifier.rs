//! Common profile identifiers

extended_enum!(
    /// Profile identifiers
    ProfileIdentifier, u16,
    /// Device profile
    DeviceProfile => 0x0000,
    /// Industrial and plant monitoring profile
    IndustrialPlantMonitoring => 0x0101,
    /// Home automation profile
    HomeAutomation => 0x0104,
    /// Commercial building automation profile
    CommercialBuildingAutomation => 0x0105,
    /// Smart energy profile
    SmartEnergy => 0x0109,
    /// Digi International profile
    Digi => 0xc105,
    /// Light link profile
    LightLink => 0xc05e,
    /// Wildcard profile
    Wildcard => 0xffff,
);
