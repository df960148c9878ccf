use crate::pack::{Pack, PackFixed};
use crate::Error;
use crate::{ExtendedAddress, NetworkAddress};

// 2.4.3.1.11 Device_annce
/// Device Announce
///
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceAnnounce {
    /// Network address of the device
    pub network_address: NetworkAddress,
    /// Extended (IEEE) address of the device
    pub extended_address: ExtendedAddress,
    /// Device capability bits, as sent
    pub capability: u8,
}

impl Pack<DeviceAnnounce, Error> for DeviceAnnounce {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 11 {
            Err(Error::WrongNumberOfBytes)
        } else {
            self.network_address.pack(&mut data[0..2])?;
            self.extended_address.pack(&mut data[2..10])?;
            data[10] = self.capability;
            Ok(11)
        }
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 11 {
            Err(Error::WrongNumberOfBytes)
        } else {
            let network_address = NetworkAddress::unpack(&data[0..2])?;
            let extended_address = ExtendedAddress::unpack(&data[2..10])?;
            Ok((
                Self {
                    network_address,
                    extended_address,
                    capability: data[10],
                },
                11,
            ))
        }
    }
}
