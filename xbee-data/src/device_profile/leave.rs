use crate::common::address::ExtendedAddress;
use crate::pack::{Pack, PackFixed};
use crate::Error;

bitflags! {
    /// Management leave request options
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct LeaveFlags: u8 {
        /// The children of the device shall also leave
        const REMOVE_CHILDREN = 0x40;
        /// The device shall rejoin after leaving
        const REJOIN = 0x80;
    }
}

// 2.4.3.3.5 Mgmt_Leave_req
/// Management leave request
#[derive(Clone, Debug, PartialEq)]
pub struct ManagementLeaveRequest {
    /// Device requested to leave
    pub address: ExtendedAddress,
    /// Options
    pub flags: LeaveFlags,
}

impl Pack<ManagementLeaveRequest, Error> for ManagementLeaveRequest {
    fn pack(&self, data: &mut [u8]) -> Result<usize, Error> {
        if data.len() < 9 {
            return Err(Error::WrongNumberOfBytes);
        }
        self.address.pack(&mut data[0..8])?;
        data[8] = self.flags.bits();
        Ok(9)
    }

    fn unpack(data: &[u8]) -> Result<(Self, usize), Error> {
        if data.len() < 9 {
            return Err(Error::WrongNumberOfBytes);
        }
        let address = ExtendedAddress::unpack(&data[0..8])?;
        let flags = LeaveFlags::from_bits_truncate(data[8]);
        Ok((Self { address, flags }, 9))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_leave_request() {
        let request = ManagementLeaveRequest {
            address: ExtendedAddress::new(0x0013_a200_4155_2233),
            flags: LeaveFlags::REJOIN,
        };
        let mut data = [0u8; 9];
        assert_eq!(request.pack(&mut data).unwrap(), 9);
        assert_eq!(
            data,
            [0x33, 0x22, 0x55, 0x41, 0x00, 0xa2, 0x13, 0x00, 0x80]
        );
    }
}
