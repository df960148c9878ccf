//! Frame dispatch table

use crate::Error;

/// Receiver of complete API frames
pub trait FrameHandler {
    /// Handle a frame, `frame` starts with the frame type byte
    fn handle_frame(&self, frame: &[u8]) -> Result<(), Error>;
}

/// Entry of the frame dispatch table
#[derive(Clone, Copy)]
pub struct FrameHandlerEntry<'a> {
    /// Frame type to match
    pub frame_type: u8,
    /// Frame identifier to match, 0 matches any identifier
    pub frame_id: u8,
    /// The handler
    pub handler: &'a dyn FrameHandler,
}

impl<'a> FrameHandlerEntry<'a> {
    pub fn new(frame_type: u8, frame_id: u8, handler: &'a dyn FrameHandler) -> Self {
        Self {
            frame_type,
            frame_id,
            handler,
        }
    }

    fn matches(&self, frame_type: u8, frame_id: u8) -> bool {
        self.frame_type == frame_type && (self.frame_id == 0 || self.frame_id == frame_id)
    }
}

/// Pass the frame to every matching entry, in table order
///
/// Returns the number of handlers invoked. Handler errors are logged, they
/// do not stop the dispatch.
pub fn dispatch(handlers: &[FrameHandlerEntry], frame: &[u8]) -> usize {
    let frame_type = match frame.first() {
        Some(frame_type) => *frame_type,
        None => return 0,
    };
    let frame_id = frame.get(1).copied().unwrap_or(0);
    let mut count = 0;
    for entry in handlers.iter().filter(|e| e.matches(frame_type, frame_id)) {
        if let Err(err) = entry.handler.handle_frame(frame) {
            log::warn!("Frame handler for {:02x} failed, {:?}", frame_type, err);
        }
        count += 1;
    }
    count
}
