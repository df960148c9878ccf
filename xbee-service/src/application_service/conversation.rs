//! Conversations, requests waiting for a response
//!
//! Each endpoint state holds a small table of outstanding transactions.
//! A conversation ends when its handler says so, or when it times out.

use core::cell::{Cell, RefCell};

use crate::application_service::{ApplicationService, Envelope};
use crate::Error;

/// Conversation slots per endpoint
pub const MAX_CONVERSATIONS: usize = 8;

/// Result of a conversation handler
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ConversationStatus {
    /// The conversation is complete, free the slot
    End,
    /// More responses are expected
    Continue,
}

/// Receiver of the responses to a request
pub trait ConversationHandler {
    /// Called with the response envelope, or with `None` when the
    /// conversation timed out
    fn respond(
        &self,
        service: &ApplicationService,
        envelope: Option<&Envelope>,
    ) -> Result<ConversationStatus, Error>;
}

#[derive(Clone, Copy, Default)]
struct Conversation<'a> {
    transaction: u8,
    // lower 16 bits of the seconds timer, 0 for no timeout
    deadline: u16,
    handler: Option<&'a dyn ConversationHandler>,
}

impl<'a> Conversation<'a> {
    fn is_live(&self) -> bool {
        self.handler.is_some()
    }

    fn has_expired(&self, now: u16) -> bool {
        self.deadline != 0 && now.wrapping_sub(self.deadline) as i16 >= 0
    }
}

/// Mutable state of a endpoint
pub struct EndpointState<'a> {
    last_transaction: Cell<u8>,
    conversations: RefCell<[Conversation<'a>; MAX_CONVERSATIONS]>,
}

impl<'a> Default for EndpointState<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EndpointState<'a> {
    pub fn new() -> Self {
        Self {
            last_transaction: Cell::new(0),
            conversations: RefCell::new([Conversation::default(); MAX_CONVERSATIONS]),
        }
    }

    fn is_live(&self, transaction: u8) -> bool {
        self.conversations
            .borrow()
            .iter()
            .any(|c| c.is_live() && c.transaction == transaction)
    }

    /// Next transaction identifier, 1 to 255 skipping identifiers held by
    /// live conversations
    pub fn next_transaction(&self) -> u8 {
        let mut transaction = self.last_transaction.get();
        loop {
            transaction = match transaction.wrapping_add(1) {
                0 => 1,
                t => t,
            };
            if !self.is_live(transaction) {
                break;
            }
        }
        self.last_transaction.set(transaction);
        transaction
    }

    /// Register a conversation, returns the transaction identifier to use
    /// in the request
    ///
    /// Without a handler only a transaction identifier is allocated. A
    /// `timeout` of 0 seconds waits forever.
    pub fn register(
        &self,
        handler: Option<&'a dyn ConversationHandler>,
        now: u32,
        timeout: u16,
    ) -> Result<u8, Error> {
        let handler = match handler {
            Some(handler) => handler,
            None => return Ok(self.next_transaction()),
        };
        let slot = self
            .conversations
            .borrow()
            .iter()
            .position(|c| !c.is_live())
            .ok_or(Error::NoSpace)?;
        let transaction = self.next_transaction();
        let deadline = if timeout == 0 {
            0
        } else {
            match (now as u16).wrapping_add(timeout) {
                0 => 1,
                deadline => deadline,
            }
        };
        self.conversations.borrow_mut()[slot] = Conversation {
            transaction,
            deadline,
            handler: Some(handler),
        };
        Ok(transaction)
    }

    /// Remove the conversation for `transaction`
    pub fn delete(&self, transaction: u8) {
        for conversation in self.conversations.borrow_mut().iter_mut() {
            if conversation.is_live() && conversation.transaction == transaction {
                *conversation = Conversation::default();
            }
        }
    }

    /// Number of live conversations
    pub fn active(&self) -> usize {
        self.conversations
            .borrow()
            .iter()
            .filter(|c| c.is_live())
            .count()
    }

    /// Pass a response to the conversation waiting for `transaction`
    ///
    /// A handler error is returned to the caller and the conversation stays
    /// live.
    pub fn response(
        &self,
        service: &ApplicationService,
        transaction: u8,
        envelope: &Envelope,
    ) -> Result<(), Error> {
        let handler = self
            .conversations
            .borrow()
            .iter()
            .find(|c| c.is_live() && c.transaction == transaction)
            .and_then(|c| c.handler)
            .ok_or(Error::NotFound)?;
        match handler.respond(service, Some(envelope)) {
            Ok(ConversationStatus::End) => self.delete(transaction),
            Ok(ConversationStatus::Continue) => (),
            Err(err) => {
                log::warn!("Conversation {:02x} failed, {:?}", transaction, err);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Time out expired conversations, each handler is called once with no
    /// envelope and the slot is freed
    pub fn expire(&self, service: &ApplicationService, now: u32) {
        let now = now as u16;
        for slot in 0..MAX_CONVERSATIONS {
            let conversation = self.conversations.borrow()[slot];
            if !conversation.is_live() || !conversation.has_expired(now) {
                continue;
            }
            self.conversations.borrow_mut()[slot] = Conversation::default();
            if let Some(handler) = conversation.handler {
                log::info!("Conversation {:02x} timed out", conversation.transaction);
                if let Err(err) = handler.respond(service, None) {
                    log::warn!(
                        "Conversation {:02x} timeout failed, {:?}",
                        conversation.transaction,
                        err
                    );
                }
            }
        }
    }
}
