//! Scripted serial link for host tests.

extern crate std;

use crate::link::{LinkError, SerialLink};
use std::boxed::Box;
use std::collections::VecDeque;
use std::vec::Vec;

/// Serial link fed from a queue of request bytes.
///
/// Responses are captured in order. An optional hook runs after every
/// request byte is read, which lets a test publish mid-session.
pub(crate) struct MockLink {
    requests: VecDeque<u8>,
    responses: Vec<u8>,
    ready: bool,
    fail_write_at: Option<usize>,
    fail_ready: bool,
    on_read: Option<Box<dyn FnMut(u8)>>,
}

impl MockLink {
    pub(crate) fn new() -> Self {
        Self {
            requests: VecDeque::new(),
            responses: Vec::new(),
            ready: true,
            fail_write_at: None,
            fail_ready: false,
            on_read: None,
        }
    }

    pub(crate) fn with_requests(requests: &[u8]) -> Self {
        let mut link = Self::new();
        link.push_requests(requests);
        link
    }

    /// A link whose transport never came up.
    pub(crate) fn unavailable() -> Self {
        Self {
            ready: false,
            ..Self::new()
        }
    }

    pub(crate) fn push_requests(&mut self, requests: &[u8]) {
        self.requests.extend(requests.iter().copied());
    }

    /// Fail the write of the `n`th response (0-based).
    pub(crate) fn fail_write_at(mut self, n: usize) -> Self {
        self.fail_write_at = Some(n);
        self
    }

    pub(crate) fn fail_ready(mut self) -> Self {
        self.fail_ready = true;
        self
    }

    pub(crate) fn on_read(mut self, hook: impl FnMut(u8) + 'static) -> Self {
        self.on_read = Some(Box::new(hook));
        self
    }

    pub(crate) fn responses(&self) -> &[u8] {
        &self.responses
    }

    pub(crate) fn pending(&self) -> usize {
        self.requests.len()
    }
}

impl SerialLink for MockLink {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn read_ready(&mut self) -> Result<bool, LinkError> {
        if self.fail_ready {
            return Err(LinkError::Read);
        }
        Ok(!self.requests.is_empty())
    }

    fn read_byte(&mut self) -> Result<u8, LinkError> {
        let byte = self.requests.pop_front().ok_or(LinkError::Closed)?;
        if let Some(hook) = self.on_read.as_mut() {
            hook(byte);
        }
        Ok(byte)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        if self.fail_write_at == Some(self.responses.len()) {
            self.fail_write_at = None;
            return Err(LinkError::Write);
        }
        self.responses.push(byte);
        Ok(())
    }
}
