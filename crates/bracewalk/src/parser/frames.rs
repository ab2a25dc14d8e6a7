use alloc::vec::Vec;

use super::State;
use crate::error::{CapacityError, SyntaxError};

const PREALLOCATE: usize = 64;

/// Where the driver resumes once the structure a frame stands for closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    /// The structure was a field value: resume expecting the next field.
    Field,
    /// The structure was an element of an anonymous array: resume reading
    /// array elements.
    Array,
}

impl Resume {
    #[inline(always)]
    pub(crate) fn state(self) -> State {
        match self {
            Resume::Field => State::ExpectField,
            Resume::Array => State::ArrayItems,
        }
    }
}

/// One resumption marker per open structure; its length is the nesting
/// depth. The implicit root has no frame.
#[derive(Debug)]
pub(crate) struct FrameStack {
    frames: Vec<Resume>,
    max: usize,
}

impl FrameStack {
    pub(crate) fn new(max: usize) -> Self {
        Self {
            frames: Vec::with_capacity(max.min(PREALLOCATE)),
            max,
        }
    }

    #[inline(always)]
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, resume: Resume) -> Result<(), CapacityError> {
        if self.frames.len() == self.max {
            return Err(CapacityError::DepthExceeded { max: self.max });
        }
        self.frames.push(resume);
        log::trace!("push {resume:?} frame, depth {}", self.frames.len());
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn pop(&mut self) -> Result<Resume, SyntaxError> {
        let resume = self.frames.pop().ok_or(SyntaxError::UnbalancedClose)?;
        log::trace!("pop {resume:?} frame, depth {}", self.frames.len());
        Ok(resume)
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }
}
