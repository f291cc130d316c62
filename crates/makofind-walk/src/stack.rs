//! Bounded stack of open directories.

/// A stack with a hard capacity.
///
/// The walker keeps one open directory per level here, so the capacity is
/// the maximum number of directory descriptors a walk holds at once.
#[derive(Debug)]
pub struct DirStack<T> {
    frames: Vec<T>,
    capacity: usize,
}

impl<T> DirStack<T> {
    /// Create an empty stack holding at most `capacity` frames.
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Vec::new(),
            capacity,
        }
    }

    /// Push a frame. Hands it back if the stack is full.
    pub fn push(&mut self, frame: T) -> Result<(), T> {
        if self.is_full() {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Pop the innermost frame.
    pub fn pop(&mut self) -> Option<T> {
        self.frames.pop()
    }

    /// Innermost frame.
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.frames.last_mut()
    }

    /// Drop every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
