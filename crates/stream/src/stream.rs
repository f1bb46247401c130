//! A single named, shaped float buffer.

/// A flat `f32` buffer with shape metadata and publication state.
///
/// The write flag is an advisory single-writer lock: the producer sets it
/// before mutating the data and clears it after posting, and consumers must
/// not read while it is set. There is exactly one producer per stream.
#[derive(Debug, Clone)]
pub struct Stream {
    name: String,
    shape: Vec<usize>,
    data: Vec<f32>,
    writing: bool,
    post_count: u64,
    update_count: u64,
}

impl Stream {
    /// Creates a zero-filled stream with the given shape.
    ///
    /// The shape must be non-empty with every axis size at least 1; callers
    /// go through [`crate::StreamStore::create`], which validates this.
    pub(crate) fn new(name: &str, shape: &[usize]) -> Self {
        let nelement = shape.iter().product();
        Self {
            name: name.to_string(),
            shape: shape.to_vec(),
            data: vec![0.0; nelement],
            writing: false,
            post_count: 0,
            update_count: 0,
        }
    }

    /// Returns the stream name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of axes.
    pub fn naxis(&self) -> usize {
        self.shape.len()
    }

    /// Returns the per-axis sizes.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the total element count.
    pub fn nelement(&self) -> usize {
        self.data.len()
    }

    /// Returns the flat data, row-major.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the flat data mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns true while the producer holds the write flag.
    pub fn is_writing(&self) -> bool {
        self.writing
    }

    /// Sets the advisory write flag.
    pub fn begin_write(&mut self) {
        self.writing = true;
    }

    /// Clears the advisory write flag.
    pub fn end_write(&mut self) {
        self.writing = false;
    }

    /// Signals consumers that new data is ready.
    pub fn post(&mut self) {
        self.post_count += 1;
    }

    /// Returns how many times consumers have been signalled.
    pub fn post_count(&self) -> u64 {
        self.post_count
    }

    /// Increments the monotonic update counter.
    pub fn increment_count(&mut self) {
        self.update_count += 1;
    }

    /// Returns the number of completed publications.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}
