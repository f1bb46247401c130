//! Name-keyed stream registry with resolve and create-if-absent semantics.

use std::collections::HashMap;

use tracing::warn;

use crate::error::StreamError;
use crate::stream::Stream;

/// Registry of named streams.
///
/// Resolution comes in two modes, distinguished by how a missing name is
/// reported: [`resolve`](StreamStore::resolve) fails with
/// [`StreamError::NotFound`] (callers treat this as fatal), while
/// [`resolve_or_warn`](StreamStore::resolve_or_warn) logs a warning and
/// returns `None` so the caller can fall back to a default construction
/// path.
#[derive(Debug, Default)]
pub struct StreamStore {
    streams: HashMap<String, Stream>,
}

impl StreamStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a stream with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.streams.contains_key(name)
    }

    /// Resolves a stream by name, failing if it does not exist.
    pub fn resolve(&self, name: &str) -> Result<&Stream, StreamError> {
        self.streams.get(name).ok_or_else(|| StreamError::NotFound {
            name: name.to_string(),
        })
    }

    /// Resolves a stream by name for mutation, failing if it does not exist.
    pub fn resolve_mut(&mut self, name: &str) -> Result<&mut Stream, StreamError> {
        self.streams
            .get_mut(name)
            .ok_or_else(|| StreamError::NotFound {
                name: name.to_string(),
            })
    }

    /// Resolves a stream by name, warning (not failing) if it is absent.
    pub fn resolve_or_warn(&self, name: &str) -> Option<&Stream> {
        let found = self.streams.get(name);
        if found.is_none() {
            warn!(stream = name, "stream not found, using default path");
        }
        found
    }

    /// Creates a zero-filled stream with an explicit shape.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::AlreadyExists`] if the name is taken and
    /// [`StreamError::InvalidShape`] if the shape is empty or has a
    /// zero-sized axis.
    pub fn create(&mut self, name: &str, shape: &[usize]) -> Result<&mut Stream, StreamError> {
        if self.streams.contains_key(name) {
            return Err(StreamError::AlreadyExists {
                name: name.to_string(),
            });
        }
        if shape.is_empty() || shape.contains(&0) {
            return Err(StreamError::InvalidShape {
                name: name.to_string(),
                shape: shape.to_vec(),
            });
        }
        let stream = Stream::new(name, shape);
        Ok(self.streams.entry(name.to_string()).or_insert(stream))
    }

    /// Creates a zero-filled stream with the shape of an existing stream.
    pub fn create_like(&mut self, name: &str, template: &str) -> Result<&mut Stream, StreamError> {
        let shape = self.resolve(template)?.shape().to_vec();
        self.create(name, &shape)
    }

    /// Resolves a stream, creating it with the given shape if absent.
    pub fn resolve_or_create(
        &mut self,
        name: &str,
        shape: &[usize],
    ) -> Result<&mut Stream, StreamError> {
        if !self.streams.contains_key(name) {
            return self.create(name, shape);
        }
        self.resolve_mut(name)
    }

    /// Loads data into a stream, creating it if absent.
    ///
    /// The data length must match the shape's element count.
    pub fn load(
        &mut self,
        name: &str,
        shape: &[usize],
        data: &[f32],
    ) -> Result<&mut Stream, StreamError> {
        let stream = self.resolve_or_create(name, shape)?;
        if stream.nelement() != data.len() {
            return Err(StreamError::InvalidShape {
                name: name.to_string(),
                shape: shape.to_vec(),
            });
        }
        stream.as_mut_slice().copy_from_slice(data);
        Ok(stream)
    }
}
