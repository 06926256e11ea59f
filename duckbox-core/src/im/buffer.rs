// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::iter::Iterator;
use std::marker::PhantomData;
use std::ops::Deref;
use std::slice::ChunksExact;

use crate::error::DuckboxError;

/// A row-major container storing an image buffer or grid of pixels.
///
/// The struct is generic over the data type `T` and over the container that
/// holds raw pixel/subpixel data as a slice (`[T]`) or vector (`Vec<T>`).
/// The container holding the pixel data must implement `Deref<Target = [T]>`
/// to allow for slice-like access to the data. The length of the container
/// must also be equal to the product of `w` * `h` * `c`.
///
/// # Examples
///
/// ```
/// use duckbox_core::im::PixelBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 3; // RGB
/// let data = vec![0u8; (width * height * channels) as usize];
///
/// let buffer = PixelBuffer::new(width, height, channels, data);
///
/// assert_eq!(buffer.unwrap().len(), (width * height * channels) as usize);
/// ```
///
/// ```
/// use duckbox_core::im::PixelBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 3; // RGB
/// let data = vec![0u8; (width * height * 3 * channels) as usize];
///
/// let buffer = PixelBuffer::new(width, height, channels, data);
///
/// assert!(buffer.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone)]
pub struct PixelBuffer<T, Container> {
    w: u32,                   // Width
    h: u32,                   // Height
    c: u32,                   // Channels
    pub buffer: Container,    // Slice
    _phantom: PhantomData<T>, // Pixel
}

impl<T, Container> PixelBuffer<T, Container>
where
    Container: Deref<Target = [T]>,
{
    /// Initializes a buffer from a generic data container
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Number of image channels (e.g. 1 for grayscale)
    /// * `buffer` - A generic container (e.g. `Vec` or slice)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use duckbox_core::im::PixelBuffer;
    /// let buffer = [0, 1, 2, 3, 4];
    /// let buffer = PixelBuffer::new(2, 2, 1, buffer.as_slice());
    /// ```
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        buffer: Container,
    ) -> Result<PixelBuffer<T, Container>, DuckboxError> {
        if width * height * channels == buffer.len() as u32 {
            Ok(PixelBuffer {
                w: width,
                h: height,
                c: channels,
                buffer,
                _phantom: PhantomData,
            })
        } else {
            Err(DuckboxError::BufferSizeError)
        }
    }
}

// >>> PROPERTY METHODS

impl<T, Container> PixelBuffer<T, Container>
where
    Container: Deref<Target = [T]>,
{
    /// Width of the image
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the image
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of channels in the image
    pub fn channels(&self) -> u32 {
        self.c
    }

    /// Shape/dimensions of the image
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.h, self.w, self.c)
    }

    /// Length of the raw image
    pub fn len(&self) -> usize {
        (self.w * self.h * self.c) as usize
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T, Container> PixelBuffer<T, Container>
where
    Container: Deref<Target = [T]>,
{
    /// Returns the raw image
    pub fn into_raw(self) -> Container {
        self.buffer
    }

    /// Returns a reference to the raw image
    pub fn as_raw(&self) -> &Container {
        &self.buffer
    }

    // An iterator over the raw buffer
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    // An iterator over pixel-level chunks of the raw buffer
    pub fn iter_pixels(&self) -> ChunksExact<T> {
        self.buffer.chunks_exact(self.c as usize)
    }
}

// <<< CONVERSION METHODS
