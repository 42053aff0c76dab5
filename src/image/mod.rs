//! Pixel buffers.
//!
//! `Plane<T>` is an owned, contiguous, row-major buffer (`index = y * width + x`)
//! with a non-zero size. The same type carries 8-bit images, `i32` label masks,
//! `u16` distance levels and `f32` score maps.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.

use crate::util::{PlaneScanError, PlaneScanResult};

pub mod color;
#[cfg(feature = "image-io")]
pub mod io;

/// Foreground sample value of a binary plane.
pub const FOREGROUND: u8 = 255;
/// Background sample value of a binary plane.
pub const BACKGROUND: u8 = 0;

/// Owned single-channel sample buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Plane<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T> Plane<T> {
    /// Wraps a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> PlaneScanResult<Self> {
        let expected = checked_area(width, height)?;
        if data.len() != expected {
            return Err(PlaneScanError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Returns the plane width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the plane height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Planes are never empty; provided for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the samples in row-major order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the samples mutably in row-major order.
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the plane and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the sample at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x)
    }

    /// Returns the sample at `(x, y)` mutably if it is within bounds.
    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get_mut(y * self.width + x)
    }

    /// Returns row `y`.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        self.data.get(start..start + self.width)
    }

    /// Returns a borrowed view of the whole plane.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Fails unless `other` has the same size as `self`.
    pub fn ensure_same_dims<U>(&self, other: &Plane<U>) -> PlaneScanResult<()> {
        if self.dims() != other.dims() {
            return Err(PlaneScanError::DimensionMismatch {
                expected: self.dims(),
                got: other.dims(),
            });
        }
        Ok(())
    }
}

impl<T: Clone> Plane<T> {
    /// Creates a plane filled with `value`.
    pub fn filled(width: usize, height: usize, value: T) -> PlaneScanResult<Self> {
        let len = checked_area(width, height)?;
        Ok(Self {
            data: vec![value; len],
            width,
            height,
        })
    }
}

impl<T: Copy> Plane<T> {
    /// Copies a (possibly strided) view into a contiguous plane.
    pub fn from_view(view: ImageView<'_, T>) -> PlaneScanResult<Self> {
        let len = checked_area(view.width(), view.height())?;
        let mut data = Vec::with_capacity(len);
        for y in 0..view.height() {
            let row = view.row(y).ok_or(PlaneScanError::BufferTooSmall {
                needed: view.required_len(),
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height())
    }

    /// Applies `f` to every sample and returns a new plane.
    pub fn map<U>(&self, f: impl FnMut(T) -> U) -> Plane<U> {
        Plane {
            data: self.data.iter().copied().map(f).collect(),
            width: self.width,
            height: self.height,
        }
    }
}

impl Plane<u8> {
    /// Returns the sample-wise complement `255 - v`.
    pub fn inverted(&self) -> Plane<u8> {
        self.map(|v| 255 - v)
    }

    /// Returns true when every sample is either 0 or 255.
    pub fn is_binary(&self) -> bool {
        self.data
            .iter()
            .all(|&v| v == FOREGROUND || v == BACKGROUND)
    }
}

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> PlaneScanResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> PlaneScanResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(PlaneScanError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dims(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> PlaneScanResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(PlaneScanError::InvalidDimensions { width, height });
        }
        let out_of_bounds = PlaneScanError::RoiOutOfBounds {
            x,
            y,
            width,
            height,
            img_width: self.width,
            img_height: self.height,
        };
        let end_x = x.checked_add(width).ok_or(out_of_bounds.clone())?;
        let end_y = y.checked_add(height).ok_or(out_of_bounds.clone())?;
        if end_x > self.width || end_y > self.height {
            return Err(out_of_bounds);
        }

        let start = y * self.stride + x;
        let data = self
            .data
            .get(start..)
            .ok_or(PlaneScanError::BufferTooSmall {
                needed: start + 1,
                got: self.data.len(),
            })?;
        ImageView::new(data, width, height, self.stride)
    }

    fn required_len(&self) -> usize {
        (self.height - 1) * self.stride + self.width
    }
}

pub(crate) fn checked_area(width: usize, height: usize) -> PlaneScanResult<usize> {
    if width == 0 || height == 0 {
        return Err(PlaneScanError::InvalidDimensions { width, height });
    }
    width
        .checked_mul(height)
        .ok_or(PlaneScanError::InvalidDimensions { width, height })
}

fn required_len(width: usize, height: usize, stride: usize) -> PlaneScanResult<usize> {
    checked_area(width, height)?;
    if stride < width {
        return Err(PlaneScanError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(PlaneScanError::InvalidDimensions { width, height })
}
