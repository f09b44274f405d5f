//! Grayscale frame buffers.

/// Owned row-major 8-bit grayscale image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl GrayImage {
    /// Black image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wrap a raw buffer; `None` when its length does not match `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }
}

/// One decoded video frame. `number` is 1-based, in stream order.
#[derive(Clone, Debug)]
pub struct Frame {
    pub number: u64,
    pub image: GrayImage,
}

impl Frame {
    pub fn new(number: u64, image: GrayImage) -> Self {
        Self { number, image }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.image.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.image.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        assert!(GrayImage::from_raw(4, 3, vec![0; 11]).is_none());
        let img = GrayImage::from_raw(4, 3, vec![7; 12]).expect("valid buffer");
        assert_eq!(img.data.len(), 12);
        assert!(GrayImage::from_raw(usize::MAX, 2, Vec::new()).is_none());
    }
}
