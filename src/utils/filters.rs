//! Pixel-filter preprocessing.
//!
//! Treats a feature vector as a square greyscale image and convolves 3×3
//! kernels over it. Each filtered image is appended after the original
//! pixels, so a 64-pixel digit with two filters becomes 192 features.

/// A 3×3 convolution kernel, indexed `[row][column]`.
pub type Kernel = [[f64; 3]; 3];

/// Ordered set of kernels applied to every sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Filters {
    kernels: Vec<Kernel>,
}

impl Filters {
    pub fn new(kernels: Vec<Kernel>) -> Self {
        Self { kernels }
    }

    /// Horizontal and vertical Sobel edge detectors.
    pub fn edges() -> Self {
        Self::new(vec![
            [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]],
            [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
        ])
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Width of a feature vector after filtering `pixels` input pixels.
    pub fn output_width(&self, pixels: usize) -> usize {
        pixels * (self.kernels.len() + 1)
    }

    /// Returns the original pixels followed by one filtered copy per kernel.
    ///
    /// Pixels outside the image count as zero. Returns `None` when the pixel
    /// count is not a perfect square.
    pub fn apply(&self, pixels: &[f64]) -> Option<Vec<f64>> {
        let side = square_side(pixels.len())?;

        let mut output = Vec::with_capacity(self.output_width(pixels.len()));
        output.extend_from_slice(pixels);

        for kernel in &self.kernels {
            for row in 0..side {
                for column in 0..side {
                    output.push(convolve_at(pixels, side, row, column, kernel));
                }
            }
        }

        Some(output)
    }
}

fn square_side(len: usize) -> Option<usize> {
    let side = (len as f64).sqrt().round() as usize;
    (side * side == len).then_some(side)
}

fn convolve_at(pixels: &[f64], side: usize, row: usize, column: usize, kernel: &Kernel) -> f64 {
    let mut sum = 0.0;
    for (dr, kernel_row) in kernel.iter().enumerate() {
        for (dc, &weight) in kernel_row.iter().enumerate() {
            let r = row as isize + dr as isize - 1;
            let c = column as isize + dc as isize - 1;
            if r < 0 || c < 0 || r >= side as isize || c >= side as isize {
                continue;
            }
            sum += pixels[r as usize * side + c as usize] * weight;
        }
    }
    sum
}
